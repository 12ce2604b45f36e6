use std::path::{Path, PathBuf};

use csv::StringRecord;
use thiserror::Error;
use tracing::info;

use crate::model::PerformanceRow;

const URL_COLUMN: &str = "Landing Page";
const QUERY_COLUMN: &str = "Query";
const CLICKS_COLUMN: &str = "Clicks";
const IMPRESSIONS_COLUMN: &str = "Impressions";

const REQUIRED_COLUMNS: [&str; 4] = [URL_COLUMN, QUERY_COLUMN, CLICKS_COLUMN, IMPRESSIONS_COLUMN];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open performance export {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed performance export {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("performance export {} is missing required columns: {}", path.display(), missing.join(", "))]
    MissingColumns {
        path: PathBuf,
        missing: Vec<&'static str>,
    },
    #[error("invalid {column} value {value:?} on line {line} of {}", path.display())]
    InvalidNumber {
        path: PathBuf,
        line: u64,
        column: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandedTerms {
    terms: Vec<String>,
}

impl BrandedTerms {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = Vec::new();
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && !normalized.contains(&term) {
                normalized.push(term);
            }
        }
        Self { terms: normalized }
    }

    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn matches(&self, query: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        let query = query.to_lowercase();
        self.terms.iter().any(|term| query.contains(term.as_str()))
    }

    pub fn filter(&self, rows: Vec<PerformanceRow>) -> Vec<PerformanceRow> {
        if self.is_empty() {
            info!(rows = rows.len(), "no branded terms given, keeping all rows");
            return rows;
        }

        let filtered = rows
            .into_iter()
            .filter(|row| !self.matches(&row.query))
            .collect::<Vec<_>>();
        info!(
            rows = filtered.len(),
            terms = self.terms.len(),
            "filtered rows after removing branded terms"
        );
        filtered
    }
}

pub fn load_rows(path: &Path) -> Result<Vec<PerformanceRow>, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let columns = ColumnPositions::resolve(path, &headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| LoadError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(columns.row(path, &record)?);
    }

    info!(path = %path.display(), rows = rows.len(), "loaded rows from performance export");
    Ok(rows)
}

struct ColumnPositions {
    url: usize,
    query: usize,
    clicks: usize,
    impressions: usize,
}

impl ColumnPositions {
    fn resolve(path: &Path, headers: &StringRecord) -> Result<Self, LoadError> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim_start_matches('\u{feff}').trim() == name)
        };

        let found = REQUIRED_COLUMNS.map(position);
        let missing = REQUIRED_COLUMNS
            .iter()
            .zip(found.iter())
            .filter(|(_, position)| position.is_none())
            .map(|(name, _)| *name)
            .collect::<Vec<_>>();

        match found {
            [Some(url), Some(query), Some(clicks), Some(impressions)] => Ok(Self {
                url,
                query,
                clicks,
                impressions,
            }),
            _ => Err(LoadError::MissingColumns {
                path: path.to_path_buf(),
                missing,
            }),
        }
    }

    fn row(&self, path: &Path, record: &StringRecord) -> Result<PerformanceRow, LoadError> {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let cell = |index: usize| record.get(index).unwrap_or_default();

        Ok(PerformanceRow {
            url: cell(self.url).to_string(),
            query: cell(self.query).to_string(),
            clicks: parse_count(path, line, CLICKS_COLUMN, cell(self.clicks))?,
            impressions: parse_count(path, line, IMPRESSIONS_COLUMN, cell(self.impressions))?,
        })
    }
}

fn parse_count(path: &Path, line: u64, column: &'static str, raw: &str) -> Result<u64, LoadError> {
    let digits = raw.trim().replace(',', "");
    digits.parse::<u64>().map_err(|_| LoadError::InvalidNumber {
        path: path.to_path_buf(),
        line,
        column,
        value: raw.to_string(),
    })
}
