use std::collections::{HashMap, HashSet};

use crate::model::PerformanceRow;

pub const MAX_CLICK_RANKED: usize = 8;
pub const MAX_SELECTED: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlGroup {
    pub url: String,
    pub rows: Vec<PerformanceRow>,
}

pub fn group_by_url(rows: Vec<PerformanceRow>) -> Vec<UrlGroup> {
    let mut groups: Vec<UrlGroup> = Vec::new();
    let mut index_by_url: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match index_by_url.get(&row.url) {
            Some(index) => groups[*index].rows.push(row),
            None => {
                index_by_url.insert(row.url.clone(), groups.len());
                groups.push(UrlGroup {
                    url: row.url.clone(),
                    rows: vec![row],
                });
            }
        }
    }

    groups
}

pub fn select_top_queries(rows: &[PerformanceRow]) -> Vec<&PerformanceRow> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut selected = Vec::with_capacity(MAX_SELECTED.min(rows.len()));

    let mut by_clicks = rows.iter().filter(|row| row.clicks > 0).collect::<Vec<_>>();
    by_clicks.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    for row in by_clicks {
        if selected.len() == MAX_CLICK_RANKED {
            break;
        }
        if seen.insert(row.query.as_str()) {
            selected.push(row);
        }
    }

    let mut by_impressions = rows
        .iter()
        .filter(|row| !seen.contains(row.query.as_str()))
        .collect::<Vec<_>>();
    by_impressions.sort_by(|a, b| b.impressions.cmp(&a.impressions));
    for row in by_impressions {
        if selected.len() == MAX_SELECTED {
            break;
        }
        if seen.insert(row.query.as_str()) {
            selected.push(row);
        }
    }

    selected
}
