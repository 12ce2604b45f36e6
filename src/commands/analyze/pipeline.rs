use tracing::{info, warn};

use super::document::check_presence;
use super::fetch::PageFetcher;
use super::select::{UrlGroup, select_top_queries};
use crate::model::PresenceRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub records: Vec<PresenceRecord>,
    pub analyzed_urls: usize,
    pub skipped_urls: Vec<String>,
}

pub fn analyze_groups<F: PageFetcher + ?Sized>(groups: &[UrlGroup], fetcher: &F) -> AnalysisOutcome {
    let mut outcome = AnalysisOutcome::default();
    let total = groups.len();

    for (position, group) in groups.iter().enumerate() {
        let url = group.url.as_str();
        info!("processing URL {}/{}: {}", position + 1, total, url);

        let selection = select_top_queries(&group.rows);

        let Some(document) = fetcher.fetch(url) else {
            warn!(url = %url, "skipping URL due to fetch failure");
            outcome.skipped_urls.push(group.url.clone());
            continue;
        };

        for row in selection {
            outcome.records.push(PresenceRecord {
                url: group.url.clone(),
                query: row.query.clone(),
                clicks: row.clicks,
                impressions: row.impressions,
                presence: check_presence(Some(&document), &row.query),
            });
        }
        outcome.analyzed_urls += 1;
    }

    outcome
}
