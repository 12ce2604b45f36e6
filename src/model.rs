use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceRow {
    pub url: String,
    pub query: String,
    pub clicks: u64,
    pub impressions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Title,
    Meta,
    H1,
    H2First,
    H2Second,
    H3First,
    H3Second,
    Body,
}

pub const SLOT_COUNT: usize = 8;

impl Slot {
    pub const ALL: [Slot; SLOT_COUNT] = [
        Slot::Title,
        Slot::Meta,
        Slot::H1,
        Slot::H2First,
        Slot::H2Second,
        Slot::H3First,
        Slot::H3Second,
        Slot::Body,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Meta => "Meta",
            Self::H1 => "H1",
            Self::H2First => "H2-1",
            Self::H2Second => "H2-2",
            Self::H3First => "H3-1",
            Self::H3Second => "H3-2",
            Self::Body => "Body",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotPresence([bool; SLOT_COUNT]);

impl SlotPresence {
    pub fn get(&self, slot: Slot) -> bool {
        self.0[slot.index()]
    }

    pub fn set(&mut self, slot: Slot, present: bool) {
        self.0[slot.index()] = present;
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|present| *present)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, bool)> + '_ {
        Slot::ALL.iter().map(|slot| (*slot, self.get(*slot)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRecord {
    pub url: String,
    pub query: String,
    pub clicks: u64,
    pub impressions: u64,
    pub presence: SlotPresence,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub input_path: String,
    pub input_sha256: String,
    pub output_path: String,
    pub branded_terms: Vec<String>,
    pub rows_loaded: usize,
    pub rows_after_filter: usize,
    pub urls_total: usize,
    pub urls_analyzed: usize,
    pub urls_skipped: Vec<String>,
    pub records_written: usize,
    pub avg_queries_per_url: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotCoverage {
    pub slot: &'static str,
    pub present: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsReport {
    pub results_path: String,
    pub urls_analyzed: usize,
    pub queries_analyzed: usize,
    pub avg_queries_per_url: f64,
    pub queries_missing_everywhere: usize,
    pub slots: Vec<SlotCoverage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_labels_follow_output_column_order() {
        let labels = Slot::ALL.iter().map(|slot| slot.label()).collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec!["Title", "Meta", "H1", "H2-1", "H2-2", "H3-1", "H3-2", "Body"]
        );
    }

    #[test]
    fn default_presence_has_every_slot_false() {
        let presence = SlotPresence::default();
        assert_eq!(presence.iter().count(), SLOT_COUNT);
        assert!(!presence.any());
    }

    #[test]
    fn set_only_touches_one_slot() {
        let mut presence = SlotPresence::default();
        presence.set(Slot::H2Second, true);

        assert!(presence.get(Slot::H2Second));
        assert!(!presence.get(Slot::H2First));
        assert_eq!(presence.iter().filter(|(_, present)| *present).count(), 1);
    }
}
