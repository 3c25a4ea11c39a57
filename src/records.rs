use serde::{Deserialize, Serialize};

/// One team's outcome for a single season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRecord {
    pub year: u16,
    #[serde(default)]
    pub wins: u16,
    #[serde(default)]
    pub losses: u16,
    #[serde(default)]
    pub conf_wins: u16,
    #[serde(default)]
    pub conf_losses: u16,
    #[serde(default)]
    pub ap_pre: Option<u16>,
    #[serde(default)]
    pub ap_post: Option<u16>,
    #[serde(default)]
    pub cfp_final: Option<u16>,
    #[serde(default = "unknown_coach")]
    pub coach: String,
    #[serde(default)]
    pub bowl: Option<String>,
}

fn unknown_coach() -> String {
    crate::normalize::UNKNOWN_COACH.to_string()
}

/// The per-team file consumed by the history views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDocument {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub team_slug: String,
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub yearly_records: Vec<YearlyRecord>,
}

impl HistoryDocument {
    pub fn earliest_year(&self) -> Option<u16> {
        self.yearly_records.iter().map(|r| r.year).min()
    }

    pub fn latest_year(&self) -> Option<u16> {
        self.yearly_records.iter().map(|r| r.year).max()
    }

    /// True when the stored seasons reach back before `threshold`.
    pub fn has_full_history(&self, threshold: u16) -> bool {
        self.yearly_records.iter().any(|r| r.year < threshold)
    }
}

/// Sorts newest season first and drops repeated years, keeping the first row seen.
pub fn sort_newest_first(records: &mut Vec<YearlyRecord>) {
    let mut seen = std::collections::HashSet::new();
    records.retain(|r| seen.insert(r.year));
    records.sort_by(|a, b| b.year.cmp(&a.year));
}
