use crate::persist::HistoryStore;
use crate::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTeam {
    pub slug: String,
    pub team_id: String,
    pub seasons: usize,
    pub earliest: Option<u16>,
    pub latest: Option<u16>,
    pub full_history: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    pub stored: Vec<StoredTeam>,
    pub missing: Vec<String>,
}

impl AuditReport {
    pub fn full_count(&self) -> usize {
        self.stored.iter().filter(|t| t.full_history).count()
    }

    pub fn total_seasons(&self) -> usize {
        self.stored.iter().map(|t| t.seasons).sum()
    }
}

/// Summarizes what the store holds for each registry team, in registry order.
/// Unreadable documents are reported as missing.
pub fn audit_store(registry: &Registry, store: &HistoryStore, full_history_year: u16) -> AuditReport {
    let mut report = AuditReport::default();
    for team in registry.entries() {
        let Some(doc) = store.load(&team.slug) else {
            report.missing.push(team.slug.clone());
            continue;
        };
        report.stored.push(StoredTeam {
            slug: team.slug.clone(),
            team_id: doc.team_id.clone(),
            seasons: doc.yearly_records.len(),
            earliest: doc.earliest_year(),
            latest: doc.latest_year(),
            full_history: doc.has_full_history(full_history_year),
        });
    }
    report
}
