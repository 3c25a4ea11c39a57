use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::records::{HistoryDocument, YearlyRecord};
use crate::registry::TeamEntry;

/// Flat directory of `<slug>.json` history documents.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}.json"))
    }

    /// Reads a stored document. Missing or malformed files yield `None`.
    pub fn load(&self, slug: &str) -> Option<HistoryDocument> {
        let raw = fs::read_to_string(self.path_for(slug)).ok()?;
        serde_json::from_str::<HistoryDocument>(&raw).ok()
    }

    /// `teamId` of the stored document, if one exists and carries a usable value.
    pub fn existing_team_id(&self, slug: &str) -> Option<String> {
        let raw = fs::read_to_string(self.path_for(slug)).ok()?;
        let value: Value = serde_json::from_str(&raw).ok()?;
        value
            .get("teamId")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    /// Season years of the stored document, read without requiring the full record shape.
    pub fn stored_years(&self, slug: &str) -> Option<Vec<u16>> {
        let raw = fs::read_to_string(self.path_for(slug)).ok()?;
        let value: Value = serde_json::from_str(&raw).ok()?;
        let records = value.get("yearlyRecords")?.as_array()?;
        Some(
            records
                .iter()
                .filter_map(|r| r.get("year")?.as_u64())
                .filter_map(|year| u16::try_from(year).ok())
                .collect(),
        )
    }

    /// True when the stored document has any season before `threshold`.
    pub fn has_full_history(&self, slug: &str, threshold: u16) -> bool {
        self.stored_years(slug)
            .is_some_and(|years| years.iter().any(|year| *year < threshold))
    }

    /// Replaces the team's document with `records`, keeping any prior `teamId`.
    pub fn write_team(&self, team: &TeamEntry, records: Vec<YearlyRecord>) -> Result<HistoryDocument> {
        let team_id = self
            .existing_team_id(&team.slug)
            .unwrap_or_else(|| team.external_id.clone());
        let doc = HistoryDocument {
            team_id,
            team_slug: team.slug.clone(),
            team_name: team.display_name.clone(),
            yearly_records: records,
        };
        self.save(&doc)?;
        Ok(doc)
    }

    pub fn save(&self, doc: &HistoryDocument) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create data dir {}", self.dir.display()))?;
        let path = self.path_for(&doc.team_slug);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(doc).context("serialize history document")?;
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("swap {}", path.display()))?;
        debug!(path = %path.display(), seasons = doc.yearly_records.len(), "wrote history");
        Ok(())
    }
}
