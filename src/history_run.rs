use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::DelayConfig;
use crate::fetch::SchoolPageSource;
use crate::history_parse::parse_yearly_records;
use crate::persist::HistoryStore;
use crate::registry::{Registry, TeamEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Exactly one team; no skip, resume or delay handling.
    SingleTeam(String),
    /// Registry order, optionally resuming at `start_from`.
    Registry {
        start_from: Option<String>,
        skip_existing: bool,
    },
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::Registry {
            start_from: None,
            skip_existing: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Fetch(String),
    NoRecords,
    Write(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamOutcome {
    Succeeded { seasons: usize },
    Failed(FailureReason),
    Skipped,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub seasons_written: usize,
    pub outcomes: Vec<(String, TeamOutcome)>,
}

impl RunSummary {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            succeeded: 0,
            failed: 0,
            skipped: 0,
            seasons_written: 0,
            outcomes: Vec::new(),
        }
    }

    fn record(&mut self, slug: &str, outcome: TeamOutcome) {
        match &outcome {
            TeamOutcome::Succeeded { seasons } => {
                self.succeeded += 1;
                self.seasons_written += seasons;
            }
            TeamOutcome::Failed(_) => self.failed += 1,
            TeamOutcome::Skipped => self.skipped += 1,
        }
        self.outcomes.push((slug.to_string(), outcome));
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &FailureReason)> {
        self.outcomes.iter().filter_map(|(slug, outcome)| match outcome {
            TeamOutcome::Failed(reason) => Some((slug.as_str(), reason)),
            _ => None,
        })
    }
}

/// Blocks between teams. Swapped out in tests.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub struct HistoryRun<'a> {
    pub registry: &'a Registry,
    pub source: &'a dyn SchoolPageSource,
    pub store: &'a HistoryStore,
    pub min_year: u16,
    pub full_history_year: u16,
    pub delay: DelayConfig,
}

impl HistoryRun<'_> {
    pub fn run(&self, mode: &RunMode, sleeper: &mut dyn Sleeper) -> Result<RunSummary> {
        let mut summary = RunSummary::new();

        match mode {
            RunMode::SingleTeam(slug) => {
                let team = self
                    .registry
                    .get(slug)
                    .ok_or_else(|| anyhow!("unknown team slug {slug}"))?;
                let outcome = self.process_team(team);
                summary.record(&team.slug, outcome);
            }
            RunMode::Registry {
                start_from,
                skip_existing,
            } => {
                let start = match start_from {
                    Some(slug) => self
                        .registry
                        .position(slug)
                        .ok_or_else(|| anyhow!("unknown start slug {slug}"))?,
                    None => 0,
                };
                let teams = &self.registry.entries()[start..];
                if start > 0 {
                    info!(skipped_before = start, from = %teams[0].slug, "resuming run");
                }

                let mut fetched_any = false;
                for (idx, team) in teams.iter().enumerate() {
                    if *skip_existing && self.has_full_history(&team.slug) {
                        info!(team = %team.slug, "already has full history, skipping");
                        summary.record(&team.slug, TeamOutcome::Skipped);
                        continue;
                    }
                    // Pause only between two requests.
                    if fetched_any {
                        let pause = jittered_delay(self.delay);
                        debug!(millis = pause.as_millis() as u64, "waiting before next team");
                        sleeper.sleep(pause);
                    }
                    fetched_any = true;

                    info!(team = %team.slug, "[{}/{}] processing", idx + 1, teams.len());
                    let outcome = self.process_team(team);
                    summary.record(&team.slug, outcome);
                }
            }
        }

        summary.finished_at = Utc::now();
        Ok(summary)
    }

    fn has_full_history(&self, slug: &str) -> bool {
        self.store.has_full_history(slug, self.full_history_year)
    }

    fn process_team(&self, team: &TeamEntry) -> TeamOutcome {
        let html = match self.source.fetch_page(&team.external_id) {
            Ok(html) => html,
            Err(err) => {
                let msg = format!("{err:#}");
                warn!(team = %team.slug, error = %msg, "fetch failed");
                return TeamOutcome::Failed(FailureReason::Fetch(msg));
            }
        };

        let records = parse_yearly_records(&html, self.min_year);
        if records.is_empty() {
            warn!(team = %team.slug, "No records found");
            return TeamOutcome::Failed(FailureReason::NoRecords);
        }

        match self.store.write_team(team, records) {
            Ok(doc) => {
                info!(
                    team = %team.slug,
                    seasons = doc.yearly_records.len(),
                    earliest = doc.earliest_year().unwrap_or_default(),
                    "saved history"
                );
                TeamOutcome::Succeeded {
                    seasons: doc.yearly_records.len(),
                }
            }
            Err(err) => {
                let msg = format!("{err:#}");
                warn!(team = %team.slug, error = %msg, "write failed");
                TeamOutcome::Failed(FailureReason::Write(msg))
            }
        }
    }
}

pub fn jittered_delay(delay: DelayConfig) -> Duration {
    let jitter_ms = delay.jitter.as_millis() as u64;
    if jitter_ms == 0 {
        return delay.base;
    }
    let extra = rand::thread_rng().gen_range(0..=jitter_ms);
    delay.base + Duration::from_millis(extra)
}
