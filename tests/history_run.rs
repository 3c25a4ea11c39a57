use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use anyhow::{Result, anyhow};
use cfb_history::config::DelayConfig;
use cfb_history::fetch::SchoolPageSource;
use cfb_history::history_run::{FailureReason, HistoryRun, RunMode, Sleeper, TeamOutcome};
use cfb_history::persist::HistoryStore;
use cfb_history::records::{HistoryDocument, YearlyRecord};
use cfb_history::registry::{Registry, TeamEntry};
use tempfile::tempdir;

/// Serves canned pages by external id; ids without a page answer with HTTP 404.
#[derive(Default)]
struct ScriptedPages {
    pages: HashMap<String, String>,
    requested: RefCell<Vec<String>>,
}

impl ScriptedPages {
    fn with_page(mut self, external_id: &str, html: String) -> Self {
        self.pages.insert(external_id.to_string(), html);
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl SchoolPageSource for ScriptedPages {
    fn fetch_page(&self, external_id: &str) -> Result<String> {
        self.requested.borrow_mut().push(external_id.to_string());
        self.pages
            .get(external_id)
            .cloned()
            .ok_or_else(|| anyhow!("http 404 Not Found for {external_id}"))
    }
}

#[derive(Default)]
struct RecordingSleeper {
    pauses: Vec<Duration>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}

fn season_page(years: &[u16]) -> String {
    let rows = years
        .iter()
        .map(|year| {
            format!(
                r#"<tr><th data-stat="year_id"><a href="/y">{year}</a></th>
                <td data-stat="wins">8</td><td data-stat="losses">4</td>
                <td data-stat="coaches"><a href="/c">Some Coach</a> (8-4)</td>
                <td data-stat="bowl_name" csk="ZZZ"></td></tr>"#
            )
        })
        .collect::<String>();
    format!("<html><body><table><tbody>{rows}</tbody></table></body></html>")
}

fn test_registry() -> Registry {
    Registry::new(vec![
        TeamEntry::new("alpha", "alpha-sr", "Alpha Tigers"),
        TeamEntry::new("georgia", "georgia-bulldogs-sr-id", "Georgia Bulldogs"),
        TeamEntry::new("gamma", "gamma-sr", "Gamma Owls"),
    ])
    .expect("valid registry")
}

fn fixed_delay() -> DelayConfig {
    DelayConfig {
        base: Duration::from_millis(1500),
        jitter: Duration::ZERO,
    }
}

fn runner<'a>(
    registry: &'a Registry,
    source: &'a ScriptedPages,
    store: &'a HistoryStore,
) -> HistoryRun<'a> {
    HistoryRun {
        registry,
        source,
        store,
        min_year: 1900,
        full_history_year: 1960,
        delay: fixed_delay(),
    }
}

fn stored_doc(slug: &str, years: &[u16]) -> HistoryDocument {
    HistoryDocument {
        team_id: slug.to_string(),
        team_slug: slug.to_string(),
        team_name: slug.to_string(),
        yearly_records: years
            .iter()
            .map(|year| YearlyRecord {
                year: *year,
                wins: 1,
                losses: 1,
                conf_wins: 0,
                conf_losses: 0,
                ap_pre: None,
                ap_post: None,
                cfp_final: None,
                coach: "Unknown".to_string(),
                bowl: None,
            })
            .collect(),
    }
}

#[test]
fn full_run_counts_each_outcome_and_continues_after_failures() {
    let dir = tempdir().expect("tempdir");
    let store = HistoryStore::new(dir.path());
    let registry = test_registry();
    let source = ScriptedPages::default()
        .with_page("alpha-sr", season_page(&[2023, 2022, 1955]))
        .with_page("gamma-sr", "<html><body>no table</body></html>".to_string());

    let mut sleeper = RecordingSleeper::default();
    let summary = runner(&registry, &source, &store)
        .run(&RunMode::default(), &mut sleeper)
        .expect("run");

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.seasons_written, 3);
    assert_eq!(summary.total(), 3);
    assert_eq!(
        source.requested(),
        vec!["alpha-sr", "georgia-bulldogs-sr-id", "gamma-sr"]
    );

    assert!(matches!(
        summary.outcomes[1].1,
        TeamOutcome::Failed(FailureReason::Fetch(ref msg)) if msg.contains("404")
    ));
    assert_eq!(
        summary.outcomes[2].1,
        TeamOutcome::Failed(FailureReason::NoRecords)
    );
    assert!(!store.path_for("georgia").exists());
    assert!(!store.path_for("gamma").exists());

    // Pauses only between teams, never after the last one.
    assert_eq!(sleeper.pauses, vec![Duration::from_millis(1500); 2]);
}

#[test]
fn zero_record_parse_leaves_previous_document_untouched() {
    let dir = tempdir().expect("tempdir");
    let store = HistoryStore::new(dir.path());
    let registry = test_registry();
    store.save(&stored_doc("gamma", &[1999])).expect("seed");
    let before = fs::read_to_string(store.path_for("gamma")).expect("read");

    let source = ScriptedPages::default().with_page("gamma-sr", season_page(&[1850]));
    let summary = runner(&registry, &source, &store)
        .run(&RunMode::SingleTeam("gamma".to_string()), &mut RecordingSleeper::default())
        .expect("run");

    assert_eq!(summary.failed, 1);
    assert_eq!(fs::read_to_string(store.path_for("gamma")).expect("read"), before);
}

#[test]
fn single_team_mode_skips_delay_and_other_teams() {
    let dir = tempdir().expect("tempdir");
    let store = HistoryStore::new(dir.path());
    let registry = test_registry();
    let source = ScriptedPages::default().with_page("gamma-sr", season_page(&[2020]));

    let mut sleeper = RecordingSleeper::default();
    let summary = runner(&registry, &source, &store)
        .run(&RunMode::SingleTeam("gamma".to_string()), &mut sleeper)
        .expect("run");

    assert_eq!(summary.succeeded, 1);
    assert_eq!(source.requested(), vec!["gamma-sr"]);
    assert!(sleeper.pauses.is_empty());
}

#[test]
fn unknown_slugs_are_errors() {
    let dir = tempdir().expect("tempdir");
    let store = HistoryStore::new(dir.path());
    let registry = test_registry();
    let source = ScriptedPages::default();
    let run = runner(&registry, &source, &store);

    assert!(
        run.run(&RunMode::SingleTeam("nope".to_string()), &mut RecordingSleeper::default())
            .is_err()
    );
    let resume = RunMode::Registry {
        start_from: Some("nope".to_string()),
        skip_existing: false,
    };
    assert!(run.run(&resume, &mut RecordingSleeper::default()).is_err());
    assert!(source.requested().is_empty());
}

#[test]
fn resume_starts_at_given_slug() {
    let dir = tempdir().expect("tempdir");
    let store = HistoryStore::new(dir.path());
    let registry = test_registry();
    let source = ScriptedPages::default()
        .with_page("georgia-bulldogs-sr-id", season_page(&[2021]))
        .with_page("gamma-sr", season_page(&[2021]));

    let mode = RunMode::Registry {
        start_from: Some("georgia".to_string()),
        skip_existing: false,
    };
    let mut sleeper = RecordingSleeper::default();
    let summary = runner(&registry, &source, &store)
        .run(&mode, &mut sleeper)
        .expect("run");

    assert_eq!(source.requested(), vec!["georgia-bulldogs-sr-id", "gamma-sr"]);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(sleeper.pauses.len(), 1);
}

#[test]
fn skip_existing_only_skips_full_histories() {
    let dir = tempdir().expect("tempdir");
    let store = HistoryStore::new(dir.path());
    let registry = test_registry();
    store.save(&stored_doc("alpha", &[2020, 1959])).expect("seed");
    store.save(&stored_doc("georgia", &[2020, 1960])).expect("seed");

    let source = ScriptedPages::default()
        .with_page("georgia-bulldogs-sr-id", season_page(&[2021, 1940]))
        .with_page("gamma-sr", season_page(&[2021]));

    let mode = RunMode::Registry {
        start_from: None,
        skip_existing: true,
    };
    let summary = runner(&registry, &source, &store)
        .run(&mode, &mut RecordingSleeper::default())
        .expect("run");

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.outcomes[0], ("alpha".to_string(), TeamOutcome::Skipped));
    assert_eq!(source.requested(), vec!["georgia-bulldogs-sr-id", "gamma-sr"]);
    assert_eq!(summary.succeeded, 2);
}

#[test]
fn rerun_keeps_team_id_and_is_idempotent() {
    let dir = tempdir().expect("tempdir");
    let store = HistoryStore::new(dir.path());
    let registry = test_registry();
    let mut existing = stored_doc("georgia", &[1999]);
    existing.team_id = "georgia".to_string();
    store.save(&existing).expect("seed");

    let source =
        ScriptedPages::default().with_page("georgia-bulldogs-sr-id", season_page(&[2022, 2023, 1950]));
    let run = runner(&registry, &source, &store);
    let mode = RunMode::SingleTeam("georgia".to_string());

    run.run(&mode, &mut RecordingSleeper::default()).expect("first run");
    let first = fs::read_to_string(store.path_for("georgia")).expect("read");
    run.run(&mode, &mut RecordingSleeper::default()).expect("second run");
    let second = fs::read_to_string(store.path_for("georgia")).expect("read");
    assert_eq!(first, second);

    let doc = store.load("georgia").expect("stored");
    assert_eq!(doc.team_id, "georgia");
    assert_eq!(doc.team_name, "Georgia Bulldogs");
    assert_eq!(
        doc.yearly_records.iter().map(|r| r.year).collect::<Vec<_>>(),
        vec![2023, 2022, 1950]
    );
}

fn skip_existing_mode() -> RunMode {
    RunMode::Registry {
        start_from: None,
        skip_existing: true,
    }
}

#[test]
fn skip_existing_reads_years_from_partial_documents() {
    let dir = tempdir().expect("tempdir");
    let store = HistoryStore::new(dir.path());
    let registry = test_registry();
    fs::write(
        store.path_for("alpha"),
        r#"{"teamId":"a","teamSlug":"alpha","teamName":"Alpha","yearlyRecords":[{"year":1950,"wins":5,"losses":5}]}"#,
    )
    .expect("seed");

    let source = ScriptedPages::default()
        .with_page("georgia-bulldogs-sr-id", season_page(&[2021]))
        .with_page("gamma-sr", season_page(&[2021]));
    let summary = runner(&registry, &source, &store)
        .run(&skip_existing_mode(), &mut RecordingSleeper::default())
        .expect("run");

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.outcomes[0], ("alpha".to_string(), TeamOutcome::Skipped));
    assert!(!source.requested().contains(&"alpha-sr".to_string()));
}

#[test]
fn unwritable_store_fails_every_team_but_keeps_going() {
    let dir = tempdir().expect("tempdir");
    let not_a_dir = dir.path().join("data");
    fs::write(&not_a_dir, "plain file").expect("seed");
    let store = HistoryStore::new(&not_a_dir);
    let registry = test_registry();
    let source = ScriptedPages::default()
        .with_page("alpha-sr", season_page(&[2021]))
        .with_page("georgia-bulldogs-sr-id", season_page(&[2021]))
        .with_page("gamma-sr", season_page(&[2021]));

    let summary = runner(&registry, &source, &store)
        .run(&RunMode::default(), &mut RecordingSleeper::default())
        .expect("run");

    assert_eq!(summary.failed, registry.len());
    assert_eq!(summary.succeeded, 0);
    assert!(summary.outcomes.iter().all(|(_, outcome)| matches!(
        outcome,
        TeamOutcome::Failed(FailureReason::Write(_))
    )));
    assert_eq!(
        source.requested(),
        vec!["alpha-sr", "georgia-bulldogs-sr-id", "gamma-sr"]
    );
}

#[test]
fn skipped_tail_adds_no_pause() {
    let dir = tempdir().expect("tempdir");
    let store = HistoryStore::new(dir.path());
    let registry = Registry::new(vec![
        TeamEntry::new("alpha", "alpha-sr", "Alpha Tigers"),
        TeamEntry::new("georgia", "georgia-bulldogs-sr-id", "Georgia Bulldogs"),
    ])
    .expect("valid registry");
    store.save(&stored_doc("georgia", &[2020, 1940])).expect("seed");

    let source = ScriptedPages::default().with_page("alpha-sr", season_page(&[2021]));
    let mut sleeper = RecordingSleeper::default();
    let summary = runner(&registry, &source, &store)
        .run(&skip_existing_mode(), &mut sleeper)
        .expect("run");

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.skipped, 1);
    assert!(sleeper.pauses.is_empty());
}

#[test]
fn skipped_head_adds_no_pause() {
    let dir = tempdir().expect("tempdir");
    let store = HistoryStore::new(dir.path());
    let registry = test_registry();
    store.save(&stored_doc("alpha", &[2020, 1940])).expect("seed");
    store.save(&stored_doc("georgia", &[2020, 1940])).expect("seed");

    let source = ScriptedPages::default().with_page("gamma-sr", season_page(&[2021]));
    let mut sleeper = RecordingSleeper::default();
    let summary = runner(&registry, &source, &store)
        .run(&skip_existing_mode(), &mut sleeper)
        .expect("run");

    assert_eq!(summary.skipped, 2);
    assert_eq!(source.requested(), vec!["gamma-sr"]);
    assert!(sleeper.pauses.is_empty());
}
