use anyhow::{Context, Result};

use cfb_history::cli::{USAGE, parse_args};
use cfb_history::config::{HistoryConfig, load_dotenv};
use cfb_history::fetch::HttpSchoolPages;
use cfb_history::history_run::{FailureReason, HistoryRun, RunMode, ThreadSleeper};
use cfb_history::logging::init_logging;
use cfb_history::persist::HistoryStore;
use cfb_history::registry::Registry;

fn main() -> Result<()> {
    load_dotenv();
    init_logging();

    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let mut cfg = HistoryConfig::from_env();
    args.apply_to(&mut cfg);

    let registry = match &cfg.registry_path {
        Some(path) => Registry::from_json_file(path)?,
        None => Registry::builtin(),
    };

    if args.list_teams {
        for team in registry.entries() {
            println!("{},{},{}", team.slug, team.external_id, team.display_name);
        }
        return Ok(());
    }

    let source = HttpSchoolPages::new(&cfg).context("unable to set up fetcher")?;
    let store = HistoryStore::new(&cfg.data_dir);
    let run = HistoryRun {
        registry: &registry,
        source: &source,
        store: &store,
        min_year: cfg.min_year,
        full_history_year: cfg.full_history_year,
        delay: cfg.delay,
    };

    let teams_label = match &args.mode {
        RunMode::SingleTeam(slug) => slug.clone(),
        RunMode::Registry { .. } => format!("{} in registry", registry.len()),
    };
    println!("Fetching full history ({teams_label}) into {}", store.dir().display());

    let summary = run.run(&args.mode, &mut ThreadSleeper)?;

    println!();
    println!("History fetch complete");
    println!(
        "Elapsed: {}s",
        (summary.finished_at - summary.started_at).num_seconds()
    );
    println!("Succeeded: {}", summary.succeeded);
    println!("Failed: {}", summary.failed);
    println!("Skipped: {}", summary.skipped);
    println!("Seasons written: {}", summary.seasons_written);

    let failures = summary.failures().collect::<Vec<_>>();
    if !failures.is_empty() {
        println!("Failures:");
        for (slug, reason) in failures {
            let detail = match reason {
                FailureReason::Fetch(err) => format!("fetch: {err}"),
                FailureReason::NoRecords => "no records found".to_string(),
                FailureReason::Write(err) => format!("write: {err}"),
            };
            println!("   - {slug}: {detail}");
        }
    }

    Ok(())
}
