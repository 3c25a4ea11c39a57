use std::path::PathBuf;

use anyhow::Result;

use cfb_history::config::{HistoryConfig, load_dotenv};
use cfb_history::history_audit::audit_store;
use cfb_history::logging::init_logging;
use cfb_history::persist::HistoryStore;
use cfb_history::registry::Registry;

fn main() -> Result<()> {
    load_dotenv();
    init_logging();

    let mut cfg = HistoryConfig::from_env();
    if let Some(dir) = parse_path_arg("--data-dir") {
        cfg.data_dir = dir;
    }
    if let Some(path) = parse_path_arg("--registry") {
        cfg.registry_path = Some(path);
    }

    let registry = match &cfg.registry_path {
        Some(path) => Registry::from_json_file(path)?,
        None => Registry::builtin(),
    };
    let store = HistoryStore::new(&cfg.data_dir);
    let report = audit_store(&registry, &store, cfg.full_history_year);

    println!("History audit");
    println!("Data dir: {}", store.dir().display());
    println!("Stored: {}/{}", report.stored.len(), registry.len());
    println!(
        "Full history (before {}): {}",
        cfg.full_history_year,
        report.full_count()
    );
    println!("Seasons: {}", report.total_seasons());

    for team in &report.stored {
        println!(
            "{:<22} {:>4} seasons  {}-{}{}",
            team.slug,
            team.seasons,
            team.earliest.map(|y| y.to_string()).unwrap_or_else(|| "n/a".into()),
            team.latest.map(|y| y.to_string()).unwrap_or_else(|| "n/a".into()),
            if team.full_history { "" } else { "  (partial)" }
        );
    }
    if !report.missing.is_empty() {
        println!("Missing: {}", report.missing.len());
        for slug in &report.missing {
            println!("   - {slug}");
        }
    }

    Ok(())
}

fn parse_path_arg(name: &str) -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}
