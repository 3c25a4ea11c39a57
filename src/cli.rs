use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};

use crate::config::HistoryConfig;
use crate::history_run::RunMode;

pub const USAGE: &str = "\
Usage: cfb_history [--skip-existing] [--start=<slug>] [--team=<slug>]
                   [--data-dir=<dir>] [--min-year=<year>] [--registry=<file>]
                   [--list-teams]

  --skip-existing   skip teams whose stored history already reaches the full-history year
  --start=<slug>    resume the registry run at <slug>
  --team=<slug>     fetch a single team and exit (no delay)
  --data-dir=<dir>  output directory for <slug>.json documents
  --min-year=<year> ignore seasons before <year>
  --registry=<file> JSON registry override ([{slug, externalId, displayName}])
  --list-teams      print the registry and exit";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub mode: RunMode,
    pub data_dir: Option<PathBuf>,
    pub min_year: Option<u16>,
    pub registry: Option<PathBuf>,
    pub list_teams: bool,
    pub help: bool,
}

impl CliArgs {
    pub fn apply_to(&self, cfg: &mut HistoryConfig) {
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = dir.clone();
        }
        if let Some(year) = self.min_year {
            cfg.min_year = year;
        }
        if let Some(path) = &self.registry {
            cfg.registry_path = Some(path.clone());
        }
    }
}

/// Parses arguments after the program name. Accepts `--flag=value` and `--flag value`.
pub fn parse_args<I, S>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args = args.into_iter().map(Into::into).collect::<Vec<String>>();
    let mut out = CliArgs::default();
    let mut team: Option<String> = None;
    let mut start: Option<String> = None;
    let mut skip_existing = false;

    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx].as_str();
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_string())),
            None => (arg, None),
        };
        let mut value = |name: &str| -> Result<String> {
            let raw = match &inline {
                Some(v) => v.clone(),
                None => {
                    idx += 1;
                    args.get(idx)
                        .cloned()
                        .ok_or_else(|| anyhow!("missing value for {name}"))?
                }
            };
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                bail!("empty value for {name}");
            }
            Ok(trimmed.to_string())
        };

        match flag {
            "--skip-existing" => skip_existing = true,
            "--start" => start = Some(value("--start")?),
            "--team" => team = Some(value("--team")?),
            "--data-dir" => out.data_dir = Some(PathBuf::from(value("--data-dir")?)),
            "--min-year" => {
                let raw = value("--min-year")?;
                out.min_year = Some(
                    raw.parse::<u16>()
                        .with_context(|| format!("invalid --min-year {raw}"))?,
                );
            }
            "--registry" => out.registry = Some(PathBuf::from(value("--registry")?)),
            "--list-teams" => out.list_teams = true,
            "-h" | "--help" => out.help = true,
            other => bail!("unknown argument {other}"),
        }
        idx += 1;
    }

    out.mode = match team {
        Some(slug) => {
            if skip_existing || start.is_some() {
                bail!("--team cannot be combined with --start or --skip-existing");
            }
            RunMode::SingleTeam(slug)
        }
        None => RunMode::Registry {
            start_from: start,
            skip_existing,
        },
    };
    Ok(out)
}
