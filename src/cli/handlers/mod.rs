use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::persist::{self, LoadOutcome};
use crate::io::recovery;
use crate::io::store::FileStore;
use crate::model::config::AppConfig;

/// Default number of recovery entries printed
const DEFAULT_RECOVERY_LIMIT: usize = 10;

/// Config and data directory resolved from the global flags
pub struct Context {
    pub config: AppConfig,
    pub data_dir: PathBuf,
}

/// Read the config file and pick the data directory.
///
/// A missing config file yields the defaults; an unreadable or malformed one
/// is an error.
pub fn load_context(cli: &Cli) -> Result<Context, Box<dyn std::error::Error>> {
    let config_path = cli.config.clone().unwrap_or_else(config_io::config_path);
    let config = config_io::read_config(&config_path)?;
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref(), &config);
    Ok(Context { config, data_dir })
}

/// Run a subcommand. `None` launches the TUI.
pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let ctx = load_context(&cli)?;

    match cli.command {
        None => crate::tui::run(&ctx.data_dir, ctx.config.ui),
        Some(Commands::Show) => cmd_show(&ctx, json),
        Some(Commands::Recovery(args)) => match args.action {
            None => cmd_recovery(&ctx, args.limit, args.since.as_deref(), json),
            Some(RecoveryAction::Prune(prune)) => cmd_recovery_prune(&ctx, prune),
            Some(RecoveryAction::Path) => {
                println!("{}", recovery::recovery_log_path(&ctx.data_dir).display());
                Ok(())
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_show(ctx: &Context, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::in_dir(&ctx.data_dir);
    let outcome = persist::load_board(&store);
    if let LoadOutcome::Recovered { raw, .. } = &outcome
        && let Err(e) = recovery::log_unreadable_board(&ctx.data_dir, raw)
    {
        eprintln!("warning: could not write recovery log: {}", e);
    }
    let board = outcome.into_board();

    if json {
        println!("{}", serde_json::to_string_pretty(&board_to_json(&board))?);
    } else {
        for line in format_board(&board) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_recovery(
    ctx: &Context,
    limit: Option<usize>,
    since: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let since = since.map(parse_timestamp).transpose()?;
    let limit = limit.unwrap_or(DEFAULT_RECOVERY_LIMIT);
    let entries = recovery::read_recovery_entries(&ctx.data_dir, Some(limit), since);

    if json {
        let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("no recovery entries");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        for line in format_recovery_entry(entry) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_recovery_prune(
    ctx: &Context,
    args: RecoveryPruneArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.all && args.before.is_some() {
        return Err("--all and --before cannot be combined".into());
    }
    let before = args.before.as_deref().map(parse_timestamp).transpose()?;
    let removed = recovery::prune_recovery(&ctx.data_dir, before, args.all)?;
    println!(
        "pruned {} recovery {}",
        removed,
        if removed == 1 { "entry" } else { "entries" }
    );
    Ok(())
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as midnight UTC
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid timestamp '{}'", s).into())
}
