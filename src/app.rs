//! Application orchestrator.
//! Loads/merges config, initializes logging, installs signal handlers, validates paths,
//! and dispatches the subcommand.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::CommandFactory;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use reorg::cli::{Args, Command, RunFlags};
use reorg::config::{
    active_config_path, create_template_config, ensure_dir, ensure_existing_dir, existing_backup_dirs, load_config,
    validate_and_normalize, BACKUP_DIR_PREFIX, CONFIG_ENV,
};
use reorg::output as out;
use reorg::scaffold::{self, WriteOutcome};
use reorg::{
    prompt, restore_archive, shutdown, Config, ItemStatus, Relocator, ReorgError, RunConfig, RunReport,
};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handled before logging init
    if args.print_config {
        print_config(&args);
        return Ok(());
    }
    let Some(command) = args.command.clone() else {
        Args::command().print_help()?;
        return Ok(());
    };
    if let Command::InitConfig = command {
        return init_config(&args);
    }

    let (mut cfg, cfg_path) = load_config(args.config.as_deref()).inspect_err(|e| {
        out::print_error(&format!("{e:#}"));
    })?;
    args.apply_overrides(&mut cfg);

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current file then stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .context("install Ctrl-C handler")?;
    }

    match &cfg_path {
        Some(p) => debug!(config = %p.display(), "Loaded config"),
        None => debug!("No config file; using built-in defaults"),
    }
    debug!("Starting reorg: {:?}", args);

    let result = validate_and_normalize(&mut cfg).and_then(|()| dispatch(&cfg, command));
    if let Err(e) = &result {
        log_fatal(e);
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }
    result
}

fn dispatch(cfg: &Config, command: Command) -> Result<()> {
    match command {
        Command::Output { files, flags } => {
            let names = if files.is_empty() { cfg.output_files.clone() } else { files };
            let report = relocate_output(cfg, &names, &flags)?;
            finish_run(&report, "Output files")
        }
        Command::Archive { flags } => {
            let report = relocate_archive(cfg, &flags)?;
            finish_run(&report, "Archive")
        }
        Command::Rollback { dry_run, yes } => rollback(cfg, dry_run, yes),
        Command::Gitignore { dry_run, force } => {
            let (path, outcome) = scaffold::write_gitignore(&cfg.project_root, dry_run, force)?;
            match outcome {
                WriteOutcome::Written => out::print_success(&format!("Wrote {}", path.display())),
                WriteOutcome::WouldWrite => out::print_info(&format!("Dry-run: would write {}", path.display())),
                WriteOutcome::Kept => out::print_info(&format!(
                    "{} already exists; use --force to replace it",
                    path.display()
                )),
            }
            Ok(())
        }
        Command::InitConfig => Err(anyhow!("init-config is handled before config loading")),
    }
}

fn print_config(args: &Args) {
    let Some((path, named)) = active_config_path(args.config.as_deref()) else {
        out::print_error("Could not determine a default config path");
        return;
    };
    if named {
        out::print_info(&format!("Using explicit config (--config or {CONFIG_ENV}):\n  {}\n", path.display()));
    } else {
        out::print_info(&format!("Default reorg config path:\n  {}\n", path.display()));
    }
    if path.exists() {
        out::print_info("A config file exists at that location.");
    } else {
        out::print_info("No config file exists there yet; built-in defaults apply. Run `reorg init-config` to create a template.");
    }
}

fn init_config(args: &Args) -> Result<()> {
    let (path, _) = active_config_path(args.config.as_deref())
        .ok_or_else(|| anyhow!("could not determine a config path; pass --config"))?;
    create_template_config(&path).inspect_err(|e| out::print_error(&format!("{e:#}")))?;
    out::print_success(&format!("A template reorg config was written to: {}", path.display()));
    out::print_info("Edit `project_root` and the file lists, then re-run. To use a different location set REORG_CONFIG.");
    Ok(())
}

/// `<project_root>/backup_<YYYYMMDD_HHMMSS>`; created on first use.
fn backup_dir_for_run(cfg: &Config) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    cfg.project_root.join(format!("{BACKUP_DIR_PREFIX}{stamp}"))
}

fn run_config(cfg: &Config, dest: &Path, flags: &RunFlags, extra_excluded: &[PathBuf], backup_dir: &Path) -> RunConfig {
    let mut rc = RunConfig::new(&cfg.project_root, dest);
    rc.dry_run = flags.dry_run;
    rc.copy_mode = flags.copy;
    rc.backup = flags.backup;
    rc.preserve_metadata = cfg.preserve_metadata;
    rc.backup_dir = Some(backup_dir.to_path_buf());
    rc.excluded_paths = cfg.exclude.clone();
    rc.excluded_paths.extend(existing_backup_dirs(&cfg.project_root));
    rc.excluded_paths.extend_from_slice(extra_excluded);
    rc
}

fn relocate_output(cfg: &Config, names: &[String], flags: &RunFlags) -> Result<RunReport> {
    let dest = cfg.output_root();
    ensure_dir(&dest, "output_dir", flags.dry_run)?;
    let rc = run_config(cfg, &dest, flags, &[cfg.archive_root()], &backup_dir_for_run(cfg));
    Relocator::new(rc).run(names)
}

/// One engine run per archive group, merged into one report. The README is
/// written only after a real, uninterrupted run.
fn relocate_archive(cfg: &Config, flags: &RunFlags) -> Result<RunReport> {
    let archive_root = cfg.archive_root();
    ensure_dir(&archive_root, "archive_dir", flags.dry_run)?;
    let backup_dir = backup_dir_for_run(cfg);
    let mut excluded = vec![archive_root.clone(), cfg.output_root()];

    let mut report = RunReport::new();
    for group in &cfg.archive_groups {
        if report.interrupted {
            break;
        }
        let dest = archive_root.join(&group.dir);
        ensure_dir(&dest, "archive group", flags.dry_run)?;
        info!(group = %group.dir.display(), files = group.files.len(), "Archiving group");
        let rc = run_config(cfg, &dest, flags, &excluded, &backup_dir.join(&group.dir));
        let group_report = Relocator::new(rc).run(&group.files)?;

        // A dry-run move leaves the source in place; later groups must not claim it again.
        if flags.dry_run && !flags.copy {
            excluded.extend(
                group_report
                    .outcomes()
                    .iter()
                    .filter(|o| o.status == ItemStatus::WouldMove)
                    .filter_map(|o| o.item.source_path.clone()),
            );
        }
        report.absorb(group_report.qualified(&group.dir));
    }

    if !report.interrupted {
        let (path, outcome) = scaffold::write_archive_readme(
            &archive_root,
            &cfg.archive_groups,
            Local::now().date_naive(),
            flags.dry_run,
        )?;
        if outcome == WriteOutcome::WouldWrite {
            out::print_info(&format!("Dry-run: would write {}", path.display()));
        }
    }
    Ok(report)
}

fn rollback(cfg: &Config, dry_run: bool, yes: bool) -> Result<()> {
    let archive_root = cfg.archive_root();
    let target = cfg.restore_root();
    ensure_existing_dir(&archive_root, "archive_root")?;
    if !dry_run && !yes {
        let question = format!(
            "Copy archived files from '{}' into '{}'?",
            archive_root.display(),
            target.display()
        );
        if !prompt::confirm(&question)? {
            out::print_user("aborted");
            info!("Rollback declined by user");
            return Ok(());
        }
    }
    let report = restore_archive(&archive_root, &target, dry_run)?;
    finish_run(&report, "Rollback")
}

fn finish_run(report: &RunReport, title: &str) -> Result<()> {
    out::print_summary(report, title);
    if report.interrupted {
        return Err(ReorgError::Interrupted.into());
    }
    Ok(())
}

fn log_fatal(e: &anyhow::Error) {
    let Some(re) = e.downcast_ref::<ReorgError>() else {
        error!(error = ?e, "reorg failed");
        return;
    };
    let (code, kind) = (re.code(), re.kind());
    match re {
        ReorgError::RootMissing { path, .. } | ReorgError::NotADirectory { path, .. } => {
            error!(code, kind, path = %path.display(), "{re}")
        }
        ReorgError::InsufficientSpace {
            required,
            available,
            dest,
        } => {
            error!(code, kind, required = *required, available = *available, dest = %dest.display(), "{re}")
        }
        _ => error!(code, kind, "{re}"),
    }
}
