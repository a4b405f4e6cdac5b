use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use zumen::api::{BatchTotals, ZumenApi};
use zumen::config::ZumenConfig;
use zumen::error::{Result, ZumenError};
use zumen::model::MachineType;
use zumen::store::fs::FileStore;

mod args;
mod cli;

use args::{Cli, Commands};
use cli::print::{
    print_drawings, print_messages, print_migration_details, print_report,
    print_residual_folders, print_totals,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: ZumenApi<FileStore>,
    config: ZumenConfig,
    config_dir: PathBuf,
    verbose: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::List => handle_list(&ctx),
        Commands::Audit { ids, all } => handle_audit(&ctx, ids, all),
        Commands::Migrate { machine, ids } => handle_migrate(&mut ctx, machine, ids),
        Commands::Validate { record } => handle_validate(&ctx, record),
        Commands::Normalize {
            ids,
            all,
            dry_run,
            no_backup,
        } => handle_normalize(&mut ctx, ids, all, dry_run, no_backup),
        Commands::Export { ids } => handle_export(&ctx, ids),
        Commands::Config { key, value } => handle_config(&mut ctx, key, value),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let proj_dirs =
        ProjectDirs::from("com", "zumen", "zumen").expect("Could not determine config dir");
    let config_dir = proj_dirs.config_dir().to_path_buf();
    let config = ZumenConfig::load(&config_dir).unwrap_or_default();

    let root = cli
        .root
        .clone()
        .or_else(|| config.data_root.clone())
        .unwrap_or_else(|| proj_dirs.data_dir().join("work-instructions"));

    Ok(AppContext {
        api: ZumenApi::new(FileStore::new(root)),
        config,
        config_dir,
        verbose: cli.verbose,
    })
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_drawings()?;
    print_drawings(&result.listed_drawings);
    print_messages(&result.messages);
    Ok(())
}

fn handle_audit(ctx: &AppContext, ids: Vec<String>, all: bool) -> Result<()> {
    let result = if all {
        ctx.api.audit_all()?
    } else {
        ctx.api.audit(&ids)?
    };
    print_messages(&result.messages);
    print_residual_folders(&result.audits);
    print_totals(&result.totals);
    finish(&result.totals)
}

fn handle_migrate(ctx: &mut AppContext, machine: MachineType, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.migrate(&ids, machine)?;
    print_messages(&result.messages);
    if ctx.verbose {
        print_migration_details(&result.migrations);
    }
    print_totals(&result.totals);
    finish(&result.totals)
}

fn handle_validate(ctx: &AppContext, record: PathBuf) -> Result<()> {
    let result = ctx.api.validate_record(&record)?;
    if let Some(report) = &result.report {
        print_report(report);
    }
    print_messages(&result.messages);
    finish(&result.totals)
}

fn handle_normalize(
    ctx: &mut AppContext,
    ids: Vec<String>,
    all: bool,
    dry_run: bool,
    no_backup: bool,
) -> Result<()> {
    let backup = ctx.config.backup_on_normalize && !no_backup;
    let result = if all {
        ctx.api.normalize_all(dry_run, backup)?
    } else {
        ctx.api.normalize(&ids, dry_run, backup)?
    };
    print_messages(&result.messages);
    print_totals(&result.totals);
    finish(&result.totals)
}

fn handle_export(ctx: &AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.export(&ids)?;
    print_messages(&result.messages);
    print_totals(&result.totals);
    finish(&result.totals)
}

fn handle_config(
    ctx: &mut AppContext,
    key: Option<String>,
    value: Option<String>,
) -> Result<()> {
    match (key, value) {
        (None, _) => {
            for key in ["data_root", "backup_on_normalize"] {
                println!("{}: {}", key, ctx.config.get(key).unwrap_or_default());
            }
            Ok(())
        }
        (Some(key), None) => match ctx.config.get(&key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(ZumenError::Api(format!("Unknown config key: {}", key))),
        },
        (Some(key), Some(value)) => {
            ctx.config.set(&key, &value).map_err(ZumenError::Api)?;
            ctx.config.save(&ctx.config_dir)?;
            println!("{} set to {}", key, value);
            Ok(())
        }
    }
}

fn finish(totals: &BatchTotals) -> Result<()> {
    if totals.is_clean() {
        Ok(())
    } else {
        Err(ZumenError::Api(format!(
            "{} item(s) finished with errors",
            totals.failed
        )))
    }
}
