use clap::Parser;
use takcontacts::cli::{run_add, run_delete, run_list, run_show, run_update, ui, Cli, Commands, ListArgs};
use takcontacts::{Config, Database};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // -v forces debug; otherwise RUST_LOG, falling back to warnings only
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.db)?;
    tracing::debug!(db = %config.db_path.display(), "using contact store");

    let db = Database::open(&config)?;
    if db.was_reset() {
        ui::warning("the contact store could not be read and was reset; previous contacts are not available");
    }

    match cli.command {
        None => {
            run_list(&db, None, false)?;
        }
        Some(Commands::List(ListArgs { search, json })) => {
            run_list(&db, search.as_deref(), json)?;
        }
        Some(Commands::Show(args)) => {
            run_show(&db, args.id, args.json)?;
        }
        Some(Commands::Add(args)) => {
            run_add(&db, args)?;
        }
        Some(Commands::Edit(args)) => {
            run_update(&db, args)?;
        }
        Some(Commands::Delete(args)) => {
            run_delete(&db, args.id, args.force)?;
        }
    }

    Ok(())
}
