use clap::Parser;
use snaphide::cli::commands::{cmd_list, cmd_restore, cmd_restore_all, cmd_websites};
use snaphide::cli::config::{Cli, Commands, load_config};
use snaphide::store::store::ElementStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve store path: CLI > config > default
    let store_path = cli
        .storage
        .as_deref()
        .unwrap_or(config.storage.path.as_str());
    let mut store = ElementStore::open(store_path);

    match cli.command {
        Commands::Websites => {
            cmd_websites(&store, cli.verbose)?;
        }
        Commands::List { hostname } => {
            cmd_list(&store, &hostname)?;
        }
        Commands::Restore { hostname, id } => {
            cmd_restore(&mut store, &hostname, &id)?;
        }
        Commands::RestoreAll { hostname } => {
            cmd_restore_all(&mut store, &hostname)?;
        }
    }

    Ok(())
}
