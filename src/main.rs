// Entrypoint for the CLI application.
// - Keeps `main` small: read the config, open the store, build the API
//   client and hand everything to the menu loop.
// - Ctrl-C anywhere ends the program with a short message; see
//   `interrupt`.

use clap::Parser;
use dialoguer::Input;
use roblox_account_cli::{
    api::ApiClient,
    config::{Cli, Config},
    interrupt,
    store::AccountStore,
    ui::main_menu,
};
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr and stay quiet unless RUST_LOG asks for more.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    interrupt::install()?;
    let config = Config::from_cli(Cli::parse())?;
    tracing::debug!(?config, "starting");

    match run(&config) {
        Ok(()) => Ok(()),
        Err(e) => {
            println!("\nAn error occurred: {e:#}");
            // The process exits right after; a second failure here changes nothing.
            let _ = Input::<String>::new()
                .with_prompt("Press Enter to exit")
                .allow_empty(true)
                .interact_text();
            Err(e)
        }
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    let store = AccountStore::load(&config.data_file);
    let api = ApiClient::from_config(config)?;
    // Start the interactive menu. This call blocks until the user exits.
    main_menu(config, store, &api)
}
