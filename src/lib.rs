// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive menu.
//
// Module responsibilities:
// - `store`: the saved accounts, their JSON file and the text export.
// - `api`: checks a cookie against the Roblox users API.
// - `config`: paths, API URL and timeout, from flags or environment.
// - `clipboard`: optional copy-to-clipboard used by the menu.
// - `interrupt`: Ctrl-C handler that restores the terminal before exiting.
// - `ui`: terminal menu flows that call into the modules above.
pub mod api;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod interrupt;
pub mod store;
pub mod ui;

pub use error::{StoreError, StoreResult};
pub use store::{AccountEntry, AccountRecord, AccountStore};
