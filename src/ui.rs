// UI layer: the numbered text menu. Each screen clears the terminal, runs
// one store or API operation and waits for Enter before going back.

use crate::api::{looks_like_roblosecurity, CookieValidator};
use crate::clipboard::system_clipboard;
use crate::config::{Config, DEFAULT_EXPORT_FILE};
use crate::store::{format_timestamp, AccountStore};
use anyhow::Result;
use crossterm::{cursor::MoveTo, execute, terminal::Clear, terminal::ClearType};
use dialoguer::{Confirm, Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

const BANNER_RULE: usize = 50;
const SECTION_RULE: usize = 40;
/// Cookies longer than this are shortened after switching accounts.
const PREVIEW_CHARS: usize = 50;

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Remove,
    Switch,
    List,
    ShowCurrent,
    Export,
    Validate,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 8] = [
        MenuChoice::Add,
        MenuChoice::Remove,
        MenuChoice::Switch,
        MenuChoice::List,
        MenuChoice::ShowCurrent,
        MenuChoice::Export,
        MenuChoice::Validate,
        MenuChoice::Exit,
    ];

    /// Parse the number typed at the menu prompt (1-8).
    pub fn parse(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Add => "Add account",
            MenuChoice::Remove => "Remove account",
            MenuChoice::Switch => "Switch account",
            MenuChoice::List => "List accounts",
            MenuChoice::ShowCurrent => "Show current cookie",
            MenuChoice::Export => "Export cookies",
            MenuChoice::Validate => "Check cookie validity",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// Main interactive menu. Runs until the user picks "Exit".
pub fn main_menu(
    config: &Config,
    mut store: AccountStore,
    api: &impl CookieValidator,
) -> Result<()> {
    loop {
        clear_screen()?;
        println!("{}", "=".repeat(BANNER_RULE));
        println!("ROBLOX ACCOUNT MANAGER");
        println!("{}", "=".repeat(BANNER_RULE));
        println!();
        for (i, choice) in MenuChoice::ALL.iter().enumerate() {
            println!("{}. {}", i + 1, choice.label());
        }
        println!();

        let input: String = Input::new()
            .with_prompt("Choose an action (1-8)")
            .allow_empty(true)
            .interact_text()?;

        let Some(choice) = MenuChoice::parse(&input) else {
            println!("Invalid choice!");
            pause()?;
            continue;
        };

        clear_screen()?;
        match choice {
            MenuChoice::Add => handle_add(&mut store)?,
            MenuChoice::Remove => handle_remove(&mut store)?,
            MenuChoice::Switch => handle_switch(&mut store)?,
            MenuChoice::List => print_accounts(&store),
            MenuChoice::ShowCurrent => handle_show_current(&store),
            MenuChoice::Export => handle_export(config, &store)?,
            MenuChoice::Validate => handle_validate(&store, api)?,
            MenuChoice::Exit => {
                println!("Goodbye.");
                return Ok(());
            }
        }
        pause()?;
    }
}

fn handle_add(store: &mut AccountStore) -> Result<()> {
    section("ADD ACCOUNT");
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    // `Password` keeps the cookie off the screen.
    let cookie: String = Password::new().with_prompt(".ROBLOSECURITY cookie").interact()?;
    let cookie = cookie.trim();

    if !looks_like_roblosecurity(cookie) {
        println!("Warning: this does not look like a standard .ROBLOSECURITY cookie!");
        let keep = Confirm::new()
            .with_prompt("Add it anyway?")
            .default(false)
            .interact()?;
        if !keep {
            return Ok(());
        }
    }

    let notes: String = Input::new()
        .with_prompt("Notes (optional)")
        .allow_empty(true)
        .interact_text()?;

    let username = username.trim();
    match store.add(username, cookie, notes.trim()) {
        Ok(()) => println!("Account {username} added."),
        Err(e) => println!("Could not add account: {e}"),
    }
    Ok(())
}

fn handle_remove(store: &mut AccountStore) -> Result<()> {
    section("REMOVE ACCOUNT");
    print_accounts(store);
    if store.is_empty() {
        return Ok(());
    }
    let username: String = Input::new().with_prompt("Username to remove").interact_text()?;
    match store.remove(username.trim()) {
        Ok(_) => println!("Account {} removed.", username.trim()),
        Err(e) => println!("Could not remove account: {e}"),
    }
    Ok(())
}

fn handle_switch(store: &mut AccountStore) -> Result<()> {
    section("SWITCH ACCOUNT");
    print_accounts(store);
    if store.is_empty() {
        return Ok(());
    }
    let username: String = Input::new().with_prompt("Username to switch to").interact_text()?;
    let username = username.trim();
    match store.select(username) {
        Ok(record) => {
            println!("Switched to {username}");
            println!("\nCurrent cookie for {username}:");
            println!("{}", "-".repeat(SECTION_RULE));
            println!("{}", preview(&record.credential));
        }
        Err(e) => println!("Could not switch account: {e}"),
    }
    Ok(())
}

fn handle_show_current(store: &AccountStore) {
    let Some(cookie) = store.current_credential() else {
        println!("No account selected!");
        return;
    };
    section("CURRENT COOKIE");
    println!("{cookie}");

    match system_clipboard() {
        Some(mut clipboard) => match clipboard.copy(cookie) {
            Ok(()) => println!("\nCookie copied to clipboard."),
            Err(e) => println!("\n{e:#}"),
        },
        None => println!("\nRebuild with the `clipboard` feature to copy cookies automatically."),
    }
}

fn handle_export(config: &Config, store: &AccountStore) -> Result<()> {
    let name: String = Input::new()
        .with_prompt(format!("Export file name (default: {DEFAULT_EXPORT_FILE})"))
        .allow_empty(true)
        .interact_text()?;
    let path = config.export_path(&name);
    match store.export_all(&path) {
        Ok(count) => println!("Exported {count} cookie(s) to {}", path.display()),
        Err(e) => println!("Export failed: {e}"),
    }
    Ok(())
}

fn handle_validate(store: &AccountStore, api: &impl CookieValidator) -> Result<()> {
    section("CHECK COOKIE VALIDITY");
    let input: String = Password::new()
        .with_prompt("Cookie to check (empty: current account)")
        .allow_empty_password(true)
        .interact()?;

    let cookie = if input.trim().is_empty() {
        match store.current_credential() {
            Some(cookie) => cookie.to_string(),
            None => {
                println!("No cookie given and no account selected.");
                return Ok(());
            }
        }
    } else {
        input
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Checking cookie...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let valid = api.validate(&cookie);
    spinner.finish_and_clear();

    if valid {
        println!("✓ Cookie is valid!");
    } else {
        println!("✗ Cookie is invalid or expired");
    }
    Ok(())
}

/// Print the saved accounts, newest last, marking the current one.
pub fn print_accounts(store: &AccountStore) {
    if store.is_empty() {
        println!("No saved accounts");
        return;
    }
    println!("\n{}", "=".repeat(BANNER_RULE));
    println!("SAVED ACCOUNTS:");
    println!("{}", "=".repeat(BANNER_RULE));
    for entry in store.list() {
        let current = if entry.is_selected { " ← CURRENT" } else { "" };
        let added = entry
            .record
            .added_at
            .as_ref()
            .map_or_else(|| "Unknown".to_string(), format_timestamp);
        let last_used = entry
            .record
            .last_used_at
            .map_or_else(|| "Never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());

        println!("{}. {}{}", entry.index, entry.name, current);
        println!("   Added: {added}");
        println!("   Last used: {last_used}");
        if !entry.record.notes.is_empty() {
            println!("   Notes: {}", entry.record.notes);
        }
        println!();
    }
}

/// First `PREVIEW_CHARS` characters of a cookie, with `...` when cut.
pub fn preview(cookie: &str) -> String {
    match cookie.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &cookie[..cut]),
        None => cookie.to_string(),
    }
}

fn section(title: &str) {
    println!("{title}");
    println!("{}", "-".repeat(SECTION_RULE));
}

fn pause() -> Result<()> {
    let _: String = Input::new()
        .with_prompt("Press Enter to continue")
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}

fn clear_screen() -> io::Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
}
