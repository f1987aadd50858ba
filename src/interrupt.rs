// Ctrl-C handling. Prompts either run the terminal in raw mode or turn echo
// off, and a plain SIGINT would leave it that way. The handler puts the
// terminal back the way it was at startup, says goodbye and exits 0.

use anyhow::{Context, Result};
use crossterm::{cursor, execute};
use std::io::{self, Write};

pub const FAREWELL: &str = "Program terminated by user";

/// Terminal settings captured before the first prompt.
pub struct TerminalState {
    #[cfg(unix)]
    termios: Option<nix::sys::termios::Termios>,
}

impl TerminalState {
    /// Snapshot stdin's terminal settings. Holds nothing when stdin is not
    /// a terminal.
    pub fn capture() -> Self {
        #[cfg(unix)]
        {
            use std::os::fd::AsFd;
            TerminalState {
                termios: nix::sys::termios::tcgetattr(io::stdin().as_fd()).ok(),
            }
        }
        #[cfg(not(unix))]
        {
            TerminalState {}
        }
    }

    /// Re-apply the captured settings, bringing back echo and line mode.
    pub fn restore(&self) -> io::Result<()> {
        #[cfg(unix)]
        if let Some(termios) = &self.termios {
            use nix::sys::termios::{tcsetattr, SetArg};
            use std::os::fd::AsFd;
            tcsetattr(io::stdin().as_fd(), SetArg::TCSANOW, termios)?;
        }
        Ok(())
    }
}

/// Restore the terminal, show the cursor and print the farewell to `out`.
pub fn shut_down(state: &TerminalState, out: &mut impl Write) -> io::Result<()> {
    state.restore()?;
    execute!(out, cursor::Show)?;
    writeln!(out, "\n\n{FAREWELL}")?;
    out.flush()
}

/// Install the process-wide Ctrl-C handler. Call once, before any prompt.
pub fn install() -> Result<()> {
    let state = TerminalState::capture();
    ctrlc::set_handler(move || {
        let mut stdout = io::stdout();
        if let Err(e) = shut_down(&state, &mut stdout) {
            tracing::debug!(error = %e, "terminal restore failed");
        }
        std::process::exit(0);
    })
    .context("Failed to install Ctrl-C handler")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shut_down_shows_cursor_and_says_goodbye() {
        let mut out = Vec::new();
        shut_down(&TerminalState::capture(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[?25h"));
        assert!(text.ends_with("\n\nProgram terminated by user\n"));
    }

    #[test]
    fn restoring_captured_state_is_harmless() {
        let state = TerminalState::capture();
        state.restore().unwrap();
        state.restore().unwrap();
    }
}
