// Optional clipboard support. The "show current cookie" screen copies the
// cookie when a system clipboard is available; builds without the
// `clipboard` feature just print a hint instead.

use anyhow::Result;

/// A place the UI can put text for the user to paste elsewhere.
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<()>;
}

#[cfg(feature = "clipboard")]
struct SystemClipboard(arboard::Clipboard);

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        use anyhow::Context;
        self.0
            .set_text(text.to_string())
            .context("Failed to copy to clipboard")
    }
}

/// The system clipboard, if this build supports one and it can be opened.
#[cfg(feature = "clipboard")]
pub fn system_clipboard() -> Option<Box<dyn Clipboard>> {
    match arboard::Clipboard::new() {
        Ok(cb) => Some(Box::new(SystemClipboard(cb))),
        Err(e) => {
            tracing::debug!(error = %e, "clipboard unavailable");
            None
        }
    }
}

#[cfg(not(feature = "clipboard"))]
pub fn system_clipboard() -> Option<Box<dyn Clipboard>> {
    None
}
