//! Platform share interface.
//!
//! A terminal has no native share sheet, so the default implementation places
//! the message on the system clipboard.

use clipboard::{ClipboardContext, ClipboardProvider};
use log::*;

/// Accepts a message and a title and hands them to the platform.
///
pub trait Share: Send + Sync {
    fn share(&self, message: &str, title: &str) -> Result<(), String>;
}

/// Copies shared messages to the system clipboard.
///
#[derive(Debug, Default)]
pub struct ClipboardShare;

impl Share for ClipboardShare {
    fn share(&self, message: &str, title: &str) -> Result<(), String> {
        let mut ctx: ClipboardContext = ClipboardProvider::new().map_err(|e| e.to_string())?;
        ctx.set_contents(message.to_owned())
            .map_err(|e| e.to_string())?;
        info!("Copied '{}' to clipboard", title);
        Ok(())
    }
}

/// Share the message, logging any failure instead of returning it.
///
pub fn share_or_log(sharer: &dyn Share, message: &str, title: &str) {
    if let Err(e) = sharer.share(message, title) {
        warn!("Failed to share '{}': {}", title, e);
    }
}
