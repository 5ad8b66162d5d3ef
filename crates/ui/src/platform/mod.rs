use std::sync::Arc;

mod opener;

/// Hands a URL to the operating system's browser.
pub trait UiLinkOpener: Send + Sync {
    fn open_url(&self, url: &str);
}

pub type LinkOpenerRef = Arc<dyn UiLinkOpener>;

pub use opener::{DesktopLinkOpener, NoopLinkOpener};
