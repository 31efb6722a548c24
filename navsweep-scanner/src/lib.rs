pub mod browser;
pub mod error;
pub mod extract;
pub mod resolver;
pub mod result;

pub use browser::{Browser, BrowsingContext, HttpBrowser};
pub use error::ScanError;
pub use extract::{MenuSelectors, MenuSnapshot, NavEntry};
pub use resolver::{ResolvedLink, resolve_url};
pub use result::NavigationOutcome;
