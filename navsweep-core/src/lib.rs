pub mod config;
pub mod crawl;
pub mod duplicates;
pub mod matcher;
pub mod report;

pub use config::{CrawlConfig, MatcherSettings, load_config};
pub use crawl::{
    CheckOutcome, CrawlError, CrawlKind, CrawlOptions, CrawlProgressCallback, CrawlSummary,
    MenuCrawler, MenuReport, PageCheck, execute_crawl,
};
pub use duplicates::{DuplicateRecord, DuplicatesSummary, detect_duplicates};
pub use matcher::{MatchStrategy, TitleMatchResult, TitleMatcher};

const BANNER: &str = r#"
  _ __   __ ___   _____ _      _____  ___ _ __
 | '_ \ / _` \ \ / / __\ \ /\ / / _ \/ _ \ '_ \
 | | | | (_| |\ V /\__ \\ V  V /  __/  __/ |_) |
 |_| |_|\__,_| \_/ |___/ \_/\_/ \___|\___| .__/
                                         |_|
"#;

pub fn print_banner() {
    println!("{}", BANNER);
    println!(
        "  navsweep v{} - navigation menu and footer link validator\n",
        env!("CARGO_PKG_VERSION")
    );
}
