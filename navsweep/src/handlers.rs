use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use navsweep_core::config::{CrawlConfig, load_config};
use navsweep_core::crawl::{CrawlKind, CrawlOptions, CrawlSummary, execute_crawl};
use navsweep_core::report::{ReportFormat, render_report, save_report};
use navsweep_scanner::ScanError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Exit status when `--strict` is set and a page failed its check.
pub const EXIT_CHECK_FAILURES: i32 = 2;

// Helper functions for crawl handlers

/// Load the crawl config and apply command line overrides on top of it.
pub fn load_config_from_args(
    config_path: Option<&str>,
    timeout_secs: Option<u64>,
) -> Result<CrawlConfig> {
    if timeout_secs == Some(0) {
        anyhow::bail!("--timeout must be at least 1 second");
    }
    let mut config = load_config(config_path)?;
    if let Some(secs) = timeout_secs {
        config = config.with_navigation_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

/// Parse the start page, adding `https://` when no scheme was given.
pub fn parse_start_url(input: &str) -> Result<String, ScanError> {
    let input = input.trim();
    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };
    let parsed =
        Url::parse(&candidate).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", input, e)))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed.to_string()),
        _ => Err(ScanError::InvalidUrl(format!(
            "{}: only http and https start pages can be crawled",
            input
        ))),
    }
}

/// Process exit status for a finished crawl.
pub fn exit_code(summary: &CrawlSummary, strict: bool) -> i32 {
    if strict && summary.has_failures() {
        EXIT_CHECK_FAILURES
    } else {
        0
    }
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_summary(summary: &CrawlSummary) {
    print_divider();
    println!(
        "{} {} pages checked across {} group(s)",
        "✓".green().bold(),
        summary.total_checks().to_string().bright_white(),
        summary.menus.len()
    );
    println!("  {} {}", "passed:        ".green(), summary.passed());
    println!("  {} {}", "title warnings:".yellow(), summary.mismatched());
    println!("  {} {}", "failed loads:  ".red(), summary.failed_navigations());
    if summary.skipped_menus() > 0 {
        println!("  {} {}", "skipped menus: ".yellow(), summary.skipped_menus());
    }
    println!(
        "  {} {}",
        "duplicates:    ".cyan(),
        summary.duplicates.total()
    );
    print_divider();
    println!();
}

pub async fn handle_crawl(kind: CrawlKind, sub_matches: &ArgMatches, quiet: bool) -> Result<i32> {
    let raw_url = sub_matches
        .get_one::<String>("url")
        .context("--url is required")?;
    let start_url = parse_start_url(raw_url)?;
    let config = load_config_from_args(
        sub_matches.get_one::<String>("config").map(String::as_str),
        sub_matches.get_one::<u64>("timeout").copied(),
    )?;
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);
    let output = sub_matches.get_one::<PathBuf>("output");
    let strict = sub_matches.get_flag("strict");
    debug!("Crawl config: {:?}", config);

    if !quiet {
        println!(
            "{} Crawling {} navigation of {}",
            "→".blue(),
            kind.to_string().bright_white(),
            start_url.bright_white()
        );
        println!(
            "{} Navigation timeout: {}s\n",
            "→".blue(),
            config.navigation_timeout().as_secs()
        );
    }

    let options = CrawlOptions {
        start_url,
        kind,
        config,
        show_progress_bars: !quiet,
    };
    let summary = execute_crawl(options, None)
        .await
        .context("Crawl failed")?;

    if !quiet {
        print_summary(&summary);
    }

    let report = render_report(&summary, format).context("Failed to render report")?;
    match output {
        Some(path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", report),
    }

    Ok(exit_code(&summary, strict))
}

pub fn handle_match(sub_matches: &ArgMatches) -> Result<i32> {
    let heading = sub_matches
        .get_one::<String>("heading")
        .context("--heading is required")?;
    let label = sub_matches
        .get_one::<String>("label")
        .context("--label is required")?;
    let config = load_config_from_args(
        sub_matches.get_one::<String>("config").map(String::as_str),
        None,
    )?;

    let result = config.matcher.to_matcher().check(heading, label);
    match (result.strategy, result.snippet) {
        (Some(strategy), Some(snippet)) => {
            println!(
                "{} '{}' matches ({}: '{}')",
                "✓".green().bold(),
                label,
                strategy.to_string().cyan(),
                snippet
            );
            Ok(0)
        }
        _ => {
            println!(
                "{} '{}' does not match heading '{}'",
                "✗".red().bold(),
                label,
                heading
            );
            Ok(EXIT_CHECK_FAILURES)
        }
    }
}
