use commands::command_argument_builder;
use navsweep::handlers::{handle_crawl, handle_match};
use navsweep_core::crawl::CrawlKind;
use navsweep_core::print_banner;
use tracing::Level;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("menu", primary_command)) => {
            handle_crawl(CrawlKind::Menu, primary_command, quiet).await
        }
        Some(("footer", primary_command)) => {
            handle_crawl(CrawlKind::Footer, primary_command, quiet).await
        }
        Some(("match", primary_command)) => handle_match(primary_command),
        // No subcommand provided, just show the banner
        None => Ok(0),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
