use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("navsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("navsweep")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Enable debug logging")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(crawl_command(
            "menu",
            "Open every top-level menu item and its sublinks, checking each page heading \
            against the link label and reporting duplicate links.",
        ))
        .subcommand(crawl_command(
            "footer",
            "Open every footer link, checking each page heading against the link label and \
            reporting duplicate links.",
        ))
        .subcommand(
            command!("match")
                .about("Check a single label against a page heading without crawling")
                .arg(
                    arg!(--"heading" <TEXT>)
                        .required(true)
                        .help("The page heading text"),
                )
                .arg(
                    arg!(--"label" <TEXT>)
                        .required(true)
                        .help("The link label expected to match the heading"),
                )
                .arg(
                    arg!(-c --"config" <PATH>)
                        .required(false)
                        .help("Config file providing matcher thresholds"),
                ),
        )
}

fn crawl_command(name: &'static str, about: &'static str) -> clap::Command {
    clap::Command::new(name)
        .about(about)
        .arg(
            arg!(-u --"url" <URL>)
                .required(true)
                .help("The start page whose navigation is crawled"),
        )
        .arg(
            arg!(-c --"config" <PATH>)
                .required(false)
                .help("Config file (default: ~/.config/navsweep/config.json if present)"),
        )
        .arg(
            arg!(-t --"timeout" <SECONDS>)
                .required(false)
                .help("Per-navigation timeout in seconds (overrides the config file)")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Save report to file (default: display to screen)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json, markdown")
                .value_parser(["text", "json", "markdown"])
                .default_value("text"),
        )
        .arg(
            arg!(--"strict")
                .required(false)
                .help("Exit with status 2 when any title check or page load failed")
                .action(clap::ArgAction::SetTrue),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_must_be_positive() {
        let cmd = command_argument_builder();
        let result = cmd.try_get_matches_from(["navsweep", "menu", "-u", "example.com", "-t", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_timeout_accepted() {
        let matches = command_argument_builder()
            .try_get_matches_from(["navsweep", "footer", "-u", "example.com", "--timeout", "15"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "footer");
        assert_eq!(sub.get_one::<u64>("timeout"), Some(&15));
    }
}
