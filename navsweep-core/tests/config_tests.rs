// Tests for crawl configuration loading

use navsweep_core::config::{
    ConfigError, CrawlConfig, DEFAULT_NAVIGATION_TIMEOUT_MS, MatcherSettings, expand_path,
    load_config,
};
use navsweep_core::matcher::MatchStrategy;
use navsweep_scanner::MenuSelectors;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = CrawlConfig::default();
    assert_eq!(config.navigation_timeout_ms, DEFAULT_NAVIGATION_TIMEOUT_MS);
    assert_eq!(config.navigation_timeout(), Duration::from_secs(60));
    assert_eq!(config.selectors, MenuSelectors::default());
    assert_eq!(config.selectors.heading, "h1");
    assert!(config.user_agent.is_none());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let json = r##"{
        "navigation_timeout_ms": 15000,
        "selectors": { "top_level_items": "#menu > li" }
    }"##;
    let config = CrawlConfig::from_json(json, Path::new("config.json")).unwrap();

    assert_eq!(config.navigation_timeout_ms, 15000);
    assert_eq!(config.selectors.top_level_items, "#menu > li");
    assert_eq!(config.selectors.sublink_block, MenuSelectors::default().sublink_block);
    assert_eq!(config.matcher, MatcherSettings::default());
}

#[test]
fn test_invalid_json_is_parse_error() {
    let result = CrawlConfig::from_json("{ not json", Path::new("broken.json"));
    match result {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, Path::new("broken.json")),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "user_agent": "navsweep-test/1.0", "matcher": { "significant_word_min_len": 3, "stopwords": [] } }"#,
    )
    .unwrap();

    let config = load_config(path.to_str()).unwrap();

    assert_eq!(config.user_agent.as_deref(), Some("navsweep-test/1.0"));
    assert_eq!(config.matcher.significant_word_min_len, 3);
    assert_eq!(config.matcher.all_words_min_len, MatcherSettings::default().all_words_min_len);
}

#[test]
fn test_missing_explicit_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nope.json");

    let result = load_config(path.to_str());
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_matcher_settings_apply() {
    let settings = MatcherSettings {
        significant_word_min_len: 3,
        stopwords: Vec::new(),
        ..MatcherSettings::default()
    };
    let result = settings.to_matcher().check("Ski Resorts", "Ski Chalets");
    assert_eq!(result.strategy, Some(MatchStrategy::SignificantWord));

    let result = MatcherSettings::default()
        .to_matcher()
        .check("Ski Resorts", "Ski Chalets");
    assert!(!result.matched());
}

#[test]
fn test_with_navigation_timeout() {
    let config = CrawlConfig::default().with_navigation_timeout(Duration::from_millis(2500));
    assert_eq!(config.navigation_timeout_ms, 2500);
}

#[test]
fn test_expand_path_leaves_plain_paths() {
    assert_eq!(expand_path("/tmp/config.json"), Path::new("/tmp/config.json"));
    assert!(!expand_path("~/config.json").starts_with("~"));
}
