// Tests for duplicate link detection

use navsweep_core::duplicates::{DuplicateRecord, DuplicatesSummary, detect_duplicates};
use navsweep_scanner::ResolvedLink;

fn link(label: &str, url: &str) -> ResolvedLink {
    ResolvedLink::new(label, url)
}

fn record(label: &str, duplicate_of: &str, url: &str) -> DuplicateRecord {
    DuplicateRecord {
        label: label.to_string(),
        duplicate_of_label: duplicate_of.to_string(),
        url: url.to_string(),
    }
}

#[test]
fn test_duplicates_point_at_first_claimant() {
    let u1 = "https://example.com/ski-holidays/family";
    let scan = detect_duplicates(vec![link("A", u1), link("B", u1), link("C", u1)]);

    assert_eq!(scan.duplicates, vec![record("B", "A", u1), record("C", "A", u1)]);
}

#[test]
fn test_distinct_urls_have_no_duplicates() {
    let entries: Vec<ResolvedLink> = (0..20)
        .map(|i| link(&format!("Link {}", i), &format!("https://example.com/page{}", i)))
        .collect();
    let scan = detect_duplicates(entries.clone());

    assert!(scan.duplicates.is_empty());
    assert_eq!(scan.all_entries, entries);
}

#[test]
fn test_all_entries_returned_in_order() {
    let entries = vec![
        link("Family Ski Holidays", "https://example.com/family"),
        link("Family Ski", "https://example.com/family"),
        link("Deals", "https://example.com/deals"),
    ];
    let scan = detect_duplicates(entries.clone());

    assert_eq!(scan.all_entries, entries);
    assert_eq!(
        scan.duplicates,
        vec![record("Family Ski", "Family Ski Holidays", "https://example.com/family")]
    );
}

#[test]
fn test_identical_label_and_url_still_flagged() {
    let scan = detect_duplicates(vec![
        link("Chalets", "https://example.com/chalets"),
        link("Chalets", "https://example.com/chalets"),
    ]);
    assert_eq!(
        scan.duplicates,
        vec![record("Chalets", "Chalets", "https://example.com/chalets")]
    );
}

#[test]
fn test_same_label_different_urls_not_flagged() {
    let scan = detect_duplicates(vec![
        link("Chalets", "https://example.com/chalets"),
        link("Chalets", "https://example.com/chalets/catered"),
    ]);
    assert!(scan.duplicates.is_empty());
}

#[test]
fn test_url_comparison_is_exact() {
    let scan = detect_duplicates(vec![
        link("A", "https://example.com/family"),
        link("B", "https://example.com/family/"),
        link("C", "https://example.com/family?x=1"),
    ]);
    assert!(scan.duplicates.is_empty());
}

#[test]
fn test_interleaved_duplicate_groups() {
    let scan = detect_duplicates(vec![
        link("A", "u1"),
        link("B", "u2"),
        link("C", "u1"),
        link("D", "u2"),
        link("E", "u1"),
    ]);
    assert_eq!(
        scan.duplicates,
        vec![record("C", "A", "u1"), record("D", "B", "u2"), record("E", "A", "u1")]
    );
}

#[test]
fn test_empty_input() {
    let scan = detect_duplicates(Vec::new());
    assert!(scan.all_entries.is_empty());
    assert!(scan.duplicates.is_empty());
}

// ============================================================================
// DuplicatesSummary Tests
// ============================================================================

#[test]
fn test_summary_keeps_menu_order_and_skips_clean_menus() {
    let mut summary = DuplicatesSummary::new();
    summary.record("Ski Holidays", &[record("Family Ski", "Family Ski Holidays", "u1")]);
    summary.record("Ski Resorts", &[]);
    summary.record(
        "Ski Deals",
        &[record("Late", "Last Minute", "u2"), record("Late Deals", "Last Minute", "u2")],
    );

    let labels: Vec<&str> = summary.groups.iter().map(|g| g.menu_label.as_str()).collect();
    assert_eq!(labels, vec!["Ski Holidays", "Ski Deals"]);
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.get("Ski Deals").map(|r| r.len()), Some(2));
    assert_eq!(summary.get("Ski Resorts"), None);
}

#[test]
fn test_empty_summary() {
    let summary = DuplicatesSummary::new();
    assert!(summary.is_empty());
    assert_eq!(summary.total(), 0);
}

#[test]
fn test_summary_merges_menus_with_same_label() {
    let mut summary = DuplicatesSummary::new();
    summary.record("Deals", &[record("Late", "Last Minute", "u1")]);
    summary.record("Ski Holidays", &[record("Family Ski", "Family Ski Holidays", "u2")]);
    summary.record("Deals", &[record("Early", "Early Booking", "u3")]);

    let labels: Vec<&str> = summary.groups.iter().map(|g| g.menu_label.as_str()).collect();
    assert_eq!(labels, vec!["Deals", "Ski Holidays"]);
    assert_eq!(
        summary.get("Deals"),
        Some(&[record("Late", "Last Minute", "u1"), record("Early", "Early Booking", "u3")][..])
    );
    assert_eq!(summary.total(), 3);
}
