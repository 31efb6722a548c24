use crate::error::{Result, ScanError};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// One anchor captured from the DOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub label: String,
    pub raw_href: Option<String>,
}

impl NavEntry {
    pub fn new(label: impl Into<String>, raw_href: Option<&str>) -> Self {
        Self {
            label: label.into(),
            raw_href: raw_href.map(str::to_string),
        }
    }
}

/// A top-level navigation item and its children, captured from a single DOM read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    pub main_label: String,
    pub main_href: Option<String>,
    pub sublinks: Vec<NavEntry>,
}

/// CSS selectors describing where the navigation lives on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuSelectors {
    /// One match per top-level menu item container.
    pub top_level_items: String,
    /// The item's own link, searched inside the container.
    pub main_link: String,
    /// Region(s) inside a container holding the item's sublinks.
    pub sublink_block: String,
    /// Anchors inside a sublink block.
    pub sublink: String,
    /// Primary page heading, read on destination pages.
    pub heading: String,
    /// Region(s) whose anchors make up the footer link group.
    pub footer_links: String,
}

impl Default for MenuSelectors {
    fn default() -> Self {
        Self {
            top_level_items: "nav ul.main-menu > li".to_string(),
            main_link: "a".to_string(),
            sublink_block: ".sub-menu".to_string(),
            sublink: "a".to_string(),
            heading: "h1".to_string(),
            footer_links: "footer".to_string(),
        }
    }
}

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScanError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Visible text of an element with whitespace collapsed.
fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_match<'a>(container: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    if selector.matches(&container) {
        return Some(container);
    }
    container.select(selector).next()
}

/// Read every top-level menu item and its sublinks, in DOM order.
///
/// No deduplication happens here; repeated sublinks are reported later per menu.
pub fn extract_menu_snapshots(html: &str, selectors: &MenuSelectors) -> Result<Vec<MenuSnapshot>> {
    let top_level = parse_selector(&selectors.top_level_items)?;
    let main_link = parse_selector(&selectors.main_link)?;
    let sublink_block = parse_selector(&selectors.sublink_block)?;
    let sublink = parse_selector(&selectors.sublink)?;

    let document = Html::parse_document(html);
    let mut snapshots = Vec::new();

    for container in document.select(&top_level) {
        let (main_label, main_href) = match first_match(container, &main_link) {
            Some(anchor) => (
                element_text(&anchor),
                anchor.value().attr("href").map(str::to_string),
            ),
            None => (element_text(&container), None),
        };

        let mut seen = HashSet::new();
        let mut sublinks = Vec::new();
        for block in container.select(&sublink_block) {
            for anchor in block.select(&sublink) {
                // Nested blocks would otherwise yield the same anchor twice
                if !seen.insert(anchor.id()) {
                    continue;
                }
                sublinks.push(NavEntry {
                    label: element_text(&anchor),
                    raw_href: anchor.value().attr("href").map(str::to_string),
                });
            }
        }

        debug!(
            "Menu '{}' ({:?}) with {} sublinks",
            main_label,
            main_href,
            sublinks.len()
        );
        snapshots.push(MenuSnapshot {
            main_label,
            main_href,
            sublinks,
        });
    }

    Ok(snapshots)
}

/// Every anchor inside the regions matched by `container_selector`, in DOM order.
pub fn extract_links(html: &str, container_selector: &str) -> Result<Vec<NavEntry>> {
    let container = parse_selector(container_selector)?;
    let anchor = parse_selector("a")?;

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for region in document.select(&container) {
        for element in region.select(&anchor) {
            if !seen.insert(element.id()) {
                continue;
            }
            links.push(NavEntry {
                label: element_text(&element),
                raw_href: element.value().attr("href").map(str::to_string),
            });
        }
    }

    Ok(links)
}

/// Text of the first element matching `heading_selector`, or `None` when there is none.
pub fn extract_heading(html: &str, heading_selector: &str) -> Result<Option<String>> {
    let heading = parse_selector(heading_selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&heading).next().map(|h| element_text(&h)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = r#"<html><body>
        <nav><ul class="main-menu">
            <li>
                <a href="/ski-holidays">  Ski
                    Holidays </a>
                <div class="sub-menu">
                    <a href="/ski-holidays/family">Family Ski Holidays</a>
                    <a href="/ski-holidays/family">Family Ski</a>
                    <a>No link here</a>
                </div>
            </li>
            <li><span>Offers</span></li>
            <li>
                <a href="https://www.example.com/chalets">Ski Chalets</a>
                <div class="sub-menu"><ul><li><a href="catered">Catered</a></li></ul></div>
            </li>
        </ul></nav>
        <main><h1>Welcome To The Home Of Ski</h1><h1>Second</h1></main>
        <footer>
            <div class="col"><a href="/about">About</a></div>
            <div class="col"><a href="/contact">Contact</a></div>
        </footer>
    </body></html>"#;

    #[test]
    fn test_extract_menu_snapshots_in_dom_order() {
        let snapshots = extract_menu_snapshots(HOME, &MenuSelectors::default()).unwrap();

        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].main_label, "Ski Holidays");
        assert_eq!(snapshots[0].main_href.as_deref(), Some("/ski-holidays"));
        assert_eq!(
            snapshots[0].sublinks,
            vec![
                NavEntry::new("Family Ski Holidays", Some("/ski-holidays/family")),
                NavEntry::new("Family Ski", Some("/ski-holidays/family")),
                NavEntry::new("No link here", None),
            ]
        );
        assert_eq!(snapshots[2].sublinks[0].label, "Catered");
    }

    #[test]
    fn test_container_without_anchor_falls_back_to_text() {
        let snapshots = extract_menu_snapshots(HOME, &MenuSelectors::default()).unwrap();

        assert_eq!(snapshots[1].main_label, "Offers");
        assert_eq!(snapshots[1].main_href, None);
        assert!(snapshots[1].sublinks.is_empty());
    }

    #[test]
    fn test_extract_menu_snapshots_no_matches() {
        let selectors = MenuSelectors {
            top_level_items: "#missing li".to_string(),
            ..MenuSelectors::default()
        };
        let snapshots = extract_menu_snapshots(HOME, &selectors).unwrap();
        assert!(snapshots.is_empty());
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let selectors = MenuSelectors {
            top_level_items: "li[[".to_string(),
            ..MenuSelectors::default()
        };
        let result = extract_menu_snapshots(HOME, &selectors);
        assert!(matches!(result, Err(ScanError::InvalidSelector { .. })));
    }

    #[test]
    fn test_extract_links_from_footer() {
        let links = extract_links(HOME, "footer").unwrap();
        assert_eq!(
            links,
            vec![
                NavEntry::new("About", Some("/about")),
                NavEntry::new("Contact", Some("/contact")),
            ]
        );
    }

    #[test]
    fn test_extract_links_nested_regions_counted_once() {
        let links = extract_links(HOME, "footer, footer .col").unwrap();
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_extract_heading() {
        assert_eq!(
            extract_heading(HOME, "h1").unwrap().as_deref(),
            Some("Welcome To The Home Of Ski")
        );
        assert_eq!(extract_heading(HOME, "h2").unwrap(), None);
    }
}
