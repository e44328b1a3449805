//! Inline `[[target]]` link parsing, resolution and back-references.
//!
//! # Link Grammar
//!
//! | Token | Display | Target |
//! |-------|---------|--------|
//! | `[[Target Note]]` | `Target Note` | `Target Note` |
//! | `[[the budget\|note-budget-1a2b3c4d]]` | `the budget` | `note-budget-1a2b3c4d` |
//!
//! A target resolves first by exact item id, then (unless disabled in
//! [`Config`]) by exact item title. Unresolved targets are a normal state,
//! rendered with the broken-link scheme so the UI can flag them.
//!
//! The candidate collection is always passed in; nothing here reaches for
//! shared state.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;
use crate::item::Item;

static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]\n]+?)\]\]").expect("wikilink pattern is valid"));

/// A `[[...]]` token found in a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wikilink {
    /// Text shown to the reader
    pub display: String,
    /// Id or title being referenced
    pub target: String,
    /// Byte range of the whole token in the body
    pub span: Range<usize>,
}

/// How a single token resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
    /// The target matched the item with this id
    Resolved {
        /// Id of the matched item
        id: String,
    },
    /// No candidate matched
    Unresolved,
}

/// A token together with its resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// The token as found in the body
    pub link: Wikilink,
    /// What it resolved to
    pub resolution: LinkResolution,
}

impl ResolvedLink {
    /// Whether the token matched a candidate.
    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, LinkResolution::Resolved { .. })
    }
}

/// A body with every link token resolved against a candidate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedBody {
    /// Body with tokens rewritten to Markdown links
    pub rendered: String,
    /// Every token in body order
    pub links: Vec<ResolvedLink>,
    /// Distinct unresolved targets in first-seen order
    pub unresolved: Vec<String>,
}

/// Extract every link token from a body.
///
/// Tokens with an empty target are not links and are skipped.
///
/// # Examples
///
/// ```
/// use noteweave_core::links::extract_wikilinks;
///
/// let links = extract_wikilinks("See [[Target Note]] and [[the plan|task-plan-0f1e2d3c]].");
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[0].target, "Target Note");
/// assert_eq!(links[1].display, "the plan");
/// assert_eq!(links[1].target, "task-plan-0f1e2d3c");
/// ```
pub fn extract_wikilinks(body: &str) -> Vec<Wikilink> {
    WIKILINK_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?.as_str();
            let (display, target) = match inner.split_once('|') {
                Some((display, target)) => (display.trim(), target.trim()),
                None => (inner.trim(), inner.trim()),
            };
            if target.is_empty() {
                return None;
            }
            let display = if display.is_empty() { target } else { display };
            Some(Wikilink {
                display: display.to_string(),
                target: target.to_string(),
                span: whole.range(),
            })
        })
        .collect()
}

/// Find the candidate a target refers to: id first, then title.
pub fn resolve_target<'a>(
    target: &str,
    candidates: &'a [Item],
    config: &Config,
) -> Option<&'a Item> {
    candidates
        .iter()
        .find(|item| item.id == target)
        .or_else(|| {
            if config.match_titles {
                candidates.iter().find(|item| item.title == target)
            } else {
                None
            }
        })
}

/// Resolve every token of a body with the default configuration.
pub fn resolve_links(body: &str, candidates: &[Item]) -> AnnotatedBody {
    resolve_links_with(body, candidates, &Config::default())
}

/// Resolve every token of a body against `candidates`.
pub fn resolve_links_with(body: &str, candidates: &[Item], config: &Config) -> AnnotatedBody {
    let mut rendered = String::with_capacity(body.len());
    let mut links = Vec::new();
    let mut unresolved = Vec::new();
    let mut seen_unresolved = HashSet::new();
    let mut cursor = 0;

    for link in extract_wikilinks(body) {
        rendered.push_str(&body[cursor..link.span.start]);
        cursor = link.span.end;

        let resolution = match resolve_target(&link.target, candidates, config) {
            Some(item) => {
                rendered.push_str(&markdown_link(&link.display, &config.link_scheme, &item.id));
                LinkResolution::Resolved {
                    id: item.id.clone(),
                }
            }
            None => {
                rendered.push_str(&markdown_link(
                    &link.display,
                    &config.broken_link_scheme,
                    &link.target,
                ));
                if seen_unresolved.insert(link.target.clone()) {
                    unresolved.push(link.target.clone());
                }
                LinkResolution::Unresolved
            }
        };

        links.push(ResolvedLink { link, resolution });
    }
    rendered.push_str(&body[cursor..]);

    AnnotatedBody {
        rendered,
        links,
        unresolved,
    }
}

/// Rewrite link tokens into Markdown links with the default configuration.
///
/// ```
/// use noteweave_core::item::Item;
/// use noteweave_core::links::process_content_links;
///
/// let mut target = Item::new("Target Note", "");
/// target.id = "abc123".to_string();
///
/// let html_ready = process_content_links("See [[Target Note]]", &[target]);
/// assert_eq!(html_ready, "See [Target Note](item:abc123)");
///
/// let broken = process_content_links("See [[Target Note]]", &[]);
/// assert_eq!(broken, "See [Target Note](<broken:Target Note>)");
/// ```
pub fn process_content_links(body: &str, items: &[Item]) -> String {
    resolve_links(body, items).rendered
}

/// Rewrite link tokens into Markdown links.
pub fn process_content_links_with(body: &str, items: &[Item], config: &Config) -> String {
    resolve_links_with(body, items, config).rendered
}

fn markdown_link(display: &str, scheme: &str, destination: &str) -> String {
    let url = format!("{}{}", scheme, destination)
        .replace('<', "%3C")
        .replace('>', "%3E");
    if url.contains(char::is_whitespace) || url.contains(['(', ')']) {
        format!("[{}](<{}>)", display, url)
    } else {
        format!("[{}]({})", display, url)
    }
}

/// Whether `body` contains a token whose target names `item`.
fn references(body: &str, item: &Item, config: &Config) -> bool {
    extract_wikilinks(body)
        .iter()
        .any(|link| link.target == item.id || (config.match_titles && link.target == item.title))
}

/// Items whose body links to `item`, with the default configuration.
pub fn back_references<'a>(item: &Item, candidates: &'a [Item]) -> Vec<&'a Item> {
    back_references_with(item, candidates, &Config::default())
}

/// Items whose body links to `item` by id or title.
///
/// The item itself is never its own back-reference.
pub fn back_references_with<'a>(
    item: &Item,
    candidates: &'a [Item],
    config: &Config,
) -> Vec<&'a Item> {
    candidates
        .iter()
        .filter(|candidate| candidate.id != item.id)
        .filter(|candidate| references(&candidate.content, item, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str, content: &str) -> Item {
        let mut item = Item::new(title, content);
        item.id = id.to_string();
        item
    }

    #[test]
    fn test_extract_plain_and_piped() {
        let links = extract_wikilinks("[[A]] text [[shown | b-id ]]");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].display, "A");
        assert_eq!(links[0].target, "A");
        assert_eq!(links[0].span, 0..5);
        assert_eq!(links[1].display, "shown");
        assert_eq!(links[1].target, "b-id");
    }

    #[test]
    fn test_extract_skips_empty_and_multiline() {
        assert!(extract_wikilinks("[[ ]] [[|]] [[a\nb]]").is_empty());
        let links = extract_wikilinks("[[|only-target]]");
        assert_eq!(links[0].display, "only-target");
    }

    #[test]
    fn test_extract_no_links() {
        assert!(extract_wikilinks("plain [single] brackets").is_empty());
    }

    #[test]
    fn test_resolve_by_title() {
        let candidates = vec![item("abc123", "Target Note", "")];
        let annotated = resolve_links("See [[Target Note]]", &candidates);
        assert_eq!(annotated.links.len(), 1);
        assert_eq!(
            annotated.links[0].resolution,
            LinkResolution::Resolved {
                id: "abc123".to_string()
            }
        );
        assert!(annotated.unresolved.is_empty());
    }

    #[test]
    fn test_resolve_against_empty_candidates() {
        let annotated = resolve_links("See [[Target Note]]", &[]);
        assert_eq!(annotated.links[0].resolution, LinkResolution::Unresolved);
        assert_eq!(annotated.unresolved, vec!["Target Note"]);
        assert_eq!(annotated.rendered, "See [Target Note](<broken:Target Note>)");
    }

    #[test]
    fn test_id_match_beats_title_match() {
        let candidates = vec![item("x-1", "shared", ""), item("shared", "Other", "")];
        let annotated = resolve_links("[[shared]]", &candidates);
        assert_eq!(
            annotated.links[0].resolution,
            LinkResolution::Resolved {
                id: "shared".to_string()
            }
        );
    }

    #[test]
    fn test_title_matching_can_be_disabled() {
        let config = Config {
            match_titles: false,
            ..Config::default()
        };
        let candidates = vec![item("abc123", "Target Note", "")];
        let annotated = resolve_links_with("[[Target Note]] [[abc123]]", &candidates, &config);
        assert!(!annotated.links[0].is_resolved());
        assert!(annotated.links[1].is_resolved());
    }

    #[test]
    fn test_rendered_keeps_surrounding_text() {
        let candidates = vec![item("a", "Alpha", "")];
        let rendered = process_content_links("x [[Alpha]] y [[alias|a]] z [[Nope]] w", &candidates);
        assert_eq!(
            rendered,
            "x [Alpha](item:a) y [alias](item:a) z [Nope](broken:Nope) w"
        );
    }

    #[test]
    fn test_angle_brackets_in_destination_are_encoded() {
        let rendered = process_content_links("[[a<b>]] and [[x<y]]", &[]);
        assert_eq!(rendered, "[a<b>](broken:a%3Cb%3E) and [x<y](broken:x%3Cy)");

        let rendered = process_content_links("[[see|a <b>]]", &[]);
        assert_eq!(rendered, "[see](<broken:a %3Cb%3E>)");
    }

    #[test]
    fn test_unresolved_deduplicated() {
        let annotated = resolve_links("[[Gone]] [[Gone]] [[Lost]]", &[]);
        assert_eq!(annotated.unresolved, vec!["Gone", "Lost"]);
        assert_eq!(annotated.links.len(), 3);
    }

    #[test]
    fn test_custom_schemes() {
        let config = Config {
            link_scheme: "#/items/".to_string(),
            broken_link_scheme: "#/missing/".to_string(),
            ..Config::default()
        };
        let candidates = vec![item("a", "Alpha", "")];
        let rendered = process_content_links_with("[[Alpha]] [[Beta]]", &candidates, &config);
        assert_eq!(rendered, "[Alpha](#/items/a) [Beta](#/missing/Beta)");
    }

    #[test]
    fn test_back_references() {
        let target = item("t-1", "Target", "I link to [[Target]] myself");
        let by_title = item("a", "A", "mentions [[Target]]");
        let by_id = item("b", "B", "mentions [[see|t-1]]");
        let unrelated = item("c", "C", "mentions [[Other]]");
        let all = vec![target.clone(), by_title, by_id, unrelated];

        let refs = back_references(&target, &all);
        let ids: Vec<_> = refs.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_back_references_after_deletion() {
        let target = item("t-1", "Target", "");
        let mut all = vec![target.clone(), item("a", "A", "[[Target]]")];
        assert_eq!(back_references(&target, &all).len(), 1);
        all.retain(|i| i.id != "a");
        assert!(back_references(&target, &all).is_empty());
    }
}
