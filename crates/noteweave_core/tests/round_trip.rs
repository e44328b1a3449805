//! Integration tests for the document <-> item cycle

use std::collections::HashSet;

use chrono::NaiveDate;
use noteweave_core::attributes::{active_attributes, toggle_attribute};
use noteweave_core::content::{content_to_item, item_to_content};
use noteweave_core::date::{format_date, parse_date};
use noteweave_core::export::export_items;
use noteweave_core::import::{ImportSource, import_batch};
use noteweave_core::item::{AttributeKind, Item, MailAttributes};
use noteweave_core::links::{back_references, resolve_links};
use noteweave_core::{format_with_yaml, generate_yaml, parse_content, primary_type};

fn tag_set(item: &Item) -> HashSet<&str> {
    item.tags.iter().map(String::as_str).collect()
}

fn assert_equivalent(original: &Item, reread: &Item) {
    assert_eq!(reread.id, original.id);
    assert_eq!(reread.title, original.title);
    assert_eq!(reread.content, original.content);
    assert_eq!(tag_set(reread), tag_set(original));
    assert_eq!(reread.task, original.task);
    assert_eq!(active_attributes(reread), active_attributes(original));
    assert_eq!(
        reread.event.as_ref().map(|e| format_date(&e.date)),
        original.event.as_ref().map(|e| format_date(&e.date))
    );
    assert_eq!(
        reread.event.as_ref().and_then(|e| e.location.clone()),
        original.event.as_ref().and_then(|e| e.location.clone())
    );
    assert_eq!(reread.mail, original.mail);
}

#[test]
fn round_trip_preserves_every_attribute_combination() {
    let date = parse_date("2025-03-23").value();
    let base = Item::new("Planning: Q2 #goals", "Outline\n\n- [ ] draft\n- [x] review")
        .with_tag("work")
        .with_tag("2025");

    let combos: Vec<Vec<AttributeKind>> = vec![
        vec![AttributeKind::Task],
        vec![AttributeKind::Event],
        vec![AttributeKind::Mail],
        vec![AttributeKind::Task, AttributeKind::Event],
        vec![AttributeKind::Event, AttributeKind::Mail],
        vec![AttributeKind::Task, AttributeKind::Event, AttributeKind::Mail],
    ];

    for combo in combos {
        let mut item = base.clone();
        for kind in &combo {
            item = toggle_attribute(item, *kind);
        }
        if item.event.is_some() {
            item = item.with_event_date(date).with_location(Some("HQ, floor 3".into()));
        }
        if item.mail.is_some() {
            item = item
                .with_mail_from("lead@example.com")
                .with_mail_to(vec!["team@example.com".into()]);
        }

        let written = format_with_yaml(&item);
        let reread = parse_content(&written)
            .unwrap_or_else(|| panic!("failed to reparse {:?}:\n{}", combo, written));
        assert_equivalent(&item, &reread);
    }
}

#[test]
fn round_trip_tagged_note() {
    let item = Item::new("Reading list", "[[Dune]]").with_tag("books");
    let reread = parse_content(&format_with_yaml(&item)).unwrap();
    assert_equivalent(&item, &reread);
    assert!(reread.has_note_attributes());
}

#[test]
fn round_trip_is_stable() {
    let item = Item::new("Stable", "body").with_done(true).with_tag("x");
    let once = format_with_yaml(&item);
    let twice = format_with_yaml(&parse_content(&once).unwrap());
    assert_eq!(once, twice);
}

#[test]
fn empty_note_has_no_front_matter() {
    let item = Item::new("Loose", "just words");
    assert_eq!(generate_yaml(&item), "");
    assert_eq!(format_with_yaml(&item), item.content);
    assert!(parse_content(&format_with_yaml(&item)).is_none());
}

#[test]
fn date_encodings_agree() {
    let iso = parse_date("2025-03-23").value();
    assert_eq!(iso.date_naive(), NaiveDate::from_ymd_opt(2025, 3, 23).unwrap());
    assert_eq!(parse_date("1647369160604").value().timestamp_millis(), 1647369160604);
    assert_eq!(parse_date(1647369160604_i64).value().timestamp_millis(), 1647369160604);
}

#[test]
fn legacy_documents_upgrade_to_canonical_form() {
    let legacy = "event:\n  date: 1647369160604\n  location: Library\n\nBook club";
    let item = parse_content(legacy).unwrap();
    assert_eq!(primary_type(&item), AttributeKind::Event);

    let written = format_with_yaml(&item);
    assert!(written.starts_with("---\n"));
    assert!(written.contains("event:\n"));
    assert!(written.contains("  location: Library\n"));

    let reread = parse_content(&written).unwrap();
    assert_equivalent(&item, &reread);
}

#[test]
fn batch_import_survives_malformed_document() {
    let sources = vec![
        ImportSource::new("a.md", "---\nid: a\ntitle: Alpha\n---\n\nLinks to [[Beta]]"),
        ImportSource::new("broken.md", "---\ntitle: \"unterminated\n---\n\nOops"),
        ImportSource::new("b.md", "---\nid: b\ntitle: Beta\ntask:\n  done: false\n---\n\nDone soon"),
    ];

    let report = import_batch(&sources);
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "broken.md");

    let alpha = &report.items[0];
    let beta = &report.items[1];
    let annotated = resolve_links(&alpha.content, &report.items);
    assert!(annotated.unresolved.is_empty());
    assert_eq!(back_references(beta, &report.items)[0].id, "a");
}

#[test]
fn content_adapter_survives_document_cycle() {
    let item = Item::new("Adapter", "body")
        .with_done(false)
        .with_event_date(parse_date("2024-12-24").value());
    let through_content = content_to_item(&item_to_content(&item));
    assert_eq!(through_content, item);

    let reread = parse_content(&format_with_yaml(&through_content)).unwrap();
    assert_equivalent(&item, &reread);
}

#[test]
fn exported_files_reimport() {
    let items = vec![
        Item::new("One", "first").with_done(true),
        Item::new("One", "second").with_tag("dup"),
    ];
    let files = export_items(&items);
    assert_eq!(files[0].filename, "one.md");
    assert_eq!(files[1].filename, "one-2.md");

    let sources: Vec<_> = files
        .iter()
        .map(|f| ImportSource::new(f.filename.clone(), f.contents.clone()))
        .collect();
    let report = import_batch(&sources);
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items[0].id, items[0].id);
    assert_eq!(report.items[1].id, items[1].id);
}

#[test]
fn mail_without_addresses_round_trips() {
    let mut subject_only = Item::new("Weekly digest", "Summary");
    subject_only.mail = Some(MailAttributes {
        subject: Some("Weekly".into()),
        ..MailAttributes::default()
    });
    let tags_only = {
        let mut item = Item::new("Filed", "Receipt").with_tag("finance");
        item.mail = Some(MailAttributes::default());
        item
    };
    let mut bare = Item::new("Blank", "");
    bare.mail = Some(MailAttributes::default());

    for item in [subject_only, tags_only, bare] {
        let written = format_with_yaml(&item);
        let reread = parse_content(&written)
            .unwrap_or_else(|| panic!("failed to reparse:\n{}", written));
        assert!(reread.has_mail_attributes(), "mail lost from:\n{}", written);
        assert!(!reread.has_note_attributes());
        assert_equivalent(&item, &reread);
    }
}

#[test]
fn number_like_titles_and_tags_round_trip() {
    let scalars = [
        "0b101", "0o17", "0x1F", "+.inf", "-.inf", ".nan", "1_000", "007", "1e3", "+1", "12",
        "3.50", "yes", "null", "~", "2025-03-23",
    ];
    for scalar in scalars {
        let item = Item::new(scalar, "body").with_done(false).with_tag(scalar);
        let reread = parse_content(&format_with_yaml(&item)).unwrap();
        assert_eq!(reread.title, scalar);
        assert_eq!(reread.tags, vec![scalar.to_string()]);
    }
}

#[test]
fn prose_starting_with_a_type_word_is_not_metadata() {
    let prose = "task: call bob about the invoice\n\nHe said Friday works.";
    assert!(parse_content(prose).is_none());

    let report = import_batch(&[ImportSource::new("bob.md", prose)]);
    assert!(report.items.is_empty());
    assert_eq!(report.skipped[0].name, "bob.md");
}
