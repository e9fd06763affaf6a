use std::collections::BTreeSet;

use rstest::rstest;
use tempfile::TempDir;
use troupe_core::types::{TroupeKey, TroupeRecord, YearedText};
use troupe_renderer::{RenderConfig, Renderer, TemplateSet};

const CURRENT_YEAR: i32 = 2012;

const SECTION_MARKERS: &[&str] = &[
    "== About ==",
    "== The Deal ==",
    "== Summary ==",
    "== Media ==",
    "== More Info ==",
];

fn renderer() -> Renderer {
    Renderer::new(RenderConfig::new(CURRENT_YEAR)).expect("renderer")
}

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn text(t: &str, year: i32) -> Option<YearedText> {
    Some(YearedText {
        text: t.to_string(),
        year: Some(year),
    })
}

fn render(record: &TroupeRecord) -> String {
    renderer()
        .render(&TroupeKey::from("Test Troupe"), record)
        .expect("render")
        .content
}

fn full_record() -> TroupeRecord {
    TroupeRecord {
        site: Some("http://frogs.example".to_string()),
        photo: Some("http://frogs.example/p.jpg".to_string()),
        videos: names(&["http://v.example/2", "http://v.example/1"]),
        blurb: text("We jump.\nWe croak.", 2010),
        deal: text("Pay what you can.", 2009),
        cast: names(&["Ann", "Bob", "Cy"]),
        start_year: Some(2008),
        end_year: Some(2010),
        performed_before: Some(true),
        row_count: 3,
    }
}

// ---------------------------------------------------------------------------
// Empty / optional fields
// ---------------------------------------------------------------------------

#[test]
fn bare_record_renders_placeholders_and_no_sections() {
    let doc = render(&TroupeRecord::default());
    assert!(doc.contains("'''Test Troupe'''"));
    assert!(doc.contains("(???)"), "expected single ??? year token:\n{doc}");
    for marker in SECTION_MARKERS {
        assert!(!doc.contains(marker), "unexpected {marker} in:\n{doc}");
    }
    assert!(doc.contains("{{ubl}}"));
    assert!(doc.contains("[[Category:Never Performed]]"));
    assert!(!doc.contains("[[Category:Active]]"));
}

#[test]
fn full_record_renders_every_section() {
    let doc = render(&full_record());
    for marker in SECTION_MARKERS {
        assert!(doc.contains(marker), "missing {marker} in:\n{doc}");
    }
    assert!(doc.contains("We jump.\n\nWe croak."), "newlines must double:\n{doc}");
    assert!(doc.contains("{{ubl|[[Ann]]|[[Bob]]|[[Cy]]}}"));
    assert!(doc.contains("* [http://v.example/1 Video #1]"));
    assert!(doc.contains("* [http://v.example/2 Video #2]"));
    assert!(doc.contains("* [http://frogs.example Test Troupe website]"));
    assert!(doc.contains("(2008-2010)"));
    assert!(doc.contains("was a troupe"));
    assert!(!doc.contains("Never Performed"));
}

#[test]
fn deal_alone_still_produces_summary() {
    let record = TroupeRecord {
        deal: text("Ten dollars.", 2011),
        ..Default::default()
    };
    let doc = render(&record);
    assert!(doc.contains("== Summary =="));
    assert!(doc.contains("== The Deal =="));
    assert!(!doc.contains("== About =="));
}

#[test]
fn empty_video_set_omits_media() {
    let record = TroupeRecord {
        site: Some("www.x".to_string()),
        ..Default::default()
    };
    let doc = render(&record);
    assert!(!doc.contains("== Media =="));
    assert!(doc.contains("== More Info =="));
}

// ---------------------------------------------------------------------------
// Years and tense
// ---------------------------------------------------------------------------

#[test]
fn current_end_year_renders_present_and_active() {
    let record = TroupeRecord {
        start_year: Some(2009),
        end_year: Some(CURRENT_YEAR),
        ..Default::default()
    };
    let doc = render(&record);
    assert!(doc.contains("(2009-Present)"), "got:\n{doc}");
    assert!(doc.contains("is a troupe"));
    assert!(doc.contains("[[Category:Active]]"));
}

#[test]
fn equal_past_years_render_single_token() {
    let record = TroupeRecord {
        start_year: Some(2007),
        end_year: Some(2007),
        ..Default::default()
    };
    let doc = render(&record);
    assert!(doc.contains("(2007)"), "got:\n{doc}");
    assert!(!doc.contains("2007-2007"));
    assert!(!doc.contains("[[Category:Active]]"));
}

#[test]
fn missing_start_year_keeps_placeholder() {
    let record = TroupeRecord {
        end_year: Some(2005),
        ..Default::default()
    };
    assert!(render(&record).contains("(???-2005)"));
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[rstest]
#[case(&["Ann"], false)]
#[case(&["Ann", "Bob"], true)]
#[case(&["Ann", "Bob", "Cy"], false)]
fn duo_category_only_for_two(#[case] cast: &[&str], #[case] duo: bool) {
    let record = TroupeRecord {
        cast: names(cast),
        ..Default::default()
    };
    let doc = render(&record);
    assert_eq!(doc.contains("[[Category:Duo]]"), duo, "cast {cast:?}:\n{doc}");
    assert_eq!(doc.contains("a duo at"), duo);
}

#[rstest]
#[case(None, true)]
#[case(Some(false), true)]
#[case(Some(true), false)]
fn never_performed_category(#[case] performed: Option<bool>, #[case] expected: bool) {
    let record = TroupeRecord {
        performed_before: performed,
        ..Default::default()
    };
    let doc = renderer()
        .render(&TroupeKey::from("t"), &record)
        .expect("render");
    assert_eq!(doc.never_performed, expected);
    assert_eq!(doc.content.contains("[[Category:Never Performed]]"), expected);
}

// ---------------------------------------------------------------------------
// Purity and overrides
// ---------------------------------------------------------------------------

#[test]
fn rendering_does_not_mutate_record() {
    let record = full_record();
    let before = record.clone();
    let _ = render(&record);
    assert_eq!(record, before);
}

#[test]
fn rendering_is_deterministic() {
    let record = full_record();
    assert_eq!(render(&record), render(&record));
}

#[test]
fn override_directory_replaces_a_section() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("troupe.tera"),
        "{{ name }} | {{ years }} | {{ sections.blurb }}",
    )
    .expect("write");
    std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write");

    let set = TemplateSet::load(Some(dir.path())).expect("load");
    let renderer = Renderer::with_templates(set, RenderConfig::new(CURRENT_YEAR));
    let doc = renderer
        .render(&TroupeKey::from("Frogs"), &full_record())
        .expect("render");
    assert!(doc.content.starts_with("Frogs | 2008-2010 | == About =="));
}

#[test]
fn missing_override_directory_falls_back_to_defaults() {
    let dir = TempDir::new().expect("tempdir");
    TemplateSet::load(Some(&dir.path().join("absent"))).expect("defaults");
}
