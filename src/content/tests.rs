use pretty_assertions::assert_eq;

use super::*;

#[test]
fn from_json_accepts_deck_object() {
    let p = Presentation::from_json(
        r#"{"slides":[{"id":"intro","title":"Dirty checking"},{"id":"zones"}]}"#,
    )
    .unwrap();
    assert_eq!(p.slide_count(), 2);
    assert_eq!(p.slide_at(0).title.as_deref(), Some("Dirty checking"));
    assert_eq!(p.slide_at(1).id, "zones");
}

#[test]
fn from_json_accepts_bare_array() {
    let p = Presentation::from_json(r#"[{"id":"a"},{"id":"b"},{"id":"c"}]"#).unwrap();
    assert_eq!(p.slide_count(), 3);
}

#[test]
fn body_is_kept_opaque() {
    let p = Presentation::from_json(r#"[{"id":"a","body":{"code":"x = 1"}}]"#).unwrap();
    assert_eq!(p.slide_at(0).body["code"], "x = 1");
}

#[test]
fn empty_deck_is_rejected() {
    assert!(matches!(Presentation::new(Vec::new()), Err(ContentError::Empty)));
    assert!(matches!(Presentation::from_json("[]"), Err(ContentError::Empty)));
}

#[test]
fn duplicate_id_is_rejected() {
    let e = Presentation::new(vec![Slide::new("a"), Slide::new("b"), Slide::new("a")]).unwrap_err();
    assert_eq!(e.to_string(), "duplicate slide id `a`");
}

#[test]
fn malformed_json_is_reported() {
    let e = Presentation::from_json("{not json").unwrap_err();
    assert!(matches!(e, ContentError::Json(_)));
    assert!(std::error::Error::source(&e).is_some());
}

#[test]
fn numbered_deck_is_never_empty() {
    assert_eq!(Presentation::numbered(0).slide_count(), 1);
    let p = Presentation::numbered(3);
    assert_eq!(p.slide_at(2).id, "slide-3");
    assert_eq!(p.slide_at(2).title.as_deref(), Some("Slide 3"));
}
