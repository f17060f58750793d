use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

#[test]
fn first_slide_of_ten() {
    let s = NavigationState::new(10, 0);
    assert_eq!(s.current_index(), 0);
    assert!(!s.can_go_previous());
    assert!(s.can_go_next());
    assert_eq!(s.slide_number(), "1 / 10");
    assert_eq!(s.progress_percentage(), 10.0);
}

#[test]
fn last_slide_of_ten() {
    let s = NavigationState::new(10, 9);
    assert!(!s.can_go_next());
    assert!(s.can_go_previous());
    assert_eq!(s.slide_number(), "10 / 10");
    assert_eq!(s.progress_percentage(), 100.0);
}

#[test]
fn single_slide_deck_has_no_affordances() {
    let s = NavigationState::new(1, 0);
    assert!(!s.can_go_next());
    assert!(!s.can_go_previous());
    assert_eq!(s.progress_percentage(), 100.0);
}

#[rstest]
#[case(10, 42, 9)]
#[case(0, 0, 0)]
#[case(0, 5, 0)]
#[case(3, 2, 2)]
fn new_clamps_into_range(#[case] total: usize, #[case] index: usize, #[case] expected: usize) {
    let s = NavigationState::new(total, index);
    assert_eq!(s.current_index(), expected);
    assert!(s.current_index() < s.total_slides());
}

#[test]
fn set_index_rejects_out_of_range() {
    let mut s = NavigationState::new(4, 2);
    assert!(!s.set_index(4));
    assert_eq!(s.current_index(), 2);
    assert!(s.set_index(3));
    assert_eq!(s.current_index(), 3);
}

#[test]
fn progress_grows_by_one_share_per_slide() {
    let mut s = NavigationState::new(8, 0);
    let step = 100.0 / 8.0;
    let mut last = s.progress_percentage();
    while s.can_go_next() {
        let next = s.current_index() + 1;
        s.set_index(next);
        let p = s.progress_percentage();
        assert!((p - last - step).abs() < 1e-9);
        last = p;
    }
}

#[test]
fn playback_flags_are_exclusive() {
    let mut s = NavigationState::new(3, 0);
    for playback in [Playback::Stopped, Playback::Playing, Playback::Paused] {
        s.playback = playback;
        assert!(!(s.is_playing() && s.is_paused()));
    }
}

#[test]
fn snapshot_serializes_flat() {
    let mut s = NavigationState::new(10, 3);
    s.phase = Phase::Transitioning {
        stage: Stage::EnterAnimation,
        target: 3,
    };
    s.playback = Playback::Playing;
    let json = serde_json::to_value(NavigationSnapshot::new(&s, "zones")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "current_index": 3,
            "slide_id": "zones",
            "total_slides": 10,
            "slide_number": "4 / 10",
            "progress_percentage": 40.0,
            "can_go_next": true,
            "can_go_previous": true,
            "playback": "playing",
            "phase": "transitioning",
            "stage": "enter_animation",
            "target": 3,
        })
    );
}

#[test]
fn stage_display_is_snake_case() {
    assert_eq!(Stage::ScrollSettle.to_string(), "scroll_settle");
    assert_eq!(Playback::Paused.to_string(), "paused");
}
