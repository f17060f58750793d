//! Invariants that hold for any sequence of navigation requests.

use proptest::prelude::*;
use slide_nav::{route::SlidePath, testing::Harness, RouteSync};

#[derive(Debug, Clone)]
enum Op {
    Next,
    Previous,
    GoTo(usize),
    Reset,
    ToggleAutoPlay,
    Route(String),
    Wait(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Next),
        2 => Just(Op::Previous),
        2 => (0usize..20).prop_map(Op::GoTo),
        1 => Just(Op::Reset),
        1 => Just(Op::ToggleAutoPlay),
        1 => (0u32..25).prop_map(|n| Op::Route(format!("/slide/{n}"))),
        1 => "[a-z/0-9]{0,10}".prop_map(Op::Route),
        4 => (0u64..6000).prop_map(Op::Wait),
    ]
}

fn apply(h: &mut Harness, op: &Op) {
    match op {
        Op::Next => {
            h.next_slide();
        }
        Op::Previous => {
            h.previous_slide();
        }
        Op::GoTo(i) => {
            h.go_to_slide(*i);
        }
        Op::Reset => {
            h.reset_presentation();
        }
        Op::ToggleAutoPlay => {
            h.toggle_auto_play();
        }
        Op::Route(path) => {
            h.sync_from_route(path);
        }
        Op::Wait(ms) => h.advance_ms(*ms),
    }
}

fn check_derived(h: &Harness) -> Result<(), TestCaseError> {
    let s = h.snapshot();
    prop_assert!(s.current_index < s.total_slides);
    prop_assert_eq!(s.can_go_next, s.current_index < s.total_slides - 1);
    prop_assert_eq!(s.can_go_previous, s.current_index > 0);
    prop_assert_eq!(
        s.slide_number,
        format!("{} / {}", s.current_index + 1, s.total_slides)
    );
    let expected = (s.current_index + 1) as f64 * 100.0 / s.total_slides as f64;
    prop_assert!((s.progress_percentage - expected).abs() < 1e-9);
    Ok(())
}

proptest! {
    #[test]
    fn index_stays_in_bounds(
        total in 1usize..12,
        ops in prop::collection::vec(op_strategy(), 0..40)
    ) {
        let mut h = Harness::new(total);
        for op in &ops {
            apply(&mut h, op);
            check_derived(&h)?;
        }
        h.settle();
        check_derived(&h)?;
    }
}

proptest! {
    #[test]
    fn progress_grows_by_one_step_per_advance(total in 1usize..15) {
        let mut h = Harness::new(total);
        let step = 100.0 / total as f64;
        let mut last = h.progress_percentage();
        for _ in 0..total + 2 {
            let before = h.current_index();
            h.next_slide();
            h.settle();
            let now = h.progress_percentage();
            prop_assert!(now >= last);
            if h.current_index() > before {
                prop_assert!((now - last - step).abs() < 1e-9);
            } else {
                prop_assert_eq!(before, total - 1);
            }
            last = now;
        }
        prop_assert_eq!(h.current_index(), total - 1);
    }
}

proptest! {
    #[test]
    fn route_round_trips(total in 1usize..30, k in 0usize..30) {
        prop_assume!(k < total);
        let mut h = Harness::new(total);
        h.go_to_slide(k);
        h.settle();
        prop_assert_eq!(h.current_index(), k);
        let path = SlidePath::from_index(k).to_string();
        prop_assert_eq!(h.sync_from_route(&path), RouteSync::Unchanged);
        prop_assert_eq!(h.current_index(), k);

        let mut other = Harness::new(total);
        other.sync_from_route(&path);
        prop_assert_eq!(other.current_index(), k);
    }
}

proptest! {
    #[test]
    fn auto_play_stops_exactly_at_last_slide(total in 2usize..10, start in 0usize..10) {
        prop_assume!(start < total - 1);
        let mut h = Harness::at(total, &SlidePath::from_index(start).to_string());
        h.start_auto_play();
        let interval = h.timings().auto_play_interval();
        let mut stopped_at = None;
        for _ in 0..total * 2 {
            h.advance(interval);
            h.settle();
            prop_assert!(h.current_index() < total);
            if !h.is_playing() && stopped_at.is_none() {
                stopped_at = Some(h.current_index());
            }
            if h.is_playing() {
                prop_assert!(h.current_index() < total - 1);
            }
        }
        prop_assert_eq!(stopped_at, Some(total - 1));
    }
}

proptest! {
    #[test]
    fn dispose_freezes_state(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let mut h = Harness::new(6);
        for op in &ops {
            apply(&mut h, op);
        }
        let index = h.current_index();
        h.dispose();
        h.take_log();
        for op in &ops {
            apply(&mut h, op);
        }
        h.advance_ms(10_000);
        prop_assert_eq!(h.current_index(), index);
        prop_assert!(h.take_log().is_empty());
        prop_assert_eq!(h.clock.pending(), 0);
    }
}
