use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use tracing::debug;

use super::{with_live, ControllerNode};
use crate::{route::SlidePath, Phase, Stage};

/// Drives one transition to `target` through its stages.
///
/// Each stage re-acquires the controller; if it has been dropped or disposed meanwhile the
/// remaining stages are skipped.
pub(super) async fn run(node: Weak<ControllerNode>, target: usize) {
    let Some(settle) = with_live(&node, |n| n.exit_animation(target)) else {
        return;
    };
    settle.await;
    let Some(settle) = with_live(&node, |n| n.mutate_index(target)) else {
        return;
    };
    settle.await;
    let Some(settle) = with_live(&node, |n| n.enter_animation(target)) else {
        return;
    };
    settle.await;
    with_live(&node, |n| n.scroll_settle());
}

impl ControllerNode {
    fn enter_stage(&self, stage: Stage, target: usize) {
        self.state.borrow_mut().phase = Phase::Transitioning { stage, target };
    }

    /// Hides the outgoing slide and waits for the exit animation.
    fn exit_animation(&self, target: usize) -> LocalBoxFuture<'static, ()> {
        self.enter_stage(Stage::ExitAnimation, target);
        self.ports.renderer.hide(self.current_slide());
        self.state.borrow_mut().slide_visible = false;
        self.notify();
        self.ports.clock.sleep(self.timings.exit_settle())
    }

    /// Commits the new index and route, then waits for the DOM to catch up.
    fn mutate_index(self: &Rc<Self>, target: usize) -> LocalBoxFuture<'static, ()> {
        self.enter_stage(Stage::IndexMutation, target);
        let from = self.state.borrow().current_index();
        if self.state.borrow_mut().set_index(target) {
            self.ports.route.replace(&SlidePath::from_index(target));
            debug!(from, to = target, "slide changed");
        }
        self.stop_auto_play_at_end();
        self.enter_stage(Stage::EnterAnimation, target);
        self.notify();
        self.ports.clock.sleep(self.timings.enter_settle())
    }

    /// Shows the incoming slide and waits before scrolling.
    fn enter_animation(&self, target: usize) -> LocalBoxFuture<'static, ()> {
        self.ports.renderer.show(self.current_slide());
        self.state.borrow_mut().slide_visible = true;
        self.enter_stage(Stage::ScrollSettle, target);
        self.notify();
        self.ports.clock.sleep(self.timings.scroll_settle())
    }

    fn scroll_settle(&self) {
        self.scroll_to_current();
        self.state.borrow_mut().phase = Phase::Idle;
        self.notify();
    }
}
