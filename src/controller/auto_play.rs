use std::{
    rc::{Rc, Weak},
    time::Duration,
};

use tracing::{debug, info};

use super::{with_live, ControllerNode, Request};
use crate::{utils::timer::Clock, Playback};

async fn ticks(node: Weak<ControllerNode>, clock: Rc<dyn Clock>, interval: Duration) {
    loop {
        clock.sleep(interval).await;
        if with_live(&node, |n| n.auto_play_tick()) != Some(true) {
            return;
        }
    }
}

impl ControllerNode {
    pub(super) fn start_auto_play(self: &Rc<Self>) -> Request {
        if self.disposed.get() {
            return Request::Disposed;
        }
        if !self.state.borrow().can_go_next() {
            debug!("already on the last slide; auto-play not started");
            return Request::OutOfBounds;
        }
        let interval = self.timings.auto_play_interval();
        let task = ticks(Rc::downgrade(self), self.ports.clock.clone(), interval);
        let Some(handle) = self.spawn(task) else {
            return Request::Unavailable;
        };
        let previous = self.tasks.borrow_mut().auto_play.replace(handle);
        drop(previous);
        self.state.borrow_mut().playback = Playback::Playing;
        info!(interval_ms = self.timings.auto_play_interval_ms, "auto-play started");
        self.notify();
        Request::Started
    }

    pub(super) fn pause_auto_play(&self) {
        if self.disposed.get() {
            return;
        }
        self.set_playback(Playback::Paused);
        info!("auto-play paused");
    }

    /// Stops auto-play once the last slide has been reached.
    pub(super) fn stop_auto_play_at_end(&self) {
        let at_end = {
            let state = self.state.borrow();
            state.is_playing() && !state.can_go_next()
        };
        if at_end {
            self.set_playback(Playback::Stopped);
            info!("auto-play reached the last slide");
        }
    }

    /// Switches to a non-playing mode and cancels the auto-play timer.
    fn set_playback(&self, playback: Playback) {
        debug_assert_ne!(playback, Playback::Playing);
        let timer = self.tasks.borrow_mut().auto_play.take();
        self.state.borrow_mut().playback = playback;
        drop(timer);
        self.notify();
    }

    /// One auto-play interval elapsed. Returns whether the timer should keep running.
    fn auto_play_tick(self: &Rc<Self>) -> bool {
        let (playing, can_go_next) = {
            let state = self.state.borrow();
            (state.is_playing(), state.can_go_next())
        };
        if !playing {
            return false;
        }
        if !can_go_next {
            self.set_playback(Playback::Stopped);
            info!("auto-play reached the last slide");
            return false;
        }
        if self.next_slide() == Request::Busy {
            debug!("auto-play tick skipped; transition in progress");
        }
        true
    }
}
