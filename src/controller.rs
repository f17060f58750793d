use std::{
    cell::{Cell, RefCell},
    mem::{replace, take},
    rc::{Rc, Weak},
};

use futures::{
    future::RemoteHandle,
    task::{LocalSpawn, LocalSpawnExt},
    Future,
};
use parse_display::Display;
use slabmap::SlabMap;
use tracing::{debug, info, warn};

use crate::{
    keyboard::{self, Command, KeyEvent},
    route::{self, Resolution, RoutePort},
    utils::timer::Clock,
    ContentError, NavigationSnapshot, NavigationState, Phase, PlatformError, Playback, Slide,
    SlideRenderer, SlideSource, Stage, Subscription, Timings, Viewport,
};

mod auto_play;
mod transition;


/// Collaborators of a [`NavigationController`].
pub struct Ports {
    pub slides: Rc<dyn SlideSource>,
    pub route: Rc<dyn RoutePort>,
    pub renderer: Rc<dyn SlideRenderer>,
    pub viewport: Rc<dyn Viewport>,
    pub clock: Rc<dyn Clock>,
    /// Executor for transition, scroll and auto-play continuations.
    pub spawner: Rc<dyn LocalSpawn>,
}

/// What happened to a navigation or auto-play request.
///
/// None of these are errors; callers are free to ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(style = "snake_case")]
pub enum Request {
    Started,
    /// The target is outside the deck, or there is no slide to advance to.
    OutOfBounds,
    /// Another transition is still running.
    Busy,
    /// The executor refused the continuation.
    Unavailable,
    Disposed,
}

/// What an inbound route change did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSync {
    Unchanged,
    Moved(usize),
    /// The path was invalid; the route was replaced with `/slide/1`.
    Redirected,
    Disposed,
}

type Listener = Rc<RefCell<dyn FnMut(&NavigationSnapshot)>>;

#[derive(Default)]
struct Tasks {
    transition: Option<RemoteHandle<()>>,
    scroll: Option<RemoteHandle<()>>,
    auto_play: Option<RemoteHandle<()>>,
}

/// Owner of the current slide index, auto-play mode and transition sequencing.
///
/// Transitions run as spawned continuations: `hide()`, exit settle, index change and route
/// replace, enter settle, `show()`, scroll settle, scroll. While one is running, further
/// navigation requests are rejected with [`Request::Busy`].
///
/// Dropping the controller cancels every pending continuation.
pub struct NavigationController {
    node: Rc<ControllerNode>,
}

struct ControllerNode {
    ports: Ports,
    timings: Timings,
    state: RefCell<NavigationState>,
    tasks: RefCell<Tasks>,
    listeners: RefCell<SlabMap<Listener>>,
    notifying: Cell<bool>,
    stale: Cell<bool>,
    disposed: Cell<bool>,
}

struct NotifyGuard<'a>(&'a Cell<bool>);

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl NavigationController {
    /// Creates a controller positioned by `initial_path`.
    ///
    /// No path starts at the first slide. An invalid path also starts at the first slide and
    /// replaces the route with `/slide/1`.
    pub fn new(
        ports: Ports,
        timings: Timings,
        initial_path: Option<&str>,
    ) -> Result<Self, ContentError> {
        let total = ports.slides.slide_count();
        if total == 0 {
            return Err(ContentError::Empty);
        }
        let (index, redirect) = match initial_path.map(|path| route::resolve(path, total)) {
            None => (0, None),
            Some(Resolution::Slide(index)) => (index, None),
            Some(Resolution::Redirect(to)) => (0, Some(to)),
        };
        let node = Rc::new(ControllerNode {
            ports,
            timings,
            state: RefCell::new(NavigationState::new(total, index)),
            tasks: RefCell::new(Tasks::default()),
            listeners: RefCell::new(SlabMap::new()),
            notifying: Cell::new(false),
            stale: Cell::new(false),
            disposed: Cell::new(false),
        });
        if let Some(to) = redirect {
            info!(path = initial_path, redirect = %to, "invalid initial slide route");
            node.ports.route.replace(&to);
        }
        debug!(index, total, "navigation controller created");
        Ok(Self { node })
    }

    pub fn timings(&self) -> &Timings {
        &self.node.timings
    }
    pub fn state(&self) -> NavigationState {
        self.node.state.borrow().clone()
    }
    pub fn snapshot(&self) -> NavigationSnapshot {
        self.node.snapshot()
    }
    pub fn current_index(&self) -> usize {
        self.node.state.borrow().current_index()
    }
    pub fn current_slide(&self) -> Slide {
        self.node.current_slide().clone()
    }
    pub fn total_slides(&self) -> usize {
        self.node.state.borrow().total_slides()
    }
    pub fn can_go_next(&self) -> bool {
        self.node.state.borrow().can_go_next()
    }
    pub fn can_go_previous(&self) -> bool {
        self.node.state.borrow().can_go_previous()
    }
    pub fn progress_percentage(&self) -> f64 {
        self.node.state.borrow().progress_percentage()
    }
    pub fn slide_number(&self) -> String {
        self.node.state.borrow().slide_number()
    }
    pub fn playback(&self) -> Playback {
        self.node.state.borrow().playback()
    }
    pub fn is_playing(&self) -> bool {
        self.node.state.borrow().is_playing()
    }
    pub fn is_paused(&self) -> bool {
        self.node.state.borrow().is_paused()
    }
    pub fn phase(&self) -> Phase {
        self.node.state.borrow().phase()
    }
    pub fn is_transitioning(&self) -> bool {
        !self.phase().is_idle()
    }
    pub fn is_disposed(&self) -> bool {
        self.node.disposed.get()
    }

    pub fn next_slide(&self) -> Request {
        self.node.next_slide()
    }
    pub fn previous_slide(&self) -> Request {
        self.node.previous_slide()
    }
    /// Runs a transition to `index`. Out-of-range indices are ignored.
    pub fn go_to_slide(&self, index: usize) -> Request {
        self.node.request_transition(index)
    }
    pub fn reset_presentation(&self) -> Request {
        self.node.request_transition(0)
    }

    pub fn start_auto_play(&self) -> Request {
        self.node.start_auto_play()
    }
    /// Pauses auto-play and cancels its timer. A running transition completes normally.
    pub fn pause_auto_play(&self) {
        self.node.pause_auto_play()
    }
    /// Pauses if playing, starts otherwise. Returns the resulting mode.
    pub fn toggle_auto_play(&self) -> Playback {
        if self.is_playing() {
            self.pause_auto_play();
        } else {
            self.start_auto_play();
        }
        self.playback()
    }

    pub fn toggle_fullscreen(&self) -> Result<(), PlatformError> {
        if self.is_disposed() {
            return Ok(());
        }
        let viewport = &self.node.ports.viewport;
        if viewport.is_fullscreen() {
            viewport.exit_fullscreen()
        } else {
            viewport.request_fullscreen()
        }
    }

    /// Applies an inbound route change without animating.
    pub fn sync_from_route(&self, path: &str) -> RouteSync {
        self.node.sync_from_route(path)
    }

    /// Runs `command`. Platform failures are logged and swallowed.
    pub fn dispatch(&self, command: Command) {
        match command {
            Command::Next => {
                self.next_slide();
            }
            Command::Previous => {
                self.previous_slide();
            }
            Command::First => {
                self.go_to_slide(0);
            }
            Command::Last => {
                self.go_to_slide(self.total_slides() - 1);
            }
            Command::Reset => {
                self.reset_presentation();
            }
            Command::ToggleAutoPlay => {
                self.toggle_auto_play();
            }
            Command::ToggleFullscreen => {
                if let Err(e) = self.toggle_fullscreen() {
                    warn!(error = %e, "fullscreen toggle failed");
                }
            }
        }
    }

    /// Handles a key press. Returns `true` if the key is bound, i.e. the platform default
    /// should be suppressed.
    pub fn handle_key(&self, event: &KeyEvent) -> bool {
        if self.is_disposed() {
            return false;
        }
        let Some(command) = keyboard::map_key(event) else {
            return false;
        };
        debug!(key = %event.key, %command, "key command");
        self.dispatch(command);
        true
    }

    /// Registers `f` to receive a snapshot after every observable change.
    pub fn subscribe(&self, f: impl FnMut(&NavigationSnapshot) + 'static) -> Subscription {
        if self.is_disposed() {
            return Subscription::empty();
        }
        let listener: Listener = Rc::new(RefCell::new(f));
        let key = self.node.listeners.borrow_mut().insert(listener);
        Subscription::from_weak_fn(Rc::downgrade(&self.node), move |node| {
            node.listeners.borrow_mut().remove(key);
        })
    }

    /// Cancels all continuations and listeners. Every later request is a no-op.
    pub fn dispose(&self) {
        if self.node.disposed.replace(true) {
            return;
        }
        let tasks = take(&mut *self.node.tasks.borrow_mut());
        let listeners = replace(&mut *self.node.listeners.borrow_mut(), SlabMap::new());
        drop(tasks);
        drop(listeners);
        debug!("navigation controller disposed");
    }
}

impl Drop for NavigationController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl ControllerNode {
    fn current_slide(&self) -> &Slide {
        let index = self.state.borrow().current_index();
        self.ports.slides.slide_at(index)
    }

    fn snapshot(&self) -> NavigationSnapshot {
        let state = self.state.borrow();
        let slide = self.ports.slides.slide_at(state.current_index());
        NavigationSnapshot::new(&state, &slide.id)
    }

    /// Sends the current snapshot to every listener.
    ///
    /// A change made by a listener while this runs is not delivered from inside the
    /// callback; it marks the round stale and every listener gets another, fresh snapshot
    /// once the current round has finished.
    fn notify(&self) {
        if self.notifying.replace(true) {
            self.stale.set(true);
            return;
        }
        let _reset = NotifyGuard(&self.notifying);
        loop {
            self.stale.set(false);
            let listeners: Vec<Listener> = self
                .listeners
                .borrow()
                .iter()
                .map(|(_, l)| l.clone())
                .collect();
            if listeners.is_empty() {
                return;
            }
            let snapshot = self.snapshot();
            for listener in listeners {
                if self.disposed.get() {
                    return;
                }
                if let Ok(mut f) = listener.try_borrow_mut() {
                    (*f)(&snapshot);
                }
            }
            if !self.stale.get() {
                return;
            }
        }
    }

    fn spawn(&self, task: impl Future<Output = ()> + 'static) -> Option<RemoteHandle<()>> {
        match self.ports.spawner.spawn_local_with_handle(task) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "executor unavailable");
                None
            }
        }
    }

    fn next_slide(self: &Rc<Self>) -> Request {
        let state = self.state.borrow();
        if !state.can_go_next() {
            debug!(index = state.current_index(), "no next slide");
            return Request::OutOfBounds;
        }
        let target = state.current_index() + 1;
        drop(state);
        self.request_transition(target)
    }

    fn previous_slide(self: &Rc<Self>) -> Request {
        let state = self.state.borrow();
        if !state.can_go_previous() {
            debug!(index = state.current_index(), "no previous slide");
            return Request::OutOfBounds;
        }
        let target = state.current_index() - 1;
        drop(state);
        self.request_transition(target)
    }

    fn request_transition(self: &Rc<Self>, target: usize) -> Request {
        if self.disposed.get() {
            return Request::Disposed;
        }
        let from = {
            let mut state = self.state.borrow_mut();
            if !state.contains(target) {
                debug!(target, total = state.total_slides(), "navigation target out of range");
                return Request::OutOfBounds;
            }
            if let Phase::Transitioning {
                stage,
                target: pending,
            } = state.phase()
            {
                debug!(target, pending, %stage, "transition in progress; request rejected");
                return Request::Busy;
            }
            state.phase = Phase::Transitioning {
                stage: Stage::ExitAnimation,
                target,
            };
            state.current_index()
        };
        let Some(handle) = self.spawn(transition::run(Rc::downgrade(self), target)) else {
            self.state.borrow_mut().phase = Phase::Idle;
            return Request::Unavailable;
        };
        let finished = self.tasks.borrow_mut().transition.replace(handle);
        drop(finished);
        debug!(from, target, "transition started");
        Request::Started
    }

    fn sync_from_route(self: &Rc<Self>, path: &str) -> RouteSync {
        if self.disposed.get() {
            return RouteSync::Disposed;
        }
        let (current, total, idle) = {
            let state = self.state.borrow();
            (
                state.current_index(),
                state.total_slides(),
                state.phase().is_idle(),
            )
        };
        match route::resolve(path, total) {
            Resolution::Slide(index) if index == current => RouteSync::Unchanged,
            Resolution::Slide(index) => {
                debug!(path, from = current, to = index, "route sync");
                self.jump_to(index);
                RouteSync::Moved(index)
            }
            Resolution::Redirect(to) => {
                info!(path, redirect = %to, "invalid slide route");
                self.ports.route.replace(&to);
                if current != 0 || !idle {
                    self.jump_to(0);
                }
                RouteSync::Redirected
            }
        }
    }

    /// Moves straight to `index`, aborting any running transition, then schedules the scroll
    /// effect.
    fn jump_to(self: &Rc<Self>, index: usize) {
        let aborted = self.tasks.borrow_mut().transition.take();
        drop(aborted);
        let was_hidden = {
            let mut state = self.state.borrow_mut();
            state.set_index(index);
            state.phase = Phase::Idle;
            !replace(&mut state.slide_visible, true)
        };
        if was_hidden {
            self.ports.renderer.show(self.ports.slides.slide_at(index));
        }
        self.stop_auto_play_at_end();
        self.notify();
        self.schedule_scroll();
    }

    fn schedule_scroll(self: &Rc<Self>) {
        let node = Rc::downgrade(self);
        let settle = self.ports.clock.sleep(self.timings.scroll_settle());
        let task = async move {
            settle.await;
            with_live(&node, |node| node.scroll_to_current());
        };
        if let Some(handle) = self.spawn(task) {
            let previous = self.tasks.borrow_mut().scroll.replace(handle);
            drop(previous);
        }
    }

    fn scroll_to_current(&self) {
        let slide = self.current_slide();
        self.ports.viewport.scroll_to_top();
        self.ports.viewport.scroll_thumbnail_into_view(&slide.id);
    }
}

/// Runs `f` if the controller is still alive and not disposed.
fn with_live<T>(
    node: &Weak<ControllerNode>,
    f: impl FnOnce(&Rc<ControllerNode>) -> T,
) -> Option<T> {
    let node = node.upgrade()?;
    if node.disposed.get() {
        return None;
    }
    Some(f(&node))
}
