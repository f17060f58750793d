use parse_display::Display;
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// Auto-play mode, orthogonal to transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Playback {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Named stages of a transition, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ExitAnimation,
    IndexMutation,
    EnterAnimation,
    ScrollSettle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Transitioning { stage: Stage, target: usize },
}

impl Phase {
    pub fn is_idle(self) -> bool {
        self == Phase::Idle
    }
}

/// Position and modes of a presentation.
///
/// `current_index < total_slides()` holds for every value of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current_index: usize,
    total_slides: usize,
    pub(crate) playback: Playback,
    pub(crate) phase: Phase,
    pub(crate) slide_visible: bool,
}

impl NavigationState {
    /// State for a deck of `total_slides` (at least one) positioned at `index`, clamped.
    pub fn new(total_slides: usize, index: usize) -> Self {
        let total_slides = total_slides.max(1);
        Self {
            current_index: index.min(total_slides - 1),
            total_slides,
            playback: Playback::Stopped,
            phase: Phase::Idle,
            slide_visible: true,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }
    pub fn total_slides(&self) -> usize {
        self.total_slides
    }
    pub fn playback(&self) -> Playback {
        self.playback
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }
    pub fn is_paused(&self) -> bool {
        self.playback == Playback::Paused
    }
    pub fn can_go_next(&self) -> bool {
        self.current_index < self.total_slides - 1
    }
    pub fn can_go_previous(&self) -> bool {
        self.current_index > 0
    }
    pub fn progress_percentage(&self) -> f64 {
        (self.current_index + 1) as f64 / self.total_slides as f64 * 100.0
    }
    pub fn slide_number(&self) -> String {
        format!("{} / {}", self.current_index + 1, self.total_slides)
    }
    pub fn contains(&self, index: usize) -> bool {
        index < self.total_slides
    }

    /// Moves to `index` if it is in range. Returns `false` and leaves the state untouched
    /// otherwise.
    pub fn set_index(&mut self, index: usize) -> bool {
        if !self.contains(index) {
            return false;
        }
        self.current_index = index;
        true
    }
}

/// Everything a view needs to draw the navigation chrome, captured at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationSnapshot {
    pub current_index: usize,
    pub slide_id: String,
    pub total_slides: usize,
    pub slide_number: String,
    pub progress_percentage: f64,
    pub can_go_next: bool,
    pub can_go_previous: bool,
    pub playback: Playback,
    #[serde(flatten)]
    pub phase: Phase,
}

impl NavigationSnapshot {
    pub fn new(state: &NavigationState, slide_id: &str) -> Self {
        Self {
            current_index: state.current_index(),
            slide_id: slide_id.to_owned(),
            total_slides: state.total_slides(),
            slide_number: state.slide_number(),
            progress_percentage: state.progress_percentage(),
            can_go_next: state.can_go_next(),
            can_go_previous: state.can_go_previous(),
            playback: state.playback(),
            phase: state.phase(),
        }
    }
    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }
}
