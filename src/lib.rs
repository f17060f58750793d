//! Headless navigation controller for slide-deck presentations.
//!
//! [`NavigationController`] owns the current slide index and derives everything a view needs
//! from it: progress, slide number, navigation affordances. Each transition is a sequence of
//! named stages separated by settle delays, so exit and enter animations can finish before
//! the next stage runs. The index is mirrored to a `/slide/{n}` route, a timer can advance
//! the deck automatically, and a fixed key table drives it all from the keyboard.
//!
//! The controller talks to its surroundings only through the traits in [`Ports`]: slide
//! content, router, renderer, viewport, clock and executor. [`testing::Harness`] wires them
//! to in-memory fakes and a [`VirtualClock`](utils::timer::VirtualClock).
//!
//! ```
//! use slide_nav::testing::Harness;
//!
//! let mut deck = Harness::at(10, "/slide/1");
//! deck.next_slide();
//! deck.settle();
//! assert_eq!(deck.slide_number(), "2 / 10");
//! assert_eq!(deck.route_path().as_deref(), Some("/slide/2"));
//! ```

mod config;
mod content;
mod controller;
mod error;
pub mod keyboard;
mod platform;
pub mod route;
mod state;
mod subscription;
pub mod testing;
pub mod utils;

pub use config::*;
pub use content::*;
pub use controller::*;
pub use error::*;
pub use platform::*;
pub use state::*;
pub use subscription::*;
