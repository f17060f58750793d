use crate::{PlatformError, Slide};

/// Presentational component that animates a single slide in and out.
///
/// The controller only sequences these calls around its settle delays; how the
/// animation is drawn is up to the implementation.
pub trait SlideRenderer {
    /// Begin the enter animation; the slide becomes visible.
    fn show(&self, slide: &Slide);
    /// Begin the exit animation; the slide becomes hidden.
    fn hide(&self, slide: &Slide);
}

/// Window-level capabilities the controller needs from the host platform.
pub trait Viewport {
    fn is_fullscreen(&self) -> bool;
    fn request_fullscreen(&self) -> Result<(), PlatformError>;
    fn exit_fullscreen(&self) -> Result<(), PlatformError>;
    fn scroll_to_top(&self);
    /// Scrolls the thumbnail strip so the thumbnail of slide `id` is visible.
    fn scroll_thumbnail_into_view(&self, id: &str);
}
