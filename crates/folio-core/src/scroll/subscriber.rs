//! Scroll subscriber trait

use super::ScrollFrame;

/// Trait for components that react to the sampled scroll signal
pub trait ScrollSubscriber: Send + Sync {
    /// Called at most once per paint frame with the current scroll state
    fn on_scroll_frame(&self, frame: &ScrollFrame);
}
