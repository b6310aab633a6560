//! Frame-gated scroll signal
//!
//! The viewport reports raw scroll events; the [`ScrollSampler`] collapses
//! them to at most one [`ScrollFrame`] per paint frame and fans that frame
//! out to every registered [`ScrollSubscriber`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod sampler;
mod subscriber;
mod viewport;

pub use sampler::ScrollSampler;
pub use subscriber::ScrollSubscriber;
pub use viewport::{SimulatedViewport, Viewport, ViewportMetrics};

/// Snapshot delivered to subscribers once per frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollFrame {
    /// Vertical scroll offset, always finite and non-negative
    pub scroll_top: f64,
    pub metrics: ViewportMetrics,
    /// Host time at which the frame ran
    pub timestamp: Duration,
}

/// Clamp a raw scroll reading to a usable scalar.
///
/// Negative values (overscroll bounce) and non-finite values become 0.
pub fn sanitize_scroll(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_scroll() {
        assert_eq!(sanitize_scroll(120.5), 120.5);
        assert_eq!(sanitize_scroll(-30.0), 0.0);
        assert_eq!(sanitize_scroll(f64::NAN), 0.0);
        assert_eq!(sanitize_scroll(f64::INFINITY), 0.0);
    }
}
