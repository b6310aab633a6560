use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Size of the visible area and of the scrollable document
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportMetrics {
    pub width: f64,
    pub height: f64,
    /// Full scroll height of the document
    pub document_height: f64,
}

impl ViewportMetrics {
    pub fn new(width: f64, height: f64, document_height: f64) -> Self {
        Self {
            width,
            height,
            document_height,
        }
    }

    /// Whether the width is at or below the given mobile breakpoint
    pub fn is_mobile(&self, breakpoint: f64) -> bool {
        self.width <= breakpoint
    }

    /// Distance the document can scroll; may be zero or negative on short pages
    pub fn scrollable_height(&self) -> f64 {
        self.document_height - self.height
    }
}

/// Host viewport the sampler reads from
pub trait Viewport: Send + Sync {
    /// Current vertical scroll offset (raw, unsanitised)
    fn scroll_top(&self) -> f64;

    fn metrics(&self) -> ViewportMetrics;
}

/// In-memory viewport driven by the replay binary and tests
pub struct SimulatedViewport {
    state: RwLock<(f64, ViewportMetrics)>,
}

impl SimulatedViewport {
    pub fn new(metrics: ViewportMetrics) -> Self {
        Self {
            state: RwLock::new((0.0, metrics)),
        }
    }

    /// Move the scroll offset. The value is stored as given.
    pub fn scroll_to(&self, top: f64) {
        self.state.write().0 = top;
    }

    pub fn resize(&self, width: f64, height: f64) {
        let mut state = self.state.write();
        state.1.width = width;
        state.1.height = height;
    }

    pub fn set_document_height(&self, document_height: f64) {
        self.state.write().1.document_height = document_height;
    }
}

impl Viewport for SimulatedViewport {
    fn scroll_top(&self) -> f64 {
        self.state.read().0
    }

    fn metrics(&self) -> ViewportMetrics {
        self.state.read().1
    }
}
