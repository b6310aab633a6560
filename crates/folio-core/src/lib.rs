//! Core functionality for the portfolio page
//!
//! This crate provides the scroll-driven view state: a frame-gated scroll
//! sampler fanning out to the navbar controller, the active-section tracker
//! and the parallax/progress renderer, plus one-shot reveal animations and
//! lazy image loading. The host supplies a [`Viewport`], a [`Scheduler`] and
//! a [`PresentationSink`]; the core never touches the page itself.

pub mod config;
pub mod events;
pub mod layout;
pub mod lazy;
pub mod navbar;
pub mod page;
pub mod parallax;
pub mod present;
pub mod reveal;
pub mod scheduler;
pub mod scroll;
pub mod sections;

use thiserror::Error;

// Re-export commonly used types
pub use config::PageConfig;
pub use events::EventBus;
pub use layout::{ElementRect, PageLayout, SectionDescriptor};
pub use navbar::{NavMode, NavbarController};
pub use page::PageView;
pub use present::{Command, PresentationSink, RecordingSink, Target, Transform, Transition};
pub use reveal::{IntersectionEntry, RevealEngine, RevealState};
pub use scheduler::{DebounceSlot, Scheduler, TimerHandle, VirtualClock};
pub use scroll::{ScrollFrame, ScrollSampler, ScrollSubscriber, SimulatedViewport, Viewport, ViewportMetrics};
pub use sections::ActiveSectionTracker;

/// Errors that can occur while loading page configuration or layout
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;
