//! Presentation commands
//!
//! The core never touches the page directly. Every visual change is emitted
//! as a [`Command`] to a [`PresentationSink`], and the host decides how to
//! render it.

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Something on the page a command applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    /// The root document element
    Document,
    Body,
    Navbar,
    NavMenu,
    MenuToggle,
    /// Navigation link pointing at the section with this id
    NavLink(String),
    /// Card, timeline item or other element animated on reveal
    Element(String),
    /// A whole page section
    Section(String),
    Image(String),
    ProgressBar,
    Particle(usize),
    HeroContent,
    /// Floating action button
    Fab,
    Stat(String),
}

/// CSS-like transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    Identity,
    TranslateX { px: f64 },
    TranslateY { px: f64 },
    TranslateYPercent { percent: f64 },
    Scale { factor: f64 },
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Identity => write!(f, "none"),
            Transform::TranslateX { px } => write!(f, "translateX({px}px)"),
            Transform::TranslateY { px } => write!(f, "translateY({px}px)"),
            Transform::TranslateYPercent { percent } => write!(f, "translateY({percent}%)"),
            Transform::Scale { factor } => write!(f, "scale({factor})"),
        }
    }
}

/// Timing curve of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Ease,
    EaseOut,
    /// `cubic-bezier(0.16, 1, 0.3, 1)`
    Emphasized,
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Ease => write!(f, "ease"),
            Easing::EaseOut => write!(f, "ease-out"),
            Easing::Emphasized => write!(f, "cubic-bezier(0.16, 1, 0.3, 1)"),
        }
    }
}

/// Transition applied to every animated property of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub duration_ms: u64,
    pub delay_ms: u64,
    pub easing: Easing,
}

impl Transition {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration_ms: duration.as_millis() as u64,
            delay_ms: 0,
            easing,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = delay.as_millis() as u64;
        self
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {}ms {}", self.duration_ms, self.easing)?;
        if self.delay_ms > 0 {
            write!(f, " {}ms", self.delay_ms)?;
        }
        Ok(())
    }
}

/// A single visual mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    SetVisibility { target: Target, visible: bool },
    SetOpacity { target: Target, opacity: f64 },
    SetTransform { target: Target, transform: Transform },
    SetBlur { target: Target, px: f64 },
    /// `None` disables transitions on the target
    SetTransition { target: Target, transition: Option<Transition> },
    SetClass { target: Target, class: String, enabled: bool },
    SetWidthPercent { target: Target, percent: f64 },
    SetStyle { target: Target, property: String, value: String },
    SetAttribute { target: Target, name: String, value: String },
    RemoveAttribute { target: Target, name: String },
    SetText { target: Target, text: String },
    /// Scroll the viewport to an absolute offset
    ScrollTo { top: f64, smooth: bool },
}

impl Command {
    pub fn class(target: Target, class: &str, enabled: bool) -> Self {
        Command::SetClass {
            target,
            class: class.to_string(),
            enabled,
        }
    }

    pub fn transform(target: Target, transform: Transform) -> Self {
        Command::SetTransform { target, transform }
    }

    pub fn opacity(target: Target, opacity: f64) -> Self {
        Command::SetOpacity { target, opacity }
    }

    pub fn transition(target: Target, transition: Option<Transition>) -> Self {
        Command::SetTransition { target, transition }
    }

    /// The target this command mutates, if any
    pub fn target(&self) -> Option<&Target> {
        match self {
            Command::SetVisibility { target, .. }
            | Command::SetOpacity { target, .. }
            | Command::SetTransform { target, .. }
            | Command::SetBlur { target, .. }
            | Command::SetTransition { target, .. }
            | Command::SetClass { target, .. }
            | Command::SetWidthPercent { target, .. }
            | Command::SetStyle { target, .. }
            | Command::SetAttribute { target, .. }
            | Command::RemoveAttribute { target, .. }
            | Command::SetText { target, .. } => Some(target),
            Command::ScrollTo { .. } => None,
        }
    }
}

/// Receiver of presentation commands (the rendering host)
pub trait PresentationSink: Send + Sync {
    fn apply(&self, command: Command);

    fn apply_batch(&self, commands: Vec<Command>) {
        for command in commands {
            self.apply(command);
        }
    }
}

/// Sink that stores every command, for tests and replay
#[derive(Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<Command>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded commands
    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().clone()
    }

    /// Drain the recorded commands
    pub fn take(&self) -> Vec<Command> {
        std::mem::take(&mut *self.commands.lock())
    }

    /// Recorded commands for one target
    pub fn for_target(&self, target: &Target) -> Vec<Command> {
        self.commands
            .lock()
            .iter()
            .filter(|c| c.target() == Some(target))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.lock().is_empty()
    }
}

impl PresentationSink for RecordingSink {
    fn apply(&self, command: Command) {
        self.commands.lock().push(command);
    }
}
