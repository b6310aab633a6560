use std::fmt;
use std::sync::Arc;

use folio_core::present::{Command, PresentationSink, Target};
use folio_core::EventBus;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Colour scheme of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Value of the document's `data-theme` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Published whenever the theme is set
#[derive(Debug, Clone)]
pub struct ThemeChanged {
    pub theme: Theme,
}

folio_core::impl_event!(ThemeChanged);

/// Owns the current theme; the theme toggle button drives it
pub struct ThemeController {
    current: Mutex<Theme>,
    sink: Arc<dyn PresentationSink>,
    events: Arc<EventBus>,
}

impl ThemeController {
    /// Create the controller and apply the initial theme
    pub fn new(initial: Theme, sink: Arc<dyn PresentationSink>, events: Arc<EventBus>) -> Self {
        let controller = Self {
            current: Mutex::new(initial),
            sink,
            events,
        };
        controller.set_theme(initial);
        controller
    }

    pub fn set_theme(&self, theme: Theme) {
        *self.current.lock() = theme;
        self.sink.apply(Command::SetAttribute {
            target: Target::Document,
            name: "data-theme".to_string(),
            value: theme.as_str().to_string(),
        });
        info!(%theme, "theme applied");
        self.events.publish(ThemeChanged { theme });
    }

    /// Switch between dark and light. Returns the new theme.
    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.set_theme(next);
        next
    }

    pub fn current(&self) -> Theme {
        *self.current.lock()
    }
}
