//! Mobile navigation menu
//!
//! Opening the menu locks page scrolling and slides the links in one after
//! another. Any link click, or a click outside both the menu and its toggle,
//! closes it again.

use std::sync::Arc;
use std::time::Duration;

use folio_core::config::NavigationConfig;
use folio_core::present::{Command, Easing, PresentationSink, Target, Transform, Transition};
use folio_core::scheduler::{Scheduler, TimerHandle};
use folio_core::EventBus;
use parking_lot::Mutex;
use tracing::debug;

/// Published whenever the menu opens or closes
#[derive(Debug, Clone)]
pub struct MenuToggled {
    pub open: bool,
}

folio_core::impl_event!(MenuToggled);

/// Where a document click landed, as resolved by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRegion {
    Toggle,
    Menu,
    Outside,
}

#[derive(Debug, Default)]
struct MenuState {
    open: bool,
    /// Entrance animations not yet started
    staggered: Vec<TimerHandle>,
}

pub struct MobileMenu {
    config: NavigationConfig,
    links: Vec<String>,
    state: Mutex<MenuState>,
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn PresentationSink>,
    events: Arc<EventBus>,
}

impl MobileMenu {
    pub fn new(
        config: NavigationConfig,
        links: Vec<String>,
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn PresentationSink>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            config,
            links,
            state: Mutex::new(MenuState::default()),
            scheduler,
            sink,
            events,
        }
    }

    /// Toggle button pressed. Returns whether the menu is now open.
    pub fn toggle(&self) -> bool {
        if self.is_open() {
            self.close();
            false
        } else {
            self.open();
            true
        }
    }

    fn open(&self) {
        let mut commands = self.chrome_commands(true);
        let mut handles = Vec::with_capacity(self.links.len());
        let transition = Transition::new(Duration::from_millis(self.config.menu_transition_ms), Easing::Ease);

        for (index, id) in self.links.iter().enumerate() {
            let link = Target::NavLink(id.clone());
            commands.push(Command::opacity(link.clone(), 0.0));
            commands.push(Command::transform(
                link.clone(),
                Transform::TranslateX { px: -self.config.menu_offset_px },
            ));

            let sink = Arc::clone(&self.sink);
            let delay = Duration::from_millis(self.config.menu_stagger_ms * index as u64);
            handles.push(self.scheduler.schedule(
                delay,
                Box::new(move || {
                    sink.apply_batch(vec![
                        Command::transition(link.clone(), Some(transition)),
                        Command::opacity(link.clone(), 1.0),
                        Command::transform(link, Transform::Identity),
                    ]);
                }),
            ));
        }

        {
            let mut state = self.state.lock();
            state.open = true;
            state.staggered = handles;
        }

        self.sink.apply_batch(commands);
        debug!(links = self.links.len(), "mobile menu opened");
        self.events.publish(MenuToggled { open: true });
    }

    /// Close the menu. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        let pending = {
            let mut state = self.state.lock();
            if !state.open {
                return false;
            }
            state.open = false;
            std::mem::take(&mut state.staggered)
        };

        for handle in pending {
            self.scheduler.cancel(handle);
        }

        self.sink.apply_batch(self.chrome_commands(false));
        debug!("mobile menu closed");
        self.events.publish(MenuToggled { open: false });
        true
    }

    /// A click anywhere in the document
    pub fn on_document_click(&self, region: ClickRegion) -> bool {
        match region {
            ClickRegion::Outside => self.close(),
            ClickRegion::Toggle | ClickRegion::Menu => false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    fn chrome_commands(&self, open: bool) -> Vec<Command> {
        vec![
            Command::class(Target::MenuToggle, "active", open),
            Command::class(Target::NavMenu, "active", open),
            Command::SetStyle {
                target: Target::Body,
                property: "overflow".to_string(),
                value: if open { "hidden" } else { "" }.to_string(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{RecordingSink, VirtualClock};

    fn setup() -> (Arc<VirtualClock>, Arc<RecordingSink>, MobileMenu) {
        let clock = Arc::new(VirtualClock::new());
        let sink = Arc::new(RecordingSink::new());
        let menu = MobileMenu::new(
            NavigationConfig::default(),
            vec!["home".into(), "about".into(), "contact".into()],
            clock.clone(),
            sink.clone(),
            Arc::new(EventBus::new()),
        );
        (clock, sink, menu)
    }

    #[test]
    fn test_open_locks_scroll_and_staggers_links() {
        let (clock, sink, menu) = setup();

        assert!(menu.toggle());
        assert!(sink.commands().contains(&Command::SetStyle {
            target: Target::Body,
            property: "overflow".into(),
            value: "hidden".into(),
        }));
        assert_eq!(clock.pending_timers(), 3);
        sink.take();

        // First link animates immediately, the others 50ms apart
        clock.advance(Duration::ZERO);
        assert_eq!(sink.take().len(), 3);
        clock.advance(Duration::from_millis(50));
        assert_eq!(sink.for_target(&Target::NavLink("about".into())).len(), 3);
        clock.advance(Duration::from_millis(50));
        assert_eq!(clock.pending_timers(), 0);
    }

    #[test]
    fn test_close_cancels_pending_entrances() {
        let (clock, sink, menu) = setup();

        menu.toggle();
        assert!(!menu.toggle());
        assert_eq!(clock.pending_timers(), 0);

        sink.take();
        clock.advance(Duration::from_secs(1));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_outside_click_closes() {
        let (_clock, _sink, menu) = setup();

        assert!(!menu.on_document_click(ClickRegion::Outside));
        menu.toggle();
        assert!(!menu.on_document_click(ClickRegion::Menu));
        assert!(menu.is_open());
        assert!(menu.on_document_click(ClickRegion::Outside));
        assert!(!menu.is_open());
    }
}
