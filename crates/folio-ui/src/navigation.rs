//! In-page navigation: nav links and the floating action button

use std::sync::Arc;
use std::time::Duration;

use folio_core::config::NavigationConfig;
use folio_core::present::{Command, PresentationSink, Target, Transform};
use folio_core::scheduler::Scheduler;
use folio_core::PageLayout;
use tracing::{debug, warn};

use crate::menu::MobileMenu;

/// Section the floating action button jumps to
pub const FAB_DESTINATION: &str = "contact";

pub struct Navigator {
    config: NavigationConfig,
    layout: Arc<PageLayout>,
    menu: Arc<MobileMenu>,
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn PresentationSink>,
}

impl Navigator {
    pub fn new(
        config: NavigationConfig,
        layout: Arc<PageLayout>,
        menu: Arc<MobileMenu>,
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            config,
            layout,
            menu,
            scheduler,
            sink,
        }
    }

    /// Smooth-scroll to a section, leaving room for the fixed navbar.
    ///
    /// Returns the scroll offset requested, or `None` for an unknown section.
    pub fn scroll_to_section(&self, id: &str) -> Option<f64> {
        let Some(section) = self.layout.section(id) else {
            warn!(section = id, "navigation to unknown section ignored");
            return None;
        };

        let top = (section.top - self.config.scroll_offset).max(0.0);
        self.sink.apply(Command::ScrollTo { top, smooth: true });
        debug!(section = id, top, "scrolling to section");
        Some(top)
    }

    /// A nav link was clicked
    pub fn on_link_click(&self, id: &str) -> Option<f64> {
        let top = self.scroll_to_section(id)?;
        self.menu.close();

        let link = Target::NavLink(id.to_string());
        self.sink.apply(Command::class(link.clone(), "ripple", true));
        let sink = Arc::clone(&self.sink);
        self.scheduler.schedule(
            Duration::from_millis(self.config.ripple_ms),
            Box::new(move || sink.apply(Command::class(link, "ripple", false))),
        );

        Some(top)
    }

    /// The floating action button was clicked
    pub fn on_fab_click(&self) -> Option<f64> {
        let top = self.scroll_to_section(FAB_DESTINATION)?;

        self.sink.apply(Command::transform(
            Target::Fab,
            Transform::Scale {
                factor: self.config.fab_pulse_scale,
            },
        ));
        let sink = Arc::clone(&self.sink);
        self.scheduler.schedule(
            Duration::from_millis(self.config.fab_pulse_ms),
            Box::new(move || sink.apply(Command::transform(Target::Fab, Transform::Scale { factor: 1.0 }))),
        );

        Some(top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{EventBus, RecordingSink, SectionDescriptor, VirtualClock};

    struct Fixture {
        clock: Arc<VirtualClock>,
        sink: Arc<RecordingSink>,
        menu: Arc<MobileMenu>,
        nav: Navigator,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(VirtualClock::new());
        let sink = Arc::new(RecordingSink::new());
        let layout = Arc::new(PageLayout {
            sections: vec![
                SectionDescriptor::new("home", 0.0, 800.0),
                SectionDescriptor::new("about", 800.0, 700.0),
                SectionDescriptor::new("contact", 1500.0, 700.0),
            ],
            nav_links: vec!["home".into(), "about".into(), "contact".into()],
            ..Default::default()
        });
        let menu = Arc::new(MobileMenu::new(
            NavigationConfig::default(),
            layout.nav_links.clone(),
            clock.clone(),
            sink.clone(),
            Arc::new(EventBus::new()),
        ));
        let nav = Navigator::new(
            NavigationConfig::default(),
            layout,
            menu.clone(),
            clock.clone(),
            sink.clone(),
        );
        Fixture { clock, sink, menu, nav }
    }

    #[test]
    fn test_link_click_scrolls_with_navbar_offset() {
        let f = fixture();

        assert_eq!(f.nav.on_link_click("about"), Some(720.0));
        assert_eq!(f.nav.on_link_click("home"), Some(0.0));
        assert!(f.sink.commands().contains(&Command::ScrollTo { top: 720.0, smooth: true }));
    }

    #[test]
    fn test_link_click_closes_menu_and_clears_ripple() {
        let f = fixture();
        f.menu.toggle();
        f.clock.advance(Duration::from_millis(200));
        f.sink.take();

        f.nav.on_link_click("about");
        assert!(!f.menu.is_open());

        let link = Target::NavLink("about".into());
        assert!(f.sink.for_target(&link).contains(&Command::class(link.clone(), "ripple", true)));

        f.sink.take();
        f.clock.advance(Duration::from_millis(600));
        assert_eq!(f.sink.take(), vec![Command::class(link, "ripple", false)]);
    }

    #[test]
    fn test_unknown_section_ignored() {
        let f = fixture();
        assert_eq!(f.nav.on_link_click("blog"), None);
        assert!(f.sink.is_empty());
        assert_eq!(f.clock.pending_timers(), 0);
    }

    #[test]
    fn test_fab_pulses_and_jumps_to_contact() {
        let f = fixture();

        assert_eq!(f.nav.on_fab_click(), Some(1420.0));
        assert_eq!(
            f.sink.for_target(&Target::Fab),
            vec![Command::transform(Target::Fab, Transform::Scale { factor: 0.9 })]
        );

        f.clock.advance(Duration::from_millis(150));
        assert_eq!(
            f.sink.for_target(&Target::Fab).last(),
            Some(&Command::transform(Target::Fab, Transform::Scale { factor: 1.0 }))
        );
    }
}
