//! Interaction layer for the portfolio page
//!
//! This crate provides the click-driven parts of the page: theme switching,
//! the mobile menu, in-page navigation, the page-load entrance and the hero
//! stat counters. They sit
//! on top of a [`PageView`] and share its scheduler, sink and event bus.

pub mod counter;
pub mod intro;
pub mod menu;
pub mod navigation;
pub mod theme;

use std::sync::Arc;

use folio_core::PageView;
use tracing::info;

// Re-export commonly used types
pub use counter::{CounterAnimation, CounterStep, StatCounters};
pub use intro::PageIntro;
pub use menu::{ClickRegion, MenuToggled, MobileMenu};
pub use navigation::Navigator;
pub use theme::{Theme, ThemeChanged, ThemeController};

/// Everything on the page that reacts to clicks rather than scrolling
pub struct PageChrome {
    pub theme: ThemeController,
    pub menu: Arc<MobileMenu>,
    pub navigator: Navigator,
    pub counters: StatCounters,
    pub intro: PageIntro,
}

impl PageChrome {
    /// Wire the interaction components to an existing page view
    pub fn new(page: &PageView, theme: Theme) -> Self {
        let config = &page.config;
        let menu = Arc::new(MobileMenu::new(
            config.navigation.clone(),
            page.layout.nav_links.clone(),
            page.scheduler.clone(),
            page.sink.clone(),
            page.events.clone(),
        ));
        let navigator = Navigator::new(
            config.navigation.clone(),
            page.layout.clone(),
            menu.clone(),
            page.scheduler.clone(),
            page.sink.clone(),
        );
        let counters = StatCounters::new(
            config.counters.clone(),
            page.layout.stats.clone(),
            page.scheduler.clone(),
            page.sink.clone(),
        );

        let intro = PageIntro::new(
            config.intro.clone(),
            page.layout.hero_elements.clone(),
            page.scheduler.clone(),
            page.sink.clone(),
        );

        info!(%theme, links = page.layout.nav_links.len(), "page chrome ready");

        Self {
            theme: ThemeController::new(theme, page.sink.clone(), page.events.clone()),
            menu,
            navigator,
            counters,
            intro,
        }
    }

    /// Page finished loading: fade the page in, start the hero entrance and
    /// schedule the stat counters
    pub fn start(&self) {
        self.intro.play();
        self.counters.start();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::layout::StatSpec;
    use folio_core::{
        Command, PageConfig, PageLayout, RecordingSink, SectionDescriptor, SimulatedViewport, Target, VirtualClock,
        ViewportMetrics,
    };
    use std::time::Duration;

    #[test]
    fn test_chrome_shares_page_capabilities() {
        let clock = Arc::new(VirtualClock::new());
        let sink = Arc::new(RecordingSink::new());
        let layout = PageLayout {
            sections: vec![
                SectionDescriptor::new("home", 0.0, 900.0),
                SectionDescriptor::new("contact", 900.0, 600.0),
            ],
            nav_links: vec!["home".into(), "contact".into()],
            stats: vec![StatSpec { id: "years".into(), target: 5 }],
            hero_elements: vec!["hero-title".into(), "hero-actions".into()],
            ..Default::default()
        };
        let page = PageView::new(
            PageConfig::default(),
            layout,
            Arc::new(SimulatedViewport::new(ViewportMetrics::new(1280.0, 800.0, 1500.0))),
            clock.clone(),
            sink.clone(),
        );
        let chrome = PageChrome::new(&page, Theme::Light);

        assert_eq!(chrome.theme.current(), Theme::Light);
        assert_eq!(chrome.navigator.on_fab_click(), Some(820.0));

        sink.take();
        chrome.start();
        assert!(sink.commands().contains(&Command::opacity(Target::Body, 0.0)));

        clock.advance(Duration::from_millis(100));
        let started: Vec<Command> = sink
            .commands()
            .into_iter()
            .filter(|c| matches!(c, Command::SetStyle { property, .. } if property == "animation-play-state"))
            .collect();
        assert_eq!(started.len(), 2);
        assert!(sink.commands().contains(&Command::opacity(Target::Body, 1.0)));

        clock.advance(Duration::from_millis(900));
        for _ in 0..200 {
            if clock.tick() == 0 {
                break;
            }
        }
        assert_eq!(
            sink.for_target(&Target::Stat("years".into())).last(),
            Some(&Command::SetText {
                target: Target::Stat("years".into()),
                text: "5".into(),
            })
        );
    }
}
