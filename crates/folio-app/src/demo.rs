//! Demo mode
//! A representative portfolio page and a short browsing session over it

use folio_core::layout::{ElementRect, ImageSpec, RevealSpec, StatSpec};
use folio_core::{PageLayout, SectionDescriptor};

use crate::trace::TraceStep;

/// Hero, about, projects, experience and contact sections
pub fn layout() -> PageLayout {
    let mut home = SectionDescriptor::new("home", 0.0, 900.0);
    home.hero = true;

    let sections = vec![
        home,
        SectionDescriptor::new("about", 900.0, 800.0),
        SectionDescriptor::new("projects", 1700.0, 1400.0),
        SectionDescriptor::new("experience", 3100.0, 900.0),
        SectionDescriptor::new("contact", 4000.0, 800.0),
    ];
    let nav_links = sections.iter().map(|s| s.id.clone()).collect();

    // Project cards in a two-column grid, then the timeline
    let mut reveal_targets: Vec<RevealSpec> = (0..6)
        .map(|i| RevealSpec {
            id: format!("project-{}", i + 1),
            rect: ElementRect::new(1850.0 + (i / 2) as f64 * 400.0, 360.0),
        })
        .collect();
    reveal_targets.extend((0..3).map(|i| RevealSpec {
        id: format!("timeline-{}", i + 1),
        rect: ElementRect::new(3250.0 + i as f64 * 250.0, 200.0),
    }));

    let images = (0..6)
        .map(|i| ImageSpec {
            id: format!("project-{}-cover", i + 1),
            src: format!("img/project-{}.webp", i + 1),
            rect: ElementRect::new(1870.0 + (i / 2) as f64 * 400.0, 180.0),
        })
        .collect();

    let stats = vec![
        StatSpec { id: "years".into(), target: 6 },
        StatSpec { id: "projects".into(), target: 50 },
        StatSpec { id: "clients".into(), target: 30 },
    ];

    PageLayout {
        sections,
        nav_links,
        reveal_targets,
        images,
        particle_count: 5,
        stats,
        has_hero_content: true,
        hero_elements: vec![
            "hero-greeting".into(),
            "hero-title".into(),
            "hero-tagline".into(),
            "hero-actions".into(),
        ],
    }
}

/// Read the hero, skim down, jump around via the menu and the FAB
pub fn trace() -> Vec<TraceStep> {
    let mut steps = vec![TraceStep::Wait { ms: 1200 }];
    steps.extend((1..=12).map(|i| TraceStep::Scroll { top: i as f64 * 90.0 }));
    steps.extend([
        TraceStep::Wait { ms: 300 },
        TraceStep::Scroll { top: 1900.0 },
        TraceStep::ImageLoaded { id: "project-1-cover".into() },
        TraceStep::ImageLoaded { id: "project-2-cover".into() },
        TraceStep::Scroll { top: 1500.0 },
        TraceStep::ToggleTheme,
        TraceStep::Resize { width: 390.0, height: 844.0 },
        TraceStep::Scroll { top: 1400.0 },
        TraceStep::ToggleMenu,
        TraceStep::Wait { ms: 250 },
        TraceStep::ClickLink { section: "experience".into() },
        TraceStep::Wait { ms: 700 },
        TraceStep::ToggleMenu,
        TraceStep::ClickOutside,
        TraceStep::ClickFab,
        TraceStep::Wait { ms: 2500 },
    ]);
    steps
}
