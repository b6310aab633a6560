use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Page-wide event bus.
///
/// Handlers run synchronously inside [`EventBus::publish`]. A handler may
/// subscribe or publish; an event of the type currently being delivered that
/// is published from one of its own handlers reaches only handlers added
/// during that delivery.
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Common page events
pub mod events {
    use super::Event;
    use crate::navbar::NavMode;
    use crate::present::Target;

    /// A new section became the active one
    #[derive(Debug, Clone)]
    pub struct SectionActivated {
        pub section_id: String,
        pub previous: Option<String>,
    }

    /// The navbar switched between top, shown and hidden
    #[derive(Debug, Clone)]
    pub struct NavbarModeChanged {
        pub mode: NavMode,
    }

    /// An element finished its one-shot reveal
    #[derive(Debug, Clone)]
    pub struct ElementRevealed {
        pub target: Target,
        pub stagger_index: usize,
    }

    /// A lazy image finished loading
    #[derive(Debug, Clone)]
    pub struct ImageLoaded {
        pub image_id: String,
    }

    /// Implement the [`Event`] trait for plain event structs
    #[macro_export]
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl $crate::events::Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        SectionActivated,
        NavbarModeChanged,
        ElementRevealed,
        ImageLoaded
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Subscribe a closure that receives the concrete event type
    pub fn subscribe_fn<E, F>(&self, mut f: F)
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }));
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();

        // Handlers run outside the lock so they can use the bus themselves
        let Some(mut running) = self.handlers.lock().remove(&type_id) else {
            return;
        };
        for handler in running.iter_mut() {
            handler.handle(&event);
        }

        let mut handlers = self.handlers.lock();
        if let Some(added) = handlers.remove(&type_id) {
            running.extend(added);
        }
        handlers.insert(type_id, running);
    }

    /// Number of handlers registered for an event type
    pub fn handler_count<E: Event>(&self) -> usize {
        self.handlers
            .lock()
            .get(&std::any::TypeId::of::<E>())
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
