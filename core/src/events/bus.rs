//! Typed publish/subscribe dispatch
//!
//! Listeners are keyed by [`EventKind`] and run synchronously, in
//! registration order, on the thread that publishes. Dispatch works on a
//! snapshot of the listener list, so a listener may register further
//! listeners (or publish) without invalidating the iteration; new
//! registrations take effect from the next publish of that kind.

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;

use super::{EventKind, GameEvent, ListenerError};

pub type Listener = Rc<dyn Fn(&GameEvent) -> Result<(), ListenerError>>;

/// Outcome of a single publish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<HashMap<EventKind, Vec<Listener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an infallible listener for `kind`. Registering the same
    /// closure twice delivers the event twice.
    pub fn register<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&GameEvent) + 'static,
    {
        self.register_fallible(kind, move |event| {
            listener(event);
            Ok(())
        });
    }

    pub fn register_fallible<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&GameEvent) -> Result<(), ListenerError> + 'static,
    {
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Rc::new(listener));
    }

    /// Route `kind` to a method of a shared handler.
    ///
    /// The bus only holds a weak reference: once the owning state drops the
    /// handler, the listener silently becomes a no-op.
    pub fn subscribe<H: 'static>(
        &self,
        kind: EventKind,
        target: &Rc<RefCell<H>>,
        on_event: fn(&mut H, &GameEvent),
    ) {
        let target = Rc::downgrade(target);
        self.register_fallible(kind, move |event| {
            let Some(strong) = target.upgrade() else {
                return Ok(());
            };
            let mut handler = strong
                .try_borrow_mut()
                .map_err(|_| ListenerError::Busy {
                    handler: std::any::type_name::<H>(),
                    kind,
                })?;
            on_event(&mut handler, event);
            Ok(())
        });
    }

    /// Deliver `event` to every listener registered for its kind.
    /// Publishing a kind nobody listens to is a no-op.
    pub fn publish(&self, event: GameEvent) -> DispatchReport {
        let kind = event.kind();
        let snapshot: Vec<Listener> = match self.listeners.borrow().get(&kind) {
            Some(listeners) => listeners.clone(),
            None => return DispatchReport::default(),
        };

        let mut report = DispatchReport::default();
        for listener in snapshot {
            match listener(&event) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(?kind, error = %e, "Listener failed");
                }
            }
        }
        report
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Drop every listener. Intended for tests and full session teardown.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}
