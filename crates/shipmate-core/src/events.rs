//! Index lifecycle notifications.
//!
//! Hosts register [`IndexListener`]s on the engine to learn when a rebuild
//! has swapped in a new index (for example, to re-run the query that is
//! currently on screen). Each listener is invoked inside its own isolation
//! boundary: an `Err` or a panic from one listener is logged and the rest
//! still run.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::Result;
use tracing::error;

/// Something that happened to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEvent {
    /// A build completed and the new index is live.
    Rebuilt {
        entries: usize,
        content_entries: usize,
        curated_entries: usize,
    },
}

/// Receiver for [`IndexEvent`]s.
pub trait IndexListener: Send + Sync {
    /// Label used when reporting a failing listener.
    fn name(&self) -> &str {
        "anonymous"
    }

    fn on_event(&self, event: &IndexEvent) -> Result<()>;
}

/// Adapter so plain closures can be registered.
pub struct FnListener<F> {
    name: String,
    f: F,
}

impl<F> FnListener<F>
where
    F: Fn(&IndexEvent) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> IndexListener for FnListener<F>
where
    F: Fn(&IndexEvent) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_event(&self, event: &IndexEvent) -> Result<()> {
        (self.f)(event)
    }
}

/// Ordered collection of listeners.
///
/// Cloning is cheap and shares the listeners, so a caller can release its
/// lock before notifying.
#[derive(Default, Clone)]
pub struct ListenerRegistry {
    listeners: Vec<Arc<dyn IndexListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Box<dyn IndexListener>) {
        self.listeners.push(Arc::from(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver `event` to every listener in registration order.
    ///
    /// Returns the number of listeners that failed.
    pub fn notify(&self, event: &IndexEvent) -> usize {
        let mut failures = 0;
        for listener in &self.listeners {
            match catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failures += 1;
                    error!(listener = listener.name(), error = %e, "index listener failed");
                }
                Err(_) => {
                    failures += 1;
                    error!(listener = listener.name(), "index listener panicked");
                }
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn rebuilt() -> IndexEvent {
        IndexEvent::Rebuilt {
            entries: 3,
            content_entries: 1,
            curated_entries: 2,
        }
    }

    #[test]
    fn test_failing_listeners_do_not_block_others() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut registry = ListenerRegistry::new();

        registry.register(Box::new(FnListener::new("errors", |_: &IndexEvent| {
            anyhow::bail!("boom")
        })));
        registry.register(Box::new(FnListener::new("panics", |_: &IndexEvent| -> Result<()> {
            panic!("listener bug")
        })));
        let counter = hits.clone();
        registry.register(Box::new(FnListener::new("counts", move |_: &IndexEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })));

        assert_eq!(registry.notify(&rebuilt()), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ListenerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.notify(&rebuilt()), 0);
    }
}
