//! Message dispatch
//!
//! Maps addresses to handlers and fans each decoded message out to the
//! matching handler plus the global observer. Dispatch runs synchronously on
//! the receive-loop task, so handler execution for one message always
//! completes before the next message is dispatched.
//!
//! Callback failures are values, not control flow: a failing handler never
//! prevents the observer from running, and neither affects later messages.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use types::{OscMessage, OscValue};

/// Handler for one exact address. Failures flow back as values and are
/// logged at the dispatch site.
pub type Handler = Arc<dyn Fn(&OscMessage) -> anyhow::Result<()> + Send + Sync>;

/// Global observer invoked for every successfully decoded message,
/// independent of the address-specific handlers.
pub type ObserverCallback = Arc<dyn Fn(&str, &[OscValue]) -> anyhow::Result<()> + Send + Sync>;

/// Address-keyed handler registry plus the single observer slot.
#[derive(Default)]
pub struct Dispatcher {
    handlers: RwLock<HashMap<String, Handler>>,
    observer: RwLock<Option<ObserverCallback>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an exact address. Last write wins.
    pub fn register_handler<F>(&self, address: impl Into<String>, handler: F)
    where
        F: Fn(&OscMessage) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let address = address.into();
        debug!(address = %address, "registered OSC handler");
        self.handlers.write().insert(address, Arc::new(handler));
    }

    /// Remove the handler for an address. Removing an absent address is a
    /// no-op.
    pub fn unregister_handler(&self, address: &str) {
        if self.handlers.write().remove(address).is_some() {
            debug!(address = %address, "unregistered OSC handler");
        }
    }

    /// Install the process-wide observer, replacing any prior one.
    pub fn set_observer_callback<F>(&self, callback: F)
    where
        F: Fn(&str, &[OscValue]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        debug!("observer callback registered");
        *self.observer.write() = Some(Arc::new(callback));
    }

    /// Number of registered address handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Fan one message out to its address handler and the observer.
    ///
    /// Locks are released before either callback runs, so handlers may
    /// re-register from inside their own invocation without deadlocking.
    pub fn dispatch(&self, message: &OscMessage) {
        let handler = self.handlers.read().get(&message.address).cloned();
        if let Some(handler) = handler {
            if let Err(error) = handler(message) {
                warn!(address = %message.address, %error, "OSC handler failed");
            }
        }

        let observer = self.observer.read().clone();
        if let Some(observer) = observer {
            if let Err(error) = observer(&message.address, &message.args) {
                warn!(address = %message.address, %error, "observer callback failed");
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handler_count())
            .field("observer", &self.observer.read().is_some())
            .finish()
    }
}
