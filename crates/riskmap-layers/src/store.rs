//! # Layer State Store
//!
//! Observable store holding one [`LayerState`] per configured layer.
//!
//! ## Locking
//!
//! Three `parking_lot` locks, never held across a listener call except the
//! first:
//!
//! - `serial`: a reentrant mutex held for the whole mutate-then-broadcast
//!   sequence. Mutations from different threads therefore broadcast in the
//!   order they were applied, while a listener on the broadcasting thread
//!   can still call back into the store.
//! - `layers`: guards the state vector. Held only while a mutation is
//!   applied or a snapshot is cloned, so readers never observe a partial
//!   update.
//! - `listeners`: guards the registration list. Cloned out before fan-out,
//!   so listeners may subscribe or unsubscribe during a broadcast; the
//!   change applies to the next broadcast.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use riskmap_core::Timestamp;

use crate::config::{LayerConfig, VisualizationKind};
use crate::state::{LayerState, LayerStatistics};

type Listener = Arc<dyn Fn(&[LayerState]) + Send + Sync>;

struct Shared {
    serial: ReentrantMutex<()>,
    layers: Mutex<Vec<LayerState>>,
    index: HashMap<String, usize>,
    config: LayerConfig,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener: AtomicU64,
}

impl Shared {
    fn unsubscribe(&self, id: u64) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }
}

/// Thread-safe, cloneable layer state store. Clones share state and
/// listeners.
#[derive(Clone)]
pub struct LayerStore {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for LayerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerStore")
            .field("layers", &*self.shared.layers.lock())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle returned by [`LayerStore::subscribe`].
///
/// Dropping the handle does not remove the listener; call
/// [`Subscription::unsubscribe`].
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    shared: Weak<Shared>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the listener. Returns `false` if it was already removed or
    /// the store is gone.
    pub fn unsubscribe(&self) -> bool {
        match self.shared.upgrade() {
            Some(shared) => shared.unsubscribe(self.id),
            None => false,
        }
    }
}

impl std::fmt::Debug for Shared {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shared").finish_non_exhaustive()
    }
}

impl LayerStore {
    /// Store initialised from `config`: only the primary layer visible,
    /// nothing loading, no data.
    pub fn new(config: LayerConfig) -> Self {
        let layers: Vec<LayerState> = config.layers().iter().map(LayerState::initial).collect();
        let index = layers
            .iter()
            .enumerate()
            .map(|(i, l)| (l.id.clone(), i))
            .collect();
        Self {
            shared: Arc::new(Shared {
                serial: ReentrantMutex::new(()),
                layers: Mutex::new(layers),
                index,
                config,
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
            }),
        }
    }

    /// Store over the compiled-in layer table.
    pub fn builtin() -> Self {
        Self::new(LayerConfig::builtin())
    }

    pub fn config(&self) -> &LayerConfig {
        &self.shared.config
    }

    // -- Queries ---------------------------------------------------------------

    /// Snapshot of every layer in configuration order.
    pub fn get_all(&self) -> Vec<LayerState> {
        self.shared.layers.lock().clone()
    }

    pub fn get_visible(&self) -> Vec<LayerState> {
        self.filtered(|l| l.is_visible)
    }

    pub fn get_by_id(&self, id: &str) -> Option<LayerState> {
        let index = *self.shared.index.get(id)?;
        self.shared.layers.lock().get(index).cloned()
    }

    pub fn get_by_visualization_kind(&self, kind: VisualizationKind) -> Vec<LayerState> {
        self.filtered(|l| l.visualization_kind == kind)
    }

    pub fn get_statistics(&self) -> LayerStatistics {
        LayerStatistics::from_states(&self.shared.layers.lock())
    }

    pub fn listener_count(&self) -> usize {
        self.shared.listeners.lock().len()
    }

    fn filtered(&self, keep: impl Fn(&LayerState) -> bool) -> Vec<LayerState> {
        self.shared
            .layers
            .lock()
            .iter()
            .filter(|l| keep(l))
            .cloned()
            .collect()
    }

    // -- Mutations -------------------------------------------------------------

    /// Flip a layer's visibility. Returns the new value, or `None` for an
    /// unknown id.
    pub fn toggle_visibility(&self, id: &str) -> Option<bool> {
        let index = self.lookup(id, "toggle_visibility")?;
        self.mutate(|layers| {
            let layer = &mut layers[index];
            layer.is_visible = !layer.is_visible;
            Some(layer.is_visible)
        })
    }

    /// Set a layer's visibility. Returns `true` if the value changed; an
    /// unchanged value is not broadcast.
    pub fn set_visibility(&self, id: &str, visible: bool) -> bool {
        let Some(index) = self.lookup(id, "set_visibility") else {
            return false;
        };
        self.mutate(|layers| {
            let layer = &mut layers[index];
            if layer.is_visible == visible {
                return None;
            }
            layer.is_visible = visible;
            Some(())
        })
        .is_some()
    }

    /// Make `id` the only visible layer. Unknown ids leave the store as is.
    pub fn show_only(&self, id: &str) -> bool {
        let Some(index) = self.lookup(id, "show_only") else {
            return false;
        };
        self.mutate(|layers| {
            for (i, layer) in layers.iter_mut().enumerate() {
                layer.is_visible = i == index;
            }
            Some(())
        })
        .is_some()
    }

    pub fn hide_all(&self) {
        self.mutate(|layers| {
            for layer in layers.iter_mut() {
                layer.is_visible = false;
            }
            Some(())
        });
    }

    /// Mark a layer as loading (or done loading).
    pub fn set_loading(&self, id: &str, loading: bool) -> bool {
        let Some(index) = self.lookup(id, "set_loading") else {
            return false;
        };
        self.mutate(|layers| {
            let layer = &mut layers[index];
            layer.is_loading = loading;
            layer.last_updated = Some(Timestamp::now());
            Some(())
        })
        .is_some()
    }

    /// Record the outcome of a load: data presence and, when known, the
    /// record count. Ends the loading state.
    pub fn set_data(&self, id: &str, has_data: bool, record_count: Option<usize>) -> bool {
        let Some(index) = self.lookup(id, "set_data") else {
            return false;
        };
        self.mutate(|layers| {
            let layer = &mut layers[index];
            layer.has_data = has_data;
            layer.record_count = record_count;
            layer.is_loading = false;
            layer.last_updated = Some(Timestamp::now());
            Some(())
        })
        .is_some()
    }

    /// Return every layer to its initial state.
    pub fn reset(&self) {
        let config = &self.shared.config;
        self.mutate(|layers| {
            for (layer, definition) in layers.iter_mut().zip(config.layers()) {
                *layer = LayerState::initial(definition);
            }
            Some(())
        });
    }

    // -- Subscription ----------------------------------------------------------

    /// Register a listener for post-mutation snapshots. Listeners are called
    /// in registration order on the mutating thread.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[LayerState]) + Send + Sync + 'static,
    {
        let id = self.shared.next_listener.fetch_add(1, Ordering::Relaxed);
        self.shared.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    // -- Internals -------------------------------------------------------------

    fn lookup(&self, id: &str, operation: &'static str) -> Option<usize> {
        let index = self.shared.index.get(id).copied();
        if index.is_none() {
            tracing::warn!(layer_id = id, operation, "unknown layer id, ignoring");
        }
        index
    }

    /// Apply `f` under the state lock and broadcast one snapshot if it
    /// returns `Some`.
    fn mutate<R>(&self, f: impl FnOnce(&mut [LayerState]) -> Option<R>) -> Option<R> {
        let _serial = self.shared.serial.lock();
        let (result, snapshot) = {
            let mut layers = self.shared.layers.lock();
            let result = f(&mut layers)?;
            (result, layers.clone())
        };
        self.broadcast(&snapshot);
        Some(result)
    }

    fn broadcast(&self, snapshot: &[LayerState]) {
        let listeners: Vec<Listener> = self
            .shared
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        tracing::debug!(listeners = listeners.len(), "broadcasting layer snapshot");
        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::builtin()
    }
}
