//! # riskmap-layers: Layer Configuration and State Store
//!
//! The map shows a fixed set of named layers. This crate defines that set
//! ([`LayerConfig`]) and the [`LayerStore`] that tracks, per layer, whether
//! it is visible, loading, and holding data. Rendering code subscribes to
//! the store and redraws from the snapshots it broadcasts.
//!
//! ## Store Semantics
//!
//! - One [`LayerState`] per configured id for the lifetime of the store;
//!   layers are reset, never removed.
//! - Every effective mutation broadcasts exactly one full snapshot, taken
//!   after the mutation, to the listeners registered when the broadcast
//!   starts, in registration order.
//! - Unknown layer ids are logged and ignored; nothing is broadcast.
//! - Mutations are serialised across threads, and a listener may mutate
//!   the store or (un)subscribe from inside its callback.

pub mod config;
pub mod state;
pub mod store;

pub use config::{LayerConfig, LayerConfigError, LayerDefinition, VisualizationKind};
pub use state::{LayerState, LayerStatistics};
pub use store::{LayerStore, Subscription};
