//! Incremental light propagation for voxel worlds.
//!
//! A [`LightingEngine`] owns a [`LightStorage`] and keeps its light values consistent with the rules of a
//! [`Propagator`]. Hosts report block changes and newly loaded regions as scheduled events, and run
//! processing cycles whenever it suits them. Regions that are not loaded yet never block progress: work
//! touching them waits in the queues until a later cycle.

#![forbid(unsafe_code)]

pub mod access;
pub mod channel;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod propagator;
pub mod queue;
pub mod world;

pub use access::{ChangeLog, Cursor, IgnoreChanges, LightObserver, LightStorage, LogChanges, NoVirtualSources, VirtualSources};
pub use channel::{Channel, LightType, Selection};
pub use config::{Config, EngineConfig, WorldConfig};
pub use engine::{CycleStats, LightingEngine};
pub use error::{Error, Result};
pub use field::LightField;
pub use propagator::{BlockLight, Propagator, VanillaPropagator};
pub use world::{Block, LightWorld};
