//! chipgen-core - synthetic chip-layout generation.
//!
//! Procedurally generates rectangular floorplans by recursively subdividing
//! a root rectangle with a catalog of geometric split rules, then
//! reconciling the leaf count against a randomly drawn target. The output
//! is an ordered list of leaf rectangles plus synthetic netlist edges,
//! ready for dataset formatting; rendering and file handling live in
//! downstream tools, not here.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`components`] | The rectangle record (center + size + lineage) |
//! | [`config`] | Immutable generation configuration and validation |
//! | [`rules`] | Split-rule catalog: basic, aligned, symmetric, ratio |
//! | [`selector`] | Weighted rule selection and keep-mode filtering |
//! | [`generation`] | Partitioner, depth search, fillers, reconciler |
//! | [`engine`] | The pipeline driver |
//! | [`validate`] | Post-hoc structural audit of a finished layout |
//! | [`persistence`] | JSON document, ML sample, binary snapshots |
//!
//! # Example
//!
//! ```rust
//! use chipgen_core::prelude::*;
//!
//! let config = GenerationConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let engine = LayoutEngine::new(config).expect("valid config");
//! let layout = engine.generate().expect("generation succeeds");
//! assert!(!layout.leaves.is_empty());
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod generation;
pub mod persistence;
pub mod rules;
pub mod selector;
pub mod validate;

/// Commonly used types for convenient importing.
pub mod prelude {
    pub use crate::components::Component;
    pub use crate::config::{ConfigError, GenerationConfig};
    pub use crate::engine::{GenError, Layout, LayoutEngine};
    pub use crate::generation::Diagnostic;
    pub use crate::rules::{RuleKind, SplitSpec};
    pub use crate::selector::{KeepMode, RuleSelector};
}
