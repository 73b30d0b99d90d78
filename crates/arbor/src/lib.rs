//! Arbor: a deterministic growth-and-transport automaton for tree and root
//! networks on a tile grid.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Arbor sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use arbor::prelude::*;
//!
//! // Dirt in rows 0..=6, air above.
//! let config = WorldConfig::new(16, 24).with_ground(6);
//! let mut world = LockstepWorld::new(config).unwrap();
//!
//! let lineage = LineageId::new(1).unwrap();
//! world.plant(Seed::branch(Pos::new(8, 7), lineage, 100)).unwrap();
//! world.plant(Seed::root(Pos::new(8, 6), lineage, 60)).unwrap();
//!
//! // One full cycle: settle x, settle y, sap exchange, growth.
//! let totals = world.step_n(4).unwrap();
//! assert!(totals.births >= 1);
//! assert_eq!(world.current_tick(), TickId(4));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `arbor-core` | Cell record, byte codec, materials, IDs |
//! | [`space`] | `arbor-space` | Grid geometry and neighbourhoods |
//! | [`arena`] | `arbor-arena` | Double-buffered planes and snapshots |
//! | [`kernel`] | `arbor-kernel` | Phase kernels, topology oracle, parameters |
//! | [`engine`] | `arbor-engine` | Lockstep world driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Cell record, byte codec, materials, and IDs (`arbor-core`).
pub use arbor_core as types;

/// Grid geometry and neighbourhoods (`arbor-space`).
pub use arbor_space as space;

/// Double-buffered planes and snapshots (`arbor-arena`).
pub use arbor_arena as arena;

/// Phase kernels, the topology oracle, and kernel parameters
/// (`arbor-kernel`).
///
/// [`kernel::get_parent`] and [`kernel::children_of`] re-derive the network
/// from any decoded generation.
pub use arbor_kernel as kernel;

/// Lockstep world driver (`arbor-engine`).
pub use arbor_engine as engine;

/// Common imports for typical Arbor usage.
pub mod prelude {
    // Core types
    pub use arbor_core::{Cell, Heading, LineageId, Material, Role, TickId};

    // Space
    pub use arbor_space::{Grid2D, Pos};

    // Snapshots
    pub use arbor_arena::Snapshot;

    // Kernel configuration
    pub use arbor_kernel::{Features, KernelParams, Phase};

    // Engine
    pub use arbor_engine::{
        snapshot_digest, LockstepWorld, Seed, StepMetrics, StepReport, WorldConfig,
    };

    // Errors
    pub use arbor_core::{InputError, PlantError};
    pub use arbor_engine::{ConfigError, EditError, StepError};
}
