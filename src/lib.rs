//! Folio Arcade - interactive core of a portfolio site
//!
//! Core modules:
//! - `games`: Deterministic mini-game engines
//! - `arcade`: Game catalog, input routing and view snapshots
//! - `physics`: Rigid-body world and the gravity stage for page tiles
//! - `timers`: Cancellable scheduled events driven by an explicit clock
//! - `store` / `theme`: Observable shared state (theme mode, gravity flag)
//! - `platform`: Browser bindings (wasm32 only)

pub mod arcade;
pub mod games;
pub mod physics;
pub mod platform;
pub mod settings;
pub mod store;
pub mod theme;
pub mod timers;

pub use arcade::{Arcade, Frame, Game, GameInput, GameKind};
pub use physics::GravityStage;
pub use settings::{PhysicsTuning, Settings};
pub use theme::{ThemeMode, ThemeProvider};

/// Configuration constants
pub mod consts {
    /// Fixed physics timestep (60 Hz)
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;
    /// Maximum physics steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default downward acceleration for tiles (pixels/s²)
    pub const GRAVITY: f32 = 1000.0;
    /// Thickness of the static walls around the viewport
    pub const WALL_THICKNESS: f32 = 100.0;
    /// Pointer drag spring stiffness
    pub const POINTER_STIFFNESS: f32 = 0.2;
}
