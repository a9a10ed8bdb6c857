//! 2D rigid-body physics for page tiles
//!
//! - `body`: rigid rectangles and their material options
//! - `broad_phase`: sweep-and-prune candidate pairs
//! - `collision`: box-vs-box separating-axis contacts
//! - `world`: integration, impulse solver, pointer drag
//! - `gravity`: the stage that binds page elements to bodies

pub mod body;
pub mod broad_phase;
pub mod collision;
pub mod gravity;
pub mod world;

pub use body::{BodyId, BodyOptions, RigidBody};
pub use gravity::{
    ElementId, ElementRect, ElementTransform, GravityStage, LayoutPin, PhysicsTile, RenderTarget,
    Viewport,
};
pub use world::World;
