//! Scene graph records produced by the map loader.

pub mod camera;
pub mod grid;
pub mod layer;
pub mod map;
pub mod object;

// Re-export commonly used types
pub use camera::{Camera, Viewport};
pub use grid::{CellGrid, CellGridConfig, GridKind, PathingStrategy};
pub use layer::{Instance, InstanceAction, Layer};
pub use map::{MapDocument, MapId};
pub use object::{Action, ObjectId, ObjectTemplate, PatherId};
