mod bounds;
mod cube;
mod direction;

/// Global positioning to complement the local positions.
///
/// Horizontal coordinates span the full range of an `i32` and wrap at the edges. Vertical coordinates are
/// also stored as an `i32`, but only the range described by a `Bounds` is meaningful for any given world.
mod global;

pub use self::bounds::Bounds;
pub use self::cube::CubePosition;
pub use self::direction::{Axis, Dir};
pub use self::global::{GlobalChunkPosition, GlobalColumnPosition, GlobalPosition};
