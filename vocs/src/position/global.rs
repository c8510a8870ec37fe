use crate::position::{CubePosition, Dir};
use std::fmt::{Debug, Display, Formatter, Result};

const MAX_U28: u64 = 268435455;
const MAX_U56: u64 = 72057594037927935;

#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
pub struct GlobalPosition {
	x: i32,
	y: i32,
	z: i32
}

impl GlobalPosition {
	pub fn new(x: i32, y: i32, z: i32) -> Self {
		GlobalPosition { x, y, z }
	}

	/// Combines a cube position with a block position local to that cube.
	pub fn from_parts(chunk: GlobalChunkPosition, local: CubePosition) -> Self {
		GlobalPosition {
			x: (chunk.x() << 4) | (local.x() as i32),
			y: (chunk.y() << 4) | (local.y() as i32),
			z: (chunk.z() << 4) | (local.z() as i32)
		}
	}

	/// Moves one block in the specified direction.
	/// ### Out of bounds behavior
	/// Coordinates wrap around at the limits of an `i32`. Validity of the vertical coordinate is up to the caller.
	pub fn offset(self, dir: Dir) -> Self {
		let (x, y, z) = dir.delta();

		GlobalPosition {
			x: self.x.wrapping_add(x),
			y: self.y.wrapping_add(y),
			z: self.z.wrapping_add(z)
		}
	}

	/// Like `offset`, but `None` refers to this position itself.
	pub fn facing(self, dir: Option<Dir>) -> Self {
		match dir {
			Some(dir) => self.offset(dir),
			None => self
		}
	}

	pub fn local_block(&self) -> CubePosition {
		CubePosition::new(
			(self.x & 15) as u8,
			(self.y & 15) as u8,
			(self.z & 15) as u8
		)
	}

	pub fn global_chunk(&self) -> GlobalChunkPosition {
		GlobalChunkPosition::new(self.x >> 4, self.y >> 4, self.z >> 4)
	}

	pub fn global_column(&self) -> GlobalColumnPosition {
		GlobalColumnPosition::new(self.x >> 4, self.z >> 4)
	}

	pub fn x(&self) -> i32 {
		self.x
	}

	pub fn y(&self) -> i32 {
		self.y
	}

	pub fn z(&self) -> i32 {
		self.z
	}
}

impl Display for GlobalPosition {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
	}
}

/// The position of a 16x16x16 cube in the world.
///
/// Packed as `Y << 56 | Z << 28 | X`. The horizontal components cover every cube reachable from an `i32` block
/// coordinate, while the vertical component is limited to a signed 8 bit value, or block Y levels -2048 through 2047.
#[derive(Eq, PartialEq, Copy, Clone, Hash)]
pub struct GlobalChunkPosition(u64);

impl GlobalChunkPosition {
	/// ### Out of bounds behavior
	/// If the arguments are out of bounds, then they are truncated.
	pub fn new(x: i32, y: i32, z: i32) -> Self {
		let (x, y, z) = (
			(x as u64) & MAX_U28,
			(y as u64) & 255,
			(z as u64) & MAX_U28
		);

		GlobalChunkPosition(
			(y << 56) |
			(z << 28) |
			 x
		)
	}

	pub fn from_column(column: GlobalColumnPosition, y: i32) -> Self {
		Self::new(column.x(), y, column.z())
	}

	pub fn x(&self) -> i32 {
		let unsigned = (self.0 & MAX_U28) as i32;
		(unsigned << 4) >> 4
	}

	pub fn y(&self) -> i32 {
		((self.0 >> 56) as u8 as i8) as i32
	}

	pub fn z(&self) -> i32 {
		let unsigned = ((self.0 >> 28) & MAX_U28) as i32;
		(unsigned << 4) >> 4
	}

	pub fn column(&self) -> GlobalColumnPosition {
		GlobalColumnPosition(self.0 & MAX_U56)
	}

	/// Returns the block position of the lowest corner of this cube.
	pub fn origin(&self) -> GlobalPosition {
		GlobalPosition::from_parts(*self, CubePosition::new(0, 0, 0))
	}

	/// The adjacent cube in the specified direction. Wraps at the limits of the representable range.
	pub fn offset(&self, dir: Dir) -> Self {
		let (x, y, z) = dir.delta();

		Self::new(self.x() + x, self.y() + y, self.z() + z)
	}
}

impl Display for GlobalChunkPosition {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
	}
}

impl Debug for GlobalChunkPosition {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "GlobalChunkPosition {{ x: {}, y: {}, z: {} }}", self.x(), self.y(), self.z())
	}
}

/// The position of a 16 block wide vertical column of cubes, packed as `Z << 28 | X`.
#[derive(Eq, PartialEq, Copy, Clone, Hash)]
pub struct GlobalColumnPosition(u64);

impl GlobalColumnPosition {
	/// ### Out of bounds behavior
	/// If the arguments are out of bounds, then they are truncated.
	pub fn new(x: i32, z: i32) -> Self {
		let (x, z) = (
			(x as u64) & MAX_U28,
			(z as u64) & MAX_U28
		);

		GlobalColumnPosition((z << 28) | x)
	}

	pub fn x(&self) -> i32 {
		let unsigned = (self.0 & MAX_U28) as i32;
		(unsigned << 4) >> 4
	}

	pub fn z(&self) -> i32 {
		let unsigned = ((self.0 >> 28) & MAX_U28) as i32;
		(unsigned << 4) >> 4
	}

	pub fn chunk(&self, y: i32) -> GlobalChunkPosition {
		GlobalChunkPosition::from_column(*self, y)
	}

	/// The adjacent column in the specified direction. Vertical directions return the same column.
	pub fn offset(&self, dir: Dir) -> Self {
		let (x, _, z) = dir.delta();

		Self::new(self.x() + x, self.z() + z)
	}
}

impl Display for GlobalColumnPosition {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "({}, {})", self.x(), self.z())
	}
}

impl Debug for GlobalColumnPosition {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "GlobalColumnPosition {{ x: {}, z: {} }}", self.x(), self.z())
	}
}
