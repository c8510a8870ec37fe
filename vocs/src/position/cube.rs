use crate::position::Dir;
use std::fmt::{Debug, Display, Formatter, Result};

/// A position inside of a 16x16x16 cube, packed as a YZX index.
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct CubePosition(u16);

impl CubePosition {
	/// Creates a new CubePosition from the X, Y, and Z components.
	/// ### Out of bounds behavior
	/// If the arguments are out of bounds, then they are truncated.
	pub fn new(x: u8, y: u8, z: u8) -> Self {
		CubePosition (
			(((y&0xF) as u16) << 8) |
			(((z&0xF) as u16) << 4) |
			 ((x&0xF) as u16)
		)
	}

	/// Creates a new CubePosition from a YZX index.
	/// ### Out of bounds behavior
	/// If the index is out of bounds, it is truncated.
	pub fn from_yzx(yzx: u16) -> Self {
		CubePosition(yzx % 4096)
	}

	/// Returns the X component.
	pub fn x(&self) -> u8 {
		 (self.0 & 0x00F) as u8
	}

	/// Returns the Z component.
	pub fn z(&self) -> u8 {
		((self.0 & 0x0F0) >> 4) as u8
	}

	/// Returns the Y component.
	pub fn y(&self) -> u8 {
		((self.0 & 0xF00) >> 8) as u8
	}

	/// Returns the index represented as `(Y<<8) | (Z<<4) | X`, for indexing 4096-element arrays.
	pub fn yzx(&self) -> u16 {
		self.0 & 4095
	}

	/// Moves one block in the specified direction.
	/// ### Out of bounds behavior
	/// Returns `None` if the resulting position lies outside of the cube.
	pub fn offset(self, dir: Dir) -> Option<Self> {
		match dir {
			Dir::Up     if self.y() < 15 => Some(CubePosition(self.0 + 0x100)),
			Dir::Down   if self.y() > 0  => Some(CubePosition(self.0 - 0x100)),
			Dir::PlusZ  if self.z() < 15 => Some(CubePosition(self.0 + 0x010)),
			Dir::MinusZ if self.z() > 0  => Some(CubePosition(self.0 - 0x010)),
			Dir::PlusX  if self.x() < 15 => Some(CubePosition(self.0 + 0x001)),
			Dir::MinusX if self.x() > 0  => Some(CubePosition(self.0 - 0x001)),
			_ => None
		}
	}

	/// Iterates over every position in the cube, in YZX order.
	pub fn enumerate() -> impl Iterator<Item = CubePosition> {
		(0..4096u16).map(CubePosition)
	}
}

impl Display for CubePosition {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
	}
}

impl Debug for CubePosition {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "CubePosition {{ x: {}, y: {}, z: {} }}", self.x(), self.y(), self.z())
	}
}
