use crate::position::GlobalPosition;
use std::fmt::{Display, Formatter, Result};

/// The vertical extent of a world: Y levels in the half open range `min_y..max_y` are valid.
///
/// Horizontal coordinates are never out of bounds, since the world is sparse and wraps rather than ending.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Bounds {
	min_y: i32,
	max_y: i32
}

impl Bounds {
	/// ### Out of bounds behavior
	/// If `max_y <= min_y`, the bounds are empty and contain no positions.
	pub fn new(min_y: i32, max_y: i32) -> Self {
		Bounds { min_y, max_y }
	}

	pub fn min_y(&self) -> i32 {
		self.min_y
	}

	/// The first Y level above the world. This is exclusive.
	pub fn max_y(&self) -> i32 {
		self.max_y
	}

	/// The highest valid Y level, or `None` if the bounds are empty.
	pub fn top(&self) -> Option<i32> {
		if self.is_empty() {
			None
		} else {
			Some(self.max_y - 1)
		}
	}

	pub fn height(&self) -> u32 {
		if self.is_empty() {
			0
		} else {
			(self.max_y as i64 - self.min_y as i64) as u32
		}
	}

	pub fn is_empty(&self) -> bool {
		self.max_y <= self.min_y
	}

	pub fn contains_y(&self, y: i32) -> bool {
		y >= self.min_y && y < self.max_y
	}

	pub fn contains(&self, position: GlobalPosition) -> bool {
		self.contains_y(position.y())
	}

	/// Returns true if the position is above the top of the world.
	pub fn is_above(&self, position: GlobalPosition) -> bool {
		position.y() >= self.max_y
	}

	/// Iterates over the Y coordinates of every cube that overlaps these bounds, from the bottom up.
	pub fn chunk_ys(&self) -> impl Iterator<Item = i32> {
		let (lowest, highest) = if self.is_empty() {
			(0, 0)
		} else {
			(self.min_y >> 4, ((self.max_y - 1) >> 4) + 1)
		};

		lowest..highest
	}
}

impl Default for Bounds {
	fn default() -> Self {
		Bounds::new(0, 256)
	}
}

impl Display for Bounds {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "y {}..{}", self.min_y, self.max_y)
	}
}
