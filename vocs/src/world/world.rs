use crate::position::{GlobalChunkPosition, GlobalColumnPosition};
use rustc_hash::FxHashMap;
use std::collections::hash_map::{Entry, Iter};

/// A sparse collection of cubes, keyed by their global position.
#[derive(Debug, Clone)]
pub struct World<T> {
	chunks: FxHashMap<GlobalChunkPosition, T>
}

impl<T> World<T> {
	pub fn new() -> Self {
		World {
			chunks: FxHashMap::default()
		}
	}

	pub fn remove(&mut self, position: GlobalChunkPosition) -> Option<T> {
		self.chunks.remove(&position)
	}

	/// Removes every chunk in a column, returning how many were removed.
	pub fn remove_column(&mut self, column: GlobalColumnPosition) -> usize {
		let before = self.chunks.len();

		self.chunks.retain(|position, _| position.column() != column);

		before - self.chunks.len()
	}

	pub fn get(&self, position: GlobalChunkPosition) -> Option<&T> {
		self.chunks.get(&position)
	}

	pub fn get_mut(&mut self, position: GlobalChunkPosition) -> Option<&mut T> {
		self.chunks.get_mut(&position)
	}

	/// Returns the chunk at the position, creating it first if it does not exist yet.
	pub fn get_or_create<F>(&mut self, position: GlobalChunkPosition, create: F) -> &mut T where F: FnOnce() -> T {
		match self.chunks.entry(position) {
			Entry::Occupied(occupied) => occupied.into_mut(),
			Entry::Vacant(vacant) => vacant.insert(create())
		}
	}

	pub fn contains(&self, position: GlobalChunkPosition) -> bool {
		self.chunks.contains_key(&position)
	}

	pub fn len(&self) -> usize {
		self.chunks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chunks.is_empty()
	}

	pub fn chunks(&self) -> Iter<GlobalChunkPosition, T> {
		self.chunks.iter()
	}
}

impl<T> Default for World<T> {
	fn default() -> Self {
		World::new()
	}
}

#[cfg(test)]
mod test {
	use super::World;
	use crate::position::{GlobalChunkPosition, GlobalColumnPosition};

	#[test]
	fn test_get_remove() {
		let mut world = World::new();
		let position = GlobalChunkPosition::new(-3, 2, 7);

		assert!(world.is_empty());
		assert_eq!(*world.get_or_create(position, || 6), 6);
		assert_eq!(world.get(position), Some(&6));
		assert!(world.contains(position));
		assert_eq!(world.chunks().count(), 1);

		*world.get_mut(position).unwrap() += 1;

		assert_eq!(world.remove(position), Some(7));
		assert_eq!(world.get(position), None);
	}

	#[test]
	fn test_get_or_create() {
		let mut world = World::new();
		let position = GlobalChunkPosition::new(0, 0, 0);

		*world.get_or_create(position, || 1) += 1;
		*world.get_or_create(position, || 100) += 1;

		assert_eq!(world.get(position), Some(&3));
		assert_eq!(world.len(), 1);
	}

	#[test]
	fn test_remove_column() {
		let mut world = World::new();
		let column = GlobalColumnPosition::new(4, -4);

		for y in -2..3 {
			world.get_or_create(column.chunk(y), || y);
		}

		world.get_or_create(GlobalChunkPosition::new(5, 0, -4), || 10);

		assert_eq!(world.remove_column(column), 5);
		assert_eq!(world.len(), 1);
		assert_eq!(world.get(GlobalChunkPosition::new(5, 0, -4)), Some(&10));
	}
}
