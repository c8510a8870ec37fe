use crate::channel::Channel;
use std::marker::PhantomData;
use vocs::nibbles::{u4, NibbleArray};

/// Scratch mapping from each channel to a light level, with one nibble per channel.
///
/// Fields are cleared and refilled for every recomputation instead of being reallocated.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LightField<C> {
	levels: NibbleArray,
	_channel: PhantomData<C>
}

impl<C> LightField<C> where C: Channel {
	pub fn new() -> Self {
		LightField {
			levels: NibbleArray::new(C::COUNT),
			_channel: PhantomData
		}
	}

	pub fn clear(&mut self) {
		self.levels.clear();
	}

	pub fn get(&self, channel: C) -> u8 {
		self.levels.get(channel.index()).raw()
	}

	/// Overwrites the level of a channel.
	pub fn set(&mut self, channel: C, level: u8) {
		assert!(level <= 15, "light level {} for {:?} does not fit in a nibble", level, channel);

		self.levels.set(channel.index(), u4::new(level));
	}

	/// Raises the level of a channel to `level` if it is currently lower.
	pub fn add(&mut self, channel: C, level: u8) {
		let current = self.get(channel);

		if level > current {
			self.set(channel, level);
		}
	}

	pub fn is_empty(&self) -> bool {
		self.levels.is_zero()
	}

	/// Iterates over every channel with a non-zero level.
	pub fn iter(&self) -> Iter<C> {
		Iter {
			levels: self.levels.iter().enumerate(),
			_channel: PhantomData
		}
	}
}

impl<C> Default for LightField<C> where C: Channel {
	fn default() -> Self {
		LightField::new()
	}
}

pub struct Iter<'a, C> {
	levels: std::iter::Enumerate<vocs::nibbles::Iter<'a>>,
	_channel: PhantomData<C>
}

impl<'a, C> Iterator for Iter<'a, C> where C: Channel {
	type Item = (C, u8);

	fn next(&mut self) -> Option<(C, u8)> {
		for (index, level) in &mut self.levels {
			if level.raw() != 0 {
				return Some((C::from_index(index), level.raw()));
			}
		}

		None
	}
}
