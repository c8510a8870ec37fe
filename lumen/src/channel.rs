use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::Hash;

/// An independent light quantity stored at every position.
///
/// Channels of one kind form a small closed set, and each one maps to a dense index used by `LightField`.
pub trait Channel: Copy + Eq + Hash + Debug + 'static {
	const COUNT: usize;

	fn index(self) -> usize;

	/// ### Out of bounds behavior
	/// Panics if `index >= COUNT`.
	fn from_index(index: usize) -> Self;

	fn all() -> Channels<Self> {
		Channels { next: 0, _channel: Default::default() }
	}
}

pub struct Channels<C> {
	next: usize,
	_channel: std::marker::PhantomData<C>
}

impl<C> Iterator for Channels<C> where C: Channel {
	type Item = C;

	fn next(&mut self) -> Option<C> {
		if self.next >= C::COUNT {
			return None;
		}

		let channel = C::from_index(self.next);
		self.next += 1;

		Some(channel)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = C::COUNT.saturating_sub(self.next);

		(remaining, Some(remaining))
	}
}

/// Identifies the channels an operation applies to: either a single one, or all of them at once.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Selection<C> {
	All,
	Only(C)
}

impl<C> Selection<C> where C: Channel {
	pub fn contains(&self, channel: C) -> bool {
		match *self {
			Selection::All => true,
			Selection::Only(only) => only == channel
		}
	}

	pub fn single(&self) -> Option<C> {
		match *self {
			Selection::All => None,
			Selection::Only(only) => Some(only)
		}
	}

	pub fn channels(self) -> impl Iterator<Item = C> {
		C::all().filter(move |&channel| self.contains(channel))
	}
}

impl<C> From<C> for Selection<C> {
	fn from(channel: C) -> Self {
		Selection::Only(channel)
	}
}

/// The two standard light channels.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightType {
	/// Light from the sky. Travels straight down without losing intensity while unobstructed.
	Sky,
	/// Light emitted by blocks.
	Block
}

impl Channel for LightType {
	const COUNT: usize = 2;

	fn index(self) -> usize {
		self as usize
	}

	fn from_index(index: usize) -> Self {
		match index {
			0 => LightType::Sky,
			1 => LightType::Block,
			_ => panic!("light type index out of bounds: the count is 2 but the index is {}", index)
		}
	}
}

impl Display for LightType {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		match self {
			LightType::Sky => f.write_str("sky"),
			LightType::Block => f.write_str("block")
		}
	}
}
