use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;
use std::mem;
use vocs::position::GlobalChunkPosition;

/// A double-buffered queue of entries grouped by the cube they belong to.
///
/// New entries always go to the back buffer. `activate` moves the back buffer to the front, where `next`
/// consumes it one cube at a time. Entries enqueued while the front is being consumed wait for the next
/// activation. An entry already waiting in the back buffer for the same cube is not queued twice.
#[derive(Debug, Clone)]
pub struct ChunkQueue<E> {
	front: Vec<(GlobalChunkPosition, Vec<E>)>,
	back: FxHashMap<GlobalChunkPosition, Vec<E>>,
	/// Everything in the back buffer.
	queued: FxHashSet<(GlobalChunkPosition, E)>,
	/// Emptied buckets, kept around to avoid reallocating them every cycle.
	spare: Vec<Vec<E>>,
	front_len: usize,
	back_len: usize
}

impl<E> ChunkQueue<E> where E: Copy + Eq + Hash {
	pub fn new() -> Self {
		ChunkQueue {
			front: Vec::new(),
			back: FxHashMap::default(),
			queued: FxHashSet::default(),
			spare: Vec::new(),
			front_len: 0,
			back_len: 0
		}
	}

	/// Returns false if the same entry was already waiting.
	pub fn enqueue(&mut self, chunk: GlobalChunkPosition, entry: E) -> bool {
		if !self.queued.insert((chunk, entry)) {
			return false;
		}

		let spare = &mut self.spare;

		self.back.entry(chunk).or_insert_with(|| spare.pop().unwrap_or_default()).push(entry);
		self.back_len += 1;

		true
	}

	/// Moves every pending entry to the front. Returns false if there is nothing to consume.
	pub fn activate(&mut self) -> bool {
		let back = mem::take(&mut self.back);
		self.queued.clear();

		self.front.extend(back);
		self.front_len += mem::replace(&mut self.back_len, 0);

		self.front_len != 0
	}

	pub fn next(&mut self) -> Option<(GlobalChunkPosition, E)> {
		loop {
			let (chunk, bucket) = self.front.last_mut()?;

			if let Some(entry) = bucket.pop() {
				self.front_len -= 1;

				return Some((*chunk, entry));
			}

			if let Some((_, empty)) = self.front.pop() {
				self.spare.push(empty);
			}
		}
	}

	/// Entries waiting for the next activation.
	pub fn pending(&self) -> usize {
		self.back_len
	}

	/// Entries that were activated but not consumed yet.
	pub fn remaining(&self) -> usize {
		self.front_len
	}

	pub fn is_empty(&self) -> bool {
		self.front_len == 0 && self.back_len == 0
	}
}

impl<E> Default for ChunkQueue<E> where E: Copy + Eq + Hash {
	fn default() -> Self {
		ChunkQueue::new()
	}
}
