//! Queues feeding the lighting engine.
//!
//! The check, spread, and init queues collect events between processing cycles. They are grouped by cube
//! and store positions local to their cube, so an activated queue visits its entries one cube at a time.
//! The update queues hold the darkenings and brightenings of a single cycle, bucketed by light level.

mod chunk;
mod update;

pub use self::chunk::ChunkQueue;
pub use self::update::{LeveledQueues, UpdateQueue};

use crate::access::{Cursor, LightStorage};
use crate::channel::{Channel, Selection};
use vocs::position::{Bounds, CubePosition, Dir, GlobalPosition};

/// A request to verify the light at a position, optionally caused by a change in the neighbor at `dir`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Check<C> {
	pub position: GlobalPosition,
	pub dir: Option<Dir>,
	pub selection: Selection<C>
}

/// A request to project the light of one channel at a position outwards through `dir`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Spread<C> {
	pub position: GlobalPosition,
	pub dir: Dir,
	pub channel: C
}

/// A request to seed the source light of a freshly loaded position.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Init<C> {
	pub position: GlobalPosition,
	pub selection: Selection<C>
}

impl<C> Check<C> where C: Channel {
	pub fn cursor<'s, S>(&self, storage: &'s S) -> Cursor<'s, S> where S: LightStorage<Channel = C> + ?Sized {
		Cursor::new(storage, self.position)
	}
}

impl<C> Spread<C> where C: Channel {
	pub fn cursor<'s, S>(&self, storage: &'s S) -> Cursor<'s, S> where S: LightStorage<Channel = C> + ?Sized {
		Cursor::new(storage, self.position)
	}
}

impl<C> Init<C> where C: Channel {
	pub fn cursor<'s, S>(&self, storage: &'s S) -> Cursor<'s, S> where S: LightStorage<Channel = C> + ?Sized {
		Cursor::new(storage, self.position)
	}
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct CheckEntry<C> {
	position: CubePosition,
	dir: Option<Dir>,
	selection: Selection<C>
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct SpreadEntry<C> {
	position: CubePosition,
	dir: Dir,
	channel: C
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct InitEntry<C> {
	position: CubePosition,
	selection: Selection<C>
}

#[derive(Debug, Clone)]
pub struct CheckQueue<C> {
	bounds: Bounds,
	queue: ChunkQueue<CheckEntry<C>>
}

impl<C> CheckQueue<C> where C: Channel {
	pub fn new(bounds: Bounds) -> Self {
		CheckQueue { bounds, queue: ChunkQueue::new() }
	}

	/// Queues a check of every channel. Returns false and records nothing if the position is invalid.
	/// A check already waiting for the next activation is kept once.
	pub fn enqueue_check(&mut self, position: GlobalPosition, dir: Option<Dir>) -> bool {
		self.enqueue(Check { position, dir, selection: Selection::All })
	}

	pub fn enqueue_channel_check(&mut self, channel: C, position: GlobalPosition, dir: Option<Dir>) -> bool {
		self.enqueue(Check { position, dir, selection: Selection::Only(channel) })
	}

	pub fn enqueue(&mut self, check: Check<C>) -> bool {
		if !self.bounds.contains(check.position) {
			return false;
		}

		self.queue.enqueue(check.position.global_chunk(), CheckEntry {
			position: check.position.local_block(),
			dir: check.dir,
			selection: check.selection
		});

		true
	}

	/// Puts a consumed check back, to be retried in the next cycle.
	pub fn mark_for_recheck(&mut self, check: Check<C>) {
		self.enqueue(check);
	}

	pub fn activate(&mut self) -> bool {
		self.queue.activate()
	}

	pub fn next(&mut self) -> Option<Check<C>> {
		self.queue.next().map(|(chunk, entry)| Check {
			position: GlobalPosition::from_parts(chunk, entry.position),
			dir: entry.dir,
			selection: entry.selection
		})
	}

	pub fn len(&self) -> usize {
		self.queue.pending() + self.queue.remaining()
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}
}

#[derive(Debug, Clone)]
pub struct SpreadQueue<C> {
	bounds: Bounds,
	queue: ChunkQueue<SpreadEntry<C>>
}

impl<C> SpreadQueue<C> where C: Channel {
	pub fn new(bounds: Bounds) -> Self {
		SpreadQueue { bounds, queue: ChunkQueue::new() }
	}

	/// Returns false and records nothing if the position is invalid.
	pub fn enqueue_spread(&mut self, channel: C, position: GlobalPosition, dir: Dir) -> bool {
		if !self.bounds.contains(position) {
			return false;
		}

		self.queue.enqueue(position.global_chunk(), SpreadEntry {
			position: position.local_block(),
			dir,
			channel
		});

		true
	}

	/// Puts a consumed spread back, to be retried in the next cycle.
	pub fn mark_for_spread(&mut self, spread: Spread<C>) {
		self.enqueue_spread(spread.channel, spread.position, spread.dir);
	}

	pub fn activate(&mut self) -> bool {
		self.queue.activate()
	}

	pub fn next(&mut self) -> Option<Spread<C>> {
		self.queue.next().map(|(chunk, entry)| Spread {
			position: GlobalPosition::from_parts(chunk, entry.position),
			dir: entry.dir,
			channel: entry.channel
		})
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}
}

#[derive(Debug, Clone)]
pub struct InitQueue<C> {
	bounds: Bounds,
	queue: ChunkQueue<InitEntry<C>>
}

impl<C> InitQueue<C> where C: Channel {
	pub fn new(bounds: Bounds) -> Self {
		InitQueue { bounds, queue: ChunkQueue::new() }
	}

	/// Returns false and records nothing if the position is invalid.
	pub fn enqueue_init(&mut self, position: GlobalPosition, selection: Selection<C>) -> bool {
		if !self.bounds.contains(position) {
			return false;
		}

		self.queue.enqueue(position.global_chunk(), InitEntry {
			position: position.local_block(),
			selection
		});

		true
	}

	pub fn activate(&mut self) -> bool {
		self.queue.activate()
	}

	pub fn next(&mut self) -> Option<Init<C>> {
		self.queue.next().map(|(chunk, entry)| Init {
			position: GlobalPosition::from_parts(chunk, entry.position),
			selection: entry.selection
		})
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}
}
