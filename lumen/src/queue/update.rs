use vocs::position::GlobalPosition;

/// A stack of pending light updates. Entries may be pushed while the stack is being drained.
#[derive(Debug, Clone)]
pub struct UpdateQueue<C> {
	entries: Vec<(GlobalPosition, C)>
}

impl<C> UpdateQueue<C> {
	pub fn new() -> Self {
		UpdateQueue { entries: Vec::new() }
	}

	pub fn enqueue(&mut self, position: GlobalPosition, channel: C) {
		self.entries.push((position, channel));
	}

	pub fn pop(&mut self) -> Option<(GlobalPosition, C)> {
		self.entries.pop()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<C> Default for UpdateQueue<C> {
	fn default() -> Self {
		UpdateQueue::new()
	}
}

/// One update queue per light level from 1 to `max_light`, so that a single descending sweep can visit
/// every level in order.
#[derive(Debug, Clone)]
pub struct LeveledQueues<C> {
	levels: Vec<UpdateQueue<C>>
}

impl<C> LeveledQueues<C> {
	pub fn new(max_light: u8) -> Self {
		LeveledQueues {
			levels: (0..max_light).map(|_| UpdateQueue::new()).collect()
		}
	}

	pub fn max_light(&self) -> u8 {
		self.levels.len() as u8
	}

	/// ### Out of bounds behavior
	/// Panics if the level is 0 or greater than `max_light`. Level 0 never needs processing.
	pub fn enqueue(&mut self, level: u8, position: GlobalPosition, channel: C) {
		self.level_mut(level).enqueue(position, channel);
	}

	pub fn pop(&mut self, level: u8) -> Option<(GlobalPosition, C)> {
		self.level_mut(level).pop()
	}

	fn level_mut(&mut self, level: u8) -> &mut UpdateQueue<C> {
		assert!(level >= 1 && level <= self.max_light(), "light level {} has no update queue, the maximum is {}", level, self.max_light());

		&mut self.levels[level as usize - 1]
	}

	pub fn is_empty(&self) -> bool {
		self.levels.iter().all(UpdateQueue::is_empty)
	}
}
