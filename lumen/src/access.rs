use crate::channel::{Channel, Selection};
use crate::field::LightField;
use vocs::position::{Bounds, Dir, GlobalPosition};

/// Light storage that the engine reads from and writes to.
///
/// Positions outside of `bounds` are sinks: reads return a channel specific default and writes are discarded.
pub trait LightStorage {
	type Channel: Channel;
	type Sources: VirtualSources<Self::Channel>;

	fn bounds(&self) -> Bounds;

	fn is_valid(&self, position: GlobalPosition) -> bool {
		self.bounds().contains(position)
	}

	/// Whether the region backing this position is resident. Invalid positions are always loaded, since
	/// there is nothing to wait for.
	fn is_loaded(&self, position: GlobalPosition) -> bool;

	fn light(&self, position: GlobalPosition, channel: Self::Channel) -> u8;

	/// ### Out of bounds behavior
	/// If the position is invalid, the write is dropped.
	fn set_light(&mut self, position: GlobalPosition, channel: Self::Channel, level: u8);

	/// Extra light sources attached to a position that are not tabulated as block emission.
	fn virtual_sources(&self, _position: GlobalPosition) -> Option<Self::Sources> {
		None
	}

	/// Called before a processing cycle touches any light values.
	fn prepare(&mut self) {}

	/// Called after a processing cycle, allowing transient caches to be released.
	fn cleanup(&mut self) {}
}

pub trait VirtualSources<C: Channel> {
	/// Adds the level of every selected channel emitted by these sources into `out`.
	fn emit(&self, selection: Selection<C>, out: &mut LightField<C>);
}

/// Virtual sources for storages that never have any.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NoVirtualSources {}

impl<C: Channel> VirtualSources<C> for NoVirtualSources {
	fn emit(&self, _: Selection<C>, _: &mut LightField<C>) {
		match *self {}
	}
}

/// A read only view of the light storage positioned at a single block.
///
/// Neighboring views are created on demand, and may alias each other.
pub struct Cursor<'s, S: ?Sized> {
	storage: &'s S,
	position: GlobalPosition
}

impl<'s, S: ?Sized> Clone for Cursor<'s, S> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<'s, S: ?Sized> Copy for Cursor<'s, S> {}

impl<'s, S> Cursor<'s, S> where S: LightStorage + ?Sized {
	pub fn new(storage: &'s S, position: GlobalPosition) -> Self {
		Cursor { storage, position }
	}

	pub fn position(&self) -> GlobalPosition {
		self.position
	}

	pub fn storage(&self) -> &'s S {
		self.storage
	}

	pub fn is_valid(&self) -> bool {
		self.storage.is_valid(self.position)
	}

	pub fn is_loaded(&self) -> bool {
		self.storage.is_loaded(self.position)
	}

	pub fn light(&self, channel: S::Channel) -> u8 {
		self.storage.light(self.position, channel)
	}

	/// Copies every stored channel at this position into `out`.
	pub fn lights(&self, out: &mut LightField<S::Channel>) {
		out.clear();

		for channel in S::Channel::all() {
			out.set(channel, self.light(channel));
		}
	}

	pub fn neighbor(&self, dir: Dir) -> Self {
		Cursor::new(self.storage, self.position.offset(dir))
	}

	/// Like `neighbor`, but `None` refers to this cursor itself.
	pub fn facing(&self, dir: Option<Dir>) -> Self {
		Cursor::new(self.storage, self.position.facing(dir))
	}

	pub fn virtual_sources(&self) -> Option<S::Sources> {
		self.storage.virtual_sources(self.position)
	}
}

/// Receives a notification for every light value written by the engine.
pub trait LightObserver<C> {
	fn light_set(&mut self, position: GlobalPosition, channel: C);
}

/// Discards every notification.
#[derive(Debug, Copy, Clone, Default)]
pub struct IgnoreChanges;

impl<C> LightObserver<C> for IgnoreChanges {
	fn light_set(&mut self, _: GlobalPosition, _: C) {}
}

/// Forwards every notification to the `trace` log level.
#[derive(Debug, Copy, Clone, Default)]
pub struct LogChanges;

impl<C> LightObserver<C> for LogChanges where C: std::fmt::Debug {
	fn light_set(&mut self, position: GlobalPosition, channel: C) {
		log::trace!("light set: {:?} at {}", channel, position);
	}
}

/// Records every notification in order.
#[derive(Debug, Clone)]
pub struct ChangeLog<C> {
	changes: Vec<(GlobalPosition, C)>
}

impl<C> ChangeLog<C> {
	pub fn new() -> Self {
		ChangeLog { changes: Vec::new() }
	}

	pub fn changes(&self) -> &[(GlobalPosition, C)] {
		&self.changes
	}

	pub fn clear(&mut self) {
		self.changes.clear();
	}

	pub fn contains(&self, position: GlobalPosition) -> bool {
		self.changes.iter().any(|&(changed, _)| changed == position)
	}
}

impl<C> Default for ChangeLog<C> {
	fn default() -> Self {
		ChangeLog::new()
	}
}

impl<C> LightObserver<C> for ChangeLog<C> {
	fn light_set(&mut self, position: GlobalPosition, channel: C) {
		self.changes.push((position, channel));
	}
}
