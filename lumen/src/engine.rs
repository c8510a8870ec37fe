use crate::access::{Cursor, LightObserver, LightStorage};
use crate::channel::{Channel, Selection};
use crate::config::{check_bounds, EngineConfig};
use crate::error::{Error, Result};
use crate::field::LightField;
use crate::propagator::Propagator;
use crate::queue::{Check, CheckQueue, InitQueue, LeveledQueues, Spread, SpreadQueue, UpdateQueue};
use log::{debug, trace};
use std::cmp;
use std::fmt::{self, Display, Formatter};
use std::time::{Duration, Instant};
use vocs::position::{Dir, GlobalPosition};

/// Slot of the per direction scratch arrays that refers to the position itself.
const SELF_SLOT: usize = 6;

fn slot_dir(slot: usize) -> Option<Dir> {
	Dir::ALL.get(slot).copied()
}

/// What happened during the most recent processing cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
	pub inits: usize,
	pub spreads: usize,
	pub checks: usize,
	pub darkenings: usize,
	pub brightenings: usize,
	pub deferred_checks: usize,
	pub deferred_spreads: usize,
	pub elapsed: Duration
}

impl Display for CycleStats {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(
			f,
			"{} inits, {} spreads, {} checks, {} darkenings, {} brightenings, {} deferred checks, {} deferred spreads in {:?}",
			self.inits, self.spreads, self.checks, self.darkenings, self.brightenings, self.deferred_checks, self.deferred_spreads, self.elapsed
		)
	}
}

/// Changes to apply during the sweep of one cycle.
struct Updates<C> {
	/// Darkenings found by checks, replayed once every check has run.
	initial_darkenings: UpdateQueue<C>,
	/// Brightenings found by checks, bucketed by their new level.
	initial_brightenings: LeveledQueues<C>,
	/// Bucketed by the old level.
	darkenings: LeveledQueues<C>,
	/// Bucketed by the new level.
	brightenings: LeveledQueues<C>
}

impl<C> Updates<C> where C: Channel {
	fn new(max_light: u8) -> Self {
		Updates {
			initial_darkenings: UpdateQueue::new(),
			initial_brightenings: LeveledQueues::new(max_light),
			darkenings: LeveledQueues::new(max_light),
			brightenings: LeveledQueues::new(max_light)
		}
	}

	/// Records the difference between the stored and computed level of a check. Returns true if there is one.
	fn stage(&mut self, position: GlobalPosition, channel: C, old: u8, new: u8) -> bool {
		if old < new {
			self.initial_brightenings.enqueue(cmp::min(new, self.initial_brightenings.max_light()), position, channel);
			true
		} else if old > new {
			self.initial_darkenings.enqueue(position, channel);
			true
		} else {
			false
		}
	}

	/// The light is zeroed right away, so that no other path schedules the same position again. Levels above
	/// `max_light` left in the storage are darkened from `max_light`.
	fn enqueue_darkening<S>(&mut self, storage: &mut S, position: GlobalPosition, channel: C, old: u8) where S: LightStorage<Channel = C> + ?Sized {
		self.darkenings.enqueue(cmp::min(old, self.darkenings.max_light()), position, channel);
		storage.set_light(position, channel, 0);
	}

	/// The light is raised right away, so that lower brightenings of the same position are superseded.
	fn enqueue_brightening<S>(&mut self, storage: &mut S, position: GlobalPosition, channel: C, level: u8) where S: LightStorage<Channel = C> + ?Sized {
		let level = cmp::min(level, self.brightenings.max_light());

		self.brightenings.enqueue(level, position, channel);
		storage.set_light(position, channel, level);
	}
}

/// Buffers reused by every recomputation, indexed by direction with the position itself in `SELF_SLOT`.
struct Scratch<C> {
	field: LightField<C>,
	/// Whether the darkening currently being processed looked at this neighbor.
	processed: [bool; 7],
	/// Light the position being darkened would give to each neighbor.
	spread: [LightField<C>; 7],
	/// Neighbor light that was zeroed because it may have come from the position being darkened.
	old: [LightField<C>; 7]
}

impl<C> Scratch<C> where C: Channel {
	fn new() -> Self {
		Scratch {
			field: LightField::new(),
			processed: [false; 7],
			spread: std::array::from_fn(|_| LightField::new()),
			old: std::array::from_fn(|_| LightField::new())
		}
	}
}

/// Incrementally keeps the light in a storage consistent.
///
/// Events are scheduled as checks, spreads, and inits between cycles. `proc_light_updates` then turns them
/// into darkenings and brightenings bucketed by level, and sweeps the levels from brightest to darkest. At
/// every level, darkenings run first: a darkened position computes its light again while ignoring the
/// neighbors that it may have been lighting, and spreads the darkening to them if it really got darker.
/// Brightenings then push light outwards. Once a cycle has run, every level above the one being processed
/// is final, so a single pass is enough.
///
/// Work touching a position whose region is not loaded is deferred to a later cycle instead.
pub struct LightingEngine<S, P, O> where S: LightStorage {
	max_light: u8,
	flush_threshold: usize,
	storage: S,
	propagator: P,
	observer: O,
	checks: CheckQueue<S::Channel>,
	spreads: SpreadQueue<S::Channel>,
	inits: InitQueue<S::Channel>,
	updates: Updates<S::Channel>,
	scratch: Scratch<S::Channel>,
	has_updates: bool,
	stats: CycleStats
}

impl<S, P, O> LightingEngine<S, P, O> where S: LightStorage, P: Propagator<S>, O: LightObserver<S::Channel> {
	pub fn new(storage: S, propagator: P, observer: O, config: &EngineConfig) -> Result<Self> {
		config.validate()?;

		if propagator.max_light() != config.max_light {
			return Err(Error::MaxLightMismatch { engine: config.max_light, propagator: propagator.max_light() });
		}

		let bounds = storage.bounds();
		check_bounds(bounds)?;

		Ok(LightingEngine {
			max_light: config.max_light,
			flush_threshold: config.flush_threshold,
			storage,
			propagator,
			observer,
			checks: CheckQueue::new(bounds),
			spreads: SpreadQueue::new(bounds),
			inits: InitQueue::new(bounds),
			updates: Updates::new(config.max_light),
			scratch: Scratch::new(),
			has_updates: false,
			stats: CycleStats::default()
		})
	}

	/// Schedules a check of every channel at a position, optionally blaming a change of the neighbor at `dir`.
	/// Returns false if the position is invalid.
	pub fn schedule_light_check(&mut self, position: GlobalPosition, dir: Option<Dir>) -> bool {
		let accepted = self.checks.enqueue_check(position, dir);

		self.has_updates |= accepted;
		accepted
	}

	pub fn schedule_channel_check(&mut self, channel: S::Channel, position: GlobalPosition, dir: Option<Dir>) -> bool {
		let accepted = self.checks.enqueue_channel_check(channel, position, dir);

		self.has_updates |= accepted;
		accepted
	}

	/// Schedules the light of one channel at a position to be pushed to the neighbor at `dir`.
	pub fn schedule_light_spread(&mut self, channel: S::Channel, position: GlobalPosition, dir: Dir) -> bool {
		let accepted = self.spreads.enqueue_spread(channel, position, dir);

		self.has_updates |= accepted;
		accepted
	}

	/// Schedules seeding the source light of every channel at a freshly loaded position.
	pub fn schedule_light_init(&mut self, position: GlobalPosition) -> bool {
		let accepted = self.inits.enqueue_init(position, Selection::All);

		self.has_updates |= accepted;
		accepted
	}

	pub fn schedule_channel_init(&mut self, channel: S::Channel, position: GlobalPosition) -> bool {
		let accepted = self.inits.enqueue_init(position, Selection::Only(channel));

		self.has_updates |= accepted;
		accepted
	}

	/// Whether anything was scheduled since the last cycle. Deferred work alone does not count, it is retried
	/// by the next cycle that runs.
	pub fn has_updates(&self) -> bool {
		self.has_updates
	}

	/// Whether any queue still holds work, including work deferred because of unloaded regions.
	pub fn has_pending(&self) -> bool {
		!(self.checks.is_empty() && self.spreads.is_empty() && self.inits.is_empty())
	}

	/// Whether enough checks have piled up that the caller should run a cycle now.
	pub fn needs_flush(&self) -> bool {
		self.checks.len() >= self.flush_threshold
	}

	pub fn max_light(&self) -> u8 {
		self.max_light
	}

	pub fn last_cycle(&self) -> &CycleStats {
		&self.stats
	}

	pub fn storage(&self) -> &S {
		&self.storage
	}

	pub fn storage_mut(&mut self) -> &mut S {
		&mut self.storage
	}

	pub fn propagator(&self) -> &P {
		&self.propagator
	}

	pub fn observer(&self) -> &O {
		&self.observer
	}

	pub fn observer_mut(&mut self) -> &mut O {
		&mut self.observer
	}

	pub fn into_parts(self) -> (S, P, O) {
		(self.storage, self.propagator, self.observer)
	}

	/// Runs one full processing cycle, if anything was scheduled.
	pub fn proc_light_updates(&mut self) {
		if !self.has_updates {
			return;
		}

		self.has_updates = false;
		self.stats = CycleStats::default();

		let start = Instant::now();

		self.storage.prepare();

		// Every phase has to run, even if an earlier one already found work.
		let inits = self.proc_inits();
		let spreads = self.proc_spreads();
		let checks = self.proc_checks();

		if inits | spreads | checks {
			self.compute_light_updates();
		}

		self.storage.cleanup();
		self.propagator.cleanup();

		self.stats.elapsed = start.elapsed();

		debug!("lighting cycle: {}", self.stats);
	}

	fn proc_inits(&mut self) -> bool {
		if !self.inits.activate() {
			return false;
		}

		let mut needs_processing = false;

		while let Some(init) = self.inits.next() {
			let position = init.position;

			if !self.storage.is_loaded(position) {
				trace!("dropping init at {}: not loaded", position);
				continue;
			}

			self.stats.inits += 1;

			self.scratch.field.clear();
			self.propagator.calc_source_light(init.selection, init.cursor(&self.storage), &mut self.scratch.field);

			for (channel, level) in self.scratch.field.iter() {
				if init.selection.contains(channel) && self.storage.light(position, channel) < level {
					self.updates.enqueue_brightening(&mut self.storage, position, channel, level);
					needs_processing = true;
				}
			}
		}

		needs_processing
	}

	fn proc_spreads(&mut self) -> bool {
		if !self.spreads.activate() {
			return false;
		}

		let mut needs_processing = false;

		while let Some(spread) = self.spreads.next() {
			let Spread { position, dir, channel } = spread;

			if !self.storage.is_loaded(position) {
				continue;
			}

			self.stats.spreads += 1;

			let level = self.storage.light(position, channel);
			let cursor = spread.cursor(&self.storage);

			self.propagator.prepare_spread(channel, level, cursor);

			if !self.propagator.can_spread(channel, level, cursor) || !self.propagator.can_spread_towards(channel, dir, level, cursor) {
				continue;
			}

			let neighbor = position.offset(dir);

			if !self.storage.is_valid(neighbor) {
				continue;
			}

			if self.storage.is_loaded(neighbor) {
				needs_processing |= self.enqueue_neighbor_brightening(channel, Some(dir), level, position);
			} else {
				self.defer_spread(spread);
			}
		}

		needs_processing
	}

	fn proc_checks(&mut self) -> bool {
		if !self.checks.activate() {
			return false;
		}

		let mut needs_processing = false;

		while let Some(check) = self.checks.next() {
			let position = check.position;

			if !self.storage.is_loaded(position) {
				if let Some(dir) = check.dir {
					// The loaded neighbor that caused the check must be rechecked from the unloaded side instead.
					trace!("deferring check at {} to {} until it is loaded", position, position.offset(dir));
					self.checks.mark_for_recheck(Check { position: position.offset(dir), dir: Some(dir.opposite()), selection: check.selection });
					self.stats.deferred_checks += 1;
				} else {
					trace!("dropping check at {}: not loaded", position);
				}

				continue;
			}

			self.stats.checks += 1;

			self.scratch.field.clear();
			let valid = self.propagator.calc_light(check.selection, check.cursor(&self.storage), &mut self.scratch.field);

			if !valid {
				trace!("deferring check at {}: a neighbor is not loaded", position);
				self.checks.mark_for_recheck(check);
				self.stats.deferred_checks += 1;
				continue;
			}

			for channel in check.selection.channels() {
				let (old, new) = (self.storage.light(position, channel), self.scratch.field.get(channel));

				needs_processing |= self.updates.stage(position, channel, old, new);
			}
		}

		if needs_processing {
			self.replay_staged();
		}

		needs_processing
	}

	/// Moves staged changes into the update queues. Each position is only scheduled once: darkenings zero the
	/// light, and brightenings are discarded if the light is already at least as high.
	fn replay_staged(&mut self) {
		let updates = &mut self.updates;
		let storage = &mut self.storage;

		while let Some((position, channel)) = updates.initial_darkenings.pop() {
			let old = storage.light(position, channel);

			if old > 0 {
				updates.enqueue_darkening(storage, position, channel, old);
			}
		}

		for level in (1..=self.max_light).rev() {
			while let Some((position, channel)) = updates.initial_brightenings.pop(level) {
				if level > storage.light(position, channel) {
					updates.enqueue_brightening(storage, position, channel, level);
				}
			}
		}
	}

	fn compute_light_updates(&mut self) {
		for level in (1..=self.max_light).rev() {
			while let Some((position, channel)) = self.updates.darkenings.pop(level) {
				self.process_darkening(position, channel, level);
			}

			while let Some((position, channel)) = self.updates.brightenings.pop(level) {
				self.process_brightening(position, channel, level);
			}
		}

		debug_assert!(self.updates.darkenings.is_empty() && self.updates.brightenings.is_empty());
	}

	fn process_darkening(&mut self, position: GlobalPosition, channel: S::Channel, level: u8) {
		let current = self.storage.light(position, channel);

		// Brightened again since it was scheduled.
		if current >= level {
			return;
		}

		self.stats.darkenings += 1;

		let cursor = Cursor::new(&self.storage, position);

		self.propagator.prepare_spread(channel, level, cursor);

		let can_spread = self.propagator.can_spread(channel, level, cursor);
		let mut all_loaded = true;

		if can_spread {
			for (slot, dir) in Dir::ALL.iter().copied().enumerate() {
				self.scratch.processed[slot] = false;

				let neighbor = position.offset(dir);

				if !self.storage.is_valid(neighbor) {
					continue;
				}

				if !self.propagator.can_spread_towards(channel, dir, level, Cursor::new(&self.storage, position)) {
					continue;
				}

				if !self.storage.is_loaded(neighbor) {
					all_loaded = false;
					continue;
				}

				self.scratch.processed[slot] = true;
				self.prepare_neighbor_darkening(channel, Some(dir), level, slot, position);
			}

			self.scratch.processed[SELF_SLOT] = true;
			self.prepare_neighbor_darkening(channel, None, level, SELF_SLOT, position);
		}

		if all_loaded {
			self.scratch.field.clear();

			let valid = self.propagator.calc_light(Selection::Only(channel), Cursor::new(&self.storage, position), &mut self.scratch.field);
			let new = self.scratch.field.get(channel);

			if !valid {
				self.defer_check(position, channel);
			} else if new < level {
				if current < new {
					self.updates.enqueue_brightening(&mut self.storage, position, channel, new);
				} else if current == 0 {
					self.observer.light_set(position, channel);
				}

				if can_spread {
					for slot in 0..7 {
						if !self.scratch.processed[slot] {
							continue;
						}

						let target = position.facing(slot_dir(slot));

						for (old_channel, old) in self.scratch.old[slot].iter() {
							self.updates.enqueue_darkening(&mut self.storage, target, old_channel, old);
						}
					}
				}

				return;
			}
		} else {
			self.defer_check(position, channel);
		}

		// Something else still supports this level, so the darkening is canceled.
		self.storage.set_light(position, channel, level);
		self.observer.light_set(position, channel);

		if !can_spread {
			return;
		}

		for slot in 0..7 {
			if !self.scratch.processed[slot] {
				continue;
			}

			let target = position.facing(slot_dir(slot));

			for (spread_channel, spread) in self.scratch.spread[slot].iter() {
				let old = self.scratch.old[slot].get(spread_channel);
				let existing = if old > 0 { old } else { self.storage.light(target, spread_channel) };

				if spread > existing {
					self.updates.enqueue_brightening(&mut self.storage, target, spread_channel, spread);
				} else if old > 0 {
					self.storage.set_light(target, spread_channel, old);
					self.observer.light_set(target, spread_channel);
				}
			}
		}
	}

	/// Zeroes every light at the target that the position being darkened may have been supporting, remembering
	/// the previous values in the scratch slot.
	fn prepare_neighbor_darkening(&mut self, channel: S::Channel, dir: Option<Dir>, level: u8, slot: usize, position: GlobalPosition) {
		let target = position.facing(dir);

		let spread = &mut self.scratch.spread[slot];
		spread.clear();

		self.propagator.calc_spread(channel, dir, level, Cursor::new(&self.storage, position), Cursor::new(&self.storage, target), spread);

		let (spread, old) = (&self.scratch.spread[slot], &mut self.scratch.old[slot]);
		old.clear();

		for (spread_channel, spread_level) in spread.iter() {
			let existing = self.storage.light(target, spread_channel);

			if existing > 0 && spread_level >= existing {
				old.set(spread_channel, existing);
				self.storage.set_light(target, spread_channel, 0);
			}
		}
	}

	fn process_brightening(&mut self, position: GlobalPosition, channel: S::Channel, level: u8) {
		// Superseded by a later darkening or brightening.
		if self.storage.light(position, channel) != level {
			return;
		}

		self.stats.brightenings += 1;
		self.observer.light_set(position, channel);

		let cursor = Cursor::new(&self.storage, position);

		self.propagator.prepare_spread(channel, level, cursor);

		if !self.propagator.can_spread(channel, level, cursor) {
			return;
		}

		for dir in Dir::ALL.iter().copied() {
			let neighbor = position.offset(dir);

			if !self.storage.is_valid(neighbor) {
				continue;
			}

			if !self.propagator.can_spread_towards(channel, dir, level, Cursor::new(&self.storage, position)) {
				continue;
			}

			if self.storage.is_loaded(neighbor) {
				self.enqueue_neighbor_brightening(channel, Some(dir), level, position);
			} else {
				self.defer_spread(Spread { position, dir, channel });
			}
		}

		self.enqueue_neighbor_brightening(channel, None, level, position);
	}

	/// Brightens whatever the light at `position` would raise on the target in direction `dir`. Returns true
	/// if anything was brightened.
	fn enqueue_neighbor_brightening(&mut self, channel: S::Channel, dir: Option<Dir>, level: u8, position: GlobalPosition) -> bool {
		let target = position.facing(dir);

		self.scratch.field.clear();
		self.propagator.calc_spread(channel, dir, level, Cursor::new(&self.storage, position), Cursor::new(&self.storage, target), &mut self.scratch.field);

		let mut brightened = false;

		for (spread_channel, spread) in self.scratch.field.iter() {
			if spread > self.storage.light(target, spread_channel) {
				self.updates.enqueue_brightening(&mut self.storage, target, spread_channel, spread);
				brightened = true;
			}
		}

		brightened
	}

	fn defer_check(&mut self, position: GlobalPosition, channel: S::Channel) {
		trace!("deferring {:?} recheck at {}: a neighbor is not loaded", channel, position);

		self.checks.mark_for_recheck(Check { position, dir: None, selection: Selection::Only(channel) });
		self.stats.deferred_checks += 1;
	}

	fn defer_spread(&mut self, spread: Spread<S::Channel>) {
		trace!("deferring {:?} spread at {} towards {}: neighbor is not loaded", spread.channel, spread.position, spread.dir);

		self.spreads.mark_for_spread(spread);
		self.stats.deferred_spreads += 1;
	}
}

#[cfg(test)]
mod test {
	use super::LightingEngine;
	use crate::access::{ChangeLog, LightStorage};
	use crate::channel::LightType;
	use crate::config::EngineConfig;
	use crate::error::Error;
	use crate::propagator::VanillaPropagator;
	use crate::world::{Block, LightWorld};
	use vocs::position::{Bounds, Dir, GlobalColumnPosition, GlobalPosition};

	type TestEngine = LightingEngine<LightWorld, VanillaPropagator, ChangeLog<LightType>>;

	fn engine(world: LightWorld) -> TestEngine {
		LightingEngine::new(world, VanillaPropagator::default(), ChangeLog::new(), &EngineConfig::default()).unwrap()
	}

	fn pos(x: i32, y: i32, z: i32) -> GlobalPosition {
		GlobalPosition::new(x, y, z)
	}

	fn drain(engine: &mut TestEngine) {
		while engine.has_updates() {
			engine.proc_light_updates();
		}
	}

	fn init_column(engine: &mut TestEngine, column: GlobalColumnPosition) {
		let positions: Vec<_> = engine.storage().column_positions(column).collect();

		for position in positions {
			assert!(engine.schedule_light_init(position));
		}
	}

	fn assert_same_light(a: &LightWorld, b: &LightWorld, columns: &[GlobalColumnPosition]) {
		for &column in columns {
			for position in a.column_positions(column) {
				for channel in [LightType::Sky, LightType::Block] {
					assert_eq!(a.light(position, channel), b.light(position, channel), "{:?} light differs at {}", channel, position);
				}
			}
		}
	}

	/// An opaque world with an air corridor at y = 8, z = 8 for x in 1..=30, lit by a lamp at each end.
	fn corridor() -> TestEngine {
		let mut world = LightWorld::new(Bounds::new(0, 16), 15);

		for x in -1..=2 {
			for z in -1..=1 {
				world.load_column(GlobalColumnPosition::new(x, z));
			}
		}

		world.fill(pos(-16, 0, -16), pos(47, 15, 31), Block::OPAQUE);
		world.fill(pos(1, 8, 8), pos(30, 8, 8), Block::AIR);
		world.set_block(pos(1, 8, 8), Block::lamp(15));
		world.set_block(pos(21, 8, 8), Block::lamp(8));

		let mut engine = engine(world);

		engine.schedule_light_init(pos(1, 8, 8));
		engine.schedule_light_init(pos(21, 8, 8));
		drain(&mut engine);

		engine
	}

	#[test]
	fn test_rejects_bad_setup() {
		let world = || LightWorld::new(Bounds::new(0, 16), 15);

		let mismatch = LightingEngine::new(world(), VanillaPropagator::new(14), ChangeLog::<LightType>::new(), &EngineConfig::default());
		assert!(matches!(mismatch, Err(Error::MaxLightMismatch { engine: 15, propagator: 14 })));

		let config = EngineConfig { max_light: 0, ..EngineConfig::default() };
		let range = LightingEngine::new(world(), VanillaPropagator::default(), ChangeLog::<LightType>::new(), &config);
		assert!(matches!(range, Err(Error::MaxLightOutOfRange(0))));

		let empty = LightingEngine::new(LightWorld::new(Bounds::new(4, 4), 15), VanillaPropagator::default(), ChangeLog::<LightType>::new(), &EngineConfig::default());
		assert!(matches!(empty, Err(Error::EmptyBounds { min_y: 4, max_y: 4 })));

		let tall = LightingEngine::new(LightWorld::new(Bounds::new(0, 4096), 15), VanillaPropagator::default(), ChangeLog::<LightType>::new(), &EngineConfig::default());
		assert!(matches!(tall, Err(Error::BoundsOutOfRange { min_y: 0, max_y: 4096 })));
	}

	#[test]
	fn test_invalid_positions_are_rejected() {
		let mut engine = engine(LightWorld::new(Bounds::new(0, 16), 15));

		assert!(!engine.schedule_light_check(pos(0, -1, 0), None));
		assert!(!engine.schedule_light_init(pos(0, 16, 0)));
		assert!(!engine.schedule_light_spread(LightType::Block, pos(0, 100, 0), Dir::Down));
		assert!(!engine.has_updates());
		assert!(!engine.has_pending());
	}

	#[test]
	fn test_falloff_from_single_source() {
		let mut world = LightWorld::new(Bounds::new(-16, 16), 15);

		for x in -1..=1 {
			for z in -1..=0 {
				world.load_column(GlobalColumnPosition::new(x, z));
			}
		}

		world.set_block(pos(0, 0, 0), Block::lamp(15));

		let mut engine = engine(world);

		engine.schedule_light_init(pos(0, 0, 0));
		drain(&mut engine);

		let world = engine.storage();

		for x in 0..=14 {
			assert_eq!(world.light(pos(x, 0, 0), LightType::Block), 15 - x as u8);
		}

		for x in 15..=20 {
			assert_eq!(world.light(pos(x, 0, 0), LightType::Block), 0);
		}

		assert_eq!(world.light(pos(-14, 0, 0), LightType::Block), 1);
		assert_eq!(world.light(pos(0, 0, 14), LightType::Block), 1);
		assert_eq!(world.light(pos(0, -14, 0), LightType::Block), 1);
		assert_eq!(world.light(pos(5, 5, 4), LightType::Block), 1);
		assert_eq!(world.light(pos(5, 5, 5), LightType::Block), 0);

		assert!(!engine.has_pending());
		assert!(engine.observer().contains(pos(14, 0, 0)));
		assert!(!engine.observer().contains(pos(15, 0, 0)));
	}

	#[test]
	fn test_source_removal() {
		let mut engine = corridor();

		for x in 1i32..=30 {
			let expected = [15 - (x - 1), 8 - (x - 21).abs(), 0].into_iter().max().unwrap_or(0);

			assert_eq!(engine.storage().light(pos(x, 8, 8), LightType::Block), expected as u8, "before removal at x = {}", x);
		}

		engine.storage_mut().set_block(pos(1, 8, 8), Block::AIR);
		engine.observer_mut().clear();
		assert!(engine.schedule_light_check(pos(1, 8, 8), None));
		drain(&mut engine);

		for x in 1i32..=30 {
			let expected = cmp_zero(8 - (x - 21).abs());

			assert_eq!(engine.storage().light(pos(x, 8, 8), LightType::Block), expected, "after removal at x = {}", x);
		}

		assert_eq!(engine.storage().light(pos(14, 8, 8), LightType::Block), 1);
		assert_eq!(engine.storage().light(pos(5, 9, 8), LightType::Block), 0);
		assert!(engine.observer().contains(pos(1, 8, 8)));
		assert!(engine.observer().contains(pos(14, 8, 8)));
		assert!(!engine.observer().contains(pos(21, 8, 8)));
		assert!(engine.last_cycle().darkenings >= 14);
	}

	fn cmp_zero(level: i32) -> u8 {
		if level > 0 { level as u8 } else { 0 }
	}

	#[test]
	fn test_second_check_is_idle() {
		let mut engine = corridor();

		for x in 1..=30 {
			engine.schedule_light_check(pos(x, 8, 8), None);
			engine.schedule_light_check(pos(x, 9, 8), Some(Dir::Down));
		}

		engine.observer_mut().clear();
		engine.proc_light_updates();

		let stats = engine.last_cycle();

		assert_eq!(stats.checks, 60);
		assert_eq!(stats.darkenings, 0);
		assert_eq!(stats.brightenings, 0);
		assert!(engine.observer().changes().is_empty());
		assert!(!engine.has_updates());

		// Nothing scheduled, so nothing runs.
		engine.proc_light_updates();
		assert_eq!(engine.last_cycle().checks, 60);
	}

	#[test]
	fn test_duplicate_checks() {
		let mut once = corridor();
		let mut many = corridor();

		for engine in [&mut once, &mut many] {
			engine.storage_mut().set_block(pos(21, 8, 8), Block::AIR);
		}

		once.schedule_light_check(pos(21, 8, 8), None);

		for _ in 0..4 {
			many.schedule_light_check(pos(21, 8, 8), None);
		}

		many.schedule_light_check(pos(21, 8, 8), Some(Dir::Up));
		many.schedule_channel_check(LightType::Block, pos(21, 8, 8), None);

		drain(&mut once);
		drain(&mut many);

		assert_eq!(once.last_cycle().darkenings, many.last_cycle().darkenings);
		assert_eq!(once.last_cycle().brightenings, many.last_cycle().brightenings);

		let columns: Vec<_> = once.storage().loaded_columns().collect();
		assert_same_light(once.storage(), many.storage(), &columns);
	}

	#[test]
	fn test_sky_shaft() {
		let column = GlobalColumnPosition::new(0, 0);
		let mut world = LightWorld::new(Bounds::new(0, 16), 15);

		world.load_column(column);
		world.fill(pos(0, 0, 0), pos(15, 15, 15), Block::OPAQUE);
		world.fill(pos(8, 0, 8), pos(8, 15, 8), Block::AIR);

		let mut engine = engine(world);

		init_column(&mut engine, column);
		drain(&mut engine);

		for y in 0..16 {
			assert_eq!(engine.storage().light(pos(8, y, 8), LightType::Sky), 15);
		}

		assert_eq!(engine.storage().light(pos(7, 8, 8), LightType::Sky), 0);

		engine.storage_mut().set_block(pos(8, 5, 8), Block::translucent(1));
		engine.schedule_light_check(pos(8, 5, 8), None);
		drain(&mut engine);

		for y in 6..16 {
			assert_eq!(engine.storage().light(pos(8, y, 8), LightType::Sky), 15);
		}

		for y in 0..=5 {
			assert_eq!(engine.storage().light(pos(8, y, 8), LightType::Sky), 14 - (5 - y) as u8);
		}
	}

	#[test]
	fn test_deferral_at_unloaded_edge() {
		let loaded = GlobalColumnPosition::new(0, 0);
		let unloaded = GlobalColumnPosition::new(1, 0);
		let lamp = pos(15, 8, 8);

		let mut world = LightWorld::new(Bounds::new(0, 16), 15);
		world.load_column(loaded);

		let mut engine = engine(world);

		init_column(&mut engine, loaded);
		drain(&mut engine);

		engine.storage_mut().set_block(lamp, Block::lamp(10));
		engine.observer_mut().clear();
		engine.schedule_light_check(lamp, None);
		engine.proc_light_updates();

		assert_eq!(engine.storage().light(lamp, LightType::Block), 0);
		assert!(!engine.observer().contains(lamp));
		assert_eq!(engine.last_cycle().deferred_checks, 1);
		assert!(engine.has_pending());
		assert!(!engine.has_updates());

		engine.storage_mut().load_column(unloaded);
		init_column(&mut engine, unloaded);
		drain(&mut engine);

		let mut reference = LightWorld::new(Bounds::new(0, 16), 15);
		reference.load_column(loaded);
		reference.load_column(unloaded);
		reference.set_block(lamp, Block::lamp(10));

		let mut reference = self::engine(reference);

		init_column(&mut reference, loaded);
		init_column(&mut reference, unloaded);
		drain(&mut reference);

		assert_eq!(engine.storage().light(lamp, LightType::Block), 10);
		assert_eq!(engine.storage().light(pos(24, 8, 8), LightType::Block), 1);
		assert_same_light(engine.storage(), reference.storage(), &[loaded, unloaded]);
	}

	/// A roofed area spanning three columns, with lamps next to the column edges.
	fn build(world: &mut LightWorld) {
		world.fill(pos(10, 12, 2), pos(40, 12, 12), Block::OPAQUE);
		world.fill(pos(20, 0, 0), pos(20, 11, 15), Block::translucent(3));
		world.set_block(pos(15, 8, 8), Block::lamp(14));
		world.set_block(pos(33, 3, 5), Block::lamp(12));
	}

	#[test]
	fn test_residency_order() {
		let columns = [GlobalColumnPosition::new(0, 0), GlobalColumnPosition::new(1, 0), GlobalColumnPosition::new(2, 0)];

		let mut reference = LightWorld::new(Bounds::new(0, 16), 15);

		for &column in &columns {
			reference.load_column(column);
		}

		build(&mut reference);

		let mut reference = engine(reference);

		for &column in &columns {
			init_column(&mut reference, column);
		}

		drain(&mut reference);

		let mut staggered = engine(LightWorld::new(Bounds::new(0, 16), 15));

		for &index in &[2, 0, 1] {
			staggered.storage_mut().load_column(columns[index]);
			build(staggered.storage_mut());
			init_column(&mut staggered, columns[index]);
			drain(&mut staggered);
		}

		assert_same_light(staggered.storage(), reference.storage(), &columns);
		assert_eq!(staggered.storage().light(pos(16, 8, 8), LightType::Block), 13);
	}

	#[test]
	fn test_needs_flush() {
		let config = EngineConfig { flush_threshold: 3, ..EngineConfig::default() };
		let mut world = LightWorld::new(Bounds::new(0, 16), 15);
		world.load_column(GlobalColumnPosition::new(0, 0));

		let mut engine = LightingEngine::new(world, VanillaPropagator::default(), ChangeLog::new(), &config).unwrap();

		engine.schedule_light_check(pos(1, 1, 1), None);
		engine.schedule_light_check(pos(2, 1, 1), None);
		assert!(!engine.needs_flush());

		engine.schedule_light_check(pos(3, 1, 1), None);
		assert!(engine.needs_flush());

		engine.proc_light_updates();
		assert!(!engine.needs_flush());
		assert!(!engine.has_pending());
	}

	#[test]
	fn test_unloaded_check_rechecks_its_cause() {
		let loaded = GlobalColumnPosition::new(0, 0);
		let unloaded = GlobalColumnPosition::new(1, 0);
		let edge = pos(15, 8, 8);

		let mut world = LightWorld::new(Bounds::new(0, 16), 15);
		world.load_column(loaded);

		let mut engine = engine(world);

		init_column(&mut engine, loaded);
		drain(&mut engine);

		// Light left behind by a lamp that used to stand in the unloaded column.
		engine.storage_mut().set_light(edge, LightType::Block, 10);
		engine.storage_mut().set_light(pos(14, 8, 8), LightType::Block, 9);

		assert!(engine.schedule_light_check(pos(16, 8, 8), Some(Dir::MinusX)));
		engine.proc_light_updates();

		assert_eq!(engine.last_cycle().deferred_checks, 1);
		assert!(engine.has_pending());

		engine.storage_mut().load_column(unloaded);
		init_column(&mut engine, unloaded);
		drain(&mut engine);

		assert_eq!(engine.storage().light(edge, LightType::Block), 0);
		assert_eq!(engine.storage().light(pos(14, 8, 8), LightType::Block), 0);

		let mut reference = LightWorld::new(Bounds::new(0, 16), 15);
		reference.load_column(loaded);
		reference.load_column(unloaded);

		let mut reference = self::engine(reference);

		init_column(&mut reference, loaded);
		init_column(&mut reference, unloaded);
		drain(&mut reference);

		assert_same_light(engine.storage(), reference.storage(), &[loaded, unloaded]);
	}

	#[test]
	fn test_repeated_deferrals_do_not_pile_up() {
		let loaded = GlobalColumnPosition::new(0, 0);
		let lamp = pos(15, 8, 8);

		let mut world = LightWorld::new(Bounds::new(0, 16), 15);
		world.load_column(loaded);

		let mut engine = engine(world);

		init_column(&mut engine, loaded);
		drain(&mut engine);

		let mut deferred = Vec::new();

		for i in 0..20 {
			let block = if i % 2 == 0 { Block::lamp(10) } else { Block::AIR };

			engine.storage_mut().set_block(lamp, block);
			engine.schedule_light_check(lamp, None);
			engine.proc_light_updates();

			deferred.push((engine.last_cycle().checks, engine.last_cycle().deferred_checks));
		}

		assert_eq!(deferred[1], (1, 1));
		assert_eq!(deferred[19], deferred[1]);
	}

	#[test]
	fn test_dim_engine_under_bright_sky() {
		let column = GlobalColumnPosition::new(0, 0);
		let lamp = pos(8, 8, 8);

		let mut world = LightWorld::new(Bounds::new(0, 16), 15);
		world.load_column(column);
		world.set_block(lamp, Block::lamp(15));

		let config = EngineConfig { max_light: 10, ..EngineConfig::default() };
		let mut engine = LightingEngine::new(world, VanillaPropagator::new(10), ChangeLog::new(), &config).unwrap();

		init_column(&mut engine, column);
		drain(&mut engine);

		// Stale light from a brighter configuration.
		engine.storage_mut().set_light(pos(3, 15, 3), LightType::Sky, 15);
		engine.schedule_light_check(pos(3, 15, 3), None);
		drain(&mut engine);

		for y in 0..16 {
			assert_eq!(engine.storage().light(pos(3, y, 3), LightType::Sky), 10);
		}

		assert_eq!(engine.storage().light(lamp, LightType::Block), 10);
		assert_eq!(engine.storage().light(pos(9, 8, 8), LightType::Block), 9);
		assert_eq!(engine.storage().light(pos(12, 8, 12), LightType::Block), 2);
	}

	#[test]
	fn test_open_air_is_compacted() {
		let column = GlobalColumnPosition::new(0, 0);
		let mut world = LightWorld::new(Bounds::new(0, 32), 15);
		world.load_column(column);

		let mut engine = engine(world);

		init_column(&mut engine, column);
		drain(&mut engine);

		assert_eq!(engine.storage().allocated_sections(), 2);
		assert_eq!(engine.storage().packed_layers(), 0);
		assert_eq!(engine.storage().light(pos(5, 0, 5), LightType::Sky), 15);
		assert_eq!(engine.storage().light(pos(5, 31, 5), LightType::Block), 0);
	}
}
