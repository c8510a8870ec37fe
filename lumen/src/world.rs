//! An in-memory reference implementation of the light storage, for tests and tools.

use crate::access::{LightStorage, VirtualSources};
use crate::channel::{Channel, LightType, Selection};
use crate::config::WorldConfig;
use crate::field::LightField;
use crate::propagator::BlockLight;
use log::{debug, warn};
use rustc_hash::FxHashSet;
use std::cmp;
use vocs::nibbles::{u4, NibbleArray};
use vocs::position::{Bounds, CubePosition, GlobalChunkPosition, GlobalColumnPosition, GlobalPosition};
use vocs::world::World;

/// The light related properties of a block.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Block {
	pub opacity: u8,
	pub emission: u8
}

impl Block {
	pub const AIR: Block = Block { opacity: 0, emission: 0 };
	pub const OPAQUE: Block = Block { opacity: 15, emission: 0 };

	pub fn translucent(opacity: u8) -> Self {
		Block { opacity, emission: 0 }
	}

	pub fn lamp(emission: u8) -> Self {
		Block { opacity: 0, emission }
	}
}

/// One nibble per block of a section, held as a single value while every block shares it.
#[derive(Debug, Clone)]
enum Layer {
	Uniform(u4),
	Packed(NibbleArray)
}

impl Layer {
	fn get(&self, index: usize) -> u4 {
		match self {
			Layer::Uniform(value) => *value,
			Layer::Packed(nibbles) => nibbles.get(index)
		}
	}

	fn set(&mut self, index: usize, value: u4) {
		match self {
			Layer::Uniform(current) if *current == value => (),
			Layer::Uniform(current) => {
				let mut nibbles = NibbleArray::new(4096);

				nibbles.fill(*current);
				nibbles.set(index, value);

				*self = Layer::Packed(nibbles);
			},
			Layer::Packed(nibbles) => nibbles.set(index, value)
		}
	}

	/// Collapses a packed layer whose blocks all share one value.
	fn compact(&mut self) {
		if let Layer::Packed(nibbles) = self {
			if let Some(value) = nibbles.uniform() {
				*self = Layer::Uniform(value);
			}
		}
	}

	fn is_packed(&self) -> bool {
		matches!(self, Layer::Packed(_))
	}

	fn is_zero(&self) -> bool {
		matches!(self, Layer::Uniform(value) if value.raw() == 0)
	}
}

#[derive(Debug, Clone)]
struct Section {
	opacity: Layer,
	emission: Layer,
	light: Vec<Layer>
}

impl Section {
	fn new() -> Self {
		Section {
			opacity: Layer::Uniform(u4::new(0)),
			emission: Layer::Uniform(u4::new(0)),
			light: (0..LightType::COUNT).map(|_| Layer::Uniform(u4::new(0))).collect()
		}
	}

	fn block(&self, position: CubePosition) -> Block {
		let index = position.yzx() as usize;

		Block {
			opacity: self.opacity.get(index).raw(),
			emission: self.emission.get(index).raw()
		}
	}

	fn layers(&self) -> impl Iterator<Item = &Layer> {
		[&self.opacity, &self.emission].into_iter().chain(self.light.iter())
	}

	fn layers_mut(&mut self) -> impl Iterator<Item = &mut Layer> {
		[&mut self.opacity, &mut self.emission].into_iter().chain(self.light.iter_mut())
	}

	/// Returns true if the section is left holding nothing but air without light.
	fn compact(&mut self) -> bool {
		self.layers_mut().for_each(Layer::compact);
		self.layers().all(Layer::is_zero)
	}
}

/// Sky light entering through the top of the world.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct OpenSky {
	level: u8
}

impl VirtualSources<LightType> for OpenSky {
	fn emit(&self, selection: Selection<LightType>, out: &mut LightField<LightType>) {
		if selection.contains(LightType::Sky) {
			out.add(LightType::Sky, self.level);
		}
	}
}

/// Sky and block light for a sparse set of resident columns.
///
/// Residency is tracked per column, while storage is allocated per 16x16x16 section on the first non-zero
/// write. Absent sections read as air without any light. Within a section, each layer stays a single value
/// until its blocks differ. Sections written since the last `compact` collapse back to single values where
/// possible, and are dropped once they hold nothing.
#[derive(Debug, Clone)]
pub struct LightWorld {
	bounds: Bounds,
	sky_light: u8,
	columns: FxHashSet<GlobalColumnPosition>,
	sections: World<Section>,
	/// Sections written since the last compaction.
	dirty: FxHashSet<GlobalChunkPosition>
}

impl LightWorld {
	/// ### Out of bounds behavior
	/// `sky_light` is truncated to 15.
	pub fn new(bounds: Bounds, sky_light: u8) -> Self {
		LightWorld {
			bounds,
			sky_light: cmp::min(sky_light, 15),
			columns: FxHashSet::default(),
			sections: World::new(),
			dirty: FxHashSet::default()
		}
	}

	pub fn from_config(config: &WorldConfig) -> Self {
		LightWorld::new(config.bounds(), config.sky_light)
	}

	pub fn sky_light(&self) -> u8 {
		self.sky_light
	}

	/// Marks a column as resident. Returns false if it already was.
	pub fn load_column(&mut self, column: GlobalColumnPosition) -> bool {
		self.columns.insert(column)
	}

	/// Drops a column and all of its storage. Returns false if it was not resident.
	pub fn unload_column(&mut self, column: GlobalColumnPosition) -> bool {
		self.sections.remove_column(column);
		self.dirty.retain(|chunk| chunk.column() != column);
		self.columns.remove(&column)
	}

	pub fn is_column_loaded(&self, column: GlobalColumnPosition) -> bool {
		self.columns.contains(&column)
	}

	pub fn loaded_columns(&self) -> impl Iterator<Item = GlobalColumnPosition> + '_ {
		self.columns.iter().copied()
	}

	/// Every valid position in a column, from the bottom up.
	pub fn column_positions(&self, column: GlobalColumnPosition) -> impl Iterator<Item = GlobalPosition> {
		let (base_x, base_z) = (column.x() << 4, column.z() << 4);

		(self.bounds.min_y()..cmp::max(self.bounds.min_y(), self.bounds.max_y())).flat_map(move |y| {
			(0..256).map(move |zx| GlobalPosition::new(base_x | (zx & 15), y, base_z | (zx >> 4)))
		})
	}

	/// Number of sections that have storage allocated.
	pub fn allocated_sections(&self) -> usize {
		self.sections.len()
	}

	/// Number of layers that hold one nibble per block, over every allocated section.
	pub fn packed_layers(&self) -> usize {
		self.sections.chunks()
			.map(|(_, section)| section.layers().filter(|layer| layer.is_packed()).count())
			.sum()
	}

	/// Collapses the layers of recently written sections that hold a single value, and drops sections left
	/// empty. Returns the number of sections dropped.
	pub fn compact(&mut self) -> usize {
		let mut dropped = 0;

		for chunk in self.dirty.drain() {
			let empty = match self.sections.get_mut(chunk) {
				Some(section) => section.compact(),
				None => false
			};

			if empty {
				self.sections.remove(chunk);
				dropped += 1;
			}
		}

		if dropped > 0 {
			debug!("dropped {} empty sections", dropped);
		}

		dropped
	}

	/// Returns false if the position is invalid or its column is not resident.
	pub fn set_block(&mut self, position: GlobalPosition, block: Block) -> bool {
		assert!(block.opacity <= 15 && block.emission <= 15, "block properties {:?} do not fit in a nibble", block);

		if !self.bounds.contains(position) || !self.is_column_loaded(position.global_column()) {
			return false;
		}

		let chunk = position.global_chunk();
		let index = position.local_block().yzx() as usize;
		let section = self.sections.get_or_create(chunk, Section::new);

		self.dirty.insert(chunk);
		section.opacity.set(index, u4::new(block.opacity));
		section.emission.set(index, u4::new(block.emission));

		true
	}

	pub fn block(&self, position: GlobalPosition) -> Block {
		if !self.bounds.contains(position) {
			return Block::AIR;
		}

		self.sections.get(position.global_chunk())
			.map(|section| section.block(position.local_block()))
			.unwrap_or(Block::AIR)
	}

	/// Sets every block in the box spanned by two corners, inclusive. Returns how many blocks were set.
	pub fn fill(&mut self, from: GlobalPosition, to: GlobalPosition, block: Block) -> usize {
		let mut count = 0;

		for y in cmp::min(from.y(), to.y())..=cmp::max(from.y(), to.y()) {
			for z in cmp::min(from.z(), to.z())..=cmp::max(from.z(), to.z()) {
				for x in cmp::min(from.x(), to.x())..=cmp::max(from.x(), to.x()) {
					if self.set_block(GlobalPosition::new(x, y, z), block) {
						count += 1;
					}
				}
			}
		}

		count
	}
}

impl LightStorage for LightWorld {
	type Channel = LightType;
	type Sources = OpenSky;

	fn bounds(&self) -> Bounds {
		self.bounds
	}

	fn is_loaded(&self, position: GlobalPosition) -> bool {
		!self.bounds.contains(position) || self.is_column_loaded(position.global_column())
	}

	fn light(&self, position: GlobalPosition, channel: LightType) -> u8 {
		if !self.bounds.contains(position) {
			return if channel == LightType::Sky && self.bounds.is_above(position) { self.sky_light } else { 0 };
		}

		self.sections.get(position.global_chunk())
			.map(|section| section.light[channel.index()].get(position.local_block().yzx() as usize).raw())
			.unwrap_or(0)
	}

	fn set_light(&mut self, position: GlobalPosition, channel: LightType, level: u8) {
		assert!(level <= 15, "light level {} for {:?} at {} does not fit in a nibble", level, channel, position);

		if !self.bounds.contains(position) {
			return;
		}

		if !self.is_column_loaded(position.global_column()) {
			warn!("dropping {:?} light write of {} at {}: column is not loaded", channel, level, position);
			return;
		}

		let chunk = position.global_chunk();
		let index = position.local_block().yzx() as usize;

		// Zero is what an absent section reads as anyways.
		if level == 0 && !self.sections.contains(chunk) {
			return;
		}

		let section = self.sections.get_or_create(chunk, Section::new);

		section.light[channel.index()].set(index, u4::new(level));
		self.dirty.insert(chunk);
	}

	fn cleanup(&mut self) {
		self.compact();
	}

	fn virtual_sources(&self, position: GlobalPosition) -> Option<OpenSky> {
		if self.sky_light > 0 && self.bounds.top() == Some(position.y()) {
			Some(OpenSky { level: self.sky_light })
		} else {
			None
		}
	}
}

impl BlockLight for LightWorld {
	fn opacity(&self, position: GlobalPosition) -> u8 {
		self.block(position).opacity
	}

	fn emission(&self, position: GlobalPosition) -> u8 {
		self.block(position).emission
	}
}

#[cfg(test)]
mod test {
	use super::{Block, LightWorld};
	use crate::access::{Cursor, LightStorage, VirtualSources};
	use crate::channel::{LightType, Selection};
	use crate::field::LightField;
	use crate::propagator::BlockLight;
	use vocs::position::{Bounds, Dir, GlobalColumnPosition, GlobalPosition};

	fn world() -> LightWorld {
		let mut world = LightWorld::new(Bounds::new(0, 32), 15);

		world.load_column(GlobalColumnPosition::new(0, 0));
		world
	}

	#[test]
	fn test_invalid_positions_are_sinks() {
		let mut world = world();
		let above = GlobalPosition::new(3, 32, 3);
		let below = GlobalPosition::new(3, -1, 3);

		assert!(world.is_loaded(above));
		assert!(world.is_loaded(below));
		assert_eq!(world.light(above, LightType::Sky), 15);
		assert_eq!(world.light(below, LightType::Sky), 0);
		assert_eq!(world.light(above, LightType::Block), 0);

		world.set_light(above, LightType::Block, 9);

		assert_eq!(world.light(above, LightType::Block), 0);
		assert_eq!(world.allocated_sections(), 0);
	}

	#[test]
	fn test_lazy_allocation() {
		let mut world = world();
		let position = GlobalPosition::new(1, 20, 2);

		assert_eq!(world.light(position, LightType::Block), 0);

		world.set_light(position, LightType::Block, 0);

		assert_eq!(world.allocated_sections(), 0);

		world.set_light(position, LightType::Block, 11);

		assert_eq!(world.allocated_sections(), 1);
		assert_eq!(world.light(position, LightType::Block), 11);
		assert_eq!(world.light(position, LightType::Sky), 0);
		assert_eq!(world.block(position), Block::AIR);
	}

	#[test]
	fn test_residency() {
		let mut world = world();
		let outside = GlobalPosition::new(16, 4, 0);

		assert!(!world.is_loaded(outside));
		assert!(!world.set_block(outside, Block::OPAQUE));

		world.set_light(outside, LightType::Sky, 4);

		assert_eq!(world.light(outside, LightType::Sky), 0);

		assert!(world.load_column(outside.global_column()));
		assert!(!world.load_column(outside.global_column()));
		assert!(world.set_block(outside, Block::OPAQUE));
		assert_eq!(world.opacity(outside), 15);

		assert!(world.unload_column(outside.global_column()));
		assert!(!world.is_loaded(outside));
		assert_eq!(world.block(outside), Block::AIR);
	}

	#[test]
	fn test_open_sky_on_top_layer() {
		let world = world();
		let mut field = LightField::new();

		let top = Cursor::new(&world, GlobalPosition::new(0, 31, 0));
		let below = top.neighbor(Dir::Down);

		assert!(below.virtual_sources().is_none());

		let sources = top.virtual_sources().unwrap();
		sources.emit(Selection::All, &mut field);

		assert_eq!(field.get(LightType::Sky), 15);
		assert_eq!(field.get(LightType::Block), 0);
	}

	#[test]
	fn test_fill_and_positions() {
		let mut world = world();
		let column = GlobalColumnPosition::new(0, 0);

		assert_eq!(world.fill(GlobalPosition::new(0, 0, 0), GlobalPosition::new(15, 1, 15), Block::OPAQUE), 512);
		assert_eq!(world.fill(GlobalPosition::new(15, 0, 15), GlobalPosition::new(16, 0, 16), Block::AIR), 1);
		assert_eq!(world.block(GlobalPosition::new(15, 0, 15)), Block::AIR);
		assert_eq!(world.block(GlobalPosition::new(14, 1, 15)), Block::OPAQUE);

		let positions: Vec<GlobalPosition> = world.column_positions(column).collect();

		assert_eq!(positions.len(), 16 * 16 * 32);
		assert_eq!(positions[0], GlobalPosition::new(0, 0, 0));
		assert_eq!(positions[17], GlobalPosition::new(1, 0, 1));
		assert!(positions.iter().all(|position| position.global_column() == column));
	}

	#[test]
	fn test_uniform_sections_are_compacted() {
		let mut world = world();
		let column = GlobalColumnPosition::new(0, 0);
		let lamp = GlobalPosition::new(4, 20, 4);

		let positions: Vec<GlobalPosition> = world.column_positions(column).collect();

		for &position in &positions {
			world.set_light(position, LightType::Sky, 15);
		}

		assert_eq!(world.packed_layers(), 2);
		assert_eq!(world.compact(), 0);
		assert_eq!(world.packed_layers(), 0);

		world.set_light(lamp, LightType::Block, 12);
		world.set_block(lamp, Block::lamp(12));

		assert_eq!(world.packed_layers(), 2);
		assert_eq!(world.compact(), 0);
		assert_eq!(world.packed_layers(), 2);

		world.set_light(lamp, LightType::Block, 0);
		world.set_block(lamp, Block::AIR);

		assert_eq!(world.compact(), 0);
		assert_eq!(world.packed_layers(), 0);
		assert_eq!(world.allocated_sections(), 2);
		assert_eq!(world.light(lamp, LightType::Sky), 15);
		assert_eq!(world.light(lamp, LightType::Block), 0);

		for &position in &positions {
			world.set_light(position, LightType::Sky, 0);
		}

		assert_eq!(world.compact(), 2);
		assert_eq!(world.allocated_sections(), 0);
		assert_eq!(world.light(lamp, LightType::Sky), 0);
	}
}
