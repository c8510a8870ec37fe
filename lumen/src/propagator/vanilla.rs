use crate::access::{Cursor, LightStorage, VirtualSources};
use crate::channel::{LightType, Selection};
use crate::field::LightField;
use crate::propagator::Propagator;
use std::cmp;
use vocs::position::{Dir, GlobalPosition};

/// Per block properties that affect light.
pub trait BlockLight {
	/// How much light is lost when entering this block, from 0 to 15.
	fn opacity(&self, position: GlobalPosition) -> u8;

	/// The block light emitted by this block, from 0 to 15.
	fn emission(&self, position: GlobalPosition) -> u8;
}

/// Sky and block light with the classic rules: every step costs at least one level, opaque blocks stop light
/// completely, and full sky light falls straight down through transparent blocks for free.
#[derive(Debug, Clone)]
pub struct VanillaPropagator {
	max_light: u8,
	virtual_light: LightField<LightType>
}

impl VanillaPropagator {
	/// ### Out of bounds behavior
	/// `max_light` is truncated to 15, the highest level that can be stored.
	pub fn new(max_light: u8) -> Self {
		VanillaPropagator {
			max_light: cmp::min(max_light, 15),
			virtual_light: LightField::new()
		}
	}

	/// Stored levels above `max_light` are read as `max_light`.
	fn spread(&self, channel: LightType, dir: Dir, level: u8, opacity: u8) -> u8 {
		let level = cmp::min(level, self.max_light);

		if channel == LightType::Sky && dir == Dir::Down && level == self.max_light && opacity == 0 {
			level
		} else {
			level.saturating_sub(cmp::max(opacity, 1))
		}
	}

	fn calc_neighbor_light<S>(&self, channel: LightType, cursor: Cursor<S>, opacity: u8, out: &mut LightField<LightType>) -> bool
		where S: LightStorage<Channel = LightType> + BlockLight + ?Sized
	{
		let mut all_loaded = true;

		for dir in Dir::ALL.iter().copied() {
			let neighbor = cursor.neighbor(dir);

			if !neighbor.is_loaded() {
				all_loaded = false;
				continue;
			}

			out.add(channel, self.spread(channel, dir.opposite(), neighbor.light(channel), opacity));
		}

		// Nothing arriving from an unloaded neighbor could raise the light past this point.
		let ceiling = self.max_light.saturating_sub(cmp::max(opacity, if channel == LightType::Sky { 0 } else { 1 }));

		all_loaded || out.get(channel) >= ceiling
	}
}

impl Default for VanillaPropagator {
	fn default() -> Self {
		VanillaPropagator::new(15)
	}
}

impl<S> Propagator<S> for VanillaPropagator where S: LightStorage<Channel = LightType> + BlockLight + ?Sized {
	fn max_light(&self) -> u8 {
		self.max_light
	}

	fn calc_source_light(&mut self, selection: Selection<LightType>, cursor: Cursor<S>, out: &mut LightField<LightType>) {
		let position = cursor.position();
		let opacity = cursor.storage().opacity(position);

		if opacity >= self.max_light {
			return;
		}

		if let Some(sources) = cursor.virtual_sources() {
			self.virtual_light.clear();
			sources.emit(selection, &mut self.virtual_light);

			for (channel, level) in self.virtual_light.iter() {
				if selection.contains(channel) {
					out.add(channel, cmp::min(level, self.max_light).saturating_sub(opacity));
				}
			}
		}

		if selection.contains(LightType::Block) {
			out.add(LightType::Block, cmp::min(cursor.storage().emission(position), self.max_light));
		}
	}

	fn calc_light(&mut self, selection: Selection<LightType>, cursor: Cursor<S>, out: &mut LightField<LightType>) -> bool {
		self.calc_source_light(selection, cursor, out);

		let opacity = cursor.storage().opacity(cursor.position());
		let mut valid = true;

		for channel in selection.channels() {
			valid &= self.calc_neighbor_light(channel, cursor, opacity, out);
		}

		valid
	}

	fn can_spread(&self, _: LightType, level: u8, _: Cursor<S>) -> bool {
		level > 1
	}

	fn can_spread_towards(&self, _: LightType, _: Dir, _: u8, _: Cursor<S>) -> bool {
		true
	}

	fn calc_spread(&mut self, channel: LightType, dir: Option<Dir>, level: u8, _: Cursor<S>, neighbor: Cursor<S>, out: &mut LightField<LightType>) {
		// Sky and block light never feed into each other.
		let dir = match dir {
			Some(dir) => dir,
			None => return
		};

		let opacity = neighbor.storage().opacity(neighbor.position());
		let level = self.spread(channel, dir, level, opacity);

		if level > 0 {
			out.add(channel, level);
		}
	}
}
