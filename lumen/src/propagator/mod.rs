use crate::access::{Cursor, LightStorage};
use crate::channel::Selection;
use crate::field::LightField;
use vocs::position::Dir;

mod vanilla;

pub use self::vanilla::{BlockLight, VanillaPropagator};

/// The rules for how light of each channel is emitted, attenuated, and combined.
///
/// Apart from short lived caching between `prepare_spread` and the following `calc_spread` calls, every
/// method must be a pure function of the storage seen through the cursors.
pub trait Propagator<S: LightStorage + ?Sized> {
	/// The highest level this propagator produces. The engine sizes its level buckets from this.
	fn max_light(&self) -> u8;

	/// Called before a burst of `can_spread` and `calc_spread` calls from the same position.
	fn prepare_spread(&mut self, _channel: S::Channel, _level: u8, _cursor: Cursor<S>) {}

	/// Writes the self generated light of every selected channel at the cursor into `out`.
	fn calc_source_light(&mut self, selection: Selection<S::Channel>, cursor: Cursor<S>, out: &mut LightField<S::Channel>);

	/// Writes the light every selected channel should have at the cursor into `out`: the source light combined
	/// with the light arriving from all loaded neighbors.
	///
	/// Returns false if a neighbor that is not loaded could still change the result.
	fn calc_light(&mut self, selection: Selection<S::Channel>, cursor: Cursor<S>, out: &mut LightField<S::Channel>) -> bool;

	/// Whether light of this level can leave the cursor's position at all.
	fn can_spread(&self, channel: S::Channel, level: u8, cursor: Cursor<S>) -> bool;

	/// Whether light of this level can leave the cursor's position in a specific direction.
	fn can_spread_towards(&self, channel: S::Channel, dir: Dir, level: u8, cursor: Cursor<S>) -> bool;

	/// Writes the light that would arrive at `neighbor` when `channel` leaves `cursor` through `dir` at `level`.
	/// A direction of `None` targets the position itself, to let one channel feed into another.
	fn calc_spread(&mut self, channel: S::Channel, dir: Option<Dir>, level: u8, cursor: Cursor<S>, neighbor: Cursor<S>, out: &mut LightField<S::Channel>);

	/// Called once at the end of every processing cycle.
	fn cleanup(&mut self) {}
}
