mod array;

pub use self::array::{Iter, NibbleArray};

/// A 4-bit unsigned integer, the element type of a `NibbleArray`.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Default)]
pub struct u4(u8);

impl u4 {
	pub const MAX: u4 = u4(15);

	/// ### Out of bounds behavior
	/// Only the low 4 bits are kept.
	///
	/// ```
	/// use vocs::nibbles::u4;
	///
	/// assert_eq!(u4::new(9).raw(), 9);
	/// assert_eq!(u4::new(0x1F).raw(), 15);
	/// ```
	pub fn new(value: u8) -> Self {
		u4(value & 0xF)
	}

	pub fn raw(self) -> u8 {
		self.0
	}
}

impl From<u4> for u8 {
	fn from(value: u4) -> u8 {
		value.0
	}
}
