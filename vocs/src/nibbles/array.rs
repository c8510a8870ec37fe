use super::u4;

/// A fixed length array of `u4` values, stored two to a byte with the even index in the low half.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NibbleArray {
	bytes: Vec<u8>,
	len: usize
}

impl NibbleArray {
	/// Creates an array of `len` zeroes.
	pub fn new(len: usize) -> Self {
		NibbleArray {
			bytes: vec![0; (len + 1) / 2],
			len
		}
	}

	fn check(&self, index: usize) {
		if index >= self.len {
			panic!("index out of bounds: the len is {} but the index is {}", self.len, index);
		}
	}

	pub fn get(&self, index: usize) -> u4 {
		self.check(index);

		u4::new(self.bytes[index / 2] >> ((index & 1) * 4))
	}

	pub fn set(&mut self, index: usize, value: u4) {
		self.check(index);

		let shift = (index & 1) * 4;
		let byte = &mut self.bytes[index / 2];

		*byte = (*byte & !(0xF << shift)) | (value.raw() << shift);
	}

	/// Sets every element to the same value.
	pub fn fill(&mut self, value: u4) {
		let pair = value.raw() * 0x11;

		self.bytes.iter_mut().for_each(|byte| *byte = pair);

		// The unused high half of an odd length array stays zero, so that `is_zero` only has to look at bytes.
		if self.len & 1 == 1 {
			if let Some(last) = self.bytes.last_mut() {
				*last &= 0xF;
			}
		}
	}

	pub fn clear(&mut self) {
		self.bytes.iter_mut().for_each(|byte| *byte = 0);
	}

	pub fn is_zero(&self) -> bool {
		self.bytes.iter().all(|&byte| byte == 0)
	}

	/// The value shared by every element, or `None` if they differ or the array is empty.
	pub fn uniform(&self) -> Option<u4> {
		if self.len == 0 {
			return None;
		}

		let first = self.get(0);
		let pair = first.raw() * 0x11;

		let full = self.bytes[..self.len / 2].iter().all(|&byte| byte == pair);

		if full && (self.len & 1 == 0 || self.get(self.len - 1) == first) {
			Some(first)
		} else {
			None
		}
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn iter(&self) -> Iter {
		Iter { array: self, index: 0 }
	}
}

pub struct Iter<'a> {
	array: &'a NibbleArray,
	index: usize
}

impl<'a> Iterator for Iter<'a> {
	type Item = u4;

	fn next(&mut self) -> Option<u4> {
		if self.index >= self.array.len {
			return None;
		}

		let value = self.array.get(self.index);
		self.index += 1;

		Some(value)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.array.len - self.index;

		(remaining, Some(remaining))
	}
}
