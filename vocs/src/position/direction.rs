use std::fmt::{Display, Formatter, Result};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Dir {
	Up,
	Down,
	PlusX,
	MinusX,
	PlusZ,
	MinusZ
}

impl Dir {
	/// Every direction, in the order of their discriminants. `Dir::ALL[dir as usize] == dir` holds for every direction.
	pub const ALL: [Dir; 6] = [Dir::Up, Dir::Down, Dir::PlusX, Dir::MinusX, Dir::PlusZ, Dir::MinusZ];

	pub fn opposite(self) -> Dir {
		match self {
			Dir::Up     => Dir::Down,
			Dir::Down   => Dir::Up,
			Dir::PlusX  => Dir::MinusX,
			Dir::MinusX => Dir::PlusX,
			Dir::PlusZ  => Dir::MinusZ,
			Dir::MinusZ => Dir::PlusZ
		}
	}

	pub fn horizontal(self) -> bool {
		!self.vertical()
	}

	pub fn vertical(self) -> bool {
		self == Dir::Up || self == Dir::Down
	}

	pub fn axis(self) -> Axis {
		match self {
			Dir::Up     => Axis::Y,
			Dir::Down   => Axis::Y,
			Dir::PlusX  => Axis::X,
			Dir::MinusX => Axis::X,
			Dir::PlusZ  => Axis::Z,
			Dir::MinusZ => Axis::Z
		}
	}

	/// Returns the unit step of this direction as an `(x, y, z)` triple.
	pub fn delta(self) -> (i32, i32, i32) {
		match self {
			Dir::Up     => ( 0,  1,  0),
			Dir::Down   => ( 0, -1,  0),
			Dir::PlusX  => ( 1,  0,  0),
			Dir::MinusX => (-1,  0,  0),
			Dir::PlusZ  => ( 0,  0,  1),
			Dir::MinusZ => ( 0,  0, -1)
		}
	}
}

impl Display for Dir {
	fn fmt(&self, f: &mut Formatter) -> Result {
		let name = match self {
			Dir::Up     => "up",
			Dir::Down   => "down",
			Dir::PlusX  => "+x",
			Dir::MinusX => "-x",
			Dir::PlusZ  => "+z",
			Dir::MinusZ => "-z"
		};

		f.write_str(name)
	}
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Axis {
	Y,
	X,
	Z
}

impl Axis {
	pub fn horizontal(self) -> bool {
		!self.vertical()
	}

	pub fn vertical(self) -> bool {
		self == Axis::Y
	}

	pub fn plus(self) -> Dir {
		match self {
			Axis::Y => Dir::Up,
			Axis::X => Dir::PlusX,
			Axis::Z => Dir::PlusZ
		}
	}

	pub fn minus(self) -> Dir {
		match self {
			Axis::Y => Dir::Down,
			Axis::X => Dir::MinusX,
			Axis::Z => Dir::MinusZ
		}
	}
}
