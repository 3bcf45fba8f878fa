use crate::decoder::AvailableSet;
use crate::errors::*;
use crate::field::{Elt, Field, DEFAULT_PRIM};
use crate::generator::Generator;
use crate::pipeline::MIN_WIDTH;

/// Width `w` for which [`DEFAULT_PRIM`] is used unless a polynomial is given.
const DEFAULT_PRIM_BITS: u32 = 10;

/// Parameters of a coefficient derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeParams {
	/// Width of the cyclic domain, symbols carry `l - 1` bits.
	pub l: usize,
	/// Number of data symbols.
	pub m: usize,
	/// Total number of coded symbols.
	pub k: usize,
	/// Reduction polynomial, resolved by [`CodeParams::field`] when absent.
	pub prim: Option<Elt>,
	/// Received columns, `[0, m)` by default.
	pub avail: Vec<usize>,
}

impl CodeParams {
	pub fn new(l: usize, m: usize, k: usize) -> Result<Self> {
		if l < MIN_WIDTH {
			return Err(Invalid::WidthTooSmall(l).into());
		}
		if m == 0 {
			return Err(Invalid::NoDataSymbols.into());
		}
		if k <= m {
			return Err(Invalid::TooFewSymbols { m, k }.into());
		}
		let bits = u32::try_from(l - 1).map_err(|_| Invalid::FieldWidth(u32::MAX))?;
		if k - m > bits as usize {
			return Err(Invalid::TooManyParities { parity: k - m, bits }.into());
		}
		Ok(Self { l, m, k, prim: None, avail: (0..m).collect() })
	}

	pub fn with_prim(mut self, prim: Elt) -> Self {
		self.prim = Some(prim);
		self
	}

	pub fn with_avail(mut self, avail: impl Into<Vec<usize>>) -> Self {
		self.avail = avail.into();
		self
	}

	/// Field width `w = l - 1`.
	pub fn bits(&self) -> Result<u32> {
		if self.l < MIN_WIDTH {
			return Err(Invalid::WidthTooSmall(self.l).into());
		}
		u32::try_from(self.l - 1).map_err(|_| Invalid::FieldWidth(u32::MAX).into())
	}

	/// An explicit polynomial wins, otherwise [`DEFAULT_PRIM`] for `w = 10` and
	/// the cyclic polynomial for every other width.
	pub fn field(&self) -> Result<Field> {
		let bits = self.bits()?;
		match self.prim {
			Some(prim) => Field::new(bits, prim),
			None if bits == DEFAULT_PRIM_BITS => Field::new(bits, DEFAULT_PRIM),
			None => Field::cyclic(bits),
		}
	}

	pub fn generator(&self) -> Result<Generator> {
		Generator::new(self.m, self.k, self.field()?)
	}

	pub fn available(&self) -> Result<AvailableSet> {
		AvailableSet::new(self.avail.clone(), self.m, self.k)
	}
}
