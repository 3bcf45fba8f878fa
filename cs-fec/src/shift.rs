//! Parity symbols built from plain rotations of the data symbols.
//!
//! Parity `j` is `XOR_i rotr(d_i, table[j][i])`. A single erased data symbol
//! is undone by rotating the remainder of any surviving parity back.

use crate::errors::*;
use crate::field::Elt;
use crate::generator::Generator;
use crate::rotation::{low_mask, rotate_left, rotate_right};
use crate::symbols::{Symbols, MAX_SYMBOL_BITS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftTableCode {
	width: u32,
	/// `table[parity][data]` rotate right amounts.
	table: Vec<Vec<u32>>,
}

impl ShiftTableCode {
	pub fn new(width: u32, table: Vec<Vec<u32>>) -> Result<Self> {
		if width == 0 || width > MAX_SYMBOL_BITS {
			return Err(Invalid::SymbolWidth(width).into());
		}
		let m = table.first().map(Vec::len).unwrap_or_default();
		if m == 0 || table.iter().any(|row| row.len() != m) {
			return Err(Invalid::ShiftTableShape.into());
		}
		Ok(Self { width, table })
	}

	/// Take the parity block coefficients of `generator` as rotate amounts.
	pub fn from_generator(generator: &Generator) -> Result<Self> {
		let parity = generator.parity_block();
		let table = (0..parity.cols()).map(|p| (0..parity.rows()).map(|i| parity[(i, p)].0).collect()).collect();
		Self::new(generator.field().bits(), table)
	}

	#[inline(always)]
	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn table(&self) -> &[Vec<u32>] {
		&self.table
	}

	/// Number of data symbols.
	pub fn m(&self) -> usize {
		self.table[0].len()
	}

	pub fn parities(&self) -> usize {
		self.table.len()
	}

	/// Rotate left amounts undoing each entry of the table.
	pub fn inverse_table(&self) -> Vec<Vec<u32>> {
		self.table.iter().map(|row| row.iter().map(|&t| (self.width - t % self.width) % self.width).collect()).collect()
	}

	fn parity(&self, j: usize, data: &[Elt]) -> Elt {
		self.table[j].iter().zip(data).fold(0, |acc, (&t, &d)| acc ^ rotate_right(d, t, self.width))
	}

	/// The data followed by every parity.
	pub fn encode(&self, data: &[Elt]) -> Result<Vec<Elt>> {
		if data.len() != self.m() {
			return Err(Invalid::PayloadLength { have: data.len(), want: self.m() }.into());
		}
		let data = Symbols::new(self.width, data)?.into_words();
		let parities = (0..self.parities()).map(|j| self.parity(j, &data)).collect::<Vec<_>>();
		Ok(data.into_iter().chain(parities).collect())
	}

	/// Fill in the erased (`None`) positions of a received codeword.
	///
	/// At most one data symbol may be missing, erased parities are recomputed.
	pub fn recover(&self, received: &[Option<Elt>]) -> Result<Vec<Elt>> {
		let (m, k) = (self.m(), self.m() + self.parities());
		if received.len() != k {
			return Err(Invalid::PayloadLength { have: received.len(), want: k }.into());
		}
		let erased = received.iter().filter(|x| x.is_none()).count();
		if erased > self.parities() {
			return Err(Invalid::TooManyErasures { erased, max: self.parities() }.into());
		}
		let missing = (0..m).filter(|&i| received[i].is_none()).collect::<Vec<_>>();
		let mut data =
			Symbols::new(self.width, received[..m].iter().map(|x| x.unwrap_or_default()).collect::<Vec<_>>())?
				.into_words();

		match missing[..] {
			[] => {}
			[e] => {
				let (j, p) = received[m..]
					.iter()
					.enumerate()
					.find_map(|(j, p)| p.map(|p| (j, p)))
					.ok_or(Invalid::TooManyErasures { erased, max: self.parities() })?;
				let known = p & low_mask(self.width);
				let rest = self.parity(j, &data);
				data[e] = rotate_left(known ^ rest, self.table[j][e], self.width);
			}
			_ => return Err(Invalid::TooManyErasures { erased: missing.len(), max: 1 }.into()),
		}
		self.encode(&data)
	}
}
