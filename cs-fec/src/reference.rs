//! Bit level model of the rotation pipeline.
//!
//! Every stage of [`crate::pipeline`] is a linear map over GF(2). Here each of
//! them is spelled out as a dense bit matrix acting on the concatenated symbol
//! bits, least significant bit first within a symbol.

use std::fmt;

use crate::decoder::{AvailableSet, Decoder};
use crate::errors::*;
use crate::field::{Element, Elt};
use crate::matrix::Matrix;
use crate::pipeline::Pipeline;
use crate::rotation::mask_to_rotations;
use crate::symbols::Symbols;

/// Dense matrix over GF(2).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
	rows: usize,
	cols: usize,
	bits: Vec<bool>,
}

impl BitMatrix {
	pub fn zeros(rows: usize, cols: usize) -> Self {
		Self { rows, cols, bits: vec![false; rows * cols] }
	}

	pub fn identity(n: usize) -> Self {
		Self::from_fn(n, n, |r, c| r == c)
	}

	pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
		let bits = (0..rows).flat_map(|r| (0..cols).map(move |c| (r, c))).map(|(r, c)| f(r, c)).collect();
		Self { rows, cols, bits }
	}

	#[inline(always)]
	pub fn rows(&self) -> usize {
		self.rows
	}

	#[inline(always)]
	pub fn cols(&self) -> usize {
		self.cols
	}

	#[inline(always)]
	pub fn get(&self, r: usize, c: usize) -> bool {
		self.bits[r * self.cols + c]
	}

	fn flip(&mut self, r: usize, c: usize) {
		self.bits[r * self.cols + c] ^= true;
	}

	pub fn is_identity(&self) -> bool {
		self.rows == self.cols && (0..self.rows).all(|r| (0..self.cols).all(|c| self.get(r, c) == (r == c)))
	}

	pub fn mul(&self, rhs: &BitMatrix) -> Result<BitMatrix> {
		if self.cols != rhs.rows {
			return Err(Error::DimensionMismatch { expected: (self.cols, rhs.cols), found: (rhs.rows, rhs.cols) });
		}
		Ok(BitMatrix::from_fn(self.rows, rhs.cols, |r, c| {
			(0..self.cols).filter(|&n| self.get(r, n) && rhs.get(n, c)).count() % 2 == 1
		}))
	}

	pub fn mul_vec(&self, v: &[bool]) -> Result<Vec<bool>> {
		if v.len() != self.cols {
			return Err(Error::DimensionMismatch { expected: (self.cols, 1), found: (v.len(), 1) });
		}
		Ok((0..self.rows).map(|r| (0..self.cols).filter(|&c| self.get(r, c) && v[c]).count() % 2 == 1).collect())
	}

	/// `I_n (x) self`, `n` copies of `self` along the diagonal.
	pub fn kron_identity(&self, n: usize) -> BitMatrix {
		BitMatrix::from_fn(n * self.rows, n * self.cols, |r, c| {
			r / self.rows == c / self.cols && self.get(r % self.rows, c % self.cols)
		})
	}
}

impl fmt::Debug for BitMatrix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for r in 0..self.rows {
			let line = (0..self.cols).map(|c| if self.get(r, c) { '1' } else { '0' }).collect::<String>();
			writeln!(f, "{}", line)?;
		}
		Ok(())
	}
}

/// Rotation of an `l` bit vector by `shift` positions towards the top.
pub fn rotation_matrix(shift: u32, l: usize) -> BitMatrix {
	let shift = shift as usize % l;
	BitMatrix::from_fn(l, l, |r, c| r == (c + shift) % l)
}

/// The `l x l` sum of rotations standing for `mask`.
pub fn element_to_cyclic(mask: Element, l: usize) -> BitMatrix {
	let mut out = BitMatrix::zeros(l, l);
	for shift in mask_to_rotations(mask, l as u32) {
		for c in 0..l {
			out.flip((c + shift as usize) % l, c);
		}
	}
	out
}

/// Replace every coefficient of `coeffs` by its `l x l` rotation block.
pub fn matrix_to_cyclic(coeffs: &Matrix, l: usize) -> BitMatrix {
	let blocks = coeffs
		.iter_rows()
		.map(|row| row.iter().map(|&x| element_to_cyclic(x, l)).collect::<Vec<_>>())
		.collect::<Vec<_>>();
	BitMatrix::from_fn(coeffs.rows() * l, coeffs.cols() * l, |r, c| blocks[r / l][c / l].get(r % l, c % l))
}

/// `n` blocks of `[I_(l-1); 1...1]`: copy the symbol bits and append their parity.
pub fn lift_matrix(n: usize, l: usize) -> BitMatrix {
	BitMatrix::from_fn(l, l - 1, |r, c| r == c || r == l - 1).kron_identity(n)
}

/// `n` blocks of `[I_(l-1) | 0]`: forget the top bit.
pub fn drop_matrix(n: usize, l: usize) -> BitMatrix {
	BitMatrix::from_fn(l - 1, l, |r, c| r == c).kron_identity(n)
}

pub fn words_to_bits(words: &[Elt], width: u32) -> Vec<bool> {
	words.iter().flat_map(|&w| (0..width).map(move |i| w >> i & 1 == 1)).collect()
}

pub fn bits_to_words(bits: &[bool], width: u32) -> Vec<Elt> {
	bits.chunks(width as usize)
		.map(|chunk| chunk.iter().rev().fold(0, |acc, &b| (acc << 1) | b as Elt))
		.collect()
}

fn stage_matrices(pipeline: &Pipeline, avail: &AvailableSet) -> Result<[BitMatrix; 4]> {
	let l = pipeline.width() as usize;
	let m = pipeline.generator().m();
	let decoder = Decoder::derive(pipeline.generator(), avail)?;
	Ok([
		lift_matrix(m, l),
		matrix_to_cyclic(decoder.square(), l),
		matrix_to_cyclic(&pipeline.generator().columns(avail), l),
		drop_matrix(m, l),
	])
}

/// [`crate::pipeline::run_pipeline`] as a chain of bit matrix products.
pub fn reference_pipeline(payload: &[Elt], avail: &[usize], m: usize, k: usize, l: usize) -> Result<Vec<Elt>> {
	let pipeline = Pipeline::new(m, k, l)?;
	let avail = pipeline.available(avail)?;
	if payload.len() != m {
		return Err(Invalid::PayloadLength { have: payload.len(), want: m }.into());
	}
	let width = pipeline.field().bits();
	let mut bits = words_to_bits(Symbols::new(width, payload)?.words(), width);
	for stage in stage_matrices(&pipeline, &avail)? {
		bits = stage.mul_vec(&bits)?;
	}
	Ok(bits_to_words(&bits, width))
}

/// Whether `drop E lift drop D lift` is the identity on `m (l - 1)` bits.
pub fn full_rate_identity(m: usize, k: usize, l: usize, avail: &[usize]) -> Result<bool> {
	let pipeline = Pipeline::new(m, k, l)?;
	let avail = pipeline.available(avail)?;
	let [lift, decode, encode, drop] = stage_matrices(&pipeline, &avail)?;
	let product = [&encode, &lift, &drop, &decode, &lift]
		.into_iter()
		.try_fold(drop.clone(), |acc, stage| acc.mul(stage))?;
	Ok(product.is_identity())
}
