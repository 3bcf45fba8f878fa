use itertools::Itertools;
use log::debug;

use crate::decoder::AvailableSet;
use crate::errors::*;
use crate::field::{Element, Field, GENERATOR};
use crate::matrix::Matrix;

/// Systematic generator `[I_m | V]` of an `(m, k)` MDS code,
/// with `V[i][j] = alpha^(i * (j + 1))` and `alpha = x`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generator {
	field: Field,
	m: usize,
	k: usize,
	matrix: Matrix,
}

impl Generator {
	/// Requires `0 < m < k`, at most `w` parities, and with two or more
	/// parities distinct `alpha^i` for every data row. Full MDS is checked by
	/// [`Generator::verify_mds`].
	pub fn new(m: usize, k: usize, field: Field) -> Result<Self> {
		if m == 0 {
			return Err(Invalid::NoDataSymbols.into());
		}
		if m >= k {
			return Err(Invalid::TooFewSymbols { m, k }.into());
		}
		let parity = k - m;
		if parity > field.bits() as usize {
			return Err(Invalid::TooManyParities { parity, bits: field.bits() }.into());
		}
		if parity >= 2 {
			if let Some(order) = short_order(&field, m) {
				return Err(Invalid::GeneratorOrder { order, m }.into());
			}
		}

		let matrix = Matrix::from_fn(m, k, |i, j| {
			if j < m {
				if i == j {
					Element::ONE
				} else {
					Element::ZERO
				}
			} else {
				let exp = i as u64 * (j - m + 1) as u64;
				field.power(GENERATOR, exp)
			}
		});
		debug!("generator m={} k={} over prim={:#x}: {:?}", m, k, field.prim(), matrix);
		Ok(Self { field, m, k, matrix })
	}

	#[inline(always)]
	pub fn field(&self) -> &Field {
		&self.field
	}

	#[inline(always)]
	pub fn m(&self) -> usize {
		self.m
	}

	#[inline(always)]
	pub fn k(&self) -> usize {
		self.k
	}

	/// Number of parity symbols, `k - m`.
	#[inline(always)]
	pub fn parity(&self) -> usize {
		self.k - self.m
	}

	/// The full `m x k` matrix.
	pub fn matrix(&self) -> &Matrix {
		&self.matrix
	}

	/// The `m x (k - m)` Vandermonde block.
	pub fn parity_block(&self) -> Matrix {
		self.matrix.select_columns(&(self.m..self.k).collect::<Vec<_>>())
	}

	/// Encode coefficients, one row per coded symbol: the `k x m` transpose.
	pub fn encode_matrix(&self) -> Matrix {
		self.matrix.transpose()
	}

	/// The `m x m` submatrix at the available columns, in their given order.
	pub fn columns(&self, avail: &AvailableSet) -> Matrix {
		self.matrix.select_columns(avail.indices())
	}

	/// All `k` coded symbols of `data`, computed over the field.
	pub fn encode(&self, data: &[Element]) -> Result<Vec<Element>> {
		if data.len() != self.m {
			return Err(Invalid::PayloadLength { have: data.len(), want: self.m }.into());
		}
		self.encode_matrix().mul_vec(data, &self.field)
	}

	/// Check every `m`-subset of columns for invertibility, in lexicographic
	/// order. The first singular subset is reported as [`Invalid::NotMds`].
	pub fn verify_mds(&self) -> Result<()> {
		let mut checked = 0_usize;
		for cols in (0..self.k).combinations(self.m) {
			match self.matrix.select_columns(&cols).inverse(&self.field) {
				Ok(_) => checked += 1,
				Err(Error::SingularMatrix { .. }) => return Err(Invalid::NotMds(cols).into()),
				Err(e) => return Err(e),
			}
		}
		debug!("verified {} column subsets of the ({}, {}) code", checked, self.m, self.k);
		Ok(())
	}
}

/// The order of [`GENERATOR`] when it is below `m`.
fn short_order(field: &Field, m: usize) -> Option<usize> {
	let mut acc = Element::ONE;
	(1..m).find(|_| {
		acc = field.multiply(acc, GENERATOR);
		acc == Element::ONE
	})
}

/// Build the systematic generator of an `(m, k)` code over `field`.
pub fn build_generator(m: usize, k: usize, field: Field) -> Result<Generator> {
	Generator::new(m, k, field)
}
