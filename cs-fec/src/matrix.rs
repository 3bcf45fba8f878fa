//! Dense matrices over GF(2^w) with flat row-major storage.

use std::fmt;
use std::ops::Index;

use log::trace;

use crate::errors::*;
use crate::field::{Element, Elt, Field};

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
	rows: usize,
	cols: usize,
	data: Vec<Element>,
}

impl Matrix {
	pub fn zeros(rows: usize, cols: usize) -> Self {
		Self { rows, cols, data: vec![Element::ZERO; rows * cols] }
	}

	pub fn identity(n: usize) -> Self {
		Self::from_fn(n, n, |r, c| if r == c { Element::ONE } else { Element::ZERO })
	}

	pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> Element) -> Self {
		let mut data = Vec::with_capacity(rows * cols);
		for r in 0..rows {
			for c in 0..cols {
				data.push(f(r, c));
			}
		}
		Self { rows, cols, data }
	}

	/// Build from nested rows, all rows must have the same length.
	pub fn from_rows<R: AsRef<[Elt]>>(rows: &[R]) -> Result<Self> {
		let cols = rows.first().map(|row| row.as_ref().len()).unwrap_or_default();
		let mut data = Vec::with_capacity(rows.len() * cols);
		for row in rows {
			let row = row.as_ref();
			if row.len() != cols {
				return Err(Error::DimensionMismatch { expected: (rows.len(), cols), found: (rows.len(), row.len()) });
			}
			data.extend(row.iter().copied().map(Element));
		}
		Ok(Self { rows: rows.len(), cols, data })
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
	pub fn dims(&self) -> (usize, usize) {
		(self.rows, self.cols)
	}

	pub fn row(&self, r: usize) -> &[Element] {
		&self.data[r * self.cols..][..self.cols]
	}

	pub fn iter_rows(&self) -> impl Iterator<Item = &[Element]> + '_ {
		(0..self.rows).map(move |r| self.row(r))
	}

	pub fn to_rows(&self) -> Vec<Vec<Elt>> {
		self.iter_rows().map(|row| row.iter().map(|x| x.0).collect()).collect()
	}

	/// Gather the given columns, in the given order.
	///
	/// Panics if a column is out of range, callers pass validated indices.
	pub fn select_columns(&self, cols: &[usize]) -> Matrix {
		Self::from_fn(self.rows, cols.len(), |r, c| self[(r, cols[c])])
	}

	pub fn transpose(&self) -> Matrix {
		Self::from_fn(self.cols, self.rows, |r, c| self[(c, r)])
	}

	pub fn is_identity(&self) -> bool {
		self.rows == self.cols
			&& self.iter_rows().enumerate().all(|(r, row)| {
				row.iter().enumerate().all(|(c, &x)| x == if r == c { Element::ONE } else { Element::ZERO })
			})
	}

	/// Matrix product over `field`, XOR as addition.
	pub fn multiply(&self, rhs: &Matrix, field: &Field) -> Result<Matrix> {
		if self.cols != rhs.rows {
			return Err(Error::DimensionMismatch { expected: (self.cols, rhs.cols), found: rhs.dims() });
		}
		let mut out = Matrix::zeros(self.rows, rhs.cols);
		for r in 0..self.rows {
			for (n, &a) in self.row(r).iter().enumerate() {
				if a.is_zero() {
					continue;
				}
				for c in 0..rhs.cols {
					let b = rhs[(n, c)];
					if !b.is_zero() {
						out.data[r * rhs.cols + c] ^= field.multiply(a, b);
					}
				}
			}
		}
		Ok(out)
	}

	/// Product with a column vector.
	pub fn mul_vec(&self, v: &[Element], field: &Field) -> Result<Vec<Element>> {
		if v.len() != self.cols {
			return Err(Error::DimensionMismatch { expected: (self.cols, 1), found: (v.len(), 1) });
		}
		Ok(self
			.iter_rows()
			.map(|row| {
				row.iter()
					.zip(v)
					.filter(|(a, b)| !a.is_zero() && !b.is_zero())
					.fold(Element::ZERO, |acc, (&a, &b)| acc ^ field.multiply(a, b))
			})
			.collect())
	}

	/// Gauss-Jordan inversion.
	///
	/// The pivot of each column is the lowest row index at or below the
	/// diagonal holding a non-zero entry, so the result is reproducible.
	pub fn inverse(&self, field: &Field) -> Result<Matrix> {
		if self.rows != self.cols {
			return Err(Error::DimensionMismatch { expected: (self.rows, self.rows), found: self.dims() });
		}
		let n = self.rows;
		let mut a = self.clone();
		let mut inv = Matrix::identity(n);

		for col in 0..n {
			let pivot = (col..n).find(|&r| !a[(r, col)].is_zero()).ok_or(Error::SingularMatrix { column: col })?;
			trace!("column {}: pivot row {}", col, pivot);
			if pivot != col {
				a.swap_rows(pivot, col);
				inv.swap_rows(pivot, col);
			}

			let scale = field.inverse(a[(col, col)])?;
			a.scale_row(col, scale, field);
			inv.scale_row(col, scale, field);

			for r in 0..n {
				if r == col {
					continue;
				}
				let factor = a[(r, col)];
				if factor.is_zero() {
					continue;
				}
				a.add_scaled_row(r, col, factor, field);
				inv.add_scaled_row(r, col, factor, field);
			}
		}
		Ok(inv)
	}

	fn row_mut(&mut self, r: usize) -> &mut [Element] {
		&mut self.data[r * self.cols..][..self.cols]
	}

	fn swap_rows(&mut self, a: usize, b: usize) {
		for c in 0..self.cols {
			self.data.swap(a * self.cols + c, b * self.cols + c);
		}
	}

	fn scale_row(&mut self, r: usize, factor: Element, field: &Field) {
		for x in self.row_mut(r) {
			*x = field.multiply(*x, factor);
		}
	}

	/// `row[dst] ^= factor * row[src]`
	fn add_scaled_row(&mut self, dst: usize, src: usize, factor: Element, field: &Field) {
		for c in 0..self.cols {
			let s = self.data[src * self.cols + c];
			self.data[dst * self.cols + c] ^= field.multiply(factor, s);
		}
	}
}

impl Index<(usize, usize)> for Matrix {
	type Output = Element;

	fn index(&self, (r, c): (usize, usize)) -> &Element {
		assert!(r < self.rows && c < self.cols, "({}, {}) out of bounds for {:?}", r, c, self.dims());
		&self.data[r * self.cols + c]
	}
}

impl fmt::Debug for Matrix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter_rows()).finish()
	}
}
