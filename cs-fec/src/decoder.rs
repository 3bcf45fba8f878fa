use log::debug;

use crate::errors::*;
use crate::field::{Element, Field};
use crate::generator::Generator;
use crate::matrix::Matrix;

/// Ordered set of exactly `m` distinct received column indices out of `k`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AvailableSet {
	k: usize,
	indices: Vec<usize>,
}

impl AvailableSet {
	pub fn new(indices: impl Into<Vec<usize>>, m: usize, k: usize) -> Result<Self> {
		let indices = indices.into();
		if indices.len() != m {
			return Err(Invalid::AvailableCount { have: indices.len(), want: m }.into());
		}
		let mut seen = vec![false; k];
		for &index in &indices {
			if index >= k {
				return Err(Invalid::IndexOutOfRange { index, k }.into());
			}
			if std::mem::replace(&mut seen[index], true) {
				return Err(Invalid::DuplicateIndex(index).into());
			}
		}
		Ok(Self { k, indices })
	}

	/// The first `m` columns, i.e. no erasure among the data symbols.
	pub fn systematic(m: usize, k: usize) -> Result<Self> {
		Self::new((0..m).collect::<Vec<_>>(), m, k)
	}

	pub fn indices(&self) -> &[usize] {
		&self.indices
	}

	pub fn len(&self) -> usize {
		self.indices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	pub fn k(&self) -> usize {
		self.k
	}

	pub fn contains(&self, index: usize) -> bool {
		self.indices.contains(&index)
	}

	/// The erased columns, ascending.
	pub fn erased(&self) -> Vec<usize> {
		(0..self.k).filter(|&c| !self.contains(c)).collect()
	}
}

/// Decode coefficients for one available set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoder {
	field: Field,
	avail: AvailableSet,
	square: Matrix,
	matrix: Matrix,
}

impl Decoder {
	/// Invert the generator's available columns and scatter the inverse back
	/// into an `m x k` matrix. Column `idx` of the inverse lands at `avail[idx]`,
	/// every erased column stays zero.
	pub fn derive(generator: &Generator, avail: &AvailableSet) -> Result<Self> {
		let (m, k) = (generator.m(), generator.k());
		if avail.len() != m {
			return Err(Invalid::AvailableCount { have: avail.len(), want: m }.into());
		}
		if let Some(&index) = avail.indices().iter().find(|&&index| index >= k) {
			return Err(Invalid::IndexOutOfRange { index, k }.into());
		}

		let field = *generator.field();
		let square = generator.columns(avail).inverse(&field)?;

		let mut scatter = vec![None; k];
		for (idx, &col) in avail.indices().iter().enumerate() {
			scatter[col] = Some(idx);
		}
		let matrix = Matrix::from_fn(m, k, |r, c| scatter[c].map(|idx| square[(r, idx)]).unwrap_or(Element::ZERO));

		debug!("decoder for avail={:?}: {:?}", avail.indices(), matrix);
		Ok(Self { field, avail: avail.clone(), square, matrix })
	}

	pub fn avail(&self) -> &AvailableSet {
		&self.avail
	}

	/// The `m x k` decode matrix, zero outside the available columns.
	pub fn matrix(&self) -> &Matrix {
		&self.matrix
	}

	/// The `m x m` inverse of the generator's available columns.
	pub fn square(&self) -> &Matrix {
		&self.square
	}

	/// Recovery coefficients for the received symbols in avail order.
	///
	/// A codeword is `M^T d`, so the received symbols are `M[:, avail]^T d`
	/// and the data comes back through the transposed inverse.
	pub fn recovery_matrix(&self) -> Matrix {
		self.square.transpose()
	}

	/// Recover the data symbols from a `k` symbol codeword. Only the available
	/// positions are read, erased positions may hold anything.
	pub fn decode(&self, codeword: &[Element]) -> Result<Vec<Element>> {
		let k = self.matrix.cols();
		if codeword.len() != k {
			return Err(Error::DimensionMismatch { expected: (k, 1), found: (codeword.len(), 1) });
		}
		let received = self.avail.indices().iter().map(|&c| codeword[c]).collect::<Vec<_>>();
		self.recovery_matrix().mul_vec(&received, &self.field)
	}
}

/// Derive the decode matrix of `generator` for the received columns `avail`.
pub fn derive_decoder(generator: &Generator, avail: &[usize]) -> Result<Decoder> {
	let avail = AvailableSet::new(avail, generator.m(), generator.k())?;
	Decoder::derive(generator, &avail)
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;
	use cs_fec_tester::{all_available_sets, SMALL_RNG_SEED};
	use rand::rngs::SmallRng;
	use rand::{Rng, SeedableRng};

	#[test]
	fn available_set_validation() {
		assert_matches!(
			AvailableSet::new(vec![0, 0, 1], 3, 5),
			Err(Error::InvalidParameters(Invalid::DuplicateIndex(0)))
		);
		assert_matches!(
			AvailableSet::new(vec![0, 1], 3, 5),
			Err(Error::InvalidParameters(Invalid::AvailableCount { have: 2, want: 3 }))
		);
		assert_matches!(
			AvailableSet::new(vec![0, 1, 5], 3, 5),
			Err(Error::InvalidParameters(Invalid::IndexOutOfRange { index: 5, k: 5 }))
		);
		let avail = AvailableSet::new(vec![4, 0, 2], 3, 5).unwrap();
		assert_eq!(avail.indices(), &[4, 0, 2]);
		assert_eq!(avail.erased(), vec![1, 3]);
	}

	#[test]
	fn identity_for_systematic_columns() {
		let g = Generator::new(2, 3, Field::new(4, 0x13).unwrap()).unwrap();
		let d = derive_decoder(&g, &[0, 1]).unwrap();
		assert_eq!(d.matrix().to_rows(), vec![vec![1, 0, 0], vec![0, 1, 0]]);
	}

	#[test]
	fn scatter_follows_given_order() {
		let g = Generator::new(2, 3, Field::cyclic(4).unwrap()).unwrap();
		let d = derive_decoder(&g, &[1, 2]).unwrap();
		assert_eq!(d.square().to_rows(), vec![vec![2, 1], vec![1, 0]]);
		assert_eq!(d.matrix().to_rows(), vec![vec![0, 2, 1], vec![0, 1, 0]]);

		let swapped = derive_decoder(&g, &[2, 1]).unwrap();
		assert_eq!(swapped.square().to_rows(), vec![vec![1, 2], vec![0, 1]]);
		assert_eq!(swapped.matrix(), d.matrix());
	}

	#[test]
	fn every_subset_inverts_its_columns() {
		for (m, k, field) in [(2, 3, Field::new(4, 0x13).unwrap()), (3, 5, Field::cyclic(10).unwrap())] {
			let g = Generator::new(m, k, field).unwrap();
			for cols in all_available_sets(m, k) {
				let avail = AvailableSet::new(cols, m, k).unwrap();
				let d = Decoder::derive(&g, &avail).unwrap();
				let product = d.square().multiply(&g.columns(&avail), &field).unwrap();
				assert!(product.is_identity(), "avail={:?}", avail);
				for c in avail.erased() {
					assert!(d.matrix().iter_rows().all(|row| row[c].is_zero()));
				}
			}
		}
	}

	#[test]
	fn decode_ignores_erased_positions() {
		let field = Field::cyclic(10).unwrap();
		let g = Generator::new(3, 5, field).unwrap();
		let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
		let data = (0..3).map(|_| Element(rng.gen_range(0..1024))).collect::<Vec<_>>();
		let mut coded = g.encode(&data).unwrap();

		let d = derive_decoder(&g, &[4, 1, 3]).unwrap();
		for c in d.avail().erased() {
			coded[c] = Element(0x155);
		}
		assert_eq!(d.decode(&coded).unwrap(), data);
	}

	#[test]
	fn singular_selection_propagates() {
		// built without the MDS check
		let g = Generator::new(5, 9, Field::new(4, 0x13).unwrap()).unwrap();
		assert_matches!(derive_decoder(&g, &[1, 2, 5, 7, 8]), Err(Error::SingularMatrix { .. }));
		assert!(derive_decoder(&g, &[1, 2, 5, 7, 6]).is_ok());
	}

	#[test]
	fn rejected_avail_keeps_previous_results() {
		let g = Generator::new(3, 5, Field::cyclic(10).unwrap()).unwrap();
		let before = g.clone();
		let d = derive_decoder(&g, &[0, 3, 4]).unwrap();
		let kept = d.clone();

		assert_matches!(derive_decoder(&g, &[0, 3, 3]), Err(Error::InvalidParameters(Invalid::DuplicateIndex(3))));
		assert_matches!(derive_decoder(&g, &[0, 3]), Err(Error::InvalidParameters(Invalid::AvailableCount { .. })));
		assert_eq!(g, before);
		assert_eq!(d, kept);
	}

	#[test]
	fn foreign_avail_set_is_rejected() {
		let g = Generator::new(2, 3, Field::cyclic(4).unwrap()).unwrap();
		let wide = AvailableSet::new(vec![0, 4], 2, 5).unwrap();
		assert_matches!(
			Decoder::derive(&g, &wide),
			Err(Error::InvalidParameters(Invalid::IndexOutOfRange { index: 4, k: 3 }))
		);
	}
}
