use crate::field::Elt;

/// The specific defect behind an [`Error::InvalidParameters`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Invalid {
	#[error("Declared width L (= {0}) must be at least 3")]
	WidthTooSmall(usize),

	#[error("At least one data symbol is required")]
	NoDataSymbols,

	#[error("Generator x has order {order}, its powers repeat within {m} data symbols")]
	GeneratorOrder { order: usize, m: usize },

	#[error("Generator columns {0:?} are linearly dependent, the code is not MDS")]
	NotMds(Vec<usize>),

	#[error("Total symbol count k (= {k}) must exceed the data symbol count m (= {m})")]
	TooFewSymbols { m: usize, k: usize },

	#[error("Parity count {parity} exceeds the field width of {bits} bits")]
	TooManyParities { parity: usize, bits: u32 },

	#[error("Needs exactly {want} available indices, have {have}")]
	AvailableCount { have: usize, want: usize },

	#[error("Available index {0} is listed more than once")]
	DuplicateIndex(usize),

	#[error("Available index {index} is out of range for k = {k}")]
	IndexOutOfRange { index: usize, k: usize },

	#[error("Symbol {value:#x} does not fit into {width} bits")]
	SymbolTooWide { value: Elt, width: u32 },

	#[error("Symbol width {0} is not supported")]
	SymbolWidth(u32),

	#[error("Field width {0} is outside the supported range of 2..=24 bits")]
	FieldWidth(u32),

	#[error("Polynomial {prim:#x} does not have degree {bits}")]
	PolynomialDegree { prim: Elt, bits: u32 },

	#[error("Polynomial {0:#x} is reducible over GF(2)")]
	ReduciblePolynomial(Elt),

	#[error("Shift table needs at least one row and all rows of equal, non-zero length")]
	ShiftTableShape,

	#[error("Payload has {have} symbols, expected {want}")]
	PayloadLength { have: usize, want: usize },

	#[error("Cannot recover {erased} erased symbols, at most {max} are recoverable")]
	TooManyErasures { erased: usize, max: usize },
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Invalid parameters: {0}")]
	InvalidParameters(#[from] Invalid),

	#[error("Matrix is singular, no pivot found in column {column}")]
	SingularMatrix { column: usize },

	#[error("Inverse of zero requested")]
	DivisionByZero,

	#[error("Dimension mismatch, expected {expected:?} but found {found:?}")]
	DimensionMismatch { expected: (usize, usize), found: (usize, usize) },
}

pub type Result<T> = std::result::Result<T, Error>;
