//! Coefficients of a systematic MDS erasure code over GF(2^w), and their
//! realization with cyclic rotations and XOR.

pub mod errors;
pub use errors::*;

pub mod field;
pub use field::{Element, Elt, Field, DEFAULT_PRIM};

pub mod matrix;
pub use matrix::Matrix;

mod generator;
pub use generator::{build_generator, Generator};

mod decoder;
pub use decoder::{derive_decoder, AvailableSet, Decoder};

pub mod rotation;
pub use rotation::{apply_coefficient, apply_matrix, mask_to_rotations};

pub mod symbols;
pub use symbols::Symbols;

pub mod pipeline;
pub use pipeline::{run_pipeline, Pipeline, Stage, Trace};

mod params;
pub use params::CodeParams;

mod tables;
pub use tables::CoefficientTables;

pub mod reference;

mod shift;
pub use shift::ShiftTableCode;
