//! Decode then encode through the cyclic rotation domain.
//!
//! Payload words of `w = L - 1` bits are lifted to `L` bits, multiplied by the
//! inverse of the available generator columns and then by those columns again,
//! all with rotations and XOR, and finally trimmed back to `w` bits. The result
//! is the payload for every valid available set.

use std::fmt;

use log::trace;

use crate::decoder::{AvailableSet, Decoder};
use crate::errors::*;
use crate::field::{Element, Elt, Field};
use crate::generator::Generator;
use crate::matrix::Matrix;
use crate::rotation::apply_matrix;
use crate::symbols::{fold_parity, Symbols};

#[cfg(test)]
mod tests;

/// Smallest supported cyclic width `L`.
pub const MIN_WIDTH: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	Input,
	Lift,
	Decode,
	Encode,
	Drop,
}

impl Stage {
	pub const ALL: [Stage; 5] = [Stage::Input, Stage::Lift, Stage::Decode, Stage::Encode, Stage::Drop];

	pub fn name(self) -> &'static str {
		match self {
			Stage::Input => "input",
			Stage::Lift => "lift_to_cyclic_domain",
			Stage::Decode => "fec_decode",
			Stage::Encode => "fec_encode",
			Stage::Drop => "trim_zero_padding",
		}
	}
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Snapshots of every stage of one pipeline run, in execution order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
	stages: Vec<(Stage, Symbols)>,
}

impl Trace {
	fn record(&mut self, stage: Stage, symbols: Symbols) {
		trace!("[{}] width={} {:?}", stage, symbols.width(), symbols.words());
		self.stages.push((stage, symbols));
	}

	pub fn stages(&self) -> &[(Stage, Symbols)] {
		&self.stages
	}

	pub fn get(&self, stage: Stage) -> Option<&Symbols> {
		self.stages.iter().find(|(s, _)| *s == stage).map(|(_, symbols)| symbols)
	}

	/// The restored payload.
	pub fn output(&self) -> Option<&[Elt]> {
		self.get(Stage::Drop).map(Symbols::words)
	}
}

impl fmt::Display for Trace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, (stage, symbols)) in self.stages.iter().enumerate() {
			if i > 0 {
				writeln!(f)?;
				writeln!(f)?;
			}
			writeln!(f, "[{}]", stage)?;
			write!(f, "{}", symbols)?;
		}
		Ok(())
	}
}

/// An `(m, k)` code over `GF(2^(L-1))` reduced by `1 + x + ... + x^(L-1)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pipeline {
	generator: Generator,
}

impl Pipeline {
	/// Only MDS codes are accepted, so every available set decodes.
	pub fn new(m: usize, k: usize, l: usize) -> Result<Self> {
		if l < MIN_WIDTH {
			return Err(Invalid::WidthTooSmall(l).into());
		}
		let bits = u32::try_from(l - 1).map_err(|_| Invalid::FieldWidth(u32::MAX))?;
		let generator = Generator::new(m, k, Field::cyclic(bits)?)?;
		generator.verify_mds()?;
		Ok(Self { generator })
	}

	pub fn generator(&self) -> &Generator {
		&self.generator
	}

	pub fn field(&self) -> &Field {
		self.generator.field()
	}

	/// Width `L` of the cyclic domain.
	pub fn width(&self) -> u32 {
		self.field().bits() + 1
	}

	pub fn available(&self, avail: &[usize]) -> Result<AvailableSet> {
		AvailableSet::new(avail, self.generator.m(), self.generator.k())
	}

	/// Decode and encode coefficients for `avail`: the inverse of the available
	/// generator columns and the columns themselves, both `m x m`.
	pub fn coefficients(&self, avail: &AvailableSet) -> Result<(Matrix, Matrix)> {
		let decoder = Decoder::derive(&self.generator, avail)?;
		Ok((decoder.square().clone(), self.generator.columns(avail)))
	}

	fn payload(&self, payload: &[Elt]) -> Result<Symbols> {
		let m = self.generator.m();
		if payload.len() != m {
			return Err(Invalid::PayloadLength { have: payload.len(), want: m }.into());
		}
		Symbols::new(self.field().bits(), payload)
	}

	pub fn run(&self, payload: &[Elt], avail: &AvailableSet) -> Result<Vec<Elt>> {
		let trace = self.run_traced(payload, avail)?;
		Ok(trace.output().map(<[Elt]>::to_vec).unwrap_or_default())
	}

	pub fn run_traced(&self, payload: &[Elt], avail: &AvailableSet) -> Result<Trace> {
		let input = self.payload(payload)?;
		let (decode, encode) = self.coefficients(avail)?;
		let l = self.width();

		let mut trace = Trace { stages: Vec::with_capacity(Stage::ALL.len()) };
		trace.record(Stage::Input, input.clone());

		let lifted = input.lift()?;
		trace.record(Stage::Lift, lifted.clone());

		let decoded = Symbols::new(l, apply_matrix(&decode, lifted.words(), l)?)?;
		trace.record(Stage::Decode, decoded.clone());

		let encoded = Symbols::new(l, apply_matrix(&encode, decoded.words(), l)?)?;
		trace.record(Stage::Encode, encoded.clone());

		trace.record(Stage::Drop, encoded.drop_parity()?);
		Ok(trace)
	}

	/// The same decode and encode, computed over the field.
	pub fn run_direct(&self, payload: &[Elt], avail: &AvailableSet) -> Result<Vec<Elt>> {
		let input = self.payload(payload)?.into_words().into_iter().map(Element).collect::<Vec<_>>();
		let (decode, encode) = self.coefficients(avail)?;
		let field = self.field();
		let decoded = decode.mul_vec(&input, field)?;
		Ok(encode.mul_vec(&decoded, field)?.into_iter().map(Elt::from).collect())
	}

	/// Apply field coefficients to field elements with rotations only.
	///
	/// Words are folded before the lift and after the drop, which turns the
	/// rotation result into the plain field product.
	fn through_rotations(&self, coeffs: &Matrix, words: &[Elt]) -> Result<Vec<Elt>> {
		let w = self.field().bits();
		let folded = words.iter().map(|&x| fold_parity(x, w)).collect::<Vec<_>>();
		let lifted = Symbols::new(w, folded)?.lift()?;
		let out = Symbols::new(self.width(), apply_matrix(coeffs, lifted.words(), self.width())?)?.drop_parity()?;
		Ok(out.words().iter().map(|&x| fold_parity(x, w)).collect())
	}

	/// All `k` coded symbols of `data`, computed with rotations.
	pub fn encode_rotations(&self, data: &[Elt]) -> Result<Vec<Elt>> {
		let data = self.payload(data)?;
		self.through_rotations(&self.generator.encode_matrix(), data.words())
	}

	/// Recover the data from the symbols received at `avail`, in avail order.
	pub fn decode_rotations(&self, received: &[Elt], avail: &AvailableSet) -> Result<Vec<Elt>> {
		let received = self.payload(received)?;
		let decoder = Decoder::derive(&self.generator, avail)?;
		self.through_rotations(&decoder.recovery_matrix(), received.words())
	}

	/// Encode `data` into `k` symbols, keep those at `avail` and recover the
	/// data from them through the rotation domain.
	pub fn transmit(&self, data: &[Elt], avail: &AvailableSet) -> Result<Vec<Elt>> {
		let data = self.payload(data)?.into_words().into_iter().map(Element).collect::<Vec<_>>();
		let coded = self.generator.encode(&data)?;
		let received = avail
			.indices()
			.iter()
			.map(|&index| coded.get(index).map(|x| x.0).ok_or(Invalid::IndexOutOfRange { index, k: coded.len() }))
			.collect::<std::result::Result<Vec<_>, _>>()?;
		self.decode_rotations(&received, avail)
	}
}

/// Lift `payload`, run it through the decode and encode coefficients of
/// `avail` and drop it again.
pub fn run_pipeline(payload: &[Elt], avail: &[usize], m: usize, k: usize, l: usize) -> Result<Vec<Elt>> {
	let pipeline = Pipeline::new(m, k, l)?;
	let avail = pipeline.available(avail)?;
	pipeline.run(payload, &avail)
}
