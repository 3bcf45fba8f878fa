//! Encode and decode coefficient tables for rotate/XOR hardware.

use std::fmt;
use std::path::Path;

use log::{debug, warn};

use crate::decoder::Decoder;
use crate::errors::*;
use crate::matrix::Matrix;
use crate::params::CodeParams;
use crate::rotation::low_mask;

/// `ENC` (`k x m`) and `DEC` (`m x k`) for one parameter set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoefficientTables {
	params: CodeParams,
	bits: u32,
	prim: u32,
	enc: Matrix,
	dec: Matrix,
}

impl CoefficientTables {
	pub fn derive(params: &CodeParams) -> Result<Self> {
		let generator = params.generator()?;
		generator.verify_mds()?;
		let field = generator.field();
		if !field.is_cyclic() {
			warn!(
				"polynomial {:#x} is not 1 + x + .. + x^{}, rotate/XOR hardware will not reproduce these coefficients",
				field.prim(),
				field.bits()
			);
		}
		let decoder = Decoder::derive(&generator, &params.available()?)?;
		debug!("tables for L={} M={} K={} avail={:?}", params.l, params.m, params.k, params.avail);
		Ok(Self {
			params: params.clone(),
			bits: field.bits(),
			prim: field.prim(),
			enc: generator.encode_matrix(),
			dec: decoder.matrix().clone(),
		})
	}

	pub fn params(&self) -> &CodeParams {
		&self.params
	}

	pub fn enc(&self) -> &Matrix {
		&self.enc
	}

	pub fn dec(&self) -> &Matrix {
		&self.dec
	}

	/// `cs_coeff_L11_M3_K5_avail_0_1_2.svh` style name.
	pub fn file_name(&self) -> String {
		let avail = self.params.avail.iter().map(ToString::to_string).collect::<Vec<_>>().join("_");
		format!("cs_coeff_L{}_M{}_K{}_avail_{}.svh", self.params.l, self.params.m, self.params.k, avail)
	}

	/// Write the rendered tables, creating missing parent directories.
	pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			fs_err::create_dir_all(parent)?;
		}
		fs_err::write(path, self.to_string())
	}

	fn write_table(&self, f: &mut fmt::Formatter<'_>, decl: &str, table: &Matrix) -> fmt::Result {
		let l = self.params.l;
		let mask = low_mask(self.bits);
		writeln!(f, "localparam logic [CS_L-1:0] {} = '{{", decl)?;
		for (r, row) in table.iter_rows().enumerate() {
			let values =
				row.iter().map(|x| format!("{}'b{:0l$b}", l, x.0 & mask, l = l)).collect::<Vec<_>>().join(", ");
			let comma = if r + 1 < table.rows() { "," } else { "" };
			writeln!(f, "  {{ {} }}{}", values, comma)?;
		}
		writeln!(f, "}};")
	}
}

impl fmt::Display for CoefficientTables {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let CodeParams { l, m, k, ref avail, .. } = self.params;
		writeln!(f, "// Auto-generated by cs-fec (L={}, M={}, K={}, avail={:?}, prim={:#x})", l, m, k, avail, self.prim)?;
		writeln!(f, "localparam int CS_L = {};", l)?;
		writeln!(f, "localparam int CS_M = {};", m)?;
		writeln!(f, "localparam int CS_K = {};", k)?;
		writeln!(f)?;
		self.write_table(f, "CS_ENC_COEFF [CS_K][CS_M]", &self.enc)?;
		writeln!(f)?;
		self.write_table(f, "CS_DEC_COEFF [CS_M][CS_K]", &self.dec)
	}
}
