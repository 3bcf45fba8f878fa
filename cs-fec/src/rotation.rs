//! Field coefficients as XOR sums of cyclic rotations.
//!
//! A coefficient `a = sum a_i x^i` applied to an `L` bit word `s` yields
//! `XOR_i rotl(s, i)` over the set bits of `a`, i.e. the product `a * s` in
//! `GF(2)[x] / (x^L + 1)`. Over the even weight words produced by
//! [`crate::symbols::lift`] adding the all ones word to `a` does not change the
//! result, so a mask with more than half its bits set is complemented first.
//!
//! Once the reduction polynomial is `1 + x + ... + x^(L-1)` this agrees with
//! field multiplication, up to [`crate::symbols::fold_parity`]:
//! `drop(apply_coefficient(a, lift(b))) == fold(a * fold(b))`.

use crate::errors::*;
use crate::field::{Element, Elt};
use crate::matrix::Matrix;

/// All ones in the low `width` bits, saturating at [`Elt::BITS`].
#[inline(always)]
pub fn low_mask(width: u32) -> Elt {
	Elt::MAX.checked_shr(Elt::BITS.saturating_sub(width)).unwrap_or(0)
}

/// Widths accepted by the rotation functions, `1..=Elt::BITS`.
pub fn check_width(width: u32) -> Result<()> {
	if width == 0 || width > Elt::BITS {
		return Err(Invalid::SymbolWidth(width).into());
	}
	Ok(())
}

/// Rotate the low `width` bits of `x` left by `shift`, taken modulo `width`.
/// Bits above `width` are discarded.
///
/// Widths rejected by [`check_width`] do not panic: zero yields zero and
/// wider ones are clamped to [`Elt::BITS`].
#[inline]
pub fn rotate_left(x: Elt, shift: u32, width: u32) -> Elt {
	if width == 0 {
		return 0;
	}
	let width = width.min(Elt::BITS);
	let mask = low_mask(width);
	let shift = shift % width;
	let x = x & mask;
	if shift == 0 {
		return x;
	}
	((x << shift) & mask) | (x >> (width - shift))
}

#[inline]
pub fn rotate_right(x: Elt, shift: u32, width: u32) -> Elt {
	let width = width.min(Elt::BITS);
	if width == 0 {
		return 0;
	}
	rotate_left(x, width - shift % width, width)
}

/// Complement `mask` within `width` bits when more than `(width - 1) / 2`
/// of them are set.
#[inline]
pub fn minimize_mask(mask: Element, width: u32) -> Elt {
	let width = width.min(Elt::BITS);
	let mask = mask.0 & low_mask(width);
	if mask.count_ones() > width.saturating_sub(1) / 2 {
		mask ^ low_mask(width)
	} else {
		mask
	}
}

/// Rotate-left amounts realizing `mask`, ascending. Empty for a zero mask.
pub fn mask_to_rotations(mask: Element, width: u32) -> Vec<u32> {
	if mask.is_zero() {
		return Vec::new();
	}
	let mask = minimize_mask(mask, width);
	(0..width.min(Elt::BITS)).filter(|i| mask >> i & 1 == 1).collect()
}

/// Multiply `symbol` by the coefficient `mask` with rotations and XOR only.
pub fn apply_coefficient(mask: Element, symbol: Elt, width: u32) -> Elt {
	mask_to_rotations(mask, width)
		.into_iter()
		.fold(0, |acc, shift| acc ^ rotate_left(symbol, shift, width))
}

/// For each row of `coeffs`, the XOR of its coefficients applied to the
/// matching `symbols`. Zero coefficients are skipped.
pub fn apply_matrix(coeffs: &Matrix, symbols: &[Elt], width: u32) -> Result<Vec<Elt>> {
	check_width(width)?;
	if symbols.len() != coeffs.cols() {
		return Err(Error::DimensionMismatch { expected: (coeffs.cols(), 1), found: (symbols.len(), 1) });
	}
	Ok(coeffs
		.iter_rows()
		.map(|row| {
			row.iter()
				.zip(symbols)
				.filter(|(c, _)| !c.is_zero())
				.fold(0, |acc, (&c, &s)| acc ^ apply_coefficient(c, s, width))
		})
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::field::Field;
	use crate::symbols::{drop_parity, fold_parity, lift};
	use cs_fec_tester::SMALL_RNG_SEED;
	use rand::rngs::SmallRng;
	use rand::{Rng, SeedableRng};

	#[test]
	fn rotations() {
		assert_eq!(rotate_left(0b10010, 1, 5), 0b00101);
		assert_eq!(rotate_left(0b10010, 6, 5), 0b00101);
		assert_eq!(rotate_left(0b111_10010, 0, 5), 0b10010);
		assert_eq!(rotate_right(0xA, 1, 4), 0x5);
		assert_eq!(rotate_right(0x5, 2, 4), 0x5);
		assert_eq!(rotate_right(rotate_left(0x2ab, 7, 11), 7, 11), 0x2ab);
		assert_eq!(rotate_left(0xdead_beef, 4, 32), 0xeadb_eefd);
	}

	#[test]
	fn complement_on_majority() {
		assert_eq!(mask_to_rotations(Element(0b0111), 5), vec![3, 4]);
		assert_eq!(mask_to_rotations(Element(0b0011), 5), vec![0, 1]);
		assert_eq!(mask_to_rotations(Element(0b1000), 5), vec![3]);
		assert_eq!(mask_to_rotations(Element::ZERO, 5), Vec::<u32>::new());
		assert_eq!(apply_coefficient(Element(0b0111), 1, 5), 24);
		assert_eq!(apply_coefficient(Element::ZERO, 0b10110, 5), 0);
		assert_eq!(apply_coefficient(Element::ONE, 0b10110, 5), 0b10110);
	}

	#[test]
	fn matrix_width_checked() {
		let coeffs = Matrix::from_rows(&[[1, 2], [0, 1]]).unwrap();
		assert_eq!(apply_matrix(&coeffs, &[0b00011, 0b00101], 5).unwrap(), vec![0b00011 ^ 0b01010, 0b00101]);
		assert!(matches!(apply_matrix(&coeffs, &[1], 5), Err(Error::DimensionMismatch { .. })));
		for width in [0, 33, u32::MAX] {
			assert!(matches!(
				apply_matrix(&Matrix::identity(1), &[1], width),
				Err(Error::InvalidParameters(Invalid::SymbolWidth(w))) if w == width
			));
		}
	}

	#[test]
	fn degenerate_widths_do_not_panic() {
		assert_eq!(low_mask(0), 0);
		assert_eq!(low_mask(32), u32::MAX);
		assert_eq!(low_mask(40), u32::MAX);
		assert_eq!(rotate_left(0b101, 3, 0), 0);
		assert_eq!(rotate_right(0b101, 3, 0), 0);
		assert_eq!(rotate_left(0x8000_0001, 1, 33), rotate_left(0x8000_0001, 1, 32));
		assert_eq!(rotate_right(0x8000_0001, 1, 64), 0xc000_0000);
		assert_eq!(apply_coefficient(Element(3), 1, 0), 0);
		assert_eq!(mask_to_rotations(Element(3), 0), Vec::<u32>::new());
		assert!(check_width(1).is_ok() && check_width(32).is_ok());
	}

	fn agrees_with_field(field: &Field, a: Element, b: Element) -> bool {
		let w = field.bits();
		let lifted = lift(&[b.0], w)[0];
		let rotated = drop_parity(&[apply_coefficient(a, lifted, w + 1)], w + 1)[0];
		rotated == fold_parity(field.multiply(a, Element(fold_parity(b.0, w))).0, w)
	}

	#[test]
	fn rotations_multiply_exhaustive() {
		for w in [2, 4] {
			let field = Field::cyclic(w).unwrap();
			for a in field.elements() {
				for b in field.elements() {
					assert!(agrees_with_field(&field, a, b), "w={} a={} b={}", w, a, b);
				}
			}
		}
	}

	#[test]
	fn rotations_multiply_sampled() {
		let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
		for w in [10, 12] {
			let field = Field::cyclic(w).unwrap();
			for _ in 0..10_000 {
				let a = Element(rng.gen_range(0..=field.mask()));
				let b = Element(rng.gen_range(0..=field.mask()));
				assert!(agrees_with_field(&field, a, b), "w={} a={} b={}", w, a, b);
			}
		}
	}

	#[test]
	fn other_polynomials_diverge() {
		let field = Field::new(4, 0x13).unwrap();
		let diverging = field.elements().flat_map(|a| field.elements().map(move |b| (a, b)));
		assert!(diverging.filter(|&(a, b)| !agrees_with_field(&field, a, b)).count() > 0);
	}
}
