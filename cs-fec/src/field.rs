//! Arithmetic in GF(2^w) for a configurable reduction polynomial.
//!
//! Elements are polynomials over GF(2) of degree below `w`, stored as the
//! bit pattern of their coefficients. Addition is XOR, multiplication is a
//! carryless shift-and-add reduced by the field polynomial.

use derive_more::{BitXor, BitXorAssign};

use crate::errors::*;

/// Storage for a single element, wide enough for every supported field.
pub type Elt = u32;
/// Intermediate width used for polynomial remainders.
pub type Wide = u64;

pub const MIN_FIELD_BITS: u32 = 2;
pub const MAX_FIELD_BITS: u32 = 24;

/// `x^10 + x^3 + 1`, used for `w = 10` when no polynomial is requested.
pub const DEFAULT_PRIM: Elt = 0x409;

/// The generator element `x` of the Vandermonde block.
pub const GENERATOR: Element = Element(2);

/// Additive via XOR form of a field element
#[repr(transparent)]
#[derive(Clone, Copy, Default, BitXor, BitXorAssign, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(pub Elt);

impl Element {
	pub const ZERO: Element = Element(0);
	pub const ONE: Element = Element(1);

	#[inline(always)]
	pub fn is_zero(self) -> bool {
		self.0 == 0
	}

	#[inline(always)]
	pub fn to_wide(self) -> Wide {
		self.0 as Wide
	}

	#[inline(always)]
	pub fn count_ones(self) -> u32 {
		self.0.count_ones()
	}
}

impl From<Elt> for Element {
	fn from(x: Elt) -> Self {
		Element(x)
	}
}

impl From<Element> for Elt {
	fn from(x: Element) -> Self {
		x.0
	}
}

impl std::fmt::Display for Element {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::fmt::Debug for Element {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// The field GF(2^w) defined by an irreducible polynomial of degree `w`.
///
/// A `Field` is a plain value, every arithmetic operation takes it explicitly
/// so there is no global field context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Field {
	bits: u32,
	/// Reduction polynomial including its leading `x^bits` term.
	prim: Elt,
}

impl Field {
	/// Create the field GF(2^bits) reduced by `prim`.
	///
	/// `prim` may be given with or without its leading `x^bits` term. It must
	/// be irreducible, otherwise inversion by Fermat's little theorem is void.
	pub fn new(bits: u32, prim: Elt) -> Result<Self> {
		if !(MIN_FIELD_BITS..=MAX_FIELD_BITS).contains(&bits) {
			return Err(Invalid::FieldWidth(bits).into());
		}
		let prim = match prim >> bits {
			0 => prim | (1 << bits),
			1 => prim,
			_ => return Err(Invalid::PolynomialDegree { prim, bits }.into()),
		};
		let field = Self { bits, prim };
		if !field.is_irreducible() {
			return Err(Invalid::ReduciblePolynomial(prim).into());
		}
		Ok(field)
	}

	/// The field reduced by `1 + x + ... + x^bits`.
	///
	/// This is the only polynomial for which cyclic rotations of a
	/// `bits + 1` wide word realize multiplication, see [`crate::rotation`].
	/// It is irreducible iff `bits + 1` is prime and 2 is primitive modulo it.
	pub fn cyclic(bits: u32) -> Result<Self> {
		if !(MIN_FIELD_BITS..=MAX_FIELD_BITS).contains(&bits) {
			return Err(Invalid::FieldWidth(bits).into());
		}
		Self::new(bits, Self::all_ones(bits))
	}

	#[inline(always)]
	fn all_ones(bits: u32) -> Elt {
		(1 << (bits + 1)) - 1
	}

	#[inline(always)]
	pub fn bits(&self) -> u32 {
		self.bits
	}

	#[inline(always)]
	pub fn prim(&self) -> Elt {
		self.prim
	}

	/// All ones in the `bits` low positions.
	#[inline(always)]
	pub fn mask(&self) -> Elt {
		(1 << self.bits) - 1
	}

	/// Number of elements, `2^bits`.
	#[inline(always)]
	pub fn order(&self) -> usize {
		1_usize << self.bits
	}

	pub fn is_cyclic(&self) -> bool {
		self.prim == Self::all_ones(self.bits)
	}

	pub fn contains(&self, a: Element) -> bool {
		a.0 <= self.mask()
	}

	pub fn elements(&self) -> impl Iterator<Item = Element> {
		(0..=self.mask()).map(Element)
	}

	/// Carryless product of `a` and `b`, reducing whenever the shifted
	/// operand leaves the field.
	pub fn multiply(&self, a: Element, b: Element) -> Element {
		debug_assert!(self.contains(a) && self.contains(b));
		let mask = self.mask();
		let tail = self.prim & mask;
		let top = 1 << (self.bits - 1);

		let mut a = a.0 & mask;
		let mut b = b.0 & mask;
		let mut acc = 0;
		while b != 0 {
			if b & 1 != 0 {
				acc ^= a;
			}
			b >>= 1;
			let carry = a & top;
			a = (a << 1) & mask;
			if carry != 0 {
				a ^= tail;
			}
		}
		Element(acc)
	}

	/// `a^e` by repeated squaring, `a^0 = 1`.
	pub fn power(&self, a: Element, mut e: u64) -> Element {
		let mut base = a;
		let mut acc = Element::ONE;
		while e > 0 {
			if e & 1 != 0 {
				acc = self.multiply(acc, base);
			}
			base = self.multiply(base, base);
			e >>= 1;
		}
		acc
	}

	/// Multiplicative inverse, `a^(2^w - 2)`.
	pub fn inverse(&self, a: Element) -> Result<Element> {
		if a.is_zero() {
			return Err(Error::DivisionByZero);
		}
		Ok(self.power(a, (self.order() - 2) as u64))
	}

	/// Rabin's test: `x^(2^n) = x mod p` and `gcd(x^(2^(n/q)) - x, p) = 1`
	/// for every prime `q` dividing `n`.
	fn is_irreducible(&self) -> bool {
		let x = GENERATOR;
		let frobenius = |times: u32| (0..times).fold(x, |acc, _| self.multiply(acc, acc));

		if frobenius(self.bits) != x {
			return false;
		}
		prime_divisors(self.bits)
			.into_iter()
			.all(|q| poly_gcd(self.prim as Wide, (frobenius(self.bits / q) ^ x).to_wide()) == 1)
	}
}

fn prime_divisors(mut n: u32) -> Vec<u32> {
	let mut primes = Vec::new();
	let mut q = 2;
	while q * q <= n {
		if n % q == 0 {
			primes.push(q);
			while n % q == 0 {
				n /= q;
			}
		}
		q += 1;
	}
	if n > 1 {
		primes.push(n);
	}
	primes
}

#[inline(always)]
fn degree(p: Wide) -> u32 {
	Wide::BITS - 1 - p.leading_zeros()
}

fn poly_rem(mut a: Wide, b: Wide) -> Wide {
	let db = degree(b);
	while a != 0 && degree(a) >= db {
		a ^= b << (degree(a) - db);
	}
	a
}

fn poly_gcd(mut a: Wide, mut b: Wide) -> Wide {
	while b != 0 {
		a = poly_rem(a, b);
		std::mem::swap(&mut a, &mut b);
	}
	a
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;

	fn f4() -> Field {
		Field::new(4, 0x13).unwrap()
	}

	#[test]
	fn known_products() {
		let f = f4();
		assert_eq!(f.multiply(Element(2), Element(8)), Element(3));
		assert_eq!(f.multiply(Element(8), Element(8)), Element(12));
		assert_eq!(f.multiply(Element(7), Element(9)), Element(10));
		assert_eq!(f.multiply(Element(0), Element(9)), Element::ZERO);
		assert_eq!(f.power(Element(2), 4), Element(3));
		assert_eq!(f.power(Element(2), 15), Element::ONE);
		assert_eq!(f.power(Element(7), 0), Element::ONE);
		assert_eq!(f.inverse(Element(2)), Ok(Element(9)));
	}

	#[test]
	fn tail_and_full_polynomial_agree() {
		assert_eq!(Field::new(4, 0x3), Field::new(4, 0x13));
		assert_eq!(Field::new(10, DEFAULT_PRIM).unwrap().prim(), 0x409);
	}

	#[test]
	fn exhaustive_w4_laws() {
		for f in [f4(), Field::cyclic(4).unwrap()] {
			for a in f.elements() {
				assert_eq!(f.multiply(a, Element::ONE), a);
				for b in f.elements() {
					let ab = f.multiply(a, b);
					assert!(f.contains(ab));
					assert_eq!(ab, f.multiply(b, a));
					for c in f.elements() {
						assert_eq!(f.multiply(ab, c), f.multiply(a, f.multiply(b, c)));
						// distributes over XOR
						assert_eq!(f.multiply(a, b ^ c), ab ^ f.multiply(a, c));
					}
				}
			}
		}
	}

	#[test]
	fn inverse_exhaustive() {
		for f in [f4(), Field::cyclic(4).unwrap(), Field::cyclic(10).unwrap(), Field::new(10, DEFAULT_PRIM).unwrap()] {
			for a in f.elements().skip(1) {
				let inv = f.inverse(a).unwrap();
				assert_eq!(f.multiply(a, inv), Element::ONE, "{:?} a={}", f, a);
			}
		}
	}

	#[test]
	fn inverse_of_zero() {
		assert_matches!(f4().inverse(Element::ZERO), Err(Error::DivisionByZero));
	}

	#[test]
	fn cyclic_fields_exist_for_primitive_two() {
		// L = w + 1 must be prime with 2 primitive mod L
		for w in [2, 4, 10, 12, 18] {
			let f = Field::cyclic(w).unwrap();
			assert!(f.is_cyclic());
		}
		for w in [3, 5, 6, 7, 8, 9, 11] {
			assert_matches!(
				Field::cyclic(w),
				Err(Error::InvalidParameters(Invalid::ReduciblePolynomial(_)))
			);
		}
	}

	#[test]
	fn rejects_bad_polynomials() {
		assert_matches!(Field::new(4, 0x15), Err(Error::InvalidParameters(Invalid::ReduciblePolynomial(0x15))));
		assert_matches!(
			Field::new(4, 0x409),
			Err(Error::InvalidParameters(Invalid::PolynomialDegree { prim: 0x409, bits: 4 }))
		);
		assert_matches!(Field::new(1, 0x3), Err(Error::InvalidParameters(Invalid::FieldWidth(1))));
		assert_matches!(Field::new(25, 0x3), Err(Error::InvalidParameters(Invalid::FieldWidth(25))));
		assert!(Field::new(8, 0x11d).is_ok());
		assert!(!Field::new(8, 0x11d).unwrap().is_cyclic());
	}

	#[test]
	fn polynomial_gcd() {
		// (x + 1)(x^2 + x + 1) and (x + 1)^2
		assert_eq!(poly_gcd(0b1001, 0b101), 0b11);
		assert_eq!(poly_gcd(0b111, 0b10), 1);
		assert_eq!(prime_divisors(12), vec![2, 3]);
		assert_eq!(prime_divisors(13), vec![13]);
	}

	quickcheck::quickcheck! {
		fn w10_commutes(a: u16, b: u16) -> bool {
			let f = Field::cyclic(10).unwrap();
			let (a, b) = (Element(a as Elt & f.mask()), Element(b as Elt & f.mask()));
			f.multiply(a, b) == f.multiply(b, a)
		}

		fn w10_associates(a: u16, b: u16, c: u16) -> bool {
			let f = Field::new(10, DEFAULT_PRIM).unwrap();
			let m = f.mask();
			let (a, b, c) = (Element(a as Elt & m), Element(b as Elt & m), Element(c as Elt & m));
			f.multiply(f.multiply(a, b), c) == f.multiply(a, f.multiply(b, c))
		}

		fn w10_power_adds_exponents(a: u16, e1: u8, e2: u8) -> bool {
			let f = Field::cyclic(10).unwrap();
			let a = Element(a as Elt & f.mask());
			f.power(a, e1 as u64 + e2 as u64) == f.multiply(f.power(a, e1 as u64), f.power(a, e2 as u64))
		}
	}
}
