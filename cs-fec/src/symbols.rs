use std::fmt;

use crate::errors::*;
use crate::field::Elt;
use crate::rotation::low_mask;

/// Widest symbol that can still be lifted into an [`Elt`].
pub const MAX_SYMBOL_BITS: u32 = Elt::BITS - 1;

/// Even/odd parity of the set bits.
#[inline(always)]
pub fn parity(word: Elt) -> Elt {
	word.count_ones() & 1
}

/// Append the parity of each `width` bit word as bit `width`.
/// Bits at and above `width` are ignored, from [`MAX_SYMBOL_BITS`] on there
/// is no room left for the parity.
pub fn lift(words: &[Elt], width: u32) -> Vec<Elt> {
	let mask = low_mask(width);
	words.iter().map(|&w| parity(w & mask).checked_shl(width).unwrap_or(0) | (w & mask)).collect()
}

/// Strip bit `width - 1` of each `width` bit word.
pub fn drop_parity(words: &[Elt], width: u32) -> Vec<Elt> {
	let mask = low_mask(width.saturating_sub(1));
	words.iter().map(|&w| w & mask).collect()
}

/// Complement an odd `width` bit word, leave an even one alone.
///
/// The dropped word `s` of a lifted codeword stands for the field element
/// `fold_parity(s)`. The map is linear and its own inverse.
#[inline]
pub fn fold_parity(word: Elt, width: u32) -> Elt {
	let mask = low_mask(width);
	let word = word & mask;
	if parity(word) == 1 {
		word ^ mask
	} else {
		word
	}
}

/// A batch of symbols of one common bit width.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Symbols {
	width: u32,
	words: Vec<Elt>,
}

impl Symbols {
	pub fn new(width: u32, words: impl Into<Vec<Elt>>) -> Result<Self> {
		if width == 0 || width > MAX_SYMBOL_BITS {
			return Err(Invalid::SymbolWidth(width).into());
		}
		let words = words.into();
		let mask = low_mask(width);
		if let Some(&value) = words.iter().find(|&&w| w & !mask != 0) {
			return Err(Invalid::SymbolTooWide { value, width }.into());
		}
		Ok(Self { width, words })
	}

	#[inline(always)]
	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn words(&self) -> &[Elt] {
		&self.words
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn into_words(self) -> Vec<Elt> {
		self.words
	}

	/// Into the `width + 1` bit cyclic domain.
	pub fn lift(&self) -> Result<Symbols> {
		if self.width >= MAX_SYMBOL_BITS {
			return Err(Invalid::SymbolWidth(self.width + 1).into());
		}
		Ok(Symbols { width: self.width + 1, words: lift(&self.words, self.width) })
	}

	/// Back to `width - 1` bits.
	pub fn drop_parity(&self) -> Result<Symbols> {
		if self.width < 2 {
			return Err(Invalid::SymbolWidth(self.width - 1).into());
		}
		Ok(Symbols { width: self.width - 1, words: drop_parity(&self.words, self.width) })
	}

	pub fn fold(&self) -> Symbols {
		Symbols { width: self.width, words: self.words.iter().map(|&w| fold_parity(w, self.width)).collect() }
	}
}

/// One `s{i}: <bits>` line per word, most significant bit first.
impl fmt::Display for Symbols {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, w) in self.words.iter().enumerate() {
			if i > 0 {
				writeln!(f)?;
			}
			write!(f, "s{}: {:0width$b}", i, w, width = self.width as usize)?;
		}
		Ok(())
	}
}

impl fmt::Debug for Symbols {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Symbols<{}>{:?}", self.width, self.words)
	}
}
