use honggfuzz::fuzz;

use arbitrary::*;
use csfec::symbols::{drop_parity, fold_parity, lift};
use csfec::{apply_coefficient, Element, Field};

#[derive(Debug, Clone, Copy, Arbitrary)]
struct RotationFeed {
	wide: bool,
	a: u32,
	b: u32,
}

fn main() {
	let fields = [Field::cyclic(10).unwrap(), Field::cyclic(18).unwrap()];
	loop {
		fuzz!(|feed: RotationFeed| {
			let field = fields[feed.wide as usize];
			let w = field.bits();
			let a = Element(feed.a & field.mask());
			let b = feed.b & field.mask();

			let rotated = drop_parity(&[apply_coefficient(a, lift(&[b], w)[0], w + 1)], w + 1)[0];
			let product = field.multiply(a, Element(fold_parity(b, w)));
			assert_eq!(rotated, fold_parity(product.0, w));
		});
	}
}
