use honggfuzz::fuzz;

use arbitrary::*;
use rand::prelude::*;

/// `(m, k, L)` with a cyclic field of width `L - 1`.
const CODES: [(usize, usize, usize); 5] = [(2, 3, 5), (3, 5, 5), (4, 8, 5), (3, 5, 11), (5, 9, 11)];

#[derive(Debug, Clone)]
struct RoundtripFeed {
	code: (usize, usize, usize),
	avail: Vec<usize>,
	payload: Vec<u32>,
}

impl<'a> Arbitrary<'a> for RoundtripFeed {
	fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
		let code @ (m, k, l) = *u.choose(&CODES)?;
		let mut rng = rand_chacha::ChaCha8Rng::from_seed(u.arbitrary()?);
		let avail = rand::seq::index::sample(&mut rng, k, m).into_vec();
		let payload = (0..m).map(|_| Ok(u.arbitrary::<u32>()? & ((1 << (l - 1)) - 1))).collect::<Result<Vec<_>>>()?;
		Ok(Self { code, avail, payload })
	}
}

fn main() {
	loop {
		fuzz!(|feed: RoundtripFeed| {
			let (m, k, l) = feed.code;
			let restored = csfec::run_pipeline(&feed.payload, &feed.avail, m, k, l).unwrap();
			tester::assert_restored(&feed.payload, &restored, &feed.avail);

			let pipeline = csfec::Pipeline::new(m, k, l).unwrap();
			let avail = pipeline.available(&feed.avail).unwrap();
			assert_eq!(pipeline.transmit(&feed.payload, &avail).unwrap(), feed.payload);
		});
	}
}
