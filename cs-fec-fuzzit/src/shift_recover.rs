use honggfuzz::fuzz;

use arbitrary::*;

#[derive(Debug, Clone)]
struct RecoverFeed {
	table: Vec<Vec<u32>>,
	received: Vec<Option<u32>>,
}

impl<'a> Arbitrary<'a> for RecoverFeed {
	fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
		let m = u.int_in_range(0_usize..=6)?;
		let parities = u.int_in_range(0_usize..=3)?;
		let table = (0..parities)
			.map(|_| (0..m).map(|_| u.int_in_range(0_u32..=31)).collect::<Result<Vec<_>>>())
			.collect::<Result<Vec<_>>>()?;
		let received = (0..u.int_in_range(0_usize..=m + parities + 1)?)
			.map(|_| u.arbitrary())
			.collect::<Result<Vec<Option<u32>>>>()?;
		Ok(Self { table, received })
	}
}

fn main() {
	loop {
		fuzz!(|feed: RecoverFeed| {
			// malformed input must come back as an error, never as a panic
			if let Ok(code) = csfec::ShiftTableCode::new(8, feed.table) {
				let _ = code.recover(&feed.received);
			}
		});
	}
}
