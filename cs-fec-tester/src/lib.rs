use itertools::Itertools;
use rand::prelude::*;
use std::fmt;
use std::result;

pub static SMALL_RNG_SEED: [u8; 32] = [
	0, 6, 0xFA, 0, 0x37, 3, 19, 89, 32, 032, 0x37, 0x77, 77, 0b11, 112, 52, 12, 40, 82, 34, 0, 0, 0, 1, 4, 4, 1, 4, 99,
	127, 121, 107,
];

/// Shared number of seeded trials for the round trip tests.
pub const TRIALS: usize = 100;

/// Pick `m` distinct columns out of `k`, ascending.
pub fn sample_available(rng: &mut impl Rng, m: usize, k: usize) -> Vec<usize> {
	let mut avail = rand::seq::index::sample(rng, k, m).into_vec();
	avail.sort_unstable();
	avail
}

/// `n` uniformly random words of `width` bits.
pub fn random_words(rng: &mut impl Rng, n: usize, width: u32) -> Vec<u32> {
	let max = u32::MAX >> (u32::BITS - width);
	(0..n).map(|_| rng.gen_range(0..=max)).collect()
}

/// Every `m`-subset of `0..k` in lexicographic order.
pub fn all_available_sets(m: usize, k: usize) -> impl Iterator<Item = Vec<usize>> {
	(0..k).combinations(m)
}

/// Assert the restored words equal the payload, word by word.
pub fn assert_restored(payload: &[u32], restored: &[u32], avail: &[usize]) {
	assert_eq!(payload.len(), restored.len(), "avail={:?}: length differs", avail);
	payload.iter().zip(restored).enumerate().for_each(|(i, (p, r))| {
		assert_eq!(p, r, "avail={:?}: symbol {} must match, {:#b} vs {:#b}", avail, i, p, r);
	});
}

/// Run `restore` once and check it hands back `payload`.
pub fn roundtrip<Restore, E>(restore: Restore, payload: &[u32], avail: &[usize]) -> result::Result<(), E>
where
	Restore: Fn(&[u32], &[usize]) -> result::Result<Vec<u32>, E>,
	E: fmt::Debug,
{
	let restored = restore(payload, avail)?;
	assert_restored(payload, &restored, avail);
	Ok(())
}

/// Seeded round trips with random `width` bit payloads of `m` words and
/// random `m`-of-`k` available sets.
pub fn roundtrip_trials<Restore, E>(
	restore: Restore,
	m: usize,
	k: usize,
	width: u32,
	trials: usize,
) -> result::Result<(), E>
where
	Restore: Fn(&[u32], &[usize]) -> result::Result<Vec<u32>, E>,
	E: fmt::Debug,
{
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	for _ in 0..trials {
		let avail = sample_available(&mut rng, m, k);
		let payload = random_words(&mut rng, m, width);
		roundtrip(&restore, &payload, &avail)?;
	}
	Ok(())
}
