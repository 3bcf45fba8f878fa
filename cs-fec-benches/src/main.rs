use color_eyre::Result;
use cs_fec::{CodeParams, CoefficientTables, Pipeline};
use cs_fec_tester::{random_words, roundtrip_trials, sample_available, SMALL_RNG_SEED, TRIALS};
use rand::{rngs::SmallRng, SeedableRng};

const L: usize = 11;
const M: usize = 3;
const K: usize = 5;

fn main() -> Result<()> {
	color_eyre::install()?;
	env_logger::init();

	roundtrip_trials(|payload, avail| cs_fec::run_pipeline(payload, avail, M, K, L), M, K, L as u32 - 1, TRIALS)?;
	log::info!("{} round trips of the ({}, {}) code with L = {} restored their payload", TRIALS, M, K, L);

	let pipeline = Pipeline::new(M, K, L)?;
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	let avail = pipeline.available(&sample_available(&mut rng, M, K))?;
	let payload = random_words(&mut rng, M, L as u32 - 1);
	let trace = pipeline.run_traced(&payload, &avail)?;
	println!("Selected packets: {:?}\n", avail.indices());
	println!("{}\n", trace);
	println!("Restored matches input: {}", trace.output() == Some(&payload[..]));
	println!("Matches field computation: {}\n", trace.output() == Some(&pipeline.run_direct(&payload, &avail)?[..]));

	let params = CodeParams::new(L, M, K)?.with_prim(pipeline.field().prim()).with_avail(avail.indices().to_vec());
	print!("{}", CoefficientTables::derive(&params)?);

	Ok(())
}
