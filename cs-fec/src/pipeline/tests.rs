use super::*;

use assert_matches::assert_matches;
use cs_fec_tester::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn hundred_seeded_trials_m3_k5_l11() {
	roundtrip_trials(|payload, avail| run_pipeline(payload, avail, 3, 5, 11), 3, 5, 10, TRIALS).unwrap();
}

#[test]
fn every_available_set_restores() {
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	for (m, k, l) in [(2, 3, 5), (3, 5, 5), (4, 8, 5), (5, 9, 11), (2, 4, 3)] {
		let pipeline = Pipeline::new(m, k, l).unwrap();
		for cols in all_available_sets(m, k) {
			let avail = pipeline.available(&cols).unwrap();
			let payload = random_words(&mut rng, m, l as u32 - 1);
			roundtrip(|p, _| pipeline.run(p, &avail), &payload, &cols).unwrap();
		}
	}
}

#[test]
fn matches_the_field_computation() {
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	let pipeline = Pipeline::new(3, 5, 11).unwrap();
	for _ in 0..TRIALS {
		let avail = pipeline.available(&sample_available(&mut rng, 3, 5)).unwrap();
		let payload = random_words(&mut rng, 3, 10);
		let direct = pipeline.run_direct(&payload, &avail).unwrap();
		assert_eq!(pipeline.run(&payload, &avail).unwrap(), direct);
		assert_eq!(direct, payload);
	}
}

#[test]
fn traced_stages() {
	let pipeline = Pipeline::new(2, 3, 5).unwrap();
	let avail = pipeline.available(&[1, 2]).unwrap();
	let trace = pipeline.run_traced(&[0b1011, 0b0001], &avail).unwrap();

	let widths = trace.stages().iter().map(|(stage, symbols)| (*stage, symbols.width())).collect::<Vec<_>>();
	assert_eq!(
		widths,
		vec![(Stage::Input, 4), (Stage::Lift, 5), (Stage::Decode, 5), (Stage::Encode, 5), (Stage::Drop, 4)]
	);
	assert_eq!(trace.get(Stage::Lift).unwrap().words(), &[0b11011, 0b10001]);
	assert_eq!(trace.get(Stage::Decode).unwrap().words(), &[0b00110, 0b11011]);
	assert_eq!(trace.output(), Some(&[0b1011, 0b0001][..]));

	let text = trace.to_string();
	assert!(text.starts_with("[input]\ns0: 1011\ns1: 0001\n\n[lift_to_cyclic_domain]\ns0: 11011\n"));
	assert!(text.ends_with("[trim_zero_padding]\ns0: 1011\ns1: 0001"));
}

#[test]
fn rotations_encode_like_the_field() {
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	let pipeline = Pipeline::new(3, 5, 11).unwrap();
	for _ in 0..TRIALS {
		let data = random_words(&mut rng, 3, 10);
		let field = pipeline.generator().encode(&data.iter().copied().map(Element).collect::<Vec<_>>()).unwrap();
		let field = field.into_iter().map(Elt::from).collect::<Vec<_>>();
		assert_eq!(pipeline.encode_rotations(&data).unwrap(), field);
	}
}

#[test]
fn transmit_recovers_from_any_survivors() {
	let mut rng = SmallRng::from_seed(SMALL_RNG_SEED);
	for (m, k, l) in [(3, 5, 11), (2, 3, 5), (4, 6, 13)] {
		let pipeline = Pipeline::new(m, k, l).unwrap();
		for cols in all_available_sets(m, k) {
			let avail = pipeline.available(&cols).unwrap();
			let data = random_words(&mut rng, m, l as u32 - 1);
			roundtrip(|d, _| pipeline.transmit(d, &avail), &data, &cols).unwrap();
		}
	}
}

#[test]
fn unsupported_widths() {
	assert_matches!(Pipeline::new(2, 3, 2), Err(Error::InvalidParameters(Invalid::WidthTooSmall(2))));
	// 1 + x + x^2 + x^3 = (1 + x)^3
	assert_matches!(Pipeline::new(2, 3, 4), Err(Error::InvalidParameters(Invalid::ReduciblePolynomial(0xf))));
	assert_matches!(Pipeline::new(2, 3, 9), Err(Error::InvalidParameters(Invalid::ReduciblePolynomial(_))));
	assert_matches!(Pipeline::new(2, 4, 3), Ok(_));
	assert_matches!(
		Pipeline::new(2, 6, 3),
		Err(Error::InvalidParameters(Invalid::TooManyParities { parity: 4, bits: 2 }))
	);
}

#[test]
fn non_mds_codes_rejected_up_front() {
	// x has order 5 over 1 + x + .. + x^4
	assert_matches!(
		run_pipeline(&[1, 2, 3, 4, 5, 6], &[1, 2, 3, 4, 6, 7], 6, 8, 5),
		Err(Error::InvalidParameters(Invalid::GeneratorOrder { order: 5, m: 6 }))
	);
	assert_matches!(Pipeline::new(7, 15, 11), Err(Error::InvalidParameters(Invalid::NotMds(_))));
	assert_matches!(Pipeline::new(7, 12, 11), Ok(_));
}

#[test]
fn bad_payloads() {
	let pipeline = Pipeline::new(3, 5, 11).unwrap();
	let avail = pipeline.available(&[0, 2, 4]).unwrap();
	assert_matches!(
		pipeline.run(&[1, 2], &avail),
		Err(Error::InvalidParameters(Invalid::PayloadLength { have: 2, want: 3 }))
	);
	assert_matches!(
		pipeline.run(&[1, 2, 0x400], &avail),
		Err(Error::InvalidParameters(Invalid::SymbolTooWide { value: 0x400, width: 10 }))
	);
	assert_matches!(
		run_pipeline(&[1, 2, 3], &[0, 0, 4], 3, 5, 11),
		Err(Error::InvalidParameters(Invalid::DuplicateIndex(0)))
	);
}
