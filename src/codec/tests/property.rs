//! Generated checks that chunking never changes what the decoder emits.

use bytes::BytesMut;
use proptest::{
    collection::vec,
    prelude::{Just, Strategy, any, prop_oneof},
    prop_assert,
    prop_assert_eq,
    test_runner::{Config as ProptestConfig, RngAlgorithm, TestCaseError, TestRng, TestRunner},
};
use rstest::rstest;

use crate::{
    codec::StreamDecoder,
    frame::{Frame, HEADER_SIZE},
};

fn deterministic_runner(cases: u32) -> TestRunner {
    let config = ProptestConfig {
        cases,
        ..ProptestConfig::default()
    };
    let rng = TestRng::deterministic_rng(RngAlgorithm::ChaCha);
    TestRunner::new_with_rng(config, rng)
}

fn payload_strategy(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        Just(0usize),
        Just(1usize),
        Just(max_len),
        0usize..=max_len,
    ]
    .prop_flat_map(|len| vec(any::<u8>(), len))
}

/// Payloads plus the sizes of the reads that will carry them.
fn stream_strategy(max_len: usize) -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<usize>)> {
    (
        vec(payload_strategy(max_len), 1..24),
        vec(1usize..=2 * (HEADER_SIZE + max_len), 1..64),
    )
}

#[rstest]
#[case(16, 128)]
#[case(700, 64)]
fn any_chunking_yields_the_encoded_sequence(#[case] max_len: usize, #[case] cases: u32) {
    let mut runner = deterministic_runner(cases);

    runner
        .run(&stream_strategy(max_len), |(payloads, chunk_sizes)| {
            let mut wire = BytesMut::new();
            for (index, payload) in payloads.iter().enumerate() {
                let id = u32::try_from(index)
                    .map_err(|_| TestCaseError::fail("index exceeded u32 range".to_owned()))?;
                Frame::with_fields(id, 0, 0, payload.clone())
                    .map_err(|err| TestCaseError::fail(format!("frame rejected: {err}")))?
                    .encode_into(&mut wire);
            }

            let mut decoder = StreamDecoder::default();
            let mut out = Vec::new();
            let mut rest = &wire[..];
            for size in chunk_sizes.iter().cycle() {
                if rest.is_empty() {
                    break;
                }
                let (chunk, tail) = rest.split_at((*size).min(rest.len()));
                decoder
                    .feed(chunk, &mut out)
                    .map_err(|err| TestCaseError::fail(format!("decode failed: {err}")))?;
                rest = tail;
            }

            prop_assert_eq!(out.len(), payloads.len());
            for (index, (frame, expected)) in out.iter().zip(&payloads).enumerate() {
                prop_assert_eq!(frame.header().id() as usize, index);
                prop_assert_eq!(frame.payload().as_ref(), expected.as_slice());
            }
            prop_assert_eq!(decoder.buffered_bytes(), 0);
            prop_assert!(decoder.decode_eof().is_ok());
            Ok(())
        })
        .expect("chunked streams should decode to the encoded sequence");
}
