//! Unit tests for the stream decoder.
//!
//! Covers fragmentation, coalescing, header validation, zero-length
//! handling, EOF classification and buffer reclamation.

use bytes::{Bytes, BytesMut};
use rstest::{fixture, rstest};

use super::*;
use crate::{byte_order::write_le_i32, frame::MAX_PAYLOAD_SIZE};

mod property;

fn wire(id: u32, payload: &[u8]) -> Bytes {
    Frame::with_fields(id, 0, 0, Bytes::copy_from_slice(payload))
        .expect("payload fits")
        .to_bytes()
}

fn raw_header(declared: i32) -> Vec<u8> {
    let mut bytes = write_le_i32(declared).to_vec();
    bytes.extend_from_slice(&[0; HEADER_REMAINDER_SIZE]);
    bytes
}

#[fixture]
fn decoder() -> StreamDecoder { StreamDecoder::default() }

#[rstest]
fn hello_split_after_ten_bytes(mut decoder: StreamDecoder) {
    let bytes = wire(0, b"hello");
    let mut out = Vec::new();

    assert_eq!(decoder.feed(&bytes[..10], &mut out).expect("prefix"), 0);
    assert!(out.is_empty());
    assert_eq!(decoder.buffered_bytes(), 10);

    assert_eq!(decoder.feed(&bytes[10..], &mut out).expect("rest"), 1);
    assert_eq!(out[0].payload().as_ref(), b"hello");
    assert_eq!(out[0].payload_size(), 5);
    assert_eq!(decoder.buffered_bytes(), 0);
    assert_eq!(decoder.buffer().read_cursor(), 0, "buffer cleared");
}

#[rstest]
fn coalesced_frames_emitted_in_order(mut decoder: StreamDecoder) {
    let mut bytes = BytesMut::new();
    for (id, payload) in [(1, &b"a"[..]), (2, b"bb"), (3, b"ccc")] {
        bytes.extend_from_slice(&wire(id, payload));
    }
    let mut out = Vec::new();

    assert_eq!(decoder.feed(&bytes, &mut out).expect("valid stream"), 3);
    let ids: Vec<u32> = out.iter().map(|f| f.header().id()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(out[2].payload().as_ref(), b"ccc");
    assert_eq!(decoder.frames_decoded(), 3);
}

#[rstest]
fn trailing_partial_frame_is_retained(mut decoder: StreamDecoder) {
    let first = wire(1, b"complete");
    let second = wire(2, b"pending");
    let mut bytes = first.to_vec();
    bytes.extend_from_slice(&second[..15]);
    let mut out = Vec::new();

    decoder.feed(&bytes, &mut out).expect("valid stream");
    assert_eq!(out.len(), 1);
    assert_eq!(decoder.buffered_bytes(), 15);

    decoder.feed(&second[15..], &mut out).expect("valid stream");
    assert_eq!(out.len(), 2);
    assert_eq!(out[1].payload().as_ref(), b"pending");
}

#[test]
fn every_split_point_yields_the_same_frame() {
    let bytes = wire(7, b"split me anywhere");
    for split in 0..=bytes.len() {
        let mut decoder = StreamDecoder::default();
        let mut out = Vec::new();
        decoder.feed(&bytes[..split], &mut out).expect("prefix");
        decoder.feed(&bytes[split..], &mut out).expect("suffix");
        assert_eq!(out.len(), 1, "split at {split}");
        assert_eq!(out[0].header().id(), 7);
        assert_eq!(out[0].payload().as_ref(), b"split me anywhere");
    }
}

#[test]
fn byte_at_a_time_delivery() {
    let bytes = wire(1, b"drip");
    let mut decoder = StreamDecoder::default();
    let mut out = Vec::new();
    for (index, byte) in bytes.iter().enumerate() {
        let produced = decoder.feed(&[*byte], &mut out).expect("valid stream");
        let expected = usize::from(index + 1 == bytes.len());
        assert_eq!(produced, expected, "after byte {index}");
    }
    assert_eq!(decoder.bytes_received(), bytes.len() as u64);
}

#[rstest]
#[case::too_large(70_000, FramingError::PayloadTooLarge { size: 70_000, max: MAX_PAYLOAD_SIZE as usize })]
#[case::negative(-1, FramingError::NegativePayloadSize(-1))]
#[case::min(i32::MIN, FramingError::NegativePayloadSize(i32::MIN))]
fn invalid_size_is_fatal(#[case] declared: i32, #[case] expected: FramingError) {
    let mut decoder = StreamDecoder::default();
    let mut out = Vec::new();

    let err = decoder
        .feed(&raw_header(declared), &mut out)
        .expect_err("header should be rejected");
    assert!(matches!(err, CodecError::Framing(ref e) if *e == expected));
    assert!(out.is_empty());
    assert_eq!(decoder.buffered_bytes(), 0, "buffer discarded");
    assert!(decoder.is_corrupted());
}

#[rstest]
#[case::single_read(usize::MAX)]
#[case::kilobyte_reads(1000)]
#[case::header_sized_reads(HEADER_SIZE)]
fn largest_payload_decodes_across_chunks(mut decoder: StreamDecoder, #[case] chunk: usize) {
    let payload = vec![0x5A; MAX_PAYLOAD_SIZE as usize];
    let bytes = wire(7, &payload);
    let mut out = Vec::new();

    for piece in bytes.chunks(chunk) {
        decoder.feed(piece, &mut out).expect("maximum payload is valid");
    }
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].payload_size(), MAX_PAYLOAD_SIZE);
    assert_eq!(out[0].payload().as_ref(), payload.as_slice());
    assert_eq!(decoder.buffered_bytes(), 0);
}

#[rstest]
fn one_past_maximum_is_rejected(mut decoder: StreamDecoder) {
    let declared = i32::try_from(MAX_PAYLOAD_SIZE + 1).expect("fits i32");
    let mut out = Vec::new();

    let err = decoder
        .feed(&raw_header(declared), &mut out)
        .expect_err("one byte over the wire maximum");
    assert!(matches!(
        err,
        CodecError::Framing(FramingError::PayloadTooLarge { size: 65_536, max: 65_535 })
    ));
    assert!(out.is_empty());
}

#[test]
fn configured_maximum_is_enforced() {
    let mut decoder = StreamDecoder::new(DecoderConfig::default().max_payload_size(4));
    let mut out = Vec::new();

    decoder.feed(&wire(1, b"four"), &mut out).expect("at limit");
    let err = decoder
        .feed(&wire(2, b"five!"), &mut out)
        .expect_err("over limit");
    assert!(matches!(
        err,
        CodecError::Framing(FramingError::PayloadTooLarge { size: 5, max: 4 })
    ));
    assert_eq!(out.len(), 1);
}

#[rstest]
fn frames_before_corrupt_header_are_delivered(mut decoder: StreamDecoder) {
    let mut bytes = wire(1, b"good").to_vec();
    bytes.extend_from_slice(&raw_header(-5));
    bytes.extend_from_slice(&wire(2, b"never"));
    let mut out = Vec::new();

    decoder
        .feed(&bytes, &mut out)
        .expect_err("second header is corrupt");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].payload().as_ref(), b"good");
}

#[rstest]
fn corrupted_decoder_stays_failed(mut decoder: StreamDecoder) {
    let mut out = Vec::new();
    decoder
        .feed(&raw_header(-1), &mut out)
        .expect_err("corrupt header");

    let err = decoder
        .feed(&wire(1, b"valid"), &mut out)
        .expect_err("decoder stays failed");
    assert!(matches!(
        err,
        CodecError::Framing(FramingError::NegativePayloadSize(-1))
    ));
    assert!(out.is_empty());
    assert!(decoder.decode_eof().is_ok(), "nothing left to report");
}

#[rstest]
#[case::accept(ZeroLengthPolicy::Accept)]
#[case::reject(ZeroLengthPolicy::Reject)]
fn zero_length_payload_follows_policy(#[case] policy: ZeroLengthPolicy) {
    let mut decoder = StreamDecoder::new(DecoderConfig::default().zero_length(policy));
    let mut out = Vec::new();
    let result = decoder.feed(&wire(4, b""), &mut out);

    match policy {
        ZeroLengthPolicy::Accept => {
            assert_eq!(result.expect("empty payload accepted"), 1);
            assert!(out[0].payload().is_empty());
            assert_eq!(out[0].header().id(), 4);
        }
        ZeroLengthPolicy::Reject => {
            assert!(matches!(
                result,
                Err(CodecError::Framing(FramingError::EmptyPayload))
            ));
            assert!(out.is_empty());
        }
    }
}

#[rstest]
fn decode_without_input_is_idempotent(mut decoder: StreamDecoder) {
    let bytes = wire(1, b"partial");
    let mut out = Vec::new();
    decoder.feed(&bytes[..14], &mut out).expect("prefix");
    let read = decoder.buffer().read_cursor();
    let write = decoder.buffer().write_cursor();

    for _ in 0..3 {
        assert_eq!(decoder.decode(&mut out).expect("no new data"), 0);
        assert_eq!(decoder.buffer().read_cursor(), read);
        assert_eq!(decoder.buffer().write_cursor(), write);
    }
    assert!(out.is_empty());
}

#[rstest]
#[case::clean(0, None)]
#[case::mid_header(7, Some(EofError::MidHeader { bytes_received: 7, header_size: HEADER_SIZE }))]
#[case::mid_frame(14, Some(EofError::MidFrame { bytes_received: 14, expected: 17 }))]
fn decode_eof_classifies_leftovers(#[case] prefix: usize, #[case] expected: Option<EofError>) {
    let bytes = wire(1, b"hello");
    let mut decoder = StreamDecoder::default();
    let mut out = Vec::new();
    decoder.feed(&bytes[..prefix], &mut out).expect("prefix");

    match (decoder.decode_eof(), expected) {
        (Ok(()), None) => {}
        (Err(CodecError::Eof(actual)), Some(expected)) => assert_eq!(actual, expected),
        (other, expected) => panic!("unexpected EOF result {other:?}, wanted {expected:?}"),
    }
}

#[test]
fn long_streams_reclaim_consumed_space() {
    let mut decoder = StreamDecoder::new(DecoderConfig::default().initial_capacity(1024));
    let payload = vec![0xAB; 500];
    let frame = wire(1, &payload);
    let mut out = Vec::new();

    // Keep a partial frame buffered so the clear path never fires and
    // only compaction can reclaim space.
    decoder.feed(&frame[..6], &mut out).expect("prefix");
    let mut pending = frame[6..].to_vec();
    for _ in 0..200 {
        pending.extend_from_slice(&frame[..6]);
        decoder.feed(&pending, &mut out).expect("valid stream");
        pending = frame[6..].to_vec();
    }

    assert_eq!(out.len(), 200);
    assert!(out.iter().all(|f| f.payload().as_ref() == payload.as_slice()));
    assert_eq!(decoder.buffered_bytes(), 6);
    assert!(
        decoder.buffer().capacity() < 200 * frame.len(),
        "consumed bytes were reclaimed rather than accumulated"
    );
}
