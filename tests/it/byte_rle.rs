use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dwrf_rle::bitmap::is_null;
use dwrf_rle::encoding::byte_rle::{ByteRleDecoder, ByteRleEncoder};
use dwrf_rle::error::Result;
use dwrf_rle::position::Positions;
use dwrf_rle::ranges::Ranges;

use super::{sink, source};

fn encode(data: &[u8], nulls: Option<&[u8]>) -> Vec<u8> {
    let mut encoder = ByteRleEncoder::new(sink());
    encoder
        .add(data, &Ranges::of(0, data.len()), nulls)
        .unwrap();
    encoder.flush().unwrap();
    encoder.into_inner().into_inner()
}

/// Bytes with runs of random lengths, so both frame kinds and both caps get
/// hit.
fn runny_bytes(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(len);
    while data.len() < len {
        let value: u8 = rng.gen_range(0..4);
        let run = rng.gen_range(1..200usize).min(len - data.len());
        data.extend(std::iter::repeat(value).take(run));
    }
    data
}

fn random_nulls(rng: &mut StdRng, len: usize) -> Vec<u8> {
    let mut nulls = vec![0u8; (len + 7) / 8];
    for byte in nulls.iter_mut() {
        *byte = rng.gen();
    }
    nulls
}

#[test]
fn round_trip() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    for len in [1usize, 2, 127, 128, 129, 1000, 5000] {
        let data = runny_bytes(&mut rng, len);
        let wire = encode(&data, None);

        let mut decoder = ByteRleDecoder::new(source(wire, 64));
        let mut decoded = vec![0u8; len];
        decoder.next(&mut decoded, None)?;
        assert_eq!(decoded, data);
    }
    Ok(())
}

#[test]
fn round_trip_with_nulls() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    for len in [5usize, 64, 129, 1000] {
        let data = runny_bytes(&mut rng, len);
        let nulls = random_nulls(&mut rng, len);
        let wire = encode(&data, Some(&nulls));

        let mut decoder = ByteRleDecoder::new(source(wire, 16));
        let mut decoded = vec![0xEEu8; len];
        decoder.next(&mut decoded, Some(&nulls))?;
        for i in 0..len {
            if is_null(&nulls, i) {
                assert_eq!(decoded[i], 0xEE, "null position {} was touched", i);
            } else {
                assert_eq!(decoded[i], data[i], "position {}", i);
            }
        }
    }
    Ok(())
}

#[test]
fn masked_all_valid_equals_dense() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(3);
    let data = runny_bytes(&mut rng, 500);
    let none_null = vec![0u8; (data.len() + 7) / 8];

    let dense = encode(&data, None);
    let masked = encode(&data, Some(&none_null));
    assert_eq!(dense, masked);

    let mut dense_out = vec![0u8; data.len()];
    ByteRleDecoder::new(source(dense.clone(), 32)).next(&mut dense_out, None)?;
    let mut masked_out = vec![0u8; data.len()];
    ByteRleDecoder::new(source(dense, 32)).next(&mut masked_out, Some(&none_null))?;
    assert_eq!(dense_out, masked_out);
    Ok(())
}

#[test]
fn frame_bounds_hold() {
    let mut rng = StdRng::seed_from_u64(11);
    let data = runny_bytes(&mut rng, 4000);
    let wire = encode(&data, None);

    let mut offset = 0;
    let mut values = 0usize;
    while offset < wire.len() {
        let header = wire[offset] as i8;
        if header >= 0 {
            let run = header as usize + 3;
            assert!((3..=130).contains(&run));
            values += run;
            offset += 2;
        } else {
            let len = -(header as i64) as usize;
            assert!((1..=128).contains(&len));
            // no run of 3 or more identical bytes may end a literal
            let payload = &wire[offset + 1..offset + 1 + len];
            let tail = payload
                .iter()
                .rev()
                .take_while(|&&b| b == payload[len - 1])
                .count();
            assert!(tail < 3, "literal frame ends in a {}-run", tail);
            values += len;
            offset += 1 + len;
        }
    }
    assert_eq!(values, data.len());
}

#[test]
fn skip_equals_read_and_discard() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(13);
    let data = runny_bytes(&mut rng, 2000);
    let wire = encode(&data, None);

    for skip in [0usize, 1, 3, 129, 130, 777, 1999] {
        let mut skipper = ByteRleDecoder::new(source(wire.clone(), 64));
        skipper.skip(skip as u64);
        let mut skipped = vec![0u8; data.len() - skip];
        skipper.next(&mut skipped, None)?;

        let mut reader = ByteRleDecoder::new(source(wire.clone(), 64));
        let mut discarded = vec![0u8; skip];
        reader.next(&mut discarded, None)?;
        let mut read = vec![0u8; data.len() - skip];
        reader.next(&mut read, None)?;

        assert_eq!(skipped, read);
        assert_eq!(skipped, data[skip..]);
    }
    Ok(())
}

#[test]
fn recorded_positions_resume_the_stream() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(17);
    let data = runny_bytes(&mut rng, 1000);

    // record a position every 250 values while encoding
    let mut encoder = ByteRleEncoder::new(sink());
    let mut snapshots = vec![];
    for chunk in 0..4 {
        let mut positions = Positions::default();
        encoder.record_position(&mut positions, Some(chunk));
        snapshots.push(positions);

        let mut part = Ranges::default();
        part.add(chunk * 250, (chunk + 1) * 250);
        encoder.add(&data, &part, None)?;
    }
    encoder.flush()?;
    let wire = encoder.into_inner().into_inner();

    for (chunk, positions) in snapshots.iter().enumerate() {
        let mut decoder = ByteRleDecoder::new(source(wire.clone(), 64));
        decoder.seek_to_row_group(&mut positions.provider())?;

        let expected = &data[chunk * 250..];
        let mut decoded = vec![0u8; expected.len()];
        decoder.next(&mut decoded, None)?;
        assert_eq!(decoded, expected, "resume at chunk {}", chunk);
    }
    Ok(())
}

#[test]
fn block_size_does_not_change_results() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(19);
    let data = runny_bytes(&mut rng, 600);
    let wire = encode(&data, None);

    for block_size in [1usize, 2, 7, 64, 4096] {
        let mut decoder = ByteRleDecoder::new(source(wire.clone(), block_size));
        decoder.skip(100);
        let mut decoded = vec![0u8; 500];
        decoder.next(&mut decoded, None)?;
        assert_eq!(decoded, data[100..]);
    }
    Ok(())
}
