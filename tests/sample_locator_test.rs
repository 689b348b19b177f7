use proptest::prelude::*;

use mp4index::{SampleToChunk, Track};

/// Build a track whose chunks hold the given sample counts, with the given
/// per-sample sizes laid out consecutively inside each chunk.
fn build_track(samples_per_chunk: &[u32], sizes: &[u32]) -> Track {
    let total: u32 = samples_per_chunk.iter().sum();
    assert_eq!(total as usize, sizes.len());

    // one run per chunk keeps the expected layout trivial to compute
    let sample_to_chunk = samples_per_chunk
        .iter()
        .enumerate()
        .map(|(n, count)| SampleToChunk {
            first_chunk: n as u32 + 1,
            samples_per_chunk: *count,
        })
        .collect();

    // chunks placed back to back, starting past a fictional header
    let mut chunk_offsets = Vec::new();
    let mut offset = 512u64;
    let mut next_sample = 0usize;
    for count in samples_per_chunk {
        chunk_offsets.push(offset);
        for _ in 0..*count {
            offset += sizes[next_sample] as u64;
            next_sample += 1;
        }
    }

    let mut timestamps = Vec::new();
    let mut clock = 0u32;
    for _ in 0..total {
        timestamps.push(clock);
        clock += 10;
    }

    Track {
        sample_count: total,
        entry_sizes: sizes.to_vec(),
        timestamps,
        durations: vec![10; total as usize],
        sample_to_chunk,
        chunk_offsets,
        ..Track::default()
    }
}

/// The flat list of expected (offset, size) pairs for `build_track`.
fn expected_layout(samples_per_chunk: &[u32], sizes: &[u32]) -> Vec<(u64, u32)> {
    let mut expected = Vec::new();
    let mut chunk_base = 512u64;
    let mut next_sample = 0usize;
    for count in samples_per_chunk {
        let mut offset = chunk_base;
        for _ in 0..*count {
            expected.push((offset, sizes[next_sample]));
            offset += sizes[next_sample] as u64;
            next_sample += 1;
        }
        chunk_base = offset;
    }
    expected
}

fn chunked_sizes() -> impl Strategy<Value = (Vec<u32>, Vec<u32>)> {
    prop::collection::vec(1u32..6, 1..8).prop_flat_map(|chunks| {
        let total: usize = chunks.iter().map(|c| *c as usize).sum();
        (
            Just(chunks),
            prop::collection::vec(1u32..4096, total..=total),
        )
    })
}

proptest! {
    #[test]
    fn prop_locator_matches_flat_layout((chunks, sizes) in chunked_sizes()) {
        let track = build_track(&chunks, &sizes);
        let expected = expected_layout(&chunks, &sizes);

        for (n, (offset, size)) in expected.iter().enumerate() {
            let loc = track.sample_location(n as u32).expect("in range");
            prop_assert_eq!(loc.offset, *offset);
            prop_assert_eq!(loc.size, *size);
            prop_assert_eq!(loc.timestamp, n as u32 * 10);
            prop_assert_eq!(loc.duration, 10);
        }
        prop_assert_eq!(track.sample_location(expected.len() as u32), None);
    }

    #[test]
    fn prop_consecutive_samples_in_a_chunk_are_adjacent((chunks, sizes) in chunked_sizes()) {
        let track = build_track(&chunks, &sizes);

        let mut sample = 0u32;
        for count in &chunks {
            for k in 1..*count {
                let a = track.sample_location(sample + k - 1).expect("in range");
                let b = track.sample_location(sample + k).expect("in range");
                prop_assert_eq!(b.offset, a.offset + a.size as u64);
            }
            sample += count;
        }
    }
}
