use crate::bits::reader::BoundedReader;
use crate::errors::{DemuxResult, ParseError};
use crate::mp4::movie::{SampleToChunk, Track};
use std::io::{Read, Seek};

/// Decode the sample-to-chunk box (stsc).
///
/// Entries are (first_chunk, samples_per_chunk) runs ascending by
/// first_chunk; the per-entry sample description index is not used.
pub(crate) fn parse<R: Read + Seek>(rd: &mut BoundedReader<R>, tr: &mut Track) -> DemuxResult<()> {
    let entry_count = rd.read_uint(4);
    let mut runs = Vec::new();
    runs.try_reserve_exact(entry_count as usize)
        .map_err(|_| ParseError::new("out of memory sizing sample-to-chunk table"))?;
    for _ in 0..entry_count {
        let first_chunk = rd.read_uint(4);
        let samples_per_chunk = rd.read_uint(4);
        rd.skip(4); // sample_description_index
        runs.push(SampleToChunk {
            first_chunk,
            samples_per_chunk,
        });
    }

    tr.sample_to_chunk = runs;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_runs() {
        let mut payload = 2u32.to_be_bytes().to_vec();
        for (first, per, desc) in [(1u32, 4u32, 1u32), (3, 2, 1)] {
            payload.extend_from_slice(&first.to_be_bytes());
            payload.extend_from_slice(&per.to_be_bytes());
            payload.extend_from_slice(&desc.to_be_bytes());
        }
        let mut cur = Cursor::new(payload.clone());
        let mut rd = BoundedReader::new(&mut cur, payload.len() as u64);
        let mut tr = Track::default();
        parse(&mut rd, &mut tr).expect("parse");
        assert_eq!(
            tr.sample_to_chunk,
            vec![
                SampleToChunk {
                    first_chunk: 1,
                    samples_per_chunk: 4
                },
                SampleToChunk {
                    first_chunk: 3,
                    samples_per_chunk: 2
                },
            ]
        );
        assert_eq!(rd.remaining(), 0);
    }

    #[test]
    fn test_truncated_table_raises_end_of_input() {
        let payload = 5u32.to_be_bytes().to_vec();
        let mut cur = Cursor::new(payload.clone());
        let mut rd = BoundedReader::new(&mut cur, payload.len() as u64);
        let mut tr = Track::default();
        parse(&mut rd, &mut tr).expect("parse");
        assert_eq!(tr.sample_to_chunk.len(), 5);
        assert!(rd.is_at_end());
    }
}
