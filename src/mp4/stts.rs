use crate::bits::reader::BoundedReader;
use crate::errors::{DemuxResult, ParseError};
use crate::mp4::movie::Track;
use log::trace;
use std::io::{Read, Seek};

/// Decode the time-to-sample box (stts).
///
/// Each (run_length, delta) entry is expanded into per-sample timestamp and
/// duration arrays by accumulating a running clock. The entry count is only a
/// sizing hint; the true sample total is the sum of run lengths, so the
/// arrays grow when the expansion overruns the hint.
pub(crate) fn parse<R: Read + Seek>(rd: &mut BoundedReader<R>, tr: &mut Track) -> DemuxResult<()> {
    let entry_count = rd.read_uint(4);
    let mut timestamps = Vec::new();
    let mut durations = Vec::new();
    timestamps
        .try_reserve_exact(entry_count as usize)
        .and_then(|_| durations.try_reserve_exact(entry_count as usize))
        .map_err(|_| ParseError::new("out of memory sizing time table"))?;

    let mut clock = 0u32;
    for _ in 0..entry_count {
        let run_length = rd.read_uint(4);
        let delta = rd.read_uint(4);
        timestamps
            .try_reserve(run_length as usize)
            .and_then(|_| durations.try_reserve(run_length as usize))
            .map_err(|_| ParseError::new("out of memory growing time table"))?;
        for _ in 0..run_length {
            durations.push(delta);
            timestamps.push(clock);
            clock = clock.wrapping_add(delta);
        }
    }

    tr.timestamps = timestamps;
    tr.durations = durations;
    Ok(())
}

/// Read and discard the composition offset box (ctts).
/// Presentation-order remapping is deliberately not indexed.
pub(crate) fn parse_composition_offsets<R: Read + Seek>(rd: &mut BoundedReader<R>) {
    let entry_count = rd.read_uint(4);
    for _ in 0..entry_count {
        let run_length = rd.read_uint(4);
        let offset = rd.read_uint(4);
        trace!(
            "discarding composition offset run: {} samples, offset {}",
            run_length,
            offset as i32
        );
        if rd.is_at_end() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn time_payload(runs: &[(u32, u32)]) -> Vec<u8> {
        let mut payload = (runs.len() as u32).to_be_bytes().to_vec();
        for (count, delta) in runs {
            payload.extend_from_slice(&count.to_be_bytes());
            payload.extend_from_slice(&delta.to_be_bytes());
        }
        payload
    }

    #[test]
    fn test_run_expansion() {
        let payload = time_payload(&[(3, 100), (2, 50)]);
        let mut cur = Cursor::new(payload.clone());
        let mut rd = BoundedReader::new(&mut cur, payload.len() as u64);
        let mut tr = Track::default();
        parse(&mut rd, &mut tr).expect("parse");
        assert_eq!(tr.timestamps, vec![0, 100, 200, 300, 350]);
        assert_eq!(tr.durations, vec![100, 100, 100, 50, 50]);
    }

    #[test]
    fn test_timestamps_are_prefix_sums_of_durations() {
        let payload = time_payload(&[(2, 10), (1, 5), (3, 7)]);
        let mut cur = Cursor::new(payload.clone());
        let mut rd = BoundedReader::new(&mut cur, payload.len() as u64);
        let mut tr = Track::default();
        parse(&mut rd, &mut tr).expect("parse");
        let mut sum = 0u32;
        for (ts, d) in tr.timestamps.iter().zip(&tr.durations) {
            assert_eq!(*ts, sum);
            sum += d;
        }
    }

    #[test]
    fn test_composition_offsets_are_discarded() {
        let payload = time_payload(&[(4, 200)]);
        let mut cur = Cursor::new(payload.clone());
        let mut rd = BoundedReader::new(&mut cur, payload.len() as u64);
        parse_composition_offsets(&mut rd);
        assert_eq!(rd.remaining(), 0);
    }
}
