use crate::bits::reader::BoundedReader;
use crate::errors::{DemuxResult, ParseError};
use crate::mp4::movie::Track;
use std::io::{Read, Seek};

/// Decode a chunk offset box, 32-bit (stco) or 64-bit (co64).
/// Offsets are stored uniformly as 64-bit file positions.
pub(crate) fn parse<R: Read + Seek>(
    rd: &mut BoundedReader<R>,
    large: bool,
    tr: &mut Track,
) -> DemuxResult<()> {
    let entry_count = rd.read_uint(4);
    let mut offsets = Vec::new();
    offsets
        .try_reserve_exact(entry_count as usize)
        .map_err(|_| ParseError::new("out of memory sizing chunk offset table"))?;
    for _ in 0..entry_count {
        if large {
            offsets.push(rd.read_u64());
        } else {
            offsets.push(rd.read_uint(4) as u64);
        }
    }

    tr.chunk_offsets = offsets;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_32bit_offsets() {
        let mut payload = 2u32.to_be_bytes().to_vec();
        payload.extend_from_slice(&1000u32.to_be_bytes());
        payload.extend_from_slice(&2000u32.to_be_bytes());
        let mut cur = Cursor::new(payload.clone());
        let mut rd = BoundedReader::new(&mut cur, payload.len() as u64);
        let mut tr = Track::default();
        parse(&mut rd, false, &mut tr).expect("parse");
        assert_eq!(tr.chunk_offsets, vec![1000, 2000]);
    }

    #[test]
    fn test_parse_64bit_offsets() {
        let mut payload = 1u32.to_be_bytes().to_vec();
        payload.extend_from_slice(&0x1_0000_0000u64.to_be_bytes());
        let mut cur = Cursor::new(payload.clone());
        let mut rd = BoundedReader::new(&mut cur, payload.len() as u64);
        let mut tr = Track::default();
        parse(&mut rd, true, &mut tr).expect("parse");
        assert_eq!(tr.chunk_offsets, vec![0x1_0000_0000]);
    }
}
