//! Free-text tag boxes from the user-data subtree (udta/meta/ilst).
//!
//! Each iTunes-style tag box wraps its text in a fixed 16-byte sub-header
//! (the nested data box header plus type and locale words); the remainder is
//! the tag bytes, copied raw without re-encoding.

use crate::bits::reader::BoundedReader;
use crate::errors::DemuxResult;
use std::io::{Read, Seek};

/// Capture a tag box payload into `slot`, first occurrence only.
/// Payloads of 16 bytes or fewer carry no text and are ignored.
pub(crate) fn parse_tag<R: Read + Seek>(
    rd: &mut BoundedReader<R>,
    slot: &mut Option<Vec<u8>>,
) -> DemuxResult<()> {
    if slot.is_some() || rd.remaining() <= 16 {
        return Ok(());
    }
    rd.skip(4 + 4 + 4 + 4);
    *slot = Some(rd.read_remaining()?);
    Ok(())
}
