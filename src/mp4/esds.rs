//! Elementary-stream descriptor decoders (the esds subtree).
//!
//! Descriptors use their own framing: a 1-byte tag and a base-128 length
//! with 0x80 continuation, decoded by the traversal engine. Only the fields
//! the index needs are captured; everything optional is skipped.

use crate::bits::reader::BoundedReader;
use crate::errors::DemuxResult;
use crate::mp4::movie::{DecoderConfig, Track};
use std::io::{Read, Seek};

/// Decode the ES descriptor header: optional fields are flag-selected.
pub(crate) fn parse_es_descriptor<R: Read + Seek>(rd: &mut BoundedReader<R>) {
    // ES_ID(2) + flags(1)
    let flags = rd.read_uint(3);
    if flags & 0x80 != 0 {
        rd.skip(2); // dependsOnESID
    }
    if flags & 0x40 != 0 {
        let url_len = rd.read_uint(1);
        rd.skip(url_len as u64);
    }
    if flags & 0x20 != 0 {
        rd.skip(2); // OCRESID
    }
}

/// Decode the decoder-config descriptor: object type, stream type and
/// average bitrate.
pub(crate) fn parse_decoder_config<R: Read + Seek>(rd: &mut BoundedReader<R>, tr: &mut Track) {
    tr.object_type = rd.read_uint(1) as u8;
    tr.stream_type = (rd.read_uint(1) >> 2) as u8;
    rd.skip(3 + 4); // bufferSizeDB, maxBitrate
    tr.avg_bitrate = rd.read_uint(4);
}

/// Decode the decoder-specific-info descriptor: its raw payload becomes the
/// track's decoder configuration, unless one is already set (an avcC earlier
/// in the track wins).
pub(crate) fn parse_decoder_info<R: Read + Seek>(
    rd: &mut BoundedReader<R>,
    tr: &mut Track,
) -> DemuxResult<()> {
    if tr.decoder_config.is_none() && rd.remaining() > 0 {
        tr.decoder_config = DecoderConfig::Raw(rd.read_remaining()?);
    }
    Ok(())
}
