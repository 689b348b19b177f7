//! AVC decoder configuration record (avcC) handling.
//!
//! The record's two parameter-set categories are re-serialized into one
//! self-describing blob: for sequence sets then picture sets, a count byte
//! followed by a 2-byte big-endian length and the raw bytes of each entry.
//! The blob is what callers feed to a decoder; indexed access goes through
//! [`DecoderConfig::parameter_set`].

use crate::bits::reader::BoundedReader;
use crate::errors::{DemuxResult, ParseError};
use crate::mp4::fourcc::OBJECT_TYPE_AVC;
use crate::mp4::movie::{DecoderConfig, Track};
use std::io::{Read, Seek};

/// Which parameter-set category to access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSetKind {
    /// Sequence parameter sets (SPS).
    Sequence,
    /// Picture parameter sets (PPS).
    Picture,
}

/// Decode an avcC box into the track's decoder configuration.
pub(crate) fn parse<R: Read + Seek>(rd: &mut BoundedReader<R>, tr: &mut Track) -> DemuxResult<()> {
    tr.object_type = OBJECT_TYPE_AVC;

    let _configuration_version = rd.read_uint(1);
    let _profile_indication = rd.read_uint(1);
    let _profile_compatibility = rd.read_uint(1);
    let _level_indication = rd.read_uint(1);
    let _length_size_minus_one = rd.read_uint(1) & 3;

    let mut blob = Vec::new();
    for category in 0..2 {
        let mut count = rd.read_uint(1);
        if category == 0 {
            count &= 31; // SPS count shares its byte with 3 reserved bits
        }
        blob.push(count as u8);
        for _ in 0..count {
            let len = rd.read_uint(2);
            blob.try_reserve(2 + len as usize)
                .map_err(|_| ParseError::new("out of memory copying parameter sets"))?;
            blob.extend_from_slice(&(len as u16).to_be_bytes());
            for _ in 0..len {
                blob.push(rd.read_uint(1) as u8);
            }
        }
    }

    tr.decoder_config = DecoderConfig::Avc(blob);
    Ok(())
}

impl DecoderConfig {
    /// Return the parameter set with the given index, or `None` when the
    /// index is out of range, the blob is malformed, or the track's codec
    /// family has no parameter sets.
    pub fn parameter_set(&self, kind: ParameterSetKind, index: usize) -> Option<&[u8]> {
        let DecoderConfig::Avc(blob) = self else {
            return None;
        };
        let mut pos = 0usize;
        if kind == ParameterSetKind::Picture {
            let count = *blob.get(pos)? as usize;
            pos = skip_entries(blob, pos + 1, count)?;
        }
        let count = *blob.get(pos)? as usize;
        pos += 1;
        if index >= count {
            return None;
        }
        pos = skip_entries(blob, pos, index)?;
        let len = u16::from_be_bytes([*blob.get(pos)?, *blob.get(pos + 1)?]) as usize;
        blob.get(pos + 2..pos + 2 + len)
    }
}

impl Track {
    /// Convenience accessor for [`DecoderConfig::parameter_set`].
    pub fn parameter_set(&self, kind: ParameterSetKind, index: usize) -> Option<&[u8]> {
        self.decoder_config.parameter_set(kind, index)
    }
}

/// Walk `n` length-prefixed entries starting at `pos`, returning the
/// position just past them. `None` if the walk runs past the blob.
fn skip_entries(blob: &[u8], mut pos: usize, n: usize) -> Option<usize> {
    for _ in 0..n {
        let len = u16::from_be_bytes([*blob.get(pos)?, *blob.get(pos + 1)?]) as usize;
        pos = pos.checked_add(2 + len)?;
    }
    (pos <= blob.len()).then_some(pos)
}
