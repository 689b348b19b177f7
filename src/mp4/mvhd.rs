use crate::bits::reader::BoundedReader;
use crate::mp4::movie::Movie;
use std::io::{Read, Seek};

/// Decode the movie header box (mvhd): overall timescale and duration.
///
/// Version 1 stores 64-bit creation/modification times and duration; version
/// 0 stores 32 bits of each. Only timescale and duration are kept.
pub(crate) fn parse<R: Read + Seek>(rd: &mut BoundedReader<R>, movie: &mut Movie, version: u8) {
    // creation_time + modification_time
    rd.skip(if version == 1 { 8 + 8 } else { 4 + 4 });
    movie.timescale = rd.read_uint(4);
    movie.duration = if version == 1 {
        rd.read_u64()
    } else {
        rd.read_uint(4) as u64
    };
    // rate, volume, reserved, matrix, pre_defined, next_track_ID
    rd.skip(4 + 2 + 2 + 4 * 2 + 4 * 9 + 4 * 6 + 4);
}
