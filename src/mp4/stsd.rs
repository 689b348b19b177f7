//! Sample-entry decoders for the boxes nested under stsd.
//!
//! All entries start with the fixed SampleEntry layout: six reserved bytes
//! and a 2-byte data reference index. Audio and video entries carry a few
//! useful fields inside otherwise fixed-layout headers; everything after the
//! captured fields is skipped and any child boxes (avcC, esds, btrt) are
//! picked up by the traversal engine.

use crate::bits::reader::BoundedReader;
use crate::mp4::movie::{SampleDescription, Track};
use std::io::{Read, Seek};

/// Decode an audio sample entry (mp4a): channel count and sample rate.
pub(crate) fn parse_audio_entry<R: Read + Seek>(rd: &mut BoundedReader<R>, tr: &mut Track) {
    rd.skip(6 + 2); // SampleEntry
    rd.skip(4 * 2); // reserved
    let channel_count = rd.read_uint(2) as u16;
    rd.skip(2 + 2 + 2); // samplesize, pre_defined, reserved
    // 16.16 fixed point; the fractional half is never meaningful
    let sample_rate = rd.read_uint(4) >> 16;
    tr.media = SampleDescription::Audio {
        channel_count,
        sample_rate,
    };
}

/// Decode a visual sample entry (mp4v, avc1 and the Hap subtypes): width and
/// height.
pub(crate) fn parse_visual_entry<R: Read + Seek>(rd: &mut BoundedReader<R>, tr: &mut Track) {
    rd.skip(6 + 2); // SampleEntry
    rd.skip(2 + 2 + 4 * 3); // pre_defined, reserved, pre_defined
    let width = rd.read_uint(2) as u16;
    let height = rd.read_uint(2) as u16;
    // resolutions, reserved, frame_count, compressorname, depth, pre_defined
    rd.skip(4 + 4 + 4 + 2 + 32 + 2 + 2);
    tr.media = SampleDescription::Video { width, height };
}

/// Decode a private-stream sample entry (mp4s); only the base header is
/// consumed so the esds child can follow.
pub(crate) fn parse_private_entry<R: Read + Seek>(rd: &mut BoundedReader<R>) {
    rd.skip(6 + 2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_audio_entry_fields() {
        let mut payload = vec![0u8; 16];
        payload.extend_from_slice(&2u16.to_be_bytes()); // channels
        payload.extend_from_slice(&[0u8; 6]);
        payload.extend_from_slice(&(44100u32 << 16).to_be_bytes());
        let mut cur = Cursor::new(payload.clone());
        let mut rd = BoundedReader::new(&mut cur, payload.len() as u64);
        let mut tr = Track::default();
        parse_audio_entry(&mut rd, &mut tr);
        assert_eq!(
            tr.media,
            SampleDescription::Audio {
                channel_count: 2,
                sample_rate: 44100
            }
        );
    }

    #[test]
    fn test_visual_entry_fields() {
        let mut payload = vec![0u8; 24];
        payload.extend_from_slice(&1920u16.to_be_bytes());
        payload.extend_from_slice(&1080u16.to_be_bytes());
        payload.extend_from_slice(&[0u8; 50]);
        let mut cur = Cursor::new(payload.clone());
        let mut rd = BoundedReader::new(&mut cur, payload.len() as u64);
        let mut tr = Track::default();
        parse_visual_entry(&mut rd, &mut tr);
        assert_eq!(
            tr.media,
            SampleDescription::Video {
                width: 1920,
                height: 1080
            }
        );
        assert_eq!(rd.remaining(), 0);
    }
}
