//! The in-memory index built by one parsing pass.

use serde::Serialize;

use super::fourcc::{self, FourCc};

/// A parsed movie: the per-track sample index plus file-level metadata.
///
/// Immutable once built; safe for unsynchronized concurrent readers.
#[derive(Debug, Default)]
pub struct Movie {
    /// Tracks in box order.
    pub tracks: Vec<Track>,
    /// Ticks per second for the movie duration.
    pub timescale: u32,
    /// Movie duration in timescale ticks.
    pub duration: u64,
    /// Optional free-text tags.
    pub tags: Tags,
}

impl Movie {
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

/// Free-text metadata tags, stored raw without re-encoding.
/// Each is captured from the first matching tag box only.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Tags {
    pub title: Option<Vec<u8>>,
    pub artist: Option<Vec<u8>>,
    pub album: Option<Vec<u8>>,
    pub year: Option<Vec<u8>>,
    pub comment: Option<Vec<u8>>,
    pub genre: Option<Vec<u8>>,
}

/// One run of the sample-to-chunk map: chunks numbered `first_chunk`
/// (1-based) and up hold `samples_per_chunk` samples each, until the next run
/// takes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleToChunk {
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
}

/// Coarse track classification derived from the handler type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackKind {
    Audio,
    Video,
    Other,
}

/// Stream parameters from the track's sample-entry box.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SampleDescription {
    #[default]
    None,
    Audio {
        channel_count: u16,
        sample_rate: u32,
    },
    Video {
        width: u16,
        height: u16,
    },
}

/// Codec initialization data, keyed by the codec family that produced it.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum DecoderConfig {
    #[default]
    None,
    /// AVC parameter sets, re-serialized as a packed list: for sequence then
    /// picture sets, one count byte followed by 16-bit length-prefixed
    /// entries.
    Avc(Vec<u8>),
    /// Raw decoder-specific-info bytes from the elementary-stream descriptor.
    Raw(Vec<u8>),
}

impl DecoderConfig {
    pub fn is_none(&self) -> bool {
        matches!(self, DecoderConfig::None)
    }

    /// The opaque initialization bytes, whatever the codec family.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            DecoderConfig::None => None,
            DecoderConfig::Avc(blob) | DecoderConfig::Raw(blob) => Some(blob),
        }
    }
}

/// One audio/video/systems stream and its sample index.
#[derive(Debug, Default)]
pub struct Track {
    /// Number of samples declared by the sample-size table.
    pub sample_count: u32,
    /// Per-sample byte sizes; length equals `sample_count`.
    pub entry_sizes: Vec<u32>,
    /// Per-sample decode timestamps, a prefix sum of `durations`.
    pub timestamps: Vec<u32>,
    /// Per-sample durations in track timescale ticks.
    pub durations: Vec<u32>,
    /// Sample-to-chunk runs, ascending by `first_chunk`.
    pub sample_to_chunk: Vec<SampleToChunk>,
    /// File offset of each chunk's first payload byte.
    pub chunk_offsets: Vec<u64>,
    /// Codec initialization data.
    pub decoder_config: DecoderConfig,
    /// Raw handler type code from the hdlr box.
    pub handler: FourCc,
    /// Object type code from the decoder-config descriptor (or avcC).
    pub object_type: u8,
    /// Stream type code from the decoder-config descriptor.
    pub stream_type: u8,
    /// ISO 639-2/T language letters from the media header.
    pub language: [u8; 3],
    /// Average bitrate in bits per second, if declared.
    pub avg_bitrate: u32,
    /// Ticks per second for this track's timestamps.
    pub timescale: u32,
    /// Track duration in timescale ticks.
    pub duration: u64,
    /// Audio or video parameters from the sample entry.
    pub media: SampleDescription,
}

impl Track {
    pub fn kind(&self) -> TrackKind {
        match self.handler {
            fourcc::HANDLER_AUDIO => TrackKind::Audio,
            fourcc::HANDLER_VIDEO => TrackKind::Video,
            _ => TrackKind::Other,
        }
    }

    /// The language code as text, when the media header carried one.
    pub fn language_code(&self) -> Option<&str> {
        if self.language.iter().all(u8::is_ascii_lowercase) {
            std::str::from_utf8(&self.language).ok()
        } else {
            None
        }
    }
}

/// Name an ISO/IEC 14496 stream type code.
pub fn stream_type_description(stream_type: u8) -> &'static str {
    match stream_type {
        0x00 => "Forbidden",
        0x01 => "ObjectDescriptorStream",
        0x02 => "ClockReferenceStream",
        0x03 => "SceneDescriptionStream",
        0x04 => "VisualStream",
        0x05 => "AudioStream",
        0x06 => "MPEG7Stream",
        0x07 => "IPMPStream",
        0x08 => "ObjectContentInfoStream",
        0x09 => "MPEGJStream",
        0x20..=0x3F => "User private",
        _ => "Reserved for ISO use",
    }
}

/// Name an ISO/IEC 14496 object type code.
pub fn object_type_description(object_type: u8) -> &'static str {
    match object_type {
        0x00 => "Forbidden",
        0x01 | 0x02 => "Systems ISO/IEC 14496-1",
        0x20 => "Visual ISO/IEC 14496-2",
        0x21 => "Visual ISO/IEC 14496-10",
        0x22 => "Visual ISO/IEC 14496-10 Parameter Sets",
        0x40 => "Audio ISO/IEC 14496-3",
        0x60 => "Visual ISO/IEC 13818-2 Simple Profile",
        0x61 => "Visual ISO/IEC 13818-2 Main Profile",
        0x62 => "Visual ISO/IEC 13818-2 SNR Profile",
        0x63 => "Visual ISO/IEC 13818-2 Spatial Profile",
        0x64 => "Visual ISO/IEC 13818-2 High Profile",
        0x65 => "Visual ISO/IEC 13818-2 422 Profile",
        0x66 => "Audio ISO/IEC 13818-7 Main Profile",
        0x67 => "Audio ISO/IEC 13818-7 LC Profile",
        0x68 => "Audio ISO/IEC 13818-7 SSR Profile",
        0x69 => "Audio ISO/IEC 13818-3",
        0x6A => "Visual ISO/IEC 11172-2",
        0x6B => "Audio ISO/IEC 11172-3",
        0x6C => "Visual ISO/IEC 10918-1",
        0xFF => "no object type specified",
        0xC0..=0xFE => "User private",
        _ => "Reserved for ISO use",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_kind_from_handler() {
        let mut tr = Track {
            handler: fourcc::HANDLER_AUDIO,
            ..Track::default()
        };
        assert_eq!(tr.kind(), TrackKind::Audio);
        tr.handler = fourcc::HANDLER_VIDEO;
        assert_eq!(tr.kind(), TrackKind::Video);
        tr.handler = fourcc::fourcc(b"hint");
        assert_eq!(tr.kind(), TrackKind::Other);
    }

    #[test]
    fn test_language_code() {
        let tr = Track {
            language: *b"eng",
            ..Track::default()
        };
        assert_eq!(tr.language_code(), Some("eng"));
        let unset = Track::default();
        assert_eq!(unset.language_code(), None);
    }

    #[test]
    fn test_type_code_descriptions() {
        assert_eq!(stream_type_description(0x05), "AudioStream");
        assert_eq!(stream_type_description(0x25), "User private");
        assert_eq!(object_type_description(0x21), "Visual ISO/IEC 14496-10");
        assert_eq!(object_type_description(0x10), "Reserved for ISO use");
    }
}
