//! Four-character box type codes and descriptor tags.

/// A 4-byte box type code, stored big-endian as one integer.
pub type FourCc = u32;

/// Build a `FourCc` from its four ASCII bytes.
pub const fn fourcc(name: &[u8; 4]) -> FourCc {
    u32::from_be_bytes(*name)
}

/// Render a type code for log and error messages.
pub fn display(name: FourCc) -> String {
    String::from_utf8_lossy(&name.to_be_bytes()).into_owned()
}

// Containers
pub const MOOV: FourCc = fourcc(b"moov");
pub const TRAK: FourCc = fourcc(b"trak");
pub const MDIA: FourCc = fourcc(b"mdia");
pub const TREF: FourCc = fourcc(b"tref");
pub const MINF: FourCc = fourcc(b"minf");
pub const DINF: FourCc = fourcc(b"dinf");
pub const STBL: FourCc = fourcc(b"stbl");
pub const UDTA: FourCc = fourcc(b"udta");
pub const META: FourCc = fourcc(b"meta");
pub const ILST: FourCc = fourcc(b"ilst");

// Headers
pub const MVHD: FourCc = fourcc(b"mvhd");
pub const MDHD: FourCc = fourcc(b"mdhd");
pub const HDLR: FourCc = fourcc(b"hdlr");
pub const BTRT: FourCc = fourcc(b"btrt");

// Sample table
pub const STSD: FourCc = fourcc(b"stsd");
pub const STSZ: FourCc = fourcc(b"stsz");
pub const STZ2: FourCc = fourcc(b"stz2");
pub const STSC: FourCc = fourcc(b"stsc");
pub const STCO: FourCc = fourcc(b"stco");
pub const CO64: FourCc = fourcc(b"co64");
pub const STTS: FourCc = fourcc(b"stts");
pub const CTTS: FourCc = fourcc(b"ctts");

// Sample entries and codec configuration
pub const MP4A: FourCc = fourcc(b"mp4a");
pub const MP4S: FourCc = fourcc(b"mp4s");
pub const MP4V: FourCc = fourcc(b"mp4v");
pub const AVC1: FourCc = fourcc(b"avc1");
pub const AVCC: FourCc = fourcc(b"avcC");
pub const ESDS: FourCc = fourcc(b"esds");

// Hap video sample-entry subtypes
pub const HAP1: FourCc = fourcc(b"Hap1");
pub const HAP5: FourCc = fourcc(b"Hap5");
pub const HAPY: FourCc = fourcc(b"HapY");
pub const HAPM: FourCc = fourcc(b"HapM");
pub const HAPA: FourCc = fourcc(b"HapA");

// iTunes-style metadata tag boxes (0xA9 prefix)
pub const TAG_ALBUM: FourCc = fourcc(b"\xa9alb");
pub const TAG_ARTIST: FourCc = fourcc(b"\xa9ART");
pub const TAG_TITLE: FourCc = fourcc(b"\xa9nam");
pub const TAG_YEAR: FourCc = fourcc(b"\xa9day");
pub const TAG_COMMENT: FourCc = fourcc(b"\xa9cmt");
pub const TAG_GENRE: FourCc = fourcc(b"\xa9gen");

// Elementary-stream descriptor tags are a single byte on the wire; they are
// offset into four-character space so one dispatch table covers both framings.
pub const OD_BASE: FourCc = fourcc(b"$$$0");
pub const OD_ES: FourCc = OD_BASE + 0x03;
pub const OD_DECODER_CONFIG: FourCc = OD_BASE + 0x04;
pub const OD_DECODER_INFO: FourCc = OD_BASE + 0x05;

// Handler types
pub const HANDLER_VIDEO: FourCc = fourcc(b"vide");
pub const HANDLER_AUDIO: FourCc = fourcc(b"soun");

/// Object type code for AVC/H.264 elementary streams.
pub const OBJECT_TYPE_AVC: u8 = 0x21;
