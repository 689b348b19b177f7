use crate::bits::reader::BoundedReader;
use crate::mp4::movie::Track;
use std::io::{Read, Seek};

/// Decode the media header box (mdhd): track timescale, duration and
/// language.
///
/// The language is a 15-bit packed ISO 639-2/T code, three 5-bit groups each
/// offset by 0x60 into lowercase ASCII. The rest of the box is skipped by the
/// traversal engine.
pub(crate) fn parse<R: Read + Seek>(rd: &mut BoundedReader<R>, tr: &mut Track, version: u8) {
    rd.skip(if version == 1 { 8 + 8 } else { 4 + 4 });
    tr.timescale = rd.read_uint(4);
    tr.duration = if version == 1 {
        rd.read_u64()
    } else {
        rd.read_uint(4) as u64
    };

    let mut packed = rd.read_uint(2);
    tr.language[2] = (packed & 31) as u8 + 0x60;
    packed >>= 5;
    tr.language[1] = (packed & 31) as u8 + 0x60;
    packed >>= 5;
    tr.language[0] = (packed & 31) as u8 + 0x60;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_language_unpacking() {
        let mut payload = vec![0u8; 8];
        payload.extend_from_slice(&48000u32.to_be_bytes());
        payload.extend_from_slice(&96000u32.to_be_bytes());
        // 0x15C7 packs "eng": 00101 01110 00111
        payload.extend_from_slice(&0x15C7u16.to_be_bytes());
        payload.extend_from_slice(&[0u8; 2]); // pre_defined
        let mut cur = Cursor::new(payload.clone());
        let mut rd = BoundedReader::new(&mut cur, payload.len() as u64);
        let mut tr = Track::default();
        parse(&mut rd, &mut tr, 0);
        assert_eq!(tr.timescale, 48000);
        assert_eq!(tr.duration, 96000);
        assert_eq!(&tr.language, b"eng");
        assert_eq!(tr.language_code(), Some("eng"));
    }
}
