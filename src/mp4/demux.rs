//! The box traversal engine: one forward pass that builds the index.
//!
//! Nesting is tracked with an explicit fixed-capacity stack of payload
//! budgets, so a hostile depth overflows into an ordinary error instead of
//! the call stack. Two framings share the walk: standard size+fourcc boxes,
//! and tag+base-128-length descriptors inside the esds subtree.

use crate::bits::reader::{read_u32_be, read_u64_be, read_u8, BoundedReader};
use crate::errors::{DemuxError, DemuxResult, ParseError};
use crate::mp4::fourcc::{self, FourCc};
use crate::mp4::movie::{Movie, Track};
use crate::mp4::{avcc, esds, mdhd, mvhd, stco, stsc, stsd, stsz, stts, udta};
use crate::streams::SeekableStream;
use log::{debug, trace};
use std::io::SeekFrom;

/// Maximum box nesting level before the parse is abandoned.
pub const MAX_BOX_DEPTH: usize = 64;

/// How the children of the current frame are framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Framing {
    /// 4-byte size + 4-byte fourcc, with optional 64-bit size extension.
    Box,
    /// 1-byte tag + base-128 length (elementary-stream descriptors).
    Descriptor,
}

#[derive(Clone, Copy)]
struct BoxFrame {
    remaining: u64,
    framing: Framing,
}

/// Boxes carrying a version+flags word, their highest supported version,
/// and whether they require an open track.
struct FullBoxSpec {
    name: FourCc,
    max_version: u8,
    needs_track: bool,
}

#[rustfmt::skip]
const FULL_BOXES: [FullBoxSpec; 13] = [
    FullBoxSpec { name: fourcc::MDHD, max_version: 1, needs_track: true },
    FullBoxSpec { name: fourcc::MVHD, max_version: 1, needs_track: false },
    FullBoxSpec { name: fourcc::HDLR, max_version: 0, needs_track: false },
    FullBoxSpec { name: fourcc::META, max_version: 0, needs_track: false },
    FullBoxSpec { name: fourcc::STTS, max_version: 0, needs_track: false },
    FullBoxSpec { name: fourcc::CTTS, max_version: 0, needs_track: false },
    FullBoxSpec { name: fourcc::STZ2, max_version: 0, needs_track: true },
    FullBoxSpec { name: fourcc::STSZ, max_version: 0, needs_track: true },
    FullBoxSpec { name: fourcc::STSC, max_version: 0, needs_track: true },
    FullBoxSpec { name: fourcc::STCO, max_version: 0, needs_track: true },
    FullBoxSpec { name: fourcc::CO64, max_version: 0, needs_track: true },
    FullBoxSpec { name: fourcc::STSD, max_version: 0, needs_track: false },
    // esds does not use the track itself but its descriptors do; checking
    // here keeps the descriptor decoders free of the concern
    FullBoxSpec { name: fourcc::ESDS, max_version: 0, needs_track: true },
];

/// Boxes the parser descends into instead of skipping.
struct ContainerSpec {
    name: FourCc,
    framing: Framing,
}

#[rustfmt::skip]
const CONTAINERS: [ContainerSpec; 19] = [
    ContainerSpec { name: fourcc::ESDS, framing: Framing::Descriptor },
    ContainerSpec { name: fourcc::OD_ES, framing: Framing::Descriptor },
    ContainerSpec { name: fourcc::OD_DECODER_CONFIG, framing: Framing::Descriptor },
    ContainerSpec { name: fourcc::OD_DECODER_INFO, framing: Framing::Descriptor },
    ContainerSpec { name: fourcc::TRAK, framing: Framing::Box },
    ContainerSpec { name: fourcc::MOOV, framing: Framing::Box },
    ContainerSpec { name: fourcc::MDIA, framing: Framing::Box },
    ContainerSpec { name: fourcc::TREF, framing: Framing::Box },
    ContainerSpec { name: fourcc::MINF, framing: Framing::Box },
    ContainerSpec { name: fourcc::DINF, framing: Framing::Box },
    ContainerSpec { name: fourcc::STBL, framing: Framing::Box },
    ContainerSpec { name: fourcc::STSD, framing: Framing::Box },
    ContainerSpec { name: fourcc::MP4A, framing: Framing::Box },
    ContainerSpec { name: fourcc::MP4S, framing: Framing::Box },
    ContainerSpec { name: fourcc::MP4V, framing: Framing::Box },
    ContainerSpec { name: fourcc::AVC1, framing: Framing::Box },
    ContainerSpec { name: fourcc::UDTA, framing: Framing::Box },
    ContainerSpec { name: fourcc::META, framing: Framing::Box },
    ContainerSpec { name: fourcc::ILST, framing: Framing::Box },
];

impl Movie {
    /// Parse the stream as an ISO media file and build the sample index.
    ///
    /// The stream is rewound to offset 0 before parsing and again on return,
    /// whether the parse succeeded or not. During the pass the cursor only
    /// moves forward. A structural error at the top level ends parsing
    /// gracefully with whatever tracks were found; a file with no tracks at
    /// all is an error.
    pub fn read_from<S: SeekableStream>(stream: &mut S) -> DemuxResult<Movie> {
        let result = parse(stream);
        let _ = stream.seek(SeekFrom::Start(0));
        result
    }
}

macro_rules! structural {
    ($depth:expr, $msg:expr) => {
        if $depth == 0 {
            debug!("stopping at top-level structural error: {}", $msg);
            break;
        } else {
            return Err(ParseError::new($msg).into());
        }
    };
}

fn parse<S: SeekableStream>(stream: &mut S) -> DemuxResult<Movie> {
    let file_size = stream.seek(SeekFrom::End(0))?;
    stream.seek(SeekFrom::Start(0))?;

    let mut movie = Movie::default();
    let mut stack = [BoxFrame {
        remaining: 0,
        framing: Framing::Box,
    }; MAX_BOX_DEPTH];
    let mut depth = 0usize;
    let mut current_track: Option<usize> = None;
    // hdlr boxes are only meaningful inside mdia, not under meta
    let mut in_media = false;
    let mut end_of_stream = false;

    while !end_of_stream {
        let mut box_name: FourCc;
        let mut box_bytes: u64;
        let mut payload: u64;
        let mut header_bytes: u64;
        let mut version = 0u8;

        if stack[depth].framing == Framing::Box {
            let size32 = match read_u32_be(stream) {
                Ok(v) => v,
                Err(_) => break, // normal exit
            };
            if (2..8).contains(&size32) {
                structural!(depth, format!("invalid box size {} (broken file?)", size32));
            }
            box_name = match read_u32_be(stream) {
                Ok(v) => v,
                Err(_) => break,
            };
            header_bytes = 8;

            box_bytes = if size32 == 0 || size32 == 0xFFFF_FFFF {
                // extends to the end of the enclosing scope
                u64::MAX
            } else {
                size32 as u64
            };
            if size32 == 1 {
                box_bytes = match read_u64_be(stream) {
                    Ok(v) => v,
                    Err(_) => break,
                };
                if box_bytes < 16 {
                    structural!(
                        depth,
                        format!("invalid extended box size {} (broken file?)", box_bytes)
                    );
                }
                header_bytes = 16;
            }
            payload = box_bytes.saturating_sub(header_bytes);

            if let Some(full) = FULL_BOXES.iter().find(|f| f.name == box_name) {
                let mut vr = BoundedReader::new(&mut *stream, payload);
                let version_flags = vr.read_uint(4);
                payload = vr.remaining();
                if vr.is_at_end() {
                    end_of_stream = true;
                }
                header_bytes += 4;
                version = (version_flags >> 24) as u8;
                if version > full.max_version {
                    structural!(
                        depth,
                        format!(
                            "unsupported version {} of box {}",
                            version,
                            fourcc::display(box_name)
                        )
                    );
                }
                if full.needs_track && current_track.is_none() {
                    structural!(
                        depth,
                        format!(
                            "track-scoped box {} with no open track",
                            fourcc::display(box_name)
                        )
                    );
                }
            }
        } else {
            // descriptor framing: 1-byte tag, base-128 length
            let tag = match read_u8(stream) {
                Ok(v) => v,
                Err(_) => break,
            };
            box_name = fourcc::OD_BASE + tag as u32;
            header_bytes = 1;
            payload = 0;
            let mut length_done = false;
            while !length_done {
                let Ok(b) = read_u8(stream) else {
                    // descriptor frames only exist below the top level, so
                    // running out of header bytes is always fatal
                    return Err(ParseError::new("premature end of descriptor header").into());
                };
                header_bytes += 1;
                payload = (payload << 7) | (b & 0x7F) as u64;
                length_done = b & 0x80 == 0;
            }
            box_bytes = header_bytes.saturating_add(payload);
        }

        trace!(
            "depth {} box {} ({} bytes)",
            depth,
            fourcc::display(box_name),
            box_bytes
        );

        // A child claiming more than its parent has left is a known encoder
        // defect: clamp it to the parent budget and treat it as opaque.
        if depth > 0 {
            if box_bytes > stack[depth].remaining {
                debug!(
                    "box {} overruns its parent, truncating {} to {} bytes",
                    fourcc::display(box_name),
                    box_bytes,
                    stack[depth].remaining
                );
                box_bytes = stack[depth].remaining;
                box_name = 0;
                payload = box_bytes.saturating_sub(header_bytes);
            }
            stack[depth].remaining -= box_bytes;
        }

        let step: DemuxResult<()> = {
            let mut rd = BoundedReader::new(&mut *stream, payload);
            let result = match box_name {
                fourcc::STSZ | fourcc::STZ2 => current_track_mut(&mut movie, current_track)
                    .and_then(|tr| stsz::parse(&mut rd, box_name == fourcc::STZ2, tr)),
                fourcc::STSC => current_track_mut(&mut movie, current_track)
                    .and_then(|tr| stsc::parse(&mut rd, tr)),
                fourcc::STTS => current_track_mut(&mut movie, current_track)
                    .and_then(|tr| stts::parse(&mut rd, tr)),
                fourcc::CTTS => {
                    stts::parse_composition_offsets(&mut rd);
                    Ok(())
                }
                fourcc::STCO | fourcc::CO64 => current_track_mut(&mut movie, current_track)
                    .and_then(|tr| stco::parse(&mut rd, box_name == fourcc::CO64, tr)),
                fourcc::MVHD => {
                    mvhd::parse(&mut rd, &mut movie, version);
                    Ok(())
                }
                fourcc::MDHD => current_track_mut(&mut movie, current_track)
                    .map(|tr| mdhd::parse(&mut rd, tr, version)),
                fourcc::MDIA => {
                    in_media = true;
                    Ok(())
                }
                fourcc::MINF => {
                    in_media = false;
                    Ok(())
                }
                fourcc::HDLR => {
                    // under meta the handler describes the metadata, not a track
                    if in_media {
                        if let Some(n) = current_track {
                            rd.skip(4); // pre_defined
                            movie.tracks[n].handler = rd.read_uint(4);
                        }
                    }
                    Ok(())
                }
                fourcc::BTRT => current_track_mut(&mut movie, current_track).map(|tr| {
                    rd.skip(4 + 4); // bufferSizeDB, maxBitrate
                    tr.avg_bitrate = rd.read_uint(4);
                }),
                fourcc::STSD => {
                    // entry_count; the sample entries follow as child boxes
                    rd.skip(4);
                    Ok(())
                }
                fourcc::MP4A => current_track_mut(&mut movie, current_track)
                    .map(|tr| stsd::parse_audio_entry(&mut rd, tr)),
                fourcc::MP4V
                | fourcc::AVC1
                | fourcc::HAP1
                | fourcc::HAP5
                | fourcc::HAPY
                | fourcc::HAPM
                | fourcc::HAPA => current_track_mut(&mut movie, current_track)
                    .map(|tr| stsd::parse_visual_entry(&mut rd, tr)),
                fourcc::MP4S => current_track_mut(&mut movie, current_track)
                    .map(|_| stsd::parse_private_entry(&mut rd)),
                fourcc::AVCC => current_track_mut(&mut movie, current_track)
                    .and_then(|tr| avcc::parse(&mut rd, tr)),
                fourcc::OD_ES => {
                    esds::parse_es_descriptor(&mut rd);
                    Ok(())
                }
                fourcc::OD_DECODER_CONFIG => current_track_mut(&mut movie, current_track)
                    .map(|tr| esds::parse_decoder_config(&mut rd, tr)),
                fourcc::OD_DECODER_INFO => current_track_mut(&mut movie, current_track)
                    .and_then(|tr| esds::parse_decoder_info(&mut rd, tr)),
                fourcc::TAG_TITLE => udta::parse_tag(&mut rd, &mut movie.tags.title),
                fourcc::TAG_ARTIST => udta::parse_tag(&mut rd, &mut movie.tags.artist),
                fourcc::TAG_ALBUM => udta::parse_tag(&mut rd, &mut movie.tags.album),
                fourcc::TAG_YEAR => udta::parse_tag(&mut rd, &mut movie.tags.year),
                fourcc::TAG_COMMENT => udta::parse_tag(&mut rd, &mut movie.tags.comment),
                fourcc::TAG_GENRE => udta::parse_tag(&mut rd, &mut movie.tags.genre),
                _ => Ok(()),
            };
            payload = rd.remaining();
            if rd.is_at_end() {
                end_of_stream = true;
            }
            result
        };
        if let Err(err) = step {
            if depth == 0 {
                debug!("stopping at top-level structural error: {}", err);
                break;
            }
            return Err(err);
        }

        if box_name == fourcc::TRAK {
            movie.tracks.push(Track::default());
            current_track = Some(movie.tracks.len() - 1);
        } else if box_name == fourcc::META {
            current_track = None;
        }

        if let Some(container) = CONTAINERS.iter().find(|c| c.name == box_name) {
            depth += 1;
            if depth >= MAX_BOX_DEPTH {
                structural!(depth, "box nesting too deep");
            }
            stack[depth] = BoxFrame {
                remaining: payload,
                framing: container.framing,
            };
        } else if payload > file_size {
            // an until-end-of-file payload, or a size no skip can satisfy
            end_of_stream = true;
        } else if payload > 0 && stream.seek(SeekFrom::Current(payload as i64)).is_err() {
            end_of_stream = true;
        }

        // close finished boxes; frame 0 stands for the whole file
        while depth > 0 && stack[depth].remaining == 0 {
            depth -= 1;
        }
    }

    if movie.tracks.is_empty() {
        return Err(ParseError::new("no tracks found").into());
    }
    Ok(movie)
}

fn current_track_mut(movie: &mut Movie, index: Option<usize>) -> DemuxResult<&mut Track> {
    index
        .and_then(|n| movie.tracks.get_mut(n))
        .ok_or_else(|| DemuxError::Parse(ParseError::new("track-scoped box with no open track")))
}
