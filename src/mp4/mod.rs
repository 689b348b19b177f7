pub mod fourcc;
pub use fourcc::FourCc;
pub mod movie;
pub use movie::{
    object_type_description, stream_type_description, DecoderConfig, Movie, SampleDescription,
    SampleToChunk, Tags, Track, TrackKind,
};
pub mod demux;
pub use demux::MAX_BOX_DEPTH;
pub mod samples;
pub use samples::SampleLocation;
pub mod avcc;
pub use avcc::ParameterSetKind;
mod esds;
mod mdhd;
mod mvhd;
mod stco;
mod stsc;
mod stsd;
mod stsz;
mod stts;
mod udta;
