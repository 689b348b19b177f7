pub mod bits;
pub use bits::reader::BoundedReader;

pub mod mp4;
pub use mp4::{
    DecoderConfig, Movie, ParameterSetKind, SampleDescription, SampleLocation, SampleToChunk,
    Tags, Track, TrackKind, MAX_BOX_DEPTH,
};

pub mod streams;
pub use streams::{LocalSeekableStream, SeekableStream};

pub mod errors;
pub use errors::{DemuxError, DemuxResult, ParseError};

use std::path::Path;

/// Parse a local file and build its sample index.
pub fn read_movie<P: AsRef<Path>>(path: P) -> DemuxResult<Movie> {
    let mut stream = LocalSeekableStream::open(path)?;
    Movie::read_from(&mut stream)
}
