use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// A seekable byte source the demuxer can parse
pub trait SeekableStream: Read + Seek {}

/// Local file wrapper
pub struct LocalSeekableStream(std::fs::File);
impl LocalSeekableStream {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(LocalSeekableStream(std::fs::File::open(path)?))
    }
}
impl Read for LocalSeekableStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}
impl Seek for LocalSeekableStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.0.seek(pos)
    }
}
impl SeekableStream for LocalSeekableStream {}

// In-memory buffers parse the same way files do
impl<T: AsRef<[u8]>> SeekableStream for Cursor<T> {}
