//! Sample lookup over a finished index.

use serde::Serialize;

use crate::mp4::movie::{Movie, Track};

/// Where one sample lives in the file, and when it plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleLocation {
    /// Absolute file offset of the sample's first byte.
    pub offset: u64,
    /// Sample size in bytes.
    pub size: u32,
    /// Decode timestamp in track timescale ticks.
    pub timestamp: u32,
    /// Duration in track timescale ticks.
    pub duration: u32,
}

impl Track {
    /// Find the chunk holding `nsample` by walking the sample-to-chunk runs.
    ///
    /// Returns the chunk index and the track-wide index of that chunk's
    /// first sample. Tracks with at most one chunk resolve to chunk 0. The
    /// last run stays active for all chunks past its range.
    fn chunk_for_sample(&self, nsample: u32) -> Option<(usize, u32)> {
        if self.chunk_offsets.len() <= 1 {
            return Some((0, 0));
        }
        let mut run = 0usize;
        let mut total = 0u64;
        let mut first_in_chunk = 0u32;
        for chunk in 0..self.chunk_offsets.len() {
            // chunks are numbered starting with 1
            if run + 1 < self.sample_to_chunk.len()
                && chunk as u32 + 1 == self.sample_to_chunk[run + 1].first_chunk
            {
                run += 1;
            }
            total += self.sample_to_chunk.get(run)?.samples_per_chunk as u64;
            if (nsample as u64) < total {
                return Some((chunk, first_in_chunk));
            }
            first_in_chunk = total as u32;
        }
        None
    }

    /// Compute the byte range and timing of sample `nsample` (0-based).
    ///
    /// Read-only: may be called any number of times, concurrently, with no
    /// observable side effect. `None` when the sample is out of range or the
    /// index lacks the tables to resolve it.
    pub fn sample_location(&self, nsample: u32) -> Option<SampleLocation> {
        let (chunk, first_in_chunk) = self.chunk_for_sample(nsample)?;
        let mut offset = *self.chunk_offsets.get(chunk)?;
        for n in first_in_chunk..nsample {
            offset += *self.entry_sizes.get(n as usize)? as u64;
        }
        let size = *self.entry_sizes.get(nsample as usize)?;
        Some(SampleLocation {
            offset,
            size,
            timestamp: self.timestamps.get(nsample as usize).copied().unwrap_or(0),
            duration: self.durations.get(nsample as usize).copied().unwrap_or(0),
        })
    }
}

impl Movie {
    /// [`Track::sample_location`] addressed by track index.
    pub fn sample_location(&self, ntrack: usize, nsample: u32) -> Option<SampleLocation> {
        self.tracks.get(ntrack)?.sample_location(nsample)
    }
}
