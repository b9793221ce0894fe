// Delimiter-aligned chunk partitioning.
//
// Divides a resource into N contiguous byte ranges whose interior
// boundaries land on the byte immediately after a delimiter occurrence.
// Downstream scanners bound to these ranges never need to coordinate:
// every range starts exactly at the first byte of a record.

use log::warn;

use crate::core::Delimiter;
use crate::error::{Error, Result};
use crate::source::{read_full_at, SourceHandle};

/// Default probe window read around each candidate boundary.
pub const DEFAULT_PROBE_WINDOW: usize = 8 * 1024;

/// Default number of probe rounds; the window doubles each round.
pub const DEFAULT_PROBE_ROUNDS: u32 = 4;

/// A contiguous half-open byte span of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: u64, end: u64) -> Result<ByteRange> {
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "range start {} exceeds end {}",
                start, end
            )));
        }
        Ok(ByteRange { start, end })
    }

    /// Length of the range in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Partitions a resource into delimiter-aligned chunks.
pub struct DelimitedChunkReader {
    delimiter: Delimiter,
    probe_window: usize,
    max_probe_rounds: u32,
}

impl DelimitedChunkReader {
    pub fn new(delimiter: Delimiter) -> DelimitedChunkReader {
        DelimitedChunkReader {
            delimiter,
            probe_window: DEFAULT_PROBE_WINDOW,
            max_probe_rounds: DEFAULT_PROBE_ROUNDS,
        }
    }

    /// Override the initial probe window size.
    pub fn probe_window(mut self, bytes: usize) -> Self {
        self.probe_window = bytes.max(self.delimiter.len());
        self
    }

    /// Override the number of probe rounds before falling back.
    pub fn max_probe_rounds(mut self, rounds: u32) -> Self {
        self.max_probe_rounds = rounds.max(1);
        self
    }

    /// Divide the resource into `chunks` contiguous delimiter-aligned ranges.
    ///
    /// The first range starts at 0 and the last ends at the resource size;
    /// adjacent ranges share their boundary offset. Fewer than `chunks`
    /// ranges come back when the resource is too small (or its delimiters
    /// too sparse) to support that many non-empty aligned ranges. An empty
    /// resource yields no ranges. Partitioning the same immutable resource
    /// with the same count again yields identical ranges.
    pub async fn partition(&self, source: &SourceHandle, chunks: usize) -> Result<Vec<ByteRange>> {
        if chunks == 0 {
            return Err(Error::InvalidArgument(
                "desired chunk count must be at least 1".into(),
            ));
        }
        let total = source.size().map_err(|source| Error::Io { offset: 0, source })?;
        if total == 0 {
            return Ok(Vec::new());
        }

        let ideal = total.div_ceil(chunks as u64);
        let mut bounds: Vec<u64> = Vec::with_capacity(chunks + 1);
        bounds.push(0);
        for k in 1..chunks as u64 {
            let candidate = k * ideal;
            if candidate >= total {
                break;
            }
            let prev = *bounds.last().unwrap();
            if candidate < prev {
                // The previous boundary snapped past this candidate; the
                // record spanning it belongs to the previous chunk.
                continue;
            }
            let boundary = self.align_forward(source, candidate, total).await?;
            if boundary > prev && boundary < total {
                bounds.push(boundary);
            }
        }
        bounds.push(total);

        Ok(bounds
            .windows(2)
            .map(|w| ByteRange {
                start: w[0],
                end: w[1],
            })
            .collect())
    }

    /// In-memory variant of [`partition`](Self::partition): the whole slice
    /// is available, so boundary snapping needs no probe reads and never
    /// falls back to an unaligned offset.
    pub fn partition_slice(&self, input: &[u8], chunks: usize) -> Result<Vec<ByteRange>> {
        if chunks == 0 {
            return Err(Error::InvalidArgument(
                "desired chunk count must be at least 1".into(),
            ));
        }
        let total = input.len() as u64;
        if total == 0 {
            return Ok(Vec::new());
        }

        let ideal = total.div_ceil(chunks as u64);
        let mut bounds: Vec<u64> = Vec::with_capacity(chunks + 1);
        bounds.push(0);
        for k in 1..chunks as u64 {
            let candidate = k * ideal;
            if candidate >= total {
                break;
            }
            let prev = *bounds.last().unwrap();
            if candidate < prev {
                continue;
            }
            let boundary = match self.delimiter.search_from(input, candidate as usize) {
                Some(hit) => (hit + self.delimiter.len()) as u64,
                None => total,
            };
            if boundary > prev && boundary < total {
                bounds.push(boundary);
            }
        }
        bounds.push(total);

        Ok(bounds
            .windows(2)
            .map(|w| ByteRange {
                start: w[0],
                end: w[1],
            })
            .collect())
    }

    /// Snap `candidate` forward to the offset just past the next delimiter.
    ///
    /// Probes a window of bytes at the candidate, doubling the window for a
    /// bounded number of rounds. Reaching the end of the resource without a
    /// hit returns `total` (the tail belongs to the previous chunk).
    /// Exhausting the rounds mid-resource falls back to the unadjusted
    /// candidate: a documented approximation for records longer than every
    /// probe round, surfaced as a warning rather than an error.
    async fn align_forward(&self, source: &SourceHandle, candidate: u64, total: u64) -> Result<u64> {
        let mut window = self.probe_window as u64;
        for _ in 0..self.max_probe_rounds {
            let len = window.min(total - candidate) as usize;
            let probe = read_full_at(source, candidate, len).await?;
            if let Some(hit) = self.delimiter.search(&probe) {
                return Ok(candidate + hit as u64 + self.delimiter.len() as u64);
            }
            if candidate + len as u64 >= total {
                return Ok(total);
            }
            window *= 2;
        }
        warn!(
            "no delimiter `{}` within {} probe rounds after offset {}; falling back to unaligned chunk boundary",
            self.delimiter, self.max_probe_rounds, candidate
        );
        Ok(candidate)
    }
}
