// Windowed, buffered scanning of one byte range.
//
// A scanner owns a bounded buffer and walks its assigned `[start, limit)`
// range with positioned reads, yielding the span of every record it finds.
// Reads never cross `limit`, so scanners over disjoint ranges of one
// resource are safe to drive concurrently with zero coordination. When a
// refill is needed, the trailing `delimiter.len() - 1` bytes of the old
// buffer are carried over so a pattern straddling two reads is still found.

use log::trace;

use crate::chunk::ByteRange;
use crate::core::Delimiter;
use crate::error::Result;
use crate::source::{read_full_at, SourceHandle};
use crate::zip::AsyncSequence;

/// Default sliding-window buffer size.
pub const DEFAULT_WINDOW: usize = 64 * 1024;

/// One record's byte span within the scanned resource.
///
/// `terminated` is true when the span ends at a delimiter occurrence and
/// false for the implicit final record running up to the range limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSpan {
    pub start: u64,
    pub end: u64,
    pub terminated: bool,
}

impl RecordSpan {
    /// Length of the record in bytes, delimiter excluded.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The delimiter offset this record ends at, if it was terminated.
    pub fn boundary(&self) -> Option<u64> {
        self.terminated.then_some(self.end)
    }
}

/// Lazily yields record spans inside one byte range of a resource.
///
/// One pass per instance: iterate `next_record` until `None`. Dropping the
/// scanner mid-scan releases nothing but its own buffer; the source handle
/// stays with the caller.
pub struct SlidingWindow {
    source: SourceHandle,
    delimiter: Delimiter,
    limit: u64,
    window: usize,
    buf: Vec<u8>,
    /// Absolute offset of `buf[0]`.
    buf_start: u64,
    /// Index into `buf` from which the next search resumes.
    search_pos: usize,
    /// Absolute offset where the current record starts.
    record_start: u64,
    done: bool,
}

impl SlidingWindow {
    /// Bind a scanner to `range` of `source`.
    ///
    /// No buffer is allocated and no read is issued until the first step.
    pub fn new(source: SourceHandle, delimiter: Delimiter, range: ByteRange) -> SlidingWindow {
        SlidingWindow {
            source,
            window: DEFAULT_WINDOW.max(delimiter.len()),
            delimiter,
            limit: range.end,
            buf: Vec::new(),
            buf_start: range.start,
            search_pos: 0,
            record_start: range.start,
            done: false,
        }
    }

    /// Override the buffer size (clamped to the delimiter length).
    pub fn with_window(mut self, bytes: usize) -> Self {
        self.window = bytes.max(self.delimiter.len());
        self
    }

    /// The next record span, or `None` once the range is exhausted.
    ///
    /// Spans come back in strictly increasing order. An I/O failure
    /// surfaces as `Err` at the step that read and finishes the scanner;
    /// a zero-length range yields `None` immediately.
    pub async fn next_record(&mut self) -> Result<Option<RecordSpan>> {
        if self.done {
            return Ok(None);
        }
        loop {
            if let Some(hit) = self.delimiter.search_from(&self.buf, self.search_pos) {
                let at = self.buf_start + hit as u64;
                let span = RecordSpan {
                    start: self.record_start,
                    end: at,
                    terminated: true,
                };
                self.search_pos = hit + self.delimiter.len();
                self.record_start = at + self.delimiter.len() as u64;
                return Ok(Some(span));
            }

            let buf_end = self.buf_start + self.buf.len() as u64;
            if buf_end >= self.limit {
                self.done = true;
                if self.record_start < self.limit {
                    // Trailing unterminated bytes form the implicit final
                    // record ending at the range limit.
                    return Ok(Some(RecordSpan {
                        start: self.record_start,
                        end: self.limit,
                        terminated: false,
                    }));
                }
                return Ok(None);
            }

            if let Err(err) = self.refill(buf_end).await {
                self.done = true;
                return Err(err);
            }
        }
    }

    /// Refill the window from `buf_end`, carrying over the trailing
    /// `delimiter.len() - 1` bytes so a straddling pattern is still seen.
    async fn refill(&mut self, buf_end: u64) -> Result<()> {
        let keep = (self.delimiter.len() - 1).min(self.buf.len());
        let read_len = self.window.min((self.limit - buf_end) as usize);
        trace!(
            "refill: {} bytes at offset {} (keeping {} tail bytes)",
            read_len,
            buf_end,
            keep
        );
        let fresh = read_full_at(&self.source, buf_end, read_len).await?;
        if keep > 0 {
            let tail_at = self.buf.len() - keep;
            self.buf.copy_within(tail_at.., 0);
        }
        self.buf.truncate(keep);
        self.buf.extend_from_slice(&fresh);
        self.buf_start = buf_end - keep as u64;
        // Kept bytes are shorter than the pattern, so rescanning them
        // cannot re-yield an old match.
        self.search_pos = 0;
        Ok(())
    }

    /// Drain the scanner, collecting the boundary offset of every
    /// terminated record.
    pub async fn boundaries(&mut self) -> Result<Vec<u64>> {
        let mut out = Vec::new();
        while let Some(span) = self.next_record().await? {
            if let Some(boundary) = span.boundary() {
                out.push(boundary);
            }
        }
        Ok(out)
    }
}

impl AsyncSequence for SlidingWindow {
    type Item = Result<RecordSpan>;

    async fn next(&mut self) -> Option<Result<RecordSpan>> {
        self.next_record().await.transpose()
    }
}

/// Compose several scanners into one lockstep sequence.
pub fn collect(scanners: Vec<SlidingWindow>) -> ScannerSet {
    let finished = vec![false; scanners.len()];
    ScannerSet { scanners, finished }
}

/// Lockstep composition of scanners: each step advances every non-exhausted
/// scanner concurrently and carries one slot per scanner.
pub struct ScannerSet {
    scanners: Vec<SlidingWindow>,
    finished: Vec<bool>,
}

impl ScannerSet {
    /// One aggregated step. Exhausted scanners yield `None` in their slot;
    /// the set ends when every scanner is exhausted in the same step.
    pub async fn next(&mut self) -> Option<Vec<Option<Result<RecordSpan>>>> {
        if self.finished.iter().all(|&done| done) {
            return None;
        }
        let advances: Vec<_> = self
            .scanners
            .iter_mut()
            .zip(self.finished.iter().copied())
            .map(|(scanner, done)| async move {
                if done {
                    None
                } else {
                    scanner.next_record().await.transpose()
                }
            })
            .collect();
        let step = futures::future::join_all(advances).await;
        for (done, slot) in self.finished.iter_mut().zip(&step) {
            if slot.is_none() {
                *done = true;
            }
        }
        if step.iter().all(Option::is_none) {
            return None;
        }
        Some(step)
    }
}
