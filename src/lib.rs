// chunkscan - record-aligned partitioning and scanning of delimited byte streams
//
// Pipeline:
//   Delimiter            byte pattern + Boyer-Moore-Horspool search
//   DelimitedChunkReader delimiter-aligned byte ranges over a resource
//   SlidingWindow        buffered scanner yielding record spans per range
//   zip_longest          lockstep pairing of sequences and scanners
//   take_delimited       quote-aware field sub-spans within one record
//
// A caller opens a resource once, partitions it into N ranges, then drives
// one scanner per range (concurrently if it likes); each range starts at
// the first byte of a record, so scanners never coordinate.

pub mod chunk;
pub mod core;
pub mod error;
pub mod parallel;
pub mod source;
pub mod window;
pub mod zip;

pub use crate::chunk::{ByteRange, DelimitedChunkReader};
pub use crate::core::{take_delimited, take_delimited_text, take_delimited_with, Delimiter, Fields};
pub use crate::error::{Error, Result};
pub use crate::parallel::{index_records, index_records_parallel};
pub use crate::source::{FileSource, MemorySource, PositionedRead, SourceHandle};
pub use crate::window::{collect, RecordSpan, ScannerSet, SlidingWindow};
pub use crate::zip::{
    zip_longest, zip_longest_async, AsyncSequence, AsyncZipLongest, IterSequence, ZipLongest,
};

// Use mimalloc when the embedder opts in.
#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
