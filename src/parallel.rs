// Parallel record indexing over an in-memory buffer using rayon.
//
// Two phases: partition the buffer into delimiter-aligned ranges, then
// scan each range independently on the rayon pool. Ranges start at record
// boundaries by construction, so the per-range scans need no coordination
// and the spliced output is identical to a sequential scan.

use rayon::prelude::*;

use crate::chunk::{ByteRange, DelimitedChunkReader};
use crate::core::Delimiter;
use crate::error::Result;
use crate::window::RecordSpan;

/// Sequentially index every record span in `input`.
pub fn index_records(input: &[u8], delimiter: &Delimiter) -> Vec<RecordSpan> {
    scan_range(
        input,
        delimiter,
        ByteRange {
            start: 0,
            end: input.len() as u64,
        },
    )
}

/// Index every record span in `input`, fanning the work out over `chunks`
/// delimiter-aligned ranges on the rayon pool.
pub fn index_records_parallel(
    input: &[u8],
    delimiter: &Delimiter,
    chunks: usize,
) -> Result<Vec<RecordSpan>> {
    let reader = DelimitedChunkReader::new(delimiter.clone());
    let ranges = reader.partition_slice(input, chunks)?;

    Ok(ranges
        .into_par_iter()
        .map(|range| scan_range(input, delimiter, range))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect())
}

/// Scan one range of `input`, never looking past its end.
fn scan_range(input: &[u8], delimiter: &Delimiter, range: ByteRange) -> Vec<RecordSpan> {
    let end = range.end as usize;
    let haystack = &input[..end];
    let mut spans = Vec::new();
    let mut record_start = range.start as usize;
    let mut pos = record_start;
    while let Some(hit) = delimiter.search_from(haystack, pos) {
        spans.push(RecordSpan {
            start: record_start as u64,
            end: hit as u64,
            terminated: true,
        });
        pos = hit + delimiter.len();
        record_start = pos;
    }
    if record_start < end {
        spans.push(RecordSpan {
            start: record_start as u64,
            end: end as u64,
            terminated: false,
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(count: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for i in 0..count {
            out.extend_from_slice(format!("{},{},{}\n", i, i + 1, i + 2).as_bytes());
        }
        out
    }

    #[test]
    fn sequential_index_simple() {
        let spans = index_records(b"a\nbb\nccc", &Delimiter::newline());
        assert_eq!(
            spans,
            vec![
                RecordSpan { start: 0, end: 1, terminated: true },
                RecordSpan { start: 2, end: 4, terminated: true },
                RecordSpan { start: 5, end: 8, terminated: false },
            ]
        );
    }

    #[test]
    fn parallel_matches_sequential() {
        let input = rows(1000);
        let delimiter = Delimiter::newline();
        let sequential = index_records(&input, &delimiter);
        let parallel = index_records_parallel(&input, &delimiter, 8).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.len(), 1000);
    }

    #[test]
    fn parallel_with_unterminated_tail() {
        let mut input = rows(257);
        input.extend_from_slice(b"no trailing newline");
        let delimiter = Delimiter::newline();
        let parallel = index_records_parallel(&input, &delimiter, 4).unwrap();
        assert_eq!(parallel, index_records(&input, &delimiter));
        assert!(!parallel.last().unwrap().terminated);
    }

    #[test]
    fn empty_input_indexes_nothing() {
        let delimiter = Delimiter::newline();
        assert!(index_records(b"", &delimiter).is_empty());
        assert!(index_records_parallel(b"", &delimiter, 4).unwrap().is_empty());
    }
}
