// Standalone Rust benchmark for record scanning strategies
//
// Run: cargo bench --bench scan_bench
//
// Compares delimiter search, sequential indexing, and rayon-parallel
// indexing across single-byte and multi-byte delimiters at various sizes.

use std::time::{Duration, Instant};

use chunkscan::{index_records, index_records_parallel, Delimiter};

/// Generate `rows` CSV-like lines with mildly varying widths.
fn generate_rows(rows: usize, terminator: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..rows {
        out.extend_from_slice(format!("{},field_{}_{},{}", i, i, i % 7, i * 3).as_bytes());
        out.extend_from_slice(terminator);
    }
    out
}

struct BenchResult {
    name: String,
    iterations: u64,
    total_time: Duration,
    records: usize,
}

impl BenchResult {
    fn avg_ms(&self) -> f64 {
        self.total_time.as_secs_f64() * 1000.0 / self.iterations as f64
    }

    fn report(&self) {
        println!(
            "{:<40} {:>8} records  {:>10.3} ms/iter ({} iters)",
            self.name,
            self.records,
            self.avg_ms(),
            self.iterations
        );
    }
}

fn bench<F: FnMut() -> usize>(name: &str, iterations: u64, mut f: F) -> BenchResult {
    // Warmup
    let mut records = f();
    let start = Instant::now();
    for _ in 0..iterations {
        records = f();
    }
    BenchResult {
        name: name.to_string(),
        iterations,
        total_time: start.elapsed(),
        records,
    }
}

fn main() {
    println!("chunkscan scan benchmarks\n");

    for &rows in &[10_000usize, 100_000, 1_000_000] {
        let lf = generate_rows(rows, b"\n");
        let crlf = generate_rows(rows, b"\r\n");
        let newline = Delimiter::newline();
        let crlf_delim = Delimiter::from_bytes(b"\r\n").unwrap();
        let iters = (2_000_000 / rows).max(2) as u64;

        bench(&format!("search sweep lf ({} rows)", rows), iters, || {
            let mut pos = 0;
            let mut count = 0;
            while let Some(hit) = newline.search_from(&lf, pos) {
                pos = hit + newline.len();
                count += 1;
            }
            count
        })
        .report();

        bench(&format!("index sequential lf ({} rows)", rows), iters, || {
            index_records(&lf, &newline).len()
        })
        .report();

        bench(&format!("index parallel x8 lf ({} rows)", rows), iters, || {
            index_records_parallel(&lf, &newline, 8).unwrap().len()
        })
        .report();

        bench(&format!("index sequential crlf ({} rows)", rows), iters, || {
            index_records(&crlf, &crlf_delim).len()
        })
        .report();

        bench(&format!("index parallel x8 crlf ({} rows)", rows), iters, || {
            index_records_parallel(&crlf, &crlf_delim, 8).unwrap().len()
        })
        .report();

        println!();
    }
}
