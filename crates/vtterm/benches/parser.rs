//! Profiling program for benchmarking `Terminal::write` throughput.
//!
//! Feeds various byte patterns through the parser/stream/executor
//! pipeline repeatedly to measure performance under different workloads.

use std::hint::black_box;
use std::time::{Duration, Instant};

use vtterm::{Terminal, TerminalOptions};

struct BenchConfig {
    name: &'static str,
    iterations: usize,
    data: Vec<u8>,
}

impl BenchConfig {
    fn new(name: &'static str, iterations: usize, data: Vec<u8>) -> Self {
        Self {
            name,
            iterations,
            data,
        }
    }
}

fn run_benchmark(config: &BenchConfig) -> Duration {
    let start = Instant::now();

    for _ in 0..config.iterations {
        let mut terminal = Terminal::new(TerminalOptions::default());
        let data = black_box(&config.data);
        black_box(terminal.write(data)).ok();
    }

    start.elapsed()
}

fn generate_plain_text(size: usize) -> Vec<u8> {
    let text = "The quick brown fox jumps over the lazy dog.\r\n";
    text.as_bytes().iter().cycle().take(size).copied().collect()
}

fn generate_unicode_text(size: usize) -> Vec<u8> {
    let text = "Hello 世界! Rust café Ω α β γ.\r\n";
    text.as_bytes().iter().cycle().take(size).copied().collect()
}

fn generate_sgr_heavy(size: usize) -> Vec<u8> {
    let mut result = Vec::new();
    let patterns: &[&[u8]] = &[
        b"\x1b[1;31mRed\x1b[0m ",
        b"\x1b[38;2;10;200;40mTruecolor\x1b[0m ",
        b"\x1b[48;5;202mBg256\x1b[0m ",
        b"\x1b[H\x1b[2J",
        b"\x1b[10;20HCursor ",
    ];
    let mut idx = 0;
    while result.len() < size {
        result.extend_from_slice(patterns[idx % patterns.len()]);
        idx += 1;
    }
    result.truncate(size);
    result
}

fn generate_osc_heavy(size: usize) -> Vec<u8> {
    let mut result = Vec::new();
    let patterns: &[&[u8]] = &[
        b"\x1b]0;window title\x07",
        b"\x1b]8;;https://example.com\x1b\\link\x1b]8;;\x1b\\",
        b"\x1b]133;A\x07",
        b"\x1b]4;1;#ff0000\x1b\\",
    ];
    let mut idx = 0;
    while result.len() < size {
        result.extend_from_slice(patterns[idx % patterns.len()]);
        idx += 1;
    }
    result.truncate(size);
    result
}

fn wrap_heavy(size: usize) -> Vec<u8> {
    (0..size).map(|i| b'a' + (i % 26) as u8).collect()
}

fn main() {
    let sizes = [("small", 1_024usize), ("medium", 16 * 1024), ("large", 256 * 1024)];
    let generators: &[(&str, fn(usize) -> Vec<u8>)] = &[
        ("ascii", generate_plain_text),
        ("unicode", generate_unicode_text),
        ("sgr", generate_sgr_heavy),
        ("osc", generate_osc_heavy),
        ("wrap", wrap_heavy),
    ];

    for (size_name, size) in sizes {
        for (kind_name, generator) in generators {
            let data = generator(size);
            let iterations = (4 * 1024 * 1024 / size.max(1)).max(4);
            let config = BenchConfig::new(kind_name, iterations, data);
            let elapsed = run_benchmark(&config);
            let per_iter = elapsed / u32::try_from(iterations).unwrap_or(1);
            println!(
                "{size_name:<8} {kind_name:<8} iterations={iterations:<6} total={elapsed:?} per_iter={per_iter:?}"
            );
        }
    }
}
