use std::time::Duration;

use log::info;

use crate::error::ErrorType;
use crate::processing::task::{split_dirs, ImageTask};
use crate::scheduler::{self, Config, Mode, PathConfig};

/// One measured configuration of one data set.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchRow {
    pub data_set: String,
    pub mode: Mode,
    pub threads: usize,
    pub seconds: f64,
    pub speedup: f64,
}

pub fn speedup(sequential: Duration, parallel: Duration) -> f64 {
    if parallel.is_zero() {
        return f64::INFINITY;
    }
    sequential.as_secs_f64() / parallel.as_secs_f64()
}

fn average_run(
    data_dirs: &str,
    mode: Mode,
    threads: usize,
    repeat: usize,
    paths: &PathConfig,
    catalog: &[ImageTask],
) -> Result<Duration, ErrorType> {
    let config = Config {
        data_dirs: data_dirs.into(),
        mode,
        threads,
    };
    let repeat = repeat.max(1);

    let mut total = Duration::ZERO;
    for _ in 0..repeat {
        total += scheduler::run(&config, paths, catalog)?.elapsed;
    }

    Ok(total / repeat as u32)
}

/// For every data set on its own: sequential baseline, then both parallel
/// modes at every thread count.
pub fn run_benchmark(
    data_dirs: &str,
    thread_counts: &[usize],
    repeat: usize,
    paths: &PathConfig,
    catalog: &[ImageTask],
) -> Result<Vec<BenchRow>, ErrorType> {
    let mut rows = Vec::new();

    for data_set in split_dirs(data_dirs) {
        let baseline = average_run(data_set, Mode::Sequential, 1, repeat, paths, catalog)?;
        info!("Sequential baseline for {}: {:.3}s", data_set, baseline.as_secs_f64());

        rows.push(BenchRow {
            data_set: data_set.into(),
            mode: Mode::Sequential,
            threads: 1,
            seconds: baseline.as_secs_f64(),
            speedup: 1.0,
        });

        for mode in [Mode::ParallelSlices, Mode::ParallelFiles] {
            for &threads in thread_counts {
                let elapsed = average_run(data_set, mode, threads, repeat, paths, catalog)?;
                rows.push(BenchRow {
                    data_set: data_set.into(),
                    mode,
                    threads,
                    seconds: elapsed.as_secs_f64(),
                    speedup: speedup(baseline, elapsed),
                });
            }
        }
    }

    Ok(rows)
}

pub fn format_table(rows: &[BenchRow]) -> String {
    let mut table = format!(
        "{:<12}{:<12}{:>8}{:>12}{:>10}\n",
        "data set", "mode", "threads", "seconds", "speedup"
    );
    for row in rows {
        table += &format!(
            "{:<12}{:<12}{:>8}{:>12.4}{:>10.2}\n",
            row.data_set,
            row.mode.to_string(),
            row.threads,
            row.seconds,
            row.speedup
        );
    }
    table
}
