use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{debug, error};

mod benchmark;
mod error;
mod locks;
mod processing;
mod scheduler;
#[cfg(test)]
mod tests_common;

use processing::task::load_catalog;
use scheduler::{Config, Mode, PathConfig};

#[derive(Parser, Debug)]
#[clap(about = "Applies image effects sequentially or with one of two parallel strategies")]
struct Args {
    /// Data directories joined with '+', e.g. small+big
    data_dirs: String,

    /// Scheduling strategy
    #[clap(value_enum, default_value_t = Mode::Sequential)]
    mode: Mode,

    /// Number of worker threads
    #[clap(default_value_t = 1)]
    threads: usize,

    /// Effects catalog, one JSON task per line
    #[clap(long, env = "IMG_EFFECTS", default_value = "../data/effects.txt")]
    effects: PathBuf,

    /// Root of the input directories
    #[clap(long, env = "IMG_IN_DIR", default_value = "../data/in")]
    in_dir: PathBuf,

    /// Where processed images are written
    #[clap(long, env = "IMG_OUT_DIR", default_value = "../data/out")]
    out_dir: PathBuf,

    /// Measure every mode against the sequential baseline instead of a single run
    #[clap(long, default_value_t = false)]
    bench: bool,

    /// Thread counts used by --bench
    #[clap(long, value_delimiter = ',', default_values_t = vec![2, 4, 6, 8, 12])]
    bench_threads: Vec<usize>,

    /// Runs averaged per --bench configuration
    #[clap(long, default_value_t = 1)]
    repeat: usize,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    // init .env
    dotenvy::dotenv().ok();
    dotenvy::from_filename(".env.local").ok();

    // init logger
    env_logger::init();

    // init cli
    let args = Args::parse();
    debug!("{:?}", args);

    let catalog = match load_catalog(&args.effects) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let paths = PathConfig {
        in_dir: args.in_dir,
        out_dir: args.out_dir,
    };

    if args.bench {
        let rows = benchmark::run_benchmark(
            &args.data_dirs,
            &args.bench_threads,
            args.repeat,
            &paths,
            &catalog,
        )?;
        print!("{}", benchmark::format_table(&rows));
        return Ok(());
    }

    let config = Config {
        data_dirs: args.data_dirs,
        mode: args.mode,
        threads: args.threads,
    };

    let report = scheduler::run(&config, &paths, &catalog)?;
    println!("{:.2}", report.elapsed.as_secs_f64());

    Ok(())
}
