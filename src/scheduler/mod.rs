pub mod parfiles;
pub mod parslices;
pub mod sequential;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{error, info};

use crate::error::ErrorType;
use crate::processing::data_loader::{load_image, save_image};
use crate::processing::effects::Effect;
use crate::processing::image::Image;
use crate::processing::task::{expand, ImageTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    #[value(name = "s", alias = "sequential")]
    Sequential,
    #[value(name = "parfiles")]
    ParallelFiles,
    #[value(name = "parslices")]
    ParallelSlices,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Sequential => write!(f, "sequential"),
            Mode::ParallelFiles => write!(f, "parfiles"),
            Mode::ParallelSlices => write!(f, "parslices"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory identifiers joined with `+`.
    pub data_dirs: String,
    pub mode: Mode,
    pub threads: usize,
}

/// Roots that input and output files are resolved against.
#[derive(Debug, Clone)]
pub struct PathConfig {
    pub in_dir: PathBuf,
    pub out_dir: PathBuf,
}

impl PathConfig {
    pub fn input_path(&self, task: &ImageTask) -> PathBuf {
        self.in_dir.join(&task.dir).join(&task.in_path)
    }

    pub fn output_path(&self, task: &ImageTask) -> PathBuf {
        self.out_dir.join(format!("{}_{}", task.dir, task.out_path))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Saved,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn record(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Saved => self.processed += 1,
            TaskOutcome::Failed => self.failed += 1,
        }
    }

    pub fn merge(mut self, other: RunReport) -> Self {
        self.processed += other.processed;
        self.failed += other.failed;
        self
    }

    pub fn total(&self) -> usize {
        self.processed + self.failed
    }
}

/// Expands `catalog` over the configured directories and runs every task
/// with the configured strategy.
pub fn run(config: &Config, paths: &PathConfig, catalog: &[ImageTask]) -> Result<RunReport, ErrorType> {
    if config.threads == 0 {
        return Err(ErrorType::InvalidThreadCount);
    }

    let tasks = expand(catalog, &config.data_dirs);
    let task_count = tasks.len();
    let start = Instant::now();

    let mut report = match config.mode {
        Mode::Sequential => sequential::run_sequential(&tasks, paths),
        Mode::ParallelFiles => parfiles::run_parallel_files(tasks, paths, config.threads),
        Mode::ParallelSlices => parslices::run_parallel_slices(&tasks, paths, config.threads),
    };
    report.elapsed = start.elapsed();

    info!(
        "{} with {} thread(s): {} task(s), {} saved, {} failed in {:.3}s",
        config.mode,
        config.threads,
        task_count,
        report.processed,
        report.failed,
        report.elapsed.as_secs_f64()
    );

    Ok(report)
}

/// Load, run every known effect with a swap after each, save. Failures are
/// logged here and the task is abandoned.
pub(crate) fn process_task<F>(task: &ImageTask, paths: &PathConfig, apply: F) -> TaskOutcome
where
    F: FnMut(&mut Image, Effect),
{
    match execute(task, paths, apply) {
        Ok(()) => {
            info!("Task {} ({}/{}) saved", task.id, task.dir, task.in_path);
            TaskOutcome::Saved
        }
        Err(e) => {
            error!("Task {} abandoned: {}", task.id, e);
            TaskOutcome::Failed
        }
    }
}

fn execute<F>(task: &ImageTask, paths: &PathConfig, mut apply: F) -> Result<(), ErrorType>
where
    F: FnMut(&mut Image, Effect),
{
    let mut image = load_image(&paths.input_path(task))?;

    for effect in task.resolve_effects() {
        apply(&mut image, effect);
        image.swap();
    }

    save_image(&paths.output_path(task), &image)
}
