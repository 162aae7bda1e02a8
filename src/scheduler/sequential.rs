use super::{process_task, PathConfig, RunReport};
use crate::processing::task::ImageTask;

/// Single thread, full row range. Reference output for the parallel modes.
pub fn run_sequential(tasks: &[ImageTask], paths: &PathConfig) -> RunReport {
    let mut report = RunReport::default();

    for task in tasks {
        report.record(process_task(task, paths, |image, effect| image.apply(effect)));
    }

    report
}
