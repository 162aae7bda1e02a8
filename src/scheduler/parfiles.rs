use std::collections::VecDeque;
use std::thread;

use log::{debug, error};

use super::{process_task, PathConfig, RunReport, TaskOutcome};
use crate::locks::SpinLock;
use crate::processing::task::ImageTask;

/// Whole tasks pulled from a shared queue by `threads` workers.
pub fn run_parallel_files(tasks: Vec<ImageTask>, paths: &PathConfig, threads: usize) -> RunReport {
    drain(tasks, threads, |task| {
        process_task(&task, paths, |image, effect| image.apply(effect))
    })
}

/// Runs `work` once for every queued item on `min(threads, queue.len())`
/// workers and returns after all of them have exited.
///
/// Each worker pops under the spin-lock and works outside it; a worker that
/// finds the queue empty terminates.
pub fn drain<T, F>(queue: Vec<T>, threads: usize, work: F) -> RunReport
where
    T: Send,
    F: Fn(T) -> TaskOutcome + Sync,
{
    let workers = threads.min(queue.len());
    let queue = SpinLock::new(VecDeque::from(queue));

    debug!("Starting {} file worker(s)", workers);

    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                let queue = &queue;
                let work = &work;
                s.spawn(move || {
                    let mut report = RunReport::default();
                    loop {
                        let next = queue.lock().pop_front();
                        let Some(item) = next else {
                            break;
                        };
                        report.record(work(item));
                    }
                    debug!("Worker {} finished after {} task(s)", worker, report.total());
                    report
                })
            })
            .collect();

        handles
            .into_iter()
            .fold(RunReport::default(), |acc, handle| match handle.join() {
                Ok(report) => acc.merge(report),
                Err(_) => {
                    error!("File worker panicked");
                    acc
                }
            })
    })
}
