use std::thread;

use log::debug;

use super::{process_task, PathConfig, RunReport};
use crate::processing::effects::Effect;
use crate::processing::image::Image;
use crate::processing::task::ImageTask;

/// Tasks one after another; each effect of a task is split by rows across
/// `threads` workers.
pub fn run_parallel_slices(tasks: &[ImageTask], paths: &PathConfig, threads: usize) -> RunReport {
    let mut report = RunReport::default();

    for task in tasks {
        report.record(process_task(task, paths, |image, effect| {
            apply_sliced(image, effect, threads)
        }));
    }

    report
}

pub fn slice_height(rows: u32, threads: usize) -> u32 {
    let threads = threads.max(1) as u64;
    ((rows as u64 + threads - 1) / threads) as u32
}

/// Applies `effect` with one scoped worker per row slice. Returns only after
/// every worker has finished, so the caller may swap right away.
pub fn apply_sliced(image: &mut Image, effect: Effect, threads: usize) {
    let height = slice_height(image.bounds.height(), threads);
    let (input, slices) = image.split_rows(height);

    debug!("{} over {} slice(s) of {} row(s)", effect.code(), slices.len(), height);

    thread::scope(|s| {
        for mut rows in slices {
            s.spawn(move || effect.apply_rows(input, &mut rows));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::image::Buffer;
    use crate::tests_common::{random_buffer, uniform_buffer};

    const SEQUENCES: &[&[Effect]] = &[
        &[Effect::Grayscale],
        &[Effect::Sharpen],
        &[Effect::EdgeDetection],
        &[Effect::Blur],
        &[Effect::Grayscale, Effect::Blur, Effect::Sharpen],
        &[Effect::Sharpen, Effect::Blur, Effect::EdgeDetection, Effect::Grayscale],
    ];

    fn sequential(buffer: &Buffer, effects: &[Effect]) -> Buffer {
        let mut image = Image::new(buffer.clone());
        for &effect in effects {
            image.apply(effect);
            image.swap();
        }
        image.into_result()
    }

    fn sliced(buffer: &Buffer, effects: &[Effect], threads: usize) -> Buffer {
        let mut image = Image::new(buffer.clone());
        for &effect in effects {
            apply_sliced(&mut image, effect, threads);
            image.swap();
        }
        image.into_result()
    }

    /// Same slicing, but every slice computed on the calling thread.
    fn sliced_in_order(buffer: &Buffer, effects: &[Effect], threads: usize) -> Buffer {
        let mut image = Image::new(buffer.clone());
        let height = slice_height(image.bounds.height(), threads);
        for &effect in effects {
            {
                let (input, mut slices) = image.split_rows(height);
                for rows in slices.iter_mut() {
                    effect.apply_rows(input, rows);
                }
            }
            image.swap();
        }
        image.into_result()
    }

    #[test]
    fn slice_height_is_ceiling_division() {
        assert_eq!(slice_height(10, 1), 10);
        assert_eq!(slice_height(10, 3), 4);
        assert_eq!(slice_height(12, 4), 3);
        assert_eq!(slice_height(3, 8), 1);
        assert_eq!(slice_height(0, 4), 0);
        assert_eq!(slice_height(5, 0), 5);
    }

    #[test]
    fn single_slice_matches_sequential_for_every_sequence() {
        let buffer = random_buffer(12, 9, 5);

        for effects in SEQUENCES {
            assert_eq!(sliced(&buffer, effects, 1), sequential(&buffer, effects), "{effects:?}");
        }
    }

    #[test]
    fn grayscale_matches_sequential_for_every_thread_count() {
        let buffer = random_buffer(8, 13, 6);
        let expected = sequential(&buffer, &[Effect::Grayscale]);

        for threads in 1..=13 {
            assert_eq!(sliced(&buffer, &[Effect::Grayscale], threads), expected, "threads = {threads}");
        }
    }

    #[test]
    fn thread_count_only_changes_timing() {
        let buffer = random_buffer(10, 11, 7);

        for effects in SEQUENCES {
            for threads in 1..=11 {
                assert_eq!(
                    sliced(&buffer, effects, threads),
                    sliced_in_order(&buffer, effects, threads),
                    "{effects:?} with {threads} thread(s)"
                );
            }
        }
    }

    #[test]
    fn convolution_differs_from_sequential_only_at_slice_seams() {
        let buffer = random_buffer(7, 12, 8);
        let rows = 12;

        for effect in [Effect::Sharpen, Effect::EdgeDetection, Effect::Blur] {
            let expected = sequential(&buffer, &[effect]);

            for threads in 1..=rows as usize {
                let actual = sliced(&buffer, &[effect], threads);
                let height = slice_height(rows, threads);

                for y in 0..rows {
                    let top = (y / height) * height;
                    let bottom = (top + height).min(rows);
                    let clear_above = y == 0 || y > top;
                    let clear_below = y + 1 == rows || y + 1 < bottom;
                    if !(clear_above && clear_below) {
                        continue;
                    }
                    for x in 0..7 {
                        assert_eq!(
                            actual.get_pixel(x, y),
                            expected.get_pixel(x, y),
                            "{effect:?} threads = {threads} at ({x}, {y})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn seam_rows_see_the_slice_as_their_image_edge() {
        let buffer = uniform_buffer(3, 4, [1000, 1000, 1000, 65535]);

        let whole = sequential(&buffer, &[Effect::EdgeDetection]);
        let halves = sliced(&buffer, &[Effect::EdgeDetection], 2);

        assert_eq!(whole.get_pixel(1, 1).0[0], 0);
        assert_eq!(halves.get_pixel(1, 1).0[0], 3000);
        assert_eq!(halves.get_pixel(1, 2).0[0], 3000);
    }

    #[test]
    fn more_threads_than_rows_is_fine() {
        let buffer = random_buffer(4, 3, 9);
        let effects = [Effect::Grayscale, Effect::Blur];

        assert_eq!(sliced(&buffer, &effects, 16), sliced_in_order(&buffer, &effects, 16));
    }
}
