// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Renders one Julia set.
//!
//! The sweep walks every pixel of the image.  For each one it asks
//! the admission controller for a slot.  With a slot, the pixel goes
//! onto a queue as a task, and a small pool of scoped worker threads
//! drains the queue; without one, the sweep computes the pixel right
//! there and moves on.  Each task carries its slot and a handle on a
//! wait group, and drops both only after its pixel is in the grid.
//!
//! Finishing the sweep only means every task was *handed off*.  The
//! image is done when the wait group says every task has *finished*,
//! and only then is the grid frozen into a Frame.

use crossbeam::channel;
use crossbeam::sync::WaitGroup;
use itertools::iproduct;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::admission::{AdmissionController, Slot};
use crate::buffer::{Frame, PixelGrid};
use crate::color::Path;
use crate::config::RenderConfig;
use crate::errors::JuliaError;
use crate::escape::classify;
use crate::functions::IterationFunction;
use crate::planes::Pixel;

/// A pixel handed off to the worker pool.  The slot and the wait
/// group handle are released when the task is dropped.
struct PixelTask<'a> {
    pixel: Pixel,
    _slot: Slot<'a>,
    _done: WaitGroup,
}

/// Renders the Julia set of `f` at the configured size.  Every pixel
/// is computed exactly once, either as a task on a worker or inline
/// on the calling thread; the returned Frame is complete.
pub fn render(f: &IterationFunction, config: &RenderConfig) -> Result<Frame, JuliaError> {
    let plane = config.validate()?;
    let grid = PixelGrid::new(plane);
    let admission = AdmissionController::new(config.concurrency_limit);
    let undefined = AtomicUsize::new(0);
    let max_iterations = config.max_iterations;

    let evaluate = |pixel: Pixel, path: Path| {
        let escape = classify(f, plane.pixel_to_point(pixel), max_iterations);
        if escape.is_undefined() {
            undefined.fetch_add(1, Ordering::Relaxed);
            trace!("{}: orbit of {:?} is undefined", f.name, pixel);
        }
        grid.record(pixel, escape.count(max_iterations), path);
    };

    crossbeam::scope(|scope| -> Result<(), JuliaError> {
        let (tasks, queue) = channel::unbounded::<PixelTask>();
        for _ in 0..config.workers {
            let queue = queue.clone();
            let evaluate = &evaluate;
            scope.spawn(move |_| {
                for task in queue.iter() {
                    evaluate(task.pixel, Path::Concurrent);
                }
            });
        }
        drop(queue);

        let all_done = WaitGroup::new();
        for (column, row) in iproduct!(plane.min()..plane.max(), plane.min()..plane.max()) {
            let pixel = Pixel(column, row);
            match admission.try_acquire() {
                Some(slot) => {
                    let task = PixelTask {
                        pixel,
                        _slot: slot,
                        _done: all_done.clone(),
                    };
                    tasks.send(task).map_err(|_| JuliaError::WorkerPanicked)?;
                }
                None => evaluate(pixel, Path::Inline),
            }
        }
        drop(tasks);
        all_done.wait();
        Ok(())
    })
    .map_err(|_| JuliaError::WorkerPanicked)??;

    let mut frame = grid.freeze()?;
    {
        let stats = frame.stats_mut();
        stats.undefined = undefined.into_inner();
        stats.peak_in_flight = admission.peak();
    }
    debug!(
        "{}: {} pixels, {} as tasks, {} inline, {} undefined, peak {} in flight",
        f.name,
        frame.stats().total(),
        frame.stats().concurrent,
        frame.stats().inline,
        frame.stats().undefined,
        frame.stats().peak_in_flight
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Palette;

    fn config(size: usize, limit: usize, workers: usize) -> RenderConfig {
        RenderConfig {
            size,
            max_iterations: 256,
            concurrency_limit: limit,
            workers,
            overlay: false,
        }
    }

    #[test_log::test]
    fn four_by_four_golden_ratio_baseline() {
        let palette = Palette::standard();
        let frame = render(palette.get(0).unwrap(), &config(4, 1000, 4)).unwrap();
        let expected: [u32; 16] = [
            0, 0,   1,   0,
            0, 1,   2,   1,
            1, 256, 256, 256,
            0, 1,   2,   1,
        ];
        assert_eq!(frame.escape_counts(), &expected[..]);
        assert_eq!(frame.escape_count(Pixel(-1, -1)), Some(1));
        assert_eq!(frame.escape_count(Pixel(-2, -2)), Some(0));
        assert_eq!(frame.escape_count(Pixel(0, 0)), Some(256));
    }

    #[test]
    fn eight_by_eight_golden_ratio_baseline() {
        let palette = Palette::standard();
        let frame = render(palette.get(0).unwrap(), &config(8, 3, 2)).unwrap();
        let expected: [u32; 64] = [
            0, 0, 0, 0,   1,   0,   0,   0,
            0, 0, 1, 1,   1,   1,   1,   0,
            0, 1, 1, 2,   2,   2,   1,   1,
            0, 1, 3, 7,   256, 7,   3,   1,
            1, 2, 256, 256, 256, 256, 256, 2,
            0, 1, 3, 7,   256, 7,   3,   1,
            0, 1, 1, 2,   2,   2,   1,   1,
            0, 0, 1, 1,   1,   1,   1,   0,
        ];
        assert_eq!(frame.escape_counts(), &expected[..]);
    }

    #[test]
    fn every_pixel_written_once() {
        let palette = Palette::standard();
        for f in palette.iter() {
            let frame = render(f, &config(16, 5, 3)).unwrap();
            assert_eq!(frame.stats().total(), 256);
            assert_eq!(frame.escape_counts().len(), 256);
        }
    }

    #[test]
    fn rendering_is_repeatable() {
        let palette = Palette::standard();
        for f in palette.iter() {
            let first = render(f, &config(32, 7, 4)).unwrap();
            let second = render(f, &config(32, 1000, 2)).unwrap();
            let inline = render(f, &config(32, 0, 1)).unwrap();
            assert_eq!(first.escape_counts(), second.escape_counts());
            assert_eq!(first.escape_counts(), inline.escape_counts());
        }
    }

    #[test]
    fn peak_tasks_stay_within_limit() {
        let palette = Palette::standard();
        for _ in 0..20 {
            let frame = render(palette.get(2).unwrap(), &config(8, 2, 4)).unwrap();
            assert!(frame.stats().peak_in_flight <= 2);
            assert!(frame.stats().peak_in_flight >= 1);
            assert!(frame.stats().concurrent >= 1);
        }
    }

    #[test]
    fn zero_limit_computes_everything_inline() {
        let palette = Palette::standard();
        let frame = render(palette.get(1).unwrap(), &config(8, 0, 2)).unwrap();
        assert_eq!(frame.stats().inline, 64);
        assert_eq!(frame.stats().concurrent, 0);
        assert_eq!(frame.stats().peak_in_flight, 0);
        assert_eq!(frame.path(Pixel(0, 0)), Some(Path::Inline));
    }

    #[test]
    fn singularities_are_counted_not_fatal() {
        let palette = Palette::standard();
        let frame = render(palette.get(6).unwrap(), &config(8, 10, 2)).unwrap();
        assert_eq!(frame.escape_count(Pixel(0, 0)), Some(1));
        assert!(frame.stats().undefined >= 1);
    }

    #[test]
    fn invalid_configuration_is_refused() {
        let palette = Palette::standard();
        match render(palette.get(0).unwrap(), &config(6, 10, 2)) {
            Err(JuliaError::Config(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
