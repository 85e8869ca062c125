// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The batch driver renders every function in a palette at once, one
//! thread per function, and writes each image as soon as it is done.
//!
//! Images are independent: if one of them can't be written, the
//! others still are, and the failure shows up in the report rather
//! than taking the whole batch down.  The clock stops only after the
//! last render thread has been joined.

use crossbeam::thread::ScopedJoinHandle;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::RenderConfig;
use crate::errors::JuliaError;
use crate::functions::{IterationFunction, Palette};
use crate::output::{image_path, write_png};
use crate::render::render;

/// What happened to one palette entry.
#[derive(Debug)]
pub struct ImageOutcome {
    /// Position of the function in the palette.
    pub index: usize,
    /// The file written, or why there isn't one.
    pub result: Result<PathBuf, JuliaError>,
}

/// The result of a whole batch.
#[derive(Debug)]
pub struct BatchReport {
    /// Wall-clock time from the first render starting to the last
    /// image being written.
    pub elapsed: Duration,
    /// One entry per palette function, in palette order.
    pub outcomes: Vec<ImageOutcome>,
}

impl BatchReport {
    /// Elapsed time in whole milliseconds.
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// True when every image was written.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    /// The images that were written, in palette order.
    pub fn written(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .map(|path| path.as_path())
            .collect()
    }

    /// The palette entries that failed.
    pub fn failures(&self) -> Vec<&ImageOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_err())
            .collect()
    }
}

/// Renders a palette into a directory.
#[derive(Debug)]
pub struct BatchDriver<'p> {
    palette: &'p Palette,
    config: RenderConfig,
    output_dir: PathBuf,
}

impl<'p> BatchDriver<'p> {
    /// Checks the configuration up front, so that a bad one fails
    /// once instead of once per image.
    pub fn new<P: Into<PathBuf>>(
        palette: &'p Palette,
        config: RenderConfig,
        output_dir: P,
    ) -> Result<Self, JuliaError> {
        config.validate()?;
        Ok(BatchDriver {
            palette,
            config,
            output_dir: output_dir.into(),
        })
    }

    /// Renders and writes every image, and waits for all of them.
    pub fn run(&self) -> BatchReport {
        let start = Instant::now();
        info!(
            "rendering {} images of {}x{} into {}",
            self.palette.len(),
            self.config.size,
            self.config.size,
            self.output_dir.display()
        );

        let outcomes = crossbeam::scope(|scope| {
            let handles: Vec<ScopedJoinHandle<Result<PathBuf, JuliaError>>> = self
                .palette
                .iter()
                .enumerate()
                .map(|(index, f)| scope.spawn(move |_| self.render_one(index, f)))
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(index, handle)| ImageOutcome {
                    index,
                    result: handle.join().unwrap_or(Err(JuliaError::WorkerPanicked)),
                })
                .collect::<Vec<ImageOutcome>>()
        })
        .unwrap_or_else(|_| {
            (0..self.palette.len())
                .map(|index| ImageOutcome {
                    index,
                    result: Err(JuliaError::WorkerPanicked),
                })
                .collect()
        });

        for outcome in &outcomes {
            if let Err(ref e) = outcome.result {
                error!("image {} failed: {}", outcome.index, e);
            }
        }

        BatchReport {
            elapsed: start.elapsed(),
            outcomes,
        }
    }

    fn render_one(&self, index: usize, f: &IterationFunction) -> Result<PathBuf, JuliaError> {
        let start = Instant::now();
        let frame = render(f, &self.config)?;
        let path = image_path(&self.output_dir, index);
        write_png(&path, &frame, self.config.overlay)?;
        info!(
            "wrote {} for {} in {} ms",
            path.display(),
            f.name,
            start.elapsed().as_millis()
        );
        Ok(path)
    }
}
