// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The knobs of a render.  Defaults reproduce the classic batch: a
//! 1024-pixel square, 256 iterations, a thousand tasks in flight, one
//! worker per CPU.

use crate::buffer::MAX_ESCAPE_COUNT;
use crate::errors::JuliaError;
use crate::planes::PlaneMapper;

/// Default image edge, in pixels.
pub const DEFAULT_SIZE: usize = 1024;
/// Default iteration budget per pixel.
pub const DEFAULT_MAX_ITERATIONS: u32 = 256;
/// Default number of pixel tasks allowed in flight per render.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 1000;

/// Parameters shared by every render in a batch.  Once validated,
/// this object should not be mutated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    /// Image edge in pixels; a positive multiple of four.
    pub size: usize,
    /// Iterations before a point is presumed inside the set.
    pub max_iterations: u32,
    /// Most pixel tasks in flight at once, per render.  Zero computes
    /// everything on the sweeping thread.
    pub concurrency_limit: usize,
    /// Worker threads per render that run admitted tasks.
    pub workers: usize,
    /// Tint pixels by the path that computed them.
    pub overlay: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            size: DEFAULT_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            workers: num_cpus::get(),
            overlay: false,
        }
    }
}

impl RenderConfig {
    /// The default configuration at another image size.
    pub fn with_size(size: usize) -> Self {
        RenderConfig {
            size,
            ..RenderConfig::default()
        }
    }

    /// Checks every field, and returns the plane the configuration
    /// describes.
    pub fn validate(&self) -> Result<PlaneMapper, JuliaError> {
        let plane = PlaneMapper::new(self.size)?;
        if self.max_iterations == 0 || self.max_iterations > MAX_ESCAPE_COUNT {
            return Err(JuliaError::config(format!(
                "iteration count must be between 1 and {}, got {}",
                MAX_ESCAPE_COUNT, self.max_iterations
            )));
        }
        if self.workers == 0 {
            return Err(JuliaError::config("at least one worker thread is required"));
        }
        Ok(plane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RenderConfig::default();
        assert_eq!(config.size, 1024);
        assert_eq!(config.max_iterations, 256);
        assert_eq!(config.concurrency_limit, 1000);
        assert!(config.workers >= 1);
        assert!(!config.overlay);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_sizes() {
        assert!(RenderConfig::with_size(0).validate().is_err());
        assert!(RenderConfig::with_size(10).validate().is_err());
        assert!(RenderConfig::with_size(12).validate().is_ok());
    }

    #[test]
    fn rejects_bad_iteration_counts() {
        let mut config = RenderConfig::with_size(8);
        config.max_iterations = 0;
        assert!(config.validate().is_err());
        config.max_iterations = MAX_ESCAPE_COUNT + 1;
        assert!(config.validate().is_err());
        config.max_iterations = MAX_ESCAPE_COUNT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_workers_but_not_zero_limit() {
        let mut config = RenderConfig::with_size(8);
        config.concurrency_limit = 0;
        assert!(config.validate().is_ok());
        config.workers = 0;
        match config.validate() {
            Err(JuliaError::Config(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
