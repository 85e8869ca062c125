// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The image buffer, in two stages.
//!
//! While a render is running, pixels land in a `PixelGrid`.  Many
//! threads write into it at once, but never into the same cell, so
//! each cell is its own atomic word and no lock is needed.  A cell
//! can be written exactly once: the write is a compare-and-swap
//! against the empty value, and a second write to the same cell is
//! turned away and counted.
//!
//! When every task has finished, the grid is frozen into a `Frame`,
//! an ordinary immutable buffer.  Freezing checks that every cell was
//! written and nothing was written twice, so a Frame that exists is a
//! complete image.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::color::{colorize, Path};
use crate::errors::JuliaError;
use crate::planes::{Pixel, PlaneMapper};

const WRITTEN: u32 = 1 << 31;
const CONCURRENT: u32 = 1 << 30;

/// The largest escape count a cell can hold.
pub const MAX_ESCAPE_COUNT: u32 = CONCURRENT - 1;

/// Bookkeeping about how a frame was produced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Pixels computed as tasks on worker threads.
    pub concurrent: usize,
    /// Pixels computed by the sweeping thread after admission said no.
    pub inline: usize,
    /// Pixels whose orbit hit a singularity.
    pub undefined: usize,
    /// The most tasks the admission controller ever had in flight.
    pub peak_in_flight: usize,
}

impl RenderStats {
    /// Every pixel, whichever path computed it.
    pub fn total(&self) -> usize {
        self.concurrent + self.inline
    }
}

/// The write-once grid shared by all tasks of one render.
#[derive(Debug)]
pub struct PixelGrid {
    plane: PlaneMapper,
    cells: Vec<AtomicU32>,
    rejected: AtomicUsize,
}

impl PixelGrid {
    /// An empty grid the size of the plane.
    pub fn new(plane: PlaneMapper) -> Self {
        let cells = (0..plane.len()).map(|_| AtomicU32::new(0)).collect();
        PixelGrid {
            plane,
            cells,
            rejected: AtomicUsize::new(0),
        }
    }

    /// The plane this grid covers.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Stores the escape count of a pixel.  Returns false, and
    /// remembers the failure, when the cell was already written or
    /// the pixel lies outside the image.
    pub fn record(&self, pixel: Pixel, count: u32, path: Path) -> bool {
        debug_assert!(count <= MAX_ESCAPE_COUNT);
        let offset = match self.plane.pixel_to_offset(pixel) {
            Some(offset) => offset,
            None => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                return false;
            }
        };
        let path_bit = match path {
            Path::Concurrent => CONCURRENT,
            Path::Inline => 0,
        };
        let value = WRITTEN | path_bit | (count & MAX_ESCAPE_COUNT);
        match self.cells[offset].compare_exchange(0, value, Ordering::Release, Ordering::Relaxed) {
            Ok(_) => true,
            Err(_) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Ends the render.  Taking the grid by value means no task can
    /// still hold a reference to it.
    pub fn freeze(self) -> Result<Frame, JuliaError> {
        let rejected = self.rejected.into_inner();
        let mut counts = Vec::with_capacity(self.cells.len());
        let mut paths = Vec::with_capacity(self.cells.len());
        let mut stats = RenderStats::default();
        let mut unwritten = 0;
        for cell in self.cells {
            let value = cell.into_inner();
            if value & WRITTEN == 0 {
                unwritten += 1;
                counts.push(0);
                paths.push(Path::Inline);
                continue;
            }
            counts.push(value & MAX_ESCAPE_COUNT);
            if value & CONCURRENT != 0 {
                stats.concurrent += 1;
                paths.push(Path::Concurrent);
            } else {
                stats.inline += 1;
                paths.push(Path::Inline);
            }
        }
        if unwritten > 0 || rejected > 0 {
            return Err(JuliaError::Incomplete {
                unwritten,
                rejected,
            });
        }
        Ok(Frame {
            plane: self.plane,
            counts,
            paths,
            stats,
        })
    }
}

/// A finished image: one escape count per pixel, in row-major order
/// from the top-left corner.
#[derive(Clone, Debug)]
pub struct Frame {
    plane: PlaneMapper,
    counts: Vec<u32>,
    paths: Vec<Path>,
    stats: RenderStats,
}

impl Frame {
    /// Edge length in pixels.
    pub fn size(&self) -> usize {
        self.plane.size()
    }

    /// The plane the frame was rendered on.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// All escape counts, row-major.  These are deterministic: the
    /// same function and size always give the same counts.
    pub fn escape_counts(&self) -> &[u32] {
        &self.counts
    }

    /// The escape count at a pixel.
    pub fn escape_count(&self, pixel: Pixel) -> Option<u32> {
        self.plane.pixel_to_offset(pixel).map(|offset| self.counts[offset])
    }

    /// Which path computed a pixel.  Not deterministic.
    pub fn path(&self, pixel: Pixel) -> Option<Path> {
        self.plane.pixel_to_offset(pixel).map(|offset| self.paths[offset])
    }

    /// How the frame was produced.
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut RenderStats {
        &mut self.stats
    }

    /// Packs the frame into RGBA bytes, four per pixel, ready for an
    /// encoder.
    pub fn to_rgba(&self, overlay: bool) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.counts.len() * 4);
        for (count, path) in self.counts.iter().zip(self.paths.iter()) {
            raw.extend_from_slice(&colorize(*count, *path, overlay));
        }
        raw
    }
}
