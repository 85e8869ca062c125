// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a square on the integral plane centered on 0,0 and a
//! square on the complex plane, also centered on the origin.  Pixel
//! coordinates run over `[-n/2, n/2)` on both axes; a pixel maps to
//! the complex number `(x / scale) + (y / scale)i`, with
//! `scale = n / 4`, so the picture covers the square from -2-2i to
//! 2+2i, which is exactly the region where anything interesting can
//! happen before the escape test fires.

use num::Complex;

use crate::errors::JuliaError;

/// Describes the x, y of a pixel on the centered integral plane.
/// Either coordinate may be negative.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel(pub i64, pub i64);

// We don't need a Point, as a single Complex number is a Point.

/// Maps pixels of an `n × n` image onto the complex plane, and pixels
/// onto offsets in a flat, row-major buffer.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    size: usize,
    scale: f64,
}

impl PlaneMapper {
    /// Constructor.  The edge must be a positive multiple of four, so
    /// that the scale is exact and the half-open range `[-n/2, n/2)`
    /// holds exactly `n` pixels.
    pub fn new(size: usize) -> Result<PlaneMapper, JuliaError> {
        if size == 0 || size % 4 != 0 {
            return Err(JuliaError::config(format!(
                "image size must be a positive multiple of 4, got {}",
                size
            )));
        }
        Ok(PlaneMapper {
            size,
            scale: (size / 4) as f64,
        })
    }

    /// The edge length of the image in pixels.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Pixels per unit on the complex plane.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The total number of pixels in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.size * self.size
    }

    /// A mapper always describes at least a 4 × 4 image.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The smallest coordinate on either axis.
    pub fn min(&self) -> i64 {
        -(self.size as i64 / 2)
    }

    /// One past the largest coordinate on either axis.
    pub fn max(&self) -> i64 {
        self.size as i64 / 2
    }

    /// Given a pixel on the integral cartesian plane, map it to the
    /// point on the complex cartesian plane it stands for.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(pixel.0 as f64 / self.scale, pixel.1 as f64 / self.scale)
    }

    /// Returns the linear, row-major offset of a pixel in the image
    /// buffer, with the top-left pixel `(min, min)` at offset zero and
    /// pixel `(0, 0)` at the center.  Pixels outside the image have
    /// no offset.
    pub fn pixel_to_offset(&self, pixel: Pixel) -> Option<usize> {
        let inside = |v: i64| v >= self.min() && v < self.max();
        if !inside(pixel.0) || !inside(pixel.1) {
            return None;
        }
        let column = (pixel.0 - self.min()) as usize;
        let row = (pixel.1 - self.min()) as usize;
        Some(row * self.size + column)
    }

    /// The inverse of `pixel_to_offset`.
    pub fn offset_to_pixel(&self, offset: usize) -> Option<Pixel> {
        if offset >= self.len() {
            return None;
        }
        let column = (offset % self.size) as i64;
        let row = (offset / self.size) as i64;
        Some(Pixel(column + self.min(), row + self.min()))
    }
}
