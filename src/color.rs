// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns escape counts into colors.  The blue channel cycles every
//! 32 iterations, which gives the bands around the set.  Red and
//! green are normally dark; with the overlay on, they show which
//! path computed the pixel: a worker (green-ish) or the sweeping
//! thread itself (red-ish).  Which path a pixel takes depends on
//! thread timing, so overlaid images differ from run to run.

/// Red, green, blue, alpha.
pub type Rgba = [u8; 4];

/// How a pixel got computed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Path {
    /// Admitted, and run as a task on a worker thread.
    Concurrent,
    /// Turned away by admission control, and run by the sweep.
    Inline,
}

const BAND: u32 = 32;
const BAND_STEP: u32 = 8;

/// The blue channel for an escape count.
#[inline]
pub fn band(count: u32) -> u8 {
    ((count % BAND) * BAND_STEP) as u8
}

/// The color of a pixel.  With `overlay` off, the path is ignored
/// and the color depends only on the escape count.
pub fn colorize(count: u32, path: Path, overlay: bool) -> Rgba {
    let (r, g) = match (overlay, path) {
        (false, _) => (0, 0),
        (true, Path::Concurrent) => (10, 30),
        (true, Path::Inline) => (30, 10),
    };
    [r, g, band(count), 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blue_cycles_every_thirty_two() {
        assert_eq!(band(0), 0);
        assert_eq!(band(1), 8);
        assert_eq!(band(31), 248);
        assert_eq!(band(32), 0);
        assert_eq!(band(256), 0);
        assert_eq!(band(33), 8);
    }

    #[test]
    fn overlay_tints_by_path() {
        assert_eq!(colorize(3, Path::Concurrent, true), [10, 30, 24, 255]);
        assert_eq!(colorize(3, Path::Inline, true), [30, 10, 24, 255]);
    }

    #[test]
    fn without_overlay_path_is_invisible() {
        assert_eq!(
            colorize(5, Path::Concurrent, false),
            colorize(5, Path::Inline, false)
        );
    }
}
