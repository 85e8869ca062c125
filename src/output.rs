// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing finished frames to disk as PNG.

use image::png::PNGEncoder;
use image::ColorType;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::buffer::Frame;
use crate::errors::JuliaError;

/// The file a palette entry's image is written to.
pub fn file_name(index: usize) -> String {
    format!("picture-{}.png", index)
}

/// Where the image for palette entry `index` goes inside `directory`.
pub fn image_path(directory: &Path, index: usize) -> PathBuf {
    directory.join(file_name(index))
}

/// Encodes a frame as an 8-bit RGBA PNG.  The top-left corner of the
/// file is the frame's `(min, min)` pixel, so the origin of the plane
/// lands in the middle of the picture.
pub fn write_png(path: &Path, frame: &Frame, overlay: bool) -> Result<(), JuliaError> {
    let io_error = |cause: io::Error| JuliaError::Io {
        path: path.display().to_string(),
        cause,
    };
    let output = File::create(path).map_err(io_error)?;
    let mut output = BufWriter::new(output);
    let size = frame.size() as u32;
    PNGEncoder::new(&mut output)
        .encode(&frame.to_rgba(overlay), size, size, ColorType::RGBA(8))
        .map_err(io_error)?;
    output.flush().map_err(io_error)?;
    Ok(())
}
