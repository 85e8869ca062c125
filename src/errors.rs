// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The one error type the library returns.  An orbit that wanders
//! off into NaN is *not* an error; see `escape::classify`.

use failure::Fail;
use std::io;

/// Everything that can go wrong between a configuration and a PNG on
/// disk.
#[derive(Debug, Fail)]
pub enum JuliaError {
    /// A RenderConfig value is out of range.
    #[fail(display = "invalid configuration: {}", _0)]
    Config(String),

    /// Asked for a palette entry that isn't there.
    #[fail(display = "no iteration function at palette index {}", _0)]
    UnknownFunction(usize),

    /// The grid was frozen with cells that were never written, or
    /// after somebody tried to write a cell twice.
    #[fail(
        display = "render incomplete: {} unwritten pixels, {} rejected writes",
        unwritten, rejected
    )]
    Incomplete {
        /// Cells nobody wrote.
        unwritten: usize,
        /// Writes turned away because the cell was already set or
        /// lies outside the image.
        rejected: usize,
    },

    /// A thread died while rendering.
    #[fail(display = "a render thread panicked")]
    WorkerPanicked,

    /// Creating or encoding an output file failed.
    #[fail(display = "could not write {}: {}", path, cause)]
    Io {
        /// The file we were writing.
        path: String,
        /// What the operating system or the encoder said.
        #[cause]
        cause: io::Error,
    },
}

impl JuliaError {
    /// Convenience for configuration complaints.
    pub fn config<S: Into<String>>(message: S) -> Self {
        JuliaError::Config(message.into())
    }
}
