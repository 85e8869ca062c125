#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Julia set renderer
//!
//! A Julia set is the boundary of the region of the complex plane
//! whose points stay bounded when some complex function is applied
//! to them over and over.  We render them the classic escape-time
//! way: take the point a pixel stands for, iterate the function on
//! it, and count how many steps pass before the orbit leaves the
//! circle of radius two.  That count becomes the pixel's color.
//!
//! The library renders one image per function in a fixed palette,
//! all of them at once.  Inside a single image, pixels are handed out
//! as independent tasks to a small pool of worker threads, but only
//! as many as the admission controller lets through; once that many
//! are in flight, the sweeping thread stops handing work off and
//! computes the pixel itself.  Every render waits for all of its
//! tasks before the image is frozen and written out.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod admission;
pub mod batch;
pub mod buffer;
pub mod color;
pub mod config;
pub mod errors;
pub mod escape;
pub mod functions;
pub mod output;
pub mod planes;
pub mod render;

pub use admission::AdmissionController;
pub use batch::{BatchDriver, BatchReport};
pub use buffer::{Frame, RenderStats};
pub use config::RenderConfig;
pub use errors::JuliaError;
pub use escape::iterate;
pub use functions::{IterationFunction, Palette};
pub use render::render;
