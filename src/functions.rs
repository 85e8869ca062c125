// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The maps we draw Julia sets for.  Each one is a plain function
//! pointer, so the palette is `Copy`, `Sync`, and can be shared by
//! every thread without a lock.  Nothing here is global: callers
//! build a Palette and pass it down.

use num::Complex;

use crate::errors::JuliaError;

#[inline]
fn c(re: f64, im: f64) -> Complex<f64> {
    Complex::new(re, im)
}

/// A named map of the complex plane onto itself.
#[derive(Copy, Clone)]
pub struct IterationFunction {
    /// Human-readable formula, used in log lines.
    pub name: &'static str,
    map: fn(Complex<f64>) -> Complex<f64>,
}

impl IterationFunction {
    /// Wraps a map under a display name.
    pub fn new(name: &'static str, map: fn(Complex<f64>) -> Complex<f64>) -> Self {
        IterationFunction { name, map }
    }

    /// Applies the map once.
    #[inline]
    pub fn apply(&self, z: Complex<f64>) -> Complex<f64> {
        (self.map)(z)
    }
}

impl std::fmt::Debug for IterationFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "IterationFunction({})", self.name)
    }
}

/// An ordered, read-only collection of iteration functions.  A
/// function's position in the palette is its identity: output files
/// are named after it.
#[derive(Clone, Debug)]
pub struct Palette {
    functions: Vec<IterationFunction>,
}

impl Palette {
    /// Builds a palette from any list of functions.
    pub fn new(functions: Vec<IterationFunction>) -> Self {
        Palette { functions }
    }

    /// The eight classic maps.  The quadratic ones are the familiar
    /// `z² + c` family; the rest are there because they look good.
    pub fn standard() -> Self {
        Palette::new(vec![
            IterationFunction::new("z^2 - 0.61803398875", |z| z * z - c(0.61803398875, 0.0)),
            IterationFunction::new("z^2 + i", |z| z * z + c(0.0, 1.0)),
            IterationFunction::new("z^2 + (-0.835 - 0.2321i)", |z| z * z + c(-0.835, -0.2321)),
            IterationFunction::new("z^2 + (0.45 + 0.1428i)", |z| z * z + c(0.45, 0.1428)),
            IterationFunction::new("z^3 + 0.400", |z| z * z * z + c(0.400, 0.0)),
            IterationFunction::new("exp(z^3) - 0.621", |z| (z * z * z).exp() - c(0.621, 0.0)),
            IterationFunction::new("(z^2 + z) / ln(z) + (0.268 + 0.060i)", |z| {
                (z * z + z) / z.ln() + c(0.268, 0.060)
            }),
            IterationFunction::new("sqrt(sinh(z^2)) + (0.065 + 0.122i)", |z| {
                (z * z).sinh().sqrt() + c(0.065, 0.122)
            }),
        ])
    }

    /// Looks a function up by palette index.
    pub fn get(&self, index: usize) -> Result<&IterationFunction, JuliaError> {
        self.functions
            .get(index)
            .ok_or(JuliaError::UnknownFunction(index))
    }

    /// Walks the palette in order.
    pub fn iter(&self) -> std::slice::Iter<IterationFunction> {
        self.functions.iter()
    }

    /// Number of functions in the palette.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// True when there is nothing to render.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::standard()
    }
}
