// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::collections::TryReserveError;
use std::io;

/// Errors produced while building samplers, generating hair or moving data
/// in and out of the crate.
#[derive(thiserror::Error, Debug)]
pub enum HairError {
    /// Every sampled location of the density texture was zero.
    #[error("density is zero over all {triangles} triangles")]
    ZeroDensity { triangles: usize },

    /// The CDF search did not resolve to an entry. Unreachable for a
    /// correctly built sampler.
    #[error("CDF search failed for xi = {xi} (total {total})")]
    SamplingFailed { xi: f64, total: f64 },

    #[error("allocation failed while building sampler: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("generation cancelled")]
    Cancelled,

    #[error("invalid texture: {0}")]
    InvalidTexture(String),

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = HairError> = std::result::Result<T, E>;
