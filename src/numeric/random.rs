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

//! Deterministic lagged-Fibonacci uniform generator.
//!
//! The stream is a pure function of the two seeds: regenerating hair with the
//! same seeds reproduces every draw bit for bit. One instance per independent
//! stream; never share a generator between workers.

use rand::RngCore;
use rand::rand_core::impls;

const LAG: usize = 97;

pub const DEFAULT_SEED_A: i32 = 1802;
pub const DEFAULT_SEED_B: i32 = 9373;
pub const MAX_SEED_A: i32 = 31328;
pub const MAX_SEED_B: i32 = 30081;

const C_INIT: f64 = 362436.0 / 16777216.0;
const CD: f64 = 7654321.0 / 16777216.0;
const CM: f64 = 16777213.0 / 16777216.0;

#[derive(Clone, Debug)]
pub struct UniformRandom {
    table: [f64; LAG],
    c: f64,
    cd: f64,
    cm: f64,
    i97: usize,
    j97: usize,
}

impl Default for UniformRandom {
    fn default() -> Self {
        Self::new(DEFAULT_SEED_A, DEFAULT_SEED_B)
    }
}

impl UniformRandom {
    pub fn new(seed_a: i32, seed_b: i32) -> Self {
        let mut rng = UniformRandom {
            table: [0.0; LAG],
            c: 0.0,
            cd: 0.0,
            cm: 0.0,
            i97: 0,
            j97: 0,
        };
        rng.reset(seed_a, seed_b);
        rng
    }

    /// Reinitialize with the default seed pair.
    pub fn reset_default(&mut self) {
        self.reset(DEFAULT_SEED_A, DEFAULT_SEED_B);
    }

    /// Reinitialize the lag table and carry from two seeds. `seed_a` is
    /// clamped to `0..=31328` and `seed_b` to `0..=30081`.
    pub fn reset(&mut self, seed_a: i32, seed_b: i32) {
        let ij = seed_a.clamp(0, MAX_SEED_A);
        let kl = seed_b.clamp(0, MAX_SEED_B);

        let mut i = (ij / 177) % 177 + 2;
        let mut j = ij % 177 + 2;
        let mut k = (kl / 169) % 178 + 1;
        let mut l = kl % 169;

        for slot in self.table.iter_mut() {
            let mut s = 0.0;
            let mut t = 0.5;
            for _ in 0..24 {
                let m = (((i * j) % 179) * k) % 179;
                i = j;
                j = k;
                k = m;
                l = (53 * l + 1) % 169;
                if (l * m) % 64 >= 32 {
                    s += t;
                }
                t *= 0.5;
            }
            *slot = s;
        }

        self.c = C_INIT;
        self.cd = CD;
        self.cm = CM;
        self.i97 = LAG - 1;
        self.j97 = 32;
    }

    /// Next value in `[0, 1)`.
    pub fn uniform_number(&mut self) -> f64 {
        let mut uni = self.table[self.i97] - self.table[self.j97];
        if uni < 0.0 {
            uni += 1.0;
        }
        self.table[self.i97] = uni;

        self.i97 = if self.i97 == 0 { LAG - 1 } else { self.i97 - 1 };
        self.j97 = if self.j97 == 0 { LAG - 1 } else { self.j97 - 1 };

        self.c -= self.cd;
        if self.c < 0.0 {
            self.c += self.cm;
        }

        uni -= self.c;
        if uni < 0.0 {
            uni += 1.0;
        }
        uni
    }

    /// Uniform double in `[min, max)`. Returns `min` without consuming a draw
    /// when the range is empty.
    pub fn uniform_f64(&mut self, min: f64, max: f64) -> f64 {
        if min == max {
            return min;
        }
        min + (max - min) * self.uniform_number()
    }

    pub fn uniform_f32(&mut self, min: f32, max: f32) -> f32 {
        if min == max {
            return min;
        }
        self.uniform_f64(min as f64, max as f64) as f32
    }

    /// Uniform integer in the closed range `[min, max]`.
    pub fn uniform_i32(&mut self, min: i32, max: i32) -> i32 {
        if min == max {
            return min;
        }
        let (lo, hi) = if min < max { (min, max) } else { (max, min) };
        let span = (hi as i64 - lo as i64 + 1) as f64;
        let offset = (self.uniform_number() * span).floor() as i64;
        (lo as i64 + offset).min(hi as i64) as i32
    }
}

/// Exposes the stream to `rand` so callers can use the `Rng` helpers while
/// keeping the deterministic sequence underneath.
impl RngCore for UniformRandom {
    fn next_u32(&mut self) -> u32 {
        // The generator carries 24 bits of precision per draw.
        (self.uniform_number() * 4294967296.0) as u32
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lag_indices_wrap() {
        let mut rng = UniformRandom::default();
        for _ in 0..LAG * 3 + 5 {
            rng.uniform_number();
            assert!(rng.i97 < LAG && rng.j97 < LAG);
        }
    }

    #[test]
    fn seeds_are_clamped() {
        let mut a = UniformRandom::new(-5, 40000);
        let mut b = UniformRandom::new(0, MAX_SEED_B);
        for _ in 0..32 {
            assert_eq!(a.uniform_number().to_bits(), b.uniform_number().to_bits());
        }
    }
}
