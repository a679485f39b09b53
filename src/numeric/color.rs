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

use serde::{Deserialize, Serialize};

use crate::geometry::util::lerp;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Hue in `[0, 1)` turns, saturation and value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: f64) -> Self {
        Self::new(v, v, v)
    }

    pub fn mul(&self, other: &Rgb) -> Rgb {
        Rgb::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    pub fn distance_squared(&self, other: &Rgb) -> f64 {
        let (dr, dg, db) = (self.r - other.r, self.g - other.g, self.b - other.b);
        dr * dr + dg * dg + db * db
    }

    pub fn to_f32_array(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    pub fn to_hsv(&self) -> Hsv {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let v = max;
        let s = if max > 0.0 { delta / max } else { 0.0 };
        if delta <= 0.0 {
            return Hsv { h: 0.0, s, v };
        }

        let h = if self.r >= max {
            (self.g - self.b) / delta
        } else if self.g >= max {
            2.0 + (self.b - self.r) / delta
        } else {
            4.0 + (self.r - self.g) / delta
        };
        Hsv {
            h: (h / 6.0).rem_euclid(1.0),
            s,
            v,
        }
    }
}

impl Hsv {
    pub fn to_rgb(&self) -> Rgb {
        if self.s <= 0.0 {
            return Rgb::gray(self.v);
        }
        let h = self.h.rem_euclid(1.0) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = self.v * (1.0 - self.s);
        let q = self.v * (1.0 - self.s * f);
        let t = self.v * (1.0 - self.s * (1.0 - f));
        match sector as u32 {
            0 => Rgb::new(self.v, t, p),
            1 => Rgb::new(q, self.v, p),
            2 => Rgb::new(p, self.v, t),
            3 => Rgb::new(p, q, self.v),
            4 => Rgb::new(t, p, self.v),
            _ => Rgb::new(self.v, p, q),
        }
    }

    /// Shift hue by `dh` turns (wrapping) and scale value by `dv`.
    pub fn shifted(&self, dh: f64, dv: f64) -> Hsv {
        Hsv {
            h: (self.h + dh).rem_euclid(1.0),
            s: self.s,
            v: (self.v * dv).max(0.0),
        }
    }

    /// Interpolates along the shorter way around the hue circle. An
    /// achromatic end takes the hue of the other end.
    pub fn lerp(&self, other: &Hsv, t: f64) -> Hsv {
        let (from, to) = match (self.s == 0.0, other.s == 0.0) {
            (true, false) => (other.h, other.h),
            (false, true) => (self.h, self.h),
            _ => (self.h, other.h),
        };
        let mut dh = to - from;
        if dh > 0.5 {
            dh -= 1.0;
        } else if dh < -0.5 {
            dh += 1.0;
        }
        Hsv {
            h: (from + dh * t).rem_euclid(1.0),
            s: lerp(self.s, other.s, t),
            v: lerp(self.v, other.v, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &Rgb, b: &Rgb) -> bool {
        a.distance_squared(b) < 1e-18
    }

    #[test]
    fn hsv_round_trip_primaries() {
        for c in [
            Rgb::new(1.0, 0.0, 0.0),
            Rgb::new(0.0, 1.0, 0.0),
            Rgb::new(0.0, 0.0, 1.0),
            Rgb::new(0.3, 0.2, 0.1),
            Rgb::gray(0.5),
        ] {
            assert!(close(&c.to_hsv().to_rgb(), &c), "{c:?}");
        }
    }

    #[test]
    fn hue_lerp_takes_short_way() {
        let a = Hsv { h: 0.95, s: 1.0, v: 1.0 };
        let b = Hsv { h: 0.05, s: 1.0, v: 1.0 };
        let mid = a.lerp(&b, 0.5);
        assert!(mid.h < 1e-12 || (1.0 - mid.h) < 1e-12);
    }

    #[test]
    fn lerp_toward_gray_keeps_hue() {
        let blue = Rgb::new(0.0, 0.0, 1.0).to_hsv();
        for tip in [Rgb::WHITE.to_hsv(), Rgb::gray(0.4).to_hsv()] {
            for t in [0.25, 0.5, 0.75] {
                let mid = tip.lerp(&blue, t);
                assert!((mid.h - blue.h).abs() < 1e-12);
                let mid = blue.lerp(&tip, t).to_rgb();
                assert!((mid.r - mid.g).abs() < 1e-12);
                assert!(mid.b > mid.r);
            }
        }
    }
}
