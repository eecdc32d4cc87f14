// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label text for raw data values.

use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Format a raw value the way a script host prints a number.
///
/// Integral values print without a fractional part, other values print their shortest
/// round-tripping form, and magnitudes outside `[1e-6, 1e21)` switch to exponent notation
/// with an explicit sign (`1e+21`, `1.5e-7`).
pub(crate) fn format_value(v: f64) -> String {
    if v.is_nan() {
        return String::from("NaN");
    }
    if v.is_infinite() {
        return String::from(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }
    let v = if v == 0.0 { 0.0 } else { v }; // normalize `-0.0`

    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let s = alloc::format!("{v:e}");
        return match s.find('e') {
            Some(at) if !s[at + 1..].starts_with('-') => {
                let (mantissa, exponent) = s.split_at(at + 1);
                alloc::format!("{mantissa}+{exponent}")
            }
            _ => s,
        };
    }

    alloc::format!("{v}")
}
