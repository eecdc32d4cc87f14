// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Float math for `no_std` builds, backed by `libm`.

pub(crate) trait FloatExt {
    fn abs(self) -> Self;
    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn ln(self) -> Self;
    fn exp(self) -> Self;
    fn atan(self) -> Self;
    fn exp2(self) -> Self;
}

impl FloatExt for f64 {
    fn abs(self) -> Self {
        libm::fabs(self)
    }

    fn sqrt(self) -> Self {
        libm::sqrt(self)
    }

    fn sin(self) -> Self {
        libm::sin(self)
    }

    fn cos(self) -> Self {
        libm::cos(self)
    }

    fn ln(self) -> Self {
        libm::log(self)
    }

    fn exp(self) -> Self {
        libm::exp(self)
    }

    fn atan(self) -> Self {
        libm::atan(self)
    }

    fn exp2(self) -> Self {
        libm::exp2(self)
    }
}
