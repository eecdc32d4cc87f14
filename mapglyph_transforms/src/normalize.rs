// Copyright 2025 the Mapglyph Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar-or-sequence coercion and normalization against per-value maxima.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::Deref;

use serde::{Deserialize, Serialize};

/// Errors returned when glyph inputs cannot be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `max_values` is neither a single number nor as long as `data`.
    #[error(
        "`maxValues` should be a single number or have same length as `data` \
         (got {max_values} maxima for {data} values)"
    )]
    MaxValuesLength {
        /// Length of the data sequence.
        data: usize,
        /// Length of the maxima sequence.
        max_values: usize,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(f64),
    Many(Vec<f64>),
}

/// An ordered sequence of numbers that may be written as a bare scalar.
///
/// A scalar is coerced to a one-element sequence, both through `From` and when deserializing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct Values(Vec<f64>);

impl Values {
    /// Return the values as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<OneOrMany> for Values {
    fn from(v: OneOrMany) -> Self {
        match v {
            OneOrMany::One(x) => Self(vec![x]),
            OneOrMany::Many(xs) => Self(xs),
        }
    }
}

impl From<f64> for Values {
    fn from(v: f64) -> Self {
        Self(vec![v])
    }
}

impl From<Vec<f64>> for Values {
    fn from(v: Vec<f64>) -> Self {
        Self(v)
    }
}

impl From<&[f64]> for Values {
    fn from(v: &[f64]) -> Self {
        Self(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Values {
    fn from(v: [f64; N]) -> Self {
        Self(v.to_vec())
    }
}

impl Deref for Values {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Divide each datum by its maximum.
///
/// Result `i` is `data[i] / max_values[i % max_values.len()]`, so a single maximum is
/// broadcast to every datum. `max_values` must hold exactly one value or as many values as
/// `data`; any other length is rejected before anything is computed.
///
/// Division follows IEEE semantics: a zero maximum yields an infinity or `NaN`, which is
/// passed through unchanged.
pub fn normalize(data: &[f64], max_values: &[f64]) -> Result<Vec<f64>, ConfigError> {
    if max_values.len() != 1 && max_values.len() != data.len() {
        return Err(ConfigError::MaxValuesLength {
            data: data.len(),
            max_values: max_values.len(),
        });
    }

    Ok(data
        .iter()
        .enumerate()
        .map(|(i, d)| d / max_values[i % max_values.len()])
        .collect())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::string::ToString;

    #[test]
    fn single_max_is_broadcast() {
        let data = [1.0, -2.0, 3.0, 0.0];
        let out = normalize(&data, &[2.0]).unwrap();
        for (i, v) in out.iter().enumerate() {
            assert_eq!(*v, data[i] / 2.0);
        }
    }

    #[test]
    fn per_value_maxima_pair_up_by_index() {
        assert_eq!(
            normalize(&[1.0, 2.0, 3.0], &[2.0, 4.0, 3.0]).unwrap(),
            vec![0.5, 0.5, 1.0]
        );
    }

    #[test]
    fn results_are_not_clamped() {
        assert_eq!(
            normalize(&[1.0, 2.0, 3.0], &[1.0]).unwrap(),
            vec![1.0, 2.0, 3.0]
        );
        assert_eq!(normalize(&[-4.0], &[2.0]).unwrap(), vec![-2.0]);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = normalize(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MaxValuesLength {
                data: 3,
                max_values: 2
            }
        );
        assert!(err.to_string().contains("maxValues"));

        assert!(normalize(&[1.0], &[1.0, 2.0]).is_err());
        assert!(normalize(&[1.0, 2.0], &[]).is_err());
    }

    #[test]
    fn empty_data_with_single_max_is_empty() {
        assert!(normalize(&[], &[1.0]).unwrap().is_empty());
    }

    #[test]
    fn zero_max_passes_non_finite_through() {
        let out = normalize(&[1.0, 0.0], &[0.0]).unwrap();
        assert!(out[0].is_infinite());
        assert!(out[1].is_nan());
    }

    #[test]
    fn scalars_coerce_to_one_element() {
        assert_eq!(Values::from(3.0).as_slice(), &[3.0]);

        let v: Values = serde_json::from_str("2.5").unwrap();
        assert_eq!(v.as_slice(), &[2.5]);
        let v: Values = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.0,2.0,3.0]");
    }
}
