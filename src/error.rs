// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! Error types for potential construction and evaluation.

use thiserror::Error;

/// Errors raised by potentials.
///
/// Numerical edge cases such as an infinite energy for overlapping hard cores
/// are valid results and are *not* reported through this type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PotentialError {
    /// The potential does not implement the requested quantity,
    /// e.g. a second derivative or an analytic tail integral.
    #[error("{0} is not implemented for this potential")]
    Unsupported(&'static str),

    /// A parameter was rejected when assigned.
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Rejected value.
        value: f64,
        /// What the parameter must satisfy.
        reason: &'static str,
    },

    /// The tail integral of an r⁻ⁿ term does not converge.
    #[error("tail integral of r^-{exponent} diverges in {dimension} dimension(s)")]
    DivergentTail {
        /// Exponent of the inverse power.
        exponent: f64,
        /// Spatial dimension.
        dimension: usize,
    },
}

impl PotentialError {
    /// Shorthand for [`PotentialError::InvalidParameter`]
    pub(crate) const fn invalid(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            parameter,
            value,
            reason,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = PotentialError> = std::result::Result<T, E>;
