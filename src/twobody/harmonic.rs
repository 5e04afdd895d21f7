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

//! Harmonic spring.

use super::{IsotropicTwobodyEnergy, SoftPotential};
use crate::{Cutoff, Info, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Harmonic potential
///
/// $$ u(r) = \frac{1}{2} k (r - r_{eq})^2 $$
///
/// # Examples
/// ```
/// use pairpot::twobody::*;
/// let mut harmonic = Harmonic::new(1.0, 0.5);
/// assert_eq!(harmonic.isotropic_twobody_energy(2.0f64.powi(2)), 0.25);
/// harmonic.set_spring_constant(1.0);
/// assert_eq!(harmonic.isotropic_twobody_energy(2.0f64.powi(2)), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct Harmonic {
    #[cfg_attr(feature = "serde", serde(rename = "req"))]
    eq_distance: f64,
    #[cfg_attr(feature = "serde", serde(rename = "k"))]
    spring_constant: f64,
}

impl Harmonic {
    pub const fn new(eq_distance: f64, spring_constant: f64) -> Self {
        Self {
            eq_distance,
            spring_constant,
        }
    }
    pub const fn spring_constant(&self) -> f64 {
        self.spring_constant
    }
    /// Change the spring constant; takes effect on the next evaluation.
    ///
    /// Requires exclusive access, so no evaluation can observe a half-updated potential.
    pub fn set_spring_constant(&mut self, spring_constant: f64) {
        self.spring_constant = spring_constant;
    }
}

impl IsotropicTwobodyEnergy for Harmonic {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        0.5 * self.spring_constant * (distance_squared.sqrt() - self.eq_distance).powi(2)
    }
    #[inline]
    fn isotropic_twobody_derivative(&self, distance_squared: f64) -> f64 {
        let r = distance_squared.sqrt();
        self.spring_constant * r * (r - self.eq_distance)
    }
    fn isotropic_twobody_second_derivative(&self, distance_squared: f64) -> Result<f64> {
        Ok(self.spring_constant * distance_squared)
    }
}

impl SoftPotential for Harmonic {}

impl Cutoff for Harmonic {
    fn cutoff(&self) -> f64 {
        f64::INFINITY
    }
}

impl Info for Harmonic {
    fn short_name(&self) -> Option<&'static str> {
        Some("harmonic")
    }
}
