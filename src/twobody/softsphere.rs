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

//! Inverse power (soft sphere) potential.

use super::{inverse_power_tail, IsotropicTwobodyEnergy, SoftPotential};
use crate::{Cutoff, Info, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inverse power potential, also known as the soft sphere potential
///
/// $$ u(r) = \varepsilon \left( \frac{\sigma}{r} \right)^n $$
///
/// The tail integral is finite only for exponents larger than the spatial dimension.
///
/// # Examples
/// ```
/// use pairpot::twobody::*;
/// let soft_sphere = InversePower::new(1.0, 1.0, 12.0);
/// assert_eq!(soft_sphere.isotropic_twobody_energy(1.0), 1.0);
/// assert_eq!(soft_sphere.isotropic_twobody_derivative(1.0), -12.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct InversePower {
    #[cfg_attr(feature = "serde", serde(alias = "eps", alias = "ε"))]
    epsilon: f64,
    #[cfg_attr(feature = "serde", serde(alias = "σ"))]
    sigma: f64,
    #[cfg_attr(feature = "serde", serde(alias = "n"))]
    exponent: f64,
}

impl InversePower {
    pub const fn new(epsilon: f64, sigma: f64, exponent: f64) -> Self {
        Self {
            epsilon,
            sigma,
            exponent,
        }
    }
    pub const fn exponent(&self) -> f64 {
        self.exponent
    }
}

impl IsotropicTwobodyEnergy for InversePower {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        self.epsilon * (self.sigma * self.sigma / distance_squared).powf(0.5 * self.exponent)
    }
    #[inline]
    fn isotropic_twobody_derivative(&self, distance_squared: f64) -> f64 {
        -self.exponent * self.isotropic_twobody_energy(distance_squared)
    }
    fn isotropic_twobody_second_derivative(&self, distance_squared: f64) -> Result<f64> {
        let n = self.exponent;
        Ok(n * (n + 1.0) * self.isotropic_twobody_energy(distance_squared))
    }
    fn isotropic_twobody_tail_integral(&self, dimension: usize, cutoff: f64) -> Result<f64> {
        let coefficient = self.epsilon * self.sigma.powf(self.exponent);
        inverse_power_tail(coefficient, self.exponent, dimension, cutoff)
    }
    fn isotropic_twobody_virial_tail_integral(
        &self,
        dimension: usize,
        cutoff: f64,
    ) -> Result<f64> {
        Ok(-self.exponent * self.isotropic_twobody_tail_integral(dimension, cutoff)?)
    }
}

impl SoftPotential for InversePower {}

impl Cutoff for InversePower {
    fn cutoff(&self) -> f64 {
        f64::INFINITY
    }
}

impl Info for InversePower {
    fn short_name(&self) -> Option<&'static str> {
        Some("softsphere")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Inverse power potential")
    }
}
