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

//! Square well potential.

use super::IsotropicTwobodyEnergy;
use crate::hard::{
    stepped_bump, stepped_collision_time, stepped_state, Collision, HardCollision,
    InteractionState, Kinetic, PairKinematics, StepProfile, StepRegion, Stepped,
};
use crate::{Cutoff, Info, PotentialError, Result, Vector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Square well potential
///
/// A hard core of diameter σ surrounded by an attractive well of depth ε
/// reaching out to λσ:
///
/// $$ u(r) = \begin{cases} \infty & r < \sigma \\\\ -\varepsilon & \sigma \le r < \lambda\sigma \\\\ 0 & r \ge \lambda\sigma \end{cases} $$
///
/// More information [here](http://www.sklogwiki.org/SklogWiki/index.php/Square_well_model).
///
/// # Examples
/// ```
/// use pairpot::twobody::{IsotropicTwobodyEnergy, SquareWell};
/// use pairpot::Cutoff;
/// let well = SquareWell::new(1.0, 1.5, 2.0).unwrap();
/// assert_eq!(well.cutoff(), 1.5);
/// assert!(well.isotropic_twobody_energy(0.9f64.powi(2)).is_infinite());
/// assert_eq!(well.isotropic_twobody_energy(1.2f64.powi(2)), -2.0);
/// assert_eq!(well.isotropic_twobody_energy(1.5f64.powi(2)), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(try_from = "SquareWellParameters", into = "SquareWellParameters")
)]
pub struct SquareWell {
    /// Squared core diameter and squared well radius
    boundaries_squared: [f64; 2],
    /// Core and well energies, [∞, -ε]
    energies: [f64; 2],
}

/// Regions of a square well
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareWellRegion {
    /// Inside the hard core
    Overlapped,
    /// Inside the attractive well
    Well,
}

impl StepRegion for SquareWellRegion {
    fn from_shell(shell: usize) -> Self {
        if shell == 0 {
            Self::Overlapped
        } else {
            Self::Well
        }
    }
    fn shell(self) -> usize {
        match self {
            Self::Overlapped => 0,
            Self::Well => 1,
        }
    }
}

/// User-facing parameters of a square well
#[cfg(feature = "serde")]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SquareWellParameters {
    #[serde(rename = "σ")]
    sigma: f64,
    #[serde(rename = "λ")]
    lambda: f64,
    #[serde(rename = "ε")]
    epsilon: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<SquareWellParameters> for SquareWell {
    type Error = PotentialError;
    fn try_from(p: SquareWellParameters) -> Result<Self> {
        Self::new(p.sigma, p.lambda, p.epsilon)
    }
}

#[cfg(feature = "serde")]
impl From<SquareWell> for SquareWellParameters {
    fn from(well: SquareWell) -> Self {
        Self {
            sigma: well.sigma(),
            lambda: well.lambda(),
            epsilon: well.epsilon(),
        }
    }
}

impl SquareWell {
    /// New square well from core diameter σ, well width factor λ > 1 and depth ε
    ///
    /// A negative ε gives a repulsive shoulder.
    pub fn new(sigma: f64, lambda: f64, epsilon: f64) -> Result<Self> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(PotentialError::invalid("σ", sigma, "must be positive and finite"));
        }
        if !(lambda > 1.0 && lambda.is_finite()) {
            return Err(PotentialError::invalid("λ", lambda, "must be finite and exceed one"));
        }
        if !epsilon.is_finite() {
            return Err(PotentialError::invalid("ε", epsilon, "must be finite"));
        }
        Ok(Self {
            boundaries_squared: [sigma.powi(2), (lambda * sigma).powi(2)],
            energies: [f64::INFINITY, -epsilon],
        })
    }

    /// Core diameter, σ
    pub fn sigma(&self) -> f64 {
        self.boundaries_squared[0].sqrt()
    }

    /// Well radius relative to the core, λ
    pub fn lambda(&self) -> f64 {
        (self.boundaries_squared[1] / self.boundaries_squared[0]).sqrt()
    }

    /// Well depth, ε
    pub fn epsilon(&self) -> f64 {
        -self.energies[1]
    }

    /// Outer radius of the well, λσ
    pub fn well_radius(&self) -> f64 {
        self.boundaries_squared[1].sqrt()
    }

    /// Change the well depth; takes effect on the next evaluation.
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        if !epsilon.is_finite() {
            return Err(PotentialError::invalid("ε", epsilon, "must be finite"));
        }
        self.energies[1] = -epsilon;
        Ok(())
    }
}

impl IsotropicTwobodyEnergy for SquareWell {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        if distance_squared < self.boundaries_squared[0] {
            f64::INFINITY
        } else if distance_squared < self.boundaries_squared[1] {
            self.energies[1]
        } else {
            0.0
        }
    }
    #[inline]
    fn isotropic_twobody_derivative(&self, _: f64) -> f64 {
        0.0
    }
    fn isotropic_twobody_second_derivative(&self, _: f64) -> Result<f64> {
        Ok(0.0)
    }
    fn isotropic_twobody_tail_integral(&self, dimension: usize, cutoff: f64) -> Result<f64> {
        Ok(self.profile().tail_integral(dimension, cutoff))
    }
    fn isotropic_twobody_virial_tail_integral(&self, _: usize, cutoff: f64) -> Result<f64> {
        if cutoff >= self.cutoff() {
            Ok(0.0)
        } else {
            Err(PotentialError::Unsupported("virial tail across a step"))
        }
    }
}

impl Cutoff for SquareWell {
    fn cutoff(&self) -> f64 {
        self.well_radius()
    }
    fn cutoff_squared(&self) -> f64 {
        self.boundaries_squared[1]
    }
}

impl Info for SquareWell {
    fn short_name(&self) -> Option<&'static str> {
        Some("squarewell")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Square well potential")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("https://doi.org/10.1063/1.1730376")
    }
}

impl Stepped for SquareWell {
    type Region = SquareWellRegion;
    fn profile(&self) -> StepProfile<'_> {
        StepProfile::new_unchecked(&self.boundaries_squared, &self.energies)
    }
}

impl HardCollision for SquareWell {
    type Region = SquareWellRegion;

    fn state<const D: usize>(&self, kinematics: &PairKinematics<D>) -> InteractionState<Self::Region> {
        stepped_state(self, kinematics)
    }

    fn collision_time<const D: usize>(
        &self,
        kinematics: &PairKinematics<D>,
        state: InteractionState<Self::Region>,
    ) -> f64 {
        stepped_collision_time(self, kinematics, state)
    }

    fn bump<const D: usize>(
        &self,
        first: &mut impl Kinetic<D>,
        second: &mut impl Kinetic<D>,
        state: InteractionState<Self::Region>,
        separation: &Vector<D>,
        false_time: f64,
    ) -> Collision<Self::Region> {
        stepped_bump(self, first, second, state, separation, false_time)
    }
}
