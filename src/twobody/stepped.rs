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

//! Piecewise constant potential with an arbitrary number of steps.

use super::IsotropicTwobodyEnergy;
use crate::hard::{
    stepped_bump, stepped_collision_time, stepped_state, Collision, HardCollision,
    InteractionState, Kinetic, PairKinematics, StepProfile, StepRegion, Stepped,
};
use crate::{Cutoff, Info, PotentialError, Result, Vector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Radial step potential
///
/// Step radii $d_0 < d_1 < \dots < d_{n-1}$ split space into shells where shell $i$
/// covers $d_{i-1} \le r < d_i$ with constant energy $e_i$. Beyond the last step the
/// energy is zero. An infinite energy in the innermost shell gives a hard core.
///
/// # Examples
/// ```
/// use pairpot::twobody::{IsotropicTwobodyEnergy, SteppedPotential};
/// let shoulder = SteppedPotential::new(&[1.0, 1.2, 1.5], &[f64::INFINITY, 0.5, -1.0]).unwrap();
/// assert!(shoulder.isotropic_twobody_energy(0.9).is_infinite());
/// assert_eq!(shoulder.isotropic_twobody_energy(1.1f64.powi(2)), 0.5);
/// assert_eq!(shoulder.isotropic_twobody_energy(1.3f64.powi(2)), -1.0);
/// assert_eq!(shoulder.isotropic_twobody_energy(1.6f64.powi(2)), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(try_from = "Steps", into = "Steps")
)]
pub struct SteppedPotential {
    boundaries_squared: Vec<f64>,
    energies: Vec<f64>,
}

/// Shell index of a [`SteppedPotential`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Shell(pub usize);

impl StepRegion for Shell {
    fn from_shell(shell: usize) -> Self {
        Self(shell)
    }
    fn shell(self) -> usize {
        self.0
    }
}

/// Step radii and energies as given by the user
#[cfg(feature = "serde")]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Steps {
    radii: Vec<f64>,
    energies: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<Steps> for SteppedPotential {
    type Error = PotentialError;
    fn try_from(steps: Steps) -> Result<Self> {
        Self::new(&steps.radii, &steps.energies)
    }
}

#[cfg(feature = "serde")]
impl From<SteppedPotential> for Steps {
    fn from(potential: SteppedPotential) -> Self {
        Self {
            radii: potential.radii().collect(),
            energies: potential.energies,
        }
    }
}

impl SteppedPotential {
    /// New potential from increasing step `radii` and the energy inside each of them
    pub fn new(radii: &[f64], energies: &[f64]) -> Result<Self> {
        let boundaries_squared: Vec<f64> = radii.iter().map(|r| r * r).collect();
        if let Some(&r) = radii.iter().find(|r| r.is_sign_negative()) {
            return Err(PotentialError::invalid("step radius", r, "must be positive and finite"));
        }
        StepProfile::new(&boundaries_squared, energies)?;
        Ok(Self {
            boundaries_squared,
            energies: energies.to_vec(),
        })
    }

    /// Step radii, innermost first
    pub fn radii(&self) -> impl Iterator<Item = f64> + '_ {
        self.boundaries_squared.iter().map(|d2| d2.sqrt())
    }

    /// Shell energies, innermost first
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Change the energy of a shell; takes effect on the next evaluation.
    ///
    /// Pair states obtained earlier remain valid as the steps do not move.
    pub fn set_energy(&mut self, shell: Shell, energy: f64) -> Result<()> {
        if shell.0 >= self.len() {
            return Err(PotentialError::invalid(
                "shell",
                shell.0 as f64,
                "no such shell",
            ));
        }
        if energy.is_nan() || energy == f64::NEG_INFINITY {
            return Err(PotentialError::invalid("step energy", energy, "must be finite or +∞"));
        }
        self.energies[shell.0] = energy;
        Ok(())
    }
}

impl IsotropicTwobodyEnergy for SteppedPotential {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        let profile = self.profile();
        profile.energy(profile.shell(distance_squared))
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

impl Cutoff for SteppedPotential {
    fn cutoff(&self) -> f64 {
        self.cutoff_squared().sqrt()
    }
    fn cutoff_squared(&self) -> f64 {
        self.profile().range_squared()
    }
}

impl Info for SteppedPotential {
    fn short_name(&self) -> Option<&'static str> {
        Some("stepped")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Piecewise constant radial potential")
    }
}

impl Stepped for SteppedPotential {
    type Region = Shell;
    fn profile(&self) -> StepProfile<'_> {
        StepProfile::new_unchecked(&self.boundaries_squared, &self.energies)
    }
}

impl HardCollision for SteppedPotential {
    type Region = Shell;

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
