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

//! Hard sphere potential.

use super::IsotropicTwobodyEnergy;
use crate::hard::{
    stepped_bump, stepped_collision_time, stepped_state, Collision, HardCollision,
    InteractionState, Kinetic, PairKinematics, StepProfile, StepRegion, Stepped,
};
#[cfg(feature = "serde")]
use crate::{positive_square_deserialize, sqrt_serialize};
use crate::{Cutoff, Info, PotentialError, Result, Vector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hardsphere potential
///
/// More information [here](http://www.sklogwiki.org/SklogWiki/index.php/Hard_sphere_model).
/// # Examples
/// ~~~
/// use pairpot::twobody::{HardSphere, IsotropicTwobodyEnergy};
/// let hardsphere = HardSphere::new(1.0).unwrap();
/// let distance: f64 = 0.9; // smaller than the minimum distance
/// assert!(hardsphere.isotropic_twobody_energy(distance.powi(2)).is_infinite());
/// let distance: f64 = 1.1; // greater than the minimum distance
/// assert_eq!(hardsphere.isotropic_twobody_energy(distance.powi(2)), 0.0);
/// ~~~
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct HardSphere {
    /// Minimum distance
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "σ",
            serialize_with = "sqrt_serialize",
            deserialize_with = "positive_square_deserialize"
        )
    )]
    min_distance_squared: f64,
}

/// The only region of a hard sphere: the overlapped core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardSphereRegion {
    Overlapped,
}

impl StepRegion for HardSphereRegion {
    fn from_shell(_: usize) -> Self {
        Self::Overlapped
    }
    fn shell(self) -> usize {
        0
    }
}

impl HardSphere {
    /// Create by giving the minimum distance where if smaller, the energy is infinite or zero otherwise
    pub fn new(min_distance: f64) -> Result<Self> {
        if !(min_distance > 0.0 && min_distance.is_finite()) {
            return Err(PotentialError::invalid(
                "σ",
                min_distance,
                "must be positive and finite",
            ));
        }
        Ok(Self {
            min_distance_squared: min_distance.powi(2),
        })
    }

    /// Contact distance, σ
    pub fn sigma(&self) -> f64 {
        self.min_distance_squared.sqrt()
    }

    /// Change the contact distance; pair states obtained earlier become stale.
    pub fn set_sigma(&mut self, min_distance: f64) -> Result<()> {
        *self = Self::new(min_distance)?;
        Ok(())
    }
}

impl IsotropicTwobodyEnergy for HardSphere {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        if distance_squared < self.min_distance_squared {
            f64::INFINITY
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
            Err(PotentialError::Unsupported("virial tail across a hard core"))
        }
    }
}

impl Cutoff for HardSphere {
    fn cutoff(&self) -> f64 {
        self.cutoff_squared().sqrt()
    }
    fn cutoff_squared(&self) -> f64 {
        self.min_distance_squared
    }
}

impl Info for HardSphere {
    fn short_name(&self) -> Option<&'static str> {
        Some("hardsphere")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("https://en.wikipedia.org/wiki/Hard_spheres")
    }
}

impl Stepped for HardSphere {
    type Region = HardSphereRegion;
    fn profile(&self) -> StepProfile<'_> {
        StepProfile::new_unchecked(
            std::slice::from_ref(&self.min_distance_squared),
            &[f64::INFINITY],
        )
    }
}

impl HardCollision for HardSphere {
    type Region = HardSphereRegion;

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
