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

//! Hard potential with added soft terms.

use super::{IsotropicTwobodyEnergy, SoftPotential};
use crate::hard::{Collision, HardCollision, InteractionState, Kinetic, PairKinematics};
use crate::{Cutoff, Result, Vector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sum of exactly one hard potential and a soft part
///
/// Collisions are those of the hard potential alone while energies and
/// derivatives include the soft part, which must be handled by the caller's
/// integrator between events. The soft part must be a [`SoftPotential`], so
/// adding two hard potentials does not compile:
///
/// ```compile_fail
/// use pairpot::twobody::*;
/// let sum = HardSum::new(
///     HardSphere::new(1.0).unwrap(),
///     SquareWell::new(1.0, 1.5, 1.0).unwrap(),
/// );
/// ```
///
/// # Examples
/// ```
/// use pairpot::twobody::*;
/// use pairpot::Cutoff;
/// let sum = HardSum::new(HardSphere::new(1.0).unwrap(), InversePower::new(1.0, 1.0, 12.0));
/// assert!(sum.isotropic_twobody_energy(0.81).is_infinite());
/// assert_eq!(sum.isotropic_twobody_energy(1.0), 1.0);
/// assert!(sum.cutoff().is_infinite());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct HardSum<H, S> {
    hard: H,
    soft: S,
}

impl<H: HardCollision, S: SoftPotential> HardSum<H, S> {
    pub const fn new(hard: H, soft: S) -> Self {
        Self { hard, soft }
    }
    /// The potential that determines collisions
    pub const fn hard(&self) -> &H {
        &self.hard
    }
    pub const fn soft(&self) -> &S {
        &self.soft
    }
    /// Mutable access to the soft part; the collision dynamics are unaffected
    pub fn soft_mut(&mut self) -> &mut S {
        &mut self.soft
    }
}

impl<H, S> IsotropicTwobodyEnergy for HardSum<H, S>
where
    H: HardCollision + IsotropicTwobodyEnergy,
    S: SoftPotential,
{
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        let hard = self.hard.isotropic_twobody_energy(distance_squared);
        if hard.is_infinite() {
            return hard;
        }
        hard + self.soft.isotropic_twobody_energy(distance_squared)
    }
    #[inline]
    fn isotropic_twobody_derivative(&self, distance_squared: f64) -> f64 {
        self.hard.isotropic_twobody_derivative(distance_squared)
            + self.soft.isotropic_twobody_derivative(distance_squared)
    }
    fn isotropic_twobody_second_derivative(&self, distance_squared: f64) -> Result<f64> {
        Ok(self.hard.isotropic_twobody_second_derivative(distance_squared)?
            + self.soft.isotropic_twobody_second_derivative(distance_squared)?)
    }
    fn isotropic_twobody_tail_integral(&self, dimension: usize, cutoff: f64) -> Result<f64> {
        Ok(self.hard.isotropic_twobody_tail_integral(dimension, cutoff)?
            + self.soft.isotropic_twobody_tail_integral(dimension, cutoff)?)
    }
    fn isotropic_twobody_virial_tail_integral(
        &self,
        dimension: usize,
        cutoff: f64,
    ) -> Result<f64> {
        Ok(
            self.hard.isotropic_twobody_virial_tail_integral(dimension, cutoff)?
                + self.soft.isotropic_twobody_virial_tail_integral(dimension, cutoff)?,
        )
    }
}

impl<H: Cutoff, S: Cutoff> Cutoff for HardSum<H, S> {
    fn cutoff(&self) -> f64 {
        f64::max(self.hard.cutoff(), self.soft.cutoff())
    }
}

impl<H: HardCollision, S: SoftPotential> HardCollision for HardSum<H, S> {
    type Region = H::Region;

    fn state<const D: usize>(&self, kinematics: &PairKinematics<D>) -> InteractionState<Self::Region> {
        self.hard.state(kinematics)
    }

    fn collision_time<const D: usize>(
        &self,
        kinematics: &PairKinematics<D>,
        state: InteractionState<Self::Region>,
    ) -> f64 {
        self.hard.collision_time(kinematics, state)
    }

    fn bump<const D: usize>(
        &self,
        first: &mut impl Kinetic<D>,
        second: &mut impl Kinetic<D>,
        state: InteractionState<Self::Region>,
        separation: &Vector<D>,
        false_time: f64,
    ) -> Collision<Self::Region> {
        self.hard.bump(first, second, state, separation, false_time)
    }
}
