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

//! Hard potentials that need no per-pair state from the scheduler.

use super::{Collision, HardCollision, InteractionState, Kinetic, PairKinematics, Stepped};
use crate::twobody::IsotropicTwobodyEnergy;
use crate::{Cutoff, PotentialError, Result, Vector};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const TOLERANCE: f64 = 1e-9;

/// Step potential that recomputes the pair state on every call
///
/// The wrapped potential always reports [`InteractionState::NotInteracting`], so a
/// scheduler need not store anything per pair. The true shell is recovered from
/// the separation, and pairs sitting on a step (within a relative `tolerance` in
/// 𝑟²) are placed on the side they are moving into for
/// [`HardCollision::collision_time`], or coming from for [`HardCollision::bump`].
/// This reproduces the collision sequence of the wrapped, stateful potential.
///
/// The tolerance is a band $|r^2 - d^2| \le \text{tolerance} \cdot d^2$ around each
/// step $d$. It is independent of the false time passed to
/// [`HardCollision::bump`], so pairs are not nudged along their motion by an
/// amount proportional to it.
///
/// # Examples
/// ```
/// use pairpot::hard::*;
/// use pairpot::twobody::SquareWell;
/// use pairpot::Vector3;
/// let fast = Stateless::new(SquareWell::new(1.0, 1.5, 1.0).unwrap());
/// let kin = PairKinematics::new(Vector3::new(3.0, 0.0, 0.0), Vector3::new(-2.0, 0.0, 0.0));
/// assert_eq!(fast.state(&kin), InteractionState::NotInteracting);
/// assert_eq!(fast.collision_time(&kin, InteractionState::NotInteracting), 0.75);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Stateless<P> {
    potential: P,
    #[cfg_attr(
        feature = "serde",
        serde(
            default = "default_tolerance",
            deserialize_with = "tolerance_deserialize"
        )
    )]
    tolerance: f64,
}

#[cfg(feature = "serde")]
const fn default_tolerance() -> f64 {
    TOLERANCE
}

/// Reject negative and non-finite tolerances when deserializing
#[cfg(feature = "serde")]
fn tolerance_deserialize<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let tolerance = f64::deserialize(deserializer)?;
    if tolerance >= 0.0 && tolerance.is_finite() {
        Ok(tolerance)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a non-negative, finite tolerance, got {tolerance}"
        )))
    }
}

impl<P: Stepped> Stateless<P> {
    /// Default relative tolerance for detecting a pair sitting on a step
    pub const DEFAULT_TOLERANCE: f64 = TOLERANCE;

    pub const fn new(potential: P) -> Self {
        Self {
            potential,
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }

    /// Wrap `potential` with a custom step tolerance
    pub fn with_tolerance(potential: P, tolerance: f64) -> Result<Self> {
        if !(tolerance >= 0.0 && tolerance.is_finite()) {
            return Err(PotentialError::invalid(
                "tolerance",
                tolerance,
                "must be non-negative and finite",
            ));
        }
        Ok(Self {
            potential,
            tolerance,
        })
    }

    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The wrapped, stateful potential
    pub const fn inner(&self) -> &P {
        &self.potential
    }

    /// Shell of a pair, looking along (`direction = 1`) or against (`-1`) its motion
    fn shell<const D: usize>(&self, kinematics: &PairKinematics<D>, direction: f64) -> Option<usize> {
        self.potential.profile().shell_moving(
            kinematics.distance_squared(),
            direction * kinematics.approach(),
            self.tolerance,
        )
    }
}

impl<P: Stepped> HardCollision for Stateless<P> {
    type Region = P::Region;

    fn state<const D: usize>(&self, _: &PairKinematics<D>) -> InteractionState<Self::Region> {
        InteractionState::NotInteracting
    }

    fn collision_time<const D: usize>(
        &self,
        kinematics: &PairKinematics<D>,
        _: InteractionState<Self::Region>,
    ) -> f64 {
        let shell = self.shell(kinematics, 1.0);
        self.potential.profile().collision_time(kinematics, shell)
    }

    fn bump<const D: usize>(
        &self,
        first: &mut impl Kinetic<D>,
        second: &mut impl Kinetic<D>,
        _: InteractionState<Self::Region>,
        separation: &Vector<D>,
        false_time: f64,
    ) -> Collision<Self::Region> {
        let incoming = PairKinematics::new(*separation, second.velocity() - first.velocity());
        let shell = self.shell(&incoming, -1.0);
        let (_, virial, energy_change) =
            self.potential
                .profile()
                .bump(first, second, shell, separation, false_time);
        Collision {
            state: InteractionState::NotInteracting,
            virial,
            energy_change,
        }
    }
}

impl<P: Stepped + IsotropicTwobodyEnergy> IsotropicTwobodyEnergy for Stateless<P> {
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        self.potential.isotropic_twobody_energy(distance_squared)
    }
    fn isotropic_twobody_derivative(&self, distance_squared: f64) -> f64 {
        self.potential.isotropic_twobody_derivative(distance_squared)
    }
    fn isotropic_twobody_second_derivative(&self, distance_squared: f64) -> Result<f64> {
        self.potential
            .isotropic_twobody_second_derivative(distance_squared)
    }
    fn isotropic_twobody_tail_integral(&self, dimension: usize, cutoff: f64) -> Result<f64> {
        self.potential
            .isotropic_twobody_tail_integral(dimension, cutoff)
    }
    fn isotropic_twobody_virial_tail_integral(&self, dimension: usize, cutoff: f64) -> Result<f64> {
        self.potential
            .isotropic_twobody_virial_tail_integral(dimension, cutoff)
    }
}

impl<P: Cutoff> Cutoff for Stateless<P> {
    fn cutoff(&self) -> f64 {
        self.potential.cutoff()
    }
    fn cutoff_squared(&self) -> f64 {
        self.potential.cutoff_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hard::Particle;
    use crate::twobody::{HardSphere, SquareWell, SquareWellRegion};
    use crate::Vector3;
    use approx::assert_relative_eq;

    #[test]
    fn test_tolerance() {
        let well = SquareWell::new(1.0, 1.5, 1.0).unwrap();
        assert!(Stateless::with_tolerance(well.clone(), -1.0).is_err());
        assert!(Stateless::with_tolerance(well.clone(), f64::NAN).is_err());
        let fast = Stateless::with_tolerance(well, 1e-6).unwrap();
        assert_eq!(fast.tolerance(), 1e-6);
        assert_eq!(fast.cutoff(), 1.5);
    }

    #[test]
    fn test_same_as_stateful_after_capture() {
        let well = SquareWell::new(1.0, 1.5, 1.0).unwrap();
        let fast = Stateless::new(well.clone());
        let mut a = Particle::new(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0), 1.0).unwrap();
        let mut b =
            Particle::new(Vector3::new(1.5, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0), 1.0).unwrap();
        let (mut a2, mut b2) = (a.clone(), b.clone());
        let separation = b.position - a.position;

        let stateful = well.bump(&mut a, &mut b, InteractionState::NotInteracting, &separation, 0.0);
        let stateless = fast.bump(&mut a2, &mut b2, InteractionState::NotInteracting, &separation, 0.0);
        assert_eq!(
            stateful.state,
            InteractionState::Interacting(SquareWellRegion::Well)
        );
        assert_eq!(stateless.state, InteractionState::NotInteracting);
        assert_eq!(stateful.virial, stateless.virial);
        assert_eq!(stateful.energy_change, stateless.energy_change);
        assert_eq!((a.velocity, b.velocity), (a2.velocity, b2.velocity));

        // the next event is the core collision, found from the step just crossed
        let kin = PairKinematics::between(&a, &b);
        let t_stateful = well.collision_time(&kin, stateful.state);
        let t_stateless = fast.collision_time(&kin, stateless.state);
        assert_eq!(t_stateful, t_stateless);
        // captured with radial speed 2√2, half a unit from the core
        assert_relative_eq!(t_stateful, 0.5 / (2.0 * 2.0f64.sqrt()), epsilon = 1e-12);
    }

    #[test]
    fn test_hard_sphere_sequence() {
        let fast = Stateless::new(HardSphere::new(1.0).unwrap());
        let mut a = Particle::new(Vector3::zeros(), Vector3::new(0.5, 0.0, 0.0), 1.0).unwrap();
        let mut b =
            Particle::new(Vector3::new(2.0, 0.0, 0.0), Vector3::new(-0.5, 0.0, 0.0), 1.0).unwrap();
        let time = fast.collision_time(&PairKinematics::between(&a, &b), Default::default());
        assert_relative_eq!(time, 1.0, epsilon = 1e-12);

        a.position += a.velocity * time;
        b.position += b.velocity * time;
        let separation = b.position - a.position;
        let collision = fast.bump(&mut a, &mut b, Default::default(), &separation, 0.0);
        assert_relative_eq!(collision.virial, -1.0, epsilon = 1e-12);
        assert_eq!(collision.energy_change, 0.0);
        assert_relative_eq!(a.velocity.x, -0.5, epsilon = 1e-12);

        // at contact and receding: nothing further
        let kin = PairKinematics::between(&a, &b);
        assert_eq!(fast.collision_time(&kin, collision.state), f64::INFINITY);
        assert!(fast.isotropic_twobody_energy(0.5).is_infinite());
    }
}
