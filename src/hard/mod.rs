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

//! ## Hard collisions
//!
//! Event-driven dynamics with impulsive (hard) potentials. A [`HardCollision`]
//! potential classifies a pair into an [`InteractionState`], predicts when the
//! pair next crosses a step of the potential, and resolves the impulsive
//! collision at that time.
//!
//! A scheduler typically
//!
//! 1. obtains the initial state of every pair with [`HardCollision::state`],
//! 2. predicts collision times with [`HardCollision::collision_time`],
//! 3. resolves the earliest event with [`HardCollision::bump`] and stores the
//!    returned state for the pair, and
//! 4. recomputes collision times for all pairs involving the two particles.
//!
//! The state is opaque to the scheduler. Potentials wrapped in [`Stateless`] always
//! report [`InteractionState::NotInteracting`], so no per-pair storage is needed.

use crate::Vector;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

mod profile;
mod stateless;
pub use self::profile::StepProfile;
pub use self::stateless::Stateless;

/// Interaction state of a pair, as classified by a hard potential
///
/// The region type `R` is private to each potential, which prevents states
/// from one potential being passed to another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum InteractionState<R> {
    /// Outside the range of the potential
    #[default]
    NotInteracting,
    /// Inside a region of the potential
    Interacting(R),
}

impl<R> InteractionState<R> {
    pub const fn is_interacting(&self) -> bool {
        matches!(self, Self::Interacting(_))
    }
    /// The occupied region, if any
    pub fn region(self) -> Option<R> {
        match self {
            Self::NotInteracting => None,
            Self::Interacting(region) => Some(region),
        }
    }
}

impl<R> From<Option<R>> for InteractionState<R> {
    fn from(region: Option<R>) -> Self {
        region.map_or(Self::NotInteracting, Self::Interacting)
    }
}

/// Relative position and velocity of a pair
///
/// The separation points from the first to the second particle and must already
/// be reduced to the minimum image; the relative velocity is that of the second
/// particle relative to the first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairKinematics<const D: usize> {
    pub separation: Vector<D>,
    pub relative_velocity: Vector<D>,
}

impl<const D: usize> PairKinematics<D> {
    pub const fn new(separation: Vector<D>, relative_velocity: Vector<D>) -> Self {
        Self {
            separation,
            relative_velocity,
        }
    }

    /// Kinematics of `second` relative to `first`, without periodic wrapping
    pub fn between(first: &impl Kinetic<D>, second: &impl Kinetic<D>) -> Self {
        Self {
            separation: second.position() - first.position(),
            relative_velocity: second.velocity() - first.velocity(),
        }
    }

    /// Squared separation, 𝑟²
    pub fn distance_squared(&self) -> f64 {
        self.separation.norm_squared()
    }

    /// 𝒓·𝒗; negative when the particles approach each other
    pub fn approach(&self) -> f64 {
        self.separation.dot(&self.relative_velocity)
    }

    /// Squared relative speed, 𝑣²
    pub fn speed_squared(&self) -> f64 {
        self.relative_velocity.norm_squared()
    }

    /// Kinematics after free flight for `time`
    pub fn advanced(&self, time: f64) -> Self {
        Self {
            separation: self.separation + self.relative_velocity * time,
            relative_velocity: self.relative_velocity,
        }
    }
}

/// Particle with mutable position and velocity, as seen by a collision
pub trait Kinetic<const D: usize> {
    fn position(&self) -> &Vector<D>;
    fn position_mut(&mut self) -> &mut Vector<D>;
    fn velocity(&self) -> &Vector<D>;
    fn velocity_mut(&mut self) -> &mut Vector<D>;
    /// Inverse mass; zero for immovable particles such as walls
    fn inverse_mass(&self) -> f64;

    /// Kinetic energy, ½𝑚𝑣²
    fn kinetic_energy(&self) -> f64 {
        if self.inverse_mass() == 0.0 {
            return 0.0;
        }
        0.5 * self.velocity().norm_squared() / self.inverse_mass()
    }
}

/// Point particle implementing [`Kinetic`]
///
/// # Examples
/// ```
/// use pairpot::hard::{Kinetic, Particle};
/// use pairpot::Vector3;
/// let particle = Particle::new(Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0), 2.0).unwrap();
/// assert_eq!(particle.kinetic_energy(), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Particle<const D: usize> {
    pub position: Vector<D>,
    pub velocity: Vector<D>,
    inverse_mass: f64,
}

impl<const D: usize> Particle<D> {
    /// New particle; an infinite mass gives an immovable particle
    pub fn new(position: Vector<D>, velocity: Vector<D>, mass: f64) -> crate::Result<Self> {
        if mass <= 0.0 || mass.is_nan() {
            return Err(crate::PotentialError::invalid(
                "mass",
                mass,
                "must be positive",
            ));
        }
        Ok(Self {
            position,
            velocity,
            inverse_mass: mass.recip(),
        })
    }
    /// Immovable particle at `position`
    pub fn fixed(position: Vector<D>) -> Self {
        Self {
            position,
            velocity: Vector::<D>::zeros(),
            inverse_mass: 0.0,
        }
    }
}

impl<const D: usize> Kinetic<D> for Particle<D> {
    fn position(&self) -> &Vector<D> {
        &self.position
    }
    fn position_mut(&mut self) -> &mut Vector<D> {
        &mut self.position
    }
    fn velocity(&self) -> &Vector<D> {
        &self.velocity
    }
    fn velocity_mut(&mut self) -> &mut Vector<D> {
        &mut self.velocity
    }
    fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }
}

/// Outcome of a resolved collision
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision<R> {
    /// State of the pair after the collision
    pub state: InteractionState<R>,
    /// Collision virial, 𝒓·Δ𝒑 of the first particle
    ///
    /// Negative for repulsive impulses, positive for attractive ones.
    pub virial: f64,
    /// Potential energy change, Δ𝑈; the kinetic energy changes by -Δ𝑈
    pub energy_change: f64,
}

/// Potential with impulsive interactions for event-driven dynamics
///
/// The caller serializes calls for any given pair, and never resolves two
/// collisions sharing a particle concurrently.
pub trait HardCollision {
    /// Regions of the potential a pair can occupy
    type Region: Copy + Eq + Debug;

    /// Classify a pair from its current configuration alone
    fn state<const D: usize>(
        &self,
        kinematics: &PairKinematics<D>,
    ) -> InteractionState<Self::Region>;

    /// Time until the pair next crosses a step of the potential, assuming
    /// free flight from now. Never negative; `f64::INFINITY` if no crossing
    /// lies ahead.
    fn collision_time<const D: usize>(
        &self,
        kinematics: &PairKinematics<D>,
        state: InteractionState<Self::Region>,
    ) -> f64;

    /// Resolve a collision between `first` and `second`
    ///
    /// `separation` points from `first` to `second` at the moment of
    /// collision. The stored positions lag the collision by `false_time`; they
    /// are corrected so that `position + velocity * false_time` is the contact
    /// configuration with the new velocities.
    fn bump<const D: usize>(
        &self,
        first: &mut impl Kinetic<D>,
        second: &mut impl Kinetic<D>,
        state: InteractionState<Self::Region>,
        separation: &Vector<D>,
        false_time: f64,
    ) -> Collision<Self::Region>;
}

/// Region of a piecewise-constant radial potential, identified by shell index
///
/// Shell `i` covers `[d_{i-1}, d_i)` where `d_i` are the step radii.
pub trait StepRegion: Copy + Eq + Debug {
    fn from_shell(shell: usize) -> Self;
    fn shell(self) -> usize;
}

/// Hard potential that is a radial step function
pub trait Stepped {
    type Region: StepRegion;
    /// Radii and energies of the steps
    fn profile(&self) -> StepProfile<'_>;
}

impl<R: StepRegion> InteractionState<R> {
    pub(crate) fn from_shell(shell: Option<usize>) -> Self {
        shell.map(R::from_shell).into()
    }
    pub(crate) fn shell(self) -> Option<usize> {
        self.region().map(R::shell)
    }
}

/// [`HardCollision::state`] for step potentials
pub(crate) fn stepped_state<P: Stepped, const D: usize>(
    potential: &P,
    kinematics: &PairKinematics<D>,
) -> InteractionState<P::Region> {
    InteractionState::from_shell(potential.profile().shell(kinematics.distance_squared()))
}

/// [`HardCollision::collision_time`] for step potentials
pub(crate) fn stepped_collision_time<P: Stepped, const D: usize>(
    potential: &P,
    kinematics: &PairKinematics<D>,
    state: InteractionState<P::Region>,
) -> f64 {
    potential.profile().collision_time(kinematics, state.shell())
}

/// [`HardCollision::bump`] for step potentials
pub(crate) fn stepped_bump<P: Stepped, const D: usize>(
    potential: &P,
    first: &mut impl Kinetic<D>,
    second: &mut impl Kinetic<D>,
    state: InteractionState<P::Region>,
    separation: &Vector<D>,
    false_time: f64,
) -> Collision<P::Region> {
    let (shell, virial, energy_change) =
        potential
            .profile()
            .bump(first, second, state.shell(), separation, false_time);
    Collision {
        state: InteractionState::from_shell(shell),
        virial,
        energy_change,
    }
}
