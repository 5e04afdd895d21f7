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

//! ## Twobody interactions
//!
//! Module for describing exactly two particles interacting with each other.
//! All potentials are keyed by the squared distance, 𝑟², so that callers never
//! need a square root in the inner loop.

use crate::{unit_sphere_surface, Cutoff, PotentialError, Result};
use dyn_clone::DynClone;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

mod hardsphere;
mod hardsum;
mod harmonic;
mod mie;
mod softsphere;
mod squarewell;
mod stepped;
mod truncated;
pub use self::hardsphere::{HardSphere, HardSphereRegion};
pub use self::hardsum::HardSum;
pub use self::harmonic::Harmonic;
pub use self::mie::{LennardJones, Mie, WeeksChandlerAndersen};
pub use self::softsphere::InversePower;
pub use self::squarewell::{SquareWell, SquareWellRegion};
pub use self::stepped::{Shell, SteppedPotential};
pub use self::truncated::{Truncated, Truncation, TruncationConfig};

/// Potential energy between a pair of isotropic particles, 𝑈(𝑟)
///
/// Implementations must be pure functions of 𝑟² and their parameters, so that
/// independent pairs may be evaluated concurrently.
pub trait IsotropicTwobodyEnergy: Debug + Send + Sync {
    /// Interaction energy between a pair of isotropic particles.
    ///
    /// May return `f64::INFINITY` for overlapping hard cores.
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64;

    /// Energy derivative scaled by the distance, 𝑟·d𝑈/d𝑟
    ///
    /// The default implementation uses a central difference in 𝑟²
    /// and should be overridden with the exact analytical expression for better speed
    /// and accuracy.
    fn isotropic_twobody_derivative(&self, distance_squared: f64) -> f64 {
        const EPS: f64 = 1e-6;
        let h = EPS * distance_squared;
        let delta_u = self.isotropic_twobody_energy(distance_squared + h)
            - self.isotropic_twobody_energy(distance_squared - h);
        // r du/dr = 2 r² du/d(r²)
        distance_squared * delta_u / h
    }

    /// Energy and 𝑟·d𝑈/d𝑟 in one call
    fn isotropic_twobody_energy_and_derivative(&self, distance_squared: f64) -> (f64, f64) {
        (
            self.isotropic_twobody_energy(distance_squared),
            self.isotropic_twobody_derivative(distance_squared),
        )
    }

    /// Force magnitude due to an isotropic interaction potential, 𝐹(𝑟) = -d𝑈/d𝑟
    ///
    /// Positive values are repulsive. The force on the second particle is
    /// 𝐹(𝑟)·𝒓/𝑟 where 𝒓 points from the first to the second particle.
    fn isotropic_twobody_force(&self, distance_squared: f64) -> f64 {
        -self.isotropic_twobody_derivative(distance_squared) / distance_squared.sqrt()
    }

    /// Second derivative scaled by the squared distance, 𝑟²·d²𝑈/d𝑟²
    ///
    /// Potentials defined only to first order return [`PotentialError::Unsupported`].
    fn isotropic_twobody_second_derivative(&self, _distance_squared: f64) -> Result<f64> {
        Err(PotentialError::Unsupported("second derivative"))
    }

    /// Tail integral ∫ 𝑈(𝑟) S_D 𝑟ᴰ⁻¹ d𝑟 from `cutoff` to infinity
    fn isotropic_twobody_tail_integral(&self, _dimension: usize, _cutoff: f64) -> Result<f64> {
        Err(PotentialError::Unsupported("tail integral"))
    }

    /// Virial tail integral ∫ 𝑟·𝑈′(𝑟) S_D 𝑟ᴰ⁻¹ d𝑟 from `cutoff` to infinity
    fn isotropic_twobody_virial_tail_integral(
        &self,
        _dimension: usize,
        _cutoff: f64,
    ) -> Result<f64> {
        Err(PotentialError::Unsupported("virial tail integral"))
    }
}

/// Marker for potentials that are continuous in 𝑟 and never cause impulsive collisions
///
/// Not implemented by hard potentials; see [`HardSum`] for adding soft terms to those.
pub trait SoftPotential: IsotropicTwobodyEnergy {}

/// Soft isotropic potential with a known range, usable as a boxed trait object
pub trait IsotropicTwobodyPotential: SoftPotential + Cutoff + DynClone {}

impl<T: SoftPotential + Cutoff + Clone> IsotropicTwobodyPotential for T {}

dyn_clone::clone_trait_object!(IsotropicTwobodyPotential);

/// Tail integral of `coefficient`·𝑟⁻ⁿ, i.e. coefficient·S_D·𝑟𝑐ᴰ⁻ⁿ/(n - D)
pub(crate) fn inverse_power_tail(
    coefficient: f64,
    exponent: f64,
    dimension: usize,
    cutoff: f64,
) -> Result<f64> {
    let d = dimension as f64;
    if exponent <= d {
        return Err(PotentialError::DivergentTail {
            exponent,
            dimension,
        });
    }
    Ok(coefficient * unit_sphere_surface(dimension) * cutoff.powf(d - exponent) / (exponent - d))
}

/// Combine two twobody energy schemes
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Combined<T, U>(T, U);

impl<T: IsotropicTwobodyEnergy, U: IsotropicTwobodyEnergy> Combined<T, U> {
    pub const fn new(t: T, u: U) -> Self {
        Self(t, u)
    }
}

impl<T: IsotropicTwobodyEnergy, U: IsotropicTwobodyEnergy> IsotropicTwobodyEnergy
    for Combined<T, U>
{
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        self.0.isotropic_twobody_energy(distance_squared)
            + self.1.isotropic_twobody_energy(distance_squared)
    }
    #[inline]
    fn isotropic_twobody_derivative(&self, distance_squared: f64) -> f64 {
        self.0.isotropic_twobody_derivative(distance_squared)
            + self.1.isotropic_twobody_derivative(distance_squared)
    }
    fn isotropic_twobody_second_derivative(&self, distance_squared: f64) -> Result<f64> {
        Ok(self.0.isotropic_twobody_second_derivative(distance_squared)?
            + self.1.isotropic_twobody_second_derivative(distance_squared)?)
    }
    fn isotropic_twobody_tail_integral(&self, dimension: usize, cutoff: f64) -> Result<f64> {
        Ok(self.0.isotropic_twobody_tail_integral(dimension, cutoff)?
            + self.1.isotropic_twobody_tail_integral(dimension, cutoff)?)
    }
    fn isotropic_twobody_virial_tail_integral(
        &self,
        dimension: usize,
        cutoff: f64,
    ) -> Result<f64> {
        Ok(
            self.0.isotropic_twobody_virial_tail_integral(dimension, cutoff)?
                + self.1.isotropic_twobody_virial_tail_integral(dimension, cutoff)?,
        )
    }
}

impl<T: SoftPotential, U: SoftPotential> SoftPotential for Combined<T, U> {}

impl<T: Cutoff, U: Cutoff> Cutoff for Combined<T, U> {
    fn cutoff(&self) -> f64 {
        f64::max(self.0.cutoff(), self.1.cutoff())
    }
}

/// Sum of an arbitrary number of soft potentials
///
/// Only [`SoftPotential`]s can be added; to add soft terms to a hard
/// potential, use [`HardSum`].
///
/// ```compile_fail
/// use pairpot::twobody::*;
/// let sum = PotentialSum::default().with(HardSphere::new(1.0).unwrap());
/// ```
///
/// # Examples
/// ```
/// use pairpot::twobody::*;
/// use pairpot::Cutoff;
/// let sum = PotentialSum::default()
///     .with(LennardJones::new(1.0, 1.0))
///     .with(Harmonic::new(1.0, 2.0));
/// assert_eq!(sum.len(), 2);
/// assert_eq!(sum.isotropic_twobody_energy(1.0), 0.0);
/// assert!(sum.cutoff().is_infinite());
/// ```
#[derive(Clone, Debug, Default)]
pub struct PotentialSum {
    potentials: Vec<Box<dyn IsotropicTwobodyPotential>>,
}

impl PotentialSum {
    pub fn new(potentials: Vec<Box<dyn IsotropicTwobodyPotential>>) -> Self {
        Self { potentials }
    }
    /// Add a potential to the sum
    pub fn push(&mut self, potential: impl IsotropicTwobodyPotential + 'static) {
        self.potentials.push(Box::new(potential));
    }
    /// Builder variant of [`PotentialSum::push`]
    pub fn with(mut self, potential: impl IsotropicTwobodyPotential + 'static) -> Self {
        self.push(potential);
        self
    }
    pub fn len(&self) -> usize {
        self.potentials.len()
    }
    pub fn is_empty(&self) -> bool {
        self.potentials.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &dyn IsotropicTwobodyPotential> {
        self.potentials.iter().map(|p| p.as_ref())
    }
}

impl IsotropicTwobodyEnergy for PotentialSum {
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        self.iter()
            .map(|p| p.isotropic_twobody_energy(distance_squared))
            .sum()
    }
    fn isotropic_twobody_derivative(&self, distance_squared: f64) -> f64 {
        self.iter()
            .map(|p| p.isotropic_twobody_derivative(distance_squared))
            .sum()
    }
    fn isotropic_twobody_second_derivative(&self, distance_squared: f64) -> Result<f64> {
        self.iter()
            .map(|p| p.isotropic_twobody_second_derivative(distance_squared))
            .sum()
    }
    fn isotropic_twobody_tail_integral(&self, dimension: usize, cutoff: f64) -> Result<f64> {
        self.iter()
            .map(|p| p.isotropic_twobody_tail_integral(dimension, cutoff))
            .sum()
    }
    fn isotropic_twobody_virial_tail_integral(
        &self,
        dimension: usize,
        cutoff: f64,
    ) -> Result<f64> {
        self.iter()
            .map(|p| p.isotropic_twobody_virial_tail_integral(dimension, cutoff))
            .sum()
    }
}

impl SoftPotential for PotentialSum {}

impl Cutoff for PotentialSum {
    fn cutoff(&self) -> f64 {
        self.iter().map(|p| p.cutoff()).fold(0.0, f64::max)
    }
}
