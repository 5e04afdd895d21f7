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

//! Spherical truncation of soft potentials.
//!
//! A [`Truncated`] potential is exactly zero beyond its cutoff, 𝑟𝑐. Inside, the wrapped
//! potential 𝑢(𝑟) is optionally modified so that the energy, or both energy and force,
//! go continuously to zero at 𝑟𝑐:
//!
//! | Scheme                        | 𝑈(𝑟 ≤ 𝑟𝑐)                                  |
//! |-------------------------------|--------------------------------------------|
//! | [`Truncation::Plain`]         | 𝑢(𝑟)                                       |
//! | [`Truncation::Shifted`]       | 𝑢(𝑟) - 𝑢(𝑟𝑐)                               |
//! | [`Truncation::ForceShifted`]  | 𝑢(𝑟) - 𝑢(𝑟𝑐) - (𝑟 - 𝑟𝑐)𝑢′(𝑟𝑐)               |
//!
//! The energy and virial omitted by the truncation are available as long-range
//! corrections, see [`Truncated::energy_tail_correction`].

use super::{IsotropicTwobodyEnergy, SoftPotential};
use crate::{ball_volume, unit_sphere_surface, Cutoff, Info, PotentialError, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Truncation scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(rename_all = "snake_case")
)]
pub enum Truncation {
    /// Cut at the cutoff, leaving a jump in energy
    #[default]
    Plain,
    /// Energy shifted to vanish at the cutoff
    Shifted,
    /// Energy and force shifted to vanish at the cutoff
    #[cfg_attr(feature = "serde", serde(alias = "force-shifted"))]
    ForceShifted,
}

/// Potential truncated at a cutoff distance
///
/// # Examples
/// ```
/// use pairpot::twobody::*;
/// use pairpot::Cutoff;
/// let lj = Truncated::shifted(LennardJones::new(1.0, 1.0), 2.5).unwrap();
/// assert_eq!(lj.cutoff(), 2.5);
/// assert!(lj.isotropic_twobody_energy(2.5f64.powi(2)).abs() < 1e-15);
/// assert_eq!(lj.isotropic_twobody_energy(3.0f64.powi(2)), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Truncated<P> {
    potential: P,
    cutoff: f64,
    scheme: Truncation,
    /// Constant added inside the cutoff
    shift: f64,
    /// Coefficient of the term linear in 𝑟, -𝑢′(𝑟𝑐)
    force_shift: f64,
}

impl<P: IsotropicTwobodyEnergy> Truncated<P> {
    pub fn new(potential: P, cutoff: f64, scheme: Truncation) -> Result<Self> {
        let (shift, force_shift) = Self::shifts(&potential, cutoff, scheme)?;
        Ok(Self {
            potential,
            cutoff,
            scheme,
            shift,
            force_shift,
        })
    }

    /// Plain truncation, [`Truncation::Plain`]
    pub fn plain(potential: P, cutoff: f64) -> Result<Self> {
        Self::new(potential, cutoff, Truncation::Plain)
    }

    /// Truncated and shifted, [`Truncation::Shifted`]
    pub fn shifted(potential: P, cutoff: f64) -> Result<Self> {
        Self::new(potential, cutoff, Truncation::Shifted)
    }

    /// Truncated, shifted and force shifted, [`Truncation::ForceShifted`]
    pub fn force_shifted(potential: P, cutoff: f64) -> Result<Self> {
        Self::new(potential, cutoff, Truncation::ForceShifted)
    }

    /// Energy shift and force shift for `potential` cut at `cutoff`
    fn shifts(potential: &P, cutoff: f64, scheme: Truncation) -> Result<(f64, f64)> {
        if !(cutoff > 0.0 && cutoff.is_finite()) {
            return Err(PotentialError::invalid(
                "cutoff",
                cutoff,
                "must be positive and finite",
            ));
        }
        let cutoff_squared = cutoff * cutoff;
        let (shift, force_shift) = match scheme {
            Truncation::Plain => (0.0, 0.0),
            Truncation::Shifted => (-potential.isotropic_twobody_energy(cutoff_squared), 0.0),
            Truncation::ForceShifted => {
                let (u, du) = potential.isotropic_twobody_energy_and_derivative(cutoff_squared);
                // du = rc·u′(rc), so U(rc) = u - du/rc·rc + shift = 0
                (du - u, -du / cutoff)
            }
        };
        if !(shift.is_finite() && force_shift.is_finite()) {
            return Err(PotentialError::invalid(
                "cutoff",
                cutoff,
                "potential is singular at the cutoff",
            ));
        }
        log::debug!("{scheme:?} truncation at rc = {cutoff}: shift = {shift}, force shift = {force_shift}");
        Ok((shift, force_shift))
    }

    /// Move the cutoff; the previous configuration is kept on error
    pub fn set_cutoff(&mut self, cutoff: f64) -> Result<()> {
        let (shift, force_shift) = Self::shifts(&self.potential, cutoff, self.scheme)?;
        self.cutoff = cutoff;
        self.shift = shift;
        self.force_shift = force_shift;
        Ok(())
    }

    /// Change the truncation scheme; the previous configuration is kept on error
    pub fn set_scheme(&mut self, scheme: Truncation) -> Result<()> {
        let (shift, force_shift) = Self::shifts(&self.potential, self.cutoff, scheme)?;
        self.scheme = scheme;
        self.shift = shift;
        self.force_shift = force_shift;
        Ok(())
    }

    /// Modify the wrapped potential and recompute the shifts
    ///
    /// If the modified potential is singular at the cutoff, the modification
    /// is discarded and an error is returned.
    ///
    /// # Examples
    /// ```
    /// use pairpot::twobody::*;
    /// let mut spring = Truncated::shifted(Harmonic::new(0.0, 1.0), 2.0).unwrap();
    /// assert_eq!(spring.isotropic_twobody_energy(0.0), -2.0);
    /// spring.update_potential(|harmonic| harmonic.set_spring_constant(2.0)).unwrap();
    /// assert_eq!(spring.isotropic_twobody_energy(0.0), -4.0);
    /// ```
    pub fn update_potential(&mut self, update: impl FnOnce(&mut P)) -> Result<()>
    where
        P: Clone,
    {
        let mut potential = self.potential.clone();
        update(&mut potential);
        let (shift, force_shift) = Self::shifts(&potential, self.cutoff, self.scheme)?;
        self.potential = potential;
        self.shift = shift;
        self.force_shift = force_shift;
        Ok(())
    }

    pub const fn potential(&self) -> &P {
        &self.potential
    }

    pub const fn scheme(&self) -> Truncation {
        self.scheme
    }

    /// Constant added to the energy inside the cutoff
    pub const fn shift(&self) -> f64 {
        self.shift
    }

    /// Slope of the linear term added inside the cutoff, -𝑢′(𝑟𝑐)
    pub const fn force_shift(&self) -> f64 {
        self.force_shift
    }

    /// Integral of the linear term 𝑓𝑟 over the cutoff sphere, 𝑓·S_D·𝑟𝑐ᴰ⁺¹/(D + 1)
    fn force_shift_integral(&self, dimension: usize) -> f64 {
        if self.force_shift == 0.0 {
            return 0.0;
        }
        let d = dimension as f64;
        self.force_shift * unit_sphere_surface(dimension) * self.cutoff.powi(dimension as i32 + 1)
            / (d + 1.0)
    }

    /// Long-range energy correction per unit pair density
    ///
    /// Integral of 𝑢(𝑟) - 𝑈(𝑟) over all space, i.e. the tail of 𝑢 beyond 𝑟𝑐 less the
    /// shifts applied inside the cutoff sphere. Multiply by 𝜌𝑁/2 for the total correction.
    pub fn energy_tail_correction(&self, dimension: usize) -> Result<f64> {
        let tail = self
            .potential
            .isotropic_twobody_tail_integral(dimension, self.cutoff)?;
        Ok(tail
            - self.shift * ball_volume(dimension, self.cutoff)
            - self.force_shift_integral(dimension))
    }

    /// Long-range virial correction per unit pair density
    ///
    /// Integral of 𝑟𝑢′(𝑟) - 𝑟𝑈′(𝑟) over all space.
    pub fn virial_tail_correction(&self, dimension: usize) -> Result<f64> {
        let tail = self
            .potential
            .isotropic_twobody_virial_tail_integral(dimension, self.cutoff)?;
        Ok(tail - self.force_shift_integral(dimension))
    }
}

impl<P: IsotropicTwobodyEnergy> IsotropicTwobodyEnergy for Truncated<P> {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        if distance_squared > self.cutoff_squared() {
            return 0.0;
        }
        let u = self.potential.isotropic_twobody_energy(distance_squared);
        match self.scheme {
            Truncation::Plain => u,
            Truncation::Shifted => u + self.shift,
            Truncation::ForceShifted => u + self.force_shift * distance_squared.sqrt() + self.shift,
        }
    }
    #[inline]
    fn isotropic_twobody_derivative(&self, distance_squared: f64) -> f64 {
        if distance_squared > self.cutoff_squared() {
            return 0.0;
        }
        let du = self.potential.isotropic_twobody_derivative(distance_squared);
        match self.scheme {
            Truncation::ForceShifted => du + self.force_shift * distance_squared.sqrt(),
            _ => du,
        }
    }
    fn isotropic_twobody_second_derivative(&self, distance_squared: f64) -> Result<f64> {
        if distance_squared > self.cutoff_squared() {
            return Ok(0.0);
        }
        self.potential
            .isotropic_twobody_second_derivative(distance_squared)
    }
    fn isotropic_twobody_tail_integral(&self, _: usize, cutoff: f64) -> Result<f64> {
        if cutoff >= self.cutoff {
            Ok(0.0)
        } else {
            Err(PotentialError::Unsupported("tail integral inside the truncation"))
        }
    }
    fn isotropic_twobody_virial_tail_integral(&self, _: usize, cutoff: f64) -> Result<f64> {
        if cutoff >= self.cutoff {
            Ok(0.0)
        } else {
            Err(PotentialError::Unsupported("virial tail integral inside the truncation"))
        }
    }
}

impl<P: SoftPotential> SoftPotential for Truncated<P> {}

impl<P> Cutoff for Truncated<P> {
    fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl<P: Info> Info for Truncated<P> {
    fn short_name(&self) -> Option<&'static str> {
        self.potential.short_name()
    }
    fn long_name(&self) -> Option<&'static str> {
        self.potential.long_name()
    }
    fn citation(&self) -> Option<&'static str> {
        self.potential.citation()
    }
}

/// Cutoff and truncation scheme, e.g. as read from a configuration file
///
/// # Examples
/// ```
/// use pairpot::twobody::*;
/// let config = TruncationConfig::new(2.5, Truncation::ForceShifted);
/// let lj = config.apply(LennardJones::new(1.0, 1.0)).unwrap();
/// assert!(lj.isotropic_twobody_force(2.5f64.powi(2)).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct TruncationConfig {
    pub cutoff: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scheme: Truncation,
}

impl TruncationConfig {
    pub const fn new(cutoff: f64, scheme: Truncation) -> Self {
        Self { cutoff, scheme }
    }

    /// Truncate `potential` according to this configuration
    pub fn apply<P: IsotropicTwobodyEnergy>(&self, potential: P) -> Result<Truncated<P>> {
        Truncated::new(potential, self.cutoff, self.scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twobody::{Combined, HardSphere, Harmonic, InversePower, LennardJones, PotentialSum};
    use approx::assert_relative_eq;

    /// Composite Simpson's rule with `n` (even) intervals
    fn simpson(f: impl Fn(f64) -> f64, a: f64, b: f64, n: usize) -> f64 {
        let h = (b - a) / n as f64;
        let sum: f64 = (1..n)
            .map(|i| {
                let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
                weight * f(a + i as f64 * h)
            })
            .sum();
        (f(a) + f(b) + sum) * h / 3.0
    }

    #[test]
    fn test_plain() {
        let lj = LennardJones::new(1.0, 1.0);
        let truncated = Truncated::plain(lj, 2.5).unwrap();
        let rc2 = 2.5 * 2.5;
        assert_eq!(truncated.isotropic_twobody_energy(rc2), lj.isotropic_twobody_energy(rc2));
        assert_eq!(truncated.isotropic_twobody_energy(rc2 + 1e-12), 0.0);
        assert_eq!(truncated.isotropic_twobody_derivative(rc2 + 1e-12), 0.0);
        assert_eq!(truncated.isotropic_twobody_second_derivative(rc2 + 1e-12), Ok(0.0));
        assert_eq!(truncated.shift(), 0.0);
        assert_eq!(truncated.force_shift(), 0.0);
    }

    #[test]
    fn test_shifted() {
        let lj = LennardJones::new(1.5, 1.2);
        let truncated = Truncated::shifted(lj, 3.0).unwrap();
        assert_relative_eq!(truncated.isotropic_twobody_energy(9.0), 0.0, epsilon = 1e-15);
        let r2 = 1.7;
        assert_relative_eq!(
            truncated.isotropic_twobody_energy(r2) - lj.isotropic_twobody_energy(r2),
            -lj.isotropic_twobody_energy(9.0),
            epsilon = 1e-12
        );
        // forces are untouched
        assert_eq!(
            truncated.isotropic_twobody_force(r2),
            lj.isotropic_twobody_force(r2)
        );
    }

    #[test]
    fn test_force_shifted() {
        let lj = LennardJones::new(1.5, 1.2);
        let rc: f64 = 2.0;
        let truncated = Truncated::force_shifted(lj, rc).unwrap();
        let rc2 = rc * rc;
        assert_relative_eq!(truncated.isotropic_twobody_energy(rc2), 0.0, epsilon = 1e-14);
        assert_relative_eq!(truncated.isotropic_twobody_derivative(rc2), 0.0, epsilon = 1e-14);
        assert_relative_eq!(truncated.isotropic_twobody_force(rc2), 0.0, epsilon = 1e-14);
        assert_eq!(
            truncated.isotropic_twobody_second_derivative(1.5),
            lj.isotropic_twobody_second_derivative(1.5)
        );
        // analytic derivative agrees with a finite difference of the shifted energy
        let r: f64 = 1.6;
        let h = 1e-6;
        let numerical = r
            * (truncated.isotropic_twobody_energy((r + h).powi(2))
                - truncated.isotropic_twobody_energy((r - h).powi(2)))
            / (2.0 * h);
        assert_relative_eq!(
            truncated.isotropic_twobody_derivative(r * r),
            numerical,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_set_cutoff() {
        let lj = LennardJones::new(1.0, 1.0);
        let mut truncated = Truncated::force_shifted(lj, 2.5).unwrap();
        let reference = truncated.clone();
        truncated.set_cutoff(3.0).unwrap();
        assert_eq!(truncated.cutoff(), 3.0);
        assert_ne!(truncated.shift(), reference.shift());
        truncated.set_cutoff(2.5).unwrap();
        assert_eq!(truncated, reference);

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(truncated.set_cutoff(bad).is_err());
            assert_eq!(truncated, reference);
        }
        assert!(Truncated::plain(lj, -2.5).is_err());
    }

    #[test]
    fn test_set_scheme() {
        let lj = LennardJones::new(1.0, 1.0);
        let mut truncated = Truncated::plain(lj, 2.5).unwrap();
        truncated.set_scheme(Truncation::Shifted).unwrap();
        assert_eq!(truncated, Truncated::shifted(lj, 2.5).unwrap());
        assert_eq!(truncated.scheme(), Truncation::Shifted);
    }

    #[test]
    fn test_singular_at_cutoff() {
        let hs = HardSphere::new(1.0).unwrap();
        assert!(Truncated::plain(hs, 0.5).is_ok());
        assert!(Truncated::shifted(hs, 0.5).is_err());
        assert!(Truncated::force_shifted(hs, 0.5).is_err());
    }

    #[test]
    fn test_update_potential() {
        let mut spring = Truncated::force_shifted(Harmonic::new(1.0, 1.0), 2.0).unwrap();
        spring
            .update_potential(|harmonic| harmonic.set_spring_constant(3.0))
            .unwrap();
        assert_eq!(spring.potential().spring_constant(), 3.0);
        assert_relative_eq!(spring.isotropic_twobody_energy(4.0), 0.0, epsilon = 1e-14);
        assert_relative_eq!(spring.isotropic_twobody_derivative(4.0), 0.0, epsilon = 1e-14);

        // rejected updates leave the potential as it was
        let mut hs = Truncated::shifted(HardSphere::new(0.5).unwrap(), 1.0).unwrap();
        assert!(hs
            .update_potential(|hs| hs.set_sigma(2.0).unwrap())
            .is_err());
        assert_eq!(hs.potential().sigma(), 0.5);
    }

    #[test]
    fn test_boxed_in_sum() {
        let sum = PotentialSum::default()
            .with(Truncated::shifted(LennardJones::new(1.0, 1.0), 2.5).unwrap())
            .with(Truncated::plain(Harmonic::new(1.0, 1.0), 1.5).unwrap());
        assert_eq!(sum.cutoff(), 2.5);
        assert_eq!(sum.isotropic_twobody_energy(6.5), 0.0);
    }

    /// Long-range corrections against direct integration of 𝑢(𝑟) - 𝑈(𝑟)
    #[test]
    fn test_tail_corrections() {
        let potential = InversePower::new(1.3, 1.1, 12.0);
        let rc = 2.0;
        let upper = 40.0;
        let n = 200_000;
        for dimension in [2, 3] {
            let surface = unit_sphere_surface(dimension);
            let jacobian = |r: f64| surface * r.powi(dimension as i32 - 1);
            let outside_energy = simpson(
                |r| potential.isotropic_twobody_energy(r * r) * jacobian(r),
                rc,
                upper,
                n,
            );
            let outside_virial = simpson(
                |r| potential.isotropic_twobody_derivative(r * r) * jacobian(r),
                rc,
                upper,
                n,
            );
            for scheme in [Truncation::Plain, Truncation::Shifted, Truncation::ForceShifted] {
                let truncated = Truncated::new(potential, rc, scheme).unwrap();
                let inside_energy = simpson(
                    |r| -(truncated.shift() + truncated.force_shift() * r) * jacobian(r),
                    0.0,
                    rc,
                    1000,
                );
                let inside_virial =
                    simpson(|r| -truncated.force_shift() * r * jacobian(r), 0.0, rc, 1000);
                assert_relative_eq!(
                    truncated.energy_tail_correction(dimension).unwrap(),
                    outside_energy + inside_energy,
                    max_relative = 1e-6
                );
                assert_relative_eq!(
                    truncated.virial_tail_correction(dimension).unwrap(),
                    outside_virial + inside_virial,
                    max_relative = 1e-6
                );
            }
        }
    }

    /// Bulk energy of a fluid with 𝑔(𝑟) = 1 beyond a contact distance, with the
    /// tail correction added, approaches the untruncated value as 𝑟𝑐 grows
    #[test]
    fn test_tail_correction_convergence() {
        let potential = InversePower::new(1.0, 1.0, 12.0);
        let contact = 0.9;
        let jacobian = |r: f64| 4.0 * std::f64::consts::PI * r * r;
        let exact = potential.isotropic_twobody_tail_integral(3, contact).unwrap();

        let mut previous_error = f64::INFINITY;
        for rc in [1.5, 3.0, 6.0] {
            let truncated = Truncated::force_shifted(potential, rc).unwrap();
            let bulk = simpson(
                |r| truncated.isotropic_twobody_energy(r * r) * jacobian(r),
                contact,
                rc,
                100_000,
            );
            let error = (bulk + truncated.energy_tail_correction(3).unwrap() - exact).abs();
            assert!(error < previous_error);
            previous_error = error;
        }
        assert!(previous_error / exact < 1e-7);
    }

    #[test]
    fn test_sum_of_children() {
        let lj = LennardJones::new(1.0, 1.0);
        let ip = InversePower::new(0.5, 1.0, 9.0);
        let truncated = Truncated::shifted(Combined::new(lj, ip), 2.0).unwrap();
        assert_relative_eq!(
            truncated.shift(),
            -(lj.isotropic_twobody_energy(4.0) + ip.isotropic_twobody_energy(4.0))
        );
        assert_relative_eq!(truncated.isotropic_twobody_energy(4.0), 0.0, epsilon = 1e-15);
        assert!(truncated.energy_tail_correction(3).is_ok());
    }

    #[test]
    fn test_divergent_tail_correction() {
        let truncated = Truncated::shifted(InversePower::new(1.0, 1.0, 3.0), 2.0).unwrap();
        assert!(matches!(
            truncated.energy_tail_correction(3),
            Err(PotentialError::DivergentTail { .. })
        ));
        assert!(truncated.energy_tail_correction(2).is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config() {
        let config: TruncationConfig =
            serde_json::from_str(r#"{"cutoff": 2.5, "scheme": "force_shifted"}"#).unwrap();
        assert_eq!(config, TruncationConfig::new(2.5, Truncation::ForceShifted));
        let config: TruncationConfig = serde_json::from_str(r#"{"cutoff": 2.5}"#).unwrap();
        assert_eq!(config.scheme, Truncation::Plain);
        assert!(config.apply(LennardJones::new(1.0, 1.0)).is_ok());
        assert!(serde_json::from_str::<TruncationConfig>(r#"{"cutoff": 2.5, "shift": 1}"#).is_err());
    }
}
