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

use super::inverse_power_tail;
use crate::twobody::{IsotropicTwobodyEnergy, SoftPotential};
#[cfg(feature = "serde")]
use crate::{divide4_serialize, multiply4_deserialize, sqrt_serialize, square_deserialize};
use crate::{Cutoff, Info, PotentialError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mie potential
///
/// This is a generalization of the Lennard-Jones potential due to G. Mie,
/// ["Zur kinetischen Theorie der einatomigen Körper"](https://doi.org/10.1002/andp.19033160802).
/// The energy is
/// $$ u(r) = ε C \left [\left (\frac{σ}{r}\right )^n - \left (\frac{σ}{r}\right )^m \right ]$$
/// where $C = \frac{n}{n-m} \cdot \left (\frac{n}{m}\right )^{\frac{m}{n-m}}$ and $n > m$.
/// The Lennard-Jones potential is recovered for $n = 12$ and $m = 6$.
///
/// # Examples:
/// ~~~
/// use pairpot::twobody::*;
/// use approx::assert_relative_eq;
/// let (epsilon, sigma, r2) = (1.5, 2.0, 2.5);
/// let mie = Mie::<12, 6>::new(epsilon, sigma);
/// let lj = LennardJones::new(epsilon, sigma);
/// assert_relative_eq!(
///     mie.isotropic_twobody_energy(r2),
///     lj.isotropic_twobody_energy(r2),
///     max_relative = 1e-12
/// );
/// ~~~
#[derive(Clone, Debug, PartialEq, Copy)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Mie<const N: u32, const M: u32> {
    /// Interaction strength, ε
    #[cfg_attr(feature = "serde", serde(rename = "eps"))]
    epsilon: f64,
    /// Diameter, σ
    #[cfg_attr(feature = "serde", serde(rename = "sigma"))]
    sigma: f64,
}

impl<const N: u32, const M: u32> Mie<N, M> {
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        assert!(M > 0);
        assert!(N > M);
        Self { epsilon, sigma }
    }

    /// Prefactor, C·ε
    #[inline]
    fn c_epsilon(&self) -> f64 {
        let (n, m) = (N as f64, M as f64);
        n / (n - m) * (n / m).powf(m / (n - m)) * self.epsilon
    }

    /// Returns ((σ/r)ⁿ, (σ/r)ᵐ)
    #[inline]
    fn powers(&self, distance_squared: f64) -> (f64, f64) {
        if N % 2 == 0 && M % 2 == 0 {
            let x = self.sigma * self.sigma / distance_squared; // (σ/r)²
            return (x.powi((N / 2) as i32), x.powi((M / 2) as i32));
        }
        let s_over_r = self.sigma / distance_squared.sqrt();
        (s_over_r.powi(N as i32), s_over_r.powi(M as i32))
    }
}

impl<const N: u32, const M: u32> IsotropicTwobodyEnergy for Mie<N, M> {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        let (xn, xm) = self.powers(distance_squared);
        self.c_epsilon() * (xn - xm)
    }
    #[inline]
    fn isotropic_twobody_derivative(&self, distance_squared: f64) -> f64 {
        let (xn, xm) = self.powers(distance_squared);
        self.c_epsilon() * (M as f64 * xm - N as f64 * xn)
    }
    fn isotropic_twobody_second_derivative(&self, distance_squared: f64) -> Result<f64> {
        let (n, m) = (N as f64, M as f64);
        let (xn, xm) = self.powers(distance_squared);
        Ok(self.c_epsilon() * (n * (n + 1.0) * xn - m * (m + 1.0) * xm))
    }
    fn isotropic_twobody_tail_integral(&self, dimension: usize, cutoff: f64) -> Result<f64> {
        let (n, m) = (N as f64, M as f64);
        let c = self.c_epsilon();
        Ok(
            inverse_power_tail(c * self.sigma.powf(n), n, dimension, cutoff)?
                - inverse_power_tail(c * self.sigma.powf(m), m, dimension, cutoff)?,
        )
    }
    fn isotropic_twobody_virial_tail_integral(
        &self,
        dimension: usize,
        cutoff: f64,
    ) -> Result<f64> {
        let (n, m) = (N as f64, M as f64);
        let c = self.c_epsilon();
        Ok(
            m * inverse_power_tail(c * self.sigma.powf(m), m, dimension, cutoff)?
                - n * inverse_power_tail(c * self.sigma.powf(n), n, dimension, cutoff)?,
        )
    }
}

impl<const N: u32, const M: u32> SoftPotential for Mie<N, M> {}

impl<const N: u32, const M: u32> Cutoff for Mie<N, M> {
    fn cutoff(&self) -> f64 {
        f64::INFINITY
    }
    fn cutoff_squared(&self) -> f64 {
        f64::INFINITY
    }
}

impl<const N: u32, const M: u32> Info for Mie<N, M> {
    fn short_name(&self) -> Option<&'static str> {
        Some("mie")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("https://doi.org/10.1002/andp.19033160802")
    }
}

/// Lennard-Jones potential
///
/// $$ u(r) = 4\epsilon_{ij} \left [\left (\frac{\sigma_{ij}}{r}\right )^{12} - \left (\frac{\sigma_{ij}}{r}\right )^6 \right ]$$
///
/// Originally by J. E. Lennard-Jones, see
/// [doi:10/cqhgm7](https://dx.doi.org/10/cqhgm7) or
/// [Wikipedia](https://en.wikipedia.org/wiki/Lennard-Jones_potential).
///
/// # Examples:
/// ~~~
/// use pairpot::twobody::*;
/// let (epsilon, sigma) = (1.5, 2.0);
/// let lj = LennardJones::new(epsilon, sigma);
/// let (r_min, u_min) = (f64::powf(2.0, 1.0 / 6.0) * sigma, -epsilon);
/// assert_eq!(lj.isotropic_twobody_energy( r_min.powi(2) ), u_min);
/// ~~~
#[derive(Debug, Clone, PartialEq, Default, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct LennardJones {
    /// Four times epsilon, 4ε
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "eps",
            serialize_with = "divide4_serialize",
            deserialize_with = "multiply4_deserialize"
        )
    )]
    four_times_epsilon: f64,
    /// Squared diameter, σ²
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "sigma",
            serialize_with = "sqrt_serialize",
            deserialize_with = "square_deserialize"
        )
    )]
    sigma_squared: f64,
}

impl LennardJones {
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        Self {
            four_times_epsilon: 4.0 * epsilon,
            sigma_squared: sigma.powi(2),
        }
    }
    /// Construct from AB form, u = A/r¹² - B/r⁶
    pub fn from_ab(a: f64, b: f64) -> Self {
        Self {
            four_times_epsilon: b * b / a,
            sigma_squared: (a / b).cbrt(),
        }
    }
    /// Well depth, ε
    pub fn epsilon(&self) -> f64 {
        0.25 * self.four_times_epsilon
    }
    /// Diameter, σ
    pub fn sigma(&self) -> f64 {
        self.sigma_squared.sqrt()
    }
    /// Returns ((σ/r)¹², (σ/r)⁶)
    #[inline(always)]
    fn powers(&self, squared_distance: f64) -> (f64, f64) {
        let x = self.sigma_squared / squared_distance; // σ²/r²
        let x = x * x * x; // σ⁶/r⁶
        (x * x, x)
    }
}

impl SoftPotential for LennardJones {}

impl Cutoff for LennardJones {
    fn cutoff(&self) -> f64 {
        f64::INFINITY
    }
    fn cutoff_squared(&self) -> f64 {
        f64::INFINITY
    }
}

impl IsotropicTwobodyEnergy for LennardJones {
    #[inline]
    fn isotropic_twobody_energy(&self, squared_distance: f64) -> f64 {
        let (x12, x6) = self.powers(squared_distance);
        self.four_times_epsilon * (x12 - x6)
    }
    #[inline]
    fn isotropic_twobody_derivative(&self, squared_distance: f64) -> f64 {
        let (x12, x6) = self.powers(squared_distance);
        self.four_times_epsilon * (6.0 * x6 - 12.0 * x12)
    }
    fn isotropic_twobody_second_derivative(&self, squared_distance: f64) -> Result<f64> {
        let (x12, x6) = self.powers(squared_distance);
        Ok(self.four_times_epsilon * (156.0 * x12 - 42.0 * x6))
    }
    fn isotropic_twobody_tail_integral(&self, dimension: usize, cutoff: f64) -> Result<f64> {
        let sigma6 = self.sigma_squared.powi(3);
        let a = self.four_times_epsilon * sigma6 * sigma6;
        let b = self.four_times_epsilon * sigma6;
        Ok(inverse_power_tail(a, 12.0, dimension, cutoff)?
            - inverse_power_tail(b, 6.0, dimension, cutoff)?)
    }
    fn isotropic_twobody_virial_tail_integral(
        &self,
        dimension: usize,
        cutoff: f64,
    ) -> Result<f64> {
        let sigma6 = self.sigma_squared.powi(3);
        let a = self.four_times_epsilon * sigma6 * sigma6;
        let b = self.four_times_epsilon * sigma6;
        Ok(6.0 * inverse_power_tail(b, 6.0, dimension, cutoff)?
            - 12.0 * inverse_power_tail(a, 12.0, dimension, cutoff)?)
    }
}

impl Info for LennardJones {
    fn short_name(&self) -> Option<&'static str> {
        Some("lj")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Lennard-Jones")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("https://dx.doi.org/10/cqhgm7")
    }
}

/// Weeks-Chandler-Andersen potential
///
/// This is a Lennard-Jones type potential, cut and shifted to zero:
///
/// $$u(r) = 4 \epsilon \left [ (\sigma_{ij}/r)^{12} - (\sigma_{ij}/r)^6 + \frac{1}{4} \right ]$$
///
/// for $r < r_{cut} = 2^{1/6} \sigma_{ij}$; zero otherwise.
///
/// Effectively, this provides soft repulsion without any attraction.
/// More information, see <https://dx.doi.org/doi.org/ct4kh9>.
#[derive(Debug, Clone, PartialEq, Default, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct WeeksChandlerAndersen {
    #[cfg_attr(feature = "serde", serde(flatten))]
    lennard_jones: LennardJones,
}

impl WeeksChandlerAndersen {
    const ONEFOURTH: f64 = 0.25;
    const TWOTOTWOSIXTH: f64 = 1.2599210498948732; // f64::powf(2.0, 2.0/6.0)
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        Self {
            lennard_jones: LennardJones::new(epsilon, sigma),
        }
    }
}

impl SoftPotential for WeeksChandlerAndersen {}

impl Cutoff for WeeksChandlerAndersen {
    #[inline]
    fn cutoff_squared(&self) -> f64 {
        self.lennard_jones.sigma_squared * WeeksChandlerAndersen::TWOTOTWOSIXTH
    }
    #[inline]
    fn cutoff(&self) -> f64 {
        self.cutoff_squared().sqrt()
    }
}

impl IsotropicTwobodyEnergy for WeeksChandlerAndersen {
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        if distance_squared > self.cutoff_squared() {
            return 0.0;
        }
        let (x12, x6) = self.lennard_jones.powers(distance_squared);
        self.lennard_jones.four_times_epsilon * (x12 - x6 + WeeksChandlerAndersen::ONEFOURTH)
    }
    #[inline]
    fn isotropic_twobody_derivative(&self, distance_squared: f64) -> f64 {
        if distance_squared > self.cutoff_squared() {
            return 0.0;
        }
        self.lennard_jones
            .isotropic_twobody_derivative(distance_squared)
    }
    fn isotropic_twobody_second_derivative(&self, distance_squared: f64) -> Result<f64> {
        if distance_squared > self.cutoff_squared() {
            return Ok(0.0);
        }
        self.lennard_jones
            .isotropic_twobody_second_derivative(distance_squared)
    }
    /// Zero beyond the WCA range; shorter cutoffs are not supported
    fn isotropic_twobody_tail_integral(&self, _dimension: usize, cutoff: f64) -> Result<f64> {
        if cutoff * cutoff >= self.cutoff_squared() {
            Ok(0.0)
        } else {
            Err(PotentialError::Unsupported("tail integral inside the WCA range"))
        }
    }
    fn isotropic_twobody_virial_tail_integral(
        &self,
        dimension: usize,
        cutoff: f64,
    ) -> Result<f64> {
        self.isotropic_twobody_tail_integral(dimension, cutoff)
    }
}

impl Info for WeeksChandlerAndersen {
    fn short_name(&self) -> Option<&'static str> {
        Some("wca")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Weeks-Chandler-Andersen")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("https://dx.doi.org/doi.org/ct4kh9")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// Central difference of r du/dr with respect to r, used to check analytic derivatives
    fn numerical_derivatives<P: IsotropicTwobodyEnergy>(pot: &P, r: f64) -> (f64, f64) {
        let h = 1e-5 * r;
        let u = |r: f64| pot.isotropic_twobody_energy(r * r);
        let du_dr = (u(r + h) - u(r - h)) / (2.0 * h);
        let d2u_dr2 = (u(r + h) - 2.0 * u(r) + u(r - h)) / (h * h);
        (r * du_dr, r * r * d2u_dr2)
    }

    #[test]
    fn test_lennard_jones_derivatives() {
        let lj = LennardJones::new(1.5, 2.0);
        for r in [1.9, 2.2, 2.8, 4.0] {
            let (du, d2u) = numerical_derivatives(&lj, r);
            assert_relative_eq!(lj.isotropic_twobody_derivative(r * r), du, max_relative = 1e-6);
            assert_relative_eq!(
                lj.isotropic_twobody_second_derivative(r * r).unwrap(),
                d2u,
                max_relative = 1e-4
            );
        }
        // zero force at the minimum
        let r_min = f64::powf(2.0, 1.0 / 6.0) * 2.0;
        assert_relative_eq!(lj.isotropic_twobody_force(r_min * r_min), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mie_matches_lennard_jones() {
        let (epsilon, sigma) = (0.7, 1.3);
        let mie = Mie::<12, 6>::new(epsilon, sigma);
        let lj = LennardJones::new(epsilon, sigma);
        for r2 in [1.2, 1.8, 3.0, 7.0] {
            assert_relative_eq!(
                mie.isotropic_twobody_derivative(r2),
                lj.isotropic_twobody_derivative(r2),
                max_relative = 1e-12
            );
            assert_relative_eq!(
                mie.isotropic_twobody_second_derivative(r2).unwrap(),
                lj.isotropic_twobody_second_derivative(r2).unwrap(),
                max_relative = 1e-12
            );
        }
        assert_relative_eq!(
            mie.isotropic_twobody_tail_integral(3, 3.0).unwrap(),
            lj.isotropic_twobody_tail_integral(3, 3.0).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_mie_odd_exponents() {
        // the well depth is -ε at the minimum for any n, m
        let mie = Mie::<9, 6>::new(2.0, 1.0);
        let r_min: f64 = (9.0f64 / 6.0).powf(1.0 / 3.0);
        assert_relative_eq!(mie.isotropic_twobody_energy(r_min * r_min), -2.0, epsilon = 1e-12);
        let (du, _) = numerical_derivatives(&mie, 1.4);
        assert_relative_eq!(mie.isotropic_twobody_derivative(1.96), du, max_relative = 1e-6);
    }

    #[test]
    fn test_lennard_jones_tail() {
        let (epsilon, sigma, rc) = (1.2, 1.1, 2.5);
        let lj = LennardJones::new(epsilon, sigma);
        let s = sigma / rc;
        let expected = 16.0 / 9.0 * PI * epsilon * sigma.powi(3) * (s.powi(9) - 3.0 * s.powi(3));
        assert_relative_eq!(
            lj.isotropic_twobody_tail_integral(3, rc).unwrap(),
            expected,
            max_relative = 1e-12
        );
        let expected_virial =
            32.0 / 3.0 * PI * epsilon * sigma.powi(3) * (3.0 * s.powi(3) - 2.0 * s.powi(9));
        assert_relative_eq!(
            lj.isotropic_twobody_virial_tail_integral(3, rc).unwrap(),
            expected_virial,
            max_relative = 1e-12
        );
        // 2D tail of r⁻⁶ converges as well, 1D likewise
        assert!(lj.isotropic_twobody_tail_integral(2, rc).is_ok());
    }

    #[test]
    fn test_wca() {
        let wca = WeeksChandlerAndersen::new(1.0, 1.0);
        let rc2 = wca.cutoff_squared();
        assert_relative_eq!(wca.isotropic_twobody_energy(rc2), 0.0, epsilon = 1e-12);
        assert_eq!(wca.isotropic_twobody_energy(rc2 * 1.01), 0.0);
        assert_eq!(wca.isotropic_twobody_derivative(rc2 * 1.01), 0.0);
        assert_eq!(wca.isotropic_twobody_tail_integral(3, 2.0), Ok(0.0));
        assert!(wca.isotropic_twobody_tail_integral(3, 1.0).is_err());
        assert_eq!(wca.short_name(), Some("wca"));
    }
}
