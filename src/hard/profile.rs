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

//! Collision kinematics for piecewise-constant radial potentials.

use super::{Kinetic, PairKinematics};
use crate::{ball_volume, PotentialError, Result, Vector};
use itertools::Itertools;

/// Borrowed view of a radial step function
///
/// Steps sit at radii `d_0 < d_1 < … < d_{n-1}`. Shell `i` covers `[d_{i-1}, d_i)`
/// and has energy `e_i`; beyond `d_{n-1}` the pair does not interact and the
/// energy is zero. A separation exactly on a step belongs to the outer shell.
/// Shells are represented as `Option<usize>` where `None` is the non-interacting
/// region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepProfile<'a> {
    boundaries_squared: &'a [f64],
    energies: &'a [f64],
}

impl<'a> StepProfile<'a> {
    /// View of squared step radii and the energy inside each step
    pub fn new(boundaries_squared: &'a [f64], energies: &'a [f64]) -> Result<Self> {
        validate(boundaries_squared, energies)?;
        Ok(Self {
            boundaries_squared,
            energies,
        })
    }

    /// View of data that has already been validated
    pub(crate) const fn new_unchecked(boundaries_squared: &'a [f64], energies: &'a [f64]) -> Self {
        Self {
            boundaries_squared,
            energies,
        }
    }

    pub fn boundaries_squared(&self) -> &'a [f64] {
        self.boundaries_squared
    }

    pub fn energies(&self) -> &'a [f64] {
        self.energies
    }

    /// Number of shells, excluding the non-interacting region
    pub fn len(&self) -> usize {
        self.boundaries_squared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries_squared.is_empty()
    }

    /// Squared range, i.e. the outermost step
    pub fn range_squared(&self) -> f64 {
        self.boundaries_squared.last().copied().unwrap_or(0.0)
    }

    /// Shell containing `distance_squared`
    pub fn shell(&self, distance_squared: f64) -> Option<usize> {
        self.boundaries_squared
            .iter()
            .position(|&d2| distance_squared < d2)
    }

    /// Shell the pair occupies an instant after the current configuration
    ///
    /// Separations within a relative `tolerance` of a step are treated as lying
    /// on it, and the side is chosen from the sign of `approach` (𝒓·𝒗): receding
    /// pairs go to the outer shell, approaching or grazing pairs to the inner
    /// one. This is equivalent to advancing the trajectory infinitesimally; pass
    /// a negated `approach` to rewind it instead.
    pub fn shell_moving(&self, distance_squared: f64, approach: f64, tolerance: f64) -> Option<usize> {
        let on_step = self
            .boundaries_squared
            .iter()
            .position(|&d2| (distance_squared - d2).abs() <= tolerance * d2);
        match on_step {
            Some(i) if approach > 0.0 => self.outward(Some(i)),
            Some(i) => Some(i),
            None => self.shell(distance_squared),
        }
    }

    /// Energy of a shell
    pub fn energy(&self, shell: Option<usize>) -> f64 {
        shell.map_or(0.0, |i| self.energies[i])
    }

    /// Shell just inside `shell`, if any
    fn inward(&self, shell: Option<usize>) -> Option<Option<usize>> {
        match shell {
            None if self.is_empty() => None,
            None => Some(Some(self.len() - 1)),
            Some(0) => None,
            Some(i) => Some(Some(i - 1)),
        }
    }

    /// Shell just outside `shell`
    fn outward(&self, shell: Option<usize>) -> Option<usize> {
        shell.and_then(|i| (i + 1 < self.len()).then_some(i + 1))
    }

    /// Squared radius of the inner step bounding `shell`
    fn inner_boundary_squared(&self, shell: Option<usize>) -> Option<f64> {
        match shell {
            None => self.boundaries_squared.last().copied(),
            Some(0) => None,
            Some(i) => Some(self.boundaries_squared[i - 1]),
        }
    }

    /// Time until the pair, currently in `shell`, crosses one of its bounding steps
    ///
    /// Approaching pairs are tested against the inner step first using the
    /// smaller root of |𝒓 + 𝒗𝑡|² = 𝑑²; otherwise the larger root for the outer
    /// step is used. Both roots are written in a form free of cancellation.
    pub fn collision_time<const D: usize>(
        &self,
        kinematics: &PairKinematics<D>,
        shell: Option<usize>,
    ) -> f64 {
        let v2 = kinematics.speed_squared();
        if v2 == 0.0 {
            return f64::INFINITY;
        }
        let r2 = kinematics.distance_squared();
        let bij = kinematics.approach();

        if bij < 0.0 {
            if let Some(d2) = self.inner_boundary_squared(shell) {
                let discriminant = bij * bij - v2 * (r2 - d2);
                if discriminant > 0.0 {
                    return f64::max((r2 - d2) / (discriminant.sqrt() - bij), 0.0);
                }
            }
        }
        match shell {
            None => f64::INFINITY,
            Some(i) => {
                let d2 = self.boundaries_squared[i];
                let root = f64::max(bij * bij - v2 * (r2 - d2), 0.0).sqrt();
                let time = if bij > 0.0 {
                    (d2 - r2) / (root + bij)
                } else {
                    (root - bij) / v2
                };
                f64::max(time, 0.0)
            }
        }
    }

    /// Apply the impulse for a pair in `shell` reaching one of its steps
    ///
    /// Returns the new shell, the collision virial and the potential energy change.
    pub fn bump<const D: usize>(
        &self,
        first: &mut impl Kinetic<D>,
        second: &mut impl Kinetic<D>,
        shell: Option<usize>,
        separation: &Vector<D>,
        false_time: f64,
    ) -> (Option<usize>, f64, f64) {
        let relative_velocity = second.velocity() - first.velocity();
        let r2 = separation.norm_squared();
        let bij = separation.dot(&relative_velocity);
        let (inv_mass1, inv_mass2) = (first.inverse_mass(), second.inverse_mass());
        let inverse_reduced_mass = inv_mass1 + inv_mass2;

        let target = if bij < 0.0 {
            self.inward(shell)
        } else if bij > 0.0 {
            Some(self.outward(shell))
        } else {
            None
        };
        let target = match target {
            Some(target) if inverse_reduced_mass > 0.0 => target,
            _ => {
                log::trace!("no impulse for shell {shell:?} at r² = {r2}, 𝒓·𝒗 = {bij}");
                return (shell, 0.0, 0.0);
            }
        };
        let reduced_mass = inverse_reduced_mass.recip();
        let (u_old, u_new) = (self.energy(shell), self.energy(target));

        let (new_shell, new_bij, energy_change) = if u_old.is_infinite() && u_new.is_finite() {
            log::warn!("overlapping pair leaves a hard core at r² = {r2}");
            (target, bij, f64::NEG_INFINITY)
        } else if u_old.is_infinite() && u_new.is_infinite() {
            // between two overlapping shells the energy does not change
            (target, bij, 0.0)
        } else {
            let delta_u = u_new - u_old;
            let radial_kinetic_energy = 0.5 * reduced_mass * bij * bij / r2;
            if delta_u.is_infinite() || radial_kinetic_energy < delta_u {
                (shell, -bij, 0.0)
            } else {
                let new_bij =
                    bij.signum() * (bij * bij - 2.0 * r2 * delta_u / reduced_mass).sqrt();
                (target, new_bij, delta_u)
            }
        };

        let virial = reduced_mass * (bij - new_bij);
        let impulse = separation * (virial / r2);
        *first.velocity_mut() += impulse * inv_mass1;
        *second.velocity_mut() -= impulse * inv_mass2;
        *first.position_mut() -= impulse * (false_time * inv_mass1);
        *second.position_mut() += impulse * (false_time * inv_mass2);

        (new_shell, virial, energy_change)
    }

    /// ∫ 𝑈(𝑟) S_D 𝑟ᴰ⁻¹ d𝑟 from `cutoff` to infinity
    pub fn tail_integral(&self, dimension: usize, cutoff: f64) -> f64 {
        let mut inner = 0.0f64;
        let mut integral = 0.0;
        for (&d2, &energy) in self.boundaries_squared.iter().zip(self.energies) {
            let (lower, upper) = (f64::max(inner, cutoff), d2.sqrt());
            inner = upper;
            if upper <= lower || energy == 0.0 {
                continue;
            }
            integral += energy * (ball_volume(dimension, upper) - ball_volume(dimension, lower));
        }
        integral
    }
}

/// Checks that steps are positive, finite and increasing, with one energy per step
pub(crate) fn validate(boundaries_squared: &[f64], energies: &[f64]) -> Result<()> {
    if boundaries_squared.is_empty() {
        return Err(PotentialError::invalid(
            "number of steps",
            0.0,
            "at least one step is required",
        ));
    }
    if boundaries_squared.len() != energies.len() {
        return Err(PotentialError::invalid(
            "number of energies",
            energies.len() as f64,
            "must equal the number of steps",
        ));
    }
    if let Some(&d2) = boundaries_squared
        .iter()
        .find(|d2| !(**d2 > 0.0 && d2.is_finite()))
    {
        return Err(PotentialError::invalid(
            "step radius",
            d2.sqrt(),
            "must be positive and finite",
        ));
    }
    if let Some((_, &d2)) = boundaries_squared
        .iter()
        .tuple_windows()
        .find(|(inner, outer)| inner >= outer)
    {
        return Err(PotentialError::invalid(
            "step radius",
            d2.sqrt(),
            "steps must be strictly increasing",
        ));
    }
    if let Some(&energy) = energies.iter().find(|e| e.is_nan() || **e == f64::NEG_INFINITY) {
        return Err(PotentialError::invalid(
            "step energy",
            energy,
            "must be finite or +∞",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hard::Particle;
    use crate::Vector3;
    use approx::assert_relative_eq;

    /// Square well: core at 1, well to 1.5 with depth 1
    const BOUNDARIES: [f64; 2] = [1.0, 2.25];
    const ENERGIES: [f64; 2] = [f64::INFINITY, -1.0];

    fn square_well() -> StepProfile<'static> {
        StepProfile::new(&BOUNDARIES, &ENERGIES).unwrap()
    }

    fn particle(x: f64, vx: f64) -> Particle<3> {
        Particle::new(Vector3::new(x, 0.0, 0.0), Vector3::new(vx, 0.0, 0.0), 1.0).unwrap()
    }

    #[test]
    fn test_validate() {
        assert!(StepProfile::new(&[], &[]).is_err());
        assert!(StepProfile::new(&[1.0], &[]).is_err());
        assert!(StepProfile::new(&[-1.0], &[1.0]).is_err());
        assert!(StepProfile::new(&[2.0, 1.0], &[1.0, 1.0]).is_err());
        assert!(StepProfile::new(&[1.0, 1.0], &[1.0, 1.0]).is_err());
        assert!(StepProfile::new(&[1.0], &[f64::NAN]).is_err());
        assert!(StepProfile::new(&[1.0], &[f64::NEG_INFINITY]).is_err());
        assert!(StepProfile::new(&[1.0], &[f64::INFINITY]).is_ok());
    }

    #[test]
    fn test_shell() {
        let profile = square_well();
        assert_eq!(profile.shell(0.5), Some(0));
        assert_eq!(profile.shell(1.0), Some(1)); // contact is not overlap
        assert_eq!(profile.shell(2.0), Some(1));
        assert_eq!(profile.shell(2.25), None);
        assert_eq!(profile.energy(Some(1)), -1.0);
        assert_eq!(profile.energy(None), 0.0);
        assert_eq!(profile.range_squared(), 2.25);
    }

    #[test]
    fn test_shell_moving() {
        let profile = square_well();
        let tol = 1e-9;
        // on the core, receding or approaching
        assert_eq!(profile.shell_moving(1.0 + 1e-12, 1.0, tol), Some(1));
        assert_eq!(profile.shell_moving(1.0 - 1e-12, -1.0, tol), Some(0));
        // on the well edge
        assert_eq!(profile.shell_moving(2.25, 1.0, tol), None);
        assert_eq!(profile.shell_moving(2.25, -1.0, tol), Some(1));
        // grazing resolves inward
        assert_eq!(profile.shell_moving(2.25, 0.0, tol), Some(1));
        // away from steps the direction is irrelevant
        assert_eq!(profile.shell_moving(1.5, 1.0, tol), Some(1));
        assert_eq!(profile.shell_moving(4.0, -1.0, tol), None);
    }

    #[test]
    fn test_collision_time_head_on() {
        let profile = square_well();
        // approaching from outside the well at closing speed 2
        let kin = PairKinematics::new(Vector3::new(3.0, 0.0, 0.0), Vector3::new(-2.0, 0.0, 0.0));
        assert_relative_eq!(profile.collision_time(&kin, None), 0.75);
        // inside the well, hits the core
        assert_relative_eq!(profile.collision_time(&kin.advanced(0.75), Some(1)), 0.25);
        // receding from the well edge: no step ahead
        let kin = PairKinematics::new(Vector3::new(1.5, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(profile.collision_time(&kin, None), f64::INFINITY);
        // receding from the core, inside the well
        let kin = PairKinematics::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(profile.collision_time(&kin, Some(1)), 0.5);
        // at rest
        let kin = PairKinematics::new(Vector3::new(1.2, 0.0, 0.0), Vector3::zeros());
        assert_eq!(profile.collision_time(&kin, Some(1)), f64::INFINITY);
    }

    #[test]
    fn test_collision_time_miss_core() {
        let profile = square_well();
        // impact parameter 1.2 misses the core (σ = 1) but traverses the well
        let kin = PairKinematics::new(Vector3::new(-0.5, 1.2, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(kin.approach() < 0.0);
        let exit = (2.25f64 - 1.44).sqrt();
        assert_relative_eq!(profile.collision_time(&kin, Some(1)), exit + 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_collision_time_never_negative() {
        let profile = square_well();
        // slightly past the well edge yet still flagged as inside and receding
        let kin = PairKinematics::new(Vector3::new(1.5 + 1e-12, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(profile.collision_time(&kin, Some(1)), 0.0);
        // slightly inside the core while approaching
        let kin = PairKinematics::new(Vector3::new(1.0 - 1e-12, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(profile.collision_time(&kin, Some(1)), 0.0);
    }

    #[test]
    fn test_bump_core_reflection() {
        let profile = square_well();
        let (mut a, mut b) = (particle(0.0, 1.0), particle(1.0, -1.0));
        let separation = b.position - a.position;
        let (shell, virial, du) = profile.bump(&mut a, &mut b, Some(1), &separation, 0.0);
        assert_eq!(shell, Some(1));
        assert_eq!(du, 0.0);
        assert_relative_eq!(a.velocity.x, -1.0);
        assert_relative_eq!(b.velocity.x, 1.0);
        // μ = 1/2, b = -2, b' = 2
        assert_relative_eq!(virial, -2.0);
    }

    #[test]
    fn test_bump_capture_and_escape() {
        let profile = square_well();
        // capture: radial kinetic energy 1, gains 1 from the well
        let (mut a, mut b) = (particle(0.0, 1.0), particle(1.5, -1.0));
        let separation = b.position - a.position;
        let ke = a.kinetic_energy() + b.kinetic_energy();
        let (shell, virial, du) = profile.bump(&mut a, &mut b, None, &separation, 0.0);
        assert_eq!(shell, Some(1));
        assert_eq!(du, -1.0);
        assert_relative_eq!(a.kinetic_energy() + b.kinetic_energy(), ke - du);
        assert!(virial > 0.0);

        // escape with enough energy
        let (mut a, mut b) = (particle(0.0, -1.0), particle(1.5, 1.0));
        let (shell, _, du) = profile.bump(&mut a, &mut b, Some(1), &separation, 0.0);
        assert_eq!(shell, None);
        assert_eq!(du, 1.0);
        assert_relative_eq!(a.kinetic_energy() + b.kinetic_energy(), 0.0, epsilon = 1e-12);

        // trapped: not enough radial energy to leave
        let (mut a, mut b) = (particle(0.0, -0.5), particle(1.5, 0.5));
        let (shell, _, du) = profile.bump(&mut a, &mut b, Some(1), &separation, 0.0);
        assert_eq!(shell, Some(1));
        assert_eq!(du, 0.0);
        assert_relative_eq!(b.velocity.x, -0.5);
    }

    #[test]
    fn test_bump_false_positioning() {
        let profile = square_well();
        let false_time = 0.3;
        // positions lag the contact configuration by `false_time`
        let (mut a, mut b) = (particle(-0.3, 1.0), particle(1.3, -1.0));
        let separation = Vector3::new(1.0, 0.0, 0.0);
        profile.bump(&mut a, &mut b, Some(1), &separation, false_time);
        let contact_a = a.position + a.velocity * false_time;
        let contact_b = b.position + b.velocity * false_time;
        assert_relative_eq!(contact_a.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(contact_b.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bump_degenerate() {
        let profile = square_well();
        // grazing contact: no impulse
        let mut a = Particle::new(Vector3::zeros(), Vector3::new(0.0, 1.0, 0.0), 1.0).unwrap();
        let mut b = particle(1.0, 0.0);
        let separation = Vector3::new(1.0, 0.0, 0.0);
        let (shell, virial, du) = profile.bump(&mut a, &mut b, Some(1), &separation, 0.0);
        assert_eq!((shell, virial, du), (Some(1), 0.0, 0.0));
        // two immovable particles
        let mut a = Particle::fixed(Vector3::zeros());
        let mut b = Particle::fixed(Vector3::new(1.0, 0.0, 0.0));
        let (shell, virial, _) = profile.bump(&mut a, &mut b, Some(1), &separation, 0.0);
        assert_eq!((shell, virial), (Some(1), 0.0));
    }

    #[test]
    fn test_bump_against_wall() {
        let profile = square_well();
        let mut wall = Particle::fixed(Vector3::zeros());
        let mut b = particle(1.0, -2.0);
        let separation = b.position - wall.position;
        profile.bump(&mut wall, &mut b, Some(1), &separation, 0.0);
        assert_eq!(wall.velocity, Vector3::zeros());
        assert_relative_eq!(b.velocity.x, 2.0);
    }

    #[test]
    fn test_bump_between_infinite_shells() {
        let boundaries = [1.0, 1.44, 2.56];
        let energies = [f64::INFINITY, f64::INFINITY, -0.6];
        let profile = StepProfile::new(&boundaries, &energies).unwrap();
        // approaching across the inner step and receding across it again
        for (vx, shell, target) in [(-1.0, Some(1), Some(0)), (1.0, Some(0), Some(1))] {
            let (mut a, mut b) = (particle(0.0, -vx), particle(1.0, vx));
            let separation = b.position - a.position;
            let (new_shell, virial, du) = profile.bump(&mut a, &mut b, shell, &separation, 0.2);
            assert_eq!((new_shell, virial, du), (target, 0.0, 0.0));
            assert_eq!(a.velocity.x, -vx);
            assert_eq!(b.velocity.x, vx);
            assert!(a.position.iter().chain(b.position.iter()).all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_tail_integral() {
        let profile = square_well();
        let volume = |r: f64| 4.0 / 3.0 * std::f64::consts::PI * r.powi(3);
        assert_relative_eq!(profile.tail_integral(3, 1.2), -(volume(1.5) - volume(1.2)));
        assert_eq!(profile.tail_integral(3, 1.5), 0.0);
        assert_eq!(profile.tail_integral(3, 0.5), f64::INFINITY);
    }
}
