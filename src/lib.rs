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

//! # Pairpot
//!
//! Pair potentials for particle simulations, covering two complementary needs:
//!
//! - **Soft potentials** evaluated as a function of the squared separation, with
//!   [`twobody::Truncated`] applying a cutoff and an optional energy or force shift
//!   together with the matching long-range tail correction.
//! - **Hard potentials** (hard spheres, square wells and general step potentials)
//!   for event-driven dynamics, where the [`hard::HardCollision`] trait predicts
//!   collision times from straight-line kinematics and resolves impulsive collisions.
//!
//! Neighbour search, periodic boundaries and integration are left to the caller:
//! all functions here take minimum-image separations and are pure, so independent
//! pairs can be evaluated concurrently.

#[cfg(test)]
extern crate approx;

/// A point in 3D space
pub type Vector3 = nalgebra::Vector3<f64>;
/// A point in D-dimensional space
pub type Vector<const D: usize> = nalgebra::SVector<f64, D>;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::f64::consts::PI;

mod error;
pub mod hard;
pub mod twobody;

pub use self::error::{PotentialError, Result};

/// Defines a cutoff distance, beyond which the energy is exactly zero
pub trait Cutoff {
    /// Squared cutoff distance
    fn cutoff_squared(&self) -> f64 {
        self.cutoff().powi(2)
    }

    /// Cutoff distance
    fn cutoff(&self) -> f64;
}

/// Descriptive information about a potential
pub trait Info {
    /// Short, lowercase name
    fn short_name(&self) -> Option<&'static str> {
        None
    }
    /// Human readable name
    fn long_name(&self) -> Option<&'static str> {
        None
    }
    /// Literature reference or link
    fn citation(&self) -> Option<&'static str> {
        None
    }
}

/// Surface area of the unit sphere in `dimension` dimensions, S_D.
///
/// This is 2, 2π and 4π for one, two and three dimensions.
///
/// # Examples
/// ```
/// use pairpot::unit_sphere_surface;
/// assert_eq!(unit_sphere_surface(3), 4.0 * std::f64::consts::PI);
/// ```
pub fn unit_sphere_surface(dimension: usize) -> f64 {
    match dimension {
        0 => 0.0,
        1 => 2.0,
        2 => 2.0 * PI,
        // S_{D+2} = 2π S_D / D
        d => 2.0 * PI * unit_sphere_surface(d - 2) / (d - 2) as f64,
    }
}

/// Volume of a ball of `radius` in `dimension` dimensions, V_D(r) = S_D rᴰ / D
pub fn ball_volume(dimension: usize, radius: f64) -> f64 {
    if dimension == 0 {
        return 1.0;
    }
    unit_sphere_surface(dimension) * radius.powi(dimension as i32) / dimension as f64
}

/// Transform x^2 --> x when serializing
#[cfg(feature = "serde")]
fn sqrt_serialize<S>(x: &f64, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_f64(x.sqrt())
}

/// Transform x --> x^2 when deserializing
#[cfg(feature = "serde")]
fn square_deserialize<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64::deserialize(deserializer)?.powi(2))
}

/// Transform x --> x^2 when deserializing, rejecting non-positive x
#[cfg(feature = "serde")]
fn positive_square_deserialize<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let x = f64::deserialize(deserializer)?;
    if x > 0.0 && x.is_finite() {
        Ok(x * x)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a positive, finite distance, got {x}"
        )))
    }
}

/// Transform x --> x/4 when serializing
#[cfg(feature = "serde")]
fn divide4_serialize<S>(x: &f64, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_f64(x / 4.0)
}

/// Transform x --> 4x when deserializing
#[cfg(feature = "serde")]
fn multiply4_deserialize<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64::deserialize(deserializer)? * 4.0)
}
