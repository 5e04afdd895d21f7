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

//! Two particles in a square well, followed event by event.
//!
//! Run with `cargo run --example square_well_pair`.

use anyhow::{ensure, Context, Result};
use pairpot::hard::{HardCollision, Kinetic, PairKinematics, Particle};
use pairpot::twobody::{IsotropicTwobodyEnergy, SquareWell};
use pairpot::Vector3;

const MAX_EVENTS: usize = 12;

fn main() -> Result<()> {
    let well = SquareWell::new(1.0, 1.5, 1.0).context("invalid square well")?;
    let mut first = Particle::new(Vector3::zeros(), Vector3::new(0.6, 0.1, 0.0), 1.0)?;
    let mut second = Particle::new(
        Vector3::new(2.5, 0.4, 0.0),
        Vector3::new(-0.6, 0.0, 0.0),
        2.0,
    )?;

    let kinetic_energy = |a: &Particle<3>, b: &Particle<3>| a.kinetic_energy() + b.kinetic_energy();
    // on a step the configuration alone is ambiguous, so track the potential energy
    let mut potential_energy =
        well.isotropic_twobody_energy((second.position - first.position).norm_squared());
    let initial_energy = kinetic_energy(&first, &second) + potential_energy;

    let mut state = well.state(&PairKinematics::between(&first, &second));
    let mut clock = 0.0;
    println!("{:>4} {:>10} {:>8} {:>10} {:>10}  state", "#", "time", "r", "virial", "ΔU");

    for event in 1..=MAX_EVENTS {
        let time = well.collision_time(&PairKinematics::between(&first, &second), state);
        if !time.is_finite() {
            println!("pair has separated after {} events", event - 1);
            break;
        }
        clock += time;
        first.position += first.velocity * time;
        second.position += second.velocity * time;

        let separation = second.position - first.position;
        let collision = well.bump(&mut first, &mut second, state, &separation, 0.0);
        state = collision.state;
        potential_energy += collision.energy_change;
        println!(
            "{event:>4} {clock:>10.5} {:>8.5} {:>10.5} {:>10.5}  {state:?}",
            separation.norm(),
            collision.virial,
            collision.energy_change
        );
    }

    let final_energy = kinetic_energy(&first, &second) + potential_energy;
    ensure!(
        (final_energy - initial_energy).abs() < 1e-9,
        "energy drift: {initial_energy} → {final_energy}"
    );
    println!("total energy conserved: {final_energy:.12}");
    Ok(())
}
