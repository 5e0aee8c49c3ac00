pub mod calendar;
pub mod config;
pub mod error;
pub mod features;
pub mod generator;
pub mod history;
pub mod pipeline;
pub mod remote;
pub mod sampler;
pub mod search;
pub mod similarity;

pub use error::{NexusError, Result};

use nexus_db::models::{Draw, MAX_NUMBER, PICK_COUNT};

/// Tirage synthétique déterministe pour un numéro donné.
pub fn make_test_draw(round: u32) -> Draw {
    let mut state = (round as u64).wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut numbers = Vec::with_capacity(PICK_COUNT);
    while numbers.len() < PICK_COUNT {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let n = ((state >> 33) % MAX_NUMBER as u64) as u8 + 1;
        if !numbers.contains(&n) {
            numbers.push(n);
        }
    }
    let mut arr = [0u8; PICK_COUNT];
    arr.copy_from_slice(&numbers);
    Draw::new(round, arr).expect("tirage synthétique valide")
}

/// `n` tirages synthétiques, du plus récent (tirage n) au plus ancien (tirage 1).
pub fn make_test_draws(n: usize) -> Vec<Draw> {
    (1..=n as u32).rev().map(make_test_draw).collect()
}
