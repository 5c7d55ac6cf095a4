//! Dice rolling.

use rand::Rng;

/// Rolls two dice. Equal faces are a double and yield four usable values;
/// otherwise the two values come back in the order rolled.
///
/// Generic over the RNG so sessions can use a seeded generator.
pub fn roll_dice<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
    let a: u8 = rng.random_range(1..=6);
    let b: u8 = rng.random_range(1..=6);
    if a == b { vec![a; 4] } else { vec![a, b] }
}
