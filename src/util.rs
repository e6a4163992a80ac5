use std::f64::consts::PI;

use rand::Rng;

/// Shuffles `slice` in place with the thread-local generator and hands it back.
pub fn shuffle<T>(slice: &mut [T]) -> &mut [T] {
    shuffle_with(slice, &mut rand::thread_rng())
}

/// Fisher-Yates shuffle driven by `rng`. Performs exactly `len - 1` swaps.
pub fn shuffle_with<'a, T, R: Rng + ?Sized>(slice: &'a mut [T], rng: &mut R) -> &'a mut [T] {
    for i in (1..slice.len()).rev() {
        let idx = rng.gen_range(0..=i);
        slice.swap(idx, i);
    }
    slice
}

pub fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}
