//! Shared inputs for the stb micro-benchmarks.

use stb_core::FlapSet;

/// Deterministic (open flaps, roll total) pairs for a box of `num_flaps`.
///
/// Open sets are nonempty; totals are two-dice totals 2..=12.
pub fn gen_cases(n: usize, num_flaps: u8) -> Vec<(FlapSet, u32)> {
    let full = FlapSet::full(num_flaps).mask();
    let mut out = Vec::with_capacity(n);
    let mut x: u64 = 0xA5A5_A5A5_0123_4567;
    while out.len() < n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        let open = FlapSet::from_mask((x >> 16) as u16 & full);
        if open.is_empty() {
            continue;
        }
        let total = 2 + ((x >> 40) % 11) as u32;
        out.push((open, total));
    }
    out
}
