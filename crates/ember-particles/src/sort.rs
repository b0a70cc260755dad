//! Byte-wise radix sort on `f32` keys.
//!
//! Floats are mapped to unsigned integers whose order matches the float
//! order: negative values flip every bit, non-negative values flip only
//! the sign bit. Four LSD counting passes then sort without comparisons.
//! Buffers are reused across calls, so per-frame sorting does not allocate
//! after warm-up.

/// Reusable radix sorter for index lists keyed by `f32`.
#[derive(Debug, Default)]
pub struct RadixSorter {
    pairs: Vec<(u32, u32)>,
    scratch: Vec<(u32, u32)>,
}

fn order_preserving_bits(key: f32) -> u32 {
    let bits = key.to_bits();
    if bits & 0x8000_0000 != 0 {
        !bits
    } else {
        bits | 0x8000_0000
    }
}

impl RadixSorter {
    /// A sorter with empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts `indices` ascending by `key(index)`.
    pub fn sort(&mut self, indices: &mut [u32], mut key: impl FnMut(u32) -> f32) {
        if indices.len() < 2 {
            return;
        }
        self.pairs.clear();
        self.pairs
            .extend(indices.iter().map(|&i| (order_preserving_bits(key(i)), i)));
        self.scratch.clear();
        self.scratch.resize(self.pairs.len(), (0, 0));

        for pass in 0..4 {
            let shift = pass * 8;
            let mut counts = [0usize; 256];
            for &(k, _) in &self.pairs {
                counts[((k >> shift) & 0xff) as usize] += 1;
            }
            let mut offsets = [0usize; 256];
            let mut running = 0;
            for (offset, &count) in offsets.iter_mut().zip(&counts) {
                *offset = running;
                running += count;
            }
            for &pair in &self.pairs {
                let bucket = ((pair.0 >> shift) & 0xff) as usize;
                self.scratch[offsets[bucket]] = pair;
                offsets[bucket] += 1;
            }
            std::mem::swap(&mut self.pairs, &mut self.scratch);
        }

        for (slot, &(_, index)) in indices.iter_mut().zip(&self.pairs) {
            *slot = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(keys: &[f32]) {
        let mut indices: Vec<u32> = (0..keys.len() as u32).collect();
        let mut sorter = RadixSorter::new();
        sorter.sort(&mut indices, |i| keys[i as usize]);

        let mut expected: Vec<u32> = (0..keys.len() as u32).collect();
        expected.sort_by(|&a, &b| keys[a as usize].total_cmp(&keys[b as usize]));
        let sorted: Vec<f32> = indices.iter().map(|&i| keys[i as usize]).collect();
        let reference: Vec<f32> = expected.iter().map(|&i| keys[i as usize]).collect();
        assert_eq!(sorted, reference);
    }

    #[test]
    fn test_sorts_mixed_signs() {
        check(&[3.5, -1.0, 0.0, -7.25, 2.0, -0.5, 1e9, -1e9]);
    }

    #[test]
    fn test_sorts_negative_zero_with_zero() {
        let keys = [-0.0_f32, 0.0, 1.0, -1.0];
        let mut indices: Vec<u32> = (0..4).collect();
        RadixSorter::new().sort(&mut indices, |i| keys[i as usize]);
        assert_eq!(keys[indices[0] as usize], -1.0);
        assert_eq!(keys[indices[3] as usize], 1.0);
    }

    #[test]
    fn test_large_random_input() {
        let mut rng_state = 0x1234_5678_u32;
        let mut keys = Vec::with_capacity(1000);
        for _ in 0..1000 {
            rng_state = rng_state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            keys.push((rng_state as f32 / u32::MAX as f32 - 0.5) * 2000.0);
        }
        check(&keys);
    }

    #[test]
    fn test_empty_and_single() {
        let mut sorter = RadixSorter::new();
        let mut empty: Vec<u32> = Vec::new();
        sorter.sort(&mut empty, |_| 0.0);
        let mut one = vec![0u32];
        sorter.sort(&mut one, |_| 0.0);
        assert_eq!(one, [0]);
    }
}
