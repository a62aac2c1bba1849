//! Bitmask utilities.
//!
//! Converts integer bitmasks into ordered lists of positions. The position of
//! bit `k` (counted from the least significant bit) is `origin + k * step`,
//! which lets the same routine produce plain bit indices or map wire mask
//! bits onto attribute ordinals:
//!
//! ```
//! use omci_codec::bits::{bit_positions, set_bits};
//!
//! assert_eq!(set_bits(0x811), vec![0, 4, 11]);
//! // Attribute mask addressing: bit 15 is ordinal 1, bit 0 is ordinal 16.
//! assert_eq!(bit_positions(0x801, 16, -1), vec![5, 16]);
//! ```

/// Positions of the set bits of `mask`, mapped through `origin + k * step`.
///
/// The result is sorted in ascending numeric order of the mapped values,
/// regardless of the sign of `step`. Total over every input: mapped values
/// wrap on `i32` overflow.
pub fn bit_positions(mask: u32, origin: i32, step: i32) -> Vec<i32> {
    let mut positions: Vec<i32> = (0..u32::BITS as i32)
        .filter(|k| mask & (1u32 << k) != 0)
        .map(|k| origin.wrapping_add(k.wrapping_mul(step)))
        .collect();
    positions.sort_unstable();
    positions
}

/// Ascending indices of the set bits of `mask`.
#[inline]
pub fn set_bits(mask: u32) -> Vec<i32> {
    bit_positions(mask, 0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_set_bits() {
        assert_eq!(set_bits(0), Vec::<i32>::new());
        assert_eq!(set_bits(1), vec![0]);
        assert_eq!(set_bits(3), vec![0, 1]);
        assert_eq!(set_bits(255), vec![0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(set_bits(0x800), vec![11]);
        assert_eq!(set_bits(0x811), vec![0, 4, 11]);
    }

    #[test]
    fn test_reversed_origin() {
        assert_eq!(bit_positions(0, 16, -1), Vec::<i32>::new());
        assert_eq!(bit_positions(1, 16, -1), vec![16]);
        assert_eq!(bit_positions(0x800, 16, -1), vec![5]);
        assert_eq!(bit_positions(0x801, 16, -1), vec![5, 16]);
    }

    #[test]
    fn test_high_bit() {
        assert_eq!(set_bits(0x8000_0000), vec![31]);
        assert_eq!(bit_positions(u32::MAX, 0, 2).len(), 32);
    }

    #[test]
    fn test_extreme_origin_and_step_wrap() {
        assert_eq!(bit_positions(0x3, i32::MAX, 1), vec![i32::MIN, i32::MAX]);
        assert_eq!(bit_positions(0x8000_0000, 0, i32::MAX).len(), 1);
    }

    proptest! {
        #[test]
        fn test_positions_match_popcount_and_are_sorted(mask in any::<u32>()) {
            let positions = set_bits(mask);
            prop_assert_eq!(positions.len() as u32, mask.count_ones());
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            let rebuilt = positions.iter().fold(0u32, |acc, k| acc | (1u32 << k));
            prop_assert_eq!(rebuilt, mask);
        }
    }
}
