//! Property-based tests for index resolution.
//!
//! These tests use proptest to generate candidate set sizes, positions and
//! steps, and check the bounds and reversibility of `land`.

#[cfg(test)]
mod proptest_tests {
    use crate::rotate::{land, Landing};
    use proptest::prelude::*;

    /// A candidate set size and a valid position in it
    fn set_and_position() -> impl Strategy<Value = (usize, usize)> {
        (1usize..64).prop_flat_map(|len| (Just(len), 0..len))
    }

    fn nonzero_step() -> impl Strategy<Value = i64> {
        prop_oneof![i64::MIN..0, 1..=i64::MAX]
    }

    proptest! {
        /// Property: the clamped index is always a valid index
        #[test]
        fn clamped_index_is_in_bounds(
            (len, current) in set_and_position(),
            step in nonzero_step(),
        ) {
            let index = land(current, step, len).clamp(len);
            prop_assert!(index < len, "index {} out of bounds for {} candidates", index, len);
        }

        /// Property: an in-range landing is exactly current + step
        #[test]
        fn in_range_is_exact(
            (len, current) in set_and_position(),
            step in -64i64..64,
        ) {
            let raw = current as i64 + step;
            match land(current, step, len) {
                Landing::InRange(index) => prop_assert_eq!(index as i64, raw),
                Landing::Before(r) => {
                    prop_assert!(raw < 0);
                    prop_assert_eq!(r, raw);
                }
                Landing::After(r) => {
                    prop_assert!(raw >= len as i64);
                    prop_assert_eq!(r, raw);
                }
            }
        }

        /// Property: stepping +k then -k returns to the start when nothing clamps
        #[test]
        fn forward_then_backward_returns(
            (len, current) in set_and_position(),
            k in 1i64..64,
        ) {
            if let Landing::InRange(moved) = land(current, k, len) {
                prop_assert_eq!(land(moved, -k, len), Landing::InRange(current));
            }
        }

        /// Property: clamping moves in the direction of the step, or not at all
        #[test]
        fn clamping_follows_direction(
            (len, current) in set_and_position(),
            step in nonzero_step(),
        ) {
            let index = land(current, step, len).clamp(len);
            if step > 0 {
                prop_assert!(index >= current);
            } else {
                prop_assert!(index <= current);
            }
        }
    }
}
