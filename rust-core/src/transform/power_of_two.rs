//! Power-of-two helpers used to size transform buffers

/// Check whether `n` is an integer power of two (1, 2, 4, ...)
pub fn check_power_of_two(n: usize) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Smallest power of two that is equal to or larger than `len`
///
/// `0` maps to `1`, the shortest transformable length.
pub fn next_power_of_two(len: usize) -> usize {
    len.next_power_of_two()
}

/// Largest power of two that is equal to or smaller than `len`
///
/// Returns `0` for `len == 0`, where no such power exists.
pub fn last_power_of_two(len: usize) -> usize {
    if len == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - len.leading_zeros())
    }
}

/// Odd multiplier `m` such that `n = m * 2^k`
///
/// Returns `None` for `n == 0`. A power of two yields `Some(1)`.
pub fn integer_times_power_of_two(n: usize) -> Option<usize> {
    if n == 0 {
        None
    } else {
        Some(n >> n.trailing_zeros())
    }
}

/// Number of data points covered by `segment_number` segments of
/// `segment_length` points, optionally overlapping by half a segment
pub fn calc_data_length(overlap: bool, segment_length: usize, segment_number: usize) -> usize {
    if overlap {
        (segment_number + 1) * segment_length / 2
    } else {
        segment_number * segment_length
    }
}
