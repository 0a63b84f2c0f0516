//! LSB-first bitmap helpers.
//!
//! Bit `i` of a bitmap lives at bit `i % 8` of byte `i / 8`. Null masks
//! follow the same layout, with a set bit meaning "this position is null".

const BIT_MASK: [u8; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

/// Returns whether bit `i` in `bytes` is set
#[inline]
pub fn is_set(bytes: &[u8], i: usize) -> bool {
    bytes[i / 8] & BIT_MASK[i % 8] != 0
}

/// Sets bit `i` in `bytes`
#[inline]
pub fn set(bytes: &mut [u8], i: usize) {
    bytes[i / 8] |= BIT_MASK[i % 8];
}

/// Clears bit `i` in `bytes`
#[inline]
pub fn clear(bytes: &mut [u8], i: usize) {
    bytes[i / 8] &= !BIT_MASK[i % 8];
}

/// Returns whether position `i` of the null mask `nulls` is null.
#[inline]
pub fn is_null(nulls: &[u8], i: usize) -> bool {
    is_set(nulls, i)
}

/// Counts the non-null positions of `nulls` in `[start, end)`.
pub fn count_non_nulls(nulls: &[u8], start: usize, end: usize) -> usize {
    (start..end).filter(|&i| !is_null(nulls, i)).count()
}

/// Scatters the first `source_count` (densely packed) bits of `data` over
/// the non-null positions of the first `target_count` slots, in place.
/// Null positions come out cleared. Proceeds back-to-front so a source bit
/// is always read before its slot can be overwritten.
pub fn scatter_bits(source_count: usize, target_count: usize, data: &mut [u8], nulls: &[u8]) {
    debug_assert!(source_count <= target_count);
    let mut source = source_count;
    for target in (0..target_count).rev() {
        if is_null(nulls, target) {
            clear(data, target);
        } else {
            source -= 1;
            if is_set(data, source) {
                set(data, target);
            } else {
                clear(data, target);
            }
        }
    }
    debug_assert_eq!(source, 0);
}
