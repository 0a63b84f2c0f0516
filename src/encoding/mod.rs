pub mod boolean_rle;
pub mod byte_rle;

/// Returns the ceil of value/8
#[inline]
pub fn ceil8(value: usize) -> usize {
    value / 8 + ((value % 8 != 0) as usize)
}
