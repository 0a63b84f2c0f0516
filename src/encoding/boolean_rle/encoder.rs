use crate::bitmap::{is_null, is_set};
use crate::error::Result;
use crate::position::PositionRecorder;
use crate::ranges::Ranges;
use crate::stream::OutputStream;

use super::super::byte_rle::ByteRleEncoder;

/// A run-length encoder of boolean streams, layered over
/// [`ByteRleEncoder`].
///
/// Booleans accumulate MSB-first into `current`; each filled byte is
/// written through the byte encoder.
pub struct BooleanRleEncoder<S: OutputStream> {
    byte: ByteRleEncoder<S>,
    /// Bits still free in `current`, 8 down to 1.
    remaining_bits: u8,
    current: u8,
}

impl<S: OutputStream> BooleanRleEncoder<S> {
    pub fn new(output: S) -> Self {
        Self {
            byte: ByteRleEncoder::new(output),
            remaining_bits: 8,
            current: 0,
        }
    }

    /// Encodes one boolean per byte of `data` (nonzero = true) at the
    /// indices of `ranges`, skipping positions marked null. Returns the
    /// number of values written.
    pub fn add(&mut self, data: &[u8], ranges: &Ranges, nulls: Option<&[u8]>) -> Result<u64> {
        let mut count = 0;
        match nulls {
            Some(nulls) => {
                for pos in ranges.iter() {
                    if !is_null(nulls, pos) {
                        self.write_bool(data[pos] != 0)?;
                        count += 1;
                    }
                }
            }
            None => {
                for pos in ranges.iter() {
                    self.write_bool(data[pos] != 0)?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Encodes `true` at every non-null position of `ranges`. This is the
    /// path presence streams take when the column has no value buffer at
    /// all.
    pub fn add_ones(&mut self, ranges: &Ranges, nulls: Option<&[u8]>) -> Result<u64> {
        let mut count = 0;
        match nulls {
            Some(nulls) => {
                for pos in ranges.iter() {
                    if !is_null(nulls, pos) {
                        self.write_bool(true)?;
                        count += 1;
                    }
                }
            }
            None => {
                for pos in ranges.iter() {
                    self.write_bool(true)?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Encodes the LSB-first bit-packed `bits` at the indices of `ranges`,
    /// skipping positions marked null. With `invert`, each bit is
    /// complemented, so a presence stream can be encoded directly from a
    /// null mask.
    pub fn add_bits(
        &mut self,
        bits: &[u8],
        ranges: &Ranges,
        nulls: Option<&[u8]>,
        invert: bool,
    ) -> Result<u64> {
        let mut count = 0;
        match nulls {
            Some(nulls) => {
                for pos in ranges.iter() {
                    if !is_null(nulls, pos) {
                        self.write_bool(invert != is_set(bits, pos))?;
                        count += 1;
                    }
                }
            }
            None => {
                for pos in ranges.iter() {
                    self.write_bool(invert != is_set(bits, pos))?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// [`add_bits`](BooleanRleEncoder::add_bits) with callbacks instead of
    /// flat slices.
    pub fn add_bits_with<V, N>(
        &mut self,
        value_at: V,
        ranges: &Ranges,
        is_null_at: Option<N>,
        invert: bool,
    ) -> Result<u64>
    where
        V: Fn(usize) -> bool,
        N: Fn(usize) -> bool,
    {
        let mut count = 0;
        match is_null_at {
            Some(is_null_at) => {
                for pos in ranges.iter() {
                    if !is_null_at(pos) {
                        self.write_bool(invert != value_at(pos))?;
                        count += 1;
                    }
                }
            }
            None => {
                for pos in ranges.iter() {
                    self.write_bool(invert != value_at(pos))?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Bytes produced so far by the underlying byte encoder.
    pub fn buffer_size(&self) -> u64 {
        self.byte.buffer_size()
    }

    /// Emits the partially filled byte, if any (zero-padded in the low wire
    /// bits), then flushes the byte encoder.
    pub fn flush(&mut self) -> Result<u64> {
        if self.remaining_bits != 8 {
            self.write_current()?;
        }
        self.byte.flush()
    }

    /// Snapshots the byte encoder's positions, then the bit offset within
    /// the byte being accumulated.
    pub fn record_position(&self, recorder: &mut dyn PositionRecorder, stride: Option<usize>) {
        self.byte.record_position(recorder, stride);
        recorder.add((8 - self.remaining_bits) as u64, stride);
    }

    /// Surrenders the sink.
    pub fn into_inner(self) -> S {
        self.byte.into_inner()
    }

    #[inline]
    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.remaining_bits -= 1;
        self.current |= (value as u8) << self.remaining_bits;
        if self.remaining_bits == 0 {
            self.write_current()?;
        }
        Ok(())
    }

    fn write_current(&mut self) -> Result<()> {
        self.byte.write(self.current)?;
        self.remaining_bits = 8;
        self.current = 0;
        Ok(())
    }
}
