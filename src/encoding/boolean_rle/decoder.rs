use crate::bitmap::{count_non_nulls, scatter_bits};
use crate::encoding::ceil8;
use crate::error::Result;
use crate::position::PositionProvider;
use crate::stream::InputStream;

use super::super::byte_rle::ByteRleDecoder;

/// The inverse of [`BooleanRleEncoder`](super::BooleanRleEncoder), layered
/// over [`ByteRleDecoder`].
///
/// Output is LSB-first bit-packed: boolean `i` of a call lands at bit
/// `i % 8` of output byte `i / 8`. Bytes coming off the wire are
/// bit-reversed on ingest so leftover bits carry between calls at the LSB
/// end.
pub struct BooleanRleDecoder<S: InputStream> {
    byte: ByteRleDecoder<S>,
    /// Bits of `reversed_last_byte` not yet handed out, 0..=7.
    remaining_bits: u8,
    reversed_last_byte: u8,
    /// Deferred skip, in bits.
    pending_skip: u64,
}

impl<S: InputStream> BooleanRleDecoder<S> {
    pub fn new(input: S) -> Self {
        Self {
            byte: ByteRleDecoder::new(input),
            remaining_bits: 0,
            reversed_last_byte: 0,
            pending_skip: 0,
        }
    }

    /// Materializes `num_values` booleans, LSB-first bit-packed, into
    /// `data` (which must hold at least `ceil(num_values / 8)` bytes).
    /// Null positions come out cleared and consume no wire bits; unused
    /// high bits of the last byte are cleared.
    pub fn next(&mut self, data: &mut [u8], num_values: usize, nulls: Option<&[u8]>) -> Result<()> {
        self.skip_pending()?;

        let non_nulls = match nulls {
            Some(nulls) => count_non_nulls(nulls, 0, num_values),
            None => num_values,
        };

        let output_bytes = ceil8(num_values);
        if non_nulls == 0 {
            data[..output_bytes].fill(0);
            return Ok(());
        }

        if self.remaining_bits as usize >= non_nulls {
            // The carry-over from the last round covers this one; no new
            // wire bytes are needed. remaining_bits <= 8 so non_nulls < 8
            // and a single output byte suffices.
            data[0] = (self.reversed_last_byte >> (8 - self.remaining_bits))
                & (0xff >> (8 - non_nulls as u32));
            self.remaining_bits -= non_nulls as u8;
        } else {
            let carried_bits = self.remaining_bits as usize;
            let mut previous_byte = if carried_bits > 0 {
                self.reversed_last_byte >> (8 - carried_bits)
            } else {
                0
            };

            let bytes_read = ceil8(non_nulls - carried_bits);
            self.byte.next(&mut data[..bytes_read], None)?;
            for byte in data[..bytes_read].iter_mut() {
                *byte = byte.reverse_bits();
            }
            self.reversed_last_byte = data[bytes_read - 1];

            if carried_bits > 0 {
                // Shift the fresh bits up by the carry, feeding
                // `previous_byte` in at the LSB end. 64-bit chunks first,
                // bytes for the tail; the last byte of the tail may sit one
                // past the bytes just read, its stale bits fall beyond
                // `non_nulls` and are cleared below.
                let chunk_bytes = (non_nulls / 64) * 8;
                for chunk in data[..chunk_bytes].chunks_exact_mut(8) {
                    let word = u64::from_le_bytes(chunk[..].try_into().unwrap());
                    let shifted = previous_byte as u64 | (word << carried_bits);
                    chunk.copy_from_slice(&shifted.to_le_bytes());
                    previous_byte = (word >> (64 - carried_bits)) as u8;
                }
                for i in chunk_bytes..ceil8(non_nulls) {
                    let byte = data[i];
                    data[i] = previous_byte | (byte << carried_bits);
                    previous_byte = byte >> (8 - carried_bits);
                }
            }
            self.remaining_bits = (bytes_read * 8 + carried_bits - non_nulls) as u8;
        }

        if num_values > non_nulls {
            scatter_bits(non_nulls, num_values, data, nulls.unwrap());
        }

        data[output_bytes - 1] &= 0xff >> (output_bytes * 8 - num_values) as u32;
        Ok(())
    }

    /// Defers a logical skip of `num_values` booleans.
    pub fn skip(&mut self, num_values: u64) {
        self.pending_skip += num_values;
    }

    /// Repositions the decoder: the byte layer's coordinates first, then
    /// the bit offset within the resumed byte.
    pub fn seek_to_row_group(&mut self, positions: &mut PositionProvider) -> Result<()> {
        self.byte.seek_to_row_group(positions)?;
        let bit_offset = positions.next();
        if bit_offset > 8 {
            return Err(oos_err!(
                "bad bit offset {} seeking {}",
                bit_offset,
                self.byte.stream_name()
            ));
        }
        self.pending_skip = 8 * self.byte.take_pending_skip() + bit_offset;
        self.remaining_bits = 0;
        Ok(())
    }

    fn skip_pending(&mut self) -> Result<()> {
        let mut num_values = self.pending_skip;
        self.pending_skip = 0;
        if num_values <= self.remaining_bits as u64 {
            self.remaining_bits -= num_values as u8;
        } else {
            num_values -= self.remaining_bits as u64;
            self.remaining_bits = 0;
            self.byte.skip(num_values / 8);
            let bits_to_skip = (num_values % 8) as u8;
            if bits_to_skip > 0 {
                let mut byte = [0u8; 1];
                self.byte.next(&mut byte, None)?;
                self.reversed_last_byte = byte[0].reverse_bits();
                self.remaining_bits = 8 - bits_to_skip;
            } else {
                self.byte.skip_pending()?;
            }
        }
        Ok(())
    }
}
