use crate::bitmap::is_null;
use crate::error::Result;
use crate::position::PositionProvider;
use crate::stream::InputStream;

use super::MINIMUM_REPEAT;

/// The inverse of [`ByteRleEncoder`](super::ByteRleEncoder): materializes
/// frames from an owned source into caller buffers.
///
/// Skips are deferred and applied lazily before the next materialization or
/// after a seek, walking frames without touching payload bytes of runs.
pub struct ByteRleDecoder<S: InputStream> {
    input: S,
    remaining_values: u64,
    value: u8,
    repeating: bool,
    buffer_position: usize,
    buffer_length: usize,
    pending_skip: u64,
}

impl<S: InputStream> ByteRleDecoder<S> {
    pub fn new(input: S) -> Self {
        Self {
            input,
            remaining_values: 0,
            value: 0,
            repeating: false,
            buffer_position: 0,
            buffer_length: 0,
            pending_skip: 0,
        }
    }

    /// Materializes `data.len()` values into `data`. Positions whose null
    /// bit is set are left untouched and consume no source bytes.
    pub fn next(&mut self, data: &mut [u8], nulls: Option<&[u8]>) -> Result<()> {
        self.skip_pending()?;

        let num_values = data.len();
        let mut position = 0;
        if let Some(nulls) = nulls {
            while position < num_values && is_null(nulls, position) {
                position += 1;
            }
        }

        while position < num_values {
            if self.remaining_values == 0 {
                self.read_header()?;
            }
            let count = (num_values - position).min(self.remaining_values as usize);
            let consumed = if self.repeating {
                match nulls {
                    Some(nulls) => {
                        let mut consumed = 0;
                        for i in position..position + count {
                            if !is_null(nulls, i) {
                                data[i] = self.value;
                                consumed += 1;
                            }
                        }
                        consumed
                    }
                    None => {
                        data[position..position + count].fill(self.value);
                        count
                    }
                }
            } else {
                match nulls {
                    Some(nulls) => {
                        let mut consumed = 0;
                        for i in position..position + count {
                            if !is_null(nulls, i) {
                                data[i] = self.read_byte()?;
                                consumed += 1;
                            }
                        }
                        consumed
                    }
                    None => {
                        let mut copied = 0;
                        while copied < count {
                            if self.buffer_position == self.buffer_length {
                                self.next_buffer()?;
                            }
                            let copy =
                                (count - copied).min(self.buffer_length - self.buffer_position);
                            let window = self.input.window();
                            data[position + copied..position + copied + copy].copy_from_slice(
                                &window[self.buffer_position..self.buffer_position + copy],
                            );
                            self.buffer_position += copy;
                            copied += copy;
                        }
                        count
                    }
                }
            };
            self.remaining_values -= consumed as u64;
            position += count;
            if let Some(nulls) = nulls {
                while position < num_values && is_null(nulls, position) {
                    position += 1;
                }
            }
        }
        Ok(())
    }

    /// Defers a logical skip of `num_values` values.
    pub fn skip(&mut self, num_values: u64) {
        self.pending_skip += num_values;
    }

    /// Repositions the decoder: seeks the source, invalidates the granted
    /// window, and defers the provider's next integer as a skip.
    pub fn seek_to_row_group(&mut self, positions: &mut PositionProvider) -> Result<()> {
        self.input.seek(positions)?;
        self.buffer_position = 0;
        self.buffer_length = 0;
        self.remaining_values = 0;
        self.pending_skip = positions.next();
        Ok(())
    }

    pub(crate) fn skip_pending(&mut self) -> Result<()> {
        let mut num_values = self.pending_skip;
        self.pending_skip = 0;
        while num_values > 0 {
            if self.remaining_values == 0 {
                self.read_header()?;
            }
            let count = num_values.min(self.remaining_values);
            self.remaining_values -= count;
            num_values -= count;
            if !self.repeating {
                self.skip_bytes(count)?;
            }
        }
        Ok(())
    }

    pub(crate) fn take_pending_skip(&mut self) -> u64 {
        std::mem::take(&mut self.pending_skip)
    }

    pub(crate) fn stream_name(&self) -> &str {
        self.input.name()
    }

    fn read_header(&mut self) -> Result<()> {
        let header = self.read_byte()? as i8;
        if header < 0 {
            self.remaining_values = -(header as i64) as u64;
            self.repeating = false;
        } else {
            self.remaining_values = header as u64 + MINIMUM_REPEAT as u64;
            self.repeating = true;
            self.value = self.read_byte()?;
        }
        Ok(())
    }

    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        if self.buffer_position == self.buffer_length {
            self.next_buffer()?;
        }
        let value = self.input.window()[self.buffer_position];
        self.buffer_position += 1;
        Ok(value)
    }

    fn next_buffer(&mut self) -> Result<()> {
        self.buffer_length = self.input.next()?;
        self.buffer_position = 0;
        Ok(())
    }

    fn skip_bytes(&mut self, count: u64) -> Result<()> {
        let mut count = count;
        if self.buffer_position < self.buffer_length {
            let skip = (count as usize).min(self.buffer_length - self.buffer_position);
            self.buffer_position += skip;
            count -= skip as u64;
        }
        if count > 0 {
            self.input.skip(count)?;
        }
        Ok(())
    }
}
