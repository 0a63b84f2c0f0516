use crate::bitmap::is_null;
use crate::error::Result;
use crate::position::PositionRecorder;
use crate::ranges::Ranges;
use crate::stream::OutputStream;

use super::{MAXIMUM_REPEAT, MAX_LITERAL_SIZE, MINIMUM_REPEAT};

/// A run-length encoder of byte streams.
///
/// Bytes are staged in a literal buffer until either a run of
/// [`MINIMUM_REPEAT`] identical bytes forms at its tail, the buffer fills,
/// or the run reaches [`MAXIMUM_REPEAT`]; each of these emits one frame
/// into the owned sink. [`flush`](ByteRleEncoder::flush) drains the staged
/// state and returns the unused window to the sink.
pub struct ByteRleEncoder<S: OutputStream> {
    output: S,
    literals: [u8; MAX_LITERAL_SIZE],
    num_literals: usize,
    repeat: bool,
    tail_run_length: usize,
    buffer_position: usize,
    buffer_length: usize,
}

impl<S: OutputStream> ByteRleEncoder<S> {
    pub fn new(output: S) -> Self {
        Self {
            output,
            literals: [0; MAX_LITERAL_SIZE],
            num_literals: 0,
            repeat: false,
            tail_run_length: 0,
            buffer_position: 0,
            buffer_length: 0,
        }
    }

    /// Encodes the values of `data` at the indices of `ranges`, skipping
    /// positions marked null. Returns the number of values written.
    pub fn add(&mut self, data: &[u8], ranges: &Ranges, nulls: Option<&[u8]>) -> Result<u64> {
        let mut count = 0;
        match nulls {
            Some(nulls) => {
                for pos in ranges.iter() {
                    if !is_null(nulls, pos) {
                        self.write(data[pos])?;
                        count += 1;
                    }
                }
            }
            None => {
                for pos in ranges.iter() {
                    self.write(data[pos])?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// [`add`](ByteRleEncoder::add) with callbacks instead of flat slices.
    pub fn add_with<V, N>(
        &mut self,
        value_at: V,
        ranges: &Ranges,
        is_null_at: Option<N>,
    ) -> Result<u64>
    where
        V: Fn(usize) -> u8,
        N: Fn(usize) -> bool,
    {
        let mut count = 0;
        match is_null_at {
            Some(is_null_at) => {
                for pos in ranges.iter() {
                    if !is_null_at(pos) {
                        self.write(value_at(pos))?;
                        count += 1;
                    }
                }
            }
            None => {
                for pos in ranges.iter() {
                    self.write(value_at(pos))?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// Bytes produced so far. Until [`flush`](ByteRleEncoder::flush), the
    /// granted window counts in full.
    pub fn buffer_size(&self) -> u64 {
        self.output.size()
    }

    /// Emits any pending frame, returns the unused window to the sink and
    /// returns the cumulative number of bytes written. Idempotent on the
    /// returned count.
    pub fn flush(&mut self) -> Result<u64> {
        self.write_values()?;
        self.output.back_up(self.buffer_length - self.buffer_position);
        let size = self.output.flush()?;
        self.buffer_length = 0;
        self.buffer_position = 0;
        Ok(size)
    }

    /// Snapshots the sink's coordinates followed by the number of staged
    /// values. A decoder resumed at this position skips exactly the values
    /// that had not yet been emitted.
    pub fn record_position(&self, recorder: &mut dyn PositionRecorder, stride: Option<usize>) {
        self.output
            .record_position(recorder, self.buffer_length, self.buffer_position, stride);
        recorder.add(self.num_literals as u64, stride);
    }

    /// Surrenders the sink.
    pub fn into_inner(self) -> S {
        self.output
    }

    pub(crate) fn write(&mut self, value: u8) -> Result<()> {
        if self.num_literals == 0 {
            self.literals[0] = value;
            self.num_literals = 1;
            self.tail_run_length = 1;
        } else if self.repeat {
            if value == self.literals[0] {
                self.num_literals += 1;
                if self.num_literals == MAXIMUM_REPEAT {
                    self.write_values()?;
                }
            } else {
                self.write_values()?;
                self.literals[0] = value;
                self.num_literals = 1;
                self.tail_run_length = 1;
            }
        } else {
            if value == self.literals[self.num_literals - 1] {
                self.tail_run_length += 1;
            } else {
                self.tail_run_length = 1;
            }
            if self.tail_run_length == MINIMUM_REPEAT {
                // A run formed at the tail of the literal buffer. Emit the
                // literal prefix, if any, before seeding the run; the first
                // byte of the run stays out of the prefix.
                if self.num_literals + 1 > MINIMUM_REPEAT {
                    self.num_literals -= MINIMUM_REPEAT - 1;
                    self.write_values()?;
                    self.literals[0] = value;
                }
                self.repeat = true;
                self.num_literals = MINIMUM_REPEAT;
            } else {
                self.literals[self.num_literals] = value;
                self.num_literals += 1;
                if self.num_literals == MAX_LITERAL_SIZE {
                    self.write_values()?;
                }
            }
        }
        Ok(())
    }

    fn write_values(&mut self) -> Result<()> {
        if self.num_literals == 0 {
            return Ok(());
        }
        if self.repeat {
            self.write_byte((self.num_literals - MINIMUM_REPEAT) as u8)?;
            self.write_byte(self.literals[0])?;
        } else {
            self.write_byte((self.num_literals as u8).wrapping_neg())?;
            for i in 0..self.num_literals {
                self.write_byte(self.literals[i])?;
            }
        }
        self.repeat = false;
        self.tail_run_length = 0;
        self.num_literals = 0;
        Ok(())
    }

    #[inline]
    fn write_byte(&mut self, value: u8) -> Result<()> {
        if self.buffer_position == self.buffer_length {
            self.buffer_length = self.output.next()?;
            self.buffer_position = 0;
            if self.buffer_length == 0 {
                return Err(general_err!("allocation failure in output stream"));
            }
        }
        self.output.window()[self.buffer_position] = value;
        self.buffer_position += 1;
        Ok(())
    }
}
