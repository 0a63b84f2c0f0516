use crate::error::Result;
use crate::position::PositionRecorder;

/// A buffer-granting byte sink.
///
/// The writer asks for a window with [`next`](OutputStream::next), fills it
/// through [`window`](OutputStream::window), and returns the unused tail
/// with [`back_up`](OutputStream::back_up) before
/// [`flush`](OutputStream::flush). A window is exclusively held between
/// `next` calls; the writer never writes past it.
pub trait OutputStream {
    /// Rotates the stream to a fresh writable window and returns its
    /// capacity. Fails when the stream cannot allocate more space.
    fn next(&mut self) -> Result<usize>;

    /// The window granted by the last call to [`next`](OutputStream::next).
    fn window(&mut self) -> &mut [u8];

    /// Unwrites the last `count` bytes of the granted window.
    fn back_up(&mut self, count: usize);

    /// Completes the stream, returning the total number of bytes written.
    fn flush(&mut self) -> Result<u64>;

    /// Bytes produced so far. The granted window counts in full until it is
    /// backed up.
    fn size(&self) -> u64;

    /// Appends this stream's resumable coordinates to `recorder`:
    /// `window_len` and `used` locate the writer's cursor within the
    /// granted window.
    fn record_position(
        &self,
        recorder: &mut dyn PositionRecorder,
        window_len: usize,
        used: usize,
        stride: Option<usize>,
    );
}

/// An [`OutputStream`] over a growable in-memory buffer. Windows are
/// granted `chunk_size` bytes at a time.
#[derive(Debug)]
pub struct MemoryOutputStream {
    data: Vec<u8>,
    window_start: usize,
    chunk_size: usize,
}

impl MemoryOutputStream {
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0);
        Self {
            data: vec![],
            window_start: 0,
            chunk_size,
        }
    }

    /// The bytes written so far, including the granted window up to its
    /// backed-up end.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Surrenders the underlying buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl OutputStream for MemoryOutputStream {
    fn next(&mut self) -> Result<usize> {
        self.window_start = self.data.len();
        self.data.resize(self.window_start + self.chunk_size, 0);
        Ok(self.chunk_size)
    }

    fn window(&mut self) -> &mut [u8] {
        &mut self.data[self.window_start..]
    }

    fn back_up(&mut self, count: usize) {
        debug_assert!(count <= self.data.len() - self.window_start);
        let len = self.data.len() - count;
        self.data.truncate(len);
    }

    fn flush(&mut self) -> Result<u64> {
        self.window_start = self.data.len();
        Ok(self.data.len() as u64)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn record_position(
        &self,
        recorder: &mut dyn PositionRecorder,
        window_len: usize,
        used: usize,
        stride: Option<usize>,
    ) {
        recorder.add((self.data.len() - (window_len - used)) as u64, stride);
    }
}
