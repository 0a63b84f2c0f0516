//! Position recording and replay.
//!
//! Encoders push their resumable coordinates into a [`PositionRecorder`];
//! decoders consume them back, in the same order, from a
//! [`PositionProvider`] on [`seek_to_row_group`](crate::encoding::byte_rle::ByteRleDecoder::seek_to_row_group).
//! The number of integers each layer records and consumes is part of the
//! contract with the enclosing container: one for the in-memory streams,
//! plus one (staged value count) for the byte codec, plus one (bit offset)
//! for the boolean codec.

/// An append-only sink of stream positions, tagged by an optional stride
/// (row-group) index.
pub trait PositionRecorder {
    fn add(&mut self, value: u64, stride: Option<usize>);
}

/// A flat list of recorded positions. This is the recorder used when a
/// single emission point is snapshotted; index structures that keep one
/// entry set per stride can implement [`PositionRecorder`] themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Positions {
    positions: Vec<u64>,
}

impl Positions {
    pub fn as_slice(&self) -> &[u64] {
        &self.positions
    }

    /// A cursor over the recorded positions.
    pub fn provider(&self) -> PositionProvider {
        PositionProvider::new(&self.positions)
    }
}

impl PositionRecorder for Positions {
    fn add(&mut self, value: u64, _stride: Option<usize>) {
        self.positions.push(value);
    }
}

/// A stateful cursor yielding a recorded sequence of non-negative integers
/// in order. Callers must supply at least as many integers as the seek
/// consumes.
#[derive(Debug)]
pub struct PositionProvider<'a> {
    positions: &'a [u64],
    index: usize,
}

impl<'a> PositionProvider<'a> {
    pub fn new(positions: &'a [u64]) -> Self {
        Self {
            positions,
            index: 0,
        }
    }

    /// The next integer of the sequence.
    pub fn next(&mut self) -> u64 {
        let value = self.positions[self.index];
        self.index += 1;
        value
    }
}
