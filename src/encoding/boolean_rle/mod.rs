//! Run-length encoding of boolean streams.
//!
//! Booleans are packed eight to a byte and pushed through the byte codec
//! of [`byte_rle`](super::byte_rle). The wire packs MSB-first: boolean `i`
//! lands at bit `7 - (i % 8)` of its byte. All in-memory bitmaps (encoder
//! input to [`add_bits`](BooleanRleEncoder::add_bits), decoder output, and
//! null masks) are LSB-first; the decoder reverses each wire byte on
//! ingest so leftover bits can be carried and shifted LSB-first between
//! calls.
mod decoder;
mod encoder;

pub use decoder::BooleanRleDecoder;
pub use encoder::BooleanRleEncoder;
