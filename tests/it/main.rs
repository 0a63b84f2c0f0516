mod byte_rle;

use dwrf_rle::stream::{MemoryInputStream, MemoryOutputStream};

pub fn sink() -> MemoryOutputStream {
    MemoryOutputStream::new(256)
}

pub fn source(wire: Vec<u8>, block_size: usize) -> MemoryInputStream {
    MemoryInputStream::new(wire, block_size, "it")
}
