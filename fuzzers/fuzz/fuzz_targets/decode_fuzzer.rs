#![no_main]
use libfuzzer_sys::fuzz_target;
use lz4stream::{Lz4Reader, ReaderConfig};
use std::io::{Cursor, Read};

fuzz_target!(|data: &[u8]| {
    let cfg = ReaderConfig::new()
        .source_buffer_size(64)
        .destination_buffer_size(64);
    if let Ok(mut reader) = Lz4Reader::with_config(Cursor::new(data), &cfg) {
        let mut sink = Vec::new();
        let _ = reader.read_to_end(&mut sink);
    }
});
