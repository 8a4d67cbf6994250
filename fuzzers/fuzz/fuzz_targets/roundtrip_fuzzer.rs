#![no_main]
use libfuzzer_sys::fuzz_target;
use lz4stream::{Lz4Reader, Lz4Writer, WriterConfig};
use std::io::{Cursor, Read};

fuzz_target!(|data: &[u8]| {
    // The first byte picks the writer buffer size.
    let (size, payload) = match data.split_first() {
        Some((&size, rest)) => (size as usize + 1, rest),
        None => return,
    };
    let mut compressed = Vec::new();
    {
        let cfg = WriterConfig::new().source_buffer_size(size);
        let mut writer = Lz4Writer::with_config(&mut compressed, &cfg).unwrap();
        writer.append(payload).unwrap();
        writer.close().unwrap();
    }
    let mut reader = Lz4Reader::new(Cursor::new(compressed)).unwrap();
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, payload);
});
