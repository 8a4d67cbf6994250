use lz4stream::*;
use std::io::{Cursor, Read, Write};
use test_harness::TestHarness;

fn compress_with(data: &[u8], config: &WriterConfig) -> Vec<u8> {
    let mut out = Vec::new();
    let mut writer = Lz4Writer::with_config(&mut out, config).unwrap();
    writer.append(data).unwrap();
    writer.close().unwrap();
    drop(writer);
    out
}

fn decompress_with(compressed: &[u8], config: &ReaderConfig) -> Vec<u8> {
    let mut reader = Lz4Reader::with_config(Cursor::new(compressed), config).unwrap();
    let mut out = Vec::new();
    while let Some(b) = reader.read_byte().unwrap() {
        out.push(b);
    }
    out
}

#[test]
fn ten_thousand_as_end_to_end() {
    // Purpose: The reference scenario. 10,000 'A' bytes through a 256-byte writer
    // buffer must come back byte for byte, followed by a clean end of stream.
    let data = vec![b'A'; 10_000];

    let mut sink = Vec::new();
    let mut writer =
        Lz4Writer::with_config(&mut sink, &WriterConfig::new().source_buffer_size(256)).unwrap();
    for b in &data {
        writer.append(std::slice::from_ref(b)).unwrap();
    }
    writer.close().unwrap();
    drop(writer);
    assert!(sink.len() < data.len());

    let mut reader = Lz4Reader::new(Cursor::new(sink)).unwrap();
    let mut count = 0usize;
    while let Some(b) = reader.read_byte().unwrap() {
        assert_eq!(b, b'A');
        count += 1;
    }
    assert_eq!(count, 10_000);
    assert_eq!(reader.read_byte().unwrap(), None);
}

#[test]
fn table_driven_roundtrips() {
    // Purpose: Round trip across sizes that sit on and around buffer multiples,
    // for several writer and reader buffer sizes.
    let mut h = TestHarness::new();
    let sizes = [0usize, 1, 255, 256, 257, 512, 4096, 70_000, 300_000];
    let writer_sizes = [1usize, 256, 4096];
    let reader_sizes = [(1usize, 1usize), (256, 256), (7, 4096), (65_536, 13)];

    for &len in &sizes {
        let data = if len % 2 == 0 { h.gen_text(len) } else { h.gen_noise(len) };
        for &ws in &writer_sizes {
            if ws == 1 && len > 4096 {
                continue;
            }
            let compressed = compress_with(&data, &WriterConfig::new().source_buffer_size(ws));
            for &(src, dst) in &reader_sizes {
                let cfg = ReaderConfig::new()
                    .source_buffer_size(src)
                    .destination_buffer_size(dst);
                assert_eq!(
                    decompress_with(&compressed, &cfg),
                    data,
                    "len={len} writer={ws} reader=({src},{dst})"
                );
            }
        }
    }
}

#[test]
fn empty_input_is_a_valid_frame() {
    let compressed = compress_with(b"", &WriterConfig::default());
    // Header (7 bytes, no optional fields) plus the 4-byte end mark.
    assert_eq!(compressed.len(), 11);
    assert!(decompress_with(&compressed, &ReaderConfig::default()).is_empty());
}

#[test]
fn chunking_only_changes_the_compressed_bytes() {
    // Purpose: How bytes are pushed (and flushed) changes framing, never content.
    let mut h = TestHarness::new();
    let data = h.gen_text(20_000);

    let whole = compress_with(&data, &WriterConfig::default());

    let mut pieces = Vec::new();
    {
        let mut writer = Lz4Writer::new(&mut pieces).unwrap();
        for (i, b) in data.iter().enumerate() {
            writer.append(&[*b]).unwrap();
            if i % 1000 == 999 {
                writer.flush().unwrap();
            }
        }
        writer.close().unwrap();
    }

    assert_ne!(whole, pieces);
    assert_eq!(decompress_with(&whole, &ReaderConfig::default()), data);
    assert_eq!(decompress_with(&pieces, &ReaderConfig::default()), data);
}

#[test]
fn idempotent_close_produces_identical_output() {
    let data = b"close me once, close me twice".repeat(30);

    let mut once = Vec::new();
    {
        let mut w = Lz4Writer::new(&mut once).unwrap();
        w.append(&data).unwrap();
        w.close().unwrap();
    }

    let mut twice = Vec::new();
    {
        let mut w = Lz4Writer::new(&mut twice).unwrap();
        w.append(&data).unwrap();
        w.close().unwrap();
        w.close().unwrap();
    }

    assert_eq!(once, twice);
}

#[test]
fn implicit_close_matches_explicit_close() {
    let data = b"dropped without ceremony".repeat(50);

    let explicit = compress_with(&data, &WriterConfig::default());
    let mut implicit = Vec::new();
    {
        let mut w = Lz4Writer::new(&mut implicit).unwrap();
        w.append(&data).unwrap();
    }
    assert_eq!(explicit, implicit);
}

#[test]
fn empty_flushes_keep_the_frame_valid() {
    // Purpose: Flushing with nothing buffered, at any point, never breaks the frame.
    let mut out = Vec::new();
    {
        let mut w = Lz4Writer::new(&mut out).unwrap();
        w.flush().unwrap();
        w.flush().unwrap();
        w.append(b"between flushes").unwrap();
        w.flush().unwrap();
        w.flush().unwrap();
        w.append(&[b'x'; 256]).unwrap();
        assert_eq!(w.buffered(), 0);
        w.flush().unwrap();
        w.close().unwrap();
    }
    let mut expected = b"between flushes".to_vec();
    expected.extend_from_slice(&[b'x'; 256]);
    assert_eq!(decompress_with(&out, &ReaderConfig::default()), expected);
}

#[test]
fn flushed_prefix_is_decodable_before_close() {
    // Purpose: After flush(), everything appended so far can be decoded even though
    // the frame is still open.
    let mut out = Vec::new();
    let mut w = Lz4Writer::new(&mut out).unwrap();
    w.append(b"visible now").unwrap();
    w.flush().unwrap();

    let snapshot = w.get_ref().to_vec();
    let mut reader = Lz4Reader::new(Cursor::new(snapshot)).unwrap();
    let mut got = Vec::new();
    for _ in 0..11 {
        got.push(reader.read_byte().unwrap().unwrap());
    }
    assert_eq!(got, b"visible now");
    // The frame has no footer yet.
    assert!(matches!(reader.read_byte(), Err(Error::CodecRead { .. })));
    w.close().unwrap();
}

#[test]
fn file_backed_roundtrip_with_preferences() {
    let mut h = TestHarness::new();
    let data = h.gen_text(200_000);
    let prefs = FramePreferences::new()
        .level(9)
        .block_size(BlockSize::Max256KB)
        .block_mode(BlockMode::Independent)
        .content_checksum(true)
        .block_checksum(true);
    {
        let mut w = h.writer(&WriterConfig::new().source_buffer_size(8192).preferences(prefs));
        w.write_all(&data).unwrap();
        w.close().unwrap();
    }
    assert!(h.compressed().len() < data.len());

    let mut r = h.reader(&ReaderConfig::new().source_buffer_size(4096).destination_buffer_size(4096));
    let mut out = Vec::new();
    r.read_to_end(&mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn auto_flush_emits_output_on_every_overflow() {
    let prefs = FramePreferences::new().auto_flush(true);
    let mut out = Vec::new();
    let mut w =
        Lz4Writer::with_config(&mut out, &WriterConfig::new().source_buffer_size(64).preferences(prefs))
            .unwrap();
    let header = w.total_out();
    w.append(&[3u8; 64]).unwrap();
    assert!(w.total_out() > header);
    w.close().unwrap();
}

#[test]
fn frames_interoperate_with_the_lz4_crate() {
    // Purpose: The wire format is the codec's native frame format, readable and
    // writable by other LZ4 frame implementations.
    let data = b"interop interop interop ".repeat(500);

    let ours = compress_with(&data, &WriterConfig::default());
    let mut decoded = Vec::new();
    lz4::Decoder::new(Cursor::new(ours))
        .unwrap()
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, data);

    let mut encoder = lz4::EncoderBuilder::new().level(4).build(Vec::new()).unwrap();
    encoder.write_all(&data).unwrap();
    let (theirs, result) = encoder.finish();
    result.unwrap();
    assert_eq!(decompress_with(&theirs, &ReaderConfig::default()), data);
}
