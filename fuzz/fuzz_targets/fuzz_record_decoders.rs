#![no_main]

use chromcache::prelude::*;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // First byte picks the revision, the rest is the record stream
    let Some((&selector, stream)) = data.split_first() else {
        return;
    };
    let version = CacheFormatVersion::new(1 + (selector as u32 % CacheFormatVersion::CURRENT.get()));

    // Every decoder must either succeed or fail gracefully - never panic
    let header_count = stream.len() / header_struct_size(version);
    let mut reader = CacheReader::new(Cursor::new(stream));
    if let Ok(headers) = reader.read_headers(version, 0, header_count) {
        for header in headers {
            let _ = header.uncompressed_size();
            let _ = header.precursor_mz();
            let _ = header.excludes_time(0.0);
        }
    }

    let peak_count = stream.len() / peak_struct_size(version);
    let mut reader = CacheReader::with_config(
        Cursor::new(stream),
        DecodeConfig::default().with_alignment(PadAlignment::Start),
    );
    let _ = reader.read_peaks(version, 0, peak_count);

    let _ = StructuralFlags::from_legacy_bits(selector as u16 * 257).to_legacy_bits();
});
