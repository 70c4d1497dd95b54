#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate zipstore_core;

use zipstore_core::ArchiveSrc;

fuzz_target!(|data: &[u8]| {
    let mut src = data;
    if let Ok(entries) = src.entries() {
        let mut buf = [0; 512];
        for entry in entries.iter() {
            // Corrupt entries must fail cleanly rather than panic
            let _ = src.read_entry(entry, 0, &mut buf);
        }
    }
});
