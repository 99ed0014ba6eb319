#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(price) = tarif::Price::from_json(s) {
            let _ = price.to_json();
        }
    }
});
