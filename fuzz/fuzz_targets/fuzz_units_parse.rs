#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic. Errors are fine, panics are bugs.
        let Ok(mut price) = tarif::Price::of_minor(1850, "EUR") else {
            return;
        };
        if price.set_units(s).is_ok() {
            let _ = price.inclusive(false);
            let _ = price.inclusive(true);
            if let Ok(total) = price.base(false) {
                let _ = price.per_unit(&total);
            }
        }
    }
});
