#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let Ok(mut price) = tarif::Price::of_minor(1000, "EUR") else {
            return;
        };
        if price.set_vat(s).is_ok() {
            let _ = price.vat().money(false);
            let _ = price.inclusive(false);
        }
    }
});
