#![no_main]

use fatura::core::{IdSequence, TaxConfig};
use fatura::text::parse_product_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(builder) = parse_product_line(s) {
            let _ = builder.build(&mut IdSequence::new(), &TaxConfig::default());
        }
    }
});
