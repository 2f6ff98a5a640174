#![no_main]

use fatura::core::Ledger;
use fatura::text::{ImportOptions, import_invoices};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Bad input must only ever produce report entries, never a panic.
        let mut ledger = Ledger::default();
        let _ = import_invoices(&mut ledger, s, &ImportOptions::default());
    }
});
