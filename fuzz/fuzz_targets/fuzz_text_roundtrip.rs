#![no_main]

use fatura::core::Ledger;
use fatura::text::{ImportOptions, export_invoices, import_invoices};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Import → export → import must reproduce the same invoice count.
        let options = ImportOptions::default();
        let mut first = Ledger::default();
        import_invoices(&mut first, s, &options);
        if let Ok(text) = export_invoices(first.invoices()) {
            let mut second = Ledger::default();
            let report = import_invoices(&mut second, &text, &options);
            assert_eq!(report.imported.len(), first.invoices().len());
        }
    }
});
