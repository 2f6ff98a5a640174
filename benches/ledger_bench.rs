use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use fatura::core::*;
use fatura::text;

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn customer_tax_id(n: u64) -> String {
    format!("{:09}", 100_000_000 + n)
}

/// 100 customers across the three regions, one 10-product invoice each.
fn build_ledger() -> Ledger {
    let mut ledger = Ledger::with_default_catalog(LedgerConfig::default()).unwrap();
    let regions = ["Continente", "Madeira", "Açores"];

    for n in 1..=100u64 {
        let tax_id = customer_tax_id(n);
        ledger
            .create_customer("Cliente Exemplo", &tax_id, regions[(n % 3) as usize])
            .unwrap();

        let mut invoice = ledger.draft_invoice(&tax_id, test_date()).unwrap();
        for i in 0..10u32 {
            let kind = match i % 5 {
                0 => ProductKind::ReducedRateFood {
                    organic: i % 2 == 0,
                    certifications: vec!["ISO22000".into(), "HACCP".into()],
                },
                1 => ProductKind::IntermediateRateFood {
                    organic: false,
                    category: "vinho".into(),
                },
                2 => ProductKind::NormalRateFood { organic: true },
                3 => ProductKind::PrescriptionPharmacy {
                    doctor: "Rita".into(),
                },
                _ => ProductKind::NonPrescriptionPharmacy {
                    category: "animais".into(),
                },
            };
            let product = ledger
                .issue_product(
                    ProductBuilder::new(format!("Produto {i}"), kind)
                        .description("Artigo de teste")
                        .quantity(i + 1)
                        .unit_price(dec!(9.99)),
                )
                .unwrap();
            invoice.add_product(product).unwrap();
        }
        ledger.save_invoice(invoice).unwrap();
    }
    ledger
}

fn bench_statistics(c: &mut Criterion) {
    let ledger = build_ledger();
    c.bench_function("ledger_statistics_100_invoices", |b| {
        b.iter(|| black_box(black_box(&ledger).statistics()));
    });
}

fn bench_invoice_breakdown(c: &mut Criterion) {
    let ledger = build_ledger();
    c.bench_function("invoice_breakdown_10_products", |b| {
        b.iter(|| black_box(black_box(&ledger).invoice_breakdown(black_box(50))));
    });
}

fn bench_text_export(c: &mut Criterion) {
    let ledger = build_ledger();
    c.bench_function("text_export_100_invoices", |b| {
        b.iter(|| black_box(text::export_invoices(black_box(ledger.invoices()))));
    });
}

fn bench_text_import(c: &mut Criterion) {
    let exported = text::export_invoices(build_ledger().invoices()).unwrap();
    let options = text::ImportOptions::default();
    c.bench_function("text_import_100_invoices", |b| {
        b.iter(|| {
            let mut ledger = Ledger::default();
            black_box(text::import_invoices(
                &mut ledger,
                black_box(&exported),
                &options,
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_statistics,
    bench_invoice_breakdown,
    bench_text_export,
    bench_text_import,
);
criterion_main!(benches);
