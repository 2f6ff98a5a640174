use std::io::Write;

use crate::core::{FaturaError, Invoice, format_issue_date};

use super::{
    CUSTOMER_LABEL, DATE_LABEL, INVOICE_NUMBER_LABEL, PRODUCTS_HEADER, RECORD_SEPARATOR,
};

/// Render invoices in the text format, one record each, in the given order.
///
/// Fails if there is nothing to export.
pub fn export_invoices(invoices: &[Invoice]) -> Result<String, FaturaError> {
    if invoices.is_empty() {
        return Err(FaturaError::Validation("no invoices to export".into()));
    }

    let mut out = String::new();
    for invoice in invoices {
        write_record(&mut out, invoice);
    }
    Ok(out)
}

/// Like [`export_invoices`], writing to `writer`.
pub fn write_invoices<W: Write>(invoices: &[Invoice], mut writer: W) -> Result<(), FaturaError> {
    let text = export_invoices(invoices)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn write_record(out: &mut String, invoice: &Invoice) {
    let customer = &invoice.customer;
    push_line(out, &format!("{INVOICE_NUMBER_LABEL} {}", invoice.id));
    push_line(out, &format!("{DATE_LABEL} {}", format_issue_date(invoice.issue_date)));
    push_line(
        out,
        &format!(
            "{CUSTOMER_LABEL} {}, {}, {}",
            customer.name, customer.tax_id, customer.region
        ),
    );
    push_line(out, PRODUCTS_HEADER);
    for product in invoice.products() {
        push_line(out, &product.to_text());
    }
    push_line(out, RECORD_SEPARATOR);
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_set_is_an_error() {
        assert!(matches!(export_invoices(&[]), Err(FaturaError::Validation(_))));
    }

    #[test]
    fn record_layout() {
        let mut ids = IdSequence::new();
        let mut inv = Invoice::new(
            7,
            Customer::new("Ana Silva", "123456789", "Açores"),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        );
        inv.add_product(
            ProductBuilder::new("Refrigerante", ProductKind::NormalRateFood { organic: false })
                .description("Lata")
                .quantity(30)
                .unit_price(dec!(1.00))
                .build(&mut ids, &TaxConfig::default())
                .unwrap(),
        )
        .unwrap();

        let text = export_invoices(&[inv]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Número da Fatura: 7");
        assert_eq!(lines[1], "Data: 05/01/2024");
        assert_eq!(lines[2], "Cliente: Ana Silva, 123456789, Açores");
        assert_eq!(lines[3], "Produtos:");
        assert!(lines[4].starts_with("Tipo: Taxa Normal, Código: 1, "));
        assert_eq!(lines[5], "---");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn writer_receives_same_text() {
        let mut ids = IdSequence::new();
        let mut inv = Invoice::new(
            1,
            Customer::new("Rui Sousa", "987654321", "Madeira"),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        );
        inv.add_product(
            ProductBuilder::new("Brufen", ProductKind::PrescriptionPharmacy {
                doctor: "Rita".into(),
            })
            .quantity(1)
            .unit_price(dec!(2))
            .build(&mut ids, &TaxConfig::default())
            .unwrap(),
        )
        .unwrap();

        let mut buf = Vec::new();
        write_invoices(std::slice::from_ref(&inv), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), export_invoices(&[inv]).unwrap());
    }
}
