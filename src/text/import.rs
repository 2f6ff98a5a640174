//! Text import: a line-by-line state machine that recovers from bad records.

use std::fmt;
use std::io::BufRead;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::core::{Customer, FaturaError, Invoice, Ledger, Product, is_valid_tax_id, parse_issue_date};

use super::product_line::parse_product_line;
use super::{
    CUSTOMER_LABEL, DATE_LABEL, INVOICE_NUMBER_LABEL, PRODUCT_LABEL, PRODUCTS_HEADER,
    RECORD_SEPARATOR,
};

/// Import settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Date used when a `Data:` line can't be parsed or is missing.
    /// `None` means today.
    pub fallback_date: Option<NaiveDate>,
}

impl ImportOptions {
    fn fallback_date(&self) -> NaiveDate {
        self.fallback_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// What the importer did about a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueAction {
    /// The line was not applied.
    Skipped,
    /// A replacement value was used.
    Substituted,
    /// Supplied values were ignored in favour of existing data.
    Ignored,
    /// A whole invoice record was dropped.
    Discarded,
}

impl fmt::Display for IssueAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skipped => "skipped",
            Self::Substituted => "substituted",
            Self::Ignored => "ignored",
            Self::Discarded => "discarded",
        })
    }
}

/// A recovered problem, tied to a 1-based input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    pub line: usize,
    pub action: IssueAction,
    pub message: String,
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line, self.message, self.action)
    }
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Numbers of the invoices added to the ledger, in input order.
    pub imported: Vec<u64>,
    /// Tax ids of customers registered during the import.
    pub customers_created: Vec<String>,
    pub issues: Vec<ImportIssue>,
}

impl ImportReport {
    /// No issues were reported.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug)]
struct PendingInvoice {
    id: u64,
    line: usize,
    issue_date: Option<NaiveDate>,
    customer: Option<Customer>,
    products: Vec<Product>,
}

struct Importer<'a> {
    ledger: &'a mut Ledger,
    options: &'a ImportOptions,
    current: Option<PendingInvoice>,
    last_line: usize,
    report: ImportReport,
}

impl<'a> Importer<'a> {
    fn new(ledger: &'a mut Ledger, options: &'a ImportOptions) -> Self {
        Self {
            ledger,
            options,
            current: None,
            last_line: 0,
            report: ImportReport::default(),
        }
    }

    fn issue(&mut self, line: usize, action: IssueAction, message: impl Into<String>) {
        let issue = ImportIssue {
            line,
            action,
            message: message.into(),
        };
        warn!(line, action = %action, "{}", issue.message);
        self.report.issues.push(issue);
    }

    fn feed(&mut self, line_no: usize, raw: &str) {
        self.last_line = line_no;
        let line = raw.trim();

        if line.is_empty() || line == PRODUCTS_HEADER || line == RECORD_SEPARATOR {
            return;
        }

        if let Some(value) = line.strip_prefix(INVOICE_NUMBER_LABEL) {
            self.finalize();
            self.open_invoice(line_no, value.trim());
        } else if let Some(value) = line.strip_prefix(DATE_LABEL) {
            self.date_line(line_no, value.trim());
        } else if let Some(value) = line.strip_prefix(CUSTOMER_LABEL) {
            self.customer_line(line_no, value.trim());
        } else if line.starts_with(PRODUCT_LABEL) {
            self.product_line(line_no, line);
        } else {
            self.issue(line_no, IssueAction::Skipped, format!("unrecognized line '{line}'"));
        }
    }

    fn undecodable_line(&mut self, line_no: usize) {
        self.last_line = line_no;
        self.issue(line_no, IssueAction::Skipped, "line is not valid UTF-8");
    }

    fn open_invoice(&mut self, line_no: usize, value: &str) {
        match value.parse::<u64>() {
            Ok(id) if value.bytes().all(|b| b.is_ascii_digit()) => {
                self.current = Some(PendingInvoice {
                    id,
                    line: line_no,
                    issue_date: None,
                    customer: None,
                    products: Vec::new(),
                });
            }
            _ => {
                self.current = None;
                self.issue(
                    line_no,
                    IssueAction::Skipped,
                    format!("malformed invoice number '{value}'"),
                );
            }
        }
    }

    fn outside_invoice(&mut self, line_no: usize, what: &str) -> bool {
        if self.current.is_none() {
            self.issue(
                line_no,
                IssueAction::Skipped,
                format!("{what} line outside an invoice record"),
            );
            return true;
        }
        false
    }

    fn date_line(&mut self, line_no: usize, value: &str) {
        if self.outside_invoice(line_no, "date") {
            return;
        }
        let date = match parse_issue_date(value) {
            Ok(date) => date,
            Err(_) => {
                let fallback = self.options.fallback_date();
                self.issue(
                    line_no,
                    IssueAction::Substituted,
                    format!("invalid date '{value}', using {}", fallback.format("%d/%m/%Y")),
                );
                fallback
            }
        };
        if let Some(pending) = self.current.as_mut() {
            pending.issue_date = Some(date);
        }
    }

    fn customer_line(&mut self, line_no: usize, value: &str) {
        if self.outside_invoice(line_no, "customer") {
            return;
        }
        let fields: Vec<&str> = value.split(',').map(str::trim).collect();
        let &[name, tax_id, region] = fields.as_slice() else {
            self.issue(
                line_no,
                IssueAction::Skipped,
                format!("customer line needs name, tax id and region, got {} fields", fields.len()),
            );
            return;
        };
        if !is_valid_tax_id(tax_id) {
            self.issue(
                line_no,
                IssueAction::Skipped,
                format!("invalid tax id '{tax_id}'"),
            );
            return;
        }

        let existing = self.ledger.find_customer(tax_id).cloned();
        let customer = match existing {
            Some(existing) => {
                self.issue(
                    line_no,
                    IssueAction::Ignored,
                    format!(
                        "customer {tax_id} already exists; name '{name}' and region '{region}' ignored"
                    ),
                );
                existing
            }
            None => match self.ledger.create_customer(name, tax_id, region).cloned() {
                Ok(created) => {
                    self.report.customers_created.push(created.tax_id.clone());
                    created
                }
                Err(e) => {
                    self.issue(line_no, IssueAction::Skipped, e.to_string());
                    return;
                }
            },
        };
        if let Some(pending) = self.current.as_mut() {
            pending.customer = Some(customer);
        }
    }

    fn product_line(&mut self, line_no: usize, line: &str) {
        if self.outside_invoice(line_no, "product") {
            return;
        }
        let product = parse_product_line(line).and_then(|b| self.ledger.issue_product(b));
        match product {
            Ok(product) => {
                if let Some(pending) = self.current.as_mut() {
                    pending.products.push(product);
                }
            }
            Err(e) => self.issue(line_no, IssueAction::Skipped, format!("product dropped: {e}")),
        }
    }

    /// Close the open invoice, if any, and store it in the ledger.
    fn finalize(&mut self) {
        let Some(pending) = self.current.take() else {
            return;
        };
        let line = pending.line;
        let id = pending.id;

        if self.ledger.contains_invoice(id) {
            self.issue(
                line,
                IssueAction::Discarded,
                format!("invoice {id} already exists"),
            );
            return;
        }
        let Some(customer) = pending.customer else {
            self.issue(line, IssueAction::Discarded, format!("invoice {id} has no customer"));
            return;
        };
        if pending.products.is_empty() {
            self.issue(line, IssueAction::Discarded, format!("invoice {id} has no products"));
            return;
        }
        let issue_date = match pending.issue_date {
            Some(date) => date,
            None => {
                let fallback = self.options.fallback_date();
                self.issue(
                    line,
                    IssueAction::Substituted,
                    format!("invoice {id} has no date, using {}", fallback.format("%d/%m/%Y")),
                );
                fallback
            }
        };

        let mut invoice = Invoice::new(id, customer, issue_date);
        let filled = pending
            .products
            .into_iter()
            .try_for_each(|p| invoice.add_product(p));
        match filled.and_then(|()| self.ledger.save_invoice(invoice)) {
            Ok(id) => self.report.imported.push(id),
            Err(e) => self.issue(line, IssueAction::Discarded, e.to_string()),
        }
    }

    fn finish(mut self) -> ImportReport {
        self.finalize();
        info!(
            lines = self.last_line,
            imported = self.report.imported.len(),
            customers_created = self.report.customers_created.len(),
            issues = self.report.issues.len(),
            "Text import finished"
        );
        self.report
    }
}

/// Import invoices from text into `ledger`.
///
/// Never fails as a whole: bad lines and records are skipped or patched and
/// listed in the report.
pub fn import_invoices(ledger: &mut Ledger, input: &str, options: &ImportOptions) -> ImportReport {
    let mut importer = Importer::new(ledger, options);
    for (idx, line) in input.lines().enumerate() {
        importer.feed(idx + 1, line);
    }
    importer.finish()
}

/// Like [`import_invoices`], reading from `reader`.
///
/// Lines that are not valid UTF-8 are skipped and reported like any other
/// bad line. A read error aborts the import; invoices finalized before it
/// stay in the ledger.
pub fn import_from_reader<R: BufRead>(
    ledger: &mut Ledger,
    mut reader: R,
    options: &ImportOptions,
) -> Result<ImportReport, FaturaError> {
    let mut importer = Importer::new(ledger, options);
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        match std::str::from_utf8(&buf) {
            Ok(line) => importer.feed(line_no, line),
            Err(_) => importer.undecodable_line(line_no),
        }
    }
    Ok(importer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LedgerConfig;

    fn options() -> ImportOptions {
        ImportOptions {
            fallback_date: NaiveDate::from_ymd_opt(2000, 1, 1),
        }
    }

    const RECORD: &str = "\
Número da Fatura: 3
Data: 15/06/2024
Cliente: Ana Silva, 123456789, Madeira
Produtos:
Tipo: Taxa Normal, Código: 9, Nome: Refrigerante, Descrição: Lata, Quantidade: 30, Valor Unitário Sem IVA: 1.00, Biológico: false
---
";

    #[test]
    fn imports_clean_record() {
        let mut ledger = Ledger::new(LedgerConfig::default());
        let report = import_invoices(&mut ledger, RECORD, &options());
        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(report.imported, [3]);
        assert_eq!(report.customers_created, ["123456789"]);
        let inv = ledger.invoice(3).unwrap();
        // fresh product code, not the exported 9
        assert_eq!(inv.products()[0].id, 1);
        assert_eq!(ledger.next_invoice_id(), 4);
    }

    #[test]
    fn bad_date_uses_fallback() {
        let input = RECORD.replace("15/06/2024", "31/02/2024");
        let mut ledger = Ledger::default();
        let report = import_invoices(&mut ledger, &input, &options());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line, 2);
        assert_eq!(report.issues[0].action, IssueAction::Substituted);
        assert_eq!(
            ledger.invoice(3).unwrap().issue_date,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
    }

    #[test]
    fn malformed_invoice_number_skips_record() {
        let input = RECORD.replace("Fatura: 3", "Fatura: três");
        let mut ledger = Ledger::default();
        let report = import_invoices(&mut ledger, &input, &options());
        assert!(report.imported.is_empty());
        assert_eq!(report.issues[0].line, 1);
        // date, customer and product lines fall outside any record
        assert_eq!(report.issues.len(), 4);
        assert!(ledger.customers().is_empty());
    }

    #[test]
    fn issue_display_names_line_and_action() {
        let issue = ImportIssue {
            line: 4,
            action: IssueAction::Skipped,
            message: "invalid tax id '12'".into(),
        };
        assert_eq!(issue.to_string(), "line 4: invalid tax id '12' (skipped)");
    }

    #[test]
    fn reader_import_matches_str_import() {
        let mut a = Ledger::default();
        let mut b = Ledger::default();
        let from_str = import_invoices(&mut a, RECORD, &options());
        let from_reader = import_from_reader(&mut b, RECORD.as_bytes(), &options()).unwrap();
        assert_eq!(from_str, from_reader);
        assert_eq!(a.invoices(), b.invoices());
    }

    #[test]
    fn reader_skips_undecodable_line() {
        // second product line with invalid bytes, before the separator
        let (head, tail) = RECORD.split_at(RECORD.find("---").unwrap());
        let input = [head.as_bytes(), &b"Tipo: \xff\xfe\n"[..], tail.as_bytes()].concat();

        let mut ledger = Ledger::default();
        let report = import_from_reader(&mut ledger, input.as_slice(), &options()).unwrap();
        assert_eq!(report.imported, [3]);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line, 6);
        assert_eq!(report.issues[0].action, IssueAction::Skipped);
        assert_eq!(ledger.invoice(3).unwrap().products().len(), 1);
    }

    #[test]
    fn existing_customer_always_reported() {
        let mut ledger = Ledger::default();
        ledger
            .create_customer("Ana Silva", "123456789", "Madeira")
            .unwrap();
        let report = import_invoices(&mut ledger, RECORD, &options());
        assert_eq!(report.imported, [3]);
        assert!(report.customers_created.is_empty());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].line, 3);
        assert_eq!(report.issues[0].action, IssueAction::Ignored);
    }
}
