//! The single-line product encoding (`Tipo: ..., Código: ..., ...`).

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::core::{FaturaError, Product, ProductBuilder, ProductKind};

use super::PRODUCT_LABEL;

const CODE: &str = "Código";
const NAME: &str = "Nome";
const DESCRIPTION: &str = "Descrição";
const QUANTITY: &str = "Quantidade";
const UNIT_PRICE: &str = "Valor Unitário Sem IVA";
const ORGANIC: &str = "Biológico";
const CERTIFICATIONS: &str = "Certificações";
const CATEGORY: &str = "Categoria";
const DOCTOR: &str = "Médico";
/// Trailing rate list written by older exports; ignored on import.
const RATES: &str = "Taxas";

const COMMON_FIELDS: [&str; 5] = [CODE, NAME, DESCRIPTION, QUANTITY, UNIT_PRICE];

impl Product {
    /// Canonical one-line text encoding: type tag, common fields, then the
    /// kind-specific fields in fixed order.
    pub fn to_text(&self) -> String {
        let mut line = format!(
            "{PRODUCT_LABEL} {}, {CODE}: {}, {NAME}: {}, {DESCRIPTION}: {}, {QUANTITY}: {}, {UNIT_PRICE}: {}",
            self.kind.tag(),
            self.id,
            self.name,
            self.description,
            self.quantity,
            self.unit_price,
        );
        let extra = match &self.kind {
            ProductKind::ReducedRateFood {
                organic,
                certifications,
            } => format!(
                ", {ORGANIC}: {organic}, {CERTIFICATIONS}: {}",
                certifications.join(",")
            ),
            ProductKind::IntermediateRateFood { organic, category } => {
                format!(", {ORGANIC}: {organic}, {CATEGORY}: {category}")
            }
            ProductKind::NormalRateFood { organic } => format!(", {ORGANIC}: {organic}"),
            ProductKind::PrescriptionPharmacy { doctor } => format!(", {DOCTOR}: {doctor}"),
            ProductKind::NonPrescriptionPharmacy { category } => format!(", {CATEGORY}: {category}"),
        };
        line.push_str(&extra);
        line
    }
}

/// Parse a `Tipo: ...` product line into a builder.
///
/// The builder carries no code: the `Código` field is checked but a fresh
/// code is assigned when the builder is built, and the rate table is the
/// configured default for the kind.
pub fn parse_product_line(line: &str) -> Result<ProductBuilder, FaturaError> {
    let body = line
        .trim()
        .strip_prefix(PRODUCT_LABEL)
        .ok_or_else(|| FaturaError::Format(format!("product line must start with '{PRODUCT_LABEL}'")))?;

    let (tag, _) = body
        .split_once(&format!(", {CODE}:"))
        .ok_or_else(|| FaturaError::Format(format!("missing field '{CODE}'")))?;
    let tag = tag.trim();

    let specific: &[&str] = match tag.to_lowercase().as_str() {
        "taxa reduzida" => &[ORGANIC, CERTIFICATIONS],
        "taxa intermédia" => &[ORGANIC, CATEGORY],
        "taxa normal" => &[ORGANIC],
        "farmácia com prescrição" => &[DOCTOR],
        "farmácia sem prescrição" => &[CATEGORY],
        _ => return Err(FaturaError::Format(format!("unknown product type '{tag}'"))),
    };
    let labels: Vec<&str> = COMMON_FIELDS.iter().chain(specific).copied().collect();
    let values = split_fields(body, &labels)?;

    // values[0] is the tag
    parse_code(values[1])?;
    let name = values[2];
    let description = values[3];
    let quantity: u32 = values[4]
        .parse()
        .map_err(|_| field_error(QUANTITY, values[4]))?;
    let unit_price = parse_decimal(values[5]).ok_or_else(|| field_error(UNIT_PRICE, values[5]))?;

    let kind = match (specific, &values[6..]) {
        ([ORGANIC, CERTIFICATIONS], [organic, certs]) => ProductKind::ReducedRateFood {
            organic: parse_bool(organic)?,
            certifications: certs
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect(),
        },
        ([ORGANIC, CATEGORY], [organic, category]) => ProductKind::IntermediateRateFood {
            organic: parse_bool(organic)?,
            category: category.to_string(),
        },
        ([ORGANIC], [organic]) => ProductKind::NormalRateFood {
            organic: parse_bool(organic)?,
        },
        ([DOCTOR], [doctor]) => ProductKind::PrescriptionPharmacy {
            doctor: doctor.to_string(),
        },
        ([CATEGORY], [category]) => ProductKind::NonPrescriptionPharmacy {
            category: category.to_string(),
        },
        _ => return Err(FaturaError::Format(format!("field mismatch for '{tag}'"))),
    };

    Ok(ProductBuilder::new(name, kind)
        .description(description)
        .quantity(quantity)
        .unit_price(unit_price))
}

/// Cut `body` at each `, <label>:` in sequence. Returns the leading value
/// followed by one trimmed value per label.
///
/// Matching labels in order lets the last fields contain commas
/// (certification lists). A trailing `Taxas:` field is dropped.
fn split_fields<'a>(body: &'a str, labels: &[&str]) -> Result<Vec<&'a str>, FaturaError> {
    let mut values = Vec::with_capacity(labels.len() + 1);
    let mut rest = body;
    for label in labels {
        let marker = format!(", {label}:");
        let pos = rest
            .find(&marker)
            .ok_or_else(|| FaturaError::Format(format!("missing field '{label}'")))?;
        values.push(rest[..pos].trim());
        rest = &rest[pos + marker.len()..];
    }
    let last = match rest.find(&format!(", {RATES}:")) {
        Some(pos) => &rest[..pos],
        None => rest,
    };
    values.push(last.trim());
    Ok(values)
}

fn parse_code(value: &str) -> Result<u64, FaturaError> {
    value.parse().map_err(|_| field_error(CODE, value))
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

fn parse_bool(value: &str) -> Result<bool, FaturaError> {
    match value.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(field_error(ORGANIC, value)),
    }
}

fn field_error(label: &str, value: &str) -> FaturaError {
    FaturaError::Format(format!("invalid value '{value}' for '{label}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IdSequence, TaxConfig};
    use rust_decimal_macros::dec;

    fn build(line: &str) -> Product {
        parse_product_line(line)
            .unwrap()
            .build(&mut IdSequence::starting_at(100), &TaxConfig::default())
            .unwrap()
    }

    #[test]
    fn reduced_rate_with_certification_list() {
        let p = build(
            "Tipo: Taxa Reduzida, Código: 1, Nome: Maçã, Descrição: Bio, Quantidade: 10, \
             Valor Unitário Sem IVA: 1.20, Biológico: true, Certificações: ISO22000,HACCP",
        );
        assert_eq!(p.id, 100);
        assert_eq!(p.name, "Maçã");
        assert_eq!(p.quantity, 10);
        assert_eq!(p.unit_price, dec!(1.20));
        assert_eq!(
            p.kind,
            ProductKind::ReducedRateFood {
                organic: true,
                certifications: vec!["ISO22000".into(), "HACCP".into()],
            }
        );
        assert_eq!(p.rates, TaxConfig::default().reduced_food);
    }

    #[test]
    fn trailing_rates_ignored() {
        let p = build(
            "Tipo: Farmácia Sem Prescrição, Código: 5, Nome: Mucus, Descrição: 50g, \
             Quantidade: 5, Valor Unitário Sem IVA: 1.5, Categoria: animais, Taxas: [23.0, 23.0, 23.0]",
        );
        assert_eq!(
            p.kind,
            ProductKind::NonPrescriptionPharmacy {
                category: "animais".into()
            }
        );
    }

    #[test]
    fn tag_is_case_insensitive() {
        let p = build(
            "Tipo: TAXA NORMAL, Código: 3, Nome: Refri, Descrição: Lata, Quantidade: 1, \
             Valor Unitário Sem IVA: 1, Biológico: FALSE",
        );
        assert_eq!(p.kind, ProductKind::NormalRateFood { organic: false });
    }

    #[test]
    fn text_encoding_reparses() {
        let original = build(
            "Tipo: Taxa Intermédia, Código: 2, Nome: Vinho Tinto, Descrição: Caixa de 5 litros, \
             Quantidade: 5, Valor Unitário Sem IVA: 10.00, Biológico: false, Categoria: vinho",
        );
        let again = build(&original.to_text());
        assert_eq!(again.name, original.name);
        assert_eq!(again.description, original.description);
        assert_eq!(again.kind, original.kind);
        assert_eq!(again.unit_price, original.unit_price);
    }

    #[test]
    fn rejects_bad_lines() {
        for line in [
            "Tipo: Taxa Especial, Código: 1, Nome: X, Descrição: Y, Quantidade: 1, Valor Unitário Sem IVA: 1",
            "Tipo: Taxa Normal, Código: 1, Nome: X, Descrição: Y, Valor Unitário Sem IVA: 1, Biológico: true",
            "Tipo: Taxa Normal, Código: x, Nome: X, Descrição: Y, Quantidade: 1, Valor Unitário Sem IVA: 1, Biológico: true",
            "Tipo: Taxa Normal, Código: 1, Nome: X, Descrição: Y, Quantidade: -1, Valor Unitário Sem IVA: 1, Biológico: true",
            "Tipo: Taxa Normal, Código: 1, Nome: X, Descrição: Y, Quantidade: 1, Valor Unitário Sem IVA: abc, Biológico: true",
            "Tipo: Taxa Normal, Código: 1, Nome: X, Descrição: Y, Quantidade: 1, Valor Unitário Sem IVA: 1, Biológico: sim",
            "Tipo: Farmácia Com Prescrição, Código: 1, Nome: X, Descrição: Y, Quantidade: 1, Valor Unitário Sem IVA: 1",
            "Cliente: Ana, 123456789, Madeira",
        ] {
            assert!(parse_product_line(line).is_err(), "{line:?} should be rejected");
        }
    }
}
