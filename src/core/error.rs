use thiserror::Error;

/// Errors that can occur while managing customers, products and invoices.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FaturaError {
    /// Bad name, tax id or region, duplicate tax id, or a broken invoice invariant.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unknown region, customer, product or invoice.
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// Malformed date, customer line, product line or invoice number.
    #[error("format error: {0}")]
    Format(String),

    /// A price or total does not fit in a decimal.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Underlying file system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Import/export target without a `.txt` extension. Raised before any I/O.
    #[error("unsupported file extension: {0} (only .txt files are allowed)")]
    UnsupportedExtension(String),

    /// Persisted snapshot is corrupt or incompatible.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// A single validation error with field name and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the invalid field (e.g. "customer.tax_id").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Fold a list of field errors into a single [`FaturaError::Validation`].
///
/// Returns `Ok(())` when the list is empty.
pub fn ensure_valid(errors: Vec<ValidationError>) -> Result<(), FaturaError> {
    if errors.is_empty() {
        return Ok(());
    }
    let msg = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    Err(FaturaError::Validation(msg))
}
