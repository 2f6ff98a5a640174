use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::info;

use crate::core::{FaturaError, Ledger};

use super::export::write_invoices;
use super::import::{ImportOptions, ImportReport, import_from_reader};

/// Accept only paths ending in `.txt` (any case).
pub fn check_extension(path: &Path) -> Result<(), FaturaError> {
    let is_txt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if is_txt {
        Ok(())
    } else {
        Err(FaturaError::UnsupportedExtension(path.display().to_string()))
    }
}

/// Export every invoice in the ledger to a `.txt` file, replacing it.
/// Returns the number of invoices written.
///
/// The extension and the empty-ledger case are checked before the file is created.
pub fn export_to_file(ledger: &Ledger, path: impl AsRef<Path>) -> Result<usize, FaturaError> {
    let path = path.as_ref();
    check_extension(path)?;
    if ledger.invoices().is_empty() {
        return Err(FaturaError::Validation("no invoices to export".into()));
    }

    let file = File::create(path)?;
    write_invoices(ledger.invoices(), BufWriter::new(file))?;
    info!(path = %path.display(), invoices = ledger.invoices().len(), "Exported invoices");
    Ok(ledger.invoices().len())
}

/// Import a `.txt` file into the ledger.
///
/// A wrong extension, a missing file or a read error fails the whole import;
/// problems inside the file are listed in the report instead.
pub fn import_file(
    ledger: &mut Ledger,
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<ImportReport, FaturaError> {
    let path = path.as_ref();
    check_extension(path)?;
    let file = File::open(path)?;
    info!(path = %path.display(), "Importing invoices");
    import_from_reader(ledger, BufReader::new(file), options)
}
