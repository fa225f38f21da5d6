use thiserror::Error;

#[derive(Error, Debug)]
pub enum HsaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook read error: {0}")]
    WorkbookRead(#[from] calamine::Error),

    #[error("Workbook write error: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Browser error: {0}")]
    Browser(#[from] anyhow::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Could not open viewer: {0}")]
    Viewer(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Column '{0}' not found in ledger")]
    MissingColumn(String),

    #[error("Receipt number '{0}' not found in ledger")]
    ReceiptNotFound(String),

    #[error("Refusing to overwrite existing file: {0}")]
    FileExists(String),

    #[error("Receipt file not found: {0}")]
    ReceiptFileMissing(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HsaError>;
