use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader};
use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{
    Color, ExcelDateTime, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet,
};

use crate::error::{HsaError, Result};
use crate::models::{PendingReceipt, Transaction};

pub const COL_DATE: &str = "Date";
pub const COL_PROVIDER: &str = "Provider";
pub const COL_AMOUNT: &str = "Amount";
pub const COL_CASH_BALANCE: &str = "HSA Cash Balance";
pub const COL_ATTACHMENTS: &str = "Attachments";
pub const COL_RECEIPT_NO: &str = "Receipt no";
pub const COL_IN_HSA: &str = "In HSA?";
pub const COL_NOTES: &str = "Notes";
pub const COL_NEW_FILENAME: &str = "New Filename";
pub const COL_TYPE: &str = "Type";
pub const COL_CATEGORY: &str = "Category";
pub const COL_PAYMENT_METHOD: &str = "Payment Method";

/// Header written when a ledger is created from scratch.
pub const DEFAULT_COLUMNS: &[&str] = &[
    COL_DATE,
    COL_PROVIDER,
    COL_AMOUNT,
    COL_CASH_BALANCE,
    COL_ATTACHMENTS,
    COL_RECEIPT_NO,
    COL_IN_HSA,
    COL_NOTES,
    COL_NEW_FILENAME,
    COL_TYPE,
    COL_CATEGORY,
    COL_PAYMENT_METHOD,
];

const DEFAULT_SHEET: &str = "Transactions";
const ATTACHED: &str = "Y";

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Value::Empty
        } else {
            Value::Text(s)
        }
    }

    pub fn display(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Text(s) => s.clone(),
            Value::Number(n) if n.fract() == 0.0 => format!("{n:.0}"),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Date(d) => d.format("%m/%d/%Y").to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

const DATE_FORMAT: &str = "mm/dd/yyyy";

/// Excel cannot store dates outside 1900..=9999.
fn excel_date(d: NaiveDate) -> Option<NaiveDate> {
    (1900..=9999).contains(&d.year()).then_some(d)
}

fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::Duration::days(serial as i64))
}

fn value_from_cell(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::String(s) => Value::text(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(Value::Date)
            .unwrap_or(Value::Number(dt.as_f64())),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(Value::Date)
            .unwrap_or_else(|| Value::text(s.clone())),
        Data::DurationIso(s) => Value::text(s.clone()),
        Data::Error(_) | Data::Empty => Value::Empty,
    }
}

fn rows_from_range(range: &Range<Data>) -> Vec<Vec<Value>> {
    let (row0, col0) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Value>> = vec![Vec::new(); row0 as usize];
    for cells in range.rows() {
        let mut row = vec![Value::Empty; col0 as usize];
        row.extend(cells.iter().map(value_from_cell));
        rows.push(row);
    }
    while rows
        .last()
        .map_or(false, |r| r.iter().all(|v| *v == Value::Empty))
    {
        rows.pop();
    }
    rows
}

// ---------------------------------------------------------------------------
// Fill colors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Green,
    Blue,
    Yellow,
}

impl Fill {
    /// `R…` rows are green, `F…` rows blue, anything else yellow.
    pub fn for_receipt(receipt_number: &str) -> Self {
        match receipt_number.chars().next() {
            Some('R') => Fill::Green,
            Some('F') => Fill::Blue,
            _ => Fill::Yellow,
        }
    }

    pub fn rgb(&self) -> u32 {
        match self {
            Fill::Green => 0x92D050,
            Fill::Blue => 0x00B0F0,
            Fill::Yellow => 0xFFFF00,
        }
    }
}

#[derive(Clone, Copy)]
enum ColumnKind {
    Date,
    Amount,
    Plain,
}

fn data_format(fill: Fill, kind: ColumnKind) -> Format {
    let format = Format::new()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(fill.rgb()));
    match kind {
        ColumnKind::Date => format.set_num_format(DATE_FORMAT),
        ColumnKind::Amount => format.set_num_format("0.00"),
        ColumnKind::Plain => format,
    }
}

fn write_value(ws: &mut Worksheet, row: u32, col: u16, value: &Value, format: &Format) -> Result<()> {
    match value {
        Value::Empty => {
            ws.write_blank(row, col, format)?;
        }
        Value::Text(s) => {
            ws.write_string_with_format(row, col, s, format)?;
        }
        Value::Number(n) => {
            ws.write_number_with_format(row, col, *n, format)?;
        }
        Value::Bool(b) => {
            ws.write_boolean_with_format(row, col, *b, format)?;
        }
        Value::Date(d) => match excel_date(*d) {
            Some(d) => {
                let dt = ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8)?;
                ws.write_datetime_with_format(row, col, &dt, &format.clone().set_num_format(DATE_FORMAT))?;
            }
            None => {
                ws.write_string_with_format(row, col, value.display(), format)?;
            }
        },
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Sheet {
    name: String,
    rows: Vec<Vec<Value>>,
}

/// The transaction spreadsheet. Row 0 of the active sheet is the header;
/// other sheets are kept only so a save does not drop them.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    sheets: Vec<Sheet>,
    active: usize,
}

impl Ledger {
    /// A fresh ledger with the default header, not yet written to disk.
    pub fn create(path: &Path, sheet_name: Option<&str>) -> Self {
        let header = DEFAULT_COLUMNS.iter().map(|c| Value::text(*c)).collect();
        Self {
            path: path.to_path_buf(),
            sheets: vec![Sheet {
                name: sheet_name.unwrap_or(DEFAULT_SHEET).to_string(),
                rows: vec![header],
            }],
            active: 0,
        }
    }

    pub fn load(path: &Path, sheet_name: Option<&str>) -> Result<Self> {
        let mut workbook = calamine::open_workbook_auto(path)?;
        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name)?;
            sheets.push(Sheet {
                rows: rows_from_range(&range),
                name,
            });
        }
        let active = match sheet_name {
            Some(wanted) => sheets
                .iter()
                .position(|s| s.name == wanted)
                .ok_or_else(|| HsaError::Other(format!("Sheet '{wanted}' not found in {}", path.display())))?,
            None => 0,
        };
        if sheets.is_empty() {
            return Err(HsaError::Other(format!("{} has no sheets", path.display())));
        }
        let mut ledger = Self {
            path: path.to_path_buf(),
            sheets,
            active,
        };
        if ledger.sheet().rows.is_empty() {
            ledger.sheet_mut().rows.push(DEFAULT_COLUMNS.iter().map(|c| Value::text(*c)).collect());
        }
        tracing::debug!(path = %path.display(), rows = ledger.len(), "loaded ledger");
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sheet(&self) -> &Sheet {
        &self.sheets[self.active]
    }

    fn sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheets[self.active]
    }

    pub fn headers(&self) -> Vec<String> {
        self.sheet()
            .rows
            .first()
            .map(|r| r.iter().map(|v| v.display().trim().to_string()).collect())
            .unwrap_or_default()
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.sheet().rows.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        let headers = self.headers();
        let find = |n: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(n));
        find(name).or_else(|| {
            if name.eq_ignore_ascii_case(COL_RECEIPT_NO) {
                find("Receipt Number")
            } else {
                None
            }
        })
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.column(name)
            .ok_or_else(|| HsaError::MissingColumn(name.to_string()))
    }

    fn data_rows(&self) -> &[Vec<Value>] {
        self.sheet().rows.get(1..).unwrap_or(&[])
    }

    fn cell(row: &[Value], col: Option<usize>) -> &Value {
        col.and_then(|c| row.get(c)).unwrap_or(&Value::Empty)
    }

    pub fn receipt_numbers(&self) -> Result<Vec<String>> {
        let col = self.require(COL_RECEIPT_NO)?;
        Ok(self
            .data_rows()
            .iter()
            .map(|r| Self::cell(r, Some(col)).display())
            .filter(|s| !s.trim().is_empty())
            .collect())
    }

    /// Insert `tx` directly below the header so the newest row comes first.
    pub fn insert_transaction(&mut self, tx: &Transaction) -> Result<()> {
        self.require(COL_RECEIPT_NO)?;
        let yes_no = |b: bool| Value::text(if b { "Y" } else { "N" });
        let row: Vec<Value> = self
            .headers()
            .iter()
            .map(|h| match h.to_ascii_lowercase().as_str() {
                "date" => NaiveDate::parse_from_str(tx.date.trim(), "%m/%d/%Y")
                    .ok()
                    .and_then(excel_date)
                    .map(Value::Date)
                    .unwrap_or_else(|| Value::text(tx.date.clone())),
                "provider" => Value::text(tx.provider.clone()),
                "amount" => Value::Number(tx.amount),
                "hsa cash balance" => Value::text("-"),
                "attachments" => yes_no(tx.attachments),
                "receipt no" | "receipt number" => Value::text(tx.receipt_number.clone()),
                "in hsa?" => yes_no(tx.in_hsa),
                "notes" => Value::text(tx.notes.clone()),
                "new filename" => Value::text(tx.new_filename.clone()),
                "type" => Value::text(tx.expense_type.label()),
                "category" => Value::text(tx.category.label()),
                "payment method" => Value::text(tx.payment_method.label()),
                _ => Value::Empty,
            })
            .collect();
        self.sheet_mut().rows.insert(1, row);
        tracing::debug!(receipt = %tx.receipt_number, "inserted ledger row");
        Ok(())
    }

    /// Rows whose receipt has not been attached on the portal yet.
    pub fn pending(&self) -> Result<Vec<PendingReceipt>> {
        let receipt_col = self.require(COL_RECEIPT_NO)?;
        let attach_col = self.require(COL_ATTACHMENTS)?;
        let date_col = self.column(COL_DATE);
        let provider_col = self.column(COL_PROVIDER);
        let amount_col = self.column(COL_AMOUNT);
        let filename_col = self.column(COL_NEW_FILENAME);

        Ok(self
            .data_rows()
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                !Self::cell(r, Some(attach_col))
                    .display()
                    .trim()
                    .eq_ignore_ascii_case(ATTACHED)
            })
            .map(|(index, r)| {
                let new_filename = Self::cell(r, filename_col).display();
                PendingReceipt {
                    index,
                    date: Self::cell(r, date_col).display(),
                    provider: Self::cell(r, provider_col).display(),
                    amount: Self::cell(r, amount_col).as_f64().unwrap_or(0.0),
                    receipt_number: Self::cell(r, Some(receipt_col)).display().trim().to_string(),
                    new_filename: (!new_filename.trim().is_empty()).then(|| new_filename.trim().to_string()),
                }
            })
            .collect())
    }

    /// Flag the first row carrying `receipt_number` as attached. Returns its data-row index.
    pub fn mark_attached(&mut self, receipt_number: &str) -> Result<usize> {
        let receipt_col = self.require(COL_RECEIPT_NO)?;
        let attach_col = self.require(COL_ATTACHMENTS)?;
        let index = self
            .data_rows()
            .iter()
            .position(|r| Self::cell(r, Some(receipt_col)).display().trim() == receipt_number)
            .ok_or_else(|| HsaError::ReceiptNotFound(receipt_number.to_string()))?;
        let row = &mut self.sheet_mut().rows[index + 1];
        if row.len() <= attach_col {
            row.resize(attach_col + 1, Value::Empty);
        }
        row[attach_col] = Value::text(ATTACHED);
        if Fill::for_receipt(receipt_number) == Fill::Yellow {
            tracing::warn!(receipt = receipt_number, "receipt number has no R/F prefix; row keeps the yellow fill");
        }
        tracing::info!(receipt = receipt_number, row = index + 2, "marked attachment");
        Ok(index)
    }

    pub fn save(&self) -> Result<()> {
        let mut workbook = Workbook::new();
        for (i, sheet) in self.sheets.iter().enumerate() {
            let ws = workbook.add_worksheet();
            ws.set_name(&sheet.name)?;
            if i == self.active {
                self.write_ledger_sheet(ws, sheet)?;
            } else {
                let plain = Format::new();
                for (r, row) in sheet.rows.iter().enumerate() {
                    for (c, value) in row.iter().enumerate() {
                        if *value != Value::Empty {
                            write_value(ws, r as u32, c as u16, value, &plain)?;
                        }
                    }
                }
            }
        }
        workbook.save(&self.path)?;
        tracing::info!(path = %self.path.display(), rows = self.len(), "saved ledger");
        Ok(())
    }

    fn write_ledger_sheet(&self, ws: &mut Worksheet, sheet: &Sheet) -> Result<()> {
        let header_format = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);
        let headers = self.headers();
        for (c, h) in headers.iter().enumerate() {
            ws.write_string_with_format(0, c as u16, h, &header_format)?;
        }

        let kinds: Vec<ColumnKind> = headers
            .iter()
            .map(|h| {
                if h.eq_ignore_ascii_case(COL_DATE) {
                    ColumnKind::Date
                } else if h.eq_ignore_ascii_case(COL_AMOUNT) {
                    ColumnKind::Amount
                } else {
                    ColumnKind::Plain
                }
            })
            .collect();
        let receipt_col = self.column(COL_RECEIPT_NO);

        for (r, row) in sheet.rows.iter().enumerate().skip(1) {
            let fill = Fill::for_receipt(Self::cell(row, receipt_col).display().trim());
            let width = row.len().max(headers.len());
            for c in 0..width {
                let kind = kinds.get(c).copied().unwrap_or(ColumnKind::Plain);
                let value = row.get(c).unwrap_or(&Value::Empty);
                write_value(ws, r as u32, c as u16, value, &data_format(fill, kind))?;
            }
        }
        ws.autofit();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ExpenseType, PaymentMethod};

    fn tx(receipt: &str, amount: f64, attachments: bool) -> Transaction {
        Transaction {
            date: "03/14/2024".into(),
            provider: "Dr. Smith".into(),
            amount,
            payment_method: if receipt.starts_with('R') {
                PaymentMethod::HsaAccount
            } else {
                PaymentMethod::Credit
            },
            category: Category::Doctor,
            expense_type: ExpenseType::Medical,
            receipt_number: receipt.into(),
            in_hsa: receipt.starts_with('R'),
            attachments,
            notes: String::new(),
            new_filename: crate::receipts::receipt_stem(receipt, amount),
        }
    }

    fn ledger_with(rows: &[(&str, f64, bool)]) -> (tempfile::TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::create(&dir.path().join("hsa.xlsx"), None);
        for (receipt, amount, attached) in rows {
            ledger.insert_transaction(&tx(receipt, *amount, *attached)).unwrap();
        }
        (dir, ledger)
    }

    #[test]
    fn test_fill_for_receipt() {
        assert_eq!(Fill::for_receipt("R6"), Fill::Green);
        assert_eq!(Fill::for_receipt("F3"), Fill::Blue);
        assert_eq!(Fill::for_receipt("X1"), Fill::Yellow);
        assert_eq!(Fill::for_receipt(""), Fill::Yellow);
        assert_eq!(Fill::Green.rgb(), 0x92D050);
        assert_eq!(Fill::Blue.rgb(), 0x00B0F0);
        assert_eq!(Fill::Yellow.rgb(), 0xFFFF00);
    }

    #[test]
    fn test_insert_puts_newest_first() {
        let (_dir, ledger) = ledger_with(&[("R1", 10.0, true), ("F1", 20.0, false)]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.receipt_numbers().unwrap(), vec!["F1", "R1"]);
    }

    #[test]
    fn test_insert_maps_columns_by_name() {
        let (_dir, ledger) = ledger_with(&[("R6", 42.5, true)]);
        let row = &ledger.data_rows()[0];
        let get = |name: &str| Ledger::cell(row, ledger.column(name)).clone();
        assert_eq!(get(COL_DATE), Value::Date(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()));
        assert_eq!(get(COL_AMOUNT), Value::Number(42.5));
        assert_eq!(get(COL_CASH_BALANCE), Value::text("-"));
        assert_eq!(get(COL_ATTACHMENTS), Value::text("Y"));
        assert_eq!(get(COL_IN_HSA), Value::text("Y"));
        assert_eq!(get(COL_NEW_FILENAME), Value::text("R6_42.50"));
        assert_eq!(get(COL_CATEGORY), Value::text("Doctor"));
        assert_eq!(get(COL_PAYMENT_METHOD), Value::text("HSA Account"));
        assert_eq!(get(COL_NOTES), Value::Empty);
    }

    #[test]
    fn test_unparseable_date_kept_as_text() {
        let (_dir, mut ledger) = ledger_with(&[]);
        let mut t = tx("R1", 5.0, true);
        t.date = "31/12/2024".into();
        ledger.insert_transaction(&t).unwrap();
        let row = &ledger.data_rows()[0];
        assert_eq!(*Ledger::cell(row, ledger.column(COL_DATE)), Value::text("31/12/2024"));
    }

    #[test]
    fn test_pre_1900_date_saved_as_text() {
        let (dir, mut ledger) = ledger_with(&[]);
        let mut t = tx("R1", 10.0, true);
        t.date = "01/02/1899".into();
        ledger.insert_transaction(&t).unwrap();
        let row = &ledger.data_rows()[0];
        assert_eq!(*Ledger::cell(row, ledger.column(COL_DATE)), Value::text("01/02/1899"));

        ledger.save().unwrap();
        let loaded = Ledger::load(&dir.path().join("hsa.xlsx"), None).unwrap();
        assert_eq!(loaded.pending().unwrap().len(), 0);
        assert_eq!(loaded.receipt_numbers().unwrap(), vec!["R1"]);
    }

    #[test]
    fn test_missing_receipt_column() {
        let (_dir, mut ledger) = ledger_with(&[]);
        ledger.sheet_mut().rows[0] = vec![Value::text("Date"), Value::text("Amount")];
        assert!(matches!(ledger.receipt_numbers(), Err(HsaError::MissingColumn(c)) if c == COL_RECEIPT_NO));
        assert!(ledger.insert_transaction(&tx("R1", 1.0, true)).is_err());
    }

    #[test]
    fn test_receipt_number_alias_column() {
        let (_dir, mut ledger) = ledger_with(&[]);
        ledger.sheet_mut().rows[0][5] = Value::text("Receipt Number");
        assert_eq!(ledger.column(COL_RECEIPT_NO), Some(5));
    }

    #[test]
    fn test_pending_and_mark_attached() {
        let (_dir, mut ledger) = ledger_with(&[("R1", 10.0, true), ("F1", 20.0, false), ("R2", 30.0, false)]);
        let pending = ledger.pending().unwrap();
        let ids: Vec<&str> = pending.iter().map(|p| p.receipt_number.as_str()).collect();
        assert_eq!(ids, vec!["R2", "F1"]);
        assert_eq!(pending[0].index, 0);
        assert_eq!(pending[0].amount, 30.0);
        assert_eq!(pending[0].date, "03/14/2024");
        assert_eq!(pending[0].new_filename.as_deref(), Some("R2_30.00"));

        assert_eq!(ledger.mark_attached("F1").unwrap(), 1);
        let ids: Vec<String> = ledger.pending().unwrap().into_iter().map(|p| p.receipt_number).collect();
        assert_eq!(ids, vec!["R2"]);
    }

    #[test]
    fn test_mark_attached_unknown_receipt() {
        let (_dir, mut ledger) = ledger_with(&[("R1", 10.0, false)]);
        assert!(matches!(ledger.mark_attached("R9"), Err(HsaError::ReceiptNotFound(_))));
        assert_eq!(ledger.pending().unwrap().len(), 1);
    }

    #[test]
    fn test_mark_attached_without_prefix_still_flags_row() {
        let (_dir, mut ledger) = ledger_with(&[("R1", 10.0, false), ("X7", 5.0, false)]);
        assert_eq!(ledger.mark_attached("X7").unwrap(), 0);
        let ids: Vec<String> = ledger.pending().unwrap().into_iter().map(|p| p.receipt_number).collect();
        assert_eq!(ids, vec!["R1"]);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (dir, ledger) = ledger_with(&[("R1", 10.0, true), ("F2", 20.25, false)]);
        ledger.save().unwrap();

        let loaded = Ledger::load(&dir.path().join("hsa.xlsx"), None).unwrap();
        assert_eq!(loaded.headers(), DEFAULT_COLUMNS.to_vec());
        assert_eq!(loaded.receipt_numbers().unwrap(), vec!["F2", "R1"]);
        let pending = loaded.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].amount, 20.25);
        assert_eq!(pending[0].date, "03/14/2024");
    }

    #[test]
    fn test_load_selects_named_sheet_and_keeps_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Summary").unwrap().write_string(0, 0, "totals").unwrap();
        let ws = workbook.add_worksheet();
        ws.set_name("TransactionHistory (2)").unwrap();
        for (c, h) in DEFAULT_COLUMNS.iter().enumerate() {
            ws.write_string(0, c as u16, *h).unwrap();
        }
        ws.write_string(1, 5, "R3").unwrap();
        ws.write_string(1, 4, "N").unwrap();
        workbook.save(&path).unwrap();

        let mut ledger = Ledger::load(&path, Some("TransactionHistory (2)")).unwrap();
        assert_eq!(ledger.receipt_numbers().unwrap(), vec!["R3"]);
        ledger.mark_attached("R3").unwrap();
        ledger.save().unwrap();

        let reloaded = Ledger::load(&path, Some("TransactionHistory (2)")).unwrap();
        assert!(reloaded.pending().unwrap().is_empty());
        let summary = Ledger::load(&path, Some("Summary")).unwrap();
        assert_eq!(summary.headers(), vec!["totals"]);
    }

    fn saved_styles(path: &Path) -> String {
        use std::io::Read;
        let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
        let mut styles = String::new();
        archive
            .by_name("xl/styles.xml")
            .unwrap()
            .read_to_string(&mut styles)
            .unwrap();
        styles
    }

    #[test]
    fn test_save_writes_fills_and_number_formats() {
        let (dir, ledger) = ledger_with(&[("R1", 10.0, true), ("F1", 20.0, false), ("X1", 5.0, false)]);
        ledger.save().unwrap();
        let styles = saved_styles(&dir.path().join("hsa.xlsx"));
        assert!(styles.contains("92D050"));
        assert!(styles.contains("00B0F0"));
        assert!(styles.contains("FFFF00"));
        assert!(styles.contains(r#"formatCode="mm/dd/yyyy""#));
    }

    #[test]
    fn test_dates_outside_date_column_stay_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let date_format = Format::new().set_num_format(DATE_FORMAT);
        let when = ExcelDateTime::from_ymd(2024, 3, 14).unwrap();
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name(DEFAULT_SHEET).unwrap();
        for (c, h) in DEFAULT_COLUMNS.iter().enumerate() {
            ws.write_string(0, c as u16, *h).unwrap();
        }
        ws.write_string(1, 5, "R1").unwrap();
        ws.write_datetime_with_format(1, 7, &when, &date_format).unwrap();
        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_datetime_with_format(0, 0, &when, &date_format).unwrap();
        workbook.save(&path).unwrap();

        Ledger::load(&path, None).unwrap().save().unwrap();

        let mut book = calamine::open_workbook_auto(&path).unwrap();
        let notes = book.worksheet_range("Notes").unwrap();
        assert!(matches!(notes.get((0, 0)), Some(Data::DateTime(_))));
        let ledger_sheet = book.worksheet_range(DEFAULT_SHEET).unwrap();
        assert!(matches!(ledger_sheet.get((1, 7)), Some(Data::DateTime(_))));
    }

    #[test]
    fn test_load_unknown_sheet() {
        let (dir, ledger) = ledger_with(&[]);
        ledger.save().unwrap();
        assert!(Ledger::load(&dir.path().join("hsa.xlsx"), Some("Nope")).is_err());
    }
}
