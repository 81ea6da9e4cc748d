//! Domain models for the conversion pipeline.
//!
//! - [`Cell`] - one spreadsheet value, shared by source and destination tables
//! - [`SourceTable`] - decoded upload: header names plus positional rows
//! - [`SourceRecord`] - one employee row of the 給与R4 export
//! - [`DestinationRecord`] - one employee row of the Mykomon import layout
//! - [`DestinationTable`] - converted rows with the fixed destination header
//! - [`AddressParts`] / [`TitleParts`] - fields derived by pattern matching
//! - [`PatternWarning`] - non-fatal address/title mismatch

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::transform::mapping::DESTINATION_COLUMNS;

// =============================================================================
// Cell
// =============================================================================

/// A single spreadsheet value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Native spreadsheet date cell.
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value the way a spreadsheet would show it.
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", *f as i64)
            }
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Cell::DateTime(dt) if dt.time() == NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// JSON form used by `inspect` and the preview API.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Empty => Value::Null,
            Cell::Text(s) => json!(s),
            Cell::Int(i) => json!(i),
            Cell::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Cell::Bool(b) => json!(b),
            Cell::DateTime(_) => json!(self.display()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

// =============================================================================
// Source Table
// =============================================================================

/// A decoded upload: ordered header names and positional rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// 0-based sheet row index of the first data row, for error messages.
    pub first_data_row: usize,
}

impl SourceTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            headers,
            rows,
            first_data_row: crate::config::DEFAULT_HEADER_ROW + 1,
        }
    }

    /// Index of the first column whose header equals `name` exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at a position; short rows read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// 1-based sheet row number of a data row.
    pub fn sheet_row(&self, row: usize) -> usize {
        self.first_data_row + row + 1
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as JSON objects keyed by header (blank headers skipped).
    pub fn to_json_records(&self) -> Vec<Value> {
        (0..self.rows.len())
            .map(|row| {
                let mut obj = serde_json::Map::new();
                for (col, header) in self.headers.iter().enumerate() {
                    if header.is_empty() || obj.contains_key(header) {
                        continue;
                    }
                    obj.insert(header.clone(), self.cell(row, col).to_json());
                }
                Value::Object(obj)
            })
            .collect()
    }
}

// =============================================================================
// Records
// =============================================================================

/// One employee row of the source export, restricted to the columns the
/// conversion reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRecord {
    pub employee_code: Cell,
    pub full_name: Cell,
    pub name_reading: Cell,
    pub sex: Cell,
    pub birth_date: Cell,
    pub postal_code: Cell,
    pub address: Cell,
    pub department: Cell,
    pub department_code: Cell,
    /// `"<code>:(<label>) <title>"`
    pub title_composite: Cell,
    pub hire_date: Cell,
    pub resignation_date: Cell,
    pub pay_type: Cell,
    pub tax_table: Cell,
    pub employment_insurance: Cell,
    pub income_type: Cell,
    pub resident_tax_method: Cell,
    pub general_dependents: Cell,
    pub specified_dependents: Cell,
    pub coresident_elderly_parents: Cell,
    pub other_elderly_dependents: Cell,
    pub spousal_withholding: Cell,
}

/// Prefecture / municipality / house-number split of a home address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressParts {
    pub prefecture: String,
    pub municipality: String,
    pub remainder: String,
}

/// Employee category code and display title split from the composite title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitleParts {
    pub category: String,
    pub title: String,
}

/// One employee row of the destination layout.
///
/// Only the populated fields are stored; every other destination column is
/// blank. [`DestinationRecord::field`] resolves a destination column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationRecord {
    pub employee_code: Cell,
    pub name: Cell,
    pub reading: Cell,
    pub sex: Cell,
    pub birth_date: Cell,
    pub postal_code: Cell,
    /// `None` when the address did not match the prefecture pattern.
    pub address: Option<AddressParts>,
    pub department: Cell,
    pub department_code: Cell,
    /// `None` when the composite title did not match.
    pub title: Option<TitleParts>,
    pub hire_date: Cell,
    pub resignation_date: Cell,
    pub pay_type: Cell,
    pub income_tax_category: Cell,
    pub employment_insurance: Cell,
    pub bonus: Cell,
    pub dependent_count: i64,
    pub resident_tax_setting: Cell,
}

fn text_or_empty(s: &str) -> Cell {
    if s.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}

impl DestinationRecord {
    /// Value of a destination column; unknown or unpopulated columns are empty.
    pub fn field(&self, column: &str) -> Cell {
        let address = self.address.as_ref();
        let title = self.title.as_ref();
        match column {
            "従業員コード" => self.employee_code.clone(),
            "氏名" => self.name.clone(),
            "フリガナ" => self.reading.clone(),
            "性別" => self.sex.clone(),
            "生年月日" => self.birth_date.clone(),
            "自宅郵便番号" => self.postal_code.clone(),
            "自宅住所１" => address.map_or(Cell::Empty, |a| text_or_empty(&a.prefecture)),
            "自宅住所２" => address.map_or(Cell::Empty, |a| text_or_empty(&a.municipality)),
            "自宅住所３" => address.map_or(Cell::Empty, |a| text_or_empty(&a.remainder)),
            "所属" => self.department.clone(),
            "所属コード" => self.department_code.clone(),
            "従業員区分" => title.map_or(Cell::Empty, |t| text_or_empty(&t.category)),
            "役職" => title.map_or(Cell::Empty, |t| text_or_empty(&t.title)),
            "入社日" => self.hire_date.clone(),
            "退職日" => self.resignation_date.clone(),
            "雇用保険料" => self.employment_insurance.clone(),
            "支給形態" => self.pay_type.clone(),
            "賞与" => self.bonus.clone(),
            "所得税区分" => self.income_tax_category.clone(),
            "控除対象扶養親族等の数" => Cell::Int(self.dependent_count),
            "住民税の設定" => self.resident_tax_setting.clone(),
            _ => Cell::Empty,
        }
    }

    /// Cells in destination column order.
    pub fn to_row(&self) -> Vec<Cell> {
        DESTINATION_COLUMNS.iter().map(|c| self.field(c)).collect()
    }
}

// =============================================================================
// Destination Table
// =============================================================================

/// Converted rows, one per source row, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationTable {
    pub records: Vec<DestinationRecord>,
}

impl DestinationTable {
    pub fn columns(&self) -> &'static [&'static str] {
        &DESTINATION_COLUMNS
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell>> + '_ {
        self.records.iter().map(DestinationRecord::to_row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows rendered as display strings, for previews.
    pub fn display_rows(&self, limit: usize) -> Vec<Vec<String>> {
        self.rows()
            .take(limit)
            .map(|row| row.iter().map(Cell::display).collect())
            .collect()
    }

    /// Rows as JSON objects keyed by destination column.
    pub fn to_json_records(&self, limit: usize) -> Vec<Value> {
        self.rows()
            .take(limit)
            .map(|row| {
                let obj: serde_json::Map<String, Value> = DESTINATION_COLUMNS
                    .iter()
                    .zip(row.iter())
                    .map(|(c, cell)| (c.to_string(), cell.to_json()))
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }
}

// =============================================================================
// Warnings
// =============================================================================

/// Which derived field group failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternField {
    Address,
    Title,
}

/// Non-fatal mismatch: the derived fields of this row were left blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternWarning {
    /// 1-based sheet row number.
    pub row: usize,
    pub field: PatternField,
    pub value: String,
}

impl std::fmt::Display for PatternWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.field {
            PatternField::Address => "address",
            PatternField::Title => "title",
        };
        write!(f, "Row {}: {} '{}' did not match, left blank", self.row, what, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cell_blank() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::from("  ").is_blank());
        assert!(!Cell::from("x").is_blank());
        assert!(!Cell::Int(0).is_blank());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Float(1001.0).display(), "1001");
        assert_eq!(Cell::Float(1.5).display(), "1.5");
        let dt = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(Cell::DateTime(dt).display(), "2020-01-15");
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let table = SourceTable::new(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::from("1")]],
        );
        assert_eq!(table.cell(0, 1), &Cell::Empty);
        assert_eq!(table.cell(5, 0), &Cell::Empty);
        assert_eq!(table.sheet_row(0), 3);
    }

    #[test]
    fn test_first_duplicate_header_wins() {
        let table = SourceTable::new(
            vec!["x".into(), "x".into()],
            vec![vec![Cell::from("first"), Cell::from("second")]],
        );
        assert_eq!(table.column_index("x"), Some(0));
        assert_eq!(table.to_json_records()[0]["x"], "first");
    }

    #[test]
    fn test_destination_row_has_fixed_width() {
        let record = DestinationRecord {
            employee_code: Cell::Int(7),
            address: Some(AddressParts {
                prefecture: "東京都".into(),
                municipality: "渋谷区".into(),
                remainder: "1-2-3".into(),
            }),
            dependent_count: 2,
            ..Default::default()
        };
        let row = record.to_row();
        assert_eq!(row.len(), DESTINATION_COLUMNS.len());
        assert_eq!(row[0], Cell::Empty); // NO
        assert_eq!(row[1], Cell::Int(7));
        assert_eq!(record.field("自宅住所１"), Cell::from("東京都"));
        assert_eq!(record.field("控除対象扶養親族等の数"), Cell::Int(2));
        assert_eq!(record.field("時給1"), Cell::Empty);
        assert_eq!(record.field("役職"), Cell::Empty);
    }

    #[test]
    fn test_warning_display() {
        let w = PatternWarning { row: 3, field: PatternField::Title, value: "営業主任".into() };
        assert_eq!(w.to_string(), "Row 3: title '営業主任' did not match, left blank");
    }
}
