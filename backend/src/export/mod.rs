//! Output encoding: [`DestinationTable`] → xlsx bytes.
//!
//! The workbook has a single sheet named `Sheet1`: the destination header on
//! the first row, then one row per converted employee. No index column.

use rust_xlsxwriter::{
    DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};

use crate::config::SHEET_NAME;
use crate::error::{ExportError, ExportResult};
use crate::models::{Cell, DestinationTable};

/// Creation date stamped into every workbook, so output depends only on input.
const CREATED: (u16, u8, u8) = (2000, 1, 1);

/// Rows per worksheet, header included.
pub const MAX_SHEET_ROWS: usize = 1_048_576;

/// Encode the table as an xlsx workbook.
pub fn write_workbook(table: &DestinationTable) -> ExportResult<Vec<u8>> {
    if table.len() + 1 > MAX_SHEET_ROWS {
        return Err(ExportError::TooManyRows(table.len()));
    }

    let (year, month, day) = CREATED;
    let created = ExcelDateTime::from_ymd(year, month, day)?;
    let mut workbook = Workbook::new();
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    for (col, name) in table.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }

    for (i, row) in table.rows().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, r, col as u16, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> ExportResult<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            sheet.write_string(row, col, s)?;
        }
        Cell::Int(i) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        Cell::Float(f) => {
            sheet.write_number(row, col, *f)?;
        }
        Cell::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Cell::DateTime(_) => {
            sheet.write_string(row, col, cell.display())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressParts, DestinationRecord};
    use crate::transform::mapping::DESTINATION_COLUMNS;
    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use std::io::Cursor;

    fn read_back(bytes: &[u8]) -> (Vec<String>, calamine::Range<Data>) {
        let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
        let names = sheets.sheet_names();
        let range = sheets.worksheet_range_at(0).unwrap().unwrap();
        (names, range)
    }

    #[test]
    fn test_header_only_workbook() {
        let bytes = write_workbook(&DestinationTable::default()).unwrap();
        let (names, range) = read_back(&bytes);

        assert_eq!(names, vec!["Sheet1".to_string()]);
        assert_eq!(range.height(), 1);
        assert_eq!(range.width(), DESTINATION_COLUMNS.len());
        assert_eq!(range.get((0, 0)), Some(&Data::String("NO".into())));
    }

    #[test]
    fn test_rows_written_in_column_order() {
        let record = DestinationRecord {
            employee_code: Cell::Int(1001),
            name: Cell::from("山田太郎"),
            address: Some(AddressParts {
                prefecture: "東京都".into(),
                municipality: "渋谷区".into(),
                remainder: "1-2-3".into(),
            }),
            dependent_count: 2,
            ..Default::default()
        };
        let table = DestinationTable {
            records: vec![record],
        };
        let bytes = write_workbook(&table).unwrap();
        let (_, range) = read_back(&bytes);

        let col = |name: &str| DESTINATION_COLUMNS.iter().position(|c| *c == name).unwrap();

        assert_eq!(range.height(), 2);
        assert_eq!(range.get((1, col("従業員コード"))), Some(&Data::Float(1001.0)));
        assert_eq!(range.get((1, col("氏名"))), Some(&Data::String("山田太郎".into())));
        assert_eq!(range.get((1, col("自宅住所１"))), Some(&Data::String("東京都".into())));
        assert_eq!(range.get((1, col("控除対象扶養親族等の数"))), Some(&Data::Float(2.0)));
        assert_eq!(range.get((1, col("NO"))), Some(&Data::Empty));
    }
}
