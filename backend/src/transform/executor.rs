//! Transformer: source table → destination table.
//!
//! Required columns are resolved once, up front, so a missing column aborts
//! before any row is touched. Rows are then converted independently and in
//! order; the first fatal rule failure aborts the whole table.

use crate::error::{TransformError, TransformResult};
use crate::models::{
    Cell, DestinationRecord, DestinationTable, PatternField, PatternWarning, SourceRecord, SourceTable,
};

use super::lookup::{BONUS, EMPLOYMENT_INSURANCE, PAY_TYPE, RESIDENT_TAX, TAX_TABLE};
use super::mapping::SourceField;
use super::rules::{
    normalize_date, normalize_sex, parse_count, split_address, split_title,
    spousal_withholding_count,
};

/// Column positions of every required source field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumns {
    indices: [usize; SourceField::COUNT],
}

impl SourceColumns {
    pub fn index(&self, field: SourceField) -> usize {
        self.indices[field.position()]
    }
}

/// Result of transforming a whole table.
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub table: DestinationTable,
    pub warnings: Vec<PatternWarning>,
}

/// Locate every required column by exact header name.
pub fn resolve_columns(table: &SourceTable) -> TransformResult<SourceColumns> {
    let mut indices = [0usize; SourceField::COUNT];
    for field in SourceField::ALL {
        indices[field.position()] = table
            .column_index(field.header())
            .ok_or_else(|| TransformError::MissingColumn(field.header().to_string()))?;
    }
    Ok(SourceColumns { indices })
}

/// Every required column absent from the table, in check order.
pub fn missing_columns(table: &SourceTable) -> Vec<&'static str> {
    SourceField::ALL
        .iter()
        .map(|f| f.header())
        .filter(|h| table.column_index(h).is_none())
        .collect()
}

/// Pull the cells of one row into a [`SourceRecord`].
pub fn read_record(table: &SourceTable, columns: &SourceColumns, row: usize) -> SourceRecord {
    let get = |field: SourceField| table.cell(row, columns.index(field)).clone();
    SourceRecord {
        employee_code: get(SourceField::EmployeeCode),
        full_name: get(SourceField::FullName),
        name_reading: get(SourceField::NameReading),
        sex: get(SourceField::Sex),
        birth_date: get(SourceField::BirthDate),
        postal_code: get(SourceField::PostalCode),
        address: get(SourceField::Address),
        department: get(SourceField::Department),
        department_code: get(SourceField::DepartmentCode),
        title_composite: get(SourceField::TitleComposite),
        hire_date: get(SourceField::HireDate),
        resignation_date: get(SourceField::ResignationDate),
        pay_type: get(SourceField::PayType),
        tax_table: get(SourceField::TaxTable),
        employment_insurance: get(SourceField::EmploymentInsurance),
        income_type: get(SourceField::IncomeType),
        resident_tax_method: get(SourceField::ResidentTaxMethod),
        general_dependents: get(SourceField::GeneralDependents),
        specified_dependents: get(SourceField::SpecifiedDependents),
        coresident_elderly_parents: get(SourceField::CoresidentElderlyParents),
        other_elderly_dependents: get(SourceField::OtherElderlyDependents),
        spousal_withholding: get(SourceField::SpousalWithholding),
    }
}

/// Convert one record. `row` is the 1-based sheet row, used in errors and
/// warnings only.
pub fn transform_record(
    row: usize,
    record: &SourceRecord,
) -> TransformResult<(DestinationRecord, Vec<PatternWarning>)> {
    let mut warnings = Vec::new();

    let date = |field: SourceField, cell: &Cell| {
        normalize_date(cell).map_err(|value| TransformError::DateParse {
            row,
            column: field.header().to_string(),
            value,
        })
    };
    let count = |field: SourceField, cell: &Cell| {
        parse_count(cell).map_err(|value| TransformError::NumberParse {
            row,
            column: field.header().to_string(),
            value,
        })
    };

    let address = match record.address.as_text() {
        Some(text) if !text.trim().is_empty() => {
            let parts = split_address(text);
            if parts.is_none() {
                warnings.push(PatternWarning {
                    row,
                    field: PatternField::Address,
                    value: text.to_string(),
                });
            }
            parts
        }
        _ => None,
    };

    let title = match record.title_composite.as_text() {
        Some(text) if !text.trim().is_empty() => {
            let parts = split_title(text);
            if parts.is_none() {
                warnings.push(PatternWarning {
                    row,
                    field: PatternField::Title,
                    value: text.to_string(),
                });
            }
            parts
        }
        _ => None,
    };

    let mut dependent_count = spousal_withholding_count(&record.spousal_withholding);
    for (field, cell) in [
        (SourceField::GeneralDependents, &record.general_dependents),
        (SourceField::SpecifiedDependents, &record.specified_dependents),
        (SourceField::CoresidentElderlyParents, &record.coresident_elderly_parents),
        (SourceField::OtherElderlyDependents, &record.other_elderly_dependents),
    ] {
        dependent_count = dependent_count
            .checked_add(count(field, cell)?)
            .ok_or_else(|| TransformError::NumberParse {
                row,
                column: field.header().to_string(),
                value: cell.display(),
            })?;
    }

    let destination = DestinationRecord {
        employee_code: record.employee_code.clone(),
        name: record.full_name.clone(),
        reading: record.name_reading.clone(),
        sex: normalize_sex(&record.sex),
        birth_date: date(SourceField::BirthDate, &record.birth_date)?,
        postal_code: record.postal_code.clone(),
        address,
        department: record.department.clone(),
        department_code: record.department_code.clone(),
        title,
        hire_date: date(SourceField::HireDate, &record.hire_date)?,
        resignation_date: date(SourceField::ResignationDate, &record.resignation_date)?,
        pay_type: PAY_TYPE.translate(&record.pay_type),
        income_tax_category: TAX_TABLE.translate(&record.tax_table),
        employment_insurance: EMPLOYMENT_INSURANCE.translate(&record.employment_insurance),
        bonus: BONUS.translate(&record.income_type),
        dependent_count,
        resident_tax_setting: RESIDENT_TAX.translate(&record.resident_tax_method),
    };

    Ok((destination, warnings))
}

/// Transform a whole table; all-or-nothing.
pub fn transform_table(table: &SourceTable) -> TransformResult<TransformOutput> {
    let columns = resolve_columns(table)?;
    let mut output = TransformOutput {
        table: DestinationTable {
            records: Vec::with_capacity(table.len()),
        },
        warnings: Vec::new(),
    };

    for row in 0..table.len() {
        let record = read_record(table, &columns, row);
        let (destination, warnings) = transform_record(table.sheet_row(row), &record)?;
        output.table.records.push(destination);
        output.warnings.extend(warnings);
    }

    Ok(output)
}
