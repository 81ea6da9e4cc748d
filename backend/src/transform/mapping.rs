//! Fixed column layout of both payroll systems.
//!
//! The source side is described by [`SourceField`], one variant per 給与R4
//! column the conversion reads. The destination side is the Mykomon import
//! header, [`DESTINATION_COLUMNS`]. [`COPY_MAPPING`] lists which source value
//! lands in which destination column.

use serde::Serialize;

/// Source columns read by the conversion, by exact header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceField {
    EmployeeCode,
    FullName,
    NameReading,
    Sex,
    BirthDate,
    PostalCode,
    Address,
    Department,
    DepartmentCode,
    TitleComposite,
    HireDate,
    ResignationDate,
    PayType,
    TaxTable,
    EmploymentInsurance,
    IncomeType,
    ResidentTaxMethod,
    GeneralDependents,
    SpecifiedDependents,
    CoresidentElderlyParents,
    OtherElderlyDependents,
    SpousalWithholding,
}

impl SourceField {
    pub const COUNT: usize = 22;

    /// Every required column, in the order missing columns are checked.
    pub const ALL: [SourceField; SourceField::COUNT] = [
        SourceField::EmployeeCode,
        SourceField::FullName,
        SourceField::NameReading,
        SourceField::Sex,
        SourceField::BirthDate,
        SourceField::PostalCode,
        SourceField::Address,
        SourceField::Department,
        SourceField::DepartmentCode,
        SourceField::TitleComposite,
        SourceField::HireDate,
        SourceField::ResignationDate,
        SourceField::PayType,
        SourceField::TaxTable,
        SourceField::EmploymentInsurance,
        SourceField::IncomeType,
        SourceField::ResidentTaxMethod,
        SourceField::GeneralDependents,
        SourceField::SpecifiedDependents,
        SourceField::CoresidentElderlyParents,
        SourceField::OtherElderlyDependents,
        SourceField::SpousalWithholding,
    ];

    /// Header text in the 給与R4 employee list export.
    pub fn header(self) -> &'static str {
        match self {
            SourceField::EmployeeCode => "従業員コード",
            SourceField::FullName => "従業員名 ※",
            SourceField::NameReading => "従業員名カナ",
            SourceField::Sex => "性別",
            SourceField::BirthDate => "生年月日",
            SourceField::PostalCode => "郵便番号",
            SourceField::Address => "住所",
            SourceField::Department => "部門",
            SourceField::DepartmentCode => "部門コード",
            SourceField::TitleComposite => "役職",
            SourceField::HireDate => "入社年月日",
            SourceField::ResignationDate => "退職年月日",
            SourceField::PayType => "給与区分",
            SourceField::TaxTable => "税表区分",
            SourceField::EmploymentInsurance => "雇用保険区分",
            SourceField::IncomeType => "給与所得種別",
            SourceField::ResidentTaxMethod => "住民税の設定方法",
            SourceField::GeneralDependents => "一般扶養親族",
            SourceField::SpecifiedDependents => "特定扶養親族",
            SourceField::CoresidentElderlyParents => "同居老親等",
            SourceField::OtherElderlyDependents => "その他老人",
            SourceField::SpousalWithholding => "配偶者区分",
        }
    }

    /// Position in [`SourceField::ALL`].
    pub fn position(self) -> usize {
        self as usize
    }
}

/// Mykomon employee import header, in order.
pub const DESTINATION_COLUMNS: [&str; 52] = [
    "NO",
    "従業員コード",
    "氏名",
    "フリガナ",
    "性別",
    "生年月日",
    "自宅郵便番号",
    "自宅住所１",
    "自宅住所２",
    "自宅住所３",
    "自宅電話番号",
    "所属",
    "所属コード",
    "従業員区分",
    "役職",
    "入社日",
    "退職日",
    "最終給与",
    "健康保険料",
    "介護保険料",
    "厚生年金保険料",
    "雇用保険料",
    "支給形態",
    "時給1",
    "時給2",
    "時給3",
    "時給4",
    "時給5",
    "時給6",
    "通勤手当",
    "賞与",
    "所得税区分",
    "控除対象扶養親族等の数",
    "住民税の設定",
    "住民税5月分まで",
    "住民税6月分",
    "住民税7月分以降",
    "時間の転記先1",
    "時間の転記先2",
    "時間の転記先3",
    "時間の転記先4",
    "時間の転記先5",
    "時間の転記先6",
    "金額の転記先1",
    "金額の転記先2",
    "金額の転記先3",
    "金額の転記先4",
    "金額の転記先5",
    "金額の転記先6",
    "日給1",
    "日給2",
    "日給3",
];

/// Where a destination value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CopySource {
    /// A source column, after any categorical translation.
    Column(SourceField),
    Prefecture,
    Municipality,
    AddressRemainder,
    EmployeeCategory,
    Title,
}

impl CopySource {
    pub fn describe(self) -> String {
        match self {
            CopySource::Column(field) => field.header().to_string(),
            CopySource::Prefecture => format!("({}: 都道府県)", SourceField::Address.header()),
            CopySource::Municipality => format!("({}: 市町村)", SourceField::Address.header()),
            CopySource::AddressRemainder => format!("({}: 番地)", SourceField::Address.header()),
            CopySource::EmployeeCategory => {
                format!("({}: 従業員区分)", SourceField::TitleComposite.header())
            }
            CopySource::Title => format!("({}: 役職名)", SourceField::TitleComposite.header()),
        }
    }
}

/// Direct one-to-one copies into the destination layout.
pub const COPY_MAPPING: [(CopySource, &str); 20] = [
    (CopySource::Column(SourceField::EmployeeCode), "従業員コード"),
    (CopySource::Column(SourceField::FullName), "氏名"),
    (CopySource::Column(SourceField::NameReading), "フリガナ"),
    (CopySource::Column(SourceField::Sex), "性別"),
    (CopySource::Column(SourceField::BirthDate), "生年月日"),
    (CopySource::Column(SourceField::PostalCode), "自宅郵便番号"),
    (CopySource::Prefecture, "自宅住所１"),
    (CopySource::Municipality, "自宅住所２"),
    (CopySource::AddressRemainder, "自宅住所３"),
    (CopySource::Column(SourceField::Department), "所属"),
    (CopySource::Column(SourceField::DepartmentCode), "所属コード"),
    (CopySource::EmployeeCategory, "従業員区分"),
    (CopySource::Title, "役職"),
    (CopySource::Column(SourceField::HireDate), "入社日"),
    (CopySource::Column(SourceField::ResignationDate), "退職日"),
    (CopySource::Column(SourceField::PayType), "支給形態"),
    (CopySource::Column(SourceField::TaxTable), "所得税区分"),
    (CopySource::Column(SourceField::EmploymentInsurance), "雇用保険料"),
    (CopySource::Column(SourceField::IncomeType), "賞与"),
    (CopySource::Column(SourceField::ResidentTaxMethod), "住民税の設定"),
];

/// Destination column holding the derived dependents sum.
pub const DEPENDENT_COUNT_COLUMN: &str = "控除対象扶養親族等の数";

/// Human-readable listing of the copy mapping, for the CLI.
pub fn mapping_description() -> String {
    let mut out = String::from("Direct field copies (source → destination):\n");
    for (source, dest) in COPY_MAPPING.iter() {
        out.push_str(&format!("  {} → {}\n", source.describe(), dest));
    }
    out.push_str(&format!(
        "\nDerived:\n  {} + {} + {} + {} + ({} = 源泉控除対象) → {}\n",
        SourceField::GeneralDependents.header(),
        SourceField::SpecifiedDependents.header(),
        SourceField::CoresidentElderlyParents.header(),
        SourceField::OtherElderlyDependents.header(),
        SourceField::SpousalWithholding.header(),
        DEPENDENT_COUNT_COLUMN,
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressParts, Cell, DestinationRecord, TitleParts};
    use std::collections::HashSet;

    #[test]
    fn test_positions_follow_all_order() {
        for (i, field) in SourceField::ALL.iter().enumerate() {
            assert_eq!(field.position(), i);
        }
    }

    #[test]
    fn test_destination_columns_are_unique() {
        let set: HashSet<_> = DESTINATION_COLUMNS.iter().collect();
        assert_eq!(set.len(), DESTINATION_COLUMNS.len());
        assert_eq!(DESTINATION_COLUMNS[0], "NO");
        assert_eq!(DESTINATION_COLUMNS[51], "日給3");
    }

    #[test]
    fn test_every_copy_target_is_a_destination_column() {
        for (_, dest) in COPY_MAPPING.iter() {
            assert!(DESTINATION_COLUMNS.contains(dest), "{dest} not in layout");
        }
        assert!(DESTINATION_COLUMNS.contains(&DEPENDENT_COUNT_COLUMN));
    }

    #[test]
    fn test_every_copy_target_is_populated_by_record() {
        let marker = Cell::from("x");
        let record = DestinationRecord {
            employee_code: marker.clone(),
            name: marker.clone(),
            reading: marker.clone(),
            sex: marker.clone(),
            birth_date: marker.clone(),
            postal_code: marker.clone(),
            address: Some(AddressParts {
                prefecture: "x".into(),
                municipality: "x".into(),
                remainder: "x".into(),
            }),
            department: marker.clone(),
            department_code: marker.clone(),
            title: Some(TitleParts { category: "x".into(), title: "x".into() }),
            hire_date: marker.clone(),
            resignation_date: marker.clone(),
            pay_type: marker.clone(),
            income_tax_category: marker.clone(),
            employment_insurance: marker.clone(),
            bonus: marker.clone(),
            dependent_count: 0,
            resident_tax_setting: marker.clone(),
        };
        for (_, dest) in COPY_MAPPING.iter() {
            assert_eq!(record.field(dest), marker, "{dest} not populated");
        }
    }

    #[test]
    fn test_mapping_description_lists_all_copies() {
        let desc = mapping_description();
        assert_eq!(desc.matches('→').count(), COPY_MAPPING.len() + 2);
        assert!(desc.contains("従業員名 ※ → 氏名"));
    }
}
