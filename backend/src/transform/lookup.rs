//! Categorical value translations.
//!
//! Each table replaces known source values and leaves everything else as-is.
//! There is no default for unknown keys.

use crate::models::Cell;

/// An enumerated value translation.
#[derive(Debug, Clone, Copy)]
pub struct Lookup {
    /// Destination column the translated value ends up in.
    pub name: &'static str,
    pub entries: &'static [(&'static str, &'static str)],
}

impl Lookup {
    /// Translate a cell. Non-text cells and unknown text pass through unchanged.
    pub fn translate(&self, cell: &Cell) -> Cell {
        match cell {
            Cell::Text(s) => match self.get(s) {
                Some(mapped) => Cell::Text(mapped.to_string()),
                None => cell.clone(),
            },
            _ => cell.clone(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(from, _)| *from == key)
            .map(|(_, to)| *to)
    }
}

/// 給与区分 → 支給形態
pub static PAY_TYPE: Lookup = Lookup {
    name: "支給形態",
    entries: &[
        ("日給月給", "月給制"),
        ("月給", "月給制"),
        ("日給", "日給制"),
        ("時給", "時間給制"),
    ],
};

/// 税表区分 → 所得税区分
pub static TAX_TABLE: Lookup = Lookup {
    name: "所得税区分",
    entries: &[("甲欄", "甲欄"), ("乙欄", "乙欄"), ("入力", "その他")],
};

/// 雇用保険区分 → 雇用保険料
pub static EMPLOYMENT_INSURANCE: Lookup = Lookup {
    name: "雇用保険料",
    entries: &[("あり", "控除する"), ("なし", "控除しない")],
};

/// 給与所得種別 → 賞与
pub static BONUS: Lookup = Lookup {
    name: "賞与",
    entries: &[("給料・賞与", "する"), ("賞与", "する"), ("給与", "しない")],
};

/// 住民税の設定方法 → 住民税の設定
pub static RESIDENT_TAX: Lookup = Lookup {
    name: "住民税の設定",
    entries: &[("通常", "金額設定"), ("月別", "前月コピー")],
};

pub static ALL_LOOKUPS: [&Lookup; 5] = [
    &PAY_TYPE,
    &TAX_TABLE,
    &EMPLOYMENT_INSURANCE,
    &BONUS,
    &RESIDENT_TAX,
];

/// Character removed from the sex descriptor ("男性" → "男").
pub const SEX_SUFFIX: char = '性';

/// Spousal descriptor that adds one dependent.
pub const SPOUSAL_WITHHOLDING_TARGET: &str = "源泉控除対象";

/// Human-readable listing of every table, for the CLI.
pub fn lookups_description() -> String {
    let mut out = String::from("Value translations (unlisted values pass through):\n");
    for lookup in ALL_LOOKUPS.iter() {
        out.push_str(&format!("\n  {}:\n", lookup.name));
        for (from, to) in lookup.entries {
            out.push_str(&format!("    {} → {}\n", from, to));
        }
    }
    out.push_str(&format!("\n  性別: remove '{}'\n", SEX_SUFFIX));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pay_type_translation() {
        assert_eq!(PAY_TYPE.translate(&Cell::from("月給")), Cell::from("月給制"));
        assert_eq!(PAY_TYPE.translate(&Cell::from("日給月給")), Cell::from("月給制"));
        assert_eq!(PAY_TYPE.translate(&Cell::from("日給")), Cell::from("日給制"));
        assert_eq!(PAY_TYPE.translate(&Cell::from("時給")), Cell::from("時間給制"));
    }

    #[test]
    fn test_unknown_value_passes_through() {
        assert_eq!(PAY_TYPE.translate(&Cell::from("特殊給")), Cell::from("特殊給"));
        assert_eq!(BONUS.translate(&Cell::Empty), Cell::Empty);
        assert_eq!(TAX_TABLE.translate(&Cell::Int(1)), Cell::Int(1));
    }

    #[test]
    fn test_translation_is_exact_match() {
        // No trimming or partial matches.
        assert_eq!(EMPLOYMENT_INSURANCE.translate(&Cell::from(" あり")), Cell::from(" あり"));
        assert_eq!(RESIDENT_TAX.translate(&Cell::from("通常月")), Cell::from("通常月"));
    }

    #[test]
    fn test_remaining_tables() {
        assert_eq!(TAX_TABLE.translate(&Cell::from("入力")), Cell::from("その他"));
        assert_eq!(TAX_TABLE.translate(&Cell::from("乙欄")), Cell::from("乙欄"));
        assert_eq!(EMPLOYMENT_INSURANCE.translate(&Cell::from("なし")), Cell::from("控除しない"));
        assert_eq!(BONUS.translate(&Cell::from("給料・賞与")), Cell::from("する"));
        assert_eq!(BONUS.translate(&Cell::from("給与")), Cell::from("しない"));
        assert_eq!(RESIDENT_TAX.translate(&Cell::from("月別")), Cell::from("前月コピー"));
    }

    #[test]
    fn test_description_lists_every_entry() {
        let desc = lookups_description();
        let entries: usize = ALL_LOOKUPS.iter().map(|l| l.entries.len()).sum();
        assert_eq!(desc.matches('→').count(), entries);
    }
}
