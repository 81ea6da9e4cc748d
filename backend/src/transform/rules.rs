//! Per-field conversion rules.
//!
//! Every rule is a pure function of one or more source cells. Strictness is
//! not uniform, and the asymmetry is intentional:
//!
//! - dates are strict: a present value that is not a date is an error
//! - address and title are lenient: a mismatch yields `None` (blank fields)
//!
//! Rules report the offending value as `Err(String)`; the executor attaches
//! row and column information.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::lookup::{SEX_SUFFIX, SPOUSAL_WITHHOLDING_TARGET};
use crate::models::{AddressParts, Cell, TitleParts};

/// The 47 prefectures, in JIS code order.
pub const PREFECTURES: [&str; 47] = [
    "北海道", "青森県", "岩手県", "宮城県", "秋田県", "山形県", "福島県",
    "茨城県", "栃木県", "群馬県", "埼玉県", "千葉県", "東京都", "神奈川県",
    "新潟県", "富山県", "石川県", "福井県", "山梨県", "長野県", "岐阜県",
    "静岡県", "愛知県", "三重県", "滋賀県", "京都府", "大阪府", "兵庫県",
    "奈良県", "和歌山県", "鳥取県", "島根県", "岡山県", "広島県", "山口県",
    "徳島県", "香川県", "愛媛県", "高知県", "福岡県", "佐賀県", "長崎県",
    "熊本県", "大分県", "宮崎県", "鹿児島県", "沖縄県",
];

/// Output date format.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!("^({})(.+?)([0-9０-９].*)$", PREFECTURES.join("|"));
    Regex::new(&pattern).expect("address pattern is valid")
});

static TITLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+):\(.+?\) (.+)").expect("title pattern is valid"));

const TEXT_DATE_FORMATS: [&str; 1] = ["%Y-%m-%d"];
const TEXT_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

// =============================================================================
// Dates
// =============================================================================

/// Normalise a date cell to `YYYY/MM/DD` text.
///
/// Blank stays blank. Date cells and `YYYY-MM-DD` text (optionally with a time
/// of day) are accepted; anything else fails with the offending value.
pub fn normalize_date(cell: &Cell) -> Result<Cell, String> {
    if cell.is_blank() {
        return Ok(Cell::Empty);
    }
    let date = match cell {
        Cell::DateTime(dt) => dt.date(),
        Cell::Text(s) => parse_text_date(s.trim()).ok_or_else(|| s.clone())?,
        other => return Err(other.display()),
    };
    Ok(Cell::Text(date.format(DATE_FORMAT).to_string()))
}

fn parse_text_date(s: &str) -> Option<NaiveDate> {
    TEXT_DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            TEXT_DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

// =============================================================================
// Address & Title
// =============================================================================

/// Split a home address into prefecture, municipality and house number.
///
/// Returns `None` when the address does not start with a prefecture or has no
/// digit after the municipality.
pub fn split_address(address: &str) -> Option<AddressParts> {
    let caps = ADDRESS_PATTERN.captures(address)?;
    Some(AddressParts {
        prefecture: caps[1].to_string(),
        municipality: caps[2].to_string(),
        remainder: caps[3].to_string(),
    })
}

/// Split `"<code>:(<label>) <title>"` into category code and title.
pub fn split_title(composite: &str) -> Option<TitleParts> {
    let caps = TITLE_PATTERN.captures(composite)?;
    Some(TitleParts {
        category: caps[1].to_string(),
        title: caps[2].to_string(),
    })
}

// =============================================================================
// Categorical & Derived
// =============================================================================

/// Strip the sex suffix: "男性" → "男". Non-text passes through.
pub fn normalize_sex(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) => Cell::Text(s.replace(SEX_SUFFIX, "")),
        other => other.clone(),
    }
}

/// 1 when the spousal descriptor marks withholding at source, else 0.
pub fn spousal_withholding_count(cell: &Cell) -> i64 {
    match cell.as_text() {
        Some(SPOUSAL_WITHHOLDING_TARGET) => 1,
        _ => 0,
    }
}

/// Read a dependents count. Blank counts as zero.
pub fn parse_count(cell: &Cell) -> Result<i64, String> {
    match cell {
        Cell::Empty => Ok(0),
        Cell::Int(i) => Ok(*i),
        Cell::Float(f) => float_count(*f).ok_or_else(|| cell.display()),
        Cell::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            let ascii: String = trimmed.chars().map(fold_fullwidth_digit).collect();
            ascii
                .parse::<i64>()
                .or_else(|_| ascii.parse::<f64>().ok().and_then(float_count).ok_or(()))
                .map_err(|_| s.clone())
        }
        other => Err(other.display()),
    }
}

/// Whole floats within `i64` range.
fn float_count(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn fold_fullwidth_digit(c: char) -> char {
    match c {
        '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
        other => other,
    }
}
