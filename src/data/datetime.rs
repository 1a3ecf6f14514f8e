use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::model::{Derived, Table};

/// Numeric date layouts, day-first. Two-digit years are tried before
/// four-digit ones because `%Y` would happily read `25` as year 25.
const DATE_FORMATS: &[&str] = &[
    "%d-%m-%y", "%d-%m-%Y", "%d/%m/%y", "%d/%m/%Y", "%d.%m.%y", "%d.%m.%Y", "%Y-%m-%d",
    "%Y/%m/%d", "%Y.%m.%d",
];

const ISO_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

// ---------------------------------------------------------------------------
// Column designation
// ---------------------------------------------------------------------------

/// Names of the columns that may carry date and time information.
/// Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeColumns {
    /// Calendar date, e.g. `19-12-2025`.
    pub date: Option<String>,
    /// Broadcast time slot, e.g. `20.00 - 21.00`.
    pub slot: Option<String>,
    /// Combined date and time in one cell.
    pub datetime: Option<String>,
    /// Time of day, combined with `date` when `datetime` is not set.
    pub time: Option<String>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Return a copy of `table` with [`Derived`] values attached to every row.
///
/// Never fails: cells that cannot be parsed leave the matching derived value
/// empty. Designated columns that do not exist in the table are ignored here
/// and reported by the filter mode that needs them.
pub fn normalize(table: &Table, columns: &TimeColumns) -> Table {
    let index = |name: &Option<String>| name.as_deref().and_then(|n| table.column_index(n));
    let date_idx = index(&columns.date);
    let slot_idx = index(&columns.slot);
    let datetime_idx = index(&columns.datetime);
    let time_idx = index(&columns.time);

    let mut unparsed_dates = 0usize;
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let datetime = match (datetime_idx, date_idx, time_idx) {
                (Some(dt), _, _) => parse_datetime(table.cell(row, dt)),
                (None, Some(d), Some(t)) => parse_datetime(&format!(
                    "{} {}",
                    table.cell(row, d).trim(),
                    table.cell(row, t).trim()
                )),
                _ => None,
            };

            let date = match date_idx {
                Some(d) => parse_date(table.cell(row, d)),
                None => datetime.map(|dt| dt.date()),
            };
            if date.is_none() && (date_idx.is_some() || datetime_idx.is_some()) {
                unparsed_dates += 1;
            }

            let slot_start = slot_idx
                .and_then(|s| parse_slot(table.cell(row, s)))
                .map(|(start, _)| start);

            let mut out = row.clone();
            out.derived = Some(Derived {
                normalized_date: date.map(canonical_date).unwrap_or_default(),
                datetime,
                slot_start,
            });
            out
        })
        .collect();

    if unparsed_dates > 0 {
        log::debug!("{unparsed_dates} row(s) without a parseable date");
    }
    table.with_rows(rows)
}

/// The canonical `DD-MM-YYYY` rendering used for comparison and display.
pub fn canonical_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse free-form date text, preferring day-month-year.
///
/// Accepts numeric dates (`19-12-2025`, `19/12/25`, `2025-12-19`), month
/// names in Dutch or English (`vrijdag 19 december 2025`), and datetime text
/// (the time part is dropped).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_date_only(text).or_else(|| parse_datetime(text).map(|dt| dt.date()))
}

fn parse_date_only(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| parse_named_month(text))
}

/// `19 december 2025`, `maandag 29 dec 2025`, `19-dec-25`.
///
/// Words that are not a month (weekdays, filler) are skipped; the first
/// word that names a month decides it.
fn parse_named_month(text: &str) -> Option<NaiveDate> {
    let mut month = None;
    let mut numbers = Vec::new();
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        if let Ok(n) = token.parse::<i32>() {
            numbers.push(n);
        } else if month.is_none() {
            month = month_from_name(token);
        }
    }

    let (day, year) = match numbers.as_slice() {
        [day, year, ..] => (*day, *year),
        _ => return None,
    };
    let year = if (0..100).contains(&year) { year + 2000 } else { year };
    NaiveDate::from_ymd_opt(year, month?, u32::try_from(day).ok()?)
}

/// Full Dutch and English month names plus their usual abbreviations.
#[rustfmt::skip]
const MONTH_NAMES: &[(&str, u32)] = &[
    ("januari", 1), ("january", 1), ("jan", 1),
    ("februari", 2), ("february", 2), ("feb", 2),
    ("maart", 3), ("march", 3), ("mrt", 3), ("mar", 3),
    ("april", 4), ("apr", 4),
    ("mei", 5), ("may", 5),
    ("juni", 6), ("june", 6), ("jun", 6),
    ("juli", 7), ("july", 7), ("jul", 7),
    ("augustus", 8), ("august", 8), ("aug", 8),
    ("september", 9), ("sept", 9), ("sep", 9),
    ("oktober", 10), ("october", 10), ("okt", 10), ("oct", 10),
    ("november", 11), ("nov", 11),
    ("december", 12), ("dec", 12),
];

fn month_from_name(word: &str) -> Option<u32> {
    let word = word.to_lowercase();
    MONTH_NAMES
        .iter()
        .find(|(name, _)| *name == word)
        .map(|&(_, month)| month)
}

// ---------------------------------------------------------------------------
// Times
// ---------------------------------------------------------------------------

/// Parse a combined date and time, day-first. A bare date yields midnight.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(dt) = ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt);
    }

    if let Some((date_part, time_part)) = text.rsplit_once(char::is_whitespace) {
        if let (Some(date), Some(time)) = (parse_date_only(date_part.trim()), parse_time(time_part)) {
            return Some(date.and_time(time));
        }
    }

    parse_date_only(text).map(|date| date.and_time(NaiveTime::MIN))
}

/// Parse a time of day written `HH:MM`, `HH:MM:SS`, `HH.MM` or bare `HH`.
///
/// `24:00` is read as midnight so that the last slot of a day still parses.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim().replace('.', ":");
    if text.is_empty() {
        return None;
    }
    if matches!(text.as_str(), "24" | "24:00" | "24:00:00") {
        return Some(NaiveTime::MIN);
    }
    if text.len() <= 2 && text.chars().all(|c| c.is_ascii_digit()) {
        return NaiveTime::from_hms_opt(text.parse().ok()?, 0, 0);
    }
    ["%H:%M:%S", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&text, fmt).ok())
}

/// Split a slot label such as `20.00 – 21.00` into its start and end.
///
/// En and em dashes count as hyphens. Labels with fewer than two parts, or
/// with a part that is not a time, yield `None`; parts past the second are
/// ignored.
pub fn parse_slot(label: &str) -> Option<(NaiveTime, NaiveTime)> {
    let normalized = label.replace(['\u{2013}', '\u{2014}'], "-");
    let mut parts = normalized.split('-');
    let start = parse_time(parts.next()?)?;
    let end = parse_time(parts.next()?)?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn different_spellings_share_canonical_form() {
        for raw in ["2025-12-19", "19-12-2025", "19/12/2025", "19.12.2025", "19-12-25"] {
            let parsed = parse_date(raw).unwrap_or_else(|| panic!("{raw} should parse"));
            assert_eq!(canonical_date(parsed), "19-12-2025", "{raw}");
        }
    }

    #[test]
    fn ambiguous_dates_are_day_first() {
        assert_eq!(parse_date("03-04-2025"), Some(date(2025, 4, 3)));
        assert_eq!(parse_date("03/04/2025"), Some(date(2025, 4, 3)));
    }

    #[test]
    fn month_names_are_understood() {
        assert_eq!(parse_date("19 december 2025"), Some(date(2025, 12, 19)));
        assert_eq!(parse_date("za 27 dec 2025"), Some(date(2025, 12, 27)));
        assert_eq!(parse_date("1 mei 2025"), Some(date(2025, 5, 1)));
        assert_eq!(parse_date("1 okt 25"), Some(date(2025, 10, 1)));
        assert_eq!(parse_date("7 March 2025"), Some(date(2025, 3, 7)));
    }

    #[test]
    fn weekday_names_do_not_pick_the_month() {
        assert_eq!(parse_date("maandag 29 december 2025"), Some(date(2025, 12, 29)));
        assert_eq!(parse_date("ma 29 dec 2025"), Some(date(2025, 12, 29)));
        assert_eq!(parse_date("Monday, 29 December 2025"), Some(date(2025, 12, 29)));
        assert_eq!(parse_date("woensdag 31 dec 25"), Some(date(2025, 12, 31)));
        assert_eq!(parse_date("maandag 29 2025"), None);
    }

    #[test]
    fn garbage_dates_are_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("morgen"), None);
        assert_eq!(parse_date("31-02-2025"), None);
    }

    #[test]
    fn datetime_text_yields_its_date() {
        assert_eq!(parse_date("2025-12-19 00:00:00"), Some(date(2025, 12, 19)));
    }

    #[test]
    fn datetimes_accept_both_separators() {
        let expected = date(2025, 12, 25).and_time(time(20, 30));
        assert_eq!(parse_datetime("25-12-2025 20:30"), Some(expected));
        assert_eq!(parse_datetime("25-12-2025 20.30"), Some(expected));
        assert_eq!(parse_datetime("2025-12-25T20:30:00"), Some(expected));
        assert_eq!(parse_datetime("25 december 2025 20:30"), Some(expected));
        assert_eq!(
            parse_datetime("25-12-2025"),
            Some(date(2025, 12, 25).and_time(NaiveTime::MIN))
        );
        assert_eq!(parse_datetime("25-12-2025 laat"), None);
        assert_eq!(
            parse_datetime("25-12-2025 20"),
            Some(date(2025, 12, 25).and_time(time(20, 0)))
        );
        assert_eq!(
            parse_datetime("25 december 2025"),
            Some(date(2025, 12, 25).and_time(NaiveTime::MIN))
        );
    }

    #[test]
    fn times_parse_in_all_spellings() {
        assert_eq!(parse_time("20.00"), Some(time(20, 0)));
        assert_eq!(parse_time(" 9:15 "), Some(time(9, 15)));
        assert_eq!(parse_time("20:00:00"), Some(time(20, 0)));
        assert_eq!(parse_time("7"), Some(time(7, 0)));
        assert_eq!(parse_time("24.00"), Some(NaiveTime::MIN));
        assert_eq!(parse_time("avond"), None);
        assert_eq!(parse_time("25:00"), None);
    }

    #[test]
    fn slots_tolerate_dash_variants_and_spacing() {
        let expected = Some((time(20, 0), time(21, 0)));
        assert_eq!(parse_slot("20.00 - 21.00"), expected);
        assert_eq!(parse_slot("20.00-21.00"), expected);
        assert_eq!(parse_slot("  20.00 \u{2013} 21.00  "), expected);
        assert_eq!(parse_slot("20:00\u{2014}21:00"), expected);
        assert_eq!(parse_slot("20.00 - 21.00 - 22.00"), expected);
    }

    #[test]
    fn broken_slots_are_none() {
        assert_eq!(parse_slot("20.00"), None);
        assert_eq!(parse_slot(""), None);
        assert_eq!(parse_slot("20.00 - laat"), None);
        assert_eq!(parse_slot("nacht - 01.00"), None);
    }

    #[test]
    fn normalize_uses_date_and_slot_columns() {
        let table = Table::from_records(
            &["Titel", "Datum", "Tijdsvak"],
            &[
                vec!["A", "2025-12-19", "20.00 - 21.00"],
                vec!["B", "onbekend", "laat"],
            ],
        );
        let cols = TimeColumns {
            date: Some("datum".into()),
            slot: Some("Tijdsvak".into()),
            ..Default::default()
        };
        let out = normalize(&table, &cols);
        assert_eq!(out.columns, table.columns);

        let a = out.rows[0].derived.as_ref().unwrap();
        assert_eq!(a.normalized_date, "19-12-2025");
        assert_eq!(a.slot_start, Some(time(20, 0)));
        assert_eq!(a.datetime, None);

        let b = out.rows[1].derived.as_ref().unwrap();
        assert_eq!(b.normalized_date, "");
        assert_eq!(b.slot_start, None);
        assert_eq!(out.rows[1].cells, table.rows[1].cells);
    }

    #[test]
    fn normalize_prefers_combined_datetime_column() {
        let table = Table::from_records(
            &["Moment", "Datum", "Tijd"],
            &[vec!["19-12-2025 08:00", "20-12-2025", "09:00"]],
        );
        let cols = TimeColumns {
            datetime: Some("Moment".into()),
            date: Some("Datum".into()),
            time: Some("Tijd".into()),
            ..Default::default()
        };
        let out = normalize(&table, &cols);
        let derived = out.rows[0].derived.as_ref().unwrap();
        assert_eq!(derived.datetime, Some(date(2025, 12, 19).and_time(time(8, 0))));
        assert_eq!(derived.normalized_date, "20-12-2025");
    }

    #[test]
    fn normalize_joins_date_and_time_columns() {
        let table = Table::from_records(
            &["Datum", "Tijd"],
            &[vec![" 20-12-2025 ", " 9.30 "], vec!["20-12-2025", "20"]],
        );
        let cols = TimeColumns {
            date: Some("Datum".into()),
            time: Some("Tijd".into()),
            ..Default::default()
        };
        let out = normalize(&table, &cols);
        assert_eq!(
            out.rows[0].datetime(),
            Some(date(2025, 12, 20).and_time(time(9, 30)))
        );
        assert_eq!(
            out.rows[1].datetime(),
            Some(date(2025, 12, 20).and_time(time(20, 0)))
        );
    }

    #[test]
    fn normalize_takes_date_from_datetime_when_no_date_column() {
        let table = Table::from_records(&["Moment"], &[vec!["2025-12-31T23:00:00"]]);
        let cols = TimeColumns {
            datetime: Some("Moment".into()),
            ..Default::default()
        };
        let out = normalize(&table, &cols);
        assert_eq!(out.rows[0].normalized_date(), "31-12-2025");
    }

    #[test]
    fn normalize_ignores_undeclared_columns() {
        let table = Table::from_records(&["Titel"], &[vec!["A"]]);
        let out = normalize(&table, &TimeColumns::default());
        let derived = out.rows[0].derived.as_ref().unwrap();
        assert_eq!(derived, &Derived::default());
    }
}
