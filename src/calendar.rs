//! Calendar arithmetic on local wall-clock instants.
//!
//! Everything in the layout engine is expressed as `NaiveDateTime`: there is
//! no timezone conversion, a date is whatever the wall clock says.

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Calendar units understood by [`add`], [`diff`] and [`start_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

/// Date-time layouts tried before the configured date pattern.
const DATE_TIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Bare-date layouts tried after the configured pattern.
const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d", "%m-%d-%Y",
];

/// Midnight at the start of today, local time.
pub fn today() -> NaiveDateTime {
    Local::now().date_naive().and_time(NaiveTime::MIN)
}

/// The current local wall-clock instant.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse a date or date-time string.
///
/// `pattern` is a token pattern such as `YYYY-MM-DD` and is used for bare
/// dates. Returns `None` for empty or unparseable input.
pub fn parse(text: &str, pattern: &str) -> Option<NaiveDateTime> {
    parse_detailed(text, pattern).map(|parsed| parsed.at)
}

/// An instant read from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
    pub at: NaiveDateTime,
    /// The text named a calendar date with no time of day.
    pub date_only: bool,
}

/// Like [`parse`], but also reports whether a time of day was written.
pub fn parse_detailed(text: &str, pattern: &str) -> Option<Parsed> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for layout in DATE_TIME_LAYOUTS {
        if let Ok(at) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(Parsed { at, date_only: false });
        }
    }

    let configured = to_chrono_pattern(pattern);
    std::iter::once(configured.as_str())
        .chain(DATE_LAYOUTS.iter().copied())
        .find_map(|layout| NaiveDate::parse_from_str(text, layout).ok())
        .map(|d| Parsed {
            at: d.and_time(NaiveTime::MIN),
            date_only: true,
        })
}

/// Add `qty` units to `date`. Month and year steps clamp to the last day of
/// the target month; out-of-range results leave `date` unchanged.
pub fn add(date: NaiveDateTime, qty: i64, unit: Unit) -> NaiveDateTime {
    let result = match unit {
        Unit::Second => date.checked_add_signed(Duration::seconds(qty)),
        Unit::Minute => date.checked_add_signed(Duration::minutes(qty)),
        Unit::Hour => date.checked_add_signed(Duration::hours(qty)),
        Unit::Day => date.checked_add_signed(Duration::days(qty)),
        Unit::Month => add_months(date, qty),
        Unit::Year => qty.checked_mul(12).and_then(|months| add_months(date, months)),
    };
    result.unwrap_or(date)
}

fn add_months(date: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// Whole units elapsed from `b` to `a`, rounded towards negative infinity.
///
/// Months are 30 days and years are 12 such months, so this is a duration
/// measure rather than a calendar count.
pub fn diff(a: NaiveDateTime, b: NaiveDateTime, unit: Unit) -> i64 {
    let millis = (a - b).num_milliseconds() as f64;
    let seconds = millis / 1000.0;
    let value = match unit {
        Unit::Second => seconds,
        Unit::Minute => seconds / 60.0,
        Unit::Hour => seconds / 3600.0,
        Unit::Day => seconds / 86_400.0,
        Unit::Month => seconds / 86_400.0 / 30.0,
        Unit::Year => seconds / 86_400.0 / 30.0 / 12.0,
    };
    value.floor() as i64
}

/// Truncate `date` to the beginning of `unit`.
pub fn start_of(date: NaiveDateTime, unit: Unit) -> NaiveDateTime {
    let day = date.date();
    match unit {
        Unit::Year => first_of_month(day.year(), 1).unwrap_or(day).and_time(NaiveTime::MIN),
        Unit::Month => first_of_month(day.year(), day.month())
            .unwrap_or(day)
            .and_time(NaiveTime::MIN),
        Unit::Day => day.and_time(NaiveTime::MIN),
        Unit::Hour => day.and_time(
            NaiveTime::from_hms_opt(date.hour(), 0, 0).unwrap_or(NaiveTime::MIN),
        ),
        Unit::Minute => day.and_time(
            NaiveTime::from_hms_opt(date.hour(), date.minute(), 0).unwrap_or(NaiveTime::MIN),
        ),
        Unit::Second => date.with_nanosecond(0).unwrap_or(date),
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDateTime) -> u32 {
    let (year, month) = (date.year(), date.month());
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (first_of_month(year, month), first_of_month(next_year, next_month)) {
        (Some(this), Some(next)) => (next - this).num_days() as u32,
        _ => 30,
    }
}

/// Translate a token pattern (`YYYY-MM-DD HH:mm`) into a chrono layout.
/// Month-name tokens have no numeric equivalent and are passed through.
pub fn to_chrono_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut rest = pattern;
    while !rest.is_empty() {
        if rest.starts_with("MMM") {
            let run = rest.len() - rest.trim_start_matches('M').len();
            out.push_str(&rest[..run]);
            rest = &rest[run..];
            continue;
        }
        let (token, replacement) = match numeric_token(rest) {
            Some(pair) => pair,
            None => {
                let ch = rest.chars().next().unwrap_or_default();
                if ch == '%' {
                    out.push_str("%%");
                } else {
                    out.push(ch);
                }
                rest = &rest[ch.len_utf8()..];
                continue;
            }
        };
        out.push_str(replacement);
        rest = &rest[token.len()..];
    }
    out
}

fn numeric_token(s: &str) -> Option<(&'static str, &'static str)> {
    const TOKENS: &[(&str, &str)] = &[
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("D", "%-d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("SSS", "%3f"),
    ];
    TOKENS.iter().copied().find(|(token, _)| s.starts_with(token))
}

/// Locale-aware date formatting, consumed by the label formatter.
pub trait DateFormatter {
    fn format(&self, date: NaiveDateTime, pattern: &str, locale: &str) -> String;
}

/// Built-in formatter with month names for a handful of languages.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarFormatter;

impl DateFormatter for CalendarFormatter {
    fn format(&self, date: NaiveDateTime, pattern: &str, locale: &str) -> String {
        let names = month_names(locale);
        let month_name = names[date.month0() as usize];
        let mut out = String::new();
        let mut rest = pattern;

        while !rest.is_empty() {
            let (consumed, text) = if rest.starts_with("YYYY") {
                (4, format!("{:04}", date.year()))
            } else if rest.starts_with("YY") {
                (2, format!("{:02}", date.year().rem_euclid(100)))
            } else if rest.starts_with("MMMM") {
                (4, month_name.to_string())
            } else if rest.starts_with("MMM") {
                (3, month_name.chars().take(3).collect())
            } else if rest.starts_with("MM") {
                (2, format!("{:02}", date.month()))
            } else if rest.starts_with("DD") {
                (2, format!("{:02}", date.day()))
            } else if rest.starts_with('D') {
                (1, date.day().to_string())
            } else if rest.starts_with("HH") {
                (2, format!("{:02}", date.hour()))
            } else if rest.starts_with("mm") {
                (2, format!("{:02}", date.minute()))
            } else if rest.starts_with("ss") {
                (2, format!("{:02}", date.second()))
            } else if rest.starts_with("SSS") {
                (3, format!("{:03}", date.nanosecond() / 1_000_000))
            } else {
                let ch = rest.chars().next().unwrap_or_default();
                (ch.len_utf8(), ch.to_string())
            };
            out.push_str(&text);
            rest = &rest[consumed..];
        }
        out
    }
}

type MonthNames = [&'static str; 12];

const EN: MonthNames = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const ES: MonthNames = [
    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto", "Septiembre",
    "Octubre", "Noviembre", "Diciembre",
];
const FR: MonthNames = [
    "Janvier", "Février", "Mars", "Avril", "Mai", "Juin", "Juillet", "Août", "Septembre",
    "Octobre", "Novembre", "Décembre",
];
const DE: MonthNames = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];
const IT: MonthNames = [
    "Gennaio", "Febbraio", "Marzo", "Aprile", "Maggio", "Giugno", "Luglio", "Agosto",
    "Settembre", "Ottobre", "Novembre", "Dicembre",
];
const PT_BR: MonthNames = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];
const RU: MonthNames = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь",
    "Октябрь", "Ноябрь", "Декабрь",
];
const TR: MonthNames = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];
const ZH: MonthNames = [
    "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月",
    "十二月",
];

/// Month names for a locale tag such as `fr`, `pt-BR` or `de_DE`.
fn month_names(locale: &str) -> &'static MonthNames {
    let tag = locale.trim().to_lowercase().replace('_', "-");
    let lookup = |tag: &str| -> Option<&'static MonthNames> {
        match tag {
            "en" => Some(&EN),
            "es" => Some(&ES),
            "fr" => Some(&FR),
            "de" => Some(&DE),
            "it" => Some(&IT),
            "pt-br" | "ptbr" | "pt" => Some(&PT_BR),
            "ru" => Some(&RU),
            "tr" => Some(&TR),
            "zh" => Some(&ZH),
            _ => None,
        }
    };
    lookup(&tag)
        .or_else(|| tag.split('-').next().and_then(lookup))
        .unwrap_or(&EN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_bare_dates_and_date_times() {
        assert_eq!(parse("2024-01-05", "YYYY-MM-DD"), Some(at(2024, 1, 5, 0, 0)));
        assert_eq!(parse(" 2024-01-05 13:30 ", "YYYY-MM-DD"), Some(at(2024, 1, 5, 13, 30)));
        assert_eq!(parse("2024-01-05T08:15:00", "YYYY-MM-DD"), Some(at(2024, 1, 5, 8, 15)));
        assert_eq!(parse("05.01.2024", "DD.MM.YYYY"), Some(at(2024, 1, 5, 0, 0)));
    }

    #[test]
    fn explicit_midnight_is_not_a_bare_date() {
        let bare = parse_detailed("2024-01-05", "YYYY-MM-DD").unwrap();
        assert!(bare.date_only);
        let timed = parse_detailed("2024-01-05 00:00:00", "YYYY-MM-DD").unwrap();
        assert!(!timed.date_only);
        assert_eq!(timed.at, bare.at);
    }

    #[test]
    fn rejects_garbage_and_blank() {
        assert_eq!(parse("", "YYYY-MM-DD"), None);
        assert_eq!(parse("   ", "YYYY-MM-DD"), None);
        assert_eq!(parse("not a date", "YYYY-MM-DD"), None);
    }

    #[test]
    fn month_addition_clamps_to_month_end() {
        assert_eq!(add(at(2024, 1, 31, 0, 0), 1, Unit::Month), at(2024, 2, 29, 0, 0));
        assert_eq!(add(at(2024, 3, 31, 0, 0), -1, Unit::Month), at(2024, 2, 29, 0, 0));
        assert_eq!(add(at(2024, 2, 29, 0, 0), 1, Unit::Year), at(2025, 2, 28, 0, 0));
        assert_eq!(add(at(2024, 1, 1, 0, 0), -2, Unit::Year), at(2022, 1, 1, 0, 0));
    }

    #[test]
    fn diff_floors_toward_negative_infinity() {
        let a = at(2024, 1, 2, 6, 0);
        let b = at(2024, 1, 1, 0, 0);
        assert_eq!(diff(a, b, Unit::Hour), 30);
        assert_eq!(diff(a, b, Unit::Day), 1);
        assert_eq!(diff(b, a, Unit::Day), -2);
        assert_eq!(diff(at(2040, 1, 1, 0, 0), at(2024, 1, 1, 0, 0), Unit::Year), 16);
    }

    #[test]
    fn start_of_truncates() {
        let d = at(2024, 3, 17, 14, 45);
        assert_eq!(start_of(d, Unit::Year), at(2024, 1, 1, 0, 0));
        assert_eq!(start_of(d, Unit::Month), at(2024, 3, 1, 0, 0));
        assert_eq!(start_of(d, Unit::Day), at(2024, 3, 17, 0, 0));
        assert_eq!(start_of(d, Unit::Hour), at(2024, 3, 17, 14, 0));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(at(2024, 2, 10, 0, 0)), 29);
        assert_eq!(days_in_month(at(2023, 2, 10, 0, 0)), 28);
        assert_eq!(days_in_month(at(2023, 12, 31, 0, 0)), 31);
    }

    #[test]
    fn formats_label_patterns() {
        let f = CalendarFormatter;
        let d = at(2024, 3, 5, 6, 0);
        assert_eq!(f.format(d, "HH", "en"), "06");
        assert_eq!(f.format(d, "D", "en"), "5");
        assert_eq!(f.format(d, "D MMM", "en"), "5 Mar");
        assert_eq!(f.format(d, "MMMM", "en"), "March");
        assert_eq!(f.format(d, "YYYY", "en"), "2024");
        assert_eq!(f.format(d, "MMMM", "fr-FR"), "Mars");
        assert_eq!(f.format(d, "D MMM", "pt-BR"), "5 Mar");
        assert_eq!(f.format(d, "MMMM", "xx"), "March");
    }

    #[test]
    fn token_pattern_translates_to_chrono() {
        assert_eq!(to_chrono_pattern("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(to_chrono_pattern("DD/MM/YYYY HH:mm"), "%d/%m/%Y %H:%M");
    }
}
