//! Spoken date parsing for dictated text.
//!
//! Three forms are recognized, tried in order:
//! - month name: "december fifteen twenty twenty four"
//! - digit sequence: "one two one five two zero two four"
//! - word form: "twelve fifteen twenty twenty four"
//!
//! The first form whose shape matches decides the result. A shape match with
//! out-of-range numbers yields `None` without trying the later forms; the
//! caller's numeric and ISO strategies still run afterwards.
//!
//! The vocabulary stops at "fifty", so anything needing "sixty" and above
//! (e.g. "nineteen sixty five") does not parse.

use chrono::NaiveDate;

/// Number words, zero through nineteen plus tens up to fifty.
pub const NUMBER_WORDS: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
];

/// Month names and abbreviations. Full names first so that "december" is
/// preferred over "dec" at the same position.
const MONTH_NAMES: &[(&str, u32)] = &[
    ("january", 1),
    ("february", 2),
    ("march", 3),
    ("april", 4),
    ("may", 5),
    ("june", 6),
    ("july", 7),
    ("august", 8),
    ("september", 9),
    ("october", 10),
    ("november", 11),
    ("december", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sept", 9),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Which spoken form produced a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpokenForm {
    MonthName,
    DigitSequence,
    WordForm,
}

/// Parse a spoken date, reporting which form matched.
///
/// Returns `None` when no form matches, or when the first matching form
/// produces an invalid calendar date.
pub fn parse_spoken_date(text: &str) -> Option<(NaiveDate, SpokenForm)> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    if let Some((month, rest)) = find_month(&lower) {
        return parse_month_name_form(month, rest).map(|d| (d, SpokenForm::MonthName));
    }

    let tokens: Vec<&str> = lower.split_whitespace().map(strip_punctuation).collect();

    let words: Vec<u32> = tokens.iter().filter_map(|t| lookup_word(t)).collect();
    if words.len() >= 8 {
        return parse_digit_sequence(&words).map(|d| (d, SpokenForm::DigitSequence));
    }

    let numeric: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| number_value(t).is_some())
        .collect();
    if numeric.len() >= 3 {
        return parse_word_form(&numeric).map(|d| (d, SpokenForm::WordForm));
    }

    None
}

/// Parse a spoken year ("twenty twenty four", "two zero two four").
pub fn parse_spoken_year(text: &str) -> Option<i32> {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().map(strip_punctuation).collect();
    year_from_tokens(&tokens)
}

/// Resolve a single number token: up to four digits, a number word, or a hyphenated
/// tens-ones compound like "twenty-four".
pub fn number_value(token: &str) -> Option<u32> {
    if !token.is_empty() && token.len() <= 4 && token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse().ok();
    }
    if let Some(value) = lookup_word(token) {
        return Some(value);
    }

    let (tens, ones) = token.split_once('-')?;
    let tens = lookup_word(tens).filter(|v| *v >= 20 && v % 10 == 0)?;
    let ones = lookup_word(ones).filter(|v| (1..=9).contains(v))?;
    Some(tens + ones)
}

fn lookup_word(token: &str) -> Option<u32> {
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, value)| *value)
}

fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| matches!(c, ',' | '.' | ';' | ':' | '!' | '?'))
}

/// Earliest month name in the text; at equal positions the longer name wins.
/// Returns the month and the text following the name.
fn find_month(lower: &str) -> Option<(u32, &str)> {
    let mut best: Option<(usize, usize, u32)> = None;

    for (name, month) in MONTH_NAMES {
        if let Some(pos) = lower.find(name) {
            let better = match best {
                None => true,
                Some((best_pos, best_len, _)) => {
                    pos < best_pos || (pos == best_pos && name.len() > best_len)
                }
            };
            if better {
                best = Some((pos, name.len(), *month));
            }
        }
    }

    best.map(|(pos, len, month)| (month, &lower[pos + len..]))
}

fn parse_month_name_form(month: u32, rest: &str) -> Option<NaiveDate> {
    let mut tokens = rest.split_whitespace().map(strip_punctuation);

    let day = day_value(tokens.next()?)?;
    let year_tokens: Vec<&str> = tokens.filter(|t| !t.is_empty()).collect();
    let year = year_from_tokens(&year_tokens)?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Day token: digits (optionally with an ordinal suffix) or a number word.
fn day_value(token: &str) -> Option<u32> {
    let token = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| {
            token
                .strip_suffix(suffix)
                .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        })
        .unwrap_or(token);

    number_value(token).filter(|d| (1..=31).contains(d))
}

fn parse_digit_sequence(words: &[u32]) -> Option<NaiveDate> {
    let concat = |values: &[u32]| -> Option<u32> {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<String>()
            .parse()
            .ok()
    };

    let month = concat(&words[0..2])?;
    let day = concat(&words[2..4])?;
    let year = i32::try_from(concat(&words[4..8])?).ok()?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_word_form(tokens: &[&str]) -> Option<NaiveDate> {
    let month = number_value(tokens[0]).filter(|m| (1..=12).contains(m))?;
    let day = number_value(tokens[1]).filter(|d| (1..=31).contains(d))?;
    let year = year_from_tokens(&tokens[2..])?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn year_from_tokens(tokens: &[&str]) -> Option<i32> {
    let values: Vec<u32> = tokens
        .iter()
        .map(|t| number_value(t))
        .collect::<Option<_>>()?;

    let year = match values.as_slice() {
        [century, tens, ones] => century * 100 + tens + ones,
        [century, rest] => century * 100 + rest,
        [a, b, c, d] if values.iter().all(|v| *v <= 9) => a * 1000 + b * 100 + c * 10 + d,
        _ => return None,
    };

    i32::try_from(year)
        .ok()
        .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
}
