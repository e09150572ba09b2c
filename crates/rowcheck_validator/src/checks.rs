//! Reusable value checks.
//!
//! Each factory returns a closure suitable for
//! [`Validator::add_value_check`](crate::Validator::add_value_check).
//! Factories that take patterns or bounds validate them up front and return
//! a [`ConfigError`] instead of failing on the first row.
//!
//! Numeric checks trim surrounding whitespace before parsing; every other
//! check sees the value exactly as it appears in the row.

use crate::ValueError;
use chrono::NaiveDateTime;
use chrono::format::{ParseResult, Parsed, StrftimeItems, parse};
use regex::Regex;
use rowcheck_core::ConfigError;
use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

/// Accepts integer literals of any magnitude: an optional sign followed by
/// decimal digits, which may be grouped with single underscores.
pub fn int_value(value: &str) -> Result<(), ValueError> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    let is_integer = !digits.is_empty()
        && digits
            .split('_')
            .all(|group| !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()));

    if is_integer {
        Ok(())
    } else {
        Err(ValueError::invalid(format!("'{value}' is not an integer")))
    }
}

/// Accepts values that parse as a floating point number.
pub fn float_value(value: &str) -> Result<(), ValueError> {
    value.trim().parse::<f64>()?;
    Ok(())
}

/// Accepts only the listed values.
///
/// # Errors
///
/// Returns `ConfigError::EmptyEnumeration` if no values are given.
///
/// # Example
///
/// ```rust
/// use rowcheck_validator::checks::enumeration;
///
/// let gender = enumeration(["M", "F"]).unwrap();
/// assert!(gender("M").is_ok());
/// assert!(gender("X").is_err());
/// ```
pub fn enumeration<I, S>(
    values: I,
) -> Result<impl Fn(&str) -> Result<(), ValueError>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: HashSet<String> = values.into_iter().map(Into::into).collect();
    if allowed.is_empty() {
        return Err(ConfigError::EmptyEnumeration);
    }

    Ok(move |value: &str| {
        if allowed.contains(value) {
            Ok(())
        } else {
            Err(ValueError::invalid(format!("'{value}' is not an allowed value")))
        }
    })
}

/// Accepts values where `pattern` matches at the start of the value.
///
/// The match does not have to cover the whole value; anchor the pattern
/// with `$` for that.
pub fn match_pattern(
    pattern: &str,
) -> Result<impl Fn(&str) -> Result<(), ValueError> + use<>, ConfigError> {
    let regex = compile(pattern)?;

    Ok(move |value: &str| match regex.find(value) {
        Some(found) if found.start() == 0 => Ok(()),
        _ => Err(ValueError::invalid(format!(
            "'{value}' does not match pattern '{}'",
            regex.as_str()
        ))),
    })
}

/// Accepts values where `pattern` matches anywhere in the value.
pub fn search_pattern(
    pattern: &str,
) -> Result<impl Fn(&str) -> Result<(), ValueError> + use<>, ConfigError> {
    let regex = compile(pattern)?;

    Ok(move |value: &str| {
        if regex.is_match(value) {
            Ok(())
        } else {
            Err(ValueError::invalid(format!(
                "'{value}' does not contain pattern '{}'",
                regex.as_str()
            )))
        }
    })
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::invalid_pattern(pattern, e))
}

/// Accepts numbers with `min <= value <= max`, parsed with [`FromStr`].
///
/// # Example
///
/// ```rust
/// use rowcheck_validator::checks::number_range_inclusive;
///
/// let age = number_range_inclusive(0_i64, 120);
/// assert!(age("0").is_ok());
/// assert!(age("120").is_ok());
/// assert!(age("121").is_err());
/// assert!(age("1.5").is_err());
/// ```
pub fn number_range_inclusive<T>(min: T, max: T) -> impl Fn(&str) -> Result<(), ValueError>
where
    T: FromStr + PartialOrd + 'static,
    T::Err: Display,
{
    number_range_inclusive_with(min, max, parse_number::<T>)
}

/// Accepts numbers with `min < value < max`, parsed with [`FromStr`].
pub fn number_range_exclusive<T>(min: T, max: T) -> impl Fn(&str) -> Result<(), ValueError>
where
    T: FromStr + PartialOrd + 'static,
    T::Err: Display,
{
    number_range_exclusive_with(min, max, parse_number::<T>)
}

/// Inclusive range check with an explicit coercion.
///
/// A value the coercion rejects fails the check.
pub fn number_range_inclusive_with<T, C>(
    min: T,
    max: T,
    coerce: C,
) -> impl Fn(&str) -> Result<(), ValueError>
where
    T: PartialOrd + 'static,
    C: Fn(&str) -> Result<T, ValueError> + 'static,
{
    move |value: &str| {
        let number = coerce(value)?;
        if min <= number && number <= max {
            Ok(())
        } else {
            Err(out_of_range(value))
        }
    }
}

/// Exclusive range check with an explicit coercion.
pub fn number_range_exclusive_with<T, C>(
    min: T,
    max: T,
    coerce: C,
) -> impl Fn(&str) -> Result<(), ValueError>
where
    T: PartialOrd + 'static,
    C: Fn(&str) -> Result<T, ValueError> + 'static,
{
    move |value: &str| {
        let number = coerce(value)?;
        if min < number && number < max {
            Ok(())
        } else {
            Err(out_of_range(value))
        }
    }
}

fn parse_number<T>(value: &str) -> Result<T, ValueError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ValueError::invalid(format!("'{value}': {e}")))
}

fn out_of_range(value: &str) -> ValueError {
    ValueError::invalid(format!("'{value}' is out of range"))
}

/// Accepts values that parse with the strftime-style `format`.
///
/// # Example
///
/// ```rust
/// use rowcheck_validator::checks::datetime_string;
///
/// let date = datetime_string("%Y-%m-%d");
/// assert!(date("1999-09-09").is_ok());
/// assert!(date("1999-13-09").is_err());
/// ```
pub fn datetime_string(format: &str) -> impl Fn(&str) -> Result<(), ValueError> + use<> {
    let format = format.to_string();
    move |value: &str| {
        parse_datetime(value, &format)?;
        Ok(())
    }
}

/// Accepts date/times with `min <= value <= max`.
///
/// Bounds use the same format as the values.
///
/// # Errors
///
/// Returns `ConfigError::InvalidBound` if a bound does not parse with
/// `format`.
pub fn datetime_range_inclusive(
    min: &str,
    max: &str,
    format: &str,
) -> Result<impl Fn(&str) -> Result<(), ValueError> + use<>, ConfigError> {
    let format = format.to_string();
    let min = parse_bound(min, &format)?;
    let max = parse_bound(max, &format)?;

    Ok(move |value: &str| {
        let datetime = parse_datetime(value, &format)?;
        if min <= datetime && datetime <= max {
            Ok(())
        } else {
            Err(out_of_range(value))
        }
    })
}

/// Accepts date/times with `min < value < max`.
pub fn datetime_range_exclusive(
    min: &str,
    max: &str,
    format: &str,
) -> Result<impl Fn(&str) -> Result<(), ValueError> + use<>, ConfigError> {
    let format = format.to_string();
    let min = parse_bound(min, &format)?;
    let max = parse_bound(max, &format)?;

    Ok(move |value: &str| {
        let datetime = parse_datetime(value, &format)?;
        if min < datetime && datetime < max {
            Ok(())
        } else {
            Err(out_of_range(value))
        }
    })
}

fn parse_bound(bound: &str, format: &str) -> Result<NaiveDateTime, ConfigError> {
    parse_datetime(bound, format).map_err(|e| ConfigError::invalid_bound(bound, e))
}

/// Parses a date/time with a strftime-style format.
///
/// Fields the format leaves out default to 1900-01-01 00:00, so partial
/// formats such as `%Y-%m`, `%d/%m` or `%H:%M` are accepted.
fn parse_datetime(value: &str, format: &str) -> ParseResult<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, value, StrftimeItems::new(format))?;
    fill_missing_fields(&mut parsed)?;
    parsed.to_naive_datetime_with_offset(0)
}

fn fill_missing_fields(parsed: &mut Parsed) -> ParseResult<()> {
    let week_based = parsed.isoyear().is_some()
        || parsed.isoweek().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some();

    if parsed.year().is_none()
        && parsed.year_div_100().is_none()
        && parsed.year_mod_100().is_none()
        && parsed.isoyear().is_none()
    {
        parsed.set_year(1900)?;
    }
    if !week_based && parsed.ordinal().is_none() {
        if parsed.month().is_none() {
            parsed.set_month(1)?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1)?;
        }
    }

    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0)?,
        // %p without an hour
        (Some(_), None) => parsed.set_hour12(12)?,
        // %I without %p
        (None, Some(_)) => parsed.set_ampm(false)?,
        (Some(_), Some(_)) => {}
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    Ok(())
}
