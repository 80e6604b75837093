use anyhow::{Context, Result, bail};
use jiff::civil::Date;
use jiff::{Span, Zoned};

/// Today's local date as `YYYY-MM-DD`, the default value of the date selector.
pub fn today() -> String {
    Zoned::now().date().strftime("%Y-%m-%d").to_string()
}

/// Parse a date selector value. Only canonical `YYYY-MM-DD` is accepted.
pub fn parse_date(value: &str) -> Result<Date> {
    let value = value.trim();
    let date: Date = value
        .parse()
        .with_context(|| format!("'{}' is not a valid date", value))?;
    if date.strftime("%Y-%m-%d").to_string() != value {
        bail!("'{}' is not a YYYY-MM-DD date", value);
    }
    Ok(date)
}

/// Move a `YYYY-MM-DD` value by `days` (negative goes back).
pub fn shift_date(value: &str, days: i64) -> Result<String> {
    let date = parse_date(value)?;
    let shifted = date
        .checked_add(Span::new().days(days))
        .with_context(|| format!("cannot move {} by {} days", value, days))?;
    Ok(shifted.strftime("%Y-%m-%d").to_string())
}
