use time::format_description::FormatItem;
use time::macros::format_description;
use time::{format_description::well_known::Rfc3339, Date, OffsetDateTime, PrimitiveDateTime};

pub(crate) const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

pub(crate) fn format_date(value: Date) -> String {
    value.format(DATE_FORMAT).unwrap_or_else(|_| value.to_string())
}

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp, keeping
/// only the calendar date in the latter case.
pub(crate) fn parse_date_flexible(raw: &str) -> Option<Date> {
    let trimmed = raw.trim();
    Date::parse(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| OffsetDateTime::parse(trimmed, &Rfc3339).ok().map(|v| v.date()))
}
