use chrono::FixedOffset;

pub(crate) const SECOND_MS: i64 = 1_000;
pub(crate) const MINUTE_MS: i64 = 60 * SECOND_MS;
pub(crate) const HOUR_MS: i64 = 60 * MINUTE_MS;
pub(crate) const DAY_MS: i64 = 24 * HOUR_MS;

pub(crate) fn offset_ms(offset: FixedOffset) -> i64 {
    i64::from(offset.local_minus_utc()) * SECOND_MS
}

/// Epoch instant of the local midnight that starts the day containing `instant`.
pub(crate) fn local_midnight(instant: i64, offset: FixedOffset) -> i64 {
    let local = instant + offset_ms(offset);
    local - local.rem_euclid(DAY_MS) - offset_ms(offset)
}

/// Position of `instant` within a repeating local cycle of length `modulo`.
pub(crate) fn local_phase(instant: i64, modulo: i64, offset: FixedOffset) -> i64 {
    (instant + offset_ms(offset)).rem_euclid(modulo)
}
