//! Countdown text derived from server timestamps and the local clock.

pub const PLACEHOLDER: &str = "--:--:--";

/// `HH:MM:SS` until `target_ms`. Hours are not capped at 99.
pub fn until(target_ms: Option<i64>, now_ms: i64) -> String {
    match target_ms {
        Some(target) if target != 0 => {
            let secs = target.saturating_sub(now_ms).max(0) / 1000;
            format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
        }
        _ => PLACEHOLDER.to_owned(),
    }
}

pub fn remaining_secs(end_unix: i64, now_secs: i64) -> u64 {
    u64::try_from(end_unix.saturating_sub(now_secs)).unwrap_or(0)
}

/// `45s`, `2m 5s`, `1h 30m`: only non-zero sub-units are printed.
pub fn compact(secs: u64) -> String {
    if secs < 60 {
        return format!("{secs}s");
    }

    let (m, s) = (secs / 60, secs % 60);
    let seconds = if s > 0 { format!(" {s}s") } else { String::new() };
    if m < 60 {
        return format!("{m}m{seconds}");
    }

    let (h, m) = (m / 60, m % 60);
    let minutes = if m > 0 { format!(" {m}m") } else { String::new() };
    format!("{h}h{minutes}{seconds}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_bands() {
        assert_eq!(compact(0), "0s");
        assert_eq!(compact(59), "59s");
        assert_eq!(compact(60), "1m");
        assert_eq!(compact(61), "1m 1s");
        assert_eq!(compact(3599), "59m 59s");
        assert_eq!(compact(3600), "1h");
        assert_eq!(compact(3601), "1h 1s");
        assert_eq!(compact(3660), "1h 1m");
        assert_eq!(compact(3661), "1h 1m 1s");
        assert_eq!(compact(90_000), "25h");
    }

    #[test]
    fn until_target() {
        let now = 1_700_000_000_000;
        assert_eq!(until(Some(now), now), "00:00:00");
        assert_eq!(until(Some(now - 5_000), now), "00:00:00");
        assert_eq!(until(Some(now + 3_661_000), now), "01:01:01");
        assert_eq!(until(Some(now + 999), now), "00:00:00");
        assert_eq!(until(Some(now + 100 * 3_600_000), now), "100:00:00");
    }

    #[test]
    fn until_absent() {
        assert_eq!(until(None, 0), PLACEHOLDER);
        assert_eq!(until(Some(0), 1_000), PLACEHOLDER);
    }

    #[test]
    fn remaining_never_negative() {
        assert_eq!(remaining_secs(100, 40), 60);
        assert_eq!(remaining_secs(100, 100), 0);
        assert_eq!(remaining_secs(100, 400), 0);
    }
}
