use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::TimerError;

static FORMAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:[0-9]+[hms])+$").unwrap());
static COMPONENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)([hms])").unwrap());

/// Parse a time value such as `1h20m30s`, `70m` or `2m200s`.
///
/// Components may appear in any order, repeat, and exceed their natural
/// range; they are summed. A total of zero is rejected.
pub fn parse(input: &str) -> Result<Duration, TimerError> {
    let invalid = |reason: &'static str| TimerError::DurationParse {
        input: input.to_string(),
        reason,
    };

    if input.is_empty() {
        return Err(invalid("empty time value"));
    }
    if !FORMAT.is_match(input) {
        return Err(invalid("expected <N>h<N>m<N>s"));
    }

    let mut total: u64 = 0;
    for caps in COMPONENT.captures_iter(input) {
        let value: u64 = caps[1].parse().map_err(|_| invalid("number too large"))?;
        let scale = match &caps[2] {
            "h" => 3600,
            "m" => 60,
            _ => 1,
        };
        total = value
            .checked_mul(scale)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| invalid("number too large"))?;
    }

    if total == 0 {
        return Err(invalid("duration must be greater than zero"));
    }

    Ok(Duration::from_secs(total))
}

/// Render a duration compactly: `1h2m5s`, `3m20s`, `1.5s`, `10ms`, `0s`.
pub fn format(d: Duration) -> String {
    let secs = d.as_secs();
    let millis = d.subsec_millis();

    if secs == 0 {
        return if millis == 0 {
            "0s".to_string()
        } else {
            format!("{}ms", millis)
        };
    }

    let hours = secs / 3600;
    let minutes = secs % 3600 / 60;
    let mut seconds = (secs % 60).to_string();
    if millis > 0 {
        let frac = format!("{:03}", millis);
        seconds.push('.');
        seconds.push_str(frac.trim_end_matches('0'));
    }

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
