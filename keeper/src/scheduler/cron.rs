use anyhow::{anyhow, Result};
use tracing::debug;

/// tokio-cron-scheduler expects `sec min hour day month dow`.
pub fn validate_6_field_cron(schedule: &str) -> Result<()> {
    let parts: Vec<&str> = schedule.split_whitespace().collect();

    if parts.len() != 6 {
        return Err(anyhow!("tokio-cron-scheduler requires exactly 6 fields: second minute hour day month dayofweek. Got {} fields: '{}'", parts.len(), schedule));
    }

    validate_cron_field(parts[0], "second", 0, 59)?;
    validate_cron_field(parts[1], "minute", 0, 59)?;
    validate_cron_field(parts[2], "hour", 0, 23)?;
    validate_cron_field(parts[3], "day", 1, 31)?;
    validate_cron_field(parts[4], "month", 1, 12)?;
    validate_cron_field(parts[5], "dayofweek", 0, 7)?;

    debug!("Validated 6-field cron: '{}'", schedule);

    Ok(())
}

fn parse_value(value: &str, name: &str, min: u32, max: u32) -> Result<u32> {
    let parsed = value.parse::<u32>()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, value))?;
    if parsed < min || parsed > max {
        return Err(anyhow!("{} value {} is outside valid range {}-{}", name, parsed, min, max));
    }
    Ok(parsed)
}

fn validate_cron_field(field: &str, name: &str, min: u32, max: u32) -> Result<()> {
    if field == "*" || field == "?" {
        return Ok(());
    }

    if let Some(step_str) = field.strip_prefix("*/") {
        let step = step_str.parse::<u32>()
            .map_err(|_| anyhow!("Invalid {} step value: {}", name, step_str))?;
        if step == 0 {
            return Err(anyhow!("{} step value cannot be 0", name));
        }
        return Ok(());
    }

    for part in field.split(',') {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_value(start, name, min, max)?;
                let end = parse_value(end, name, min, max)?;
                if start > end {
                    return Err(anyhow!("{} range {}-{} is reversed", name, start, end));
                }
            }
            None => {
                parse_value(part, name, min, max)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0 0 * * * *")]
    #[case("0 30 3 * * *")]
    #[case("0 */15 * * * *")]
    #[case("0 0 2 * * 1-5")]
    #[case("0 0 0,12 1 * ?")]
    fn test_accepts_valid_schedules(#[case] schedule: &str) {
        assert!(validate_6_field_cron(schedule).is_ok(), "{}", schedule);
    }

    #[rstest]
    #[case("0 0 * * *")]
    #[case("0 60 * * * *")]
    #[case("0 0 24 * * *")]
    #[case("0 */0 * * * *")]
    #[case("0 0 5-2 * * *")]
    #[case("0 0 x * * *")]
    fn test_rejects_invalid_schedules(#[case] schedule: &str) {
        assert!(validate_6_field_cron(schedule).is_err(), "{}", schedule);
    }
}
