use crate::error::{ChartError, ChartResult};

/// Parses a race time string into whole seconds.
///
/// Accepts `HH:MM:SS` and the tolerant short form `MM:SS`.
pub fn parse_race_time(text: &str) -> ChartResult<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ChartError::InvalidData(
            "race time string must not be empty".to_owned(),
        ));
    }

    let mut fields = [0u32; 3];
    let mut count = 0usize;
    for part in trimmed.split(':') {
        if count == 3 {
            return Err(ChartError::InvalidData(format!(
                "race time `{trimmed}` has too many `:` fields"
            )));
        }
        fields[count] = part.parse::<u32>().map_err(|_| {
            ChartError::InvalidData(format!("race time `{trimmed}` has a non-numeric field"))
        })?;
        count += 1;
    }

    match count {
        3 => Ok(fields[0] * 3600 + fields[1] * 60 + fields[2]),
        2 => Ok(fields[0] * 60 + fields[1]),
        _ => Err(ChartError::InvalidData(format!(
            "race time `{trimmed}` must be HH:MM:SS or MM:SS"
        ))),
    }
}

/// Formats whole seconds as `HH:MM:SS`, zero-padded.
#[must_use]
pub fn format_race_time(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::{format_race_time, parse_race_time};

    #[test]
    fn short_form_is_minutes_and_seconds() {
        assert_eq!(parse_race_time("17:30").expect("short form"), 1050);
    }

    #[test]
    fn formats_scenario_duration() {
        assert_eq!(format_race_time(3726), "01:02:06");
    }
}
