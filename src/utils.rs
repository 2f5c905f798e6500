use crate::config::{RUN_DURATION_MS, SLIDER_MAX, SLIDER_MIN};

/// Milliseconds between simulation ticks.
///
/// Paces the run so that the slower of the two effects (circle replacement or
/// box accumulation) finishes in about [`RUN_DURATION_MS`] at 100%
/// participation; a higher participation rate shortens the interval
/// proportionally.
///
/// Returns `0.0` when there is nothing to pace (no circles and no boxes) or the
/// participation rate is zero, so a degenerate run ends on its first tick.
pub fn tick_interval_ms(total_circles: usize, box_target: u32, participation_rate: u32) -> f64 {
    let longest = total_circles.max(box_target as usize);
    if longest == 0 || participation_rate == 0 {
        return 0.0;
    }
    RUN_DURATION_MS / longest as f64 / (participation_rate as f64 / 100.0)
}

/// Slider parsing error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliderParseError {
    Empty,
    NotANumber(String),
    OutOfRange { value: u32, min: u32, max: u32 },
}

impl std::fmt::Display for SliderParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SliderParseError::Empty => write!(f, "Slider value cannot be empty"),
            SliderParseError::NotANumber(raw) => {
                write!(f, "Slider value '{}' is not a whole number", raw)
            }
            SliderParseError::OutOfRange { value, min, max } => {
                write!(f, "Slider value {} outside {}..={}", value, min, max)
            }
        }
    }
}

impl std::error::Error for SliderParseError {}

/// Numeric input validation against an inclusive range
pub fn validate_numeric_input(input: &str, min: u32, max: u32) -> Result<u32, SliderParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SliderParseError::Empty);
    }

    let value = trimmed
        .parse::<u32>()
        .map_err(|_| SliderParseError::NotANumber(trimmed.to_string()))?;
    if !(min..=max).contains(&value) {
        return Err(SliderParseError::OutOfRange { value, min, max });
    }
    Ok(value)
}

/// Parse the `value` of one of the range sliders.
pub fn parse_slider_value(input: &str) -> Result<u32, SliderParseError> {
    validate_numeric_input(input, SLIDER_MIN, SLIDER_MAX)
}
