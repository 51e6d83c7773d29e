use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single 1-5 coaching rating.
///
/// The only ways to obtain a `Rating` are the validating constructors, so every value in the
/// domain model is known to be in range. Stored records are validated on load as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Needs Work",
            2 => "Developing",
            3 => "Satisfactory",
            4 => "Proficient",
            _ => "Excellent",
        }
    }

    pub const fn color(self) -> ColorToken {
        match self.0 {
            1 => ColorToken::Red,
            2 => ColorToken::Orange,
            3 => ColorToken::Yellow,
            4 => ColorToken::Green,
            _ => ColorToken::Blue,
        }
    }

    /// All five levels in ascending order, for selectors and legends.
    pub fn scale() -> [Rating; 5] {
        [Rating(1), Rating(2), Rating(3), Rating(4), Rating(5)]
    }
}

impl TryFrom<i64> for Rating {
    type Error = InvalidRatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        validate_rating(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl FromStr for Rating {
    type Err = InvalidRatingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        trimmed
            .parse::<i64>()
            .map_err(|_| InvalidRatingError::new(trimmed))
            .and_then(validate_rating)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a value offered as a rating is not an integer in `1..=5`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid rating '{value}': expected an integer from 1 to 5")]
pub struct InvalidRatingError {
    pub value: String,
}

impl InvalidRatingError {
    fn new(value: impl fmt::Display) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

/// Strict write-boundary validation. Out-of-range values are rejected, never clamped.
pub fn validate_rating(value: i64) -> Result<Rating, InvalidRatingError> {
    if (i64::from(Rating::MIN)..=i64::from(Rating::MAX)).contains(&value) {
        Ok(Rating(value as u8))
    } else {
        Err(InvalidRatingError::new(value))
    }
}

/// Validates a numeric input that may carry a fractional part, e.g. a slider or JSON number.
pub fn validate_rating_value(value: f64) -> Result<Rating, InvalidRatingError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(InvalidRatingError::new(value));
    }
    validate_rating(value as i64)
}

/// Display label for a raw rating. Never fails: anything outside the scale reads "Not Rated".
pub fn rating_label(value: i64) -> &'static str {
    validate_rating(value)
        .map(Rating::label)
        .unwrap_or("Not Rated")
}

/// Display color for a raw rating, grey when the value is not on the scale.
pub fn rating_color(value: i64) -> ColorToken {
    validate_rating(value)
        .map(Rating::color)
        .unwrap_or(ColorToken::Grey)
}

/// Palette shared by rating chips and trend badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Grey,
}

impl ColorToken {
    pub const fn hex(self) -> &'static str {
        match self {
            ColorToken::Red => "#f44336",
            ColorToken::Orange => "#ff9800",
            ColorToken::Yellow => "#ffeb3b",
            ColorToken::Green => "#4caf50",
            ColorToken::Blue => "#2196f3",
            ColorToken::Grey => "#9e9e9e",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ColorToken::Red => "red",
            ColorToken::Orange => "orange",
            ColorToken::Yellow => "yellow",
            ColorToken::Green => "green",
            ColorToken::Blue => "blue",
            ColorToken::Grey => "grey",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_level_on_the_scale() {
        for value in 1..=5 {
            let rating = validate_rating(value).expect("on scale");
            assert_eq!(i64::from(rating.value()), value);
        }
    }

    #[test]
    fn rejects_values_off_the_scale() {
        for value in [i64::MIN, -1, 0, 6, 10, i64::MAX] {
            let err = validate_rating(value).expect_err("off scale");
            assert_eq!(err.value, value.to_string());
        }
    }

    #[test]
    fn rejects_fractional_and_non_finite_values() {
        assert!(validate_rating_value(2.5).is_err());
        assert!(validate_rating_value(f64::NAN).is_err());
        assert!(validate_rating_value(f64::INFINITY).is_err());
        assert_eq!(validate_rating_value(4.0).map(Rating::value), Ok(4));
    }

    #[test]
    fn parses_text_input() {
        assert_eq!(" 3 ".parse::<Rating>().map(Rating::value), Ok(3));
        assert!("2.5".parse::<Rating>().is_err());
        assert!("six".parse::<Rating>().is_err());
        assert!("".parse::<Rating>().is_err());
    }

    #[test]
    fn labels_and_colors_are_total() {
        assert_eq!(rating_label(1), "Needs Work");
        assert_eq!(rating_label(3), "Satisfactory");
        assert_eq!(rating_label(5), "Excellent");
        assert_eq!(rating_label(0), "Not Rated");
        assert_eq!(rating_label(42), "Not Rated");

        assert_eq!(rating_color(2), ColorToken::Orange);
        assert_eq!(rating_color(4).hex(), "#4caf50");
        assert_eq!(rating_color(-3), ColorToken::Grey);
    }

    #[test]
    fn serde_rejects_out_of_range_ratings() {
        assert_eq!(serde_json::to_string(&Rating(4)).expect("serializes"), "4");
        assert_eq!(
            serde_json::from_str::<Rating>("5").expect("deserializes"),
            Rating(5)
        );
        assert!(serde_json::from_str::<Rating>("0").is_err());
        assert!(serde_json::from_str::<Rating>("6").is_err());
    }
}
