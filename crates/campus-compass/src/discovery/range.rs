use std::fmt;
use std::str::FromStr;

/// Inclusive numeric bounds parsed from a facet value such as `20000-40000` or `60000+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeToken {
    min: u32,
    max: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeTokenError {
    #[error("range '{0}' has no numeric lower bound")]
    InvalidMin(String),
    #[error("range '{0}' has a non-numeric upper bound")]
    InvalidMax(String),
    #[error("range '{0}' has an upper bound below its lower bound")]
    Inverted(String),
}

impl RangeToken {
    pub const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub const fn min(&self) -> u32 {
        self.min
    }

    pub const fn max(&self) -> Option<u32> {
        self.max
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

impl FromStr for RangeToken {
    type Err = RangeTokenError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        let (min, max) = if let Some(open) = token.strip_suffix('+') {
            (open, None)
        } else if let Some((min, max)) = token.split_once('-') {
            (min, Some(max))
        } else {
            (token, None)
        };

        let min = min
            .trim()
            .parse::<u32>()
            .map_err(|_| RangeTokenError::InvalidMin(raw.to_string()))?;
        let max = max
            .map(|value| {
                value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| RangeTokenError::InvalidMax(raw.to_string()))
            })
            .transpose()?;

        if matches!(max, Some(max) if max < min) {
            return Err(RangeTokenError::Inverted(raw.to_string()));
        }

        Ok(Self { min, max })
    }
}

impl fmt::Display for RangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_closed_and_open_ranges() {
        assert_eq!(
            "20000-40000".parse::<RangeToken>(),
            Ok(RangeToken::new(20_000, Some(40_000)))
        );
        assert_eq!(
            "60000+".parse::<RangeToken>(),
            Ok(RangeToken::new(60_000, None))
        );
        assert_eq!(
            " 5000 ".parse::<RangeToken>(),
            Ok(RangeToken::new(5_000, None))
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let range = RangeToken::new(20_000, Some(40_000));
        assert!(range.contains(20_000));
        assert!(range.contains(35_000));
        assert!(range.contains(40_000));
        assert!(!range.contains(45_000));
        assert!(!range.contains(19_999));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        assert!(matches!(
            "-5000-10000".parse::<RangeToken>(),
            Err(RangeTokenError::InvalidMin(_))
        ));
        assert!(matches!(
            "abc+".parse::<RangeToken>(),
            Err(RangeTokenError::InvalidMin(_))
        ));
        assert!(matches!(
            "100-lots".parse::<RangeToken>(),
            Err(RangeTokenError::InvalidMax(_))
        ));
        assert!(matches!(
            "500-100".parse::<RangeToken>(),
            Err(RangeTokenError::Inverted(_))
        ));
    }

    #[test]
    fn display_round_trips_open_range() {
        assert_eq!(RangeToken::new(75_000, None).to_string(), "75000+");
    }
}
