use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

const FORMAT: &str = "%Y-%m-%d";

/// Calendar date of a published post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(NaiveDate);

impl Date {
    /// `None` when the day does not exist, e.g. February 31st.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Date)
    }

    /// `December 19, 2024`
    pub fn long_label(&self) -> String {
        self.0.format("%B %-d, %Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date {0:?}, expected YYYY-MM-DD")]
pub struct DateError(String);

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), FORMAT)
            .map(Date)
            .map_err(|_| DateError(s.to_string()))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_parse() {
        let d: Date = "2024-12-19".parse().unwrap();
        assert_eq!(d, date(2024, 12, 19));
        assert_eq!(d.to_string(), "2024-12-19");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("2024-13-01".parse::<Date>().is_err());
        assert!("2024-12".parse::<Date>().is_err());
        assert!("yesterday".parse::<Date>().is_err());
    }

    #[test]
    fn test_rejects_days_that_do_not_exist() {
        assert!("2024-02-31".parse::<Date>().is_err());
        assert!("2023-02-29".parse::<Date>().is_err());
        assert!("2024-04-31".parse::<Date>().is_err());
        assert!("2024-02-29".parse::<Date>().is_ok());
        assert!(Date::from_ymd(2024, 2, 31).is_none());
    }

    #[test]
    fn test_long_label() {
        assert_eq!(date(2024, 12, 19).long_label(), "December 19, 2024");
        assert_eq!(date(2025, 1, 5).long_label(), "January 5, 2025");
    }

    #[test]
    fn test_ordering() {
        assert!(date(2024, 2, 1) > date(2024, 1, 31));
        assert!(date(2025, 1, 1) > date(2024, 12, 31));
    }
}
