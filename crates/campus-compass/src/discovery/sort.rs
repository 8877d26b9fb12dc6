use crate::catalog::{Scholarship, University};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Key value extracted once per record per sort.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Name(&'a str),
    Date(NaiveDate),
}

impl SortValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Name(a), Self::Name(b)) => compare_names(a, b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Case-insensitive ordering first, so "apple" sorts next to "Apple" rather than after "Zebra".
/// Names equal up to case put the lowercase spelling first.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.chars().map(swap_case).cmp(b.chars().map(swap_case)))
}

fn swap_case(c: char) -> char {
    if c.is_uppercase() {
        c.to_lowercase().next().unwrap_or(c)
    } else if c.is_lowercase() {
        c.to_uppercase().next().unwrap_or(c)
    } else {
        c
    }
}

pub trait SortKey: Copy + Default + FromStr<Err = UnknownSortKey> {
    fn key(self) -> &'static str;
    fn label(self) -> &'static str;
    fn direction(self) -> SortDirection;
}

/// A record that can be ordered by the keys of its catalog.
pub trait Sortable {
    type Key: SortKey;

    fn sort_value(&self, key: Self::Key) -> SortValue<'_>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}'")]
pub struct UnknownSortKey(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UniversitySort {
    #[default]
    Ranking,
    Name,
    TuitionLow,
    TuitionHigh,
    AdmissionRate,
}

impl SortKey for UniversitySort {
    fn key(self) -> &'static str {
        match self {
            Self::Ranking => "ranking",
            Self::Name => "name",
            Self::TuitionLow => "tuition-low",
            Self::TuitionHigh => "tuition-high",
            Self::AdmissionRate => "admission-rate",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Ranking => "Ranking",
            Self::Name => "Name A-Z",
            Self::TuitionLow => "Tuition: Low to High",
            Self::TuitionHigh => "Tuition: High to Low",
            Self::AdmissionRate => "Admission Rate",
        }
    }

    fn direction(self) -> SortDirection {
        match self {
            Self::TuitionHigh => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

impl FromStr for UniversitySort {
    type Err = UnknownSortKey;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "ranking" => Ok(Self::Ranking),
            "name" => Ok(Self::Name),
            "tuition-low" => Ok(Self::TuitionLow),
            "tuition-high" => Ok(Self::TuitionHigh),
            "admission-rate" => Ok(Self::AdmissionRate),
            _ => Err(UnknownSortKey(raw.to_string())),
        }
    }
}

impl Sortable for University {
    type Key = UniversitySort;

    fn sort_value(&self, key: UniversitySort) -> SortValue<'_> {
        match key {
            UniversitySort::Ranking => SortValue::Number(f64::from(self.ranking)),
            UniversitySort::Name => SortValue::Name(&self.name),
            UniversitySort::TuitionLow | UniversitySort::TuitionHigh => {
                SortValue::Number(f64::from(self.tuition_fee))
            }
            UniversitySort::AdmissionRate => SortValue::Number(self.admission_rate),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScholarshipSort {
    #[default]
    Deadline,
    Name,
    AmountHigh,
    AmountLow,
    SuccessRate,
}

impl SortKey for ScholarshipSort {
    fn key(self) -> &'static str {
        match self {
            Self::Deadline => "deadline",
            Self::Name => "name",
            Self::AmountHigh => "amount-high",
            Self::AmountLow => "amount-low",
            Self::SuccessRate => "success-rate",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Deadline => "Deadline",
            Self::Name => "Name A-Z",
            Self::AmountHigh => "Amount: High to Low",
            Self::AmountLow => "Amount: Low to High",
            Self::SuccessRate => "Success Rate",
        }
    }

    fn direction(self) -> SortDirection {
        match self {
            Self::AmountHigh | Self::SuccessRate => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

impl FromStr for ScholarshipSort {
    type Err = UnknownSortKey;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "deadline" => Ok(Self::Deadline),
            "name" => Ok(Self::Name),
            "amount-high" => Ok(Self::AmountHigh),
            "amount-low" => Ok(Self::AmountLow),
            "success-rate" => Ok(Self::SuccessRate),
            _ => Err(UnknownSortKey(raw.to_string())),
        }
    }
}

impl Sortable for Scholarship {
    type Key = ScholarshipSort;

    fn sort_value(&self, key: ScholarshipSort) -> SortValue<'_> {
        match key {
            ScholarshipSort::Deadline => SortValue::Date(self.deadline),
            ScholarshipSort::Name => SortValue::Name(&self.name),
            ScholarshipSort::AmountHigh | ScholarshipSort::AmountLow => {
                SortValue::Number(f64::from(self.amount))
            }
            // No applicants sorts after every real ratio.
            ScholarshipSort::SuccessRate => {
                SortValue::Number(self.success_rate().unwrap_or(f64::NEG_INFINITY))
            }
        }
    }
}

impl fmt::Display for UniversitySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl fmt::Display for ScholarshipSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Stable, non-destructive sort of a view. Equal keys keep their input order.
pub fn sort_records<'a, T: Sortable>(records: &[&'a T], key: T::Key) -> Vec<&'a T> {
    let mut decorated: Vec<(SortValue<'a>, &'a T)> = records
        .iter()
        .copied()
        .map(|record| (record.sort_value(key), record))
        .collect();

    let direction = key.direction();
    decorated.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Ascending => a.compare(b),
        SortDirection::Descending => b.compare(a),
    });

    decorated.into_iter().map(|(_, record)| record).collect()
}
