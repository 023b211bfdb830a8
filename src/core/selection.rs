//! Filtering, sampling and ordering over a view of the catalog.
//!
//! Everything here borrows the tutors it is given and returns a new list of
//! references; the catalog itself is never reordered.

use crate::domain::model::{GoalTag, Tutor};
use crate::utils::error::{BookingError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Orderings offered on the "all tutors" page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    Random,
    RatingDesc,
    PriceDesc,
    PriceAsc,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::Random,
        SortOption::RatingDesc,
        SortOption::PriceDesc,
        SortOption::PriceAsc,
    ];

    /// The value the sorting select box submits.
    pub fn code(self) -> &'static str {
        match self {
            SortOption::Random => "1",
            SortOption::RatingDesc => "2",
            SortOption::PriceDesc => "3",
            SortOption::PriceAsc => "4",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortOption::Random => "random",
            SortOption::RatingDesc => "rating_desc",
            SortOption::PriceDesc => "price_desc",
            SortOption::PriceAsc => "price_asc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOption::Random => "В случайном порядке",
            SortOption::RatingDesc => "Сначала лучшие по рейтингу",
            SortOption::PriceDesc => "Сначала дорогие",
            SortOption::PriceAsc => "Сначала недорогие",
        }
    }
}

impl FromStr for SortOption {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        let option = match value {
            "1" | "random" => SortOption::Random,
            "2" | "rating_desc" | "ratingDesc" => SortOption::RatingDesc,
            "3" | "price_desc" | "priceDesc" => SortOption::PriceDesc,
            "4" | "price_asc" | "priceAsc" => SortOption::PriceAsc,
            _ => {
                return Err(BookingError::InvalidSortOption {
                    value: s.to_string(),
                })
            }
        };
        Ok(option)
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tutors serving `goal`, best rated first. Equal ratings keep input order.
pub fn by_goal<'a>(tutors: impl IntoIterator<Item = &'a Tutor>, goal: GoalTag) -> Vec<&'a Tutor> {
    let mut matching: Vec<&Tutor> = tutors.into_iter().filter(|t| t.has_goal(goal)).collect();
    sort_rating_desc(&mut matching);
    matching
}

/// Up to `n` distinct tutors picked uniformly, in random order.
pub fn sample<'a, R>(tutors: impl IntoIterator<Item = &'a Tutor>, n: usize, rng: &mut R) -> Vec<&'a Tutor>
where
    R: Rng + ?Sized,
{
    let all: Vec<&Tutor> = tutors.into_iter().collect();
    all.choose_multiple(rng, n).copied().collect()
}

pub fn sort_by<'a, R>(
    tutors: impl IntoIterator<Item = &'a Tutor>,
    option: SortOption,
    rng: &mut R,
) -> Vec<&'a Tutor>
where
    R: Rng + ?Sized,
{
    let mut sorted: Vec<&Tutor> = tutors.into_iter().collect();
    match option {
        SortOption::Random => sorted.shuffle(rng),
        SortOption::RatingDesc => sort_rating_desc(&mut sorted),
        SortOption::PriceDesc => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOption::PriceAsc => sorted.sort_by_key(|t| t.price),
    }
    sorted
}

fn sort_rating_desc(tutors: &mut [&Tutor]) {
    tutors.sort_by(|a, b| b.rating.total_cmp(&a.rating));
}
