use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Why a learner wants lessons. Catalog entries list these as lowercase tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalTag {
    Travel,
    Study,
    Work,
    Relocate,
    Programming,
}

impl GoalTag {
    /// Goal pages are addressed by 1-based position in this order.
    pub const ALL: [GoalTag; 5] = [
        GoalTag::Travel,
        GoalTag::Study,
        GoalTag::Work,
        GoalTag::Relocate,
        GoalTag::Programming,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|g| *g == self).unwrap_or(0) + 1
    }

    pub fn tag(self) -> &'static str {
        match self {
            GoalTag::Travel => "travel",
            GoalTag::Study => "study",
            GoalTag::Work => "work",
            GoalTag::Relocate => "relocate",
            GoalTag::Programming => "programming",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalTag::Travel => "⛱ Для путешествий",
            GoalTag::Study => "🏫 Для школы",
            GoalTag::Work => "🏢 Для работы",
            GoalTag::Relocate => "🚜 Для переезда",
            GoalTag::Programming => "💻 Для программирования",
        }
    }
}

impl FromStr for GoalTag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|g| g.tag() == s).ok_or(())
    }
}

impl fmt::Display for GoalTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Weekday::Mon => "Понедельник",
            Weekday::Tue => "Вторник",
            Weekday::Wed => "Среда",
            Weekday::Thu => "Четверг",
            Weekday::Fri => "Пятница",
            Weekday::Sat => "Суббота",
            Weekday::Sun => "Воскресенье",
        }
    }

    /// Strict lookup by short tag, as used for route parameters.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.tag() == tag)
    }

    /// Accepts either the short tag or the display name. Booking forms have
    /// historically carried the display name.
    pub fn resolve(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::from_tag(value).or_else(|| Self::ALL.into_iter().find(|d| d.display_name() == value))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One catalog entry. Read-only once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutor {
    pub id: u32,
    pub name: String,
    pub about: String,
    pub rating: f64,
    pub picture: String,
    pub price: u32,
    pub goals: Vec<GoalTag>,
    #[serde(default)]
    pub free: BTreeMap<Weekday, Vec<String>>,
}

impl Tutor {
    pub fn has_goal(&self, goal: GoalTag) -> bool {
        self.goals.contains(&goal)
    }

    pub fn slots(&self, day: Weekday) -> &[String] {
        self.free.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_free_slots(&self) -> bool {
        self.free.values().any(|slots| !slots.is_empty())
    }
}

/// Weekly-hours buckets offered on the request form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeeklyHours {
    #[serde(rename = "1-2 часа в неделю")]
    OneToTwo,
    #[serde(rename = "3-5 часов в неделю")]
    ThreeToFive,
    #[serde(rename = "5-7 часов в неделю")]
    FiveToSeven,
    #[serde(rename = "7-10 часов в неделю")]
    SevenToTen,
}

impl WeeklyHours {
    pub const ALL: [WeeklyHours; 4] = [
        WeeklyHours::OneToTwo,
        WeeklyHours::ThreeToFive,
        WeeklyHours::FiveToSeven,
        WeeklyHours::SevenToTen,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WeeklyHours::OneToTwo => "1-2 часа в неделю",
            WeeklyHours::ThreeToFive => "3-5 часов в неделю",
            WeeklyHours::FiveToSeven => "5-7 часов в неделю",
            WeeklyHours::SevenToTen => "7-10 часов в неделю",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.label() == label)
    }
}

/// Goal choices on the request form. Programming is not offered there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestGoal {
    #[serde(rename = "Для путешествий")]
    Travel,
    #[serde(rename = "Для школы")]
    Study,
    #[serde(rename = "Для работы")]
    Work,
    #[serde(rename = "Для переезда")]
    Relocate,
}

impl RequestGoal {
    pub const ALL: [RequestGoal; 4] = [
        RequestGoal::Travel,
        RequestGoal::Study,
        RequestGoal::Work,
        RequestGoal::Relocate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RequestGoal::Travel => "Для путешествий",
            RequestGoal::Study => "Для школы",
            RequestGoal::Work => "Для работы",
            RequestGoal::Relocate => "Для переезда",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label)
    }

    pub fn tag(self) -> GoalTag {
        match self {
            RequestGoal::Travel => GoalTag::Travel,
            RequestGoal::Study => GoalTag::Study,
            RequestGoal::Work => GoalTag::Work,
            RequestGoal::Relocate => GoalTag::Relocate,
        }
    }
}

/// A "find me a tutor" request. Field names on disk match `request.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRequest {
    pub name: String,
    pub phone: String,
    #[serde(rename = "time")]
    pub weekly_hours: WeeklyHours,
    pub goal: RequestGoal,
}

/// A booked slot with a specific tutor. Field names on disk match `booking.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    #[serde(rename = "id")]
    pub tutor_id: u32,
    pub time: String,
    pub weekday: Weekday,
    pub name: String,
    pub phone: String,
}

/// Everything a booking form needs before the visitor fills it in.
#[derive(Debug, Clone, Serialize)]
pub struct BookingSlot {
    pub tutor: Tutor,
    pub weekday: Weekday,
    pub weekday_name: &'static str,
    pub time: String,
}
