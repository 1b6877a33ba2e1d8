use std::fmt;

use serde::{Deserialize, Serialize};

/// Day of the week a study meets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    #[serde(rename = "월")]
    Mon,
    #[serde(rename = "화")]
    Tue,
    #[serde(rename = "수")]
    Wed,
    #[serde(rename = "목")]
    Thu,
    #[serde(rename = "금")]
    Fri,
    #[serde(rename = "토")]
    Sat,
    #[serde(rename = "일")]
    Sun,
}

static ALL_DAYS: &[Day] = &[
    Day::Mon,
    Day::Tue,
    Day::Wed,
    Day::Thu,
    Day::Fri,
    Day::Sat,
    Day::Sun,
];

impl Day {
    /// Returns the wire literal for this day.
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "월",
            Day::Tue => "화",
            Day::Wed => "수",
            Day::Thu => "목",
            Day::Fri => "금",
            Day::Sat => "토",
            Day::Sun => "일",
        }
    }

    /// Returns all days, Monday first.
    pub fn all() -> &'static [Day] {
        ALL_DAYS
    }
}

/// Where a study meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Campus {
    #[serde(rename = "율전")]
    Yuljeon,
    #[serde(rename = "명륜")]
    Myeongnyun,
    #[serde(rename = "온라인")]
    Online,
}

static ALL_CAMPUSES: &[Campus] = &[Campus::Yuljeon, Campus::Myeongnyun, Campus::Online];

impl Campus {
    /// Returns the wire literal for this campus.
    pub fn as_str(&self) -> &'static str {
        match self {
            Campus::Yuljeon => "율전",
            Campus::Myeongnyun => "명륜",
            Campus::Online => "온라인",
        }
    }

    /// Returns all campuses.
    pub fn all() -> &'static [Campus] {
        ALL_CAMPUSES
    }
}

/// Difficulty of a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "초급")]
    Beginner,
    #[serde(rename = "중급")]
    Intermediate,
    #[serde(rename = "고급")]
    Advanced,
}

static ALL_LEVELS: &[Level] = &[Level::Beginner, Level::Intermediate, Level::Advanced];

impl Level {
    /// Returns the wire literal for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "초급",
            Level::Intermediate => "중급",
            Level::Advanced => "고급",
        }
    }

    /// Returns all levels, easiest first.
    pub fn all() -> &'static [Level] {
        ALL_LEVELS
    }
}

#[mutants::skip]
impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[mutants::skip]
impl fmt::Display for Campus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[mutants::skip]
impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
