use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::ChartError;

/// The fixed, closed set of expense categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Drinks,
    Groceries,
    Travel,
    Shopping,
    Utilities,
    Entertainment,
    Medical,
    Investments,
    Personal,
    Other,
}

/// Reads the sub-label a record carries for its category, if any.
pub type SubLabelAccessor = fn(&ExpenseDetails) -> Option<&str>;

impl Category {
    /// Every category, in the order the filter chips list them.
    pub const ALL: [Category; 11] = [
        Category::Drinks,
        Category::Entertainment,
        Category::Food,
        Category::Groceries,
        Category::Medical,
        Category::Investments,
        Category::Other,
        Category::Personal,
        Category::Shopping,
        Category::Travel,
        Category::Utilities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Drinks => "Drinks",
            Category::Groceries => "Groceries",
            Category::Travel => "Travel",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Medical => "Medical",
            Category::Investments => "Investments",
            Category::Personal => "Personal",
            Category::Other => "Other",
        }
    }

    /// Column in the `expenses` table holding this category's sub-label.
    /// `None` for categories that declare no sub-label.
    pub fn sub_label_column(&self) -> Option<&'static str> {
        match self {
            Category::Food => Some("Meal"),
            Category::Drinks => Some("Drink"),
            Category::Groceries => Some("Grocery"),
            Category::Travel => Some("Travel"),
            Category::Shopping => Some("Shopping"),
            Category::Utilities => Some("Utility"),
            Category::Entertainment => Some("Entertainment"),
            Category::Medical => Some("Health"),
            Category::Investments => Some("Investments"),
            Category::Personal | Category::Other => None,
        }
    }

    /// Accessor for this category's sub-label, or `None` when the category
    /// has no sub-label field at all (drill-down is then unavailable).
    pub fn sub_label_accessor(&self) -> Option<SubLabelAccessor> {
        match self {
            Category::Personal | Category::Other => None,
            _ => Some(ExpenseDetails::sub_label),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ChartError::Deserialization(format!("unknown expense type: {s}")))
    }
}

/// Per-category detail carried by a record.
///
/// Each variant holds the one optional sub-label its category defines
/// (meal type for food, drink type for drinks, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpenseDetails {
    Food { meal: Option<String> },
    Drinks { drink: Option<String> },
    Groceries { grocery: Option<String> },
    Travel { mode: Option<String> },
    Shopping { store: Option<String> },
    Utilities { utility: Option<String> },
    Entertainment { kind: Option<String> },
    Medical { health: Option<String> },
    Investments { instrument: Option<String> },
    Personal,
    Other,
}

impl ExpenseDetails {
    /// Details for `category` with the given sub-label (ignored for
    /// categories that have none).
    pub fn new(category: Category, sub_label: Option<String>) -> Self {
        match category {
            Category::Food => ExpenseDetails::Food { meal: sub_label },
            Category::Drinks => ExpenseDetails::Drinks { drink: sub_label },
            Category::Groceries => ExpenseDetails::Groceries { grocery: sub_label },
            Category::Travel => ExpenseDetails::Travel { mode: sub_label },
            Category::Shopping => ExpenseDetails::Shopping { store: sub_label },
            Category::Utilities => ExpenseDetails::Utilities { utility: sub_label },
            Category::Entertainment => ExpenseDetails::Entertainment { kind: sub_label },
            Category::Medical => ExpenseDetails::Medical { health: sub_label },
            Category::Investments => ExpenseDetails::Investments { instrument: sub_label },
            Category::Personal => ExpenseDetails::Personal,
            Category::Other => ExpenseDetails::Other,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            ExpenseDetails::Food { .. } => Category::Food,
            ExpenseDetails::Drinks { .. } => Category::Drinks,
            ExpenseDetails::Groceries { .. } => Category::Groceries,
            ExpenseDetails::Travel { .. } => Category::Travel,
            ExpenseDetails::Shopping { .. } => Category::Shopping,
            ExpenseDetails::Utilities { .. } => Category::Utilities,
            ExpenseDetails::Entertainment { .. } => Category::Entertainment,
            ExpenseDetails::Medical { .. } => Category::Medical,
            ExpenseDetails::Investments { .. } => Category::Investments,
            ExpenseDetails::Personal => Category::Personal,
            ExpenseDetails::Other => Category::Other,
        }
    }

    /// The sub-label, if present and non-empty.
    pub fn sub_label(&self) -> Option<&str> {
        let label = match self {
            ExpenseDetails::Food { meal } => meal,
            ExpenseDetails::Drinks { drink } => drink,
            ExpenseDetails::Groceries { grocery } => grocery,
            ExpenseDetails::Travel { mode } => mode,
            ExpenseDetails::Shopping { store } => store,
            ExpenseDetails::Utilities { utility } => utility,
            ExpenseDetails::Entertainment { kind } => kind,
            ExpenseDetails::Medical { health } => health,
            ExpenseDetails::Investments { instrument } => instrument,
            ExpenseDetails::Personal | ExpenseDetails::Other => return None,
        };
        label.as_deref().filter(|s| !s.is_empty())
    }
}

/// A single dated, categorised expense as fetched from the data store.
///
/// Read-only to the aggregation and rendering code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Calendar date the expense was incurred on
    pub date: NaiveDate,

    /// Non-negative amount in the display currency
    pub amount: f64,

    /// Category plus its optional sub-label
    pub details: ExpenseDetails,
}

impl Record {
    pub fn new(category: Category, date: NaiveDate, amount: f64) -> Self {
        Self {
            date,
            amount,
            details: ExpenseDetails::new(category, None),
        }
    }

    /// Create a record carrying a sub-label (meal, drink type, ...).
    pub fn with_sub_label(
        category: Category,
        date: NaiveDate,
        amount: f64,
        sub_label: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            details: ExpenseDetails::new(category, Some(sub_label.into())),
        }
    }

    pub fn category(&self) -> Category {
        self.details.category()
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// A calendar month, formatted as a zero-padded `YYYY-MM` key.
///
/// Ordering is chronological, which matches the lexicographic order of
/// the formatted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build a key from a year and a 1-based month.
    pub fn new(year: i32, month: u32) -> Result<Self, ChartError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(ChartError::InvalidMonthKey(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Last calendar day of the month (28–31).
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.next().first_day()?.pred_opt()
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// Three-letter month name used for x-axis labels ("Jan", "Feb", ...).
    pub fn abbreviation(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| &m.name()[..3])
            .unwrap_or("???")
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChartError::InvalidMonthKey(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !digits(year) || !digits(month) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}
