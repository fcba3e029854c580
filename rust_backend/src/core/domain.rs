//! Domain models for teacher timetables.
//!
//! A weekly timetable is a fixed grid of 5 weekdays by 7 periods. Each slot
//! either holds a normalized [`ClassCode`] or is empty.

use serde::{Serialize, Serializer};
use std::fmt;

/// Number of teaching periods in one day.
pub const PERIODS_PER_DAY: u8 = 7;

/// A teaching slot within a day, `1..=PERIODS_PER_DAY`.
pub type Period = u8;

/// Iterates every period of a day in order.
pub fn periods() -> impl Iterator<Item = Period> {
    1..=PERIODS_PER_DAY
}

/// Zero code points of the decimal digit runs found in timetable sheets:
/// ASCII, Arabic-Indic, extended Arabic-Indic and full-width forms.
const DIGIT_ZEROS: [u32; 4] = [0x30, 0x660, 0x6F0, 0xFF10];

/// Value of a decimal digit character, ASCII or not.
///
/// # Examples
///
/// ```
/// use timetable_checker::core::domain::decimal_digit_value;
///
/// assert_eq!(decimal_digit_value('7'), Some(7));
/// assert_eq!(decimal_digit_value('３'), Some(3));
/// assert_eq!(decimal_digit_value('a'), None);
/// ```
pub fn decimal_digit_value(c: char) -> Option<u32> {
    let code = u32::from(c);
    DIGIT_ZEROS
        .iter()
        .find(|zero| (**zero..**zero + 10).contains(&code))
        .map(|zero| code - zero)
}

/// Weekday of a school week.
///
/// Declaration order is the canonical order used for iteration and for every
/// list of days that ends up in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Header label used by the timetable sheets.
    ///
    /// # Examples
    ///
    /// ```
    /// use timetable_checker::core::Weekday;
    ///
    /// assert_eq!(Weekday::Wednesday.label(), "수");
    /// ```
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "월",
            Weekday::Tuesday => "화",
            Weekday::Wednesday => "수",
            Weekday::Thursday => "목",
            Weekday::Friday => "금",
        }
    }

    /// Looks up a weekday by its exact header label.
    ///
    /// # Examples
    ///
    /// ```
    /// use timetable_checker::core::Weekday;
    ///
    /// assert_eq!(Weekday::from_label("금"), Some(Weekday::Friday));
    /// assert_eq!(Weekday::from_label("토"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.label() == label)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Start column of one weekday's contiguous run of period columns.
///
/// Period `p` of `day` sits at column `start_col + p - 1` (1-indexed columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBlock {
    pub day: Weekday,
    pub start_col: u32,
}

impl DayBlock {
    pub fn new(day: Weekday, start_col: u32) -> Self {
        Self { day, start_col }
    }

    /// Column holding `period` of this block.
    pub fn column_for(&self, period: Period) -> u32 {
        self.start_col + u32::from(period) - 1
    }
}

/// Normalized class identifier taken from a schedule cell.
///
/// Two slots holding equal codes are the same class for pattern purposes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ClassCode(String);

impl ClassCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable rendering used in finding messages.
    ///
    /// A three digit code reads as grade + class number, anything else is
    /// shown in parentheses as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use timetable_checker::core::ClassCode;
    ///
    /// assert_eq!(ClassCode::new("203").describe(), "2학년 3반(203)");
    /// assert_eq!(ClassCode::new("1105").describe(), "(1105)");
    /// assert_eq!(ClassCode::new("２０５").describe(), "２학년 5반(２０５)");
    /// ```
    pub fn describe(&self) -> String {
        let code = self.as_str();
        let digits: Option<Vec<u32>> = code.chars().map(decimal_digit_value).collect();
        match (code.chars().next(), digits.as_deref()) {
            (Some(grade), Some([_, tens, ones])) => {
                format!("{}학년 {}반({})", grade, tens * 10 + ones, code)
            }
            _ => format!("({})", code),
        }
    }
}

impl fmt::Display for ClassCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One teacher's weekly grid of class codes.
///
/// Every weekday/period slot always holds a value, `None` meaning no class,
/// so consumers never observe a partially initialized schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherSchedule {
    slots: [[Option<ClassCode>; PERIODS_PER_DAY as usize]; 5],
}

impl TeacherSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Class held at `period` on `day`. Periods outside `1..=7` read as empty.
    pub fn get(&self, day: Weekday, period: Period) -> Option<&ClassCode> {
        Self::slot_index(period).and_then(|p| self.slots[day.index()][p].as_ref())
    }

    /// Stores the class for a slot, overwriting any previous value.
    pub fn set(&mut self, day: Weekday, period: Period, code: Option<ClassCode>) {
        debug_assert!(Self::slot_index(period).is_some(), "period {} out of range", period);
        if let Some(p) = Self::slot_index(period) {
            self.slots[day.index()][p] = code;
        }
    }

    /// True when `period` on `day` has a class.
    pub fn is_occupied(&self, day: Weekday, period: Period) -> bool {
        self.get(day, period).is_some()
    }

    /// Iterates all 35 slots in canonical day then period order.
    pub fn slots(&self) -> impl Iterator<Item = (Weekday, Period, Option<&ClassCode>)> + '_ {
        Weekday::ALL
            .into_iter()
            .flat_map(move |day| periods().map(move |period| (day, period, self.get(day, period))))
    }

    /// Number of slots that hold a class.
    pub fn occupied_count(&self) -> usize {
        self.slots().filter(|(_, _, code)| code.is_some()).count()
    }

    fn slot_index(period: Period) -> Option<usize> {
        (1..=PERIODS_PER_DAY)
            .contains(&period)
            .then(|| usize::from(period - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_labels_roundtrip_in_canonical_order() {
        let labels: Vec<&str> = Weekday::ALL.iter().map(|d| d.label()).collect();
        assert_eq!(labels, vec!["월", "화", "수", "목", "금"]);
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_label(day.label()), Some(day));
        }
        assert!(Weekday::Monday < Weekday::Friday);
    }

    #[test]
    fn test_weekday_serializes_as_label() {
        let json = serde_json::to_string(&vec![Weekday::Tuesday, Weekday::Thursday]).unwrap();
        assert_eq!(json, r#"["화","목"]"#);
    }

    #[test]
    fn test_day_block_column_for_period() {
        let block = DayBlock::new(Weekday::Wednesday, 16);
        assert_eq!(block.column_for(1), 16);
        assert_eq!(block.column_for(7), 22);
    }

    #[test]
    fn test_class_code_describe() {
        assert_eq!(ClassCode::new("101").describe(), "1학년 1반(101)");
        assert_eq!(ClassCode::new("312").describe(), "3학년 12반(312)");
        assert_eq!(ClassCode::new("7").describe(), "(7)");
        assert_eq!(ClassCode::new("2010").describe(), "(2010)");
    }

    #[test]
    fn test_class_code_describe_full_width() {
        assert_eq!(ClassCode::new("１０１").describe(), "１학년 1반(１０１)");
        assert_eq!(ClassCode::new("３１２").describe(), "３학년 12반(３１２)");
        assert_eq!(ClassCode::new("１０").describe(), "(１０)");
    }

    #[test]
    fn test_decimal_digit_value_ranges() {
        assert_eq!(decimal_digit_value('0'), Some(0));
        assert_eq!(decimal_digit_value('９'), Some(9));
        assert_eq!(decimal_digit_value('٣'), Some(3));
        assert_eq!(decimal_digit_value('۷'), Some(7));
        assert_eq!(decimal_digit_value('/'), None);
        assert_eq!(decimal_digit_value(':'), None);
        assert_eq!(decimal_digit_value('½'), None);
        assert_eq!(decimal_digit_value('일'), None);
    }

    #[test]
    fn test_new_schedule_has_all_slots_empty() {
        let schedule = TeacherSchedule::new();
        assert_eq!(schedule.slots().count(), 35);
        assert_eq!(schedule.occupied_count(), 0);
    }

    #[test]
    fn test_schedule_set_and_overwrite() {
        let mut schedule = TeacherSchedule::new();
        schedule.set(Weekday::Monday, 3, Some(ClassCode::new("101")));
        assert_eq!(schedule.get(Weekday::Monday, 3), Some(&ClassCode::new("101")));

        schedule.set(Weekday::Monday, 3, None);
        assert!(!schedule.is_occupied(Weekday::Monday, 3));
    }

    #[test]
    fn test_schedule_out_of_range_period_reads_empty() {
        let schedule = TeacherSchedule::new();
        assert_eq!(schedule.get(Weekday::Friday, 0), None);
        assert_eq!(schedule.get(Weekday::Friday, 8), None);
    }
}
