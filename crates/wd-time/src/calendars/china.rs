//! Mainland China legal calendar.
//!
//! Holiday and makeup-workday dates follow the annual State Council notices
//! (国务院办公厅关于部分节假日安排的通知).  Lunar holidays move every year and
//! the bridging arrangements (调休) are announced only a few weeks before the
//! year starts, so each year is a hard-coded table.

use wd_core::errors::Result;

use crate::dataset::{CalendarDataset, DatasetBuilder};
use crate::date::Date;

/// Jurisdiction code.
pub const JURISDICTION: &str = "CN";

/// First year with published arrangements in the built-in tables.
pub const FIRST_YEAR: i32 = 2025;

/// Last year with published arrangements in the built-in tables.
pub const LAST_YEAR: i32 = 2026;

/// Version label of the built-in tables.
pub const VERSION: &str = "cn-builtin-2026.1";

/// Statutory festivals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Festival {
    /// New Year's Day.
    NewYearsDay,
    /// Spring Festival (Lunar New Year).
    SpringFestival,
    /// Tomb-Sweeping Day.
    TombSweepingDay,
    /// Labour Day.
    LabourDay,
    /// Dragon Boat Festival.
    DragonBoatFestival,
    /// Mid-Autumn Festival.
    MidAutumnFestival,
    /// National Day.
    NationalDay,
}

impl Festival {
    /// Official Chinese name; used as the holiday name in the dataset.
    pub fn chinese_name(&self) -> &'static str {
        match self {
            Festival::NewYearsDay => "元旦",
            Festival::SpringFestival => "春节",
            Festival::TombSweepingDay => "清明节",
            Festival::LabourDay => "劳动节",
            Festival::DragonBoatFestival => "端午节",
            Festival::MidAutumnFestival => "中秋节",
            Festival::NationalDay => "国庆节",
        }
    }
}

use Festival::*;

/// (year, month, day, number of days, festival)
const HOLIDAY_SPANS: &[(i32, u32, u32, u32, Festival)] = &[
    // 2025
    (2025, 1, 1, 1, NewYearsDay),
    (2025, 1, 28, 8, SpringFestival),
    (2025, 4, 4, 3, TombSweepingDay),
    (2025, 5, 1, 5, LabourDay),
    (2025, 5, 31, 3, DragonBoatFestival),
    (2025, 10, 1, 5, NationalDay),
    (2025, 10, 6, 1, MidAutumnFestival),
    (2025, 10, 7, 2, NationalDay),
    // 2026
    (2026, 1, 1, 3, NewYearsDay),
    (2026, 2, 15, 9, SpringFestival),
    (2026, 4, 4, 3, TombSweepingDay),
    (2026, 5, 1, 5, LabourDay),
    (2026, 6, 19, 3, DragonBoatFestival),
    (2026, 9, 25, 3, MidAutumnFestival),
    (2026, 10, 1, 7, NationalDay),
];

/// Weekend days worked to bridge the holidays above.
const MAKEUP_WORKDAYS: &[(i32, u32, u32)] = &[
    // 2025
    (2025, 1, 26),
    (2025, 2, 8),
    (2025, 4, 27),
    (2025, 9, 28),
    (2025, 10, 11),
    // 2026
    (2026, 1, 4),
    (2026, 2, 14),
    (2026, 2, 28),
    (2026, 5, 9),
    (2026, 9, 20),
    (2026, 10, 10),
];

/// Build the built-in mainland China dataset.
pub fn china() -> Result<CalendarDataset> {
    let mut builder = DatasetBuilder::new(JURISDICTION, FIRST_YEAR, LAST_YEAR).version(VERSION);
    for &(y, m, d, days, festival) in HOLIDAY_SPANS {
        builder.add_holiday_span(Date::from_ymd(y, m, d)?, days, festival.chinese_name())?;
    }
    for &(y, m, d) in MAKEUP_WORKDAYS {
        builder.add_makeup_workday(Date::from_ymd(y, m, d)?);
    }
    builder.build()
}
