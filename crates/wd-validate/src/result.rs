//! Tagged result types for cross-validation.

use serde::Serialize;
use wd_time::{DayClassification, DayKind};

/// The primary dataset's verdict, reduced to what is compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Whether the source considers the date a workday.
    pub is_workday: bool,
    /// The source's reason.
    pub detail: String,
}

impl From<&DayClassification> for Verdict {
    fn from(c: &DayClassification) -> Self {
        Verdict {
            is_workday: c.is_workday(),
            detail: c.detail().to_string(),
        }
    }
}

/// What the secondary feed said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SecondaryVerdict {
    /// The feed answered.
    Available {
        /// Feed-derived workday flag.
        is_workday: bool,
        /// Feed holiday name, `"weekend"` or `"normal workday"`.
        detail: String,
        /// `true` if the feed lists the date as a public holiday.
        listed_holiday: bool,
    },
    /// The feed could not be consulted.
    Unavailable {
        /// Why not.
        reason: String,
    },
}

/// How a disagreement between the two sources arose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Discrepancy {
    /// The primary marks a weekend as a makeup workday and the feed, which
    /// knows nothing about makeup days, applies the weekend rule.  Expected.
    MakeupWorkday,
    /// The primary lists a holiday the feed treats as a workday.
    MissingFromSecondary,
    /// The feed lists a holiday the primary treats as a workday.
    MissingFromPrimary,
}

impl Discrepancy {
    /// Return `true` if the two holiday lists genuinely diverge.
    pub fn is_holiday_list_divergence(&self) -> bool {
        !matches!(self, Discrepancy::MakeupWorkday)
    }
}

/// Outcome of comparing the primary verdict against the secondary feed.
///
/// `warning` is set exactly when both verdicts exist and disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossValidationResult {
    /// Primary verdict.
    pub primary: Verdict,
    /// Secondary verdict, possibly unavailable.
    pub secondary: SecondaryVerdict,
    /// `Some(true)` if the sources agree, `Some(false)` if they disagree,
    /// `None` if the secondary is unavailable.
    pub matches: Option<bool>,
    /// Kind of disagreement, when `matches == Some(false)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discrepancy: Option<Discrepancy>,
    /// Human-readable warning, when `matches == Some(false)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl CrossValidationResult {
    /// Result for a feed that could not be consulted: indeterminate, no
    /// warning.
    pub fn unavailable(primary: &DayClassification, reason: impl Into<String>) -> Self {
        CrossValidationResult {
            primary: primary.into(),
            secondary: SecondaryVerdict::Unavailable {
                reason: reason.into(),
            },
            matches: None,
            discrepancy: None,
            warning: None,
        }
    }

    /// Compare `primary` against the feed's holiday entry for the same date
    /// (`feed_holiday` is the feed's name for the day, if it lists one).
    pub fn compare(primary: &DayClassification, feed_holiday: Option<&str>) -> Self {
        let weekend = primary.weekday().is_weekend();
        let (secondary_is_workday, secondary_detail) = match feed_holiday {
            Some(name) => (false, name.to_string()),
            None if weekend => (false, wd_time::classify::DETAIL_WEEKEND.to_string()),
            None => (true, wd_time::classify::DETAIL_NORMAL_WORKDAY.to_string()),
        };
        let secondary = SecondaryVerdict::Available {
            is_workday: secondary_is_workday,
            detail: secondary_detail.clone(),
            listed_holiday: feed_holiday.is_some(),
        };

        if primary.is_workday() == secondary_is_workday {
            return CrossValidationResult {
                primary: primary.into(),
                secondary,
                matches: Some(true),
                discrepancy: None,
                warning: None,
            };
        }

        let discrepancy = match (primary.kind(), feed_holiday) {
            (DayKind::MakeupWorkday, None) => Discrepancy::MakeupWorkday,
            (_, Some(_)) => Discrepancy::MissingFromPrimary,
            _ => Discrepancy::MissingFromSecondary,
        };
        let warning = warning_text(primary, &secondary_detail, secondary_is_workday, discrepancy);
        CrossValidationResult {
            primary: primary.into(),
            secondary,
            matches: Some(false),
            discrepancy: Some(discrepancy),
            warning: Some(warning),
        }
    }

    /// Return `true` if the feed was consulted.
    pub fn secondary_available(&self) -> bool {
        matches!(self.secondary, SecondaryVerdict::Available { .. })
    }
}

fn describe(is_workday: bool) -> &'static str {
    if is_workday {
        "workday"
    } else {
        "rest day"
    }
}

fn warning_text(
    primary: &DayClassification,
    secondary_detail: &str,
    secondary_is_workday: bool,
    discrepancy: Discrepancy,
) -> String {
    let verdicts = format!(
        "primary says {} ({}), secondary says {} ({})",
        describe(primary.is_workday()),
        primary.detail(),
        describe(secondary_is_workday),
        secondary_detail
    );
    match discrepancy {
        Discrepancy::MakeupWorkday => format!(
            "expected difference on {}: makeup workday not known to the secondary feed; {verdicts}",
            primary.date()
        ),
        Discrepancy::MissingFromSecondary | Discrepancy::MissingFromPrimary => format!(
            "holiday lists disagree on {}: {verdicts}; check the official notice",
            primary.date()
        ),
    }
}
