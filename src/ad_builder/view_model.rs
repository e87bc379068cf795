//! Derived, display-ready values for the ad builder page.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use super::fields::{FieldKind, FormFields};
use super::validation::{ErrorKey, FieldLimits};
use crate::ad_gateway::AdInfo;

pub const DEFAULT_PREVIEW_TITLE: &str = "💰Do a thing with your Nano today!";
pub const DEFAULT_PREVIEW_DESCRIPTION: &str = "Add a description here as well!";

/// Days from today until the ad starts running.
const RUN_START_OFFSET_DAYS: i64 = 1;
/// Days from today until the ad stops running.
const RUN_END_OFFSET_DAYS: i64 = 31;

const RUN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// One purchasable slot option.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotQuote {
    pub slots: u32,
    /// Total price in Nano, once pricing has loaded.
    pub cost: Option<f64>,
}

impl SlotQuote {
    /// `"1 Slot"`, `"3 Slots"`.
    pub fn label(&self) -> String {
        let plural = if self.slots > 1 { "s" } else { "" };
        format!("{} Slot{plural}", self.slots)
    }

    /// `"3 Slots (7.5 Nano)"`, or just the label while pricing is unknown.
    pub fn display(&self) -> String {
        match self.cost {
            Some(cost) => format!("{} ({cost} Nano)", self.label()),
            None => self.label(),
        }
    }
}

/// Quote every slot count from 1 to `num_slots`.
pub fn slot_quotes(num_slots: u32, pricing: Option<AdInfo>) -> Vec<SlotQuote> {
    (1..=num_slots)
        .map(|slots| SlotQuote {
            slots,
            cost: pricing.map(|info| info.current_cost_per_slot * f64::from(slots)),
        })
        .collect()
}

/// What the live ad preview shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdPreview {
    pub title: String,
    pub description: String,
    pub url: String,
}

pub fn preview(fields: &FormFields) -> AdPreview {
    let or_default = |value: &str, fallback: &str| {
        if value.is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };
    AdPreview {
        title: or_default(&fields.title, DEFAULT_PREVIEW_TITLE),
        description: or_default(&fields.description, DEFAULT_PREVIEW_DESCRIPTION),
        url: fields.url.clone(),
    }
}

/// Dates an ad booked today would run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunWindow {
    pub starts: Date,
    pub ends: Date,
}

impl RunWindow {
    pub fn starting_after(today: Date) -> Self {
        Self {
            starts: today.saturating_add(Duration::days(RUN_START_OFFSET_DAYS)),
            ends: today.saturating_add(Duration::days(RUN_END_OFFSET_DAYS)),
        }
    }

    pub fn for_today() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self::starting_after(now.date())
    }

    pub fn starts_label(&self) -> String {
        format_run_date(self.starts)
    }

    pub fn ends_label(&self) -> String {
        format_run_date(self.ends)
    }
}

/// `"Oct 17, 2026"`.
pub fn format_run_date(date: Date) -> String {
    date.format(RUN_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Hint shown under a field when `key` is flagged.
pub fn error_message(key: ErrorKey, limits: FieldLimits) -> String {
    match key {
        ErrorKey::Empty(FieldKind::Title) => "Please enter a title".to_string(),
        ErrorKey::Empty(FieldKind::Description) => "Please enter a description".to_string(),
        ErrorKey::Empty(FieldKind::Url) => "Please enter a URL".to_string(),
        ErrorKey::Empty(FieldKind::Project) => "Please enter a Project Name".to_string(),
        ErrorKey::Empty(FieldKind::Email) => "Please enter an email".to_string(),
        ErrorKey::TitleTooLong => format!("{} Character Max", limits.title_max_len),
        ErrorKey::DescriptionTooLong => format!("{} Character Max", limits.description_max_len),
        ErrorKey::NeedsHttp => "Make sure to include http:// or https://".to_string(),
    }
}
