use std::fmt;

use super::fields::{FieldKind, FormFields};
use super::validation::{ErrorMap, ErrorPatch};

/// Slot selected when the form is created or reset.
pub const INITIAL_SLOT: u32 = 1;

/// Where the submission workflow currently is.
///
/// The page's lifecycle flags are derived from this, so a spinner can never
/// coexist with a failure flag and a failure is always a settled submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Accepting edits; no submission outcome pending display.
    Editing,
    /// Running the submit-time validation sweep.
    Validating,
    /// A create-ad request is in flight.
    Submitting { generation: u64 },
    /// The last submission was stored; cleared when the success toast goes away.
    Succeeded { generation: u64 },
    /// The last submission failed; cleared by the next edit or submit.
    Failed,
}

impl Phase {
    pub fn show_spinner(self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    pub fn was_submitted(self) -> bool {
        matches!(
            self,
            Self::Submitting { .. } | Self::Succeeded { .. } | Self::Failed
        )
    }

    pub fn fetch_error(self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Editing => "editing",
            Self::Validating => "validating",
            Self::Submitting { .. } => "submitting",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("Slot selection {0:?} is not a number")]
    NotANumber(String),
    #[error("Slot {slot} is outside 1..={max}")]
    OutOfRange { slot: u32, max: u32 },
}

/// Field values, slot choice and error flags of the ad form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormState {
    pub fields: FormFields,
    pub selected_slot: u32,
    pub errors: ErrorMap,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            fields: FormFields::default(),
            selected_slot: INITIAL_SLOT,
            errors: ErrorMap::default(),
        }
    }
}

impl FormState {
    pub(crate) fn set_field(&mut self, kind: FieldKind, value: String, patch: &ErrorPatch) {
        self.fields.set(kind, value);
        self.apply_patch(patch);
    }

    pub(crate) fn apply_patch(&mut self, patch: &ErrorPatch) {
        self.errors = self.errors.merged(patch);
    }

    pub(crate) fn select_slot(&mut self, slot: u32, num_slots: u32) -> Result<(), SlotError> {
        if !(1..=num_slots).contains(&slot) {
            return Err(SlotError::OutOfRange {
                slot,
                max: num_slots,
            });
        }
        self.selected_slot = slot;
        Ok(())
    }
}

/// Parse a slot selection as submitted by the page.
pub fn parse_slot(raw: &str) -> Result<u32, SlotError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| SlotError::NotANumber(raw.to_string()))
}
