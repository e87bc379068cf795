//! Headless ad builder: form state, validation, submission and toasts.

pub mod controller;
pub mod fields;
mod jobs;
pub mod state;
pub mod toast;
pub mod validation;
pub mod view_model;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::{AdBuilderController, SubmissionError, SubmitError, WorkflowEvent};
pub use fields::{FieldKind, FormFields, UnknownFieldError};
pub use state::{FormState, Phase, SlotError};
pub use toast::{ToastKind, ToastScheduler, ToastView};
pub use validation::{ErrorKey, ErrorMap, ErrorPatch, FieldLimits};
