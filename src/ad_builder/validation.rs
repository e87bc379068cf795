//! Pure validation rules for the ad form.
//!
//! Validation never mutates form state. Each call returns an [`ErrorPatch`]
//! that carries every error key owned by the validated field(s), set either
//! way, and the controller folds it into its [`ErrorMap`] with
//! [`ErrorMap::merged`]. Keys therefore only change when their own field is
//! re-validated or the whole map is reset.

use std::collections::BTreeMap;
use std::fmt;

use super::fields::{FieldKind, FormFields};
use crate::config::{DEFAULT_DESCRIPTION_MAX_LEN, DEFAULT_TITLE_MAX_LEN};

const HTTP_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Length limits for free-text fields, in characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLimits {
    pub title_max_len: usize,
    pub description_max_len: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            title_max_len: DEFAULT_TITLE_MAX_LEN,
            description_max_len: DEFAULT_DESCRIPTION_MAX_LEN,
        }
    }
}

/// A single validity flag in the form's error map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    /// The field was left empty.
    Empty(FieldKind),
    TitleTooLong,
    DescriptionTooLong,
    /// The url lacks an `http://` or `https://` scheme.
    NeedsHttp,
}

impl ErrorKey {
    /// Key name as exposed to the page (`titleError`, `needsHTTP`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Empty(FieldKind::Title) => "titleError",
            Self::Empty(FieldKind::Description) => "descriptionError",
            Self::Empty(FieldKind::Url) => "urlError",
            Self::Empty(FieldKind::Project) => "projectError",
            Self::Empty(FieldKind::Email) => "emailError",
            Self::TitleTooLong => "titleTooLong",
            Self::DescriptionTooLong => "descriptionTooLong",
            Self::NeedsHttp => "needsHTTP",
        }
    }

    /// Field whose edits recompute this key.
    pub fn field(self) -> FieldKind {
        match self {
            Self::Empty(kind) => kind,
            Self::TitleTooLong => FieldKind::Title,
            Self::DescriptionTooLong => FieldKind::Description,
            Self::NeedsHttp => FieldKind::Url,
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Partial error map produced by a validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorPatch(BTreeMap<ErrorKey, bool>);

impl ErrorPatch {
    pub fn with(mut self, key: ErrorKey, flagged: bool) -> Self {
        self.0.insert(key, flagged);
        self
    }

    pub fn get(&self, key: ErrorKey) -> Option<bool> {
        self.0.get(&key).copied()
    }

    pub fn has_errors(&self) -> bool {
        self.0.values().any(|flagged| *flagged)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, bool)> + '_ {
        self.0.iter().map(|(key, flagged)| (*key, *flagged))
    }

    fn extend(mut self, other: ErrorPatch) -> Self {
        self.0.extend(other.0);
        self
    }
}

/// Every error flag the form has seen so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorMap(BTreeMap<ErrorKey, bool>);

impl ErrorMap {
    /// New map with `patch` applied on top of `self`; patch entries win.
    pub fn merged(&self, patch: &ErrorPatch) -> ErrorMap {
        let mut next = self.0.clone();
        next.extend(patch.iter());
        ErrorMap(next)
    }

    /// Whether `key` is currently flagged. Unknown keys read as valid.
    pub fn is_set(&self, key: ErrorKey) -> bool {
        self.0.get(&key).copied().unwrap_or(false)
    }

    pub fn contains(&self, key: ErrorKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Overall-invalid predicate.
    pub fn has_errors(&self) -> bool {
        self.0.values().any(|flagged| *flagged)
    }

    /// Flagged keys in stable order.
    pub fn active(&self) -> impl Iterator<Item = ErrorKey> + '_ {
        self.0
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(key, _)| *key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// True when `value` mentions an `http://` or `https://` scheme anywhere.
pub fn has_http_scheme(value: &str) -> bool {
    HTTP_SCHEMES.iter().any(|scheme| value.contains(scheme))
}

/// Validate a single field.
pub fn validate_field(kind: FieldKind, value: &str, limits: FieldLimits) -> ErrorPatch {
    let patch = ErrorPatch::default().with(ErrorKey::Empty(kind), value.is_empty());
    match kind {
        FieldKind::Title => patch.with(
            ErrorKey::TitleTooLong,
            value.chars().count() > limits.title_max_len,
        ),
        FieldKind::Description => patch.with(
            ErrorKey::DescriptionTooLong,
            value.chars().count() > limits.description_max_len,
        ),
        FieldKind::Url => patch.with(ErrorKey::NeedsHttp, !has_http_scheme(value)),
        FieldKind::Project | FieldKind::Email => patch,
    }
}

/// Validate every field; used for the submit-time sweep.
pub fn validate_all(fields: &FormFields, limits: FieldLimits) -> ErrorPatch {
    fields
        .iter()
        .map(|(kind, value)| validate_field(kind, value, limits))
        .fold(ErrorPatch::default(), ErrorPatch::extend)
}
