use std::fmt;
use std::str::FromStr;

/// One of the five required text inputs of the ad form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    Title,
    Description,
    Url,
    Project,
    Email,
}

impl FieldKind {
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Title,
        FieldKind::Description,
        FieldKind::Url,
        FieldKind::Project,
        FieldKind::Email,
    ];

    /// Form input name, as used by the page markup.
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Url => "url",
            Self::Project => "project",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown form field: {0}")]
pub struct UnknownFieldError(pub String);

impl FromStr for FieldKind {
    type Err = UnknownFieldError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| UnknownFieldError(name.to_string()))
    }
}

/// Current text of every form field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormFields {
    pub title: String,
    pub description: String,
    pub url: String,
    pub project: String,
    pub email: String,
}

impl FormFields {
    pub fn get(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::Title => &self.title,
            FieldKind::Description => &self.description,
            FieldKind::Url => &self.url,
            FieldKind::Project => &self.project,
            FieldKind::Email => &self.email,
        }
    }

    pub fn set(&mut self, kind: FieldKind, value: String) {
        let slot = match kind {
            FieldKind::Title => &mut self.title,
            FieldKind::Description => &mut self.description,
            FieldKind::Url => &mut self.url,
            FieldKind::Project => &mut self.project,
            FieldKind::Email => &mut self.email,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKind, &str)> + '_ {
        FieldKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}
