//! Form state and its reducer.
//!
//! Every edit goes through [`reduce`], which consumes the current state and
//! error report and hands back new ones. Nothing is patched behind the
//! caller's back, so the renderer and the validator always look at a whole
//! snapshot.
use serde::{Deserialize, Serialize};

use crate::{image::ImageFile, validation::ErrorReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirmField {
    Name,
    BrandName,
    Email,
}

impl FirmField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Firm Name",
            Self::BrandName => "Brand Name",
            Self::Email => "Firm Email",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmInfo {
    pub name: String,
    pub brand_name: String,
    pub email: String,
}

impl FirmInfo {
    pub fn get(&self, field: FirmField) -> &str {
        match field {
            FirmField::Name => &self.name,
            FirmField::BrandName => &self.brand_name,
            FirmField::Email => &self.email,
        }
    }

    fn with(self, field: FirmField, value: String) -> Self {
        match field {
            FirmField::Name => Self { name: value, ..self },
            FirmField::BrandName => Self {
                brand_name: value,
                ..self
            },
            FirmField::Email => Self {
                email: value,
                ..self
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representative {
    pub name: String,
    /// Collected and sent as-is; no format is enforced.
    pub mobile: Option<String>,
    pub image: Option<ImageFile>,
}

/// Ordered list of representatives that always holds at least one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Representative>", into = "Vec<Representative>")]
pub struct Representatives(Vec<Representative>);

impl Representatives {
    /// A list with a single empty row.
    pub fn new() -> Self {
        Self(vec![Representative::default()])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&Representative> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Representative> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Representative] {
        &self.0
    }

    /// False when only one row is left.
    pub fn can_remove(&self) -> bool {
        self.0.len() > 1
    }

    fn pushed_default(self) -> Self {
        let mut rows = self.0;
        rows.push(Representative::default());
        Self(rows)
    }

    /// The only place rows are dropped. Removing the last remaining row, or an
    /// index past the end, hands the list back untouched and `false`.
    fn removed(self, index: usize) -> (Self, bool) {
        if !self.can_remove() || index >= self.0.len() {
            return (self, false);
        }
        let rows = self
            .0
            .into_iter()
            .enumerate()
            .filter_map(|(i, rep)| (i != index).then_some(rep))
            .collect();
        (Self(rows), true)
    }

    fn updated(self, index: usize, f: impl FnOnce(Representative) -> Representative) -> Self {
        if index >= self.0.len() {
            return self;
        }
        let mut rows = self.0;
        let current = std::mem::take(&mut rows[index]);
        rows[index] = f(current);
        Self(rows)
    }
}

impl Default for Representatives {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Representative>> for Representatives {
    type Error = &'static str;

    fn try_from(rows: Vec<Representative>) -> Result<Self, Self::Error> {
        if rows.is_empty() {
            return Err("at least one representative is required");
        }
        Ok(Self(rows))
    }
}

impl From<Representatives> for Vec<Representative> {
    fn from(value: Representatives) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a Representatives {
    type Item = &'a Representative;
    type IntoIter = std::slice::Iter<'a, Representative>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub firm: FirmInfo,
    pub representatives: Representatives,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetFirmField(FirmField, String),
    AddRepresentative,
    RemoveRepresentative(usize),
    SetRepresentativeName(usize, String),
    SetRepresentativeMobile(usize, Option<String>),
    SetRepresentativeImage(usize, ImageFile),
    ClearRepresentativeImage(usize),
}

/// Applies `action`, returning the next state and error report.
///
/// An edit clears the error entry of the edited field, and only that one. The
/// error report is kept row-aligned with the representative list.
pub fn reduce(state: FormState, errors: ErrorReport, action: Action) -> (FormState, ErrorReport) {
    let FormState {
        firm,
        representatives,
    } = state;

    let (state, errors) = match action {
        Action::SetFirmField(field, value) => (
            FormState {
                firm: firm.with(field, value),
                representatives,
            },
            errors.cleared_firm(field),
        ),
        Action::AddRepresentative => (
            FormState {
                firm,
                representatives: representatives.pushed_default(),
            },
            errors.with_row_added(),
        ),
        Action::RemoveRepresentative(index) => {
            let (representatives, removed) = representatives.removed(index);
            let errors = if removed {
                errors.with_row_removed(index)
            } else {
                errors
            };
            (
                FormState {
                    firm,
                    representatives,
                },
                errors,
            )
        }
        Action::SetRepresentativeName(index, name) => (
            FormState {
                firm,
                representatives: representatives
                    .updated(index, |rep| Representative { name, ..rep }),
            },
            errors.cleared_representative_name(index),
        ),
        Action::SetRepresentativeMobile(index, mobile) => {
            let mobile = mobile.filter(|m| !m.trim().is_empty());
            (
                FormState {
                    firm,
                    representatives: representatives
                        .updated(index, |rep| Representative { mobile, ..rep }),
                },
                errors,
            )
        }
        Action::SetRepresentativeImage(index, image) => (
            FormState {
                firm,
                representatives: representatives.updated(index, |rep| Representative {
                    image: Some(image),
                    ..rep
                }),
            },
            errors.cleared_representative_image(index),
        ),
        Action::ClearRepresentativeImage(index) => (
            FormState {
                firm,
                representatives: representatives.updated(index, |rep| Representative {
                    image: None,
                    ..rep
                }),
            },
            errors,
        ),
    };

    let rows = state.representatives.len();
    (state, errors.aligned(rows))
}

/// State and error report travelling together, as the front ends hold them.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub state: FormState,
    pub errors: ErrorReport,
}

impl Form {
    pub fn new() -> Self {
        let state = FormState::default();
        let errors = ErrorReport::default().aligned(state.representatives.len());
        Self { state, errors }
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        let errors = std::mem::take(&mut self.errors);
        let (state, errors) = reduce(state, errors, action);
        self.state = state;
        self.errors = errors;
    }

    /// Runs the validator and replaces the error report with its result.
    pub fn validate(&mut self) -> bool {
        let (errors, valid) =
            crate::validation::validate(&self.state.firm, &self.state.representatives);
        self.errors = errors;
        valid
    }

    /// Back to the empty form, ready for a new registration.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}
