use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::{
    error::FieldError,
    form::{FirmField, FirmInfo, Representatives},
};

/// Largest accepted photo, in bytes.
pub const MAX_IMAGE_BYTES: u64 = 5_000_000;

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FirmErrors {
    pub name: Option<FieldError>,
    pub brand_name: Option<FieldError>,
    pub email: Option<FieldError>,
}

impl FirmErrors {
    pub fn get(&self, field: FirmField) -> Option<&FieldError> {
        match field {
            FirmField::Name => self.name.as_ref(),
            FirmField::BrandName => self.brand_name.as_ref(),
            FirmField::Email => self.email.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepresentativeErrors {
    pub name: Option<FieldError>,
    pub image: Option<FieldError>,
}

impl RepresentativeErrors {
    pub fn is_clean(&self) -> bool {
        self.name.is_none() && self.image.is_none()
    }
}

/// Per-field validation messages, shaped like the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub firm: FirmErrors,
    pub representatives: Vec<RepresentativeErrors>,
}

impl ErrorReport {
    pub fn is_clean(&self) -> bool {
        self.firm.name.is_none()
            && self.firm.brand_name.is_none()
            && self.firm.email.is_none()
            && self.representatives.iter().all(RepresentativeErrors::is_clean)
    }

    pub fn representative(&self, index: usize) -> Option<&RepresentativeErrors> {
        self.representatives.get(index)
    }

    /// Flattened `(field, error)` pairs, firm fields first, then rows in order.
    pub fn entries(&self) -> Vec<(String, &FieldError)> {
        let mut out = Vec::new();
        for field in [FirmField::Name, FirmField::BrandName, FirmField::Email] {
            if let Some(err) = self.firm.get(field) {
                out.push((field.label().to_string(), err));
            }
        }
        for (index, row) in self.representatives.iter().enumerate() {
            if let Some(err) = &row.name {
                out.push((format!("Representative {} name", index + 1), err));
            }
            if let Some(err) = &row.image {
                out.push((format!("Representative {} image", index + 1), err));
            }
        }
        out
    }

    pub(crate) fn cleared_firm(self, field: FirmField) -> Self {
        let firm = match field {
            FirmField::Name => FirmErrors {
                name: None,
                ..self.firm
            },
            FirmField::BrandName => FirmErrors {
                brand_name: None,
                ..self.firm
            },
            FirmField::Email => FirmErrors {
                email: None,
                ..self.firm
            },
        };
        Self { firm, ..self }
    }

    pub(crate) fn cleared_representative_name(self, index: usize) -> Self {
        self.map_row(index, |row| RepresentativeErrors { name: None, ..row })
    }

    pub(crate) fn cleared_representative_image(self, index: usize) -> Self {
        self.map_row(index, |row| RepresentativeErrors { image: None, ..row })
    }

    pub(crate) fn with_row_added(self) -> Self {
        let mut representatives = self.representatives;
        representatives.push(RepresentativeErrors::default());
        Self {
            representatives,
            ..self
        }
    }

    pub(crate) fn with_row_removed(self, index: usize) -> Self {
        let representatives = self
            .representatives
            .into_iter()
            .enumerate()
            .filter_map(|(i, row)| (i != index).then_some(row))
            .collect();
        Self {
            representatives,
            ..self
        }
    }

    /// Pads or truncates the row entries to `rows`.
    pub(crate) fn aligned(self, rows: usize) -> Self {
        let mut representatives = self.representatives;
        representatives.resize_with(rows, RepresentativeErrors::default);
        Self {
            representatives,
            ..self
        }
    }

    fn map_row(
        self,
        index: usize,
        f: impl FnOnce(RepresentativeErrors) -> RepresentativeErrors,
    ) -> Self {
        let mut f = Some(f);
        let representatives = self
            .representatives
            .into_iter()
            .enumerate()
            .map(|(i, row)| match f.take_if(|_| i == index) {
                Some(f) => f(row),
                None => row,
            })
            .collect();
        Self {
            representatives,
            ..self
        }
    }
}

/// Checks the whole form in one pass, collecting every failure.
///
/// Returns the report and whether it is clean. Inputs are only read.
pub fn validate(firm: &FirmInfo, representatives: &Representatives) -> (ErrorReport, bool) {
    let firm_errors = FirmErrors {
        name: required(&firm.name, FieldError::FirmNameRequired),
        brand_name: required(&firm.brand_name, FieldError::BrandNameRequired),
        email: validate_email(&firm.email),
    };

    let rows = representatives
        .iter()
        .map(|rep| RepresentativeErrors {
            name: required(&rep.name, FieldError::RepresentativeNameRequired),
            image: match &rep.image {
                None => Some(FieldError::ImageRequired),
                Some(image) if image.size() > MAX_IMAGE_BYTES => Some(FieldError::ImageTooLarge {
                    size: image.size(),
                }),
                Some(_) => None,
            },
        })
        .collect();

    let report = ErrorReport {
        firm: firm_errors,
        representatives: rows,
    };
    let valid = report.is_clean();
    (report, valid)
}

fn required(value: &str, err: FieldError) -> Option<FieldError> {
    value.trim().is_empty().then_some(err)
}

fn validate_email(email: &str) -> Option<FieldError> {
    if email.trim().is_empty() {
        return Some(FieldError::EmailRequired);
    }
    (!EMAIL.is_match(email)).then_some(FieldError::EmailInvalid)
}
