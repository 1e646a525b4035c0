use api_types::fields;

use crate::{form::FormState, image::ImageFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File(ImageFile),
}

/// Ordered multipart fields of one registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPayload {
    parts: Vec<(String, PartValue)>,
}

impl RegistrationPayload {
    /// Lays out the fields in the order the endpoint expects.
    ///
    /// Meant for a state that already passed validation: a row without a photo
    /// simply has no image part. An absent mobile is sent as an empty string.
    pub fn from_state(state: &FormState) -> Self {
        let count = state.representatives.len();
        let mut parts = Vec::with_capacity(4 + count * 3);

        parts.push(text(fields::FIRM_NAME, &state.firm.name));
        parts.push(text(fields::BRAND_NAME, &state.firm.brand_name));
        parts.push(text(fields::FIRM_EMAIL, &state.firm.email));
        parts.push(text(fields::REGISTER_COUNTER, &count.to_string()));

        for (index, rep) in state.representatives.iter().enumerate() {
            parts.push((
                fields::representative(index, fields::REP_NAME),
                PartValue::Text(rep.name.clone()),
            ));
            parts.push((
                fields::representative(index, fields::REP_MOBILE),
                PartValue::Text(rep.mobile.clone().unwrap_or_default()),
            ));
            if let Some(image) = &rep.image {
                parts.push((
                    fields::representative(index, fields::REP_IMAGE),
                    PartValue::File(image.clone()),
                ));
            }
        }

        Self { parts }
    }

    pub fn parts(&self) -> &[(String, PartValue)] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<(String, PartValue)> {
        self.parts
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(key, value)| match value {
            PartValue::Text(text) if key == name => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn representative_count(&self) -> usize {
        self.text(fields::REGISTER_COUNTER)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

fn text(name: &str, value: &str) -> (String, PartValue) {
    (name.to_string(), PartValue::Text(value.to_string()))
}
