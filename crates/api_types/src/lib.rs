use serde::{Deserialize, Serialize};

/// Path of the registration endpoint, relative to the configured base URL.
pub const INSERT_PARTICIPANT_IDCARD: &str = "api/insert-participant-idcard";

pub mod fields {
    //! Multipart field names understood by the registration endpoint.

    pub const FIRM_NAME: &str = "id_name_of_firm";
    pub const BRAND_NAME: &str = "id_card_brand_name";
    pub const FIRM_EMAIL: &str = "id_firm_email";
    /// Decimal count of the representative rows that follow.
    pub const REGISTER_COUNTER: &str = "register_counter";

    pub const REP_NAME: &str = "idcardsub_rep_name";
    /// Optional; the endpoint receives an empty string when no mobile was given.
    pub const REP_MOBILE: &str = "idcardsub_rep_mobile";
    pub const REP_IMAGE: &str = "idcardsub_rep_image";

    /// Builds the indexed name of a representative field, e.g.
    /// `idcardsub[0][idcardsub_rep_name]`.
    pub fn representative(index: usize, field: &str) -> String {
        format!("idcardsub[{index}][{field}]")
    }
}

pub mod registration {
    use super::*;

    /// Body returned by the endpoint on a 2xx response.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RegistrationAccepted {
        #[serde(default)]
        pub msg: Option<String>,
    }

    /// Body returned by the endpoint on a rejected registration.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RegistrationRejected {
        #[serde(default)]
        pub message: Option<String>,
    }
}
