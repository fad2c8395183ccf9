use serde::{Deserialize, Serialize};

/// The locally "logged in" user. Carries no credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub phone_number: String,
    pub country_code: String,
}

impl Identity {
    pub fn new(phone_number: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            country_code: country_code.into(),
        }
    }

    /// Both phone fields are non-blank
    pub fn is_complete(&self) -> bool {
        !self.phone_number.trim().is_empty() && !self.country_code.trim().is_empty()
    }

    /// Full number in display form, e.g. `+91 9876543210`
    pub fn display_number(&self) -> String {
        format!("{} {}", self.country_code, self.phone_number)
    }
}
