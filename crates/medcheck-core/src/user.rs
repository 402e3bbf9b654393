//! User identity and the patient/professional role split.

use serde::{Deserialize, Serialize};

/// Session role. Role-specific data lives with the tag so gating code can
/// match exhaustively instead of comparing role strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "UPPERCASE")]
pub enum Role {
    Patient,
    Professional {
        #[serde(rename = "licenseNumber")]
        license_number: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        specialty: Option<String>,
    },
}

impl Role {
    pub fn is_professional(&self) -> bool {
        matches!(self, Self::Professional { .. })
    }
}

/// A signed-in user. Fabricated at sign-in, lives for the session, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub role: Role,
    pub verified: bool,
}
