// libs/directory-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label used when a doctor id does not resolve to a name.
pub const UNKNOWN_DOCTOR: &str = "Unknown doctor";

/// Label rendered for clinics that have no address on file.
pub const NO_ADDRESS_LABEL: &str = "No address";

// ==============================================================================
// SPECIALIZATIONS
// ==============================================================================

/// Closed set of medical fields a doctor may practice.
///
/// Stored in the `doctors.specialization` column by label, e.g. `"Therapist"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Specialization {
    Therapist,
    Gynecologist,
    Surgeon,
    Urologist,
}

impl Specialization {
    pub const ALL: [Specialization; 4] = [
        Specialization::Therapist,
        Specialization::Gynecologist,
        Specialization::Surgeon,
        Specialization::Urologist,
    ];

    /// Resolve a menu code such as `spec_therapist`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|spec| spec.code() == code)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Specialization::Therapist => "spec_therapist",
            Specialization::Gynecologist => "spec_gynecologist",
            Specialization::Surgeon => "spec_surgeon",
            Specialization::Urologist => "spec_urologist",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Specialization::Therapist => "Therapist",
            Specialization::Gynecologist => "Gynecologist",
            Specialization::Surgeon => "Surgeon",
            Specialization::Urologist => "Urologist",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Specialization {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|spec| spec.label() == s)
            .ok_or_else(|| DirectoryError::InvalidSpecialization(s.to_string()))
    }
}

impl TryFrom<String> for Specialization {
    type Error = DirectoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Specialization> for String {
    fn from(spec: Specialization) -> Self {
        spec.label().to_string()
    }
}

// ==============================================================================
// DIRECTORY RECORDS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub id: i64,
    pub address: Option<String>,
}

impl Clinic {
    /// Button label for the clinic list.
    pub fn display_label(&self) -> &str {
        match self.address.as_deref() {
            Some(address) if !address.trim().is_empty() => address,
            _ => NO_ADDRESS_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub full_name: String,
    pub specialization: Specialization,
    pub is_active: bool,
    pub clinic_id: i64,
}

impl Doctor {
    /// True when this doctor is bookable for `specialization` at `clinic_id`.
    pub fn practices(&self, clinic_id: i64, specialization: Specialization) -> bool {
        self.is_active && self.specialization == specialization && self.clinic_id == clinic_id
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum DirectoryError {
    #[error("Unknown specialization label: {0}")]
    InvalidSpecialization(String),
}
