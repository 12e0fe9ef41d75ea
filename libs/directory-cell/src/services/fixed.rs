use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Clinic, Doctor, Specialization, UNKNOWN_DOCTOR};
use crate::services::directory::DirectoryLookup;

/// In-process directory over fixed records, with the same filtering and ordering
/// as the PostgREST-backed one.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    clinics: Vec<Clinic>,
    doctors: Vec<Doctor>,
}

impl StaticDirectory {
    pub fn new(mut clinics: Vec<Clinic>, mut doctors: Vec<Doctor>) -> Self {
        clinics.sort_by_key(|c| c.id);
        clinics.dedup_by_key(|c| c.id);
        doctors.sort_by_key(|d| d.id);
        Self { clinics, doctors }
    }
}

#[async_trait]
impl DirectoryLookup for StaticDirectory {
    async fn clinics_offering_specialization(&self, specialization: Specialization) -> Result<Vec<Clinic>> {
        Ok(self
            .clinics
            .iter()
            .filter(|clinic| {
                self.doctors
                    .iter()
                    .any(|d| d.practices(clinic.id, specialization))
            })
            .cloned()
            .collect())
    }

    async fn doctors_at(&self, clinic_id: i64, specialization: Specialization) -> Result<Vec<Doctor>> {
        Ok(self
            .doctors
            .iter()
            .filter(|d| d.practices(clinic_id, specialization))
            .cloned()
            .collect())
    }

    async fn doctor_name(&self, doctor_id: i64) -> String {
        self.doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .map(|d| d.full_name.clone())
            .unwrap_or_else(|| UNKNOWN_DOCTOR.to_string())
    }
}
