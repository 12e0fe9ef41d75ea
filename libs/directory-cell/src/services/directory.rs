use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Clinic, Doctor, Specialization, UNKNOWN_DOCTOR};

/// Read-only view of the clinic directory. Every call is an independent read.
#[async_trait]
pub trait DirectoryLookup: Send + Sync {
    /// Clinics with at least one active doctor of `specialization`, each listed once, ordered by id.
    async fn clinics_offering_specialization(&self, specialization: Specialization) -> Result<Vec<Clinic>>;

    /// Active doctors of `specialization` working at `clinic_id`, ordered by id.
    async fn doctors_at(&self, clinic_id: i64, specialization: Specialization) -> Result<Vec<Doctor>>;

    /// Display name of a doctor, or [`UNKNOWN_DOCTOR`] when it cannot be resolved.
    async fn doctor_name(&self, doctor_id: i64) -> String;
}

#[derive(Debug, Deserialize)]
struct DoctorNameRow {
    full_name: String,
}

pub struct SupabaseDirectory {
    supabase: SupabaseClient,
}

impl SupabaseDirectory {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

/// Keeps the first occurrence of every clinic id.
pub(crate) fn collapse_clinics(clinics: Vec<Clinic>) -> Vec<Clinic> {
    let mut unique: Vec<Clinic> = Vec::with_capacity(clinics.len());
    for clinic in clinics {
        if !unique.iter().any(|seen| seen.id == clinic.id) {
            unique.push(clinic);
        }
    }
    unique
}

#[async_trait]
impl DirectoryLookup for SupabaseDirectory {
    async fn clinics_offering_specialization(&self, specialization: Specialization) -> Result<Vec<Clinic>> {
        debug!("Fetching clinics offering {}", specialization);

        // Inner embed filters clinics down to those with a matching doctor.
        let clinics: Vec<Clinic> = self.supabase.select(
            "clinics",
            &[
                ("select", "id,address,doctors!inner(id)".to_string()),
                ("doctors.specialization", format!("eq.{}", specialization.label())),
                ("doctors.is_active", "eq.true".to_string()),
                ("order", "id.asc".to_string()),
            ],
        ).await?;

        let clinics = collapse_clinics(clinics);
        debug!("Found {} clinics for {}", clinics.len(), specialization);
        Ok(clinics)
    }

    async fn doctors_at(&self, clinic_id: i64, specialization: Specialization) -> Result<Vec<Doctor>> {
        debug!("Fetching {} doctors at clinic {}", specialization, clinic_id);

        let doctors: Vec<Doctor> = self.supabase.select(
            "doctors",
            &[
                ("select", "id,full_name,specialization,is_active,clinic_id".to_string()),
                ("clinic_id", format!("eq.{}", clinic_id)),
                ("specialization", format!("eq.{}", specialization.label())),
                ("is_active", "eq.true".to_string()),
                ("order", "id.asc".to_string()),
            ],
        ).await?;

        Ok(doctors)
    }

    async fn doctor_name(&self, doctor_id: i64) -> String {
        debug!("Resolving name of doctor {}", doctor_id);

        let result: Result<Vec<DoctorNameRow>> = self.supabase.select(
            "doctors",
            &[
                ("select", "full_name".to_string()),
                ("id", format!("eq.{}", doctor_id)),
                ("limit", "1".to_string()),
            ],
        ).await;

        match result {
            Ok(rows) => match rows.into_iter().next() {
                Some(row) => row.full_name,
                None => {
                    warn!("Doctor {} not found, using placeholder name", doctor_id);
                    UNKNOWN_DOCTOR.to_string()
                }
            },
            Err(e) => {
                error!("Failed to resolve doctor {}: {}", doctor_id, e);
                UNKNOWN_DOCTOR.to_string()
            }
        }
    }
}
