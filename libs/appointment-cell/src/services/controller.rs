use std::sync::Arc;

use tracing::{debug, info, warn};

use directory_cell::{DirectoryLookup, Specialization};

use crate::models::{
    Action, Command, ConversationState, Menu, Selections, Stage, Transition, Trigger, WizardError,
};
use crate::services::handoff::handoff_url;
use crate::services::lifecycle::WizardLifecycle;
use crate::services::menus;

/// Drives the appointment wizard.
///
/// Every operation takes the current conversation state and returns the menu to
/// render together with the next state. The caller stores the state; the
/// controller itself keeps nothing between calls.
pub struct DialogueController {
    directory: Arc<dyn DirectoryLookup>,
    webapp_url: String,
}

impl DialogueController {
    pub fn new(directory: Arc<dyn DirectoryLookup>, webapp_url: impl Into<String>) -> Self {
        Self {
            directory,
            webapp_url: webapp_url.into(),
        }
    }

    /// Route a user trigger to the matching operation.
    pub async fn handle(
        &self,
        state: &ConversationState,
        trigger: &Trigger,
        patient_id: i64,
    ) -> Result<Transition, WizardError> {
        debug!("Handling {:?} at stage {}", trigger, state.stage);

        let transition = match trigger {
            Trigger::Command(Command::Start) => self.start(),
            Trigger::Command(Command::Appointment) => self.show_specialists(state),
            Trigger::Command(Command::MyAppointments) => self.my_appointments(state),
            Trigger::Callback(action) => match action {
                Action::Appointment => self.show_specialists(state),
                Action::MyAppointments => self.my_appointments(state),
                Action::GoBackToStart => self.go_back_to_start(),
                Action::Specialization(code) => self.select_specialization(state, code).await?,
                Action::Clinic(clinic_id) => self.select_clinic(state, *clinic_id),
                Action::ChooseDoctor => self.choose_doctor_mode(state).await?,
                Action::NearestSlot => self.nearest_slot(state),
                Action::GoBackToClinics => self.go_back_to_clinics(state).await?,
                Action::GoBackToMode => self.go_back_to_mode(state),
                Action::Doctor(doctor_id) => self.select_doctor(state, *doctor_id, patient_id).await,
            },
        };

        WizardLifecycle::record(state.stage, transition.state.stage);
        Ok(transition)
    }

    /// Root menu. Clears everything collected so far.
    pub fn start(&self) -> Transition {
        Transition::new(menus::root_menu(), ConversationState::default())
    }

    pub fn show_specialists(&self, state: &ConversationState) -> Transition {
        Transition::new(
            menus::specialization_menu(),
            state.at(Stage::ChoosingSpecialization),
        )
    }

    pub async fn select_specialization(
        &self,
        state: &ConversationState,
        code: &str,
    ) -> Result<Transition, WizardError> {
        let specialization = Specialization::from_code(code).ok_or_else(|| {
            warn!("Unknown specialization code: {}", code);
            WizardError::UnknownSpecialization(code.to_string())
        })?;

        let clinics = self
            .directory
            .clinics_offering_specialization(specialization)
            .await?;

        // A new specialization invalidates everything chosen after it.
        let mut next = ConversationState {
            stage: state.stage,
            selections: Selections {
                chosen_specialization: Some(specialization),
                ..Selections::default()
            },
        };

        if clinics.is_empty() {
            info!("No clinics offer {}", specialization);
            return Ok(Transition::new(Menu::terminal(menus::NO_CLINICS), next));
        }

        next.stage = Stage::ChoosingClinic;
        Ok(Transition::new(menus::clinic_menu(specialization, &clinics), next))
    }

    pub fn select_clinic(&self, state: &ConversationState, clinic_id: i64) -> Transition {
        if state.selections.chosen_specialization.is_none() {
            warn!("Clinic {} chosen before a specialization", clinic_id);
            return self.reset_to_specialization(menus::MISSING_SPECIALIZATION);
        }

        let mut next = state.at(Stage::ChoosingMode);
        next.selections.chosen_clinic = Some(clinic_id);
        next.selections.chosen_doctor = None;
        next.selections.chosen_doctor_name = None;

        Transition::new(menus::mode_menu(), next)
    }

    pub async fn choose_doctor_mode(&self, state: &ConversationState) -> Result<Transition, WizardError> {
        let (Some(clinic_id), Some(specialization)) = (
            state.selections.chosen_clinic,
            state.selections.chosen_specialization,
        ) else {
            warn!("Doctor list requested without clinic and specialization");
            return Ok(Transition::new(menus::missing_selection_menu(), state.clone()));
        };

        let doctors = self.directory.doctors_at(clinic_id, specialization).await?;

        if doctors.is_empty() {
            info!("No active {} doctors at clinic {}", specialization, clinic_id);
            return Ok(Transition::new(Menu::terminal(menus::NO_DOCTORS), state.clone()));
        }

        Ok(Transition::new(
            menus::doctor_menu(&doctors),
            state.at(Stage::ChoosingDoctor),
        ))
    }

    /// Final step: hand the patient over to the scheduling web view.
    pub async fn select_doctor(
        &self,
        state: &ConversationState,
        doctor_id: i64,
        patient_id: i64,
    ) -> Transition {
        if !Self::has_clinic_and_specialization(state) {
            warn!("Doctor {} chosen without clinic and specialization", doctor_id);
            return self.reset_to_specialization(menus::MISSING_CLINIC_OR_SPECIALIZATION);
        }

        let doctor_name = self.directory.doctor_name(doctor_id).await;
        let url = handoff_url(&self.webapp_url, doctor_id, &doctor_name, patient_id);

        let mut next = state.at(Stage::WaitingForWebapp);
        next.selections.chosen_doctor = Some(doctor_id);
        next.selections.chosen_doctor_name = Some(doctor_name.clone());

        info!("Handing off patient {} to schedule of doctor {}", patient_id, doctor_id);
        Transition::new(menus::handoff_menu(&doctor_name, &url), next)
    }

    /// Placeholder: there is no slot search behind this option.
    pub fn nearest_slot(&self, state: &ConversationState) -> Transition {
        if !Self::has_clinic_and_specialization(state) {
            warn!("Nearest slot requested without clinic and specialization");
            return self.reset_to_specialization(menus::MISSING_CLINIC_OR_SPECIALIZATION);
        }

        Transition::new(menus::nearest_slot_menu(), state.at(Stage::ChoosingTime))
    }

    /// Placeholder: appointment history is not implemented.
    pub fn my_appointments(&self, state: &ConversationState) -> Transition {
        Transition::new(menus::my_appointments_menu(), state.clone())
    }

    pub fn go_back_to_start(&self) -> Transition {
        self.start()
    }

    /// Re-runs the clinic query for the stored specialization.
    pub async fn go_back_to_clinics(&self, state: &ConversationState) -> Result<Transition, WizardError> {
        let Some(specialization) = state.selections.chosen_specialization else {
            warn!("Back to clinics without a specialization");
            return Ok(self.reset_to_specialization(menus::MISSING_SPECIALIZATION));
        };

        let clinics = self
            .directory
            .clinics_offering_specialization(specialization)
            .await?;

        if clinics.is_empty() {
            return Ok(Transition::new(Menu::terminal(menus::NO_CLINICS), state.clone()));
        }

        Ok(Transition::new(
            menus::clinic_menu(specialization, &clinics),
            state.at(Stage::ChoosingClinic),
        ))
    }

    pub fn go_back_to_mode(&self, state: &ConversationState) -> Transition {
        if !Self::has_clinic_and_specialization(state) {
            warn!("Back to mode without clinic and specialization");
            return self.reset_to_specialization(menus::MISSING_CLINIC_OR_SPECIALIZATION);
        }

        Transition::new(menus::mode_menu(), state.at(Stage::ChoosingMode))
    }

    fn has_clinic_and_specialization(state: &ConversationState) -> bool {
        state.selections.chosen_specialization.is_some() && state.selections.chosen_clinic.is_some()
    }

    fn reset_to_specialization(&self, reason: &str) -> Transition {
        Transition::new(
            menus::restart_from_specialization_menu(reason),
            ConversationState {
                stage: Stage::ChoosingSpecialization,
                selections: Selections::default(),
            },
        )
    }
}
