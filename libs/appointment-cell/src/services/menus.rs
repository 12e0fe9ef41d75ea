use directory_cell::{Clinic, Doctor, Specialization};

use crate::models::{Action, Button, Menu};

pub const GREETING: &str =
    "Hello! This is MedClinic.\nHere you can book an appointment with a specialist or view your appointments.";
pub const CHOOSE_SPECIALIST: &str = "Choose the specialist you want to see:";
pub const CHOOSE_MODE: &str = "How would you like to book?";
pub const CHOOSE_DOCTOR: &str = "Choose a doctor:";
pub const OPEN_SCHEDULE: &str = "Press the button below to open the schedule and pick a time:";
pub const NO_CLINICS: &str = "No clinics are available for the chosen specialist.";
pub const NO_DOCTORS: &str =
    "Unfortunately, there are no doctors of this specialization available at this clinic.";
pub const NEAREST_SLOT_PENDING: &str =
    "Searching for the nearest available slot is not available yet. Please choose a doctor instead.";
pub const MY_APPOINTMENTS_PENDING: &str = "Viewing your appointments is not available yet.";
pub const MISSING_SPECIALIZATION: &str =
    "Error: no specialization selected. Please choose a specialist again.";
pub const MISSING_CLINIC_OR_SPECIALIZATION: &str =
    "Error: a clinic or specialization has not been selected.";

const BACK: &str = "🔙 Back";

fn back(action: Action) -> Vec<Button> {
    vec![Button::callback(BACK, action)]
}

pub fn root_menu() -> Menu {
    Menu::new(
        GREETING,
        vec![vec![
            Button::callback("👩‍⚕ Book a doctor", Action::Appointment),
            Button::callback("📋 My appointments", Action::MyAppointments),
        ]],
    )
}

fn specialization_button(spec: Specialization) -> Button {
    Button::callback(spec.label(), Action::Specialization(spec.code().to_string()))
}

fn specialization_rows() -> Vec<Vec<Button>> {
    vec![
        vec![
            specialization_button(Specialization::Therapist),
            specialization_button(Specialization::Gynecologist),
            specialization_button(Specialization::Surgeon),
        ],
        vec![
            specialization_button(Specialization::Urologist),
            Button::callback(BACK, Action::GoBackToStart),
        ],
    ]
}

pub fn specialization_menu() -> Menu {
    Menu::new(CHOOSE_SPECIALIST, specialization_rows())
}

/// Precondition failure: explain, then offer the specialization list again.
pub fn restart_from_specialization_menu(reason: &str) -> Menu {
    Menu::new(format!("{}\n\n{}", reason, CHOOSE_SPECIALIST), specialization_rows())
}

pub fn clinic_menu(specialization: Specialization, clinics: &[Clinic]) -> Menu {
    let mut rows: Vec<Vec<Button>> = clinics
        .iter()
        .map(|clinic| vec![Button::callback(clinic.display_label(), Action::Clinic(clinic.id))])
        .collect();
    rows.push(back(Action::Appointment));

    Menu::new(
        format!("You chose: {}\n\nChoose a clinic that suits you:", specialization),
        rows,
    )
}

pub fn mode_menu() -> Menu {
    Menu::new(
        CHOOSE_MODE,
        vec![
            vec![
                Button::callback("📋 Choose a doctor", Action::ChooseDoctor),
                Button::callback("⏱ Nearest slot", Action::NearestSlot),
            ],
            back(Action::GoBackToClinics),
        ],
    )
}

pub fn missing_selection_menu() -> Menu {
    Menu::new(
        MISSING_CLINIC_OR_SPECIALIZATION,
        vec![vec![Button::callback("Choose a specialist", Action::Appointment)]],
    )
}

pub fn doctor_menu(doctors: &[Doctor]) -> Menu {
    let mut rows: Vec<Vec<Button>> = doctors
        .iter()
        .map(|doctor| vec![Button::callback(doctor.full_name.as_str(), Action::Doctor(doctor.id))])
        .collect();
    rows.push(back(Action::GoBackToMode));

    Menu::new(CHOOSE_DOCTOR, rows)
}

pub fn handoff_menu(doctor_name: &str, url: &str) -> Menu {
    Menu::new(
        format!("Doctor: {}\n\n{}", doctor_name, OPEN_SCHEDULE),
        vec![
            vec![Button::web_app("Open the doctor's schedule", url)],
            back(Action::ChooseDoctor),
        ],
    )
}

pub fn nearest_slot_menu() -> Menu {
    Menu::new(NEAREST_SLOT_PENDING, vec![back(Action::GoBackToMode)])
}

pub fn my_appointments_menu() -> Menu {
    Menu::new(MY_APPOINTMENTS_PENDING, vec![back(Action::GoBackToStart)])
}
