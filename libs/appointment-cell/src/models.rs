// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use directory_cell::Specialization;

/// External chat identifier; one conversation per chat.
pub type ConversationId = i64;

// ==============================================================================
// CONVERSATION STATE
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Start,
    ChoosingSpecialization,
    ChoosingClinic,
    ChoosingMode,
    ChoosingDoctor,
    ChoosingTime,
    WaitingForWebapp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Start => write!(f, "start"),
            Stage::ChoosingSpecialization => write!(f, "choosing_specialization"),
            Stage::ChoosingClinic => write!(f, "choosing_clinic"),
            Stage::ChoosingMode => write!(f, "choosing_mode"),
            Stage::ChoosingDoctor => write!(f, "choosing_doctor"),
            Stage::ChoosingTime => write!(f, "choosing_time"),
            Stage::WaitingForWebapp => write!(f, "waiting_for_webapp"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Selections {
    pub chosen_specialization: Option<Specialization>,
    pub chosen_clinic: Option<i64>,
    pub chosen_doctor: Option<i64>,
    pub chosen_doctor_name: Option<String>,
}

/// Per-conversation wizard state. Lives only as long as the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationState {
    pub stage: Stage,
    pub selections: Selections,
}

impl ConversationState {
    /// Same selections, different stage.
    pub fn at(&self, stage: Stage) -> Self {
        Self {
            stage,
            selections: self.selections.clone(),
        }
    }
}

// ==============================================================================
// USER TRIGGERS
// ==============================================================================

/// Callback tokens carried by inline buttons. Parsed and formatted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Appointment,
    MyAppointments,
    GoBackToStart,
    /// Any `spec_*` code; validated against the closed set when selected.
    Specialization(String),
    Clinic(i64),
    ChooseDoctor,
    NearestSlot,
    GoBackToClinics,
    GoBackToMode,
    Doctor(i64),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Appointment => write!(f, "appointment"),
            Action::MyAppointments => write!(f, "my_appointments"),
            Action::GoBackToStart => write!(f, "go_back_to_start"),
            Action::Specialization(code) => write!(f, "{}", code),
            Action::Clinic(id) => write!(f, "clinic_{}", id),
            Action::ChooseDoctor => write!(f, "choose_doctor"),
            Action::NearestSlot => write!(f, "nearest_slot"),
            Action::GoBackToClinics => write!(f, "go_back_to_clinics"),
            Action::GoBackToMode => write!(f, "go_back_to_mode"),
            Action::Doctor(id) => write!(f, "doctor_{}", id),
        }
    }
}

impl FromStr for Action {
    type Err = WizardError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let action = match token {
            "appointment" => Action::Appointment,
            "my_appointments" => Action::MyAppointments,
            "go_back_to_start" => Action::GoBackToStart,
            "choose_doctor" => Action::ChooseDoctor,
            "nearest_slot" => Action::NearestSlot,
            "go_back_to_clinics" => Action::GoBackToClinics,
            "go_back_to_mode" => Action::GoBackToMode,
            _ if token.starts_with("spec_") => Action::Specialization(token.to_string()),
            _ => {
                if let Some(id) = token.strip_prefix("clinic_") {
                    Action::Clinic(parse_id(token, id)?)
                } else if let Some(id) = token.strip_prefix("doctor_") {
                    Action::Doctor(parse_id(token, id)?)
                } else {
                    return Err(WizardError::InvalidAction(token.to_string()));
                }
            }
        };
        Ok(action)
    }
}

fn parse_id(token: &str, raw: &str) -> Result<i64, WizardError> {
    raw.parse()
        .map_err(|_| WizardError::InvalidAction(token.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Appointment,
    MyAppointments,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Start, Command::Appointment, Command::MyAppointments];

    /// Recognises `/start`, `/start@SomeBot` and trailing arguments.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Appointment => "appointment",
            Command::MyAppointments => "my_appointments",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "Main menu",
            Command::Appointment => "Book a doctor",
            Command::MyAppointments => "My appointments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Command(Command),
    Callback(Action),
}

// ==============================================================================
// RENDERED OUTPUT
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonTarget {
    Callback(Action),
    WebApp(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub target: ButtonTarget,
}

impl Button {
    pub fn callback(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Callback(action),
        }
    }

    pub fn web_app(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::WebApp(url.into()),
        }
    }
}

/// Text plus a grid of buttons, independent of the messaging transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub text: String,
    pub rows: Vec<Vec<Button>>,
}

impl Menu {
    pub fn new(text: impl Into<String>, rows: Vec<Vec<Button>>) -> Self {
        Self { text: text.into(), rows }
    }

    /// A message with no buttons; the conversation can only continue from the root menu.
    pub fn terminal(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }
}

/// Result of one controller operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub menu: Menu,
    pub state: ConversationState,
}

impl Transition {
    pub fn new(menu: Menu, state: ConversationState) -> Self {
        Self { menu, state }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Unknown specialization: {0}")]
    UnknownSpecialization(String),

    #[error("Unrecognised action: {0}")]
    InvalidAction(String),

    #[error("Directory lookup failed: {0}")]
    Directory(#[from] anyhow::Error),
}

impl WizardError {
    /// Text shown to the user. Never includes internal details.
    pub fn user_message(&self) -> &'static str {
        match self {
            WizardError::UnknownSpecialization(_) => "Unknown specialization",
            WizardError::InvalidAction(_) => "This button is no longer available",
            WizardError::Directory(_) => "The service is temporarily unavailable. Please try again later.",
        }
    }

    /// Input errors are shown as a popup alert and leave the conversation untouched.
    pub fn is_alert(&self) -> bool {
        matches!(self, WizardError::UnknownSpecialization(_) | WizardError::InvalidAction(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_action_tokens_parse_verbatim() {
        let tokens = [
            "appointment", "my_appointments", "go_back_to_start", "spec_surgeon",
            "clinic_3", "choose_doctor", "nearest_slot", "go_back_to_clinics",
            "go_back_to_mode", "doctor_7",
        ];
        for token in tokens {
            let action: Action = token.parse().unwrap();
            assert_eq!(action.to_string(), token);
        }
        assert_eq!("clinic_3".parse::<Action>().unwrap(), Action::Clinic(3));
        assert_eq!("doctor_7".parse::<Action>().unwrap(), Action::Doctor(7));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        assert_matches!("clinic_abc".parse::<Action>(), Err(WizardError::InvalidAction(t)) if t == "clinic_abc");
        assert_matches!("doctor_".parse::<Action>(), Err(WizardError::InvalidAction(_)));
        assert_matches!("something_else".parse::<Action>(), Err(WizardError::InvalidAction(_)));
        // Unknown specialization codes parse; they fail when selected.
        assert_eq!(
            "spec_dentist".parse::<Action>().unwrap(),
            Action::Specialization("spec_dentist".to_string())
        );
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/appointment@MedClinicBot"), Some(Command::Appointment));
        assert_eq!(Command::parse("/my_appointments now"), Some(Command::MyAppointments));
        assert_eq!(Command::parse("start"), None);
        assert_eq!(Command::parse("/help"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_error_presentation() {
        assert!(WizardError::UnknownSpecialization("spec_x".to_string()).is_alert());
        let err = WizardError::from(anyhow::anyhow!("connection refused"));
        assert!(!err.is_alert());
        assert!(!err.user_message().contains("connection refused"));
    }
}
