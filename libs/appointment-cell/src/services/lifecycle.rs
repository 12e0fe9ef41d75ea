// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::Stage;

/// Shape of the appointment wizard: a linear flow with one back-edge per stage.
pub struct WizardLifecycle;

impl WizardLifecycle {
    /// Stages reachable by moving forward from `stage`.
    pub fn successors(stage: Stage) -> &'static [Stage] {
        match stage {
            Stage::Start => &[Stage::ChoosingSpecialization],
            Stage::ChoosingSpecialization => &[Stage::ChoosingClinic],
            Stage::ChoosingClinic => &[Stage::ChoosingMode],
            Stage::ChoosingMode => &[Stage::ChoosingDoctor, Stage::ChoosingTime],
            Stage::ChoosingDoctor => &[Stage::WaitingForWebapp],
            // Dead ends for this flow
            Stage::ChoosingTime => &[],
            Stage::WaitingForWebapp => &[],
        }
    }

    /// Target of the "back" button shown at `stage`.
    pub fn predecessor(stage: Stage) -> Option<Stage> {
        match stage {
            Stage::Start => None,
            Stage::ChoosingSpecialization => Some(Stage::Start),
            Stage::ChoosingClinic => Some(Stage::ChoosingSpecialization),
            Stage::ChoosingMode => Some(Stage::ChoosingClinic),
            Stage::ChoosingDoctor => Some(Stage::ChoosingMode),
            Stage::ChoosingTime => Some(Stage::ChoosingMode),
            Stage::WaitingForWebapp => Some(Stage::ChoosingDoctor),
        }
    }

    /// Whether `from -> to` follows the wizard graph.
    ///
    /// The root menu and the specialization list are reachable from anywhere
    /// through commands and precondition resets.
    pub fn is_expected(from: Stage, to: Stage) -> bool {
        from == to
            || matches!(to, Stage::Start | Stage::ChoosingSpecialization)
            || Self::successors(from).contains(&to)
            || Self::predecessor(from) == Some(to)
    }

    /// Log a stage change. Buttons from older messages stay clickable, so an
    /// unexpected jump is reported but not refused.
    pub fn record(from: Stage, to: Stage) {
        if from == to {
            return;
        }
        if Self::is_expected(from, to) {
            debug!("Stage transition {} -> {}", from, to);
        } else {
            warn!("Out-of-order stage transition {} -> {}", from, to);
        }
    }
}
