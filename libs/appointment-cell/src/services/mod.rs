pub mod controller;
pub mod handoff;
pub mod lifecycle;
pub mod menus;
pub mod store;

pub use controller::DialogueController;
pub use handoff::handoff_url;
pub use lifecycle::WizardLifecycle;
pub use store::ConversationStore;
