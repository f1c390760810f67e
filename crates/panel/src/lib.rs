pub mod config;
mod controller;
mod drafts;
mod ui;

pub use controller::{PanelController, PanelError, SubmitOutcome};
pub use drafts::DraftDebouncer;
pub use ui::{DeleteState, Dismiss, EditState, UiState};
