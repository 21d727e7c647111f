//! Domain entities - The intake draft and the wizard that owns it

mod draft_store;
mod intake_draft;
mod wizard;

pub use intake_draft::{
    AvailableDays, DateField, DaysPreset, DraftUpdate, IntakeDraft, ListField, TextField,
    TimeField,
};
pub use wizard::{Step, WizardSession, WizardState};
