//! Form draft store - Owns the draft and applies merge-style updates

use chrono::Weekday;

use crate::domain::entities::intake_draft::{
    AvailableDays, DaysPreset, DraftUpdate, IntakeDraft, ListField,
};
use crate::domain::value_objects::{LocationResult, LocationSource};

/// Holds the draft for one session.
///
/// Every operation is synchronous and total. Writes replace a single leaf
/// (or a single list) and never reset other fields of the same group.
#[derive(Debug, Clone, Default)]
pub struct FormDraftStore {
    draft: IntakeDraft,
}

impl FormDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &IntakeDraft {
        &self.draft
    }

    pub fn set(&mut self, update: DraftUpdate) {
        self.draft.apply(update);
    }

    /// Flip one weekday flag
    pub fn toggle(&mut self, day: Weekday) {
        self.draft.availability.days.toggle(day);
    }

    pub fn select_days(&mut self, preset: DaysPreset) {
        self.draft.availability.days = AvailableDays::from_preset(preset);
    }

    /// Append photo references after any already attached
    pub fn append_photos<I>(&mut self, references: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.draft.list_mut(ListField::Photos).extend(references);
    }

    /// Write a captured location into the location group.
    ///
    /// A raw result carries no address, so whatever the operator typed stays.
    pub fn record_location(&mut self, result: &LocationResult) {
        let location = &mut self.draft.location;
        location.coordinates = Some(result.coordinates);
        location.landmark = result.landmark.clone();
        if result.source == LocationSource::Geocoded {
            if let Some(address) = &result.address {
                location.address = address.clone();
            }
        }
    }
}
