//! Intake draft - The record a wizard session accumulates
//!
//! The draft has a fixed schema. Field access goes through the typed
//! [`DraftUpdate`] enum rather than string keys, so an update can only ever
//! touch the one leaf it names and sibling fields inside a group survive.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Coordinates;

/// The accumulating intake record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeDraft {
    // Identity
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub email: String,
    pub phone: String,
    pub approximate_age: Option<u32>,
    pub gender: String,

    // Volunteer details
    pub preferred_language: String,
    pub area_of_operation: String,
    pub reference: String,
    pub verification_code: String,

    // Physical details
    pub height: String,
    pub physical_description: String,
    pub identifying_marks: String,

    // Current status
    pub mental_state: String,
    pub physical_state: String,
    pub current_situation: String,
    pub belongings: String,

    // Action plan
    pub suggested_action: String,
    pub shelter_preference: String,
    pub follow_up_date: Option<NaiveDate>,

    pub location: LocationGroup,
    pub availability: Availability,

    pub immediate_needs: Vec<String>,
    pub languages_spoken: Vec<String>,
    pub apparent_illnesses: Vec<String>,
    pub documents: Vec<String>,
    /// References to uploaded photos; the files themselves live elsewhere
    pub photos: Vec<String>,
}

/// Where the person was found
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationGroup {
    pub address: String,
    pub landmark: String,
    pub coordinates: Option<Coordinates>,
}

impl LocationGroup {
    /// True when either a typed address or captured coordinates exist
    pub fn is_known(&self) -> bool {
        !self.address.trim().is_empty() || self.coordinates.is_some()
    }
}

/// A volunteer's weekly availability window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub days: AvailableDays,
}

impl Availability {
    /// Both times set and strictly increasing
    pub fn has_valid_window(&self) -> bool {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => start < end,
            _ => false,
        }
    }
}

/// One flag per weekday
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailableDays {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl AvailableDays {
    pub fn get(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn set(&mut self, day: Weekday, value: bool) {
        let flag = match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *flag = value;
    }

    pub fn toggle(&mut self, day: Weekday) {
        self.set(day, !self.get(day));
    }

    pub fn any(&self) -> bool {
        ALL_DAYS.iter().any(|day| self.get(*day))
    }

    pub fn from_preset(preset: DaysPreset) -> Self {
        let mut days = Self::default();
        for day in ALL_DAYS {
            let weekend = matches!(day, Weekday::Sat | Weekday::Sun);
            let on = match preset {
                DaysPreset::Weekdays => !weekend,
                DaysPreset::Weekend => weekend,
            };
            days.set(day, on);
        }
        days
    }
}

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Quick-select presets for the day flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaysPreset {
    /// Monday through Friday on, weekend off
    Weekdays,
    /// Saturday and Sunday on, weekdays off
    Weekend,
}

/// Free-text leaves of the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Email,
    Phone,
    Gender,
    PreferredLanguage,
    AreaOfOperation,
    Reference,
    VerificationCode,
    Height,
    PhysicalDescription,
    IdentifyingMarks,
    MentalState,
    PhysicalState,
    CurrentSituation,
    Belongings,
    SuggestedAction,
    ShelterPreference,
    Address,
    Landmark,
}

/// List-valued leaves of the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    ImmediateNeeds,
    LanguagesSpoken,
    ApparentIllnesses,
    Documents,
    Photos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    BirthDate,
    FollowUpDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeField {
    Start,
    End,
}

/// A single typed write into the draft
#[derive(Debug, Clone, PartialEq)]
pub enum DraftUpdate {
    Text(TextField, String),
    ApproximateAge(Option<u32>),
    Date(DateField, Option<NaiveDate>),
    Time(TimeField, Option<NaiveTime>),
    Day(Weekday, bool),
    Days(AvailableDays),
    Coordinates(Option<Coordinates>),
    List(ListField, Vec<String>),
}

impl IntakeDraft {
    fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::Name => &mut self.name,
            TextField::Email => &mut self.email,
            TextField::Phone => &mut self.phone,
            TextField::Gender => &mut self.gender,
            TextField::PreferredLanguage => &mut self.preferred_language,
            TextField::AreaOfOperation => &mut self.area_of_operation,
            TextField::Reference => &mut self.reference,
            TextField::VerificationCode => &mut self.verification_code,
            TextField::Height => &mut self.height,
            TextField::PhysicalDescription => &mut self.physical_description,
            TextField::IdentifyingMarks => &mut self.identifying_marks,
            TextField::MentalState => &mut self.mental_state,
            TextField::PhysicalState => &mut self.physical_state,
            TextField::CurrentSituation => &mut self.current_situation,
            TextField::Belongings => &mut self.belongings,
            TextField::SuggestedAction => &mut self.suggested_action,
            TextField::ShelterPreference => &mut self.shelter_preference,
            TextField::Address => &mut self.location.address,
            TextField::Landmark => &mut self.location.landmark,
        }
    }

    pub(crate) fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::ImmediateNeeds => &mut self.immediate_needs,
            ListField::LanguagesSpoken => &mut self.languages_spoken,
            ListField::ApparentIllnesses => &mut self.apparent_illnesses,
            ListField::Documents => &mut self.documents,
            ListField::Photos => &mut self.photos,
        }
    }

    /// Apply one update, touching only the leaf it names
    pub(crate) fn apply(&mut self, update: DraftUpdate) {
        match update {
            DraftUpdate::Text(field, value) => *self.text_mut(field) = value,
            DraftUpdate::ApproximateAge(age) => self.approximate_age = age,
            DraftUpdate::Date(DateField::BirthDate, date) => self.birth_date = date,
            DraftUpdate::Date(DateField::FollowUpDate, date) => self.follow_up_date = date,
            DraftUpdate::Time(TimeField::Start, time) => self.availability.start_time = time,
            DraftUpdate::Time(TimeField::End, time) => self.availability.end_time = time,
            DraftUpdate::Day(day, value) => self.availability.days.set(day, value),
            DraftUpdate::Days(days) => self.availability.days = days,
            DraftUpdate::Coordinates(coordinates) => self.location.coordinates = coordinates,
            DraftUpdate::List(field, values) => *self.list_mut(field) = values,
        }
    }
}
