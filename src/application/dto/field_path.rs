//! Dotted field paths from the renderer, parsed into typed draft updates
//!
//! Paths are snake_case and dotted for nested groups, e.g. `email`,
//! `location.coordinates`, `availability.days.monday`.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde_json::Value;

use crate::domain::entities::{
    AvailableDays, DateField, DraftUpdate, ListField, TextField, TimeField,
};
use crate::domain::value_objects::{CoordinateError, Coordinates};

const TIME_FORMATS: [&str; 3] = ["%H:%M", "%H:%M:%S", "%I:%M %p"];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldPathError {
    #[error("unknown field path: {0}")]
    UnknownPath(String),
    #[error("invalid value for {path}: expected {expected}")]
    InvalidValue { path: String, expected: &'static str },
    #[error("invalid coordinates: {0}")]
    Coordinates(#[from] CoordinateError),
}

enum Target {
    Text(TextField),
    Age,
    Date(DateField),
    Time(TimeField),
    Day(Weekday),
    Days,
    Coordinates,
    List(ListField),
}

fn resolve(path: &str) -> Option<Target> {
    let target = match path {
        "name" => Target::Text(TextField::Name),
        "email" => Target::Text(TextField::Email),
        "phone" => Target::Text(TextField::Phone),
        "gender" => Target::Text(TextField::Gender),
        "preferred_language" => Target::Text(TextField::PreferredLanguage),
        "area_of_operation" => Target::Text(TextField::AreaOfOperation),
        "reference" => Target::Text(TextField::Reference),
        "verification_code" => Target::Text(TextField::VerificationCode),
        "height" => Target::Text(TextField::Height),
        "physical_description" => Target::Text(TextField::PhysicalDescription),
        "identifying_marks" => Target::Text(TextField::IdentifyingMarks),
        "mental_state" => Target::Text(TextField::MentalState),
        "physical_state" => Target::Text(TextField::PhysicalState),
        "current_situation" => Target::Text(TextField::CurrentSituation),
        "belongings" => Target::Text(TextField::Belongings),
        "suggested_action" => Target::Text(TextField::SuggestedAction),
        "shelter_preference" => Target::Text(TextField::ShelterPreference),
        "location.address" => Target::Text(TextField::Address),
        "location.landmark" => Target::Text(TextField::Landmark),
        "location.coordinates" => Target::Coordinates,
        "approximate_age" => Target::Age,
        "birth_date" => Target::Date(DateField::BirthDate),
        "follow_up_date" => Target::Date(DateField::FollowUpDate),
        "availability.start_time" => Target::Time(TimeField::Start),
        "availability.end_time" => Target::Time(TimeField::End),
        "availability.days" => Target::Days,
        "immediate_needs" => Target::List(ListField::ImmediateNeeds),
        "languages_spoken" => Target::List(ListField::LanguagesSpoken),
        "apparent_illnesses" => Target::List(ListField::ApparentIllnesses),
        "documents" => Target::List(ListField::Documents),
        "photos" => Target::List(ListField::Photos),
        other => return parse_day_path(other).map(Target::Day),
    };
    Some(target)
}

fn parse_day_path(path: &str) -> Option<Weekday> {
    path.strip_prefix("availability.days.")?.parse().ok()
}

/// Parse the path of a boolean leaf for toggling
pub fn parse_toggle(path: &str) -> Result<Weekday, FieldPathError> {
    parse_day_path(path).ok_or_else(|| FieldPathError::UnknownPath(path.to_string()))
}

/// Parse a `{path, value}` pair into a typed update
pub fn parse_update(path: &str, value: Value) -> Result<DraftUpdate, FieldPathError> {
    let target = resolve(path).ok_or_else(|| FieldPathError::UnknownPath(path.to_string()))?;
    let invalid = |expected: &'static str| FieldPathError::InvalidValue {
        path: path.to_string(),
        expected,
    };

    let update = match target {
        Target::Text(field) => match value {
            Value::Null => DraftUpdate::Text(field, String::new()),
            Value::String(text) => DraftUpdate::Text(field, text),
            _ => return Err(invalid("a string")),
        },
        Target::Age => DraftUpdate::ApproximateAge(parse_age(&value).ok_or_else(|| invalid("a whole number"))?),
        Target::Date(field) => {
            let date = optional_str(&value)
                .ok_or_else(|| invalid("a YYYY-MM-DD date"))?
                .map(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
                .transpose()
                .map_err(|_| invalid("a YYYY-MM-DD date"))?;
            DraftUpdate::Date(field, date)
        }
        Target::Time(field) => {
            let time = match optional_str(&value).ok_or_else(|| invalid("a time of day"))? {
                None => None,
                Some(text) => Some(parse_time(text).ok_or_else(|| invalid("a time of day"))?),
            };
            DraftUpdate::Time(field, time)
        }
        Target::Day(day) => match value {
            Value::Bool(flag) => DraftUpdate::Day(day, flag),
            _ => return Err(invalid("a boolean")),
        },
        Target::Days => {
            let days: AvailableDays =
                serde_json::from_value(value).map_err(|_| invalid("an object of weekday flags"))?;
            DraftUpdate::Days(days)
        }
        Target::Coordinates => match value {
            Value::Null => DraftUpdate::Coordinates(None),
            Value::Object(_) => {
                let lat = value.get("lat").and_then(Value::as_f64);
                let lng = value.get("lng").and_then(Value::as_f64);
                match (lat, lng) {
                    (Some(lat), Some(lng)) => DraftUpdate::Coordinates(Some(Coordinates::new(lat, lng)?)),
                    _ => return Err(invalid("both lat and lng")),
                }
            }
            _ => return Err(invalid("an object with lat and lng, or null")),
        },
        Target::List(field) => {
            let values: Vec<String> =
                serde_json::from_value(value).map_err(|_| invalid("a list of strings"))?;
            DraftUpdate::List(field, values)
        }
    };
    Ok(update)
}

/// `Some(None)` for null or blank, `Some(Some(text))` for text, `None` otherwise
fn optional_str(value: &Value) -> Option<Option<&str>> {
    match value {
        Value::Null => Some(None),
        Value::String(text) if text.trim().is_empty() => Some(None),
        Value::String(text) => Some(Some(text.trim())),
        _ => None,
    }
}

fn parse_age(value: &Value) -> Option<Option<u32>> {
    if let Some(number) = value.as_u64() {
        return u32::try_from(number).ok().map(Some);
    }
    match optional_str(value)? {
        None => Some(None),
        Some(text) => text.parse().ok().map(Some),
    }
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}
