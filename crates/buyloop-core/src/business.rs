use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A latitude/longitude pair in decimal degrees.
///
/// Serialized as a two-element `[lat, lng]` array, the shape the catalog
/// files use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite and inside [-90, 90] / [-180, 180].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lat, c.lng]
    }
}

/// Key of an opening-hours entry.
///
/// Orders Monday through Sunday, then any unrecognised label alphabetically,
/// so hours always list in week order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Other(String),
}

impl Weekday {
    fn as_str(&self) -> &str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
            Weekday::Other(label) => label,
        }
    }
}

impl From<String> for Weekday {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "monday" => Weekday::Monday,
            "tuesday" => Weekday::Tuesday,
            "wednesday" => Weekday::Wednesday,
            "thursday" => Weekday::Thursday,
            "friday" => Weekday::Friday,
            "saturday" => Weekday::Saturday,
            "sunday" => Weekday::Sunday,
            _ => Weekday::Other(raw),
        }
    }
}

impl From<&str> for Weekday {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Weekday> for String {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Opening hours for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Hours {
    Open(String),
    Closed,
}

const CLOSED: &str = "closed";

impl From<String> for Hours {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case(CLOSED) {
            Hours::Closed
        } else {
            Hours::Open(raw)
        }
    }
}

impl From<Hours> for String {
    fn from(hours: Hours) -> Self {
        match hours {
            Hours::Open(text) => text,
            Hours::Closed => CLOSED.to_string(),
        }
    }
}

impl std::fmt::Display for Hours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hours::Open(text) => write!(f, "{text}"),
            Hours::Closed => write!(f, "{CLOSED}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    /// `None` when the source record had no usable position. Anything other
    /// than a pair of numbers loads as `None` instead of failing the record.
    #[serde(default, deserialize_with = "lenient_coords")]
    pub coords: Option<Coordinates>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub hours: BTreeMap<Weekday, Hours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoords {
    Pair([f64; 2]),
    Malformed(serde::de::IgnoredAny),
}

fn lenient_coords<'de, D>(deserializer: D) -> Result<Option<Coordinates>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<RawCoords>::deserialize(deserializer)? {
        Some(RawCoords::Pair(pair)) => Some(Coordinates::from(pair)),
        Some(RawCoords::Malformed(_)) | None => None,
    })
}

impl Business {
    /// Coordinates usable for distance math, if any.
    #[must_use]
    pub fn valid_coords(&self) -> Option<Coordinates> {
        self.coords.filter(Coordinates::is_valid)
    }
}

/// A registration request: every [`Business`] field except the assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBusiness {
    pub name: String,
    pub category: String,
    pub description: String,
    pub address: String,
    pub coords: Coordinates,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub hours: BTreeMap<Weekday, Hours>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl NewBusiness {
    /// Build the stored record. Text fields are trimmed, blank optionals
    /// dropped, and new listings never start out featured.
    #[must_use]
    pub fn into_business(self, id: String) -> Business {
        Business {
            id,
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            description: self.description.trim().to_string(),
            address: self.address.trim().to_string(),
            coords: Some(self.coords),
            rating: self.rating.unwrap_or(0.0),
            hours: self.hours,
            website: non_blank(self.website),
            phone: non_blank(self.phone),
            email: non_blank(self.email),
            images: self
                .images
                .into_iter()
                .map(|uri| uri.trim().to_string())
                .filter(|uri| !uri.is_empty())
                .collect(),
            featured: false,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Reject registrations the catalog should never hold.
///
/// # Errors
///
/// Returns [`ValidationError`] naming the first offending field.
pub fn validate_new_business(new: &NewBusiness) -> Result<(), ValidationError> {
    for (field, value) in [
        ("name", &new.name),
        ("category", &new.category),
        ("description", &new.description),
        ("address", &new.address),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError(format!("{field} must be non-empty")));
        }
    }

    if !new.coords.is_valid() {
        return Err(ValidationError(format!(
            "coords [{}, {}] out of range",
            new.coords.lat, new.coords.lng
        )));
    }

    if let Some(rating) = new.rating {
        if !(0.0..=5.0).contains(&rating) {
            return Err(ValidationError(format!(
                "rating {rating} must be between 0 and 5"
            )));
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Business,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub from: MessageSender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
#[path = "business_test.rs"]
mod tests;
