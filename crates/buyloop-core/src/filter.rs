//! The business filter engine.
//!
//! Pure, synchronous filtering of a catalog against a [`FilterSpec`]. The
//! catalog is borrowed and never mutated, and results keep catalog order.

use std::collections::BTreeSet;

use crate::business::{Business, Coordinates};
use crate::geo::haversine_km;

/// One search action: category, free text and distance constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub search_text: String,
    pub category: String,
    /// `None` or non-positive disables the distance stage.
    pub max_distance_km: Option<f64>,
    pub reference_point: Coordinates,
}

impl FilterSpec {
    /// No active stages; distances are measured from `reference_point`.
    #[must_use]
    pub fn around(reference_point: Coordinates) -> Self {
        Self {
            search_text: String::new(),
            category: String::new(),
            max_distance_km: None,
            reference_point,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn within_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    fn category_needle(&self) -> Option<String> {
        (!self.category.is_empty()).then(|| self.category.to_lowercase())
    }

    fn text_needle(&self) -> Option<String> {
        let trimmed = self.search_text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    fn distance_limit(&self) -> Option<f64> {
        self.max_distance_km.filter(|km| *km > 0.0)
    }

    /// True when at least one stage would drop records.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.category_needle().is_some()
            || self.text_needle().is_some()
            || self.distance_limit().is_some()
    }

    /// Whether a single business passes every active stage.
    #[must_use]
    pub fn matches(&self, business: &Business) -> bool {
        Stages::from(self).admits(business)
    }
}

/// Needles resolved once per pass so each record costs only its own
/// lower-casing.
struct Stages {
    category: Option<String>,
    text: Option<String>,
    max_km: Option<f64>,
    origin: Coordinates,
}

impl From<&FilterSpec> for Stages {
    fn from(spec: &FilterSpec) -> Self {
        Self {
            category: spec.category_needle(),
            text: spec.text_needle(),
            max_km: spec.distance_limit(),
            origin: spec.reference_point,
        }
    }
}

impl Stages {
    fn admits(&self, business: &Business) -> bool {
        self.category_stage(business) && self.text_stage(business) && self.distance_stage(business)
    }

    fn category_stage(&self, business: &Business) -> bool {
        self.category
            .as_deref()
            .is_none_or(|needle| business.category.to_lowercase().contains(needle))
    }

    fn text_stage(&self, business: &Business) -> bool {
        let Some(needle) = self.text.as_deref() else {
            return true;
        };
        [
            &business.name,
            &business.description,
            &business.category,
            &business.address,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }

    fn distance_stage(&self, business: &Business) -> bool {
        let Some(max_km) = self.max_km else {
            return true;
        };
        if !self.origin.is_valid() {
            return false;
        }
        business
            .valid_coords()
            .is_some_and(|coords| haversine_km(self.origin, coords) <= max_km)
    }
}

/// Filter `catalog` by `spec`, keeping catalog order.
///
/// With no active filters every record is returned.
#[must_use]
pub fn filter<'a>(catalog: &'a [Business], spec: &FilterSpec) -> Vec<&'a Business> {
    let stages = Stages::from(spec);
    catalog.iter().filter(|b| stages.admits(b)).collect()
}

/// A filtered business with its distance from the reference point.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<'a> {
    pub business: &'a Business,
    /// `None` when either side lacks valid coordinates.
    pub distance_km: Option<f64>,
}

/// Same selection and order as [`filter`], annotated with distances.
#[must_use]
pub fn filter_with_distance<'a>(catalog: &'a [Business], spec: &FilterSpec) -> Vec<Ranked<'a>> {
    let origin = spec.reference_point.is_valid().then_some(spec.reference_point);
    filter(catalog, spec)
        .into_iter()
        .map(|business| Ranked {
            business,
            distance_km: origin
                .zip(business.valid_coords())
                .map(|(from, to)| haversine_km(from, to)),
        })
        .collect()
}

/// Distinct categories as stored, sorted ascending.
#[must_use]
pub fn available_categories(catalog: &[Business]) -> Vec<String> {
    catalog
        .iter()
        .map(|b| b.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
