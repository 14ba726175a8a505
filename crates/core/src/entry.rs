// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logged food entries and their validation rules

use crate::payload::Payload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use thiserror::Error;

/// Unique identifier for a logged entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an entry came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    #[default]
    Manual,
    Recipe,
    Scan,
    Search,
    Photo,
}

/// Errors raised when a draft or entry fails validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("food name must not be empty")]
    EmptyFoodName,
    #[error("{field} must not be negative (got {value})")]
    NegativeMacro { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFiniteMacro { field: &'static str },
    #[error("{field} must be positive (got {value})")]
    InvalidServing { field: &'static str, value: f64 },
}

/// Calorie and macronutrient amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Macros {
    pub const ZERO: Macros = Macros {
        calories: 0.0,
        protein: 0.0,
        carbs: 0.0,
        fats: 0.0,
    };

    pub fn new(calories: f64, protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fats,
        }
    }

    /// Check that every amount is finite and non-negative
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fats", self.fats),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteMacro { field });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeMacro { field, value });
            }
        }
        Ok(())
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fats: self.fats + rhs.fats,
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Macros) {
        *self = *self + rhs;
    }
}

impl<'a> std::iter::Sum<&'a Macros> for Macros {
    fn sum<I: Iterator<Item = &'a Macros>>(iter: I) -> Macros {
        iter.fold(Macros::ZERO, |acc, m| acc + *m)
    }
}

/// Serving normalization metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Serving {
    pub serving_size: f64,
    pub serving_size_type: String,
    #[serde(default)]
    pub base_serving_size: Option<f64>,
    #[serde(default)]
    pub base_serving_size_type: Option<String>,
}

impl Serving {
    pub fn new(serving_size: f64, serving_size_type: impl Into<String>) -> Self {
        Self {
            serving_size,
            serving_size_type: serving_size_type.into(),
            base_serving_size: None,
            base_serving_size_type: None,
        }
    }

    pub fn with_base(mut self, size: f64, size_type: impl Into<String>) -> Self {
        self.base_serving_size = Some(size);
        self.base_serving_size_type = Some(size_type.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_positive("serving_size", self.serving_size)?;
        if let Some(base) = self.base_serving_size {
            check_positive("base_serving_size", base)?;
        }
        Ok(())
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidServing { field, value })
    }
}

/// Reject names that are empty or whitespace only
pub fn validate_food_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyFoodName);
    }
    Ok(())
}

/// A committed food log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub food_name: String,
    pub timestamp: DateTime<Utc>,
    pub macros: Macros,
    #[serde(default)]
    pub serving: Option<Serving>,
    #[serde(default)]
    pub image_payload: Option<Payload>,
    #[serde(default)]
    pub source: EntrySource,
}

impl Entry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_food_name(&self.food_name)?;
        self.macros.validate()?;
        if let Some(serving) = &self.serving {
            serving.validate()?;
        }
        Ok(())
    }

    pub fn has_photo(&self) -> bool {
        self.image_payload.is_some()
    }

    /// Size of the attached photo in bytes (0 without one)
    pub fn photo_bytes(&self) -> u64 {
        self.image_payload.as_ref().map(|p| p.len() as u64).unwrap_or(0)
    }
}

/// Caller input for a new entry; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub food_name: String,
    /// Defaults to the store clock when absent
    pub timestamp: Option<DateTime<Utc>>,
    pub macros: Macros,
    pub serving: Option<Serving>,
    pub image_payload: Option<Payload>,
    pub source: EntrySource,
}

impl EntryDraft {
    pub fn new(food_name: impl Into<String>, macros: Macros) -> Self {
        Self {
            food_name: food_name.into(),
            timestamp: None,
            macros,
            serving: None,
            image_payload: None,
            source: EntrySource::Manual,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_serving(mut self, serving: Serving) -> Self {
        self.serving = Some(serving);
        self
    }

    pub fn with_photo(mut self, payload: impl Into<Payload>) -> Self {
        self.image_payload = Some(payload.into());
        self
    }

    pub fn with_source(mut self, source: EntrySource) -> Self {
        self.source = source;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_food_name(&self.food_name)?;
        self.macros.validate()?;
        if let Some(serving) = &self.serving {
            serving.validate()?;
        }
        Ok(())
    }

    /// Materialize the draft with an assigned id
    pub fn into_entry(self, id: EntryId, now: DateTime<Utc>) -> Entry {
        Entry {
            id,
            food_name: self.food_name,
            timestamp: self.timestamp.unwrap_or(now),
            macros: self.macros,
            serving: self.serving,
            image_payload: self.image_payload,
            source: self.source,
        }
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
