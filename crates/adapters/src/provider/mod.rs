// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Nutrition data provider: barcode and text lookups against a third party

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNutritionProvider, ProviderCall};

use async_trait::async_trait;
use nl_core::{Macros, Serving};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from provider calls
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// A search hit, cheap enough to list before a full lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub identifier: String,
    pub food_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// Full nutrition data for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    /// Barcode or provider id
    pub identifier: String,
    pub food_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub macros: Macros,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving: Option<Serving>,
}

impl NutritionRecord {
    pub fn new(identifier: impl Into<String>, food_name: impl Into<String>, macros: Macros) -> Self {
        Self {
            identifier: identifier.into(),
            food_name: food_name.into(),
            brand: None,
            macros,
            serving: None,
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_serving(mut self, serving: Serving) -> Self {
        self.serving = Some(serving);
        self
    }
}

/// Adapter for nutrition lookups
#[async_trait]
pub trait NutritionProvider: Clone + Send + Sync + 'static {
    /// Free-text search
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, ProviderError>;

    /// Look up one product; `None` if the provider has no data for it
    async fn lookup(&self, identifier: &str) -> Result<Option<NutritionRecord>, ProviderError>;
}
