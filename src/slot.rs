//! Stale-while-error holder for fetched data
//!
//! Presentation code keeps one `DataSlot` per panel. A failed refresh keeps
//! whatever was displayed before and only adds the error banner.

use crate::error::FetchError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Last good value plus the most recent error
#[derive(Debug)]
pub struct DataSlot<T> {
    data: Option<Arc<T>>,
    error: Option<FetchError>,
    updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for DataSlot<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
        }
    }
}

impl<T> Clone for DataSlot<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            updated_at: self.updated_at,
        }
    }
}

impl<T> DataSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the outcome of a fetch
    ///
    /// Success replaces the data and clears the error. Failure leaves the
    /// previous data untouched.
    pub fn record(&mut self, result: Result<Arc<T>, FetchError>) {
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.updated_at = Some(Utc::now());
            }
            Err(e) => {
                tracing::debug!(error = %e, has_data = self.data.is_some(), "Keeping previous data after failed fetch");
                self.error = Some(e);
            }
        }
    }

    pub fn data(&self) -> Option<&Arc<T>> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// When data was last replaced by a successful fetch
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Showing data that the last refresh failed to update
    pub fn is_stale(&self) -> bool {
        self.data.is_some() && self.error.is_some()
    }

    /// Nothing has ever loaded and the last attempt failed
    pub fn is_first_load_failure(&self) -> bool {
        self.data.is_none() && self.error.is_some()
    }
}
