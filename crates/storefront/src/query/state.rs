//! Fetch state reported by the query cache.

use crate::api::ApiError;

/// Lifecycle of one query as seen by a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// No data yet (never fetched, in flight, or disabled).
    Loading,
    /// The last fetch failed and there is no data.
    Error,
    /// Data is available.
    Success,
}

/// The (loading, fetching, error, data) tuple for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    data: Option<T>,
    error: Option<ApiError>,
    is_fetching: bool,
}

impl<T> FetchState<T> {
    /// No data and nothing in flight.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            data: None,
            error: None,
            is_fetching: false,
        }
    }

    /// No data yet; a fetch for the key is in flight.
    #[must_use]
    pub const fn fetching() -> Self {
        Self {
            data: None,
            error: None,
            is_fetching: true,
        }
    }

    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_fetching: false,
        }
    }

    #[must_use]
    pub const fn failure(error: ApiError) -> Self {
        Self {
            data: None,
            error: Some(error),
            is_fetching: false,
        }
    }

    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        match (&self.data, &self.error) {
            (Some(_), _) => FetchStatus::Success,
            (None, Some(_)) => FetchStatus::Error,
            (None, None) => FetchStatus::Loading,
        }
    }

    /// True until data or an error is available.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status(), FetchStatus::Loading)
    }

    /// True while a fetch for the key is in flight.
    #[must_use]
    pub const fn is_fetching(&self) -> bool {
        self.is_fetching
    }

    /// Whether a consumer should show a loading placeholder.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.is_loading() || self.is_fetching
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Convert a terminal state into a `Result`; `None` while loading.
    #[must_use]
    pub fn into_result(self) -> Option<Result<T, ApiError>> {
        match (self.data, self.error) {
            (Some(data), _) => Some(Ok(data)),
            (None, Some(error)) => Some(Err(error)),
            (None, None) => None,
        }
    }

    /// Narrow the data, turning a failed conversion into an error state.
    pub fn and_then<U, F>(self, f: F) -> FetchState<U>
    where
        F: FnOnce(T) -> Result<U, ApiError>,
    {
        let is_fetching = self.is_fetching;
        match self.data.map(f) {
            Some(Ok(data)) => FetchState {
                data: Some(data),
                error: self.error,
                is_fetching,
            },
            Some(Err(error)) => FetchState::failure(error),
            None => FetchState {
                data: None,
                error: self.error,
                is_fetching,
            },
        }
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::idle()
    }
}
