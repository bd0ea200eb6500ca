use crate::Error;

/// The state of a query as seen by whoever displays it.
///
/// Exactly one of these holds at any time, so loading, error and data can
/// never disagree.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// No data yet and a request is in flight.
    Pending,
    /// The last request failed and there is no usable data.
    Error(Error),
    /// The latest data.
    Success(T),
}

impl<T> QueryState<T> {
    /// Whether the query is still waiting for its first result.
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    /// The data, if the query succeeded.
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The error, if the query failed.
    pub fn error(&self) -> Option<&Error> {
        match self {
            QueryState::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Convert the data with `f`, keeping pending and error states as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            QueryState::Pending => QueryState::Pending,
            QueryState::Error(error) => QueryState::Error(error),
            QueryState::Success(data) => QueryState::Success(f(data)),
        }
    }
}
