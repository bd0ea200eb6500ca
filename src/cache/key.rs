use std::fmt::Display;

use time::Date;

/// One parameter of a [QueryKey].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    /// A name or other text parameter.
    Str(String),
    /// A numeric parameter such as an ID or page number.
    Int(i64),
    /// A date parameter such as the start of a date range.
    Date(Date),
    /// An optional parameter that was not given.
    None,
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_owned())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl From<i32> for KeyPart {
    fn from(value: i32) -> Self {
        KeyPart::Int(value.into())
    }
}

impl From<u64> for KeyPart {
    fn from(value: u64) -> Self {
        KeyPart::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<Date> for KeyPart {
    fn from(value: Date) -> Self {
        KeyPart::Date(value)
    }
}

impl<T: Into<KeyPart>> From<Option<T>> for KeyPart {
    fn from(value: Option<T>) -> Self {
        value.map_or(KeyPart::None, Into::into)
    }
}

impl Display for KeyPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyPart::Str(text) => write!(f, "{text}"),
            KeyPart::Int(number) => write!(f, "{number}"),
            KeyPart::Date(date) => write!(f, "{date}"),
            KeyPart::None => write!(f, "-"),
        }
    }
}

/// Identifies a cached read: the resource name followed by every parameter
/// that affects the result, in a fixed order.
///
/// A key is also used as a prefix to select all keys that start with the same
/// parts, e.g. `statistics` selects `statistics/overall/-/-` and
/// `statistics/monthly/2025`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    /// Create a key for `resource` with no parameters.
    pub fn new(resource: &str) -> Self {
        Self(vec![KeyPart::from(resource)])
    }

    /// Append a parameter to the key.
    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    /// The parts of the key, starting with the resource name.
    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    /// Whether this key starts with all of the parts of `prefix`.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self.0.iter().map(ToString::to_string).collect::<Vec<_>>();

        write!(f, "{}", parts.join("/"))
    }
}
