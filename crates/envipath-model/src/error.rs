//! Error types for the resource model.

use crate::endpoint::ResourceKind;

/// Failure reported by a [`ResourceFetcher`](crate::ResourceFetcher).
///
/// The model never inspects or retries these; they reach the caller as
/// [`ModelError::Transport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP {status} for {uri}: {body}")]
    Status { uri: String, status: u16, body: String },
    #[error("network error for {uri}: {message}")]
    Network { uri: String, message: String },
    #[error("invalid response from {uri}: {message}")]
    InvalidResponse { uri: String, message: String },
}

impl TransportError {
    /// HTTP status code, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The attribute is absent even after hydration.
    #[error("{kind} has no property {field}")]
    MissingProperty { kind: ResourceKind, field: String },

    #[error("unknown rule type: {0}")]
    UnknownRuleType(String),

    #[error("invalid parent: expected {expected}, got {actual}")]
    InvalidParent {
        expected: ResourceKind,
        actual: ResourceKind,
    },

    /// The object was deleted and no longer denotes a live resource.
    #[error("{kind} has been deleted")]
    Invalidated { kind: ResourceKind },

    #[error("property {field} of {kind} is not {expected}")]
    UnexpectedValue {
        kind: ResourceKind,
        field: String,
        expected: &'static str,
    },

    #[error("malformed {kind} record: {reason}")]
    MalformedRecord { kind: ResourceKind, reason: String },

    #[error("compound {0} has no default structure")]
    NoDefaultStructure(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ModelError {
    pub fn is_missing_property(&self) -> bool {
        matches!(self, ModelError::MissingProperty { .. })
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// Turns "missing property" into `None` for attributes that are optional.
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for Result<T> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(ModelError::MissingProperty { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_only_swallows_missing_property() {
        let missing: Result<u32> = Err(ModelError::MissingProperty {
            kind: ResourceKind::Node,
            field: "depth".to_string(),
        });
        assert!(matches!(missing.optional(), Ok(None)));

        let deleted: Result<u32> = Err(ModelError::Invalidated {
            kind: ResourceKind::Node,
        });
        assert!(matches!(
            deleted.optional(),
            Err(ModelError::Invalidated { .. })
        ));

        assert!(matches!(Ok::<u32, ModelError>(3).optional(), Ok(Some(3))));
    }

    #[test]
    fn error_messages_name_kind_and_field() {
        let err = ModelError::MissingProperty {
            kind: ResourceKind::Pathway,
            field: "links".to_string(),
        };
        assert_eq!(err.to_string(), "Pathway has no property links");

        let err = TransportError::Status {
            uri: "http://localhost/package/1".to_string(),
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
    }
}
