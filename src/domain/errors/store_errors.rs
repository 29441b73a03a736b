use crate::domain::value_objects::MediaKind;

/// Errors that can occur while resolving or fetching media objects.
///
/// Errors are plain data values: batch operations accumulate them next to
/// whatever succeeded instead of aborting, so every variant is `Clone` and
/// carries its context as fields.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Network-level failure before an HTTP status was obtained
    Transport { message: String },

    /// Non-2xx HTTP response with a best-effort server message
    HttpStatus { status: u16, message: String },

    /// 401 response; credentials have been cleared as a side effect
    Unauthorized,

    /// Response body was absent or not decodable
    Decode { message: String },

    /// A cached entity exists under the requested id but with another kind
    TypeMismatch {
        id: String,
        requested: MediaKind,
        found: MediaKind,
    },

    /// A response decoded but carried no usable `id`
    MissingIdentity { kind: MediaKind },

    /// Objects of this kind cannot be fetched from the API
    Unfetchable { kind: MediaKind },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Transport { message } => {
                write!(f, "Transport failure: {}", message)
            }
            StoreError::HttpStatus { status, message } => {
                write!(f, "HTTP {}: {}", status, message)
            }
            StoreError::Unauthorized => {
                write!(f, "Unauthorized (credentials cleared)")
            }
            StoreError::Decode { message } => {
                write!(f, "Decode failure: {}", message)
            }
            StoreError::TypeMismatch {
                id,
                requested,
                found,
            } => {
                write!(
                    f,
                    "Type mismatch for '{}': requested {}, cache holds {}",
                    id, requested, found
                )
            }
            StoreError::MissingIdentity { kind } => {
                write!(f, "Decoded {} entity carries no id", kind)
            }
            StoreError::Unfetchable { kind } => {
                write!(f, "Objects of kind {} cannot be fetched", kind)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_names_the_id() {
        let err = StoreError::TypeMismatch {
            id: "X".to_string(),
            requested: MediaKind::Video,
            found: MediaKind::Collection,
        };
        let text = err.to_string();
        assert!(text.contains("'X'"));
        assert!(text.contains("video"));
        assert!(text.contains("collection"));
    }
}
