use thiserror::Error;

/// Reasons an action path is rejected at registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path has no segments.
    #[error("action path is empty")]
    Empty,

    /// One of the segments is blank after trimming.
    #[error("action path '{path}' contains an empty segment")]
    EmptySegment {
        /// The offending path as given.
        path: String,
    },

    /// Wildcards are only meaningful in filters.
    #[error("action path '{path}' contains a wildcard segment")]
    Wildcard {
        /// The offending path as given.
        path: String,
    },

    /// An action is already registered at this path.
    #[error("an action is already registered at '{path}'")]
    Duplicate {
        /// Canonical path.
        path: String,
    },

    /// A prefix of the path is already an action, which cannot gain children.
    #[error("'{action}' is an action and cannot contain '{path}'")]
    LeafGainsChild {
        /// Canonical path being added.
        path: String,
        /// The existing action on the way.
        action: String,
    },

    /// The path names an existing namespace (a node with children).
    #[error("'{path}' is a namespace and cannot be an action")]
    NamespaceCollision {
        /// Canonical path.
        path: String,
    },
}
