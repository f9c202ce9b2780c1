use thiserror::Error;

/// Errors produced while parsing hotkey spec strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The spec string was empty or whitespace.
    #[error("empty hotkey spec")]
    Empty,
    /// A `+`-separated component was empty (e.g. `"ctrl++a"`).
    #[error("empty component in hotkey spec '{spec}'")]
    EmptyComponent {
        /// The offending spec string.
        spec: String,
    },
    /// A component before the key was not a recognized modifier.
    #[error("unknown modifier '{name}' in hotkey spec '{spec}'")]
    UnknownModifier {
        /// The unrecognized modifier component.
        name: String,
        /// The offending spec string.
        spec: String,
    },
    /// The final component was not a recognized key.
    #[error("unknown key '{name}' in hotkey spec '{spec}'")]
    UnknownKey {
        /// The unrecognized key component.
        name: String,
        /// The offending spec string.
        spec: String,
    },
}
