/// Error type returned by this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Parameters were supplied in a shape that is neither an object nor an array of them.
    #[error("invalid parameter shape: {0}")]
    InvalidParameterShape(String),
    /// A parameter value cannot be mapped to any wire tag.
    #[error("'{name}' is an invalid type")]
    UnsupportedType {
        /// Name of the offending parameter.
        name: String,
    },
}

impl CodecError {
    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Self::InvalidParameterShape(message.into())
    }

    pub(crate) fn unsupported(name: impl Into<String>) -> Self {
        Self::UnsupportedType { name: name.into() }
    }
}
