use super::Error;

/// Error raised while mapping a value.
///
/// Carries the source and destination type names. The inner cause (null
/// source, unresolvable concrete type, failed instantiation, converter
/// failure...) is attached with [`Error::context`].
#[derive(Debug)]
pub(super) struct MappingError {
    source: Box<str>,
    destination: Box<str>,
}

impl std::error::Error for MappingError {}

impl core::fmt::Display for MappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "mapping {} -> {} failed", self.source, self.destination)
    }
}

impl Error {
    /// Creates a mapping error for the given type pair.
    pub fn mapping(source: impl Into<String>, destination: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Mapping(MappingError {
            source: source.into().into(),
            destination: destination.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a mapping
    /// error.
    pub fn is_mapping(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::Mapping(_)))
    }
}
