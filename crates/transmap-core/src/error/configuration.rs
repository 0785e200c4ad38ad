use super::Error;

/// Error raised while a mapping is being declared or compiled.
///
/// This covers unresolvable property expressions, missing or ambiguous
/// constructor-argument bindings, enum constants without a target and field
/// pairs no mapping rule can handle. These are always reported when the class
/// map is registered (or when a synthesized plan is first compiled), never in
/// the middle of mapping a value.
#[derive(Debug)]
pub(super) struct ConfigurationError {
    a: Box<str>,
    b: Box<str>,
    message: Box<str>,
}

impl std::error::Error for ConfigurationError {}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid mapping configuration for {} <-> {}: {}",
            self.a, self.b, self.message
        )
    }
}

impl Error {
    /// Creates a configuration error for the type pair `a`/`b`.
    pub fn configuration(
        a: impl Into<String>,
        b: impl Into<String>,
        message: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::Configuration(ConfigurationError {
            a: a.into().into(),
            b: b.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a
    /// configuration error.
    pub fn is_configuration(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::Configuration(_)))
    }
}
