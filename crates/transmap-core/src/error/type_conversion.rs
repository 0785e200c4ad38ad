use super::Error;
use crate::Value;

/// Error when a value does not have the shape the caller expected.
#[derive(Debug)]
pub(super) struct TypeConversionError {
    from: &'static str,
    to_type: Box<str>,
}

impl std::error::Error for TypeConversionError {}

impl core::fmt::Display for TypeConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot convert {} to {}", self.from, self.to_type)
    }
}

impl Error {
    /// Creates a type conversion error for `value`.
    pub fn type_conversion(value: Value, to_type: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TypeConversion(TypeConversionError {
            from: value.kind_name(),
            to_type: to_type.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a type
    /// conversion error.
    pub fn is_type_conversion(&self) -> bool {
        self.any_in_chain(|kind| matches!(kind, super::ErrorKind::TypeConversion(_)))
    }
}
