use crate::schema::EnumId;

/// A constant of a declared enumeration.
///
/// The constant is identified by its position in the enumeration's variant
/// list; its name and display text live on the
/// [`EnumType`](crate::schema::EnumType).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueEnum {
    pub ty: EnumId,
    pub variant: usize,
}

impl ValueEnum {
    pub fn new(ty: EnumId, variant: usize) -> ValueEnum {
        ValueEnum { ty, variant }
    }
}
