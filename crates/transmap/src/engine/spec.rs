//! The ordered rule table deciding how a source type converts into a
//! destination type.
//!
//! Rules are consulted in order and the first one that applies emits the
//! conversion. Several rules accept overlapping cases, so the order below is
//! part of the mapping semantics.

mod copy_by_reference;
use copy_by_reference::CopyByReference;

mod converter;
use converter::ConverterSpec;

mod dynamic;
use dynamic::Dynamic;

mod enums;
use enums::{EnumToEnum, EnumToString, StringToEnum};

mod multi_occurrence;
use multi_occurrence::MultiOccurrence;

mod object;
use object::ObjectToObject;

mod primitive;
use primitive::{PrimitiveToWrapper, WrapperToPrimitive};

mod registered_mapper;
use registered_mapper::RegisteredMapper;

mod singleton;
use singleton::{UnwrapSingleton, WrapSingleton};

mod skip;
use skip::PrimitiveObjectMismatch;

mod string;
use string::{AnyToString, FromString};

use super::{Compiler, Conversion};
use crate::Result;
use std::fmt;
use transmap_core::Type;

/// A source and destination type to convert between.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Case<'a> {
    pub(crate) source: &'a Type,

    pub(crate) destination: &'a Type,

    /// Id of the converter the field map requires
    pub(crate) converter: Option<&'a str>,

    /// Failures are reported instead of dropping the field
    pub(crate) configured_by_user: bool,
}

/// One rule of the chain.
pub(crate) trait Specification: Send + Sync + fmt::Debug {
    /// Name shown in plan listings.
    fn name(&self) -> &'static str;

    fn applies(&self, case: &Case<'_>, compiler: &Compiler<'_>) -> bool;

    fn emit(&self, case: &Case<'_>, compiler: &mut Compiler<'_>) -> Result<Conversion>;
}

#[derive(Debug)]
pub(crate) struct Chain {
    rules: Vec<Box<dyn Specification>>,
}

impl Case<'_> {
    /// The case for converting elements, keys or values of a
    /// multi-occurrence case.
    pub(crate) fn nested<'b>(&self, source: &'b Type, destination: &'b Type) -> Case<'b> {
        Case {
            source,
            destination,
            converter: None,
            configured_by_user: self.configured_by_user,
        }
    }
}

impl Chain {
    pub(crate) fn rules(&self) -> &[Box<dyn Specification>] {
        &self.rules
    }
}

impl Default for Chain {
    fn default() -> Chain {
        Chain {
            rules: vec![
                Box::new(CopyByReference),
                Box::new(WrapperToPrimitive),
                Box::new(PrimitiveToWrapper),
                Box::new(ConverterSpec),
                Box::new(RegisteredMapper),
                Box::new(EnumToEnum),
                Box::new(StringToEnum),
                Box::new(EnumToString),
                Box::new(MultiOccurrence),
                Box::new(FromString),
                Box::new(AnyToString),
                Box::new(WrapSingleton),
                Box::new(UnwrapSingleton),
                Box::new(PrimitiveObjectMismatch),
                Box::new(ObjectToObject),
                Box::new(Dynamic),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_order() {
        let names: Vec<_> = Chain::default().rules().iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            [
                "CopyByReference",
                "WrapperToPrimitive",
                "PrimitiveToWrapper",
                "Converter",
                "RegisteredMapper",
                "EnumToEnum",
                "StringToEnum",
                "EnumToString",
                "MultiOccurrence",
                "FromString",
                "ToString",
                "WrapSingleton",
                "UnwrapSingleton",
                "PrimitiveObjectMismatch",
                "ObjectToObject",
                "Dynamic",
            ]
        );
    }
}
