use crate::{
    engine::{Case, Compiler, Conversion, Specification},
    Result,
};
use transmap_core::{bail, Type};

/// Matches constants of two enumerations by name, never by display text.
#[derive(Debug)]
pub(super) struct EnumToEnum;

/// Looks a constant up by name.
#[derive(Debug)]
pub(super) struct StringToEnum;

/// Writes a constant's name.
#[derive(Debug)]
pub(super) struct EnumToString;

impl Specification for EnumToEnum {
    fn name(&self) -> &'static str {
        "EnumToEnum"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        case.source.is_enum() && case.destination.is_enum()
    }

    fn emit(&self, case: &Case<'_>, compiler: &mut Compiler<'_>) -> Result<Conversion> {
        let (Type::Enum(from), Type::Enum(to)) = (case.source, case.destination) else {
            bail!("enum mappings need enums on both sides");
        };

        let schema = compiler.schema();
        let from = schema.expect_enum(*from)?;
        let to = schema.expect_enum(*to)?;

        let mut table = Vec::with_capacity(from.variants.len());
        for variant in &from.variants {
            let index = to.variant_index(&variant.name);
            if index.is_none() && case.configured_by_user {
                bail!(
                    "constant `{}` of `{}` has no counterpart in `{}`",
                    variant.name,
                    from.name,
                    to.name
                );
            }
            table.push(index);
        }

        Ok(Conversion::EnumToEnum {
            table: table.into(),
            to: to.id,
        })
    }
}

impl Specification for StringToEnum {
    fn name(&self) -> &'static str {
        "StringToEnum"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        case.source.is_string() && case.destination.is_enum()
    }

    fn emit(&self, case: &Case<'_>, _compiler: &mut Compiler<'_>) -> Result<Conversion> {
        match case.destination {
            Type::Enum(to) => Ok(Conversion::StringToEnum { to: *to }),
            _ => bail!("expected an enum destination"),
        }
    }
}

impl Specification for EnumToString {
    fn name(&self) -> &'static str {
        "EnumToString"
    }

    fn applies(&self, case: &Case<'_>, _compiler: &Compiler<'_>) -> bool {
        case.source.is_enum() && case.destination.is_string()
    }

    fn emit(&self, _case: &Case<'_>, _compiler: &mut Compiler<'_>) -> Result<Conversion> {
        Ok(Conversion::EnumToString)
    }
}
