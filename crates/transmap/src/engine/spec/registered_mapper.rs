use crate::{
    engine::{Case, Compiler, Conversion, Specification},
    metadata::MapperKey,
    Result,
};
use transmap_core::Type;

/// Delegates to the class map registered for the pair.
#[derive(Debug)]
pub(super) struct RegisteredMapper;

impl Specification for RegisteredMapper {
    fn name(&self) -> &'static str {
        "RegisteredMapper"
    }

    fn applies(&self, case: &Case<'_>, compiler: &Compiler<'_>) -> bool {
        match (case.source, case.destination) {
            (Type::Object(a), Type::Object(b)) => compiler.is_registered(*a, *b),
            _ => false,
        }
    }

    fn emit(&self, case: &Case<'_>, compiler: &mut Compiler<'_>) -> Result<Conversion> {
        let (Type::Object(a), Type::Object(b)) = (case.source, case.destination) else {
            transmap_core::bail!("registered mappers only map objects");
        };

        compiler.use_mapper(MapperKey::new(*a, *b));
        Ok(Conversion::Mapper { to: *b })
    }
}
