use crate::{
    engine::{Case, Compiler, Conversion, Specification},
    Result,
};
use transmap_core::err;

/// Hands the value to a registered converter: the one named by the field
/// map, otherwise the first one accepting the type pair.
#[derive(Debug)]
pub(super) struct ConverterSpec;

impl Specification for ConverterSpec {
    fn name(&self) -> &'static str {
        "Converter"
    }

    fn applies(&self, case: &Case<'_>, compiler: &Compiler<'_>) -> bool {
        case.converter.is_some()
            || compiler
                .converters()
                .find(case.source, case.destination)
                .is_some()
    }

    fn emit(&self, case: &Case<'_>, compiler: &mut Compiler<'_>) -> Result<Conversion> {
        let converter = match case.converter {
            Some(id) => compiler
                .converters()
                .get(id)
                .ok_or_else(|| err!("no converter is registered with id `{id}`"))?,
            None => compiler
                .converters()
                .find(case.source, case.destination)
                .ok_or_else(|| err!("no converter accepts the type pair"))?,
        }
        .clone();

        compiler.use_converter(&converter);

        Ok(Conversion::Converter {
            converter,
            to: case.destination.clone(),
        })
    }
}
