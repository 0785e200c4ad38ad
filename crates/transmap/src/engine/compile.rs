mod group;

use super::{Case, CompiledMapper, Conversion, FieldStep, Origin, Plan, Step};
use crate::{
    converter::{Converter, ConverterRegistry},
    factory::Shared,
    metadata::{ClassMap, Direction, FieldMap, MapperKey},
    Result,
};
use std::sync::Arc;
use tracing::{debug, trace, warn};
use transmap_core::{bail, schema::ClassId, Error, Property, Schema, Type};

/// Compiles both directions of a class map.
pub(crate) fn compile_class_map(shared: &Shared, class_map: &ClassMap) -> Result<CompiledMapper> {
    let mut compiler = Compiler::new(shared);

    let a_to_b = compiler.plan(class_map, true)?;
    let b_to_a = compiler.plan(&class_map.flip(), false)?;

    debug!(
        a = %class_map.a_name,
        b = %class_map.b_name,
        a_to_b = a_to_b.steps.len(),
        b_to_a = b_to_a.steps.len(),
        "compiled class map"
    );

    Ok(CompiledMapper {
        key: class_map.key(),
        a_to_b,
        b_to_a,
        customizer: class_map.customizer.clone(),
        used_converters: compiler.used_converters,
        used_mappers: compiler.used_mappers,
        used_types: compiler.used_types,
    })
}

/// Resolves conversions with the specification chain and assembles plans.
///
/// Also used at run time, without a class map, to pick conversions for
/// values whose type is only known once they are seen.
pub(crate) struct Compiler<'a> {
    shared: &'a Shared,
    used_converters: Vec<Arc<dyn Converter>>,
    used_mappers: Vec<MapperKey>,
    used_types: Vec<Type>,
}

/// A field map placed in a plan, with the frames its properties start from.
#[derive(Debug)]
struct Pairing<'m> {
    field_map: &'m FieldMap,
    source: Property,
    source_origin: Origin,
    destination: Property,
    destination_origin: Origin,
}

impl<'a> Compiler<'a> {
    pub(crate) fn new(shared: &'a Shared) -> Compiler<'a> {
        Compiler {
            shared,
            used_converters: vec![],
            used_mappers: vec![],
            used_types: vec![],
        }
    }

    pub(crate) fn schema(&self) -> &'a Schema {
        &self.shared.schema
    }

    pub(crate) fn converters(&self) -> &'a ConverterRegistry {
        &self.shared.converters
    }

    /// Returns `true` if a user class map is registered for the pair, in
    /// either orientation.
    pub(crate) fn is_registered(&self, a: ClassId, b: ClassId) -> bool {
        self.shared.registry.read().is_explicit(a, b)
    }

    pub(crate) fn use_converter(&mut self, converter: &Arc<dyn Converter>) {
        if !self
            .used_converters
            .iter()
            .any(|used| Arc::ptr_eq(used, converter))
        {
            self.used_converters.push(converter.clone());
        }
    }

    pub(crate) fn use_mapper(&mut self, key: MapperKey) {
        if !self.used_mappers.contains(&key) {
            self.used_mappers.push(key);
        }
    }

    fn use_type(&mut self, ty: &Type) {
        if !self.used_types.contains(ty) {
            self.used_types.push(ty.clone());
        }
    }

    /// Runs the chain: the first rule that applies emits the conversion.
    pub(crate) fn resolve(&mut self, case: &Case<'_>) -> Result<Option<(&'static str, Conversion)>> {
        let shared: &'a Shared = self.shared;

        for rule in shared.chain.rules() {
            if rule.applies(case, self) {
                trace!(
                    rule = rule.name(),
                    source = %shared.schema.type_name(case.source),
                    destination = %shared.schema.type_name(case.destination),
                    "selected mapping rule"
                );
                let conversion = rule.emit(case, self)?;
                return Ok(Some((rule.name(), conversion)));
            }
        }

        Ok(None)
    }

    /// Resolves the conversion of elements, keys or values.
    ///
    /// When no rule applies the conversion is skipped, unless the field was
    /// configured by the user.
    pub(crate) fn element(&mut self, case: &Case<'_>) -> Result<Conversion> {
        match self.resolve(case)? {
            Some((_, conversion)) => Ok(conversion),
            None if case.configured_by_user => bail!(
                "no rule maps `{}` to `{}`",
                self.schema().type_name(case.source),
                self.schema().type_name(case.destination)
            ),
            None => Ok(Conversion::Skip),
        }
    }

    /// Builds the plan mapping `map.a` onto `map.b`.
    ///
    /// `forward` is set for the direction the class map was declared in.
    fn plan(&mut self, map: &ClassMap, forward: bool) -> Result<Plan> {
        let destination = self.schema().expect_class(map.b)?.clone();
        let params = map
            .constructor_b
            .clone()
            .or_else(|| destination.constructor.clone())
            .unwrap_or_default();

        let mut pairings = vec![];

        for field_map in &map.field_maps {
            if field_map.excluded || field_map.is_ignored() {
                continue;
            }

            // Access problems in the direction nobody asked for drop the
            // field instead of failing.
            let strict =
                field_map.configured_by_user && (forward || field_map.direction != Direction::Both);

            if !field_map.source.is_readable() {
                if strict {
                    return Err(configuration(
                        map,
                        format!("`{}` cannot be read", field_map.source),
                    ));
                }
                continue;
            }

            let constructor_param = is_root_field(&field_map.destination)
                && params.contains(&field_map.destination.name);

            if !field_map.destination.is_writable() && !constructor_param {
                if strict {
                    return Err(configuration(
                        map,
                        format!("`{}` cannot be written", field_map.destination),
                    ));
                }
                continue;
            }

            pairings.push(Pairing {
                field_map,
                source: field_map.source.clone(),
                source_origin: Origin::Root,
                destination: field_map.destination.clone(),
                destination_origin: Origin::Root,
            });
        }

        let mut steps = self.steps(map, pairings, 0, 0)?;

        for param in &params {
            let mut bound = steps.iter_mut().filter_map(|step| match step {
                Step::Field(step)
                    if step.destination_origin == Origin::Root
                        && is_root_field(&step.destination)
                        && step.destination.name == *param =>
                {
                    Some(step)
                }
                _ => None,
            });

            match (bound.next(), bound.next()) {
                (Some(step), None) => step.constructor_arg = true,
                (Some(_), Some(_)) => {
                    return Err(configuration(
                        map,
                        format!(
                            "constructor parameter `{param}` of `{}` is bound more than once",
                            destination.name
                        ),
                    ))
                }
                (None, _) if map.configured_by_user => {
                    return Err(configuration(
                        map,
                        format!(
                            "constructor parameter `{param}` of `{}` is not bound by any field map",
                            destination.name
                        ),
                    ))
                }
                (None, _) => {}
            }
        }

        let identity = steps
            .iter()
            .enumerate()
            .filter_map(|(i, step)| match step {
                Step::Field(step)
                    if step.source_origin == Origin::Root
                        && step.destination_origin == Origin::Root
                        && (is_identity(map, &step.source) || is_identity(map, &step.destination)) =>
                {
                    Some(i)
                }
                _ => None,
            })
            .collect();

        Ok(Plan {
            source: map.a,
            destination: map.b,
            used: map.used.clone(),
            steps,
            identity,
            forward,
        })
    }

    /// Compiles pairings at one nesting level. Pairings reading or writing
    /// container elements are associated into groups.
    fn steps(
        &mut self,
        map: &ClassMap,
        pairings: Vec<Pairing<'_>>,
        source_base: usize,
        destination_base: usize,
    ) -> Result<Vec<Step>> {
        let (elements, scalars): (Vec<_>, Vec<_>) = pairings
            .into_iter()
            .partition(|p| p.source.is_element() || p.destination.is_element());

        let mut steps = vec![];

        for pairing in scalars {
            if let Some(step) = self.field_step(map, pairing)? {
                steps.push(Step::Field(step));
            }
        }

        for group in group::associate(elements) {
            if let Some(step) = self.group_step(map, group, source_base, destination_base)? {
                steps.push(Step::Group(step));
            }
        }

        Ok(steps)
    }

    fn field_step(&mut self, map: &ClassMap, pairing: Pairing<'_>) -> Result<Option<FieldStep>> {
        let field_map = pairing.field_map;
        let case = Case {
            source: &pairing.source.ty,
            destination: &pairing.destination.ty,
            converter: field_map.converter.as_deref(),
            configured_by_user: field_map.configured_by_user,
        };

        let resolved = match self.resolve(&case) {
            Ok(resolved) => resolved,
            Err(err) if field_map.configured_by_user => {
                return Err(err.context(configuration(
                    map,
                    format!("cannot map `{}` to `{}`", pairing.source, pairing.destination),
                )));
            }
            Err(err) => {
                warn!(
                    a = %map.a_name,
                    b = %map.b_name,
                    source = %pairing.source,
                    destination = %pairing.destination,
                    error = %err,
                    "dropped default field mapping"
                );
                return Ok(None);
            }
        };

        let Some((rule, conversion)) = resolved else {
            let source_ty = self.schema().type_name(&pairing.source.ty);
            let destination_ty = self.schema().type_name(&pairing.destination.ty);

            if field_map.configured_by_user {
                return Err(configuration(
                    map,
                    format!(
                        "no rule maps `{}` ({source_ty}) to `{}` ({destination_ty})",
                        pairing.source, pairing.destination
                    ),
                ));
            }

            warn!(
                a = %map.a_name,
                b = %map.b_name,
                source = %pairing.source,
                destination = %pairing.destination,
                "dropped default field mapping: no rule maps {source_ty} to {destination_ty}"
            );
            return Ok(None);
        };

        if conversion.is_skip() {
            trace!(
                source = %pairing.source,
                destination = %pairing.destination,
                rule,
                "skipped field mapping"
            );
            return Ok(None);
        }

        self.use_type(&pairing.source.ty);
        self.use_type(&pairing.destination.ty);

        let inverse = match pairing.destination_origin {
            Origin::Root if !pairing.destination.is_element() => field_map.destination_inverse.clone(),
            _ => None,
        };

        Ok(Some(FieldStep {
            source_origin: pairing.source_origin,
            source: pairing.source,
            destination_origin: pairing.destination_origin,
            destination: pairing.destination,
            conversion,
            rule,
            map_nulls: field_map.map_nulls,
            inverse,
            constructor_arg: false,
        }))
    }
}

fn configuration(map: &ClassMap, message: impl Into<String>) -> Error {
    Error::configuration(&map.a_name, &map.b_name, message)
}

/// A property naming a field of the object itself.
fn is_root_field(property: &Property) -> bool {
    property.segments.len() == 1 && property.element.is_none()
}

fn is_identity(map: &ClassMap, property: &Property) -> bool {
    property
        .segments
        .first()
        .is_some_and(|segment| map.is_identity_property(&segment.name))
}
