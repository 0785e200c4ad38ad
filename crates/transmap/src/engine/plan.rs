use super::{Conversion, Shape};
use crate::{converter::Converter, customizer::Customizer, metadata::MapperKey};
use std::sync::Arc;
use transmap_core::{schema::ClassId, Property, Schema, Type};

/// The executable form of a class map: one plan per direction.
///
/// Built once per class pair and shared read-only by every mapping call.
#[derive(Debug)]
pub(crate) struct CompiledMapper {
    /// Classes in the orientation the class map was declared with
    pub(crate) key: MapperKey,

    pub(crate) a_to_b: Plan,

    pub(crate) b_to_a: Plan,

    pub(crate) customizer: Option<Arc<dyn Customizer>>,

    /// Converters referenced by the plans
    pub(crate) used_converters: Vec<Arc<dyn Converter>>,

    /// Class pairs the plans delegate nested objects to
    pub(crate) used_mappers: Vec<MapperKey>,

    /// Property types read or written by the plans
    pub(crate) used_types: Vec<Type>,
}

/// Steps mapping one side of a class pair onto the other.
#[derive(Debug)]
pub(crate) struct Plan {
    pub(crate) source: ClassId,

    pub(crate) destination: ClassId,

    /// Plans of more general pairs, run before this plan's own steps
    pub(crate) used: Vec<MapperKey>,

    pub(crate) steps: Vec<Step>,

    /// Indices of the steps that decide whether a source and a destination
    /// instance are the same entity.
    pub(crate) identity: Vec<usize>,

    /// `true` for the `a -> b` plan
    pub(crate) forward: bool,
}

#[derive(Debug)]
pub(crate) enum Step {
    Field(FieldStep),
    Group(GroupStep),
}

/// Reads one source property, converts it, and writes one destination
/// property.
#[derive(Debug)]
pub(crate) struct FieldStep {
    pub(crate) source_origin: Origin,

    pub(crate) source: Property,

    pub(crate) destination_origin: Origin,

    pub(crate) destination: Property,

    pub(crate) conversion: Conversion,

    /// Name of the rule that chose the conversion
    pub(crate) rule: &'static str,

    pub(crate) map_nulls: Option<bool>,

    /// Property of the written object(s) to point back at the destination
    pub(crate) inverse: Option<Property>,

    /// The destination is a constructor parameter: written when the
    /// destination is created, even if it is read-only.
    pub(crate) constructor_arg: bool,
}

/// Iterates associated multi-occurrence properties in lock step.
///
/// Every source container contributes one item per iteration; every
/// destination container receives one item per iteration. Item slots are
/// numbered across nested groups: a group's own source items start at
/// `source_base`, its destination items at `destination_base`.
#[derive(Debug)]
pub(crate) struct GroupStep {
    pub(crate) sources: Vec<GroupSource>,

    pub(crate) destinations: Vec<GroupDestination>,

    pub(crate) source_base: usize,

    pub(crate) destination_base: usize,

    pub(crate) steps: Vec<Step>,

    pub(crate) map_nulls: Option<bool>,
}

#[derive(Debug)]
pub(crate) struct GroupSource {
    pub(crate) origin: Origin,
    pub(crate) container: Property,
}

#[derive(Debug)]
pub(crate) struct GroupDestination {
    pub(crate) origin: Origin,
    pub(crate) container: Property,
    pub(crate) shape: Shape,
    pub(crate) element: Type,

    /// Property of each written element pointing back at the container's
    /// owner
    pub(crate) inverse: Option<Property>,
}

/// Where a step's property path starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Origin {
    /// The object being mapped
    Root,

    /// The current item of a group container, by slot
    Item(usize),
}

impl CompiledMapper {
    /// Selects the plan whose source side `source` belongs to.
    pub(crate) fn plan_for(&self, schema: &Schema, source: ClassId) -> &Plan {
        if source == self.key.a {
            &self.a_to_b
        } else if source == self.key.b {
            &self.b_to_a
        } else if schema.is_subclass(source, self.key.a) {
            &self.a_to_b
        } else {
            &self.b_to_a
        }
    }
}

impl Plan {
    pub(crate) fn field_steps(&self) -> impl Iterator<Item = &FieldStep> {
        self.steps.iter().filter_map(|step| match step {
            Step::Field(step) => Some(step),
            Step::Group(_) => None,
        })
    }
}
