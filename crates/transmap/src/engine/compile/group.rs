use super::{Compiler, Pairing};
use crate::{
    engine::{GroupDestination, GroupSource, GroupStep, Origin, Shape},
    metadata::ClassMap,
    Result,
};
use transmap_core::{bail, Property, Type};

/// A container one side of a pairing iterates.
#[derive(Debug, Clone, PartialEq)]
struct Endpoint {
    origin: Origin,
    container: String,
}

/// Partitions element pairings into groups that iterate together.
///
/// Two pairings belong to the same group when they read the same source
/// container or write the same destination container. Membership is closed
/// transitively, so `x -> y`, `z -> y` and `z -> w` form one group.
pub(super) fn associate(pairings: Vec<Pairing<'_>>) -> Vec<Vec<Pairing<'_>>> {
    let endpoints: Vec<_> = pairings
        .iter()
        .map(|p| {
            (
                endpoint(&p.source, p.source_origin),
                endpoint(&p.destination, p.destination_origin),
            )
        })
        .collect();

    let shares = |i: usize, j: usize| {
        let (source_i, destination_i) = &endpoints[i];
        let (source_j, destination_j) = &endpoints[j];
        (source_i.is_some() && source_i == source_j)
            || (destination_i.is_some() && destination_i == destination_j)
    };

    let mut group_of: Vec<usize> = (0..pairings.len()).collect();

    loop {
        let mut changed = false;

        for i in 0..pairings.len() {
            for j in i + 1..pairings.len() {
                if group_of[i] != group_of[j] && shares(i, j) {
                    let (keep, replace) = (group_of[i].min(group_of[j]), group_of[i].max(group_of[j]));
                    for group in group_of.iter_mut() {
                        if *group == replace {
                            *group = keep;
                        }
                    }
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
    }

    let mut groups: Vec<(usize, Vec<Pairing<'_>>)> = vec![];
    for (pairing, group) in pairings.into_iter().zip(group_of) {
        match groups.iter_mut().find(|(id, _)| *id == group) {
            Some((_, members)) => members.push(pairing),
            None => groups.push((group, vec![pairing])),
        }
    }

    groups.into_iter().map(|(_, members)| members).collect()
}

fn endpoint(property: &Property, origin: Origin) -> Option<Endpoint> {
    property.is_element().then(|| Endpoint {
        origin,
        container: property.container_expression(),
    })
}

impl Compiler<'_> {
    /// Compiles one group. Element properties are re-rooted at the current
    /// item of their container; the group's own item slots start at the
    /// given bases.
    pub(super) fn group_step(
        &mut self,
        map: &ClassMap,
        group: Vec<Pairing<'_>>,
        source_base: usize,
        destination_base: usize,
    ) -> Result<Option<GroupStep>> {
        let map_nulls = group.iter().find_map(|p| p.field_map.map_nulls);

        let mut sources: Vec<GroupSource> = vec![];
        let mut destinations: Vec<GroupDestination> = vec![];
        let mut inner = Vec::with_capacity(group.len());

        for pairing in group {
            let (source, source_origin) = match &pairing.source.element {
                Some(element) => {
                    let index = match sources.iter().position(|s| {
                        s.origin == pairing.source_origin
                            && s.container.expression == pairing.source.container_expression()
                    }) {
                        Some(index) => index,
                        None => {
                            sources.push(GroupSource {
                                origin: pairing.source_origin,
                                container: pairing.source.container(),
                            });
                            sources.len() - 1
                        }
                    };
                    ((**element).clone(), Origin::Item(source_base + index))
                }
                None => (pairing.source.clone(), pairing.source_origin),
            };

            let (destination, destination_origin) = match &pairing.destination.element {
                Some(element) => {
                    let index = match destinations.iter().position(|d| {
                        d.origin == pairing.destination_origin
                            && d.container.expression == pairing.destination.container_expression()
                    }) {
                        Some(index) => index,
                        None => {
                            destinations.push(self.group_destination(map, &pairing)?);
                            destinations.len() - 1
                        }
                    };
                    ((**element).clone(), Origin::Item(destination_base + index))
                }
                None => (pairing.destination.clone(), pairing.destination_origin),
            };

            inner.push(Pairing {
                field_map: pairing.field_map,
                source,
                source_origin,
                destination,
                destination_origin,
            });
        }

        let steps = self.steps(
            map,
            inner,
            source_base + sources.len(),
            destination_base + destinations.len(),
        )?;

        if steps.is_empty() {
            return Ok(None);
        }

        Ok(Some(GroupStep {
            sources,
            destinations,
            source_base,
            destination_base,
            steps,
            map_nulls,
        }))
    }

    fn group_destination(&self, map: &ClassMap, pairing: &Pairing<'_>) -> Result<GroupDestination> {
        let container = pairing.destination.container();

        let Some(shape) = Shape::of(&container.ty) else {
            bail!(
                "`{}` of `{}` is not a collection, array or map",
                container,
                map.b_name
            );
        };

        let element = match &container.ty {
            Type::List(item) | Type::Set(item) | Type::Array(item) => (**item).clone(),
            _ => Type::Any,
        };

        Ok(GroupDestination {
            origin: pairing.destination_origin,
            container,
            shape,
            element,
            inverse: pairing.field_map.destination_inverse.clone(),
        })
    }
}
