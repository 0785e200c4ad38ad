use super::{access, Exec, Frames, Item};
use crate::{
    engine::{FieldStep, GroupDestination, GroupStep, Origin, Shape, Step},
    Result,
};
use transmap_core::{Type, Value};

/// Elements of one destination container that are available for reuse.
struct Reusable {
    elements: Vec<Value>,
    claimed: Vec<bool>,
}

impl Exec<'_> {
    /// Runs a group: iterates its source containers in lock step, building
    /// one item per destination container per iteration.
    ///
    /// The iteration count is the length of the shortest non-null source
    /// container. Destination containers are rebuilt and assigned once, after
    /// the last iteration.
    pub(super) fn group(&mut self, group: &GroupStep, frames: &mut Frames) -> Result<()> {
        let containers: Vec<Value> = group
            .sources
            .iter()
            .map(|source| frames.read_source(source.origin, &source.container))
            .collect();

        if !containers.is_empty() && containers.iter().all(Value::is_null) {
            let map_nulls = group.map_nulls.unwrap_or(self.config().map_nulls);
            if map_nulls {
                for destination in &group.destinations {
                    self.write_at(frames, destination.origin, &destination.container, Value::Null)?;
                }
            }
            return Ok(());
        }

        let iterations = if containers.is_empty() {
            1
        } else {
            containers
                .iter()
                .filter_map(Value::len)
                .min()
                .unwrap_or(0)
        };

        let items: Vec<Vec<Item>> = containers.into_iter().map(access::items_of).collect();

        let mut reusable: Vec<Reusable> = group
            .destinations
            .iter()
            .map(|destination| self.reusable(destination, frames))
            .collect();

        let mut built: Vec<Vec<Item>> = vec![Vec::with_capacity(iterations); group.destinations.len()];

        for i in 0..iterations {
            frames.source_items.truncate(group.source_base);
            for source in &items {
                frames
                    .source_items
                    .push(source.get(i).cloned().unwrap_or_default());
            }

            frames.destination_items.truncate(group.destination_base);
            for (d, destination) in group.destinations.iter().enumerate() {
                let value = self.element(group, d, destination, &mut reusable[d], frames)?;
                frames.destination_items.push(Item {
                    key: Value::Null,
                    value,
                });
            }

            for step in &group.steps {
                match step {
                    // Steps writing outside the group see only the first
                    // iteration.
                    Step::Field(step) if i > 0 && !inside(group, step.destination_origin) => {}
                    Step::Field(step) => self.field(step, frames)?,
                    Step::Group(step) => self.group(step, frames)?,
                }
            }

            let mut current = frames.destination_items.split_off(group.destination_base);
            current.truncate(group.destinations.len());
            for (d, item) in current.into_iter().enumerate() {
                built[d].push(item);
            }
        }

        frames.source_items.truncate(group.source_base);
        frames.destination_items.truncate(group.destination_base);

        for (destination, items) in group.destinations.iter().zip(built) {
            let value = match destination.shape {
                Shape::Map => Value::Map(items.into_iter().map(|item| (item.key, item.value)).collect()),
                shape => shape.build(items.into_iter().map(|item| item.value).collect()),
            };

            if let Some(inverse) = &destination.inverse {
                let owner = frames.owner(destination.origin, &destination.container);
                self.link_inverse(&value, inverse, &owner)?;
            }

            self.write_at(frames, destination.origin, &destination.container, value)?;
        }

        Ok(())
    }

    /// The existing object elements of a destination container, which
    /// matching source items are merged into.
    fn reusable(&self, destination: &GroupDestination, frames: &Frames) -> Reusable {
        let elements = if destination.shape != Shape::Map
            && destination.element.is_object()
            && destination.container.is_readable()
        {
            frames
                .read_destination(destination.origin, &destination.container)
                .into_elements()
                .unwrap_or_default()
        } else {
            vec![]
        };

        Reusable {
            claimed: vec![false; elements.len()],
            elements,
        }
    }

    /// The initial value of the `index`-th destination item for the current
    /// iteration.
    fn element(
        &mut self,
        group: &GroupStep,
        index: usize,
        destination: &GroupDestination,
        reusable: &mut Reusable,
        frames: &Frames,
    ) -> Result<Value> {
        let Type::Object(class) = &destination.element else {
            return Ok(Value::Null);
        };

        let slot = Origin::Item(group.destination_base + index);
        let writes: Vec<&FieldStep> = group
            .steps
            .iter()
            .filter_map(|step| match step {
                Step::Field(step) if step.destination_origin == slot => Some(step),
                _ => None,
            })
            .collect();

        // A step assigning the whole element is matched against existing
        // elements on its own, and produces the element when none match.
        let whole = writes
            .iter()
            .copied()
            .find(|step| step.destination.segments.is_empty());

        let keys: Vec<&FieldStep> = match whole {
            Some(step) => vec![step],
            None => writes.clone(),
        }
        .into_iter()
        .filter(|step| matches!(step.source_origin, Origin::Item(_)))
        .collect();

        if !keys.is_empty() {
            for i in 0..reusable.elements.len() {
                if reusable.claimed[i] || reusable.elements[i].is_null() {
                    continue;
                }

                let candidate = reusable.elements[i].clone();
                if self.matches(&keys, frames, &candidate)? {
                    reusable.claimed[i] = true;
                    return Ok(candidate);
                }
            }
        }

        if whole.is_some() {
            return Ok(Value::Null);
        }

        let source = frames
            .source_items
            .get(group.source_base)
            .and_then(|item| item.value.as_object())
            .map(|object| object.class_id());

        let concrete = self.shared().resolve_concrete(source, *class, self.cx)?;
        let seed = frames
            .source_items
            .get(group.source_base)
            .map(|item| item.value.clone())
            .unwrap_or_default();

        Ok(Value::Object(self.instantiate(concrete, &seed)?))
    }

    /// Returns `true` if every keyed step maps the current source items to
    /// what `candidate` already holds.
    fn matches(&mut self, keys: &[&FieldStep], frames: &Frames, candidate: &Value) -> Result<bool> {
        for step in keys {
            let source = frames.read_source(step.source_origin, &step.source);
            let current = access::read(candidate, &step.destination.segments);

            if !self.equals(&step.conversion, &source, &current)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

fn inside(group: &GroupStep, origin: Origin) -> bool {
    matches!(origin, Origin::Item(slot) if slot >= group.destination_base)
}
