use super::{access, Exec};
use crate::{
    engine::{Conversion, EntryClass, FieldStep, Multi, Origin, Step},
    Result,
};
use std::collections::HashSet;
use transmap_core::{ObjectRef, Value, ValueMap};

impl Exec<'_> {
    /// Returns `true` if `destination` is what `source` maps to under
    /// `conversion`, i.e. both denote the same entity.
    ///
    /// Objects compare by their identity fields when the class map declares
    /// any, otherwise by every mapped field. Comparing never instantiates
    /// or maps a destination object.
    pub(super) fn equals(
        &mut self,
        conversion: &Conversion,
        source: &Value,
        destination: &Value,
    ) -> Result<bool> {
        match (source, destination) {
            (Value::Null, Value::Null) => return Ok(true),
            (Value::Null, _) | (_, Value::Null) => return Ok(false),
            _ => {}
        }

        match conversion {
            Conversion::Mapper { .. } | Conversion::Object { .. } => match (source, destination) {
                (Value::Object(source), Value::Object(destination)) => {
                    self.equals_object(source, destination)
                }
                _ => Ok(false),
            },
            Conversion::Multi(multi) => self.equals_multi(multi, source, destination),
            Conversion::Wrap { element, .. } => match destination.elements() {
                Some([only]) => self.equals(element, source, only),
                _ => Ok(false),
            },
            Conversion::Unwrap { element } => match source.elements().and_then(|s| s.first()) {
                Some(first) => self.equals(element, first, destination),
                None => Ok(false),
            },
            Conversion::Dynamic { to } => match self.resolve_dynamic(source, to)? {
                Some(conversion) => self.equals(&conversion, source, destination),
                None => Ok(false),
            },
            Conversion::Skip => Ok(true),
            Conversion::Converter { converter, to } => {
                // Converters may map nested objects through the facade; keep
                // those out of the caller's identity map.
                let mut scratch = self.facade.new_context();
                let converted = converter.convert(source.clone(), to, self.facade, &mut scratch)?;
                Ok(same_content(&converted, destination))
            }
            Conversion::Copy
            | Conversion::Primitive { .. }
            | Conversion::EnumToEnum { .. }
            | Conversion::StringToEnum { .. }
            | Conversion::EnumToString
            | Conversion::ToString
            | Conversion::FromString { .. } => {
                let converted = self.convert(conversion, source.clone(), None)?;
                Ok(converted.is_some_and(|converted| same_content(&converted, destination)))
            }
        }
    }

    fn equals_multi(&mut self, multi: &Multi, source: &Value, destination: &Value) -> Result<bool> {
        match multi {
            Multi::Seq { element, .. } => match (source.elements(), destination.elements()) {
                (Some(source), Some(destination)) if source.len() == destination.len() => {
                    for (s, d) in source.iter().zip(destination) {
                        if !self.equals(element, s, d)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                }
                _ => Ok(false),
            },
            Multi::Map { key, value, .. } => match (source, destination) {
                (Value::Map(source), Value::Map(destination)) => {
                    let destination: Vec<_> = destination.iter().collect();
                    self.equals_entries(key, value, source, &destination)
                }
                _ => Ok(false),
            },
            Multi::MapToSeq {
                entry, key, value, ..
            } => match (source, destination.elements()) {
                (Value::Map(source), Some(destination)) => {
                    let destination = entry_pairs(entry, destination);
                    let destination: Vec<_> = destination.iter().map(|(k, v)| (k, v)).collect();
                    self.equals_entries(key, value, source, &destination)
                }
                _ => Ok(false),
            },
            Multi::SeqToMap { entry, key, value } => match (source.elements(), destination) {
                (Some(source), Value::Map(destination)) => {
                    let source: ValueMap = entry_pairs(entry, source).into_iter().collect();
                    let destination: Vec<_> = destination.iter().collect();
                    self.equals_entries(key, value, &source, &destination)
                }
                _ => Ok(false),
            },
        }
    }

    /// Matches every source entry to a distinct destination entry whose key
    /// and value both compare equal.
    fn equals_entries(
        &mut self,
        key: &Conversion,
        value: &Conversion,
        source: &ValueMap,
        destination: &[(&Value, &Value)],
    ) -> Result<bool> {
        if source.len() != destination.len() {
            return Ok(false);
        }

        let mut claimed = vec![false; destination.len()];
        'source: for (sk, sv) in source.iter() {
            for (i, (dk, dv)) in destination.iter().enumerate() {
                if claimed[i] {
                    continue;
                }
                if self.equals(key, sk, dk)? && self.equals(value, sv, dv)? {
                    claimed[i] = true;
                    continue 'source;
                }
            }
            return Ok(false);
        }

        Ok(true)
    }

    fn equals_object(&mut self, source: &ObjectRef, destination: &ObjectRef) -> Result<bool> {
        if source.ptr_eq(destination) {
            return Ok(true);
        }

        // A pair already under comparison further up is assumed equal; the
        // outer comparison decides.
        if !self.cx.begin_compare(source, destination) {
            return Ok(true);
        }

        let result = self.compare_fields(source, destination);
        self.cx.end_compare(source, destination);
        result
    }

    fn compare_fields(&mut self, source: &ObjectRef, destination: &ObjectRef) -> Result<bool> {
        let unit = self
            .shared()
            .unit(source.class_id(), destination.class_id())?;
        let plan = unit.plan_for(self.schema(), source.class_id());

        let steps: Vec<&FieldStep> = if plan.identity.is_empty() {
            plan.field_steps()
                .filter(|step| {
                    step.source_origin == Origin::Root && step.destination_origin == Origin::Root
                })
                .collect()
        } else {
            plan.identity
                .iter()
                .filter_map(|&i| match &plan.steps[i] {
                    Step::Field(step) => Some(step),
                    Step::Group(_) => None,
                })
                .collect()
        };

        if steps.is_empty() {
            return Ok(false);
        }

        let source = Value::Object(source.clone());
        let destination = Value::Object(destination.clone());

        for step in steps {
            if !step.destination.is_readable() {
                continue;
            }

            let s = access::read(&source, &step.source.segments);
            let d = access::read(&destination, &step.destination.segments);

            if !self.equals(&step.conversion, &s, &d)? {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// The `(key, value)` slots of every entry-class instance in `items`.
fn entry_pairs(entry: &EntryClass, items: &[Value]) -> Vec<(Value, Value)> {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|object| {
            (
                object.get_slot(entry.key).unwrap_or_default(),
                object.get_slot(entry.value).unwrap_or_default(),
            )
        })
        .collect()
}

/// Compares two destination-side values by content: objects of the same
/// class compare slot by slot instead of by reference.
fn same_content(a: &Value, b: &Value) -> bool {
    same_content_guarded(a, b, &mut HashSet::new())
}

fn same_content_guarded(a: &Value, b: &Value, visiting: &mut HashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => {
            if a.ptr_eq(b) || !visiting.insert((a.addr(), b.addr())) {
                return true;
            }
            a.class_id() == b.class_id()
                && a.slot_count() == b.slot_count()
                && (0..a.slot_count()).all(|i| same_content_guarded(&a.slot(i), &b.slot(i), visiting))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter().all(|(k, v)| {
                    b.get(k)
                        .is_some_and(|other| same_content_guarded(v, other, visiting))
                })
        }
        _ => match (a.elements(), b.elements()) {
            (Some(a), Some(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(a, b)| same_content_guarded(a, b, visiting))
            }
            _ => a == b,
        },
    }
}
