use super::Exec;
use crate::{
    engine::{Case, Compiler, Conversion, Multi},
    Result,
};
use tracing::trace;
use transmap_core::{bail, Type, Value, ValueEnum, ValueMap};

impl Exec<'_> {
    /// Converts a source value. `existing` is the current destination
    /// value, reused by object and merging conversions.
    ///
    /// Returns `None` when the destination should be left untouched.
    pub(crate) fn convert(
        &mut self,
        conversion: &Conversion,
        value: Value,
        existing: Option<Value>,
    ) -> Result<Option<Value>> {
        if value.is_null() {
            return Ok(Some(match conversion {
                Conversion::Primitive {
                    to,
                    nullable: false,
                } => to.default_value(),
                _ => Value::Null,
            }));
        }

        let converted = match conversion {
            Conversion::Copy => value,
            Conversion::Primitive { to, .. } => to.cast(&value)?,
            Conversion::Converter { converter, to } => {
                converter.convert(value, to, self.facade, self.cx)?
            }
            Conversion::Mapper { to } | Conversion::Object { to } => {
                let source = value.to_object()?;
                let existing = existing
                    .and_then(|value| value.as_object().cloned())
                    .filter(|object| self.schema().is_subclass(object.class_id(), *to));
                Value::Object(self.map_object(&source, *to, existing.as_ref())?)
            }
            Conversion::EnumToEnum { table, to } => {
                let value = value.to_enum()?;
                match table.get(value.variant).copied().flatten() {
                    Some(variant) => Value::Enum(ValueEnum::new(*to, variant)),
                    None => return Ok(None),
                }
            }
            Conversion::StringToEnum { to } => {
                let name = value.to_string()?;
                let def = self.schema().expect_enum(*to)?;
                match def.variant_index(&name) {
                    Some(variant) => Value::Enum(ValueEnum::new(*to, variant)),
                    None => bail!("`{name}` is not a constant of `{}`", def.name),
                }
            }
            Conversion::EnumToString => {
                let value = value.to_enum()?;
                let def = self.schema().expect_enum(value.ty)?;
                match def.variant_name(value.variant) {
                    Some(name) => Value::from(name),
                    None => bail!("`{}` has no constant {}", def.name, value.variant),
                }
            }
            Conversion::Multi(multi) => return self.convert_multi(multi, value, existing),
            Conversion::ToString => Value::String(self.format(&value)?),
            Conversion::FromString { to } => self.parse(&value.to_string()?, to)?,
            Conversion::Wrap { shape, element } => match self.convert(element, value, None)? {
                Some(element) => shape.build(vec![element]),
                None => return Ok(None),
            },
            Conversion::Unwrap { element } => {
                let first = value
                    .into_elements()
                    .and_then(|items| items.into_iter().next());
                match first {
                    Some(item) => return self.convert(element, item, existing),
                    None => Value::Null,
                }
            }
            Conversion::Skip => return Ok(None),
            Conversion::Dynamic { to } => {
                return match self.resolve_dynamic(&value, to)? {
                    Some(conversion) => self.convert(&conversion, value, existing),
                    None => Ok(None),
                };
            }
        };

        Ok(Some(converted))
    }

    fn convert_multi(
        &mut self,
        multi: &Multi,
        value: Value,
        existing: Option<Value>,
    ) -> Result<Option<Value>> {
        let kind = value.kind_name();

        match multi {
            Multi::Seq {
                shape,
                element,
                merge,
            } => {
                let Some(items) = value.into_elements() else {
                    bail!("expected a list, set or array, found {kind}");
                };

                let existing = match existing {
                    Some(existing) if *merge => existing.into_elements().unwrap_or_default(),
                    _ => vec![],
                };
                let mut claimed = vec![false; existing.len()];

                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let reuse = self.claim(element, &item, &existing, &mut claimed)?;
                    if let Some(converted) = self.convert(element, item, reuse)? {
                        out.push(converted);
                    }
                }

                Ok(Some(shape.build(out)))
            }
            Multi::Map {
                key,
                value: value_conversion,
                merge,
            } => {
                let Value::Map(entries) = value else {
                    bail!("expected a map, found {kind}");
                };

                let existing = match existing {
                    Some(Value::Map(existing)) if *merge => Some(existing),
                    _ => None,
                };

                let mut out = ValueMap::new();
                for (k, v) in entries {
                    let Some(k) = self.convert(key, k, None)? else {
                        continue;
                    };
                    let current = existing.as_ref().and_then(|map| map.get(&k)).cloned();
                    if let Some(v) = self.convert(value_conversion, v, current)? {
                        out.insert(k, v);
                    }
                }

                Ok(Some(Value::Map(out)))
            }
            Multi::MapToSeq {
                shape,
                entry,
                key,
                value: value_conversion,
            } => {
                let Value::Map(entries) = value else {
                    bail!("expected a map, found {kind}");
                };

                let mut out = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    let object = self.instantiate(entry.class, &Value::Null)?;
                    if let Some(k) = self.convert(key, k, None)? {
                        object.set_slot(entry.key, k);
                    }
                    if let Some(v) = self.convert(value_conversion, v, None)? {
                        object.set_slot(entry.value, v);
                    }
                    out.push(Value::Object(object));
                }

                Ok(Some(shape.build(out)))
            }
            Multi::SeqToMap {
                entry,
                key,
                value: value_conversion,
            } => {
                let Some(items) = value.into_elements() else {
                    bail!("expected a list, set or array, found {kind}");
                };

                let mut out = ValueMap::new();
                for item in items {
                    let Value::Object(object) = item else {
                        continue;
                    };
                    let k = object.get_slot(entry.key).unwrap_or_default();
                    let v = object.get_slot(entry.value).unwrap_or_default();

                    let Some(k) = self.convert(key, k, None)? else {
                        continue;
                    };
                    if let Some(v) = self.convert(value_conversion, v, None)? {
                        out.insert(k, v);
                    }
                }

                Ok(Some(Value::Map(out)))
            }
        }
    }

    /// Finds the first unclaimed existing element equal to `item`.
    fn claim(
        &mut self,
        element: &Conversion,
        item: &Value,
        existing: &[Value],
        claimed: &mut [bool],
    ) -> Result<Option<Value>> {
        if item.is_null() {
            return Ok(None);
        }

        for (i, candidate) in existing.iter().enumerate() {
            if claimed[i] || candidate.is_null() {
                continue;
            }

            if self.equals(element, item, candidate)? {
                claimed[i] = true;
                return Ok(Some(candidate.clone()));
            }
        }

        Ok(None)
    }

    /// Picks a conversion from the run-time type of `value`.
    pub(crate) fn resolve_dynamic(&self, value: &Value, to: &Type) -> Result<Option<Conversion>> {
        let source = self.schema().type_of(value);

        let case = Case {
            source: &source,
            destination: to,
            converter: None,
            configured_by_user: false,
        };

        let resolved = Compiler::new(self.shared()).resolve(&case)?;
        trace!(
            source = %self.schema().type_name(&source),
            destination = %self.schema().type_name(to),
            rule = resolved.as_ref().map(|(rule, _)| *rule),
            "resolved run-time conversion"
        );

        Ok(resolved
            .map(|(_, conversion)| conversion)
            .filter(|conversion| !conversion.is_skip()))
    }

    fn format(&self, value: &Value) -> Result<String> {
        Ok(match value {
            Value::String(value) => value.clone(),
            Value::Bool(value) => value.to_string(),
            Value::Char(value) => value.to_string(),
            Value::I8(value) => value.to_string(),
            Value::I16(value) => value.to_string(),
            Value::I32(value) => value.to_string(),
            Value::I64(value) => value.to_string(),
            Value::F32(value) => value.to_string(),
            Value::F64(value) => value.to_string(),
            Value::Enum(value) => {
                let def = self.schema().expect_enum(value.ty)?;
                match def.variant_name(value.variant) {
                    Some(name) => name.to_string(),
                    None => bail!("`{}` has no constant {}", def.name, value.variant),
                }
            }
            Value::Object(object) => match &object.class().to_string {
                Some(to_string) => to_string(object),
                None => format!("{}@{:x}", object.class_name(), object.addr()),
            },
            other => bail!("cannot format a {} value as text", other.kind_name()),
        })
    }

    fn parse(&self, input: &str, to: &Type) -> Result<Value> {
        match to {
            Type::Primitive(primitive) | Type::Wrapper(primitive) => primitive.parse(input),
            Type::String => Ok(Value::from(input)),
            Type::Object(class) => {
                let class = self.schema().expect_class(*class)?;
                match &class.from_string {
                    Some(from_string) => Ok(Value::Object(from_string(class, input)?)),
                    None => bail!("`{}` cannot be built from a string", class.name),
                }
            }
            other => bail!(
                "cannot parse a string as `{}`",
                self.schema().type_name(other)
            ),
        }
    }
}
