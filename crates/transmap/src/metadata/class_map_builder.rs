use super::{ClassMap, Direction, FieldMap, MapperKey};
use crate::{customizer::Customizer, Result};
use std::{collections::HashSet, sync::Arc};
use transmap_core::{
    property::PropertyResolver, schema::ClassId, Error, Property, Schema, Type,
};

/// Declares a [`ClassMap`].
///
/// Errors are collected while declaring and reported by
/// [`ClassMapBuilder::build`], so declarations can be chained.
pub struct ClassMapBuilder {
    schema: Arc<Schema>,
    resolver: Arc<dyn PropertyResolver>,
    map: ClassMap,
    by_default: bool,
    error: Option<Error>,
}

/// Options of a single field map, set in [`ClassMapBuilder::field_with`].
#[derive(Debug, Default)]
pub struct FieldMapBuilder {
    converter: Option<String>,
    direction: Direction,
    excluded: bool,
    map_nulls: Option<bool>,
    a_inverse: Option<String>,
    b_inverse: Option<String>,
}

impl FieldMapBuilder {
    /// Converts the field with the converter registered under `id`.
    pub fn converter(&mut self, id: impl Into<String>) -> &mut Self {
        self.converter = Some(id.into());
        self
    }

    pub fn a_to_b_only(&mut self) -> &mut Self {
        self.direction = Direction::AToB;
        self
    }

    pub fn b_to_a_only(&mut self) -> &mut Self {
        self.direction = Direction::BToA;
        self
    }

    pub fn exclude(&mut self) -> &mut Self {
        self.excluded = true;
        self
    }

    pub fn map_nulls(&mut self, map_nulls: bool) -> &mut Self {
        self.map_nulls = Some(map_nulls);
        self
    }

    /// Property of the `a`-side value pointing back at its owner.
    pub fn a_inverse(&mut self, expression: impl Into<String>) -> &mut Self {
        self.a_inverse = Some(expression.into());
        self
    }

    /// Property of the `b`-side value pointing back at its owner.
    pub fn b_inverse(&mut self, expression: impl Into<String>) -> &mut Self {
        self.b_inverse = Some(expression.into());
        self
    }
}

impl ClassMapBuilder {
    pub(crate) fn new(
        schema: Arc<Schema>,
        resolver: Arc<dyn PropertyResolver>,
        a: ClassId,
        b: ClassId,
    ) -> ClassMapBuilder {
        let mut error = None;
        for id in [a, b] {
            if schema.class(id).is_none() {
                error.get_or_insert_with(|| {
                    Error::configuration(
                        schema.class_name(a),
                        schema.class_name(b),
                        format!("class {id:?} is not part of the schema"),
                    )
                });
            }
        }

        let map = ClassMap {
            a,
            b,
            a_name: schema.class_name(a),
            b_name: schema.class_name(b),
            field_maps: vec![],
            customizer: None,
            used: vec![],
            constructor_a: None,
            constructor_b: None,
            identity: vec![],
            configured_by_user: true,
        };

        ClassMapBuilder {
            schema,
            resolver,
            map,
            by_default: false,
            error,
        }
    }

    /// Maps `a_expression` of `a` to `b_expression` of `b`, in both
    /// directions.
    pub fn field(self, a_expression: &str, b_expression: &str) -> ClassMapBuilder {
        self.field_with(a_expression, b_expression, |_| {})
    }

    pub fn field_a_to_b(self, a_expression: &str, b_expression: &str) -> ClassMapBuilder {
        self.field_with(a_expression, b_expression, |f| {
            f.a_to_b_only();
        })
    }

    pub fn field_b_to_a(self, a_expression: &str, b_expression: &str) -> ClassMapBuilder {
        self.field_with(a_expression, b_expression, |f| {
            f.b_to_a_only();
        })
    }

    /// Excludes a property present on both classes from default mapping.
    pub fn exclude(self, name: &str) -> ClassMapBuilder {
        self.field_with(name, name, |f| {
            f.exclude();
        })
    }

    pub fn field_with(
        mut self,
        a_expression: &str,
        b_expression: &str,
        f: impl FnOnce(&mut FieldMapBuilder),
    ) -> ClassMapBuilder {
        let mut options = FieldMapBuilder::default();
        f(&mut options);

        match self.resolve_field_map(a_expression, b_expression, options) {
            Ok(field_map) => {
                if self.map.field_maps.contains(&field_map) {
                    self.fail(format!(
                        "`{a_expression}` -> `{b_expression}` is declared twice"
                    ));
                } else {
                    self.map.field_maps.push(field_map);
                }
            }
            Err(err) => self.record(err),
        }

        self
    }

    /// Names the properties that identify an element when merging
    /// collections.
    pub fn identity<I>(mut self, names: I) -> ClassMapBuilder
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.map.identity = names.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the constructor parameters of class `a`.
    pub fn constructor_a<I>(mut self, params: I) -> ClassMapBuilder
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.map.constructor_a = Some(params.into_iter().map(Into::into).collect());
        self
    }

    /// Overrides the constructor parameters of class `b`.
    pub fn constructor_b<I>(mut self, params: I) -> ClassMapBuilder
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.map.constructor_b = Some(params.into_iter().map(Into::into).collect());
        self
    }

    pub fn customize(mut self, customizer: impl Customizer + 'static) -> ClassMapBuilder {
        self.map.customizer = Some(Arc::new(customizer));
        self
    }

    /// Applies the class map registered for the more general pair
    /// `(a_parent, b_parent)` before this one.
    pub fn uses(mut self, a_parent: ClassId, b_parent: ClassId) -> ClassMapBuilder {
        if !self.schema.is_subclass(self.map.a, a_parent)
            || !self.schema.is_subclass(self.map.b, b_parent)
        {
            self.fail(format!(
                "cannot use {} <-> {}: not a supertype pair",
                self.schema.class_name(a_parent),
                self.schema.class_name(b_parent)
            ));
        } else {
            self.map.used.push(MapperKey::new(a_parent, b_parent));
        }
        self
    }

    /// Maps every remaining property that has the same name on both classes.
    pub fn by_default(mut self) -> ClassMapBuilder {
        self.by_default = true;
        self
    }

    pub fn build(mut self) -> Result<ClassMap> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        if self.by_default {
            let defaults = default_field_maps(
                &self.schema,
                &*self.resolver,
                self.map.a,
                self.map.b,
                &self.map.field_maps,
                &self.map.used,
            )
            .map_err(|err| self.configuration(err, "cannot derive default field maps"))?;
            self.map.field_maps.extend(defaults);
        }

        self.verify()?;
        Ok(self.map)
    }

    fn verify(&self) -> Result<()> {
        for (id, params) in [
            (self.map.a, &self.map.constructor_a),
            (self.map.b, &self.map.constructor_b),
        ] {
            let Some(params) = params else { continue };
            let class = self.schema.expect_class(id)?;
            for param in params {
                if class.field(param).is_none() {
                    return Err(Error::configuration(
                        &self.map.a_name,
                        &self.map.b_name,
                        format!("constructor of `{}` names unknown property `{param}`", class.name),
                    ));
                }
            }
        }

        for name in &self.map.identity {
            let known = [self.map.a, self.map.b].iter().any(|id| {
                self.schema
                    .class(*id)
                    .is_some_and(|class| class.field(name).is_some())
            });
            if !known {
                return Err(Error::configuration(
                    &self.map.a_name,
                    &self.map.b_name,
                    format!("identity property `{name}` exists on neither class"),
                ));
            }
        }

        Ok(())
    }

    fn resolve_field_map(
        &self,
        a_expression: &str,
        b_expression: &str,
        options: FieldMapBuilder,
    ) -> Result<FieldMap> {
        let a = self.resolve(self.map.a, a_expression)?;
        let b = self.resolve(self.map.b, b_expression)?;

        let source_inverse = options
            .a_inverse
            .map(|expression| self.resolve_inverse(&a, &expression))
            .transpose()?;
        let destination_inverse = options
            .b_inverse
            .map(|expression| self.resolve_inverse(&b, &expression))
            .transpose()?;

        Ok(FieldMap {
            converter: options.converter,
            excluded: options.excluded,
            direction: options.direction,
            configured_by_user: true,
            source_inverse,
            destination_inverse,
            map_nulls: options.map_nulls,
            ..FieldMap::new(a, b)
        })
    }

    fn resolve(&self, class: ClassId, expression: &str) -> Result<Property> {
        self.resolver
            .resolve(&self.schema, &Type::Object(class), expression)
            .map_err(|err| self.configuration(err, format!("cannot resolve `{expression}`")))
    }

    /// Resolves an inverse property against the class of the objects held by
    /// `property`.
    fn resolve_inverse(&self, property: &Property, expression: &str) -> Result<Property> {
        let held = match &property.ty {
            Type::Object(id) => Some(*id),
            ty => ty.element_type().and_then(Type::as_class),
        };

        let Some(class) = held else {
            return Err(Error::configuration(
                &self.map.a_name,
                &self.map.b_name,
                format!("`{property}` does not hold objects; it cannot have an inverse property"),
            ));
        };

        self.resolve(class, expression)
    }

    fn configuration(&self, cause: Error, message: impl Into<String>) -> Error {
        cause.context(Error::configuration(
            &self.map.a_name,
            &self.map.b_name,
            message,
        ))
    }

    fn fail(&mut self, message: String) {
        let err = Error::configuration(&self.map.a_name, &self.map.b_name, message);
        self.record(err);
    }

    fn record(&mut self, err: Error) {
        self.error.get_or_insert(err);
    }
}

/// Pairs every property of `a` with the property of the same name on `b`.
///
/// Skips properties already paired by `existing` (on either side) and the
/// properties `a` inherits from the `a` side of a `used` pair, which that
/// pair's class map covers. The resulting field maps are not user
/// configured.
pub(crate) fn default_field_maps(
    schema: &Schema,
    resolver: &dyn PropertyResolver,
    a: ClassId,
    b: ClassId,
    existing: &[FieldMap],
    used: &[MapperKey],
) -> Result<Vec<FieldMap>> {
    let root = |property: &Property| {
        property
            .segments
            .first()
            .map(|segment| segment.name.clone())
            .unwrap_or_default()
    };

    let mapped_a: HashSet<_> = existing.iter().map(|f| root(&f.source)).collect();
    let mapped_b: HashSet<_> = existing.iter().map(|f| root(&f.destination)).collect();

    let mut covered = HashSet::new();
    for key in used {
        let parent = schema.expect_class(key.a)?;
        covered.extend(parent.fields.iter().map(|field| field.name.clone()));
    }

    let b_properties = resolver.properties(schema, b)?;

    let mut field_maps = vec![];
    for a_property in resolver.properties(schema, a)? {
        if mapped_a.contains(&a_property.name)
            || mapped_b.contains(&a_property.name)
            || covered.contains(&a_property.name)
        {
            continue;
        }

        let Some(b_property) = b_properties.iter().find(|p| p.name == a_property.name) else {
            continue;
        };

        field_maps.push(FieldMap {
            configured_by_user: false,
            ..FieldMap::new(a_property, b_property.clone())
        });
    }

    Ok(field_maps)
}
