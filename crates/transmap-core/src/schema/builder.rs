use super::{Class, ClassDef, ClassId, EnumId, EnumType, Field, Schema};
use crate::{Error, Mappable, Result};
use indexmap::IndexMap;
use std::sync::Arc;

/// Collects class and enum declarations and turns them into a verified
/// [`Schema`].
#[derive(Debug, Default, Clone)]
pub struct Builder {
    classes: IndexMap<ClassId, ClassDef>,
    enums: IndexMap<EnumId, EnumType>,
}

/// Used to track state while classes are flattened.
struct BuildSchema<'a> {
    defs: &'a IndexMap<ClassId, ClassDef>,

    /// Classes as they are built, in dependency order
    classes: IndexMap<ClassId, Arc<Class>>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Adds a class declaration, replacing any earlier declaration with the
    /// same ID.
    pub fn class(&mut self, def: ClassDef) -> &mut Self {
        self.classes.insert(def.id, def);
        self
    }

    pub fn enum_type(&mut self, def: EnumType) -> &mut Self {
        self.enums.insert(def.id, def);
        self
    }

    /// Registers a type declared with `#[derive(Bean)]` or
    /// `#[derive(BeanEnum)]`, along with every type it refers to.
    pub fn register<T: Mappable>(&mut self) -> &mut Self {
        T::register(self);
        self
    }

    pub fn contains_class(&self, id: ClassId) -> bool {
        self.classes.contains_key(&id)
    }

    pub fn contains_enum(&self, id: EnumId) -> bool {
        self.enums.contains_key(&id)
    }

    pub fn build(&self) -> Result<Schema> {
        let mut build = BuildSchema {
            defs: &self.classes,
            classes: IndexMap::new(),
        };

        for id in self.classes.keys() {
            build.build_class(*id, &mut vec![])?;
        }

        let schema = Schema {
            classes: build.classes,
            enums: self
                .enums
                .iter()
                .map(|(id, def)| (*id, Arc::new(def.clone())))
                .collect(),
        };

        schema.verify()?;

        Ok(schema)
    }
}

impl BuildSchema<'_> {
    /// Builds `id` after its ancestors, so inherited fields can be copied.
    fn build_class(&mut self, id: ClassId, visiting: &mut Vec<ClassId>) -> Result<Arc<Class>> {
        if let Some(class) = self.classes.get(&id) {
            return Ok(class.clone());
        }

        let Some(def) = self.defs.get(&id) else {
            return Err(Error::invalid_schema(format!(
                "class {id:?} is referenced but was never declared"
            )));
        };

        if visiting.contains(&id) {
            return Err(Error::invalid_schema(format!(
                "class `{}` inherits from itself",
                def.name
            )));
        }

        visiting.push(id);

        let (mut fields, ancestors) = match def.parent {
            Some(parent) => {
                if !self.defs.contains_key(&parent) {
                    return Err(Error::invalid_schema(format!(
                        "class `{}` extends undeclared class {parent:?}",
                        def.name
                    )));
                }
                let parent = self.build_class(parent, visiting)?;
                let mut ancestors = vec![parent.id];
                ancestors.extend(parent.ancestors.iter().copied());
                (parent.fields.clone(), ancestors)
            }
            None => (vec![], vec![]),
        };

        visiting.pop();

        for field in &def.fields {
            if let Some(existing) = fields.iter().find(|f| f.name == field.name) {
                let declared_by = self
                    .defs
                    .get(&existing.declared_by)
                    .map(|def| def.name.as_str())
                    .unwrap_or("?");
                return Err(Error::invalid_schema(format!(
                    "field `{}` of class `{}` is already declared by `{}`",
                    field.name, def.name, declared_by
                )));
            }

            fields.push(Field {
                name: field.name.clone(),
                ty: field.ty.clone(),
                index: fields.len(),
                readable: field.readable,
                writable: field.writable,
                declared_by: id,
            });
        }

        if let Some(params) = &def.constructor {
            for param in params {
                if !fields.iter().any(|field| &field.name == param) {
                    return Err(Error::invalid_schema(format!(
                        "constructor of `{}` names unknown field `{param}`",
                        def.name
                    )));
                }
            }
        }

        let class = Arc::new(Class {
            id,
            name: def.name.clone(),
            parent: def.parent,
            ancestors,
            is_abstract: def.is_abstract,
            fields,
            constructor: def.constructor.clone(),
            to_string: def.to_string.clone(),
            from_string: def.from_string.clone(),
        });

        self.classes.insert(id, class.clone());
        Ok(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Type;

    #[test]
    fn inherited_fields_come_first() {
        let base = ClassDef::new("Base").field("id", Type::I64);
        let derived = ClassDef::new("Derived")
            .extends(base.id)
            .field("name", Type::String);
        let (base_id, derived_id) = (base.id, derived.id);

        // declare the subclass first; build order must not matter
        let schema = Builder::new().class(derived).class(base).build().unwrap();

        let derived = schema.class(derived_id).unwrap();
        let names: Vec<_> = derived.fields.iter().map(|f| &f.name[..]).collect();
        assert_eq!(names, ["id", "name"]);
        assert_eq!(derived.ancestors, vec![base_id]);
        assert_eq!(derived.fields[0].declared_by, base_id);
    }

    #[test]
    fn shadowed_field_is_rejected() {
        let base = ClassDef::new("Base").field("id", Type::I64);
        let derived = ClassDef::new("Derived")
            .extends(base.id)
            .field("id", Type::I32);

        let err = Builder::new().class(base).class(derived).build().unwrap_err();
        assert!(err.is_invalid_schema());
    }

    #[test]
    fn inheritance_cycle_is_rejected() {
        let a_id = ClassId::generate();
        let b = ClassDef::new("B").extends(a_id);
        let a = ClassDef::with_id(a_id, "A").extends(b.id);

        let err = Builder::new().class(a).class(b).build().unwrap_err();
        assert!(err.to_string().contains("inherits from itself"));
    }

    #[test]
    fn unknown_constructor_param_is_rejected() {
        let point = ClassDef::new("Point")
            .read_only("x", Type::I32)
            .constructor(["x", "y"]);

        let err = Builder::new().class(point).build().unwrap_err();
        assert!(err.to_string().contains("unknown field `y`"));
    }
}
