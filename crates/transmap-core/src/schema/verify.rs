use super::Schema;
use crate::{Error, Result, Type};

impl Schema {
    /// Checks that every type mentioned by a field refers to a declared class
    /// or enum.
    pub(super) fn verify(&self) -> Result<()> {
        for class in self.classes.values() {
            for field in class.own_fields() {
                self.verify_type(&field.ty).map_err(|err| {
                    err.context(Error::invalid_schema(format!(
                        "field `{}::{}`",
                        class.name, field.name
                    )))
                })?;
            }
        }

        Ok(())
    }

    fn verify_type(&self, ty: &Type) -> Result<()> {
        match ty {
            Type::Object(id) if !self.classes.contains_key(id) => Err(Error::invalid_schema(
                format!("references undeclared class {id:?}"),
            )),
            Type::Enum(id) if !self.enums.contains_key(id) => Err(Error::invalid_schema(
                format!("references undeclared enum {id:?}"),
            )),
            Type::List(item) | Type::Set(item) | Type::Array(item) => self.verify_type(item),
            Type::Map(key, value) => {
                self.verify_type(key)?;
                self.verify_type(value)
            }
            _ => Ok(()),
        }
    }
}
