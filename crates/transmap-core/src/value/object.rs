use super::Value;
use crate::{
    schema::{Class, ClassId},
    Error, Result,
};
use by_address::ByAddress;
use parking_lot::RwLock;
use std::{fmt, sync::Arc};

/// An instance of a [`Class`].
///
/// Field values are stored in slots laid out in the class's field order;
/// inherited fields come first, so a slot index valid for a parent class is
/// valid for every subclass.
pub struct Object {
    class: Arc<Class>,
    slots: RwLock<Vec<Value>>,
}

/// A shared handle to an [`Object`].
///
/// Handles compare and hash by identity: two handles are equal only when
/// they point at the same instance, never because the instances happen to
/// hold equal field values.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef(ByAddress<Arc<Object>>);

impl ObjectRef {
    /// Creates an instance with every field set to its type's default value.
    pub fn new(class: Arc<Class>) -> ObjectRef {
        let slots = class
            .fields
            .iter()
            .map(|field| field.ty.default_value())
            .collect();

        ObjectRef(ByAddress(Arc::new(Object {
            class,
            slots: RwLock::new(slots),
        })))
    }

    pub fn class(&self) -> &Arc<Class> {
        &self.0.class
    }

    pub fn class_id(&self) -> ClassId {
        self.0.class.id
    }

    pub fn class_name(&self) -> &str {
        &self.0.class.name
    }

    /// Reads a field by name.
    pub fn get(&self, name: &str) -> Result<Value> {
        let index = self.index_of(name)?;
        Ok(self.slot(index))
    }

    /// Writes a field by name.
    ///
    /// This is raw storage access: it does not consult the field's
    /// `writable` flag, which only governs what a mapping may assign.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index_of(name)?;
        self.set_slot(index, value.into());
        Ok(())
    }

    /// Reads the field stored in slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds for the object's class.
    pub fn slot(&self, index: usize) -> Value {
        self.0.slots.read()[index].clone()
    }

    /// Reads slot `index`, or `None` if the class has no such slot.
    pub fn get_slot(&self, index: usize) -> Option<Value> {
        self.0.slots.read().get(index).cloned()
    }

    pub fn slot_count(&self) -> usize {
        self.0.class.fields.len()
    }

    pub fn set_slot(&self, index: usize, value: Value) {
        self.0.slots.write()[index] = value;
    }

    /// Updates slot `index` in place while holding the write lock.
    pub fn update_slot<R>(&self, index: usize, f: impl FnOnce(&mut Value) -> R) -> R {
        f(&mut self.0.slots.write()[index])
    }

    /// Returns a snapshot of every field as `(name, value)` pairs.
    pub fn fields(&self) -> Vec<(String, Value)> {
        let slots = self.0.slots.read();
        self.0
            .class
            .fields
            .iter()
            .zip(slots.iter())
            .map(|(field, value)| (field.name.clone(), value.clone()))
            .collect()
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the instance, usable as an identity key.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.0.class.field_index(name).ok_or_else(|| {
            Error::invalid_schema(format!(
                "class `{}` has no field `{name}`",
                self.0.class.name
            ))
        })
    }
}

impl fmt::Debug for ObjectRef {
    /// Prints only the class name and the instance address so that cyclic
    /// graphs can be printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.class_name(), self.addr())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.read();
        let mut s = f.debug_struct(&self.class.name);
        for (field, value) in self.class.fields.iter().zip(slots.iter()) {
            s.field(&field.name, value);
        }
        s.finish()
    }
}
