use crate::{ObjectRef, Result, Type};
use std::{fmt, sync::Arc};

/// Formats an instance for `any -> String` conversions.
pub type ToStringFn = Arc<dyn Fn(&ObjectRef) -> String + Send + Sync>;

/// Builds an instance of the class from its textual form.
pub type FromStringFn = Arc<dyn Fn(&Arc<Class>, &str) -> Result<ObjectRef> + Send + Sync>;

/// Uniquely identifies a class within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassId(pub usize);

impl ClassId {
    /// Generate a unique class ID at runtime.
    ///
    /// Uses a global atomic counter, so concurrent callers never receive the
    /// same ID.
    pub fn generate() -> ClassId {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static NEXT_CLASS_ID: AtomicUsize = AtomicUsize::new(1 << 20);

        ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A verified class: its own fields plus everything it inherits.
pub struct Class {
    pub id: ClassId,

    pub name: String,

    /// Direct superclass
    pub parent: Option<ClassId>,

    /// Every superclass, nearest first
    pub ancestors: Vec<ClassId>,

    /// Abstract classes cannot be instantiated; mapping to one requires
    /// resolving a concrete subclass first.
    pub is_abstract: bool,

    /// Inherited fields followed by the class's own fields.
    pub fields: Vec<Field>,

    /// Names of the fields passed to the constructor, in order.
    pub constructor: Option<Vec<String>>,

    pub to_string: Option<ToStringFn>,

    pub from_string: Option<FromStringFn>,
}

/// A named, typed slot on a class.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,

    pub ty: Type,

    /// Slot index within instances of the declaring class and its subclasses
    pub index: usize,

    /// False for write-only properties
    pub readable: bool,

    /// False for read-only properties, which can still be populated through
    /// the constructor.
    pub writable: bool,

    /// The class that declared the field
    pub declared_by: ClassId,
}

impl Class {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.field(name).map(|field| field.index)
    }

    /// Fields declared by this class itself, excluding inherited ones.
    pub fn own_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(move |field| field.declared_by == self.id)
    }

    pub fn is_constructor_param(&self, name: &str) -> bool {
        self.constructor
            .as_ref()
            .map(|params| params.iter().any(|param| param == name))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("is_abstract", &self.is_abstract)
            .field("fields", &self.fields)
            .field("constructor", &self.constructor)
            .finish_non_exhaustive()
    }
}

/// An unverified class declaration, as written by hand or by
/// `#[derive(Bean)]`.
#[derive(Clone)]
pub struct ClassDef {
    pub id: ClassId,
    pub name: String,
    pub parent: Option<ClassId>,
    pub is_abstract: bool,
    pub fields: Vec<FieldDef>,
    pub constructor: Option<Vec<String>>,
    pub to_string: Option<ToStringFn>,
    pub from_string: Option<FromStringFn>,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
    pub readable: bool,
    pub writable: bool,
}

impl ClassDef {
    /// Declares a class with a freshly generated ID.
    pub fn new(name: impl Into<String>) -> ClassDef {
        ClassDef::with_id(ClassId::generate(), name)
    }

    pub fn with_id(id: ClassId, name: impl Into<String>) -> ClassDef {
        ClassDef {
            id,
            name: name.into(),
            parent: None,
            is_abstract: false,
            fields: vec![],
            constructor: None,
            to_string: None,
            from_string: None,
        }
    }

    pub fn extends(mut self, parent: ClassId) -> ClassDef {
        self.parent = Some(parent);
        self
    }

    pub fn abstract_class(mut self) -> ClassDef {
        self.is_abstract = true;
        self
    }

    /// Declares a readable and writable field.
    pub fn field(self, name: impl Into<String>, ty: impl Into<Type>) -> ClassDef {
        self.field_with_access(name, ty, true, true)
    }

    /// Declares a field that can be read but not assigned.
    pub fn read_only(self, name: impl Into<String>, ty: impl Into<Type>) -> ClassDef {
        self.field_with_access(name, ty, true, false)
    }

    /// Declares a field that can be assigned but not read.
    pub fn write_only(self, name: impl Into<String>, ty: impl Into<Type>) -> ClassDef {
        self.field_with_access(name, ty, false, true)
    }

    pub fn field_with_access(
        mut self,
        name: impl Into<String>,
        ty: impl Into<Type>,
        readable: bool,
        writable: bool,
    ) -> ClassDef {
        self.fields.push(FieldDef {
            name: name.into(),
            ty: ty.into(),
            readable,
            writable,
        });
        self
    }

    pub fn constructor<I>(mut self, params: I) -> ClassDef
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.constructor = Some(params.into_iter().map(Into::into).collect());
        self
    }

    pub fn to_string_with(
        mut self,
        f: impl Fn(&ObjectRef) -> String + Send + Sync + 'static,
    ) -> ClassDef {
        self.to_string = Some(Arc::new(f));
        self
    }

    pub fn from_string_with(
        mut self,
        f: impl Fn(&Arc<Class>, &str) -> Result<ObjectRef> + Send + Sync + 'static,
    ) -> ClassDef {
        self.from_string = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDef")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
