/// Uniquely identifies an enumeration within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumId(pub usize);

impl EnumId {
    /// Generate a unique enum ID at runtime.
    pub fn generate() -> EnumId {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static NEXT_ENUM_ID: AtomicUsize = AtomicUsize::new(1 << 20);

        EnumId(NEXT_ENUM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An enumeration with named constants.
#[derive(Debug, Clone)]
pub struct EnumType {
    pub id: EnumId,
    pub name: String,
    pub variants: Vec<EnumVariant>,
}

#[derive(Debug, Clone)]
pub struct EnumVariant {
    /// The constant's declared name; mapping between enums matches on this.
    pub name: String,

    /// Text shown when the constant is formatted, when it differs from the
    /// name.
    pub display: Option<String>,
}

impl EnumType {
    /// Declares an enumeration with a freshly generated ID.
    pub fn new(name: impl Into<String>) -> EnumType {
        EnumType::with_id(EnumId::generate(), name)
    }

    pub fn with_id(id: EnumId, name: impl Into<String>) -> EnumType {
        EnumType {
            id,
            name: name.into(),
            variants: vec![],
        }
    }

    pub fn variant(mut self, name: impl Into<String>) -> EnumType {
        self.variants.push(EnumVariant {
            name: name.into(),
            display: None,
        });
        self
    }

    /// Adds a constant whose formatted text differs from its name.
    pub fn variant_with_display(
        mut self,
        name: impl Into<String>,
        display: impl Into<String>,
    ) -> EnumType {
        self.variants.push(EnumVariant {
            name: name.into(),
            display: Some(display.into()),
        });
        self
    }

    pub fn variant_index(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|variant| variant.name == name)
    }

    pub fn variant_name(&self, index: usize) -> Option<&str> {
        self.variants.get(index).map(|variant| &variant.name[..])
    }

    /// The formatted text of a constant: its display text if it has one,
    /// otherwise its name.
    pub fn display(&self, index: usize) -> Option<&str> {
        self.variants
            .get(index)
            .map(|variant| variant.display.as_deref().unwrap_or(&variant.name))
    }
}
