use transmap_core::schema::ClassId;

/// An ordered pair of classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapperKey {
    pub a: ClassId,
    pub b: ClassId,
}

impl MapperKey {
    pub fn new(a: ClassId, b: ClassId) -> MapperKey {
        MapperKey { a, b }
    }

    pub fn reversed(self) -> MapperKey {
        MapperKey::new(self.b, self.a)
    }

    /// The same key for `(a, b)` and `(b, a)`.
    pub fn unordered(self) -> MapperKey {
        if self.a <= self.b {
            self
        } else {
            self.reversed()
        }
    }
}
