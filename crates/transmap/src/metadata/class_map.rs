use super::{FieldMap, MapperKey};
use crate::customizer::Customizer;
use std::{fmt, sync::Arc};
use transmap_core::schema::ClassId;

/// How class `a` maps to class `b`, field by field.
///
/// A class map is immutable once built. The `b -> a` direction is derived
/// from the same declaration with [`ClassMap::flip`].
#[derive(Clone)]
pub struct ClassMap {
    pub a: ClassId,
    pub b: ClassId,

    pub a_name: String,
    pub b_name: String,

    pub field_maps: Vec<FieldMap>,

    pub customizer: Option<Arc<dyn Customizer>>,

    /// Class maps of more general pairs, applied before this one's fields
    pub used: Vec<MapperKey>,

    /// Properties passed to the constructor of `a`, overriding the class's
    /// own declaration
    pub constructor_a: Option<Vec<String>>,

    pub constructor_b: Option<Vec<String>>,

    /// Properties identifying the same logical entity when merging
    /// collection elements. Names may refer to either side. Empty means every
    /// mapped property takes part.
    pub identity: Vec<String>,

    /// `false` for class maps synthesized by name matching
    pub configured_by_user: bool,
}

impl ClassMap {
    pub fn key(&self) -> MapperKey {
        MapperKey::new(self.a, self.b)
    }

    /// The same class map with `a` and `b` swapped.
    pub fn flip(&self) -> ClassMap {
        ClassMap {
            a: self.b,
            b: self.a,
            a_name: self.b_name.clone(),
            b_name: self.a_name.clone(),
            field_maps: self.field_maps.iter().map(FieldMap::flip).collect(),
            customizer: self.customizer.clone(),
            used: self.used.iter().map(|key| key.reversed()).collect(),
            constructor_a: self.constructor_b.clone(),
            constructor_b: self.constructor_a.clone(),
            identity: self.identity.clone(),
            configured_by_user: self.configured_by_user,
        }
    }

    pub fn is_identity_property(&self, name: &str) -> bool {
        self.identity.iter().any(|identity| identity == name)
    }
}

impl fmt::Debug for ClassMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMap")
            .field("a", &self.a_name)
            .field("b", &self.b_name)
            .field("field_maps", &self.field_maps.len())
            .field("used", &self.used)
            .field("identity", &self.identity)
            .field("configured_by_user", &self.configured_by_user)
            .finish_non_exhaustive()
    }
}
