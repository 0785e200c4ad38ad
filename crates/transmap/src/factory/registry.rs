use crate::{
    metadata::{ClassMap, MapperKey},
    Result,
};
use indexmap::IndexMap;
use std::{cmp::Ordering, sync::Arc};
use transmap_core::{schema::ClassId, Error, Schema, Type};

/// Class maps known to a factory, indexed under both orderings of their
/// class pair.
#[derive(Debug, Default)]
pub(crate) struct ClassMapRegistry {
    maps: IndexMap<MapperKey, Entry>,
}

#[derive(Debug)]
struct Entry {
    map: Arc<ClassMap>,

    /// `false` for the flipped copy stored under the reversed key
    declared: bool,
}

impl ClassMapRegistry {
    /// Adds a class map.
    ///
    /// A user class map may not be registered twice for the same pair, in
    /// either orientation. A synthesized one is replaced.
    pub(crate) fn insert(&mut self, map: ClassMap) -> Result<Arc<ClassMap>> {
        if let Some(existing) = self.declared(map.a, map.b) {
            if existing.configured_by_user {
                return Err(Error::configuration(
                    &map.a_name,
                    &map.b_name,
                    format!(
                        "a class map for {} <-> {} is already registered",
                        existing.a_name, existing.b_name
                    ),
                ));
            }
        }

        self.remove(map.a, map.b);

        let key = map.key();
        let map = Arc::new(map);

        if key.a != key.b {
            self.maps.insert(
                key.reversed(),
                Entry {
                    map: Arc::new(map.flip()),
                    declared: false,
                },
            );
        }
        self.maps.insert(
            key,
            Entry {
                map: map.clone(),
                declared: true,
            },
        );

        Ok(map)
    }

    pub(crate) fn remove(&mut self, a: ClassId, b: ClassId) {
        let key = MapperKey::new(a, b);
        self.maps.shift_remove(&key);
        self.maps.shift_remove(&key.reversed());
    }

    /// The class map for `a -> b`, flipped if it was declared as `b -> a`.
    pub(crate) fn lookup(&self, a: ClassId, b: ClassId) -> Option<Arc<ClassMap>> {
        self.maps
            .get(&MapperKey::new(a, b))
            .map(|entry| entry.map.clone())
    }

    /// The class map for the pair, in the orientation it was declared in.
    pub(crate) fn declared(&self, a: ClassId, b: ClassId) -> Option<Arc<ClassMap>> {
        let key = MapperKey::new(a, b);
        [key, key.reversed()]
            .iter()
            .filter_map(|key| self.maps.get(key))
            .find(|entry| entry.declared)
            .map(|entry| entry.map.clone())
    }

    /// Returns `true` if the user registered a class map for the pair.
    pub(crate) fn is_explicit(&self, a: ClassId, b: ClassId) -> bool {
        self.declared(a, b)
            .is_some_and(|map| map.configured_by_user)
    }

    /// User-registered pairs in registration order, as declared.
    pub(crate) fn explicit_pairs(&self) -> impl Iterator<Item = MapperKey> + '_ {
        self.maps
            .iter()
            .filter(|(_, entry)| entry.declared && entry.map.configured_by_user)
            .map(|(key, _)| *key)
    }

    /// The most specific user-registered pair that `(a, b)` specializes,
    /// oriented as `(parent of a, parent of b)`.
    ///
    /// A pair dominates another when both of its classes are subclasses of
    /// the other's. Among pairs that do not dominate each other the first
    /// registered wins.
    pub(crate) fn most_specific_parent(
        &self,
        schema: &Schema,
        a: ClassId,
        b: ClassId,
    ) -> Option<MapperKey> {
        most_specific(
            schema,
            self.oriented_pairs().filter(|candidate| {
                (candidate.a, candidate.b) != (a, b)
                    && schema.is_subclass(a, candidate.a)
                    && schema.is_subclass(b, candidate.b)
            }),
        )
    }

    /// Every user-registered pair in both orientations, in registration
    /// order.
    pub(crate) fn oriented_pairs(&self) -> impl Iterator<Item = MapperKey> + '_ {
        self.explicit_pairs()
            .flat_map(|key| [key, key.reversed()])
    }
}

/// Orders class pairs from most to least specific.
///
/// `x` sorts before `y` when each class of `x` is the matching class of `y`
/// or more specific than it. Pairs where neither dominates compare `Equal`.
pub(crate) fn compare_pairs(schema: &Schema, x: MapperKey, y: MapperKey) -> Ordering {
    let end = |x: ClassId, y: ClassId| {
        schema.compare_specificity(&Type::Object(x), &Type::Object(y))
    };

    if x == y {
        return Ordering::Equal;
    }

    match (end(x.a, y.a), end(x.b, y.b)) {
        (Ordering::Less, Ordering::Less) => Ordering::Less,
        (Ordering::Less, _) if x.b == y.b => Ordering::Less,
        (_, Ordering::Less) if x.a == y.a => Ordering::Less,
        (Ordering::Greater, Ordering::Greater) => Ordering::Greater,
        (Ordering::Greater, _) if x.b == y.b => Ordering::Greater,
        (_, Ordering::Greater) if x.a == y.a => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// The first of `candidates` that no later candidate dominates, keeping the
/// earliest among pairs that compare `Equal`.
pub(crate) fn most_specific(
    schema: &Schema,
    candidates: impl IntoIterator<Item = MapperKey>,
) -> Option<MapperKey> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(current) if compare_pairs(schema, candidate, current) != Ordering::Less => {
            Some(current)
        }
        _ => Some(candidate),
    })
}
