use transmap_core::Property;

/// A pairing of a property of class `a` with a property of class `b`.
///
/// A field map is declared once and used in both directions: the `b -> a`
/// plan is compiled from its [flipped](FieldMap::flip) form.
#[derive(Debug, Clone)]
pub struct FieldMap {
    pub source: Property,

    pub destination: Property,

    /// Id of the converter that must perform the conversion
    pub converter: Option<String>,

    /// Excluded field maps only keep the pair out of default mapping.
    pub excluded: bool,

    pub direction: Direction,

    /// `false` for field maps derived by name matching, which are dropped
    /// instead of failing when no mapping rule accepts them.
    pub configured_by_user: bool,

    /// Property of the source value that refers back to its owner
    pub source_inverse: Option<Property>,

    /// Property of the destination value that refers back to its owner
    pub destination_inverse: Option<Property>,

    /// Overrides the factory's `map_nulls` setting for this field.
    pub map_nulls: Option<bool>,
}

/// Directions in which a field map applies, relative to its source and
/// destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Both,
    AToB,
    BToA,
}

impl FieldMap {
    pub fn new(source: Property, destination: Property) -> FieldMap {
        FieldMap {
            source,
            destination,
            converter: None,
            excluded: false,
            direction: Direction::Both,
            configured_by_user: true,
            source_inverse: None,
            destination_inverse: None,
            map_nulls: None,
        }
    }

    /// The same pairing seen from the other side.
    pub fn flip(&self) -> FieldMap {
        FieldMap {
            source: self.destination.clone(),
            destination: self.source.clone(),
            converter: self.converter.clone(),
            excluded: self.excluded,
            direction: match self.direction {
                Direction::Both => Direction::Both,
                Direction::AToB => Direction::BToA,
                Direction::BToA => Direction::AToB,
            },
            configured_by_user: self.configured_by_user,
            source_inverse: self.destination_inverse.clone(),
            destination_inverse: self.source_inverse.clone(),
            map_nulls: self.map_nulls,
        }
    }

    /// Returns `true` if the field map does not apply from its source to its
    /// destination.
    pub fn is_ignored(&self) -> bool {
        self.direction == Direction::BToA
    }
}

impl PartialEq for FieldMap {
    fn eq(&self, other: &FieldMap) -> bool {
        self.source.expression == other.source.expression
            && self.destination.expression == other.destination.expression
    }
}
