//! The read-only type catalogue (spec §3/§6 "type catalogue"), a per-lane-type defaults table
//! consulted whenever lane attributes are absent or ignored by configuration.

use crate::netbuild::model::Permission;
use enumset::EnumSet;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefaults {
    pub speed: f64,
    pub width: f64,
    pub width_resolution: f64,
    pub max_width: Option<f64>,
    pub permissions: EnumSet<Permission>,
    pub discard: bool,
}

/// Per-lane-type-string defaults, keyed by the lane type string recorded on
/// [`crate::netbuild::model::Lane::type`].
#[derive(Debug, Clone, Default)]
pub struct TypeCatalogue {
    entries: HashMap<String, TypeDefaults>,
    fallback: Option<TypeDefaults>,
}

impl TypeCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, lane_type: impl Into<String>, defaults: TypeDefaults) {
        self.entries.insert(lane_type.into(), defaults);
    }

    pub fn with_fallback(mut self, defaults: TypeDefaults) -> Self {
        self.fallback = Some(defaults);
        self
    }

    pub fn get(&self, lane_type: &str) -> Option<&TypeDefaults> {
        self.entries.get(lane_type).or(self.fallback.as_ref())
    }

    pub fn is_discarded(&self, lane_type: &str) -> bool {
        self.get(lane_type).map(|d| d.discard).unwrap_or(false)
    }

    /// A standard-roads catalogue grounded on OpenDRIVE's common lane type vocabulary
    /// (`src/lane/lane_type.rs`), used as a sensible default when the caller has no bespoke
    /// type table of its own.
    pub fn standard() -> Self {
        use Permission::*;
        let driving: EnumSet<Permission> = Passenger | Bus | Emergency | Authority;
        let mut catalogue = Self::new();
        catalogue.insert(
            "driving",
            TypeDefaults {
                speed: 13.89,
                width: 3.5,
                width_resolution: 0.0,
                max_width: None,
                permissions: driving,
                discard: false,
            },
        );
        catalogue.insert(
            "biking",
            TypeDefaults {
                speed: 4.0,
                width: 1.5,
                width_resolution: 0.0,
                max_width: None,
                permissions: EnumSet::only(Bicycle),
                discard: false,
            },
        );
        catalogue.insert(
            "sidewalk",
            TypeDefaults {
                speed: 1.5,
                width: 2.0,
                width_resolution: 0.0,
                max_width: None,
                permissions: EnumSet::only(Pedestrian),
                discard: false,
            },
        );
        catalogue.insert(
            "bus",
            TypeDefaults {
                speed: 13.89,
                width: 3.5,
                width_resolution: 0.0,
                max_width: None,
                permissions: EnumSet::only(Bus),
                discard: false,
            },
        );
        catalogue.insert(
            "tram",
            TypeDefaults {
                speed: 13.89,
                width: 3.0,
                width_resolution: 0.0,
                max_width: None,
                permissions: EnumSet::only(Rail),
                discard: false,
            },
        );
        for cosmetic in ["shoulder", "border", "none", "restricted", "median", "curb"] {
            catalogue.insert(
                cosmetic,
                TypeDefaults {
                    speed: 0.0,
                    width: 0.0,
                    width_resolution: 0.0,
                    max_width: None,
                    permissions: EnumSet::empty(),
                    discard: true,
                },
            );
        }
        catalogue
    }
}
