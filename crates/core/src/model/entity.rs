use thiserror::Error;
use url::Url;

use crate::model::ids::EntityId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntityError {
    #[error("entity name cannot be empty")]
    EmptyName,

    #[error("entity age must be > 0")]
    InvalidAge,

    #[error("entity academy cannot be empty")]
    EmptyAcademy,

    #[error("entity academy is unknown")]
    UnknownAcademy,
}

//
// ─── ACADEMIES ─────────────────────────────────────────────────────────────────
//

/// Academies offered as distractors for academy questions.
pub const KNOWN_ACADEMIES: [&str; 10] = [
    "Gehenna",
    "Trinity",
    "Millennium",
    "Abydos",
    "Shanhaijing",
    "Hyakkiyako",
    "Red Winter",
    "Valkyrie",
    "Arius",
    "SRT",
];

/// Values upstream uses for "we don't know".
pub(crate) const UNKNOWN_MARKERS: [&str; 2] = ["unknown", "?"];

pub(crate) fn is_unknown_marker(value: &str) -> bool {
    let value = value.trim();
    UNKNOWN_MARKERS
        .iter()
        .any(|marker| value.eq_ignore_ascii_case(marker))
}

//
// ─── ENTITY ────────────────────────────────────────────────────────────────────
//

/// A normalized student record.
///
/// Construction guarantees a non-empty name, a positive age and an academy
/// that is neither blank nor an unknown marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    id: Option<EntityId>,
    name: String,
    age: u32,
    academy: String,
}

impl Entity {
    /// # Errors
    ///
    /// Returns `EntityError` if the name or academy is blank, the academy is an
    /// unknown marker, or the age is zero.
    pub fn new(
        id: Option<EntityId>,
        name: impl Into<String>,
        age: u32,
        academy: impl Into<String>,
    ) -> Result<Self, EntityError> {
        let name = name.into().trim().to_owned();
        let academy = academy.into().trim().to_owned();

        if name.is_empty() {
            return Err(EntityError::EmptyName);
        }
        if age == 0 {
            return Err(EntityError::InvalidAge);
        }
        if academy.is_empty() {
            return Err(EntityError::EmptyAcademy);
        }
        if is_unknown_marker(&academy) {
            return Err(EntityError::UnknownAcademy);
        }

        Ok(Self {
            id,
            name,
            age,
            academy,
        })
    }

    /// Returns the upstream id, if the record carried one.
    #[must_use]
    pub fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    /// Returns the trimmed display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the age in years; always positive.
    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Returns the academy as spelled upstream.
    #[must_use]
    pub fn academy(&self) -> &str {
        &self.academy
    }

    /// Portrait image for this entity under `base`, e.g. `<base>10000.webp`.
    ///
    /// `base` should end with a `/`; otherwise its last segment is replaced.
    #[must_use]
    pub fn portrait_url(&self, base: &Url) -> Option<Url> {
        let id = self.id.as_ref()?;
        base.join(&format!("{id}.webp")).ok()
    }
}

//
// ─── ROSTER ────────────────────────────────────────────────────────────────────
//

/// Ordered set of entities a quiz draws from. Source order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entities: Vec<Entity>,
}

impl Roster {
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns entities in source order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}

impl FromIterator<Entity> for Roster {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
