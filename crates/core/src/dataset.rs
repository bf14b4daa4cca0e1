//! Normalization of raw upstream student records into a `Roster`.
//!
//! This is the only place upstream data is validated. Records are accepted
//! when they carry a name, a resolvable positive age and a known academy.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Entity, EntityError, EntityId, Roster, is_unknown_marker};

/// Age fields, in priority order.
pub const AGE_FIELDS: [&str; 3] = ["Age", "age", "CharacterAge"];

/// Academy fields, in priority order.
pub const ACADEMY_FIELDS: [&str; 2] = ["School", "school"];

const NAME_FIELD: &str = "Name";
const ID_FIELD: &str = "Id";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RosterError {
    #[error("no valid student data found ({rejected} records rejected)")]
    Empty { rejected: usize },
}

/// Why a single record was dropped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("record is not an object")]
    NotAnObject,
    #[error("missing name")]
    MissingName,
    #[error("no parseable age")]
    MissingAge,
    #[error("age is unknown")]
    UnknownAge,
    #[error("missing academy")]
    MissingAcademy,
    #[error("academy is unknown")]
    UnknownAcademy,
}

//
// ─── DOCUMENT SHAPE ────────────────────────────────────────────────────────────
//

/// Records contained in a dataset document.
///
/// Upstream serves either an array of records or an object keyed by id.
/// Returns `None` for any other shape.
#[must_use]
pub fn records(document: &Value) -> Option<Vec<&Value>> {
    match document {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Object(map) => Some(map.values().collect()),
        _ => None,
    }
}

//
// ─── FILTER ────────────────────────────────────────────────────────────────────
//

pub struct DatasetFilter;

impl DatasetFilter {
    /// Normalize every record, keeping source order.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::Empty` if no record passes normalization.
    pub fn filter<'a, I>(records: I) -> Result<Roster, RosterError>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut entities = Vec::new();
        let mut rejected = 0_usize;

        for (index, record) in records.into_iter().enumerate() {
            match Self::normalize(record) {
                Ok(entity) => entities.push(entity),
                Err(reason) => {
                    rejected += 1;
                    tracing::debug!(index, %reason, "dataset record rejected");
                }
            }
        }

        if entities.is_empty() {
            return Err(RosterError::Empty { rejected });
        }

        tracing::info!(accepted = entities.len(), rejected, "roster built");
        Ok(Roster::new(entities))
    }

    /// Project a single raw record onto an `Entity`.
    ///
    /// # Errors
    ///
    /// Returns the `Rejection` explaining why the record is unusable.
    pub fn normalize(record: &Value) -> Result<Entity, Rejection> {
        let fields = record.as_object().ok_or(Rejection::NotAnObject)?;

        let age = resolve_age(fields)?;
        let academy = first_text(fields, &ACADEMY_FIELDS).ok_or(Rejection::MissingAcademy)?;
        if is_unknown_marker(academy) {
            return Err(Rejection::UnknownAcademy);
        }
        let name = first_text(fields, &[NAME_FIELD]).ok_or(Rejection::MissingName)?;
        let id = fields.get(ID_FIELD).and_then(entity_id);

        Entity::new(id, name, age, academy).map_err(|err| match err {
            EntityError::EmptyName => Rejection::MissingName,
            EntityError::InvalidAge => Rejection::MissingAge,
            EntityError::EmptyAcademy => Rejection::MissingAcademy,
            EntityError::UnknownAcademy => Rejection::UnknownAcademy,
        })
    }
}

/// First age field that is present decides, unless it is blank or unparseable,
/// in which case the next alternate is tried. An unknown marker rejects outright.
fn resolve_age(fields: &Map<String, Value>) -> Result<u32, Rejection> {
    for field in AGE_FIELDS {
        match fields.get(field) {
            Some(Value::String(raw)) => {
                let raw = raw.trim();
                if raw.is_empty() {
                    continue;
                }
                if is_unknown_marker(raw) {
                    return Err(Rejection::UnknownAge);
                }
                if let Some(age) = leading_integer(raw) {
                    return Ok(age);
                }
            }
            Some(Value::Number(number)) => {
                if let Some(age) = positive_number(number) {
                    return Ok(age);
                }
            }
            _ => {}
        }
    }
    Err(Rejection::MissingAge)
}

/// Leading decimal digits of `raw`, so "17 years" reads as 17.
fn leading_integer(raw: &str) -> Option<u32> {
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..end].parse::<u32>().ok().filter(|age| *age > 0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn positive_number(number: &serde_json::Number) -> Option<u32> {
    if let Some(value) = number.as_u64() {
        return u32::try_from(value).ok().filter(|age| *age > 0);
    }
    number
        .as_f64()
        .filter(|value| *value >= 1.0 && *value < f64::from(u32::MAX))
        .map(|value| value.trunc() as u32)
}

fn first_text<'a>(fields: &'a Map<String, Value>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| fields.get(*name).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

fn entity_id(value: &Value) -> Option<EntityId> {
    match value {
        Value::Number(number) => Some(EntityId::new(number.to_string())),
        Value::String(raw) if !raw.trim().is_empty() => Some(EntityId::new(raw.trim())),
        _ => None,
    }
}
