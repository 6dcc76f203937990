//! Chart entry data loaded from the static JSON file.
//!
//! Loading is isolated per entry: an entry that fails to deserialize, carries an id that does
//! not match its `dof`/`row`, or repeats an earlier id is skipped with a warning and recorded
//! in [`ChartData::rejected`]. The rest of the file still loads.
//!
//! Inside an entry, isolation is per element. Malformed `options`, `position` or `rotation`
//! fields fall back to empty or absent values. An element without a usable `type` is dropped
//! and recorded in [`ChartData::dropped_elements`]; its siblings still load.
use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::chart::layout::slot_id;
use crate::error::{Error, Result};
use crate::events::{ChartEvent, EventSink};
use crate::shapes::options::vector_of;

const SPACE_KEYS: [&str; 2] = ["freedomSpace", "constraintSpace"];

/// One shape to place in a space.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Element {
    #[serde(rename = "type")]
    pub shape_type: String,
    #[serde(default, deserialize_with = "lenient_options")]
    pub options: Map<String, Value>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_vector"
    )]
    pub position: Option<Vec3>,
    /// Euler angles in radians, applied in XYZ order.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_vector"
    )]
    pub rotation: Option<Vec3>,
}

/// Non-object options become an empty map.
fn lenient_options<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => {
            warn!(found = %other, "element options are not an object; using none");
            Ok(Map::new())
        }
    }
}

/// Anything but a three-number array or an `{x, y, z}` object becomes `None`.
fn lenient_vector<'de, D>(deserializer: D) -> std::result::Result<Option<Vec3>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    let vector = vector_of(&value).filter(|v| v.is_finite());
    if vector.is_none() {
        warn!(found = %value, "ignoring malformed element override");
    }
    Ok(vector)
}

impl Element {
    pub fn new(shape_type: impl Into<String>) -> Self {
        Self {
            shape_type: shape_type.into(),
            options: Map::new(),
            position: None,
            rotation: None,
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }
}

/// An ordered list of elements. Order only affects draw order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Space {
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Space {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    pub id: String,
    pub dof: u32,
    pub row: u32,
    #[serde(default)]
    pub freedom_space: Space,
    #[serde(default)]
    pub constraint_space: Space,
}

impl ChartEntry {
    /// An entry whose id is derived from `dof` and `row`.
    pub fn new(dof: u32, row: u32, freedom_space: Space, constraint_space: Space) -> Self {
        Self {
            id: slot_id(dof, row),
            dof,
            row,
            freedom_space,
            constraint_space,
        }
    }

    /// Checks that `id` equals `"<dof>-DOF-<row>"`.
    pub fn validate(&self) -> Result<()> {
        let expected = slot_id(self.dof, self.row);
        if self.id != expected {
            return Err(Error::InvalidEntry {
                id: self.id.clone(),
                reason: format!("id does not match dof/row (expected '{expected}')"),
            });
        }
        Ok(())
    }
}

/// An entry skipped while loading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// Position in the source array.
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// An element removed from an otherwise loaded entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedElement {
    pub entry_id: String,
    /// `freedomSpace` or `constraintSpace`.
    pub space: &'static str,
    /// Position in the source `elements` array; `None` when the whole space was unreadable.
    pub index: Option<usize>,
    pub reason: String,
}

/// Loaded chart entries, in file order, with id lookup.
#[derive(Clone, Debug, Default)]
pub struct ChartData {
    entries: Vec<ChartEntry>,
    by_id: HashMap<String, usize>,
    rejected: Vec<Rejection>,
    dropped: Vec<DroppedElement>,
}

impl ChartData {
    /// Builds from already-typed entries, applying the same checks as JSON loading.
    pub fn from_entries(entries: impl IntoIterator<Item = ChartEntry>) -> Self {
        let mut data = Self::default();
        for (index, entry) in entries.into_iter().enumerate() {
            data.accept(index, entry);
        }
        data
    }

    /// Parses a JSON array of entries.
    ///
    /// Fails only if the document is not valid JSON or not an array.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        let Value::Array(items) = root else {
            return Err(Error::InvalidConfig(
                "chart data must be a JSON array of entries".to_string(),
            ));
        };

        let mut data = Self::default();
        for (index, mut item) in items.into_iter().enumerate() {
            let id = item.get("id").and_then(Value::as_str).map(str::to_owned);
            let dropped = match (&id, item.as_object_mut()) {
                (Some(id), Some(fields)) => sanitize_spaces(id, fields),
                _ => Vec::new(),
            };
            match serde_json::from_value::<ChartEntry>(item) {
                Ok(entry) => {
                    if data.accept(index, entry) {
                        for element in dropped {
                            warn!(
                                entry = %element.entry_id,
                                space = element.space,
                                index = ?element.index,
                                reason = %element.reason,
                                "dropping chart element"
                            );
                            data.dropped.push(element);
                        }
                    }
                }
                Err(err) => data.reject(index, id, err.to_string()),
            }
        }
        info!(
            entries = data.entries.len(),
            rejected = data.rejected.len(),
            dropped_elements = data.dropped.len(),
            "loaded chart data"
        );
        Ok(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Returns whether `entry` was kept.
    fn accept(&mut self, index: usize, entry: ChartEntry) -> bool {
        if let Err(err) = entry.validate() {
            self.reject(index, Some(entry.id), err.to_string());
            return false;
        }
        if self.by_id.contains_key(&entry.id) {
            let id = entry.id;
            self.reject(index, Some(id), "duplicate id".to_string());
            return false;
        }
        self.by_id.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    fn reject(&mut self, index: usize, id: Option<String>, reason: String) {
        warn!(index, id = id.as_deref().unwrap_or("?"), %reason, "skipping chart entry");
        self.rejected.push(Rejection { index, id, reason });
    }

    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&ChartEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    pub fn rejected(&self) -> &[Rejection] {
        &self.rejected
    }

    /// Elements removed from entries that otherwise loaded.
    pub fn dropped_elements(&self) -> &[DroppedElement] {
        &self.dropped
    }

    /// Sends one [`ChartEvent::Warning`] per rejected entry and dropped element.
    pub fn report(&self, sink: &mut dyn EventSink) {
        for rejection in &self.rejected {
            sink.send(ChartEvent::Warning {
                context: rejection
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("entry #{}", rejection.index)),
                message: format!("entry skipped: {}", rejection.reason),
            });
        }
        for element in &self.dropped {
            let position = element
                .index
                .map_or_else(|| "all elements".to_string(), |i| format!("element {i}"));
            sink.send(ChartEvent::Warning {
                context: element.entry_id.clone(),
                message: format!(
                    "{} {position} dropped: {}",
                    element.space, element.reason
                ),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChartEntry> {
        self.entries.iter()
    }
}

/// Removes unreadable spaces and elements from a raw entry object so the entry itself can load.
fn sanitize_spaces(entry_id: &str, fields: &mut Map<String, Value>) -> Vec<DroppedElement> {
    let mut dropped = Vec::new();
    for space in SPACE_KEYS {
        let Some(value) = fields.get_mut(space) else {
            continue;
        };
        let elements = match value {
            Value::Null => None,
            Value::Object(obj) => match obj.get_mut("elements") {
                None | Some(Value::Null) => None,
                Some(Value::Array(items)) => Some(items),
                Some(other) => {
                    dropped.push(DroppedElement {
                        entry_id: entry_id.to_string(),
                        space,
                        index: None,
                        reason: format!("elements must be an array, found {other}"),
                    });
                    *other = Value::Array(Vec::new());
                    None
                }
            },
            other => {
                dropped.push(DroppedElement {
                    entry_id: entry_id.to_string(),
                    space,
                    index: None,
                    reason: format!("space must be an object, found {other}"),
                });
                *other = Value::Null;
                None
            }
        };
        if let Some(items) = elements {
            let mut index = 0usize;
            items.retain(|item| {
                let keep = match Element::deserialize(item) {
                    Ok(_) => true,
                    Err(err) => {
                        dropped.push(DroppedElement {
                            entry_id: entry_id.to_string(),
                            space,
                            index: Some(index),
                            reason: err.to_string(),
                        });
                        false
                    }
                };
                index += 1;
                keep
            });
        }
        if fields.get(space).is_some_and(Value::is_null) {
            fields.remove(space);
        }
    }
    dropped
}

impl<'a> IntoIterator for &'a ChartData {
    type Item = &'a ChartEntry;
    type IntoIter = std::slice::Iter<'a, ChartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
