use serde::{Deserialize, Deserializer, Serialize};

/// One non-empty cell of a sparse grid
///
/// Coordinates are zero-based. Nothing ties them to the declared grid size,
/// and two entries may share a coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellEntry {
    pub row: u32,
    pub col: u32,
    #[serde(default, deserialize_with = "deserialize_cell_value")]
    pub value: String,
}

impl CellEntry {
    pub fn new(row: u32, col: u32, value: impl Into<String>) -> Self {
        Self {
            row,
            col,
            value: value.into(),
        }
    }

    /// Check whether the cell lies inside a `rows` x `columns` grid
    pub fn fits(&self, rows: u32, columns: u32) -> bool {
        self.row < rows && self.col < columns
    }
}

/// Accept strings, numbers and booleans as cell values, storing their text form.
/// `null` becomes the empty string.
fn deserialize_cell_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Text(String),
        Integer(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Option::<RawValue>::deserialize(deserializer)? {
        Some(RawValue::Text(s)) => s,
        Some(RawValue::Integer(n)) => n.to_string(),
        Some(RawValue::Float(n)) => n.to_string(),
        Some(RawValue::Bool(b)) => b.to_string(),
        None => String::new(),
    })
}
