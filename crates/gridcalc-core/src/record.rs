use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::coord::CellCoord;

/// The persisted form of a modified cell.
///
/// Produced for and consumed from an external serialization collaborator.
/// The background color travels as its integer encoding in uppercase hex;
/// the text field holds the raw (possibly formula) text exactly as entered.
/// Unknown extra fields on the wire are ignored and field order does not
/// matter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    pub name: String,
    #[serde(rename = "bgcolor", with = "color_hex")]
    pub background_color: u32,
    pub text: String,
}

impl CellRecord {
    pub fn from_cell(cell: &Cell) -> Self {
        CellRecord {
            name: CellCoord::new(cell.row(), cell.col()).name(),
            background_color: cell.background_color(),
            text: cell.text().to_string(),
        }
    }
}

/// Serde adapter writing a u32 color as uppercase hexadecimal
mod color_hex {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(color: &u32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:X}", color))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u32::from_str_radix(&s, 16)
            .map_err(|_| de::Error::custom(format!("invalid color encoding: {:?}", s)))
    }
}
