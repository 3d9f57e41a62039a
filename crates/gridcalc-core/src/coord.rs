use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NameError;

/// Cell coordinate (0-indexed internally)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub const fn new(row: u32, col: u32) -> Self {
        CellCoord { row, col }
    }

    /// Render as a cell name (e.g., (0, 0) -> "A1", (11, 1) -> "B12")
    pub fn name(&self) -> String {
        format!("{}{}", col_to_label(self.col), self.row + 1)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Convert column index (0-indexed) to label (A, B, ..., Z, AA, AB, ...)
pub fn col_to_label(col: u32) -> String {
    let mut label = String::new();
    let mut n = col + 1; // 1-indexed for calculation

    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }

    label
}

/// Convert column label (A, B, ..., Z, AA, AB, ...) to index (0-indexed).
/// Only uppercase letters are accepted.
pub fn col_from_label(label: &str) -> Option<u32> {
    let mut col: u32 = 0;

    for c in label.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        col = col * 26 + (c as u32 - 'A' as u32 + 1);
    }

    if col == 0 {
        None
    } else {
        Some(col - 1) // Convert to 0-indexed
    }
}

/// Parse a cell name into a coordinate.
///
/// A cell name is one or more uppercase letters (base-26 column) followed by
/// a 1-based row number, e.g. "B12". Anything else is a `NameError`; names
/// are never silently clamped or case-folded.
pub fn parse_cell_name(name: &str) -> Result<CellCoord, NameError> {
    let split = name.find(|c: char| !c.is_ascii_uppercase()).unwrap_or(name.len());
    let (col_str, row_str) = name.split_at(split);

    if col_str.is_empty() || row_str.is_empty() {
        return Err(NameError::Malformed(name.to_string()));
    }

    if !row_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(NameError::Malformed(name.to_string()));
    }

    let col = col_from_label(col_str).ok_or_else(|| NameError::Malformed(name.to_string()))?;
    let row: u32 = row_str
        .parse()
        .map_err(|_| NameError::Malformed(name.to_string()))?;

    if row == 0 {
        return Err(NameError::Malformed(name.to_string()));
    }

    Ok(CellCoord::new(row - 1, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_label() {
        assert_eq!(col_to_label(0), "A");
        assert_eq!(col_to_label(25), "Z");
        assert_eq!(col_to_label(26), "AA");
        assert_eq!(col_to_label(27), "AB");
        assert_eq!(col_to_label(701), "ZZ");
        assert_eq!(col_to_label(702), "AAA");
    }

    #[test]
    fn test_col_from_label() {
        assert_eq!(col_from_label("A"), Some(0));
        assert_eq!(col_from_label("Z"), Some(25));
        assert_eq!(col_from_label("AA"), Some(26));
        assert_eq!(col_from_label("ZZ"), Some(701));
        assert_eq!(col_from_label(""), None);
        assert_eq!(col_from_label("a"), None);
    }

    #[test]
    fn test_parse_cell_name() {
        assert_eq!(parse_cell_name("A1").unwrap(), CellCoord::new(0, 0));
        assert_eq!(parse_cell_name("B12").unwrap(), CellCoord::new(11, 1));
        assert_eq!(parse_cell_name("AA100").unwrap(), CellCoord::new(99, 26));
    }

    #[test]
    fn test_parse_cell_name_rejects_malformed() {
        assert!(parse_cell_name("").is_err());
        assert!(parse_cell_name("A").is_err());
        assert!(parse_cell_name("12").is_err());
        assert!(parse_cell_name("A0").is_err());
        assert!(parse_cell_name("a1").is_err());
        assert!(parse_cell_name("A1B").is_err());
        assert!(parse_cell_name("A-1").is_err());
        assert!(parse_cell_name("A1 ").is_err());
    }

    #[test]
    fn test_name_round_trip() {
        for name in ["A1", "Z9", "AA100", "B12"] {
            let coord = parse_cell_name(name).unwrap();
            assert_eq!(coord.name(), name);
        }
    }
}
