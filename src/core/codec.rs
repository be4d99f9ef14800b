use std::fmt;

use super::grid::MapGrid;
use super::palette::TileId;

/// Symbol alphabet for the on-disk format, one byte per cell. The digit
/// prefix keeps indices 0-9 byte-compatible with the historical
/// `'0' + index` encoding; letters extend the range to 36 tile kinds.
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub fn alphabet_len() -> usize {
    ALPHABET.len()
}

/// Map-text decode error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Empty,
    UnknownSymbol { line: usize, column: usize, symbol: char },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "map text is empty"),
            DecodeError::UnknownSymbol { line, column, symbol } => write!(
                f,
                "unknown map symbol {:?} at line {}, column {}",
                symbol, line, column
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

fn encode_symbol(id: TileId) -> char {
    ALPHABET[id as usize] as char
}

fn decode_symbol(symbol: char) -> Option<TileId> {
    match symbol {
        '0'..='9' => Some(symbol as u8 - b'0'),
        'a'..='z' => Some(symbol as u8 - b'a' + 10),
        _ => None,
    }
}

/// Serialize a grid: one line per row, one symbol per cell, rows separated
/// by newlines with no trailing newline after the last row.
pub fn encode(grid: &MapGrid) -> String {
    let mut text = String::with_capacity((grid.width() + 1) * grid.height());
    for (y, row) in grid.rows().enumerate() {
        if y != 0 {
            text.push('\n');
        }
        for &id in row {
            text.push(encode_symbol(id));
        }
    }
    text
}

/// Parse map text back into a grid. Height is the line count, width the
/// longest line; short lines pad with the default tile. Symbols outside
/// the alphabet are an error naming their position (1-based).
pub fn decode(text: &str) -> Result<MapGrid, DecodeError> {
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut rows = Vec::new();
    for (y, line) in text.lines().enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (x, symbol) in line.chars().enumerate() {
            match decode_symbol(symbol) {
                Some(id) => row.push(id),
                None => {
                    return Err(DecodeError::UnknownSymbol {
                        line: y + 1,
                        column: x + 1,
                        symbol,
                    })
                }
            }
        }
        rows.push(row);
    }

    Ok(MapGrid::from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_two_by_two() {
        let grid = decode("01\n23").unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(0, 0), 0);
        assert_eq!(grid.get(1, 0), 1);
        assert_eq!(grid.get(0, 1), 2);
        assert_eq!(grid.get(1, 1), 3);
    }

    #[test]
    fn test_round_trip_preserves_cells() {
        let mut grid = MapGrid::blank(4, 3);
        grid.set(0, 0, 9);
        grid.set(3, 0, 1);
        grid.set(2, 2, 7);

        let text = encode(&grid);
        let decoded = decode(&text).unwrap();
        assert_eq!(decoded, grid);
    }

    #[test]
    fn test_indices_past_nine_use_letters() {
        let mut grid = MapGrid::blank(2, 1);
        grid.set(0, 0, 10);
        grid.set(1, 0, 13);

        let text = encode(&grid);
        assert_eq!(text, "ad");
        assert_eq!(decode(&text).unwrap(), grid);
    }

    #[test]
    fn test_no_trailing_newline() {
        let text = encode(&MapGrid::blank(3, 2));
        assert_eq!(text, "000\n000");
    }

    #[test]
    fn test_jagged_lines_pad_with_default() {
        let grid = decode("123\n4").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.get(0, 1), 4);
        assert_eq!(grid.get(1, 1), 0);
    }

    #[test]
    fn test_unknown_symbol_names_position() {
        let err = decode("00\n0#").unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownSymbol {
                line: 2,
                column: 2,
                symbol: '#'
            }
        );
    }

    #[test]
    fn test_empty_text_is_an_error() {
        assert_eq!(decode("").unwrap_err(), DecodeError::Empty);
    }
}
