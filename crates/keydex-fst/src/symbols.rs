// Symbol table: char-to-index and index-to-char mapping.

use crate::FstError;
use hashbrown::HashMap;

/// Parsed symbol table of a dictionary image.
///
/// Symbols are stored as:
/// 1. Epsilon (index 0) -- empty string, never used as a transition label
/// 2. Single-character symbols, sorted by character
///
/// Because symbols are sorted, comparing symbol indices gives the same
/// answer as comparing the characters they stand for. Transitions sorted by
/// symbol index are therefore sorted by label.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Maps symbol index to its character. Index 0 holds `'\0'` for epsilon.
    symbol_chars: Vec<char>,
    /// Maps a character to its symbol index.
    char_to_symbol: HashMap<char, u16>,
}

impl SymbolTable {
    /// Build a table from an alphabet. The alphabet is sorted and deduplicated.
    pub fn from_alphabet(alphabet: impl IntoIterator<Item = char>) -> Result<Self, FstError> {
        let mut chars: Vec<char> = alphabet.into_iter().collect();
        chars.sort_unstable();
        chars.dedup();
        if chars.len() >= u16::MAX as usize {
            return Err(FstError::TooManySymbols);
        }

        let mut symbol_chars = Vec::with_capacity(chars.len() + 1);
        symbol_chars.push('\0');
        let mut char_to_symbol = HashMap::with_capacity(chars.len());
        for (i, ch) in chars.into_iter().enumerate() {
            symbol_chars.push(ch);
            char_to_symbol.insert(ch, (i + 1) as u16);
        }
        Ok(Self {
            symbol_chars,
            char_to_symbol,
        })
    }

    /// Symbol index of `ch`, if `ch` is in the alphabet.
    #[inline]
    pub fn symbol_of(&self, ch: char) -> Option<u16> {
        self.char_to_symbol.get(&ch).copied()
    }

    /// Character of a non-epsilon symbol index.
    #[inline]
    pub fn char_of(&self, symbol: u16) -> Option<char> {
        if symbol == 0 {
            return None;
        }
        self.symbol_chars.get(symbol as usize).copied()
    }

    /// Number of symbols including epsilon.
    pub fn len(&self) -> usize {
        self.symbol_chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_chars.len() <= 1
    }

    /// Number of characters in the alphabet (epsilon excluded).
    pub fn alphabet_size(&self) -> usize {
        self.symbol_chars.len().saturating_sub(1)
    }

    /// Append the serialized table: count (u16) + null-terminated strings.
    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&(self.symbol_chars.len() as u16).to_le_bytes());
        buf.push(0); // epsilon
        let mut utf8 = [0u8; 4];
        for ch in self.symbol_chars.iter().skip(1) {
            buf.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            buf.push(0);
        }
    }
}

/// Parse the symbol table from the binary data starting at `offset`.
///
/// Returns the table and the byte offset immediately after it (before
/// padding).
pub fn parse_symbol_table(data: &[u8], offset: usize) -> Result<(SymbolTable, usize), FstError> {
    if offset + 2 > data.len() {
        return Err(FstError::TooShort {
            expected: offset + 2,
            actual: data.len(),
        });
    }

    let symbol_count = u16::from_le_bytes([data[offset], data[offset + 1]]);
    if symbol_count == 0 {
        return Err(FstError::InvalidSymbolTable(
            "missing epsilon symbol".to_string(),
        ));
    }
    let mut pos = offset + 2;

    let mut symbol_chars = Vec::with_capacity(symbol_count as usize);
    let mut char_to_symbol = HashMap::with_capacity(symbol_count as usize);

    for i in 0..symbol_count {
        let str_start = pos;
        while pos < data.len() && data[pos] != 0 {
            pos += 1;
        }
        if pos >= data.len() {
            return Err(FstError::InvalidSymbolTable(
                "unterminated symbol string".to_string(),
            ));
        }

        let symbol_bytes = &data[str_start..pos];
        pos += 1; // skip null terminator

        if i == 0 {
            if !symbol_bytes.is_empty() {
                return Err(FstError::InvalidSymbolTable(
                    "symbol 0 must be epsilon".to_string(),
                ));
            }
            symbol_chars.push('\0');
            continue;
        }

        let symbol_str = std::str::from_utf8(symbol_bytes).map_err(|_| {
            FstError::InvalidSymbolTable(format!("invalid UTF-8 in symbol {i}"))
        })?;
        let mut chars = symbol_str.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return Err(FstError::InvalidSymbolTable(format!(
                "symbol {i} is not a single character"
            )));
        };
        if let Some(&prev) = symbol_chars.last() {
            if i > 1 && prev >= ch {
                return Err(FstError::InvalidSymbolTable(format!(
                    "symbol {i} is out of order"
                )));
            }
        }

        symbol_chars.push(ch);
        char_to_symbol.insert(ch, i);
    }

    Ok((
        SymbolTable {
            symbol_chars,
            char_to_symbol,
        },
        pos,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a raw symbol table: count(u16) + null-terminated strings.
    fn make_symbol_table(symbols: &[&str]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(symbols.len() as u16).to_le_bytes());
        for sym in symbols {
            buf.extend_from_slice(sym.as_bytes());
            buf.push(0);
        }
        buf
    }

    #[test]
    fn parse_simple_symbol_table() {
        let data = make_symbol_table(&["", "a", "b"]);
        let (table, end_pos) = parse_symbol_table(&data, 0).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.alphabet_size(), 2);
        assert_eq!(table.symbol_of('a'), Some(1));
        assert_eq!(table.symbol_of('b'), Some(2));
        assert_eq!(table.symbol_of('z'), None);
        assert_eq!(table.char_of(2), Some('b'));
        assert_eq!(table.char_of(0), None);
        assert_eq!(end_pos, data.len());
    }

    #[test]
    fn parse_with_offset() {
        let mut data = vec![0u8; 16]; // header placeholder
        data.extend_from_slice(&make_symbol_table(&["", "x", "y"]));

        let (table, end_pos) = parse_symbol_table(&data, 16).unwrap();
        assert_eq!(table.alphabet_size(), 2);
        assert_eq!(end_pos, data.len());
    }

    #[test]
    fn parse_multibyte_utf8_symbols() {
        let data = make_symbol_table(&["", "\u{00e4}", "\u{00f6}"]); // ä, ö
        let (table, _) = parse_symbol_table(&data, 0).unwrap();
        assert_eq!(table.symbol_of('\u{00e4}'), Some(1));
        assert_eq!(table.char_of(2), Some('\u{00f6}'));
    }

    #[test]
    fn write_then_parse() {
        let table = SymbolTable::from_alphabet("tacrn".chars()).unwrap();
        let mut buf = Vec::new();
        table.write(&mut buf);
        let (parsed, end) = parse_symbol_table(&buf, 0).unwrap();
        assert_eq!(end, buf.len());
        assert_eq!(parsed.alphabet_size(), 5);
        // Sorted: a c n r t
        assert_eq!(parsed.symbol_of('a'), Some(1));
        assert_eq!(parsed.symbol_of('t'), Some(5));
    }

    #[test]
    fn from_alphabet_dedups() {
        let table = SymbolTable::from_alphabet("abba".chars()).unwrap();
        assert_eq!(table.alphabet_size(), 2);
    }

    #[test]
    fn reject_multi_char_symbol() {
        let data = make_symbol_table(&["", "ab"]);
        let err = parse_symbol_table(&data, 0).unwrap_err();
        assert!(matches!(err, FstError::InvalidSymbolTable(_)));
    }

    #[test]
    fn reject_unsorted_symbols() {
        let data = make_symbol_table(&["", "b", "a"]);
        assert!(parse_symbol_table(&data, 0).is_err());
    }

    #[test]
    fn reject_non_epsilon_first_symbol() {
        let data = make_symbol_table(&["a"]);
        assert!(parse_symbol_table(&data, 0).is_err());
    }

    #[test]
    fn reject_truncated_data() {
        let data = [0u8; 1]; // too short for count
        assert!(parse_symbol_table(&data, 0).is_err());
    }

    #[test]
    fn reject_unterminated_string() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u16.to_le_bytes());
        data.push(0); // epsilon
        data.extend_from_slice(b"abc"); // no null terminator
        assert!(parse_symbol_table(&data, 0).is_err());
    }
}
