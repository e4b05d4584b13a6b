//! Integer-backed index labels and their einsum alphabet
//!
//! Contraction layouts are built from [`Symbol`]s handed out by a
//! [`SymbolAllocator`]. Symbols are plain counters and never run out; only
//! rendering a symbol into an einsum string is limited by the 52-letter
//! alphabet `a-z` followed by `A-Z`.

use std::fmt;
use thiserror::Error;

/// Einsum alphabet, in allocation order
pub const EINSUM_SYMBOLS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of letters available to rendered equations
pub const ALPHABET_LEN: usize = 52;

/// A symbol index exceeded the einsum alphabet
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("index label {index} exceeds the {capacity}-letter einsum alphabet")]
pub struct SymbolExhausted {
    pub index: usize,
    pub capacity: usize,
}

/// A single index label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol(pub usize);

impl Symbol {
    pub fn index(self) -> usize {
        self.0
    }

    /// Letter used for this label in an einsum string
    ///
    /// ```
    /// use specconv_einsum::Symbol;
    ///
    /// assert_eq!(Symbol(0).to_char().unwrap(), 'a');
    /// assert_eq!(Symbol(26).to_char().unwrap(), 'A');
    /// assert!(Symbol(52).to_char().is_err());
    /// ```
    pub fn to_char(self) -> Result<char, SymbolExhausted> {
        match self.0 {
            i @ 0..=25 => Ok((b'a' + i as u8) as char),
            i @ 26..=51 => Ok((b'A' + (i - 26) as u8) as char),
            index => Err(SymbolExhausted {
                index,
                capacity: ALPHABET_LEN,
            }),
        }
    }

    /// Inverse of [`Symbol::to_char`]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='z' => Some(Symbol(c as usize - 'a' as usize)),
            'A'..='Z' => Some(Symbol(c as usize - 'A' as usize + 26)),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_char() {
            Ok(c) => write!(f, "{c}"),
            Err(_) => write!(f, "#{}", self.0),
        }
    }
}

/// Render a label sequence as one einsum operand term
pub fn render(symbols: &[Symbol]) -> Result<String, SymbolExhausted> {
    symbols.iter().map(|s| s.to_char()).collect()
}

/// Hands out fresh labels in increasing order
///
/// ```
/// use specconv_einsum::{Symbol, SymbolAllocator};
///
/// let mut alloc = SymbolAllocator::new();
/// let x = alloc.fresh_n(3);
/// assert_eq!(x, vec![Symbol(0), Symbol(1), Symbol(2)]);
/// assert_eq!(alloc.fresh(), Symbol(3));
/// assert_eq!(alloc.allocated(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymbolAllocator {
    next: usize,
}

impl SymbolAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> Symbol {
        let symbol = Symbol(self.next);
        self.next += 1;
        symbol
    }

    pub fn fresh_n(&mut self, n: usize) -> Vec<Symbol> {
        (0..n).map(|_| self.fresh()).collect()
    }

    /// Number of labels handed out so far
    pub fn allocated(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_matches_chars() {
        for (i, c) in EINSUM_SYMBOLS.chars().enumerate() {
            assert_eq!(Symbol(i).to_char().unwrap(), c);
            assert_eq!(Symbol::from_char(c), Some(Symbol(i)));
        }
        assert_eq!(EINSUM_SYMBOLS.len(), ALPHABET_LEN);
    }

    #[test]
    fn test_exhaustion() {
        let err = Symbol(60).to_char().unwrap_err();
        assert_eq!(err.index, 60);
        assert_eq!(err.capacity, ALPHABET_LEN);
        assert!(err.to_string().contains("52-letter"));
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&[Symbol(0), Symbol(27), Symbol(2)]).unwrap(), "aBc");
        assert!(render(&[Symbol(0), Symbol(99)]).is_err());
        assert_eq!(render(&[]).unwrap(), "");
    }

    #[test]
    fn test_display_past_alphabet() {
        assert_eq!(Symbol(1).to_string(), "b");
        assert_eq!(Symbol(70).to_string(), "#70");
    }

    #[test]
    fn test_from_char_rejects_non_letters() {
        assert_eq!(Symbol::from_char('1'), None);
        assert_eq!(Symbol::from_char('-'), None);
    }
}
