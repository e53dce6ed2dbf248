use std::collections::HashMap;
use std::convert::TryFrom;

use crate::error::{Error, Result};

/// The ordered set of characters the game font can draw.
/// Index `i` is written to script data as the glyph code `0x100 + i`.
#[derive(Debug, Clone)]
pub struct FontTable {
    chars: Vec<char>,
    index: HashMap<char, u16>,
}

impl FontTable {
    pub const GLYPH_BASE: u16 = 0x100;
    // glyph codes run from GLYPH_BASE up to u16::MAX
    pub const MAX_LEN: usize = (u16::MAX - Self::GLYPH_BASE) as usize + 1;
    // written as their own words or as markup, never as glyphs
    pub const RESERVED: [char; 5] = [' ', '\n', '\r', '{', '}'];

    pub fn new<I: IntoIterator<Item = char>>(chars: I) -> Result<Self> {
        let chars = chars.into_iter().collect::<Vec<char>>();
        if chars.len() > Self::MAX_LEN {
            return Err(Error::FontTableTooLarge {
                len: chars.len(),
                max: Self::MAX_LEN,
            });
        }
        let mut index = HashMap::with_capacity(chars.len());
        for (pos, &ch) in chars.iter().enumerate() {
            if Self::RESERVED.contains(&ch) {
                return Err(Error::ReservedFontCharacter { ch, position: pos });
            }
            // can't overflow, length was checked above
            let code = pos as u16;
            if let Some(first) = index.insert(ch, code) {
                return Err(Error::MalformedFontTable {
                    ch,
                    first: first as usize,
                    second: pos,
                });
            }
        }
        Ok(FontTable { chars, index })
    }

    /// Builds a table from the contents of a font character file:
    /// every line concatenated, with the line breaks (LF, CR or CRLF) dropped.
    pub fn from_lines(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self::new(text.chars().filter(|c| !matches!(c, '\r' | '\n')))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    pub fn index_of(&self, ch: char) -> Option<u16> {
        self.index.get(&ch).copied()
    }

    // glyph code -> character
    pub fn decode_glyph(&self, code: u16) -> Option<char> {
        let index = code.checked_sub(Self::GLYPH_BASE)?;
        self.get(index as usize)
    }

    // character -> glyph code
    pub fn encode_glyph(&self, ch: char) -> Option<u16> {
        let index = self.index_of(ch)?;
        u16::try_from(index as u32 + Self::GLYPH_BASE as u32).ok()
    }
}
