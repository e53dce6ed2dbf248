//! Conversion between LA-MULANA's binary script files and an editable text
//! markup.
//!
//! A script file is a list of blocks. Each block is a run of big-endian
//! words: glyph codes (`0x100 + index` into the game's font table), a few
//! literal control codes, and commands with arguments. In text form, glyphs
//! become characters and commands become `{NAME args}` units, and blocks are
//! wrapped in delimiter lines.
//!
//! ```
//! use lamulana_script::{decode_container, encode_container, FontTable};
//!
//! let font = FontTable::new("ABC".chars()).unwrap();
//! let file = [0x00, 0x01, 0x00, 0x04, 0x01, 0x00, 0x00, 0x45];
//! let text = decode_container(&file, &font).unwrap();
//! assert!(text.contains("\nA{BR}\n"));
//! assert_eq!(encode_container(&text, &font).unwrap(), file);
//! ```

#[macro_use]
extern crate lazy_static;

pub mod block;
pub mod container;
pub mod error;
pub mod font;
pub mod opcode;

mod util;

pub use block::{decode_block, encode_block, Token};
pub use container::{decode_container, encode_container, Container};
pub use error::{BlockError, Error, Result};
pub use font::FontTable;
