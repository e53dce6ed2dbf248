use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures while converting a whole file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The font table lists the same character twice.
    #[error("font table contains duplicate character {ch:?} at positions {first} and {second}")]
    MalformedFontTable {
        ch: char,
        first: usize,
        second: usize,
    },
    /// The font table lists a character the markup already uses for itself.
    #[error("font table character {ch:?} at position {position} is reserved by the markup")]
    ReservedFontCharacter { ch: char, position: usize },
    /// The font table has more entries than glyph codes can address.
    #[error("font table has {len} characters, at most {max} are addressable")]
    FontTableTooLarge { len: usize, max: usize },
    /// The container header or a block's length prefix runs past the end of the file.
    #[error("file truncated at byte {offset} while reading {step}")]
    Truncation { offset: usize, step: &'static str },
    /// More blocks than the container's count word can hold.
    #[error("{count} blocks found, at most 65535 can be stored")]
    TooManyBlocks { count: usize },
    /// A single block failed to convert.
    #[error("in block {index}")]
    Block {
        index: usize,
        #[source]
        source: BlockError,
    },
}

/// Failures inside a single block. Binary positions are byte offsets into the
/// block payload, text positions are 1-based within the block body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("block data truncated at byte {offset}")]
    Truncation { offset: usize },
    #[error("character code {code:#06x} at byte {offset} is past the end of the font table")]
    UnmappedCode { offset: usize, code: u16 },
    #[error("character {ch:?} at line {line}, column {column} is not in the font table")]
    UnresolvedCharacter {
        ch: char,
        line: usize,
        column: usize,
    },
    #[error("bad argument {args:?} for {name} at line {line}, column {column}")]
    MalformedArgument {
        name: String,
        args: String,
        line: usize,
        column: usize,
    },
    #[error("malformed command {unit:?} at line {line}, column {column}")]
    MalformedCommand {
        unit: String,
        line: usize,
        column: usize,
    },
    #[error("command starting at line {line}, column {column} is never closed")]
    UnterminatedCommand { line: usize, column: usize },
    #[error("unknown command {name:?} at line {line}, column {column}")]
    UnknownCommandName {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("encoded block is {len} bytes, at most 65535 can be stored")]
    BlockTooLarge { len: usize },
}

impl BlockError {
    pub fn in_block(self, index: usize) -> Error {
        Error::Block {
            index,
            source: self,
        }
    }
}
