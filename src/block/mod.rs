use std::fmt;

use itertools::Itertools;
use log::{debug, trace, warn};

use crate::error::BlockError;
use crate::font::FontTable;
use crate::opcode::{literal, Arity, OpcodeInfo, Syntax, WordClass};
use crate::util;

pub mod parse;

use parse::Unit;

/// One decoded unit of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(char),
    FormFeed,
    Command(&'static OpcodeInfo, Vec<u16>),
    // an opcode-range word with no known meaning, kept only for display
    Unknown(u16),
}

impl Token {
    fn command(info: &'static OpcodeInfo, args: Vec<u16>) -> Self {
        if info.opcode == literal::FORM_FEED {
            Token::FormFeed
        } else {
            Token::Command(info, args)
        }
    }

    // appends the token's words, None if a literal isn't in the font
    fn encode_into(&self, buf: &mut Vec<u8>, font: &FontTable) -> Option<()> {
        match self {
            Token::Literal('\n') => util::push_word(buf, literal::LINE_FEED),
            Token::Literal(' ') => util::push_word(buf, literal::SPACE),
            Token::Literal(ch) => util::push_word(buf, font.encode_glyph(*ch)?),
            Token::FormFeed => util::push_word(buf, literal::FORM_FEED),
            Token::Command(info, args) => {
                util::push_word(buf, info.opcode);
                if info.arity == Arity::LenPrefixed {
                    // length was checked when the arguments were parsed or read
                    util::push_word(buf, args.len() as u16);
                }
                for &arg in args {
                    util::push_word(buf, arg);
                }
            }
            // not re-encodable, the markup rejects UNK
            Token::Unknown(_) => return None,
        }
        Some(())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Literal(ch) => write!(f, "{}", ch),
            Token::FormFeed => f.write_str("{FF}"),
            Token::Unknown(value) => writeln!(f, "{{UNK {}}}", value),
            Token::Command(info, args) => match (info.syntax, args.as_slice()) {
                (Syntax::Bare, _) => write!(f, "{{{}}}", info.name),
                (Syntax::Single, [n]) => write!(f, "{{{} {}}}", info.name, n),
                (Syntax::Assign, [id, val]) => write!(f, "{{{} {}:={}}}", info.name, id, val),
                (Syntax::Color, _) => write!(
                    f,
                    "{{{} {}}}",
                    info.name,
                    args.iter().map(|c| format!("{:03}", c)).join("-")
                ),
                // dash lists, and argument counts that don't fit the syntax
                _ => write!(f, "{{{} {}}}", info.name, args.iter().join("-")),
            },
        }
    }
}

/// Splits a block payload into tokens. Words that mean nothing (control codes
/// other than line feed, space and form feed) are dropped.
pub fn tokenize(bytes: &[u8], font: &FontTable) -> Result<Vec<Token>, BlockError> {
    let mut tokens = Vec::new();
    let mut input = bytes;
    while !input.is_empty() {
        let offset = bytes.len() - input.len();
        let (rest, (class, args)) = parse::word_token(input).map_err(|e| {
            let remaining = match e {
                nom::Err::Error(e) | nom::Err::Failure(e) => e.input.len(),
                nom::Err::Incomplete(_) => 0,
            };
            BlockError::Truncation {
                offset: bytes.len() - remaining,
            }
        })?;
        let token = match class {
            WordClass::LineFeed => Some(Token::Literal('\n')),
            WordClass::Space => Some(Token::Literal(' ')),
            WordClass::FormFeed => Some(Token::FormFeed),
            WordClass::Ignored => None,
            WordClass::Command(info) => Some(Token::command(info, args)),
            WordClass::UnknownCommand(value) => {
                warn!("unknown opcode {:#06x} at byte {}", value, offset);
                Some(Token::Unknown(value))
            }
            WordClass::Glyph(code) => match font.decode_glyph(code) {
                Some(ch) => Some(Token::Literal(ch)),
                None => return Err(BlockError::UnmappedCode { offset, code }),
            },
        };
        if let Some(token) = token {
            trace!("{:>6}: {:?}", offset, token);
            tokens.push(token);
        }
        input = rest;
    }
    Ok(tokens)
}

pub fn render(tokens: &[Token]) -> String {
    tokens.iter().join("")
}

/// Decodes one block payload (without its length prefix) into markup.
pub fn decode_block(bytes: &[u8], font: &FontTable) -> Result<String, BlockError> {
    let tokens = tokenize(bytes, font)?;
    debug!("decoded {} bytes into {} tokens", bytes.len(), tokens.len());
    Ok(render(&tokens))
}

fn command_token(body: &str, text: &str, offset: usize) -> Result<Token, BlockError> {
    let (_, (name, args)) = parse::command_body(body).map_err(|_| {
        let (line, column) = util::line_col(text, offset);
        BlockError::MalformedCommand {
            unit: format!("{{{}}}", body),
            line,
            column,
        }
    })?;
    let info = crate::opcode::lookup_name(name).ok_or_else(|| {
        let (line, column) = util::line_col(text, offset);
        BlockError::UnknownCommandName {
            name: name.to_string(),
            line,
            column,
        }
    })?;
    let args = args.unwrap_or("");
    let words = parse::command_args(info.syntax, args).ok_or_else(|| {
        let (line, column) = util::line_col(text, offset);
        BlockError::MalformedArgument {
            name: name.to_string(),
            args: args.to_string(),
            line,
            column,
        }
    })?;
    Ok(Token::command(info, words))
}

/// Encodes one block of markup. The result starts with the payload's byte
/// length as a big-endian word.
pub fn encode_block(text: &str, font: &FontTable) -> Result<Vec<u8>, BlockError> {
    // room for the length prefix
    let mut buf = vec![0u8; 2];
    let mut input = text;
    while !input.is_empty() {
        let offset = text.len() - input.len();
        let (rest, unit) = parse::unit(input).map_err(|_| {
            let (line, column) = util::line_col(text, offset);
            BlockError::UnterminatedCommand { line, column }
        })?;
        let token = match unit {
            Unit::Command(body) => command_token(body, text, offset)?,
            Unit::LineBreak => Token::Literal('\n'),
            Unit::Char(ch) => Token::Literal(ch),
        };
        if token.encode_into(&mut buf, font).is_none() {
            let (line, column) = util::line_col(text, offset);
            return Err(match token {
                Token::Literal(ch) => BlockError::UnresolvedCharacter { ch, line, column },
                _ => unreachable!("only literals can fail to encode"),
            });
        }
        input = rest;
    }

    let len = buf.len() - 2;
    if len > u16::MAX as usize {
        return Err(BlockError::BlockTooLarge { len });
    }
    util::patch_word(&mut buf, 0, len as u16);
    debug!("encoded {} chars into {} bytes", text.chars().count(), len);
    Ok(buf)
}
