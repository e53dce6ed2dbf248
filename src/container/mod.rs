use log::{debug, info, warn};
use nom::{bytes::complete::take, number::complete::be_u16, IResult};
use regex::Regex;

use crate::block;
use crate::error::{Error, Result};
use crate::font::FontTable;
use crate::util;

const RULE: &str = "----------------------------------------";

lazy_static! {
    // eol is matched separately on both sides so the body never keeps a CR
    static ref BLOCK_RE: Regex = Regex::new(
        r"(?s)-{40} BLOCK (\d+) \((\d+)\) START(?:\r\n|\n|\r)(?P<body>.*?)(?:\r\n|\n|\r)-{40} BLOCK (\d+) END"
    )
    .unwrap();
}

/// The blocks of a script file, borrowed from the file contents.
/// `Container<[u8]>` holds block payloads, `Container<str>` holds block markup.
#[derive(Debug, PartialEq, Eq)]
pub struct Container<'a, B: ?Sized> {
    blocks: Vec<&'a B>,
}

impl<'a, B: ?Sized> Container<'a, B> {
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[&'a B] {
        &self.blocks
    }
}

fn truncated<'a>(
    bytes: &'a [u8],
    step: &'static str,
) -> impl FnOnce(nom::Err<nom::error::Error<&'a [u8]>>) -> Error {
    move |e| {
        let remaining = match e {
            nom::Err::Error(e) | nom::Err::Failure(e) => e.input.len(),
            nom::Err::Incomplete(_) => 0,
        };
        Error::Truncation {
            offset: bytes.len() - remaining,
            step,
        }
    }
}

fn block_payload(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, len) = be_u16(input)?;
    take(len)(input)
}

impl<'a> Container<'a, [u8]> {
    /// Splits a binary script file into its block payloads.
    pub fn parse_binary(bytes: &'a [u8]) -> Result<Self> {
        let (mut input, count) = be_u16(bytes).map_err(truncated(bytes, "block count"))?;
        let mut blocks = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (rest, payload) = block_payload(input).map_err(truncated(bytes, "block"))?;
            blocks.push(payload);
            input = rest;
        }
        if !input.is_empty() {
            warn!(
                "ignoring {} bytes after the last of {} blocks",
                input.len(),
                count
            );
        }
        Ok(Container { blocks })
    }

    /// Decodes every block and wraps each in its delimiter lines.
    pub fn decode(&self, font: &FontTable) -> Result<String> {
        let mut text = String::new();
        for (index, payload) in self.blocks.iter().enumerate() {
            let body = block::decode_block(payload, font).map_err(|e| e.in_block(index))?;
            debug!("block {}: {} bytes", index, payload.len());
            text.push_str(&format!(
                "{} BLOCK {} ({}) START\n",
                RULE,
                index,
                payload.len() / 2
            ));
            text.push_str(&body);
            text.push_str(&format!("\n{} BLOCK {} END\n", RULE, index));
        }
        info!("decoded {} blocks", self.len());
        Ok(text)
    }
}

impl<'a> Container<'a, str> {
    /// Finds every delimited block in a decoded script, in document order.
    /// The numbers in the delimiter lines are ignored.
    pub fn parse_text(text: &'a str) -> Self {
        let blocks = BLOCK_RE
            .captures_iter(text)
            .filter_map(|caps| caps.name("body"))
            .map(|body| body.as_str())
            .collect();
        Container { blocks }
    }

    /// Encodes every block, prefixed by the block count.
    pub fn encode(&self, font: &FontTable) -> Result<Vec<u8>> {
        if self.len() > u16::MAX as usize {
            return Err(Error::TooManyBlocks { count: self.len() });
        }
        let mut bytes = Vec::new();
        util::push_word(&mut bytes, self.len() as u16);
        for (index, body) in self.blocks.iter().enumerate() {
            let encoded = block::encode_block(body, font).map_err(|e| e.in_block(index))?;
            debug!("block {}: {} bytes", index, encoded.len() - 2);
            bytes.extend(encoded);
        }
        info!("encoded {} blocks", self.len());
        Ok(bytes)
    }
}

/// Converts a binary script file into its text form.
pub fn decode_container(bytes: &[u8], font: &FontTable) -> Result<String> {
    Container::parse_binary(bytes)?.decode(font)
}

/// Converts a text script back into a binary script file.
pub fn encode_container(text: &str, font: &FontTable) -> Result<Vec<u8>> {
    Container::parse_text(text).encode(font)
}
