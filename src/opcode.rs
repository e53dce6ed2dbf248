use std::collections::HashMap;

// words below the command range that render as themselves
pub mod literal {
    pub const LINE_FEED: u16 = 0x000a;
    pub const FORM_FEED: u16 = 0x000c;
    pub const SPACE: u16 = 0x0020;
}

pub mod command {
    pub const FLAG: u16 = 0x0040;
    pub const ITEM: u16 = 0x0042;
    pub const CLS: u16 = 0x0044;
    pub const BR: u16 = 0x0045;
    pub const POSE: u16 = 0x0046;
    pub const MANTRA: u16 = 0x0047;
    pub const COL: u16 = 0x004a;
    pub const CMD: u16 = 0x004e;
    pub const SCENE: u16 = 0x004f;

    // every word in this range is a command, known or not
    pub const RANGE_START: u16 = 0x0040;
    pub const RANGE_END: u16 = 0x0050;
}

/// How many argument words follow an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    Fixed(usize),
    // a count word, then that many words
    LenPrefixed,
}

/// How the arguments are spelled inside `{NAME ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Bare,
    Single,
    // id:=value
    Assign,
    // ccc-mmm-yyy
    Color,
    // a-b-c
    DashList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub opcode: u16,
    pub name: &'static str,
    pub arity: Arity,
    pub syntax: Syntax,
}

const fn info(opcode: u16, name: &'static str, arity: Arity, syntax: Syntax) -> OpcodeInfo {
    OpcodeInfo {
        opcode,
        name,
        arity,
        syntax,
    }
}

pub static OPCODES: [OpcodeInfo; 10] = [
    info(literal::FORM_FEED, "FF", Arity::None, Syntax::Bare),
    info(command::FLAG, "FLAG", Arity::Fixed(2), Syntax::Assign),
    info(command::ITEM, "ITEM", Arity::Fixed(1), Syntax::Single),
    info(command::CLS, "CLS", Arity::None, Syntax::Bare),
    info(command::BR, "BR", Arity::None, Syntax::Bare),
    info(command::POSE, "POSE", Arity::Fixed(1), Syntax::Single),
    info(command::MANTRA, "MANTRA", Arity::Fixed(1), Syntax::Single),
    info(command::COL, "COL", Arity::Fixed(3), Syntax::Color),
    info(command::CMD, "CMD", Arity::LenPrefixed, Syntax::DashList),
    info(command::SCENE, "SCENE", Arity::Fixed(1), Syntax::Single),
];

lazy_static! {
    static ref BY_NAME: HashMap<&'static str, &'static OpcodeInfo> =
        OPCODES.iter().map(|info| (info.name, info)).collect();
}

pub fn lookup(opcode: u16) -> Option<&'static OpcodeInfo> {
    OPCODES.iter().find(|info| info.opcode == opcode)
}

pub fn lookup_name(name: &str) -> Option<&'static OpcodeInfo> {
    BY_NAME.get(name).copied()
}

/// What a single word means, decided once before anything is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    LineFeed,
    Space,
    FormFeed,
    // control codes and gaps between ranges, dropped on decode
    Ignored,
    Command(&'static OpcodeInfo),
    UnknownCommand(u16),
    Glyph(u16),
}

impl WordClass {
    pub fn of(word: u16) -> Self {
        match word {
            literal::LINE_FEED => WordClass::LineFeed,
            literal::SPACE => WordClass::Space,
            literal::FORM_FEED => WordClass::FormFeed,
            command::RANGE_START..=command::RANGE_END => match lookup(word) {
                Some(info) => WordClass::Command(info),
                None => WordClass::UnknownCommand(word),
            },
            0x0100..=0xffff => WordClass::Glyph(word),
            _ => WordClass::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_matches_arity() {
        for info in OPCODES.iter() {
            let expected = match info.syntax {
                Syntax::Bare => Arity::None,
                Syntax::Single => Arity::Fixed(1),
                Syntax::Assign => Arity::Fixed(2),
                Syntax::Color => Arity::Fixed(3),
                Syntax::DashList => Arity::LenPrefixed,
            };
            assert_eq!(info.arity, expected, "{}", info.name);
        }
    }

    #[test]
    fn test_lookup_both_ways() {
        for info in OPCODES.iter() {
            assert_eq!(lookup(info.opcode), Some(info));
            assert_eq!(lookup_name(info.name), Some(info));
        }
        assert_eq!(lookup(0x0041), None);
        assert_eq!(lookup_name("UNK"), None);
        assert_eq!(lookup_name("br"), None);
    }

    #[test]
    fn test_classify() {
        assert_eq!(WordClass::of(0x000a), WordClass::LineFeed);
        assert_eq!(WordClass::of(0x0020), WordClass::Space);
        assert_eq!(WordClass::of(0x000c), WordClass::FormFeed);
        assert_eq!(WordClass::of(0x0000), WordClass::Ignored);
        assert_eq!(WordClass::of(0x0009), WordClass::Ignored);
        assert_eq!(WordClass::of(0x0021), WordClass::Ignored);
        assert_eq!(WordClass::of(0x003f), WordClass::Ignored);
        assert_eq!(WordClass::of(0x0051), WordClass::Ignored);
        assert_eq!(WordClass::of(0x00ff), WordClass::Ignored);
        assert_eq!(WordClass::of(0x0041), WordClass::UnknownCommand(0x0041));
        assert_eq!(WordClass::of(0x0050), WordClass::UnknownCommand(0x0050));
        assert_eq!(WordClass::of(0x0100), WordClass::Glyph(0x0100));
        assert_eq!(WordClass::of(0xffff), WordClass::Glyph(0xffff));
        match WordClass::of(0x004e) {
            WordClass::Command(info) => assert_eq!(info.name, "CMD"),
            other => panic!("wrong class: {:?}", other),
        }
    }

    #[test]
    fn test_form_feed_is_not_in_command_range() {
        // FF has a name for the encoder but decodes through the literal path
        let ff = lookup_name("FF").unwrap();
        assert_eq!(ff.opcode, literal::FORM_FEED);
        assert_eq!(WordClass::of(ff.opcode), WordClass::FormFeed);
    }
}
