use std::convert::TryFrom;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{alpha1, anychar, char, digit1, multispace0, satisfy},
    combinator::{all_consuming, cut, map, map_res, opt, rest, value},
    error::ParseError,
    multi::{count, length_count, separated_list0},
    number::complete::be_u16,
    sequence::{delimited, pair, preceded, separated_pair, terminated, tuple},
    IResult,
};

use crate::opcode::{Arity, Syntax, WordClass};

// binary side

fn args<'a>(arity: Arity) -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], Vec<u16>> {
    move |input: &'a [u8]| match arity {
        Arity::None => Ok((input, Vec::new())),
        Arity::Fixed(n) => count(be_u16, n)(input),
        Arity::LenPrefixed => length_count(be_u16, be_u16)(input),
    }
}

/// Reads one word and, for commands, the argument words that belong to it.
pub fn word_token(input: &[u8]) -> IResult<&[u8], (WordClass, Vec<u16>)> {
    let (input, class) = map(be_u16, WordClass::of)(input)?;
    match class {
        // cut because the opcode has already been consumed
        WordClass::Command(info) => {
            let (input, args) = cut(args(info.arity))(input)?;
            Ok((input, (class, args)))
        }
        _ => Ok((input, (class, Vec::new()))),
    }
}

// text side

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit<'a> {
    // the text between the braces
    Command(&'a str),
    LineBreak,
    Char(char),
}

fn command_unit(input: &str) -> IResult<&str, Unit> {
    map(
        preceded(char('{'), cut(terminated(take_till(|c: char| c == '}'), char('}')))),
        Unit::Command,
    )(input)
}

fn line_break(input: &str) -> IResult<&str, Unit> {
    value(Unit::LineBreak, alt((tag("\r\n"), tag("\r"), tag("\n"))))(input)
}

/// Splits off the next piece of block text. Fails with `nom::Err::Failure`
/// when a `{` is never closed.
pub fn unit(input: &str) -> IResult<&str, Unit> {
    alt((command_unit, line_break, map(anychar, Unit::Char)))(input)
}

/// Splits the inside of a command unit into its name and argument string.
/// `CMD 1-2` gives `("CMD", Some("1-2"))`, `BR` gives `("BR", None)`.
pub fn command_body(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    all_consuming(pair(
        alpha1,
        opt(preceded(satisfy(char::is_whitespace), rest)),
    ))(input)
}

// from the recipes in the nom docs
fn ws<'a, F: 'a, O, E: ParseError<&'a str>>(
    inner: F,
) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

fn decimal(input: &str) -> IResult<&str, u16> {
    map_res(digit1, |out: &str| out.parse::<u16>())(input)
}

fn single(input: &str) -> IResult<&str, Vec<u16>> {
    map(ws(decimal), |n| vec![n])(input)
}

fn assign(input: &str) -> IResult<&str, Vec<u16>> {
    map(
        ws(separated_pair(decimal, ws(tag(":=")), decimal)),
        |(id, val)| vec![id, val],
    )(input)
}

fn color(input: &str) -> IResult<&str, Vec<u16>> {
    map(
        ws(tuple((
            decimal,
            preceded(char('-'), decimal),
            preceded(char('-'), decimal),
        ))),
        |(c, m, y)| vec![c, m, y],
    )(input)
}

fn dash_list(input: &str) -> IResult<&str, Vec<u16>> {
    map_res(
        ws(terminated(separated_list0(char('-'), decimal), opt(char('-')))),
        // the element count is itself written as a word
        |list: Vec<u16>| u16::try_from(list.len()).map(|_| list),
    )(input)
}

/// Parses a command's argument string into argument words.
/// Returns `None` if the string doesn't fit the command's syntax.
pub fn command_args(syntax: Syntax, args: &str) -> Option<Vec<u16>> {
    let parser: fn(&str) -> IResult<&str, Vec<u16>> = match syntax {
        Syntax::Bare => {
            return if args.trim().is_empty() {
                Some(Vec::new())
            } else {
                None
            };
        }
        Syntax::Single => single,
        Syntax::Assign => assign,
        Syntax::Color => color,
        Syntax::DashList => dash_list,
    };
    all_consuming(parser)(args).ok().map(|(_, words)| words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode;

    #[test]
    fn test_word_token_fixed() {
        let bytes = [0x00, 0x4a, 0x00, 0x0c, 0x00, 0xff, 0x00, 0x00, 0x01, 0x00];
        let (rest, (class, args)) = word_token(&bytes).unwrap();
        assert_eq!(class, WordClass::Command(opcode::lookup(0x004a).unwrap()));
        assert_eq!(args, vec![12, 255, 0]);
        assert_eq!(rest, &[0x01, 0x00]);
    }

    #[test]
    fn test_word_token_len_prefixed() {
        let bytes = [0x00, 0x4e, 0x00, 0x02, 0x00, 0x40, 0x00, 0x0a, 0x00, 0x45];
        let (rest, (_, args)) = word_token(&bytes).unwrap();
        // arguments in the opcode range stay arguments
        assert_eq!(args, vec![0x40, 0x0a]);
        assert_eq!(rest, &[0x00, 0x45]);
    }

    #[test]
    fn test_word_token_truncated_args() {
        let bytes = [0x00, 0x40, 0x00, 0x01];
        match word_token(&bytes) {
            Err(nom::Err::Failure(e)) => assert_eq!(e.input.len(), 0),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_word_token_unknown_takes_no_args() {
        let bytes = [0x00, 0x41, 0x01, 0x00];
        let (rest, (class, args)) = word_token(&bytes).unwrap();
        assert_eq!(class, WordClass::UnknownCommand(0x41));
        assert!(args.is_empty());
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn test_units() {
        assert_eq!(unit("{BR}x"), Ok(("x", Unit::Command("BR"))));
        assert_eq!(unit("\r\nx"), Ok(("x", Unit::LineBreak)));
        assert_eq!(unit("\rx"), Ok(("x", Unit::LineBreak)));
        assert_eq!(unit("\nx"), Ok(("x", Unit::LineBreak)));
        assert_eq!(unit("é{"), Ok(("{", Unit::Char('é'))));
        assert_eq!(unit("}"), Ok(("", Unit::Char('}'))));
        assert!(matches!(unit("{BR"), Err(nom::Err::Failure(_))));
    }

    #[test]
    fn test_command_body() {
        assert_eq!(command_body("BR"), Ok(("", ("BR", None))));
        assert_eq!(command_body("CMD 1-2"), Ok(("", ("CMD", Some("1-2")))));
        assert_eq!(command_body("CMD "), Ok(("", ("CMD", Some("")))));
        assert!(command_body("ITEM7").is_err());
        assert!(command_body("").is_err());
        assert!(command_body(" BR").is_err());
    }

    #[test]
    fn test_command_args() {
        assert_eq!(command_args(Syntax::Bare, ""), Some(vec![]));
        assert_eq!(command_args(Syntax::Bare, "3"), None);
        assert_eq!(command_args(Syntax::Single, "7"), Some(vec![7]));
        assert_eq!(command_args(Syntax::Single, " 7 "), Some(vec![7]));
        assert_eq!(command_args(Syntax::Single, "65536"), None);
        assert_eq!(command_args(Syntax::Single, "-1"), None);
        assert_eq!(command_args(Syntax::Single, ""), None);
        assert_eq!(command_args(Syntax::Assign, "12:=1"), Some(vec![12, 1]));
        assert_eq!(command_args(Syntax::Assign, "12 := 1"), Some(vec![12, 1]));
        assert_eq!(command_args(Syntax::Assign, "12=1"), None);
        assert_eq!(command_args(Syntax::Color, "012-255-000"), Some(vec![12, 255, 0]));
        assert_eq!(command_args(Syntax::Color, "1-2"), None);
        assert_eq!(command_args(Syntax::DashList, "1-2-3"), Some(vec![1, 2, 3]));
        assert_eq!(command_args(Syntax::DashList, "1-2-"), Some(vec![1, 2]));
        assert_eq!(command_args(Syntax::DashList, ""), Some(vec![]));
        assert_eq!(command_args(Syntax::DashList, "1--2"), None);
    }
}
