use lalrpop_util::lalrpop_mod;

use crate::reprs::ast::Command;

lalrpop_mod!(
    #[allow(clippy::pedantic)]
    syntax,
    "/parsing/syntax.rs"
);

pub type ParseError<'i> =
    lalrpop_util::ParseError<usize, lalrpop_util::lexer::Token<'i>, UserParserError>;

type UserParserError = String;

#[derive(Default)]
pub struct Parser {
    command_parser: syntax::CommandParser,
    toplevel_parser: syntax::ToplevelParser,
}

impl Parser {
    /// Parses a single top-level command (without its `;;` terminator).
    pub fn parse_command<'i>(&self, input: &'i str) -> Result<Command, ParseError<'i>> {
        self.command_parser.parse(input)
    }

    /// Parses a whole source file: a sequence of `;;`-terminated commands.
    pub fn parse_toplevel<'i>(&self, input: &'i str) -> Result<Vec<Command>, ParseError<'i>> {
        self.toplevel_parser.parse(input)
    }
}

/// Strips the surrounding quotes off a string literal and decodes its
/// escapes. The lexer guarantees quotes are present and escapes are paired.
pub(crate) fn unescape(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}
