use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use crate::{parsing::ParseError, typing::TypeCheckError};

/// Any error a top-level command can produce. The context is left untouched
/// whenever one of these surfaces.
pub enum ReplError<'i> {
    Parse(ParseError<'i>),
    Type(TypeCheckError),
}

impl<'i> From<ParseError<'i>> for ReplError<'i> {
    fn from(value: ParseError<'i>) -> Self {
        Self::Parse(value)
    }
}

impl From<TypeCheckError> for ReplError<'_> {
    fn from(value: TypeCheckError) -> Self {
        Self::Type(value)
    }
}

impl<'i> ReplError<'i> {
    pub fn into_record(self, source: &'i str, origin: &'i str) -> Vec<Group<'i>> {
        let group = match self {
            Self::Parse(parse_error) => parse_error_group(parse_error, source, origin),
            Self::Type(type_error) => Group::with_title(
                Level::ERROR.primary_title(format!("type error: {type_error}")),
            ),
        };
        vec![group]
    }

    pub fn render_styled(self, source: &'i str, origin: &'i str) -> String {
        Renderer::styled().render(&self.into_record(source, origin))
    }
}

fn parse_error_group<'i>(error: ParseError<'i>, source: &'i str, origin: &'i str) -> Group<'i> {
    let (title, span, label): (&str, Option<Range<usize>>, String) = match error {
        ParseError::InvalidToken { location } => (
            "lexical error",
            Some(location..location),
            "unrecognized character".to_string(),
        ),
        ParseError::UnrecognizedEof { location, expected } => (
            "syntax error",
            Some(location..location),
            format!("unexpected end of input, expected {}", one_of(&expected)),
        ),
        ParseError::UnrecognizedToken {
            token: (start, token, end),
            expected,
        } => (
            "syntax error",
            Some(start..end),
            format!("unexpected `{token}`, expected {}", one_of(&expected)),
        ),
        ParseError::ExtraToken {
            token: (start, token, end),
        } => (
            "syntax error",
            Some(start..end),
            format!("extra token `{token}` after the end of the command"),
        ),
        ParseError::User { error } => ("syntax error", None, error),
    };

    let group = Group::with_title(Level::ERROR.primary_title(title));
    match span {
        Some(span) => group.element(
            Snippet::source(source)
                .path(origin)
                .annotation(AnnotationKind::Primary.span(span).label(label)),
        ),
        None => group.element(Level::ERROR.message(label)),
    }
}

fn one_of(expected: &[String]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [single] => single.clone(),
        _ => format!("one of {}", expected.join(", ")),
    }
}
