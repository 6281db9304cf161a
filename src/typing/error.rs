use std::fmt;

use crate::reprs::ast::Ty;

/// A typing failure with a human-readable reason. Unbound names are reported
/// here too: variable resolution is routed through the type judgment.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum TypeCheckError {
    UnboundVariable(String),
    UnboundTypeName(String),

    GuardNotBool(Ty),
    ArmsDiffer(Ty, Ty),
    NotANumber { op: &'static str, found: Ty },

    ArrowExpected(Ty),
    ParamMismatch { expected: Ty, found: Ty },
    FixIncompatible(Ty, Ty),

    ConcatNotString { side: ConcatSide, found: Ty },

    RecordExpected(Ty),
    LabelNotFound(String, Ty),

    ConsHeadMismatch { annotated: Ty, found: Ty },
    ConsTailMismatch { annotated: Ty, found: Ty },
    ListExpected { op: &'static str, annotated: Ty, found: Ty },
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ConcatSide {
    First,
    Second,
    Neither,
}

impl fmt::Display for TypeCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundVariable(name) => {
                write!(f, "no binding type for variable {name}")
            }
            Self::UnboundTypeName(name) => {
                write!(f, "no binding for type name {name}")
            }
            Self::GuardNotBool(found) => {
                write!(f, "guard of conditional not a boolean (found {found})")
            }
            Self::ArmsDiffer(then, els) => {
                write!(
                    f,
                    "arms of conditional have different types ({then} and {els})"
                )
            }
            Self::NotANumber { op, found } => {
                write!(f, "argument of {op} is not a number (found {found})")
            }
            Self::ArrowExpected(found) => {
                write!(f, "arrow type expected (found {found})")
            }
            Self::ParamMismatch { expected, found } => {
                write!(
                    f,
                    "parameter type mismatch (expected {expected}, found {found})"
                )
            }
            Self::FixIncompatible(dom, cod) => {
                write!(
                    f,
                    "result of body not compatible with domain ({dom} vs {cod})"
                )
            }
            Self::ConcatNotString { side, found } => match side {
                ConcatSide::First => {
                    write!(f, "first argument of concat is not a string (found {found})")
                }
                ConcatSide::Second => {
                    write!(
                        f,
                        "second argument of concat is not a string (found {found})"
                    )
                }
                ConcatSide::Neither => {
                    write!(f, "neither argument of concat is a string")
                }
            },
            Self::RecordExpected(found) => {
                write!(f, "expected record type (found {found})")
            }
            Self::LabelNotFound(label, ty) => {
                write!(f, "label {label} not found in type {ty}")
            }
            Self::ConsHeadMismatch { annotated, found } => {
                write!(
                    f,
                    "element type of cons does not match annotation (expected {annotated}, found {found})"
                )
            }
            Self::ConsTailMismatch { annotated, found } => {
                write!(
                    f,
                    "tail of cons is not a list of {annotated} (found {found})"
                )
            }
            Self::ListExpected {
                op,
                annotated,
                found,
            } => {
                write!(
                    f,
                    "argument of {op} is not a list of {annotated} (found {found})"
                )
            }
        }
    }
}
