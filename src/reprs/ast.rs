use std::fmt;

use itertools::Itertools;

/// A type of the calculus. Structural equality is derived; record equality is
/// field-order sensitive. `Named` is a reference to a type abbreviation bound
/// in the context and is resolved away before the typechecker compares types.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Ty {
    Bool,
    Nat,
    Str,
    Arrow(Box<Ty>, Box<Ty>),
    Record(Vec<(String, Ty)>),
    List(Box<Ty>),
    Named(String),
}

/// A term of the calculus. Terms are immutable trees; reduction and
/// substitution always build new terms.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Term {
    True,
    False,
    If(Box<Term>, Box<Term>, Box<Term>),

    Zero,
    Succ(Box<Term>),
    Pred(Box<Term>),
    IsZero(Box<Term>),

    Str(String),
    Concat(Box<Term>, Box<Term>),

    Var(String),
    Abs {
        param: String,
        param_ty: Ty,
        body: Box<Term>,
    },
    App(Box<Term>, Box<Term>),
    Let {
        name: String,
        bound: Box<Term>,
        body: Box<Term>,
    },
    Fix(Box<Term>),

    // tuples are records with positional labels "1", "2", ...
    Record(Vec<(String, Term)>),
    Proj(Box<Term>, String),

    Nil(Ty),
    Cons(Ty, Box<Term>, Box<Term>),
    IsNil(Ty, Box<Term>),
    Head(Ty, Box<Term>),
    Tail(Ty, Box<Term>),
}

/// One top-level command, as produced by the parser.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Command {
    Eval(Term),
    EvalTy(Ty),
    BindTerm(String, Term),
    BindTy(String, Ty),
}

impl Term {
    /// The natural number this term denotes, if it is a numeric value.
    pub fn as_numeral(&self) -> Option<u64> {
        match self {
            Term::Zero => Some(0),
            Term::Succ(t) => t.as_numeral().map(|n| n + 1),
            _ => None,
        }
    }
}

/// Positional labels are printed back as tuple syntax.
fn is_tuple_labels<T>(fields: &[(String, T)]) -> bool {
    fields
        .iter()
        .enumerate()
        .all(|(i, (label, _))| *label == (i + 1).to_string())
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Bool => f.write_str("Bool"),
            Ty::Nat => f.write_str("Nat"),
            Ty::Str => f.write_str("String"),
            Ty::Arrow(dom, cod) => {
                // the arrow is right-associative
                if matches!(dom.as_ref(), Ty::Arrow(..)) {
                    write!(f, "({dom}) -> {cod}")
                } else {
                    write!(f, "{dom} -> {cod}")
                }
            }
            Ty::Record(fields) if is_tuple_labels(fields) => {
                write!(
                    f,
                    "{{{}}}",
                    fields.iter().format_with(", ", |(_, ty), g| g(ty))
                )
            }
            Ty::Record(fields) => {
                write!(
                    f,
                    "{{{}}}",
                    fields
                        .iter()
                        .format_with(", ", |(label, ty), g| g(&format_args!("{label}:{ty}")))
                )
            }
            Ty::List(elem) => write!(f, "List [{elem}]"),
            Ty::Named(name) => f.write_str(name),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_term(f)
    }
}

impl Term {
    fn fmt_term(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Abs {
                param,
                param_ty,
                body,
            } => {
                write!(f, "lambda {param}:{param_ty}. ")?;
                body.fmt_term(f)
            }
            Term::If(cond, then, els) => {
                f.write_str("if ")?;
                cond.fmt_term(f)?;
                f.write_str(" then ")?;
                then.fmt_term(f)?;
                f.write_str(" else ")?;
                els.fmt_term(f)
            }
            Term::Let { name, bound, body } => {
                write!(f, "let {name} = ")?;
                bound.fmt_term(f)?;
                f.write_str(" in ")?;
                body.fmt_term(f)
            }
            _ => self.fmt_app(f),
        }
    }

    fn fmt_app(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.as_numeral().is_some() {
            return self.fmt_atom(f);
        }
        match self {
            Term::App(func, arg) => {
                func.fmt_app(f)?;
                f.write_str(" ")?;
                arg.fmt_atom(f)
            }
            Term::Succ(t) => {
                f.write_str("succ ")?;
                t.fmt_atom(f)
            }
            Term::Pred(t) => {
                f.write_str("pred ")?;
                t.fmt_atom(f)
            }
            Term::IsZero(t) => {
                f.write_str("iszero ")?;
                t.fmt_atom(f)
            }
            Term::Fix(t) => {
                f.write_str("fix ")?;
                t.fmt_atom(f)
            }
            Term::Concat(a, b) => {
                f.write_str("concat ")?;
                a.fmt_atom(f)?;
                f.write_str(" ")?;
                b.fmt_atom(f)
            }
            Term::Cons(ty, head, tail) => {
                write!(f, "cons [{ty}] ")?;
                head.fmt_atom(f)?;
                f.write_str(" ")?;
                tail.fmt_atom(f)
            }
            Term::IsNil(ty, t) => {
                write!(f, "isnil [{ty}] ")?;
                t.fmt_atom(f)
            }
            Term::Head(ty, t) => {
                write!(f, "head [{ty}] ")?;
                t.fmt_atom(f)
            }
            Term::Tail(ty, t) => {
                write!(f, "tail [{ty}] ")?;
                t.fmt_atom(f)
            }
            Term::Proj(t, label) => {
                t.fmt_atom(f)?;
                write!(f, ".{label}")
            }
            Term::Nil(ty) => write!(f, "nil [{ty}]"),
            _ => self.fmt_atom(f),
        }
    }

    fn fmt_atom(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = self.as_numeral() {
            return write!(f, "{n}");
        }
        match self {
            Term::True => f.write_str("true"),
            Term::False => f.write_str("false"),
            Term::Var(name) => f.write_str(name),
            Term::Str(text) => write_escaped(f, text),
            Term::Record(fields) if is_tuple_labels(fields) => {
                write!(
                    f,
                    "{{{}}}",
                    fields.iter().format_with(", ", |(_, t), g| g(t))
                )
            }
            Term::Record(fields) => {
                write!(
                    f,
                    "{{{}}}",
                    fields
                        .iter()
                        .format_with(", ", |(label, t), g| g(&format_args!("{label}={t}")))
                )
            }
            _ => {
                f.write_str("(")?;
                self.fmt_term(f)?;
                f.write_str(")")
            }
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}
