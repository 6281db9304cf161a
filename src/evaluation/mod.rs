use crate::context::Context;
use crate::reprs::ast::Term;

pub use self::subst::{free_vars, fresh_name, subst};

mod subst;

/// `Zero` or `Succ` applied recursively to a numeric value.
pub fn is_numeric_value(term: &Term) -> bool {
    match term {
        Term::Zero => true,
        Term::Succ(t) => is_numeric_value(t),
        _ => false,
    }
}

/// A term in normal form under the reduction relation.
pub fn is_value(term: &Term) -> bool {
    match term {
        Term::True | Term::False | Term::Str(_) | Term::Abs { .. } | Term::Nil(_) => true,
        Term::Record(fields) => fields.iter().all(|(_, t)| is_value(t)),
        Term::Cons(_, head, tail) => is_value(head) && is_value(tail),
        t => is_numeric_value(t),
    }
}

/// One step of the call-by-value reduction relation. `None` means no rule
/// applies: the term is a normal form, not an error.
pub fn eval1(ctx: &Context, term: &Term) -> Option<Term> {
    match term {
        Term::If(cond, then, els) => match cond.as_ref() {
            Term::True => Some((**then).clone()),
            Term::False => Some((**els).clone()),
            _ => eval1(ctx, cond)
                .map(|cond| Term::If(Box::new(cond), then.clone(), els.clone())),
        },

        Term::Succ(t) => eval1(ctx, t).map(|t| Term::Succ(Box::new(t))),

        Term::Pred(t) => match t.as_ref() {
            Term::Zero => Some(Term::Zero),
            Term::Succ(inner) if is_numeric_value(inner) => Some((**inner).clone()),
            _ => eval1(ctx, t).map(|t| Term::Pred(Box::new(t))),
        },

        Term::IsZero(t) => match t.as_ref() {
            Term::Zero => Some(Term::True),
            Term::Succ(inner) if is_numeric_value(inner) => Some(Term::False),
            _ => eval1(ctx, t).map(|t| Term::IsZero(Box::new(t))),
        },

        // a variable steps to its context value, if the context holds one
        Term::Var(name) => ctx.value_of(name).cloned(),

        Term::App(func, arg) => match func.as_ref() {
            Term::Abs { param, body, .. } if is_value(arg) => Some(subst(param, arg, body)),
            _ if is_value(func) => {
                eval1(ctx, arg).map(|arg| Term::App(func.clone(), Box::new(arg)))
            }
            _ => eval1(ctx, func).map(|func| Term::App(Box::new(func), arg.clone())),
        },

        Term::Let { name, bound, body } => {
            if is_value(bound) {
                Some(subst(name, bound, body))
            } else {
                eval1(ctx, bound).map(|bound| Term::Let {
                    name: name.clone(),
                    bound: Box::new(bound),
                    body: body.clone(),
                })
            }
        }

        Term::Fix(t) => match t.as_ref() {
            Term::Abs { param, body, .. } => Some(subst(param, term, body)),
            _ => eval1(ctx, t).map(|t| Term::Fix(Box::new(t))),
        },

        Term::Concat(a, b) => match (a.as_ref(), b.as_ref()) {
            (Term::Str(s1), Term::Str(s2)) => Some(Term::Str(format!("{s1}{s2}"))),
            (Term::Str(_), _) => {
                eval1(ctx, b).map(|b| Term::Concat(a.clone(), Box::new(b)))
            }
            _ => eval1(ctx, a).map(|a| Term::Concat(Box::new(a), b.clone())),
        },

        Term::Record(fields) => {
            // fields evaluate left to right
            let next = fields.iter().position(|(_, t)| !is_value(t))?;
            let stepped = eval1(ctx, &fields[next].1)?;
            let mut fields = fields.clone();
            fields[next].1 = stepped;
            Some(Term::Record(fields))
        }

        Term::Proj(t, label) => {
            if is_value(t) {
                match t.as_ref() {
                    Term::Record(fields) => fields
                        .iter()
                        .find(|(l, _)| l == label)
                        .map(|(_, v)| v.clone()),
                    _ => None,
                }
            } else {
                eval1(ctx, t).map(|t| Term::Proj(Box::new(t), label.clone()))
            }
        }

        Term::Cons(ty, head, tail) => {
            if !is_value(head) {
                eval1(ctx, head)
                    .map(|head| Term::Cons(ty.clone(), Box::new(head), tail.clone()))
            } else if !is_value(tail) {
                eval1(ctx, tail)
                    .map(|tail| Term::Cons(ty.clone(), head.clone(), Box::new(tail)))
            } else {
                None
            }
        }

        Term::IsNil(ty, t) => match t.as_ref() {
            Term::Nil(_) => Some(Term::True),
            Term::Cons(..) if is_value(t) => Some(Term::False),
            _ => eval1(ctx, t).map(|t| Term::IsNil(ty.clone(), Box::new(t))),
        },

        Term::Head(ty, t) => match t.as_ref() {
            Term::Cons(_, head, _) if is_value(t) => Some((**head).clone()),
            // head of nil is stuck, not an error
            Term::Nil(_) => None,
            _ => eval1(ctx, t).map(|t| Term::Head(ty.clone(), Box::new(t))),
        },

        Term::Tail(ty, t) => match t.as_ref() {
            Term::Cons(_, _, tail) if is_value(t) => Some((**tail).clone()),
            Term::Nil(_) => None,
            _ => eval1(ctx, t).map(|t| Term::Tail(ty.clone(), Box::new(t))),
        },

        Term::True | Term::False | Term::Zero | Term::Str(_) | Term::Abs { .. } | Term::Nil(_) => {
            None
        }
    }
}

/// Iterates `eval1` to normal form. Unbounded: a divergent term loops.
pub fn eval(ctx: &Context, term: &Term) -> Term {
    eval_trace(ctx, term, |_| {})
}

/// Like [`eval`], reporting every intermediate term to `on_step`.
pub fn eval_trace(ctx: &Context, term: &Term, mut on_step: impl FnMut(&Term)) -> Term {
    let mut current = term.clone();
    while let Some(next) = eval1(ctx, &current) {
        on_step(&next);
        current = next;
    }
    current
}
