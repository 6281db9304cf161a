use std::collections::HashSet;

use crate::reprs::ast::Term;

/// The free variables of `term`.
pub fn free_vars(term: &Term) -> HashSet<String> {
    let mut vars = HashSet::new();
    collect_free(term, &mut Vec::new(), &mut vars);
    vars
}

fn collect_free(term: &Term, bound: &mut Vec<String>, out: &mut HashSet<String>) {
    match term {
        Term::Var(name) => {
            if !bound.iter().any(|b| b == name) {
                out.insert(name.clone());
            }
        }
        Term::Abs { param, body, .. } => {
            bound.push(param.clone());
            collect_free(body, bound, out);
            bound.pop();
        }
        Term::Let {
            name,
            bound: bound_term,
            body,
        } => {
            // the bound expression is evaluated in the outer scope
            collect_free(bound_term, bound, out);
            bound.push(name.clone());
            collect_free(body, bound, out);
            bound.pop();
        }

        Term::True | Term::False | Term::Zero | Term::Str(_) | Term::Nil(_) => {}

        Term::Succ(t)
        | Term::Pred(t)
        | Term::IsZero(t)
        | Term::Fix(t)
        | Term::Proj(t, _)
        | Term::IsNil(_, t)
        | Term::Head(_, t)
        | Term::Tail(_, t) => collect_free(t, bound, out),

        Term::If(a, b, c) => {
            collect_free(a, bound, out);
            collect_free(b, bound, out);
            collect_free(c, bound, out);
        }
        Term::App(a, b) | Term::Concat(a, b) | Term::Cons(_, a, b) => {
            collect_free(a, bound, out);
            collect_free(b, bound, out);
        }
        Term::Record(fields) => {
            for (_, t) in fields {
                collect_free(t, bound, out);
            }
        }
    }
}

/// Appends primes to `base` until the candidate is absent from `avoid`.
pub fn fresh_name(base: &str, avoid: &HashSet<String>) -> String {
    let mut candidate = base.to_string();
    while avoid.contains(&candidate) {
        candidate.push('\'');
    }
    candidate
}

/// Substitutes `replacement` for every free occurrence of `var` in `term`,
/// renaming binders where the replacement's free variables would otherwise be
/// captured.
pub fn subst(var: &str, replacement: &Term, term: &Term) -> Term {
    match term {
        Term::Var(name) => {
            if name == var {
                replacement.clone()
            } else {
                term.clone()
            }
        }

        Term::Abs {
            param,
            param_ty,
            body,
        } => {
            if param == var {
                // the binder shadows the substituted variable
                term.clone()
            } else {
                let (param, body) = avoid_capture(param, body, var, replacement);
                Term::Abs {
                    param,
                    param_ty: param_ty.clone(),
                    body: Box::new(subst(var, replacement, &body)),
                }
            }
        }

        Term::Let { name, bound, body } => {
            let bound = Box::new(subst(var, replacement, bound));
            if name == var {
                Term::Let {
                    name: name.clone(),
                    bound,
                    body: body.clone(),
                }
            } else {
                let (name, body) = avoid_capture(name, body, var, replacement);
                Term::Let {
                    name,
                    bound,
                    body: Box::new(subst(var, replacement, &body)),
                }
            }
        }

        Term::True | Term::False | Term::Zero | Term::Str(_) | Term::Nil(_) => term.clone(),

        Term::If(a, b, c) => Term::If(
            Box::new(subst(var, replacement, a)),
            Box::new(subst(var, replacement, b)),
            Box::new(subst(var, replacement, c)),
        ),
        Term::Succ(t) => Term::Succ(Box::new(subst(var, replacement, t))),
        Term::Pred(t) => Term::Pred(Box::new(subst(var, replacement, t))),
        Term::IsZero(t) => Term::IsZero(Box::new(subst(var, replacement, t))),
        Term::Fix(t) => Term::Fix(Box::new(subst(var, replacement, t))),
        Term::Concat(a, b) => Term::Concat(
            Box::new(subst(var, replacement, a)),
            Box::new(subst(var, replacement, b)),
        ),
        Term::App(a, b) => Term::App(
            Box::new(subst(var, replacement, a)),
            Box::new(subst(var, replacement, b)),
        ),
        Term::Record(fields) => Term::Record(
            fields
                .iter()
                .map(|(label, t)| (label.clone(), subst(var, replacement, t)))
                .collect(),
        ),
        Term::Proj(t, label) => {
            Term::Proj(Box::new(subst(var, replacement, t)), label.clone())
        }
        Term::Cons(ty, a, b) => Term::Cons(
            ty.clone(),
            Box::new(subst(var, replacement, a)),
            Box::new(subst(var, replacement, b)),
        ),
        Term::IsNil(ty, t) => Term::IsNil(ty.clone(), Box::new(subst(var, replacement, t))),
        Term::Head(ty, t) => Term::Head(ty.clone(), Box::new(subst(var, replacement, t))),
        Term::Tail(ty, t) => Term::Tail(ty.clone(), Box::new(subst(var, replacement, t))),
    }
}

/// Renames `binder` (and its occurrences in `body`) to a fresh name when it
/// would capture a free variable of `replacement`. The fresh name must also
/// avoid the body's free variables and the substituted variable itself.
fn avoid_capture(binder: &str, body: &Term, var: &str, replacement: &Term) -> (String, Term) {
    let replacement_free = free_vars(replacement);
    if !replacement_free.contains(binder) {
        return (binder.to_string(), body.clone());
    }

    let mut avoid = replacement_free;
    avoid.extend(free_vars(body));
    avoid.insert(var.to_string());
    let fresh = fresh_name(binder, &avoid);
    let renamed = subst(binder, &Term::Var(fresh.clone()), body);
    (fresh, renamed)
}
