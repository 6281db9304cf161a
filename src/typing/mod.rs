use crate::context::{Binding, Context};
use crate::reprs::ast::{Term, Ty};

pub use self::error::{ConcatSide, TypeCheckError};

mod error;

/// Computes the type of `term` under `ctx`, syntax-directed: every subterm's
/// type is derivable top-down, with no inference or unification. All
/// user-written annotations are resolved through the context on the way in,
/// so every type this returns (or compares internally) is free of
/// abbreviation names and plain structural equality suffices.
pub fn type_of(ctx: &Context, term: &Term) -> Result<Ty, TypeCheckError> {
    match term {
        Term::True | Term::False => Ok(Ty::Bool),

        Term::If(cond, then, els) => {
            match type_of(ctx, cond)? {
                Ty::Bool => {}
                found => return Err(TypeCheckError::GuardNotBool(found)),
            }
            let then_ty = type_of(ctx, then)?;
            let else_ty = type_of(ctx, els)?;
            if then_ty == else_ty {
                Ok(then_ty)
            } else {
                Err(TypeCheckError::ArmsDiffer(then_ty, else_ty))
            }
        }

        Term::Zero => Ok(Ty::Nat),
        Term::Succ(t) => expect_nat(ctx, t, "succ").map(|()| Ty::Nat),
        Term::Pred(t) => expect_nat(ctx, t, "pred").map(|()| Ty::Nat),
        Term::IsZero(t) => expect_nat(ctx, t, "iszero").map(|()| Ty::Bool),

        Term::Str(_) => Ok(Ty::Str),
        Term::Concat(a, b) => {
            let a_ty = type_of(ctx, a)?;
            let b_ty = type_of(ctx, b)?;
            match (a_ty, b_ty) {
                (Ty::Str, Ty::Str) => Ok(Ty::Str),
                (Ty::Str, found) => Err(TypeCheckError::ConcatNotString {
                    side: ConcatSide::Second,
                    found,
                }),
                (found, Ty::Str) => Err(TypeCheckError::ConcatNotString {
                    side: ConcatSide::First,
                    found,
                }),
                (found, _) => Err(TypeCheckError::ConcatNotString {
                    side: ConcatSide::Neither,
                    found,
                }),
            }
        }

        Term::Var(name) => ctx.ty_of(name).cloned(),

        Term::Abs {
            param,
            param_ty,
            body,
        } => {
            let param_ty = ctx.resolve_ty(param_ty)?;
            let inner = ctx.with_binding(param.clone(), Binding::Var(param_ty.clone()));
            let body_ty = type_of(&inner, body)?;
            Ok(Ty::Arrow(Box::new(param_ty), Box::new(body_ty)))
        }

        Term::App(func, arg) => {
            let func_ty = type_of(ctx, func)?;
            let arg_ty = type_of(ctx, arg)?;
            match func_ty {
                Ty::Arrow(dom, cod) => {
                    if *dom == arg_ty {
                        Ok(*cod)
                    } else {
                        Err(TypeCheckError::ParamMismatch {
                            expected: *dom,
                            found: arg_ty,
                        })
                    }
                }
                found => Err(TypeCheckError::ArrowExpected(found)),
            }
        }

        Term::Let { name, bound, body } => {
            let bound_ty = type_of(ctx, bound)?;
            let inner = ctx.with_binding(name.clone(), Binding::Var(bound_ty));
            type_of(&inner, body)
        }

        Term::Fix(t) => match type_of(ctx, t)? {
            Ty::Arrow(dom, cod) => {
                if dom == cod {
                    Ok(*dom)
                } else {
                    Err(TypeCheckError::FixIncompatible(*dom, *cod))
                }
            }
            found => Err(TypeCheckError::ArrowExpected(found)),
        },

        Term::Record(fields) => {
            let field_tys = fields
                .iter()
                .map(|(label, t)| Ok((label.clone(), type_of(ctx, t)?)))
                .collect::<Result<_, TypeCheckError>>()?;
            Ok(Ty::Record(field_tys))
        }

        Term::Proj(t, label) => match type_of(ctx, t)? {
            Ty::Record(fields) => fields
                .iter()
                .find(|(l, _)| l == label)
                .map(|(_, ty)| ty.clone())
                .ok_or_else(|| TypeCheckError::LabelNotFound(label.clone(), Ty::Record(fields))),
            found => Err(TypeCheckError::RecordExpected(found)),
        },

        Term::Nil(elem_ty) => {
            let elem_ty = ctx.resolve_ty(elem_ty)?;
            Ok(Ty::List(Box::new(elem_ty)))
        }

        Term::Cons(elem_ty, head, tail) => {
            let elem_ty = ctx.resolve_ty(elem_ty)?;
            let head_ty = type_of(ctx, head)?;
            if head_ty != elem_ty {
                return Err(TypeCheckError::ConsHeadMismatch {
                    annotated: elem_ty,
                    found: head_ty,
                });
            }
            let tail_ty = type_of(ctx, tail)?;
            if tail_ty != Ty::List(Box::new(elem_ty.clone())) {
                return Err(TypeCheckError::ConsTailMismatch {
                    annotated: elem_ty,
                    found: tail_ty,
                });
            }
            Ok(Ty::List(Box::new(elem_ty)))
        }

        Term::IsNil(elem_ty, t) => expect_list(ctx, elem_ty, t, "isnil").map(|_| Ty::Bool),
        Term::Head(elem_ty, t) => expect_list(ctx, elem_ty, t, "head"),
        Term::Tail(elem_ty, t) => {
            let elem_ty = expect_list(ctx, elem_ty, t, "tail")?;
            Ok(Ty::List(Box::new(elem_ty)))
        }
    }
}

fn expect_nat(ctx: &Context, t: &Term, op: &'static str) -> Result<(), TypeCheckError> {
    match type_of(ctx, t)? {
        Ty::Nat => Ok(()),
        found => Err(TypeCheckError::NotANumber { op, found }),
    }
}

/// Checks that `t` is a list of the annotated element type and returns the
/// resolved element type.
fn expect_list(
    ctx: &Context,
    elem_ty: &Ty,
    t: &Term,
    op: &'static str,
) -> Result<Ty, TypeCheckError> {
    let elem_ty = ctx.resolve_ty(elem_ty)?;
    let found = type_of(ctx, t)?;
    if found == Ty::List(Box::new(elem_ty.clone())) {
        Ok(elem_ty)
    } else {
        Err(TypeCheckError::ListExpected {
            op,
            annotated: elem_ty,
            found,
        })
    }
}
