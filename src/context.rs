use crate::reprs::ast::{Term, Ty};
use crate::typing::TypeCheckError;

/// What a name stands for in the context.
#[derive(Clone, Debug)]
pub enum Binding {
    /// A variable with a known type but no value (introduced while
    /// typechecking under a binder).
    Var(Ty),
    /// A top-level term binding: the evaluated value and its type.
    TermAbb(Term, Ty),
    /// A top-level type abbreviation.
    TyAbb(Ty),
}

/// The accumulated mapping from names to bindings. Extension returns a new
/// context; lookup finds the most recent binding for a shadowed name first.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Context {
    bindings: Vec<(String, Binding)>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(&self, name: impl Into<String>, binding: Binding) -> Self {
        let mut new = self.clone();
        new.bindings.push((name.into(), binding));
        new
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b)
    }

    /// Bindings in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(n, b)| (n.as_str(), b))
    }

    /// The type of a term variable.
    pub fn ty_of(&self, name: &str) -> Result<&Ty, TypeCheckError> {
        match self.lookup(name) {
            Some(Binding::Var(ty)) | Some(Binding::TermAbb(_, ty)) => Ok(ty),
            _ => Err(TypeCheckError::UnboundVariable(name.to_string())),
        }
    }

    /// The stored value of a top-level term binding, if any.
    pub fn value_of(&self, name: &str) -> Option<&Term> {
        match self.lookup(name) {
            Some(Binding::TermAbb(value, _)) => Some(value),
            _ => None,
        }
    }

    pub fn ty_abb(&self, name: &str) -> Result<&Ty, TypeCheckError> {
        match self.lookup(name) {
            Some(Binding::TyAbb(ty)) => Ok(ty),
            _ => Err(TypeCheckError::UnboundTypeName(name.to_string())),
        }
    }

    /// Expands every type abbreviation in `ty`. The typechecker resolves all
    /// user-written annotations through this, so the types it compares and
    /// produces never contain `Named`.
    pub fn resolve_ty(&self, ty: &Ty) -> Result<Ty, TypeCheckError> {
        Ok(match ty {
            Ty::Bool => Ty::Bool,
            Ty::Nat => Ty::Nat,
            Ty::Str => Ty::Str,
            Ty::Arrow(dom, cod) => Ty::Arrow(
                Box::new(self.resolve_ty(dom)?),
                Box::new(self.resolve_ty(cod)?),
            ),
            Ty::Record(fields) => Ty::Record(
                fields
                    .iter()
                    .map(|(label, ty)| Ok((label.clone(), self.resolve_ty(ty)?)))
                    .collect::<Result<_, TypeCheckError>>()?,
            ),
            Ty::List(elem) => Ty::List(Box::new(self.resolve_ty(elem)?)),
            // abbreviations are stored resolved, but an abbreviation bound
            // before a shadowing rebind may still mention names; recurse
            Ty::Named(name) => self.resolve_ty(&self.ty_abb(name)?.clone())?,
        })
    }
}
