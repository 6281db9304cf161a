use crate::context::{Binding, Context};
use crate::evaluation;
use crate::parsing::Parser;
use crate::reprs::ast::{Command, Term};
use crate::typing::{type_of, TypeCheckError};

/// An interactive session: the accumulated context plus command dispatch.
/// Does no I/O of its own; every command produces the output line(s) to
/// print. The context is only reassigned once a command has fully
/// succeeded, so a failing command leaves it untouched.
#[derive(Default)]
pub struct Session {
    parser: Parser,
    ctx: Context,
    trace: bool,
}

impl Session {
    pub fn new(trace: bool) -> Self {
        Self {
            trace,
            ..Self::default()
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn trace(&self) -> bool {
        self.trace
    }

    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    /// Parses and runs one command, rendering any error against `source`.
    pub fn run_src(&mut self, source: &str, origin: &str) -> Result<String, String> {
        let command = self
            .parser
            .parse_command(source)
            .map_err(|e| crate::error::ReplError::from(e).render_styled(source, origin))?;
        self.run_command(command)
            .map_err(|e| crate::error::ReplError::from(e).render_styled(source, origin))
    }

    /// Typechecks, evaluates and dispatches one command. Every command is
    /// typechecked before any evaluation happens.
    pub fn run_command(&mut self, command: Command) -> Result<String, TypeCheckError> {
        match command {
            Command::Eval(term) => {
                let ty = type_of(&self.ctx, &term)?;
                let (value, mut out) = self.eval_collect(&term);
                out.push_str(&format!("- : {ty} = {value}"));
                Ok(out)
            }
            Command::EvalTy(ty) => {
                let ty = self.ctx.resolve_ty(&ty)?;
                Ok(format!("- : {ty}"))
            }
            Command::BindTerm(name, term) => {
                let ty = type_of(&self.ctx, &term)?;
                let (value, mut out) = self.eval_collect(&term);
                out.push_str(&format!("val {name} : {ty} = {value}"));
                self.ctx = self.ctx.with_binding(name, Binding::TermAbb(value, ty));
                Ok(out)
            }
            Command::BindTy(name, ty) => {
                let ty = self.ctx.resolve_ty(&ty)?;
                let out = format!("type {name} = {ty}");
                self.ctx = self.ctx.with_binding(name, Binding::TyAbb(ty));
                Ok(out)
            }
        }
    }

    fn eval_collect(&self, term: &Term) -> (Term, String) {
        let mut out = String::new();
        let value = if self.trace {
            evaluation::eval_trace(&self.ctx, term, |t| {
                out.push_str(&format!("  -> {t}\n"));
            })
        } else {
            evaluation::eval(&self.ctx, term)
        };
        (value, out)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[track_caller]
    fn run(session: &mut Session, src: &str) -> String {
        match session.run_src(src, "<test>") {
            Ok(out) => out,
            Err(e) => panic!("command failure:\n'{}'\n{}", src, e),
        }
    }

    #[test]
    fn evaluation_output_format() {
        let mut session = Session::default();
        assert_eq!(run(&mut session, "succ (succ 0)"), "- : Nat = 2");
        assert_eq!(run(&mut session, r#"concat "ab" "cd""#), r#"- : String = "abcd""#);
    }

    #[test]
    fn bindings_carry_over() {
        let mut session = Session::default();
        assert_eq!(run(&mut session, "x = true"), "val x : Bool = true");
        assert_eq!(run(&mut session, "if x then 1 else 0"), "- : Nat = 1");
    }

    #[test]
    fn type_abbreviations_resolve() {
        let mut session = Session::default();
        assert_eq!(run(&mut session, "NN = Nat -> Nat"), "type NN = Nat -> Nat");
        assert_eq!(run(&mut session, "NN"), "- : Nat -> Nat");
        assert_eq!(
            run(&mut session, "(lambda f:NN. f 3) (lambda x:Nat. succ x)"),
            "- : Nat = 4"
        );
    }

    #[test]
    fn failed_command_leaves_context_unchanged() {
        let mut session = Session::default();
        run(&mut session, "x = 2");
        assert!(session.run_src("x = true true", "<test>").is_err());
        assert_eq!(run(&mut session, "x"), "- : Nat = 2");
    }

    #[test]
    fn trace_lists_intermediate_terms() {
        let mut session = Session::new(true);
        let out = run(&mut session, "pred (pred 2)");
        assert_eq!(out, "  -> pred 1\n  -> 0\n- : Nat = 0");
    }
}
