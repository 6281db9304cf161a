use self::utils::*;

mod utils {
    use pretty_assertions::assert_eq;

    use stlc::{
        context::Context,
        evaluation,
        parsing::Parser,
        reprs::ast::{Command, Term, Ty},
        typing::{type_of, TypeCheckError},
    };

    #[track_caller]
    pub fn parse_term(src: &str) -> Term {
        match Parser::default().parse_command(src) {
            Ok(Command::Eval(term)) => term,
            Ok(o) => panic!("not a term:\n'{}'\n{:#?}", src, o),
            Err(e) => panic!("parse failure:\n'{}'\n{}", src, e),
        }
    }

    #[track_caller]
    pub fn type_check_success(src: &str) -> (Term, Ty) {
        let term = parse_term(src);
        match type_of(&Context::new(), &term) {
            Ok(ty) => (term, ty),
            Err(e) => panic!("type check failure:\n'{}'\n{}", src, e),
        }
    }

    #[track_caller]
    pub fn type_check_failure(src: &str) -> TypeCheckError {
        let term = parse_term(src);
        match type_of(&Context::new(), &term) {
            Ok(ty) => panic!("type check success:\n'{}'\n{}", src, ty),
            Err(e) => e,
        }
    }

    /// Evaluates a closed, well-typed term and checks the printed type and
    /// normal form.
    #[track_caller]
    pub fn assert_evaluates(src: &str, expected_ty: &str, expected_value: &str) {
        let (term, ty) = type_check_success(src);
        let value = evaluation::eval(&Context::new(), &term);
        assert_eq!(ty.to_string(), expected_ty, "type of '{}'", src);
        assert_eq!(value.to_string(), expected_value, "value of '{}'", src);
    }

    /// Steps a term to its normal form, checking that every intermediate
    /// term still has the original type.
    #[track_caller]
    pub fn assert_preserves_type(src: &str) {
        let ctx = Context::new();
        let (mut term, ty) = type_check_success(src);
        while let Some(next) = evaluation::eval1(&ctx, &term) {
            match type_of(&ctx, &next) {
                Ok(next_ty) => assert_eq!(next_ty, ty, "type changed stepping '{}'", src),
                Err(e) => panic!("step of '{}' no longer typechecks:\n{}", src, e),
            }
            term = next;
        }
    }
}

#[test]
fn booleans_and_conditionals() {
    assert_evaluates("true", "Bool", "true");
    assert_evaluates("if true then 3 else 4", "Nat", "3");
    assert_evaluates("if iszero 0 then false else true", "Bool", "false");
    assert_evaluates(
        "if iszero 2 then 0 else if true then 1 else 2",
        "Nat",
        "1",
    );
}

#[test]
fn naturals() {
    assert_evaluates("succ (succ 0)", "Nat", "2");
    assert_evaluates("pred 0", "Nat", "0");
    assert_evaluates("pred (succ (pred 5))", "Nat", "4");
    assert_evaluates("iszero (pred 1)", "Bool", "true");
}

#[test]
fn functions_and_let() {
    assert_evaluates("(lambda x:Nat. succ x) 5", "Nat", "6");
    assert_evaluates("lambda x:Nat. succ x", "Nat -> Nat", "lambda x:Nat. succ x");
    assert_evaluates("let double = lambda n:Nat. n in double 7", "Nat", "7");
    assert_evaluates(
        "(lambda f:Nat -> Nat. lambda x:Nat. f (f x)) (lambda n:Nat. succ n) 0",
        "Nat",
        "2",
    );
    assert_evaluates("let x = succ 0 in let x = succ x in x", "Nat", "2");
}

#[test]
fn strings() {
    assert_evaluates(r#""hello""#, "String", r#""hello""#);
    assert_evaluates(r#"concat "ab" "cd""#, "String", r#""abcd""#);
    assert_evaluates(
        r#"(lambda s:String. concat s s) "ab""#,
        "String",
        r#""abab""#,
    );
}

#[test]
fn records_and_tuples() {
    assert_evaluates("{x=1, y=true}", "{x:Nat, y:Bool}", "{x=1, y=true}");
    assert_evaluates("{x=pred 1, y=true}.x", "Nat", "0");
    assert_evaluates("{succ 0, false}", "{Nat, Bool}", "{1, false}");
    assert_evaluates("{1, 2, 3}.2", "Nat", "2");
    assert_evaluates(
        "(lambda p:{Nat, Nat}. p.1) {8, 9}",
        "Nat",
        "8",
    );
}

#[test]
fn lists() {
    assert_evaluates("nil [Nat]", "List [Nat]", "nil [Nat]");
    assert_evaluates(
        "cons [Nat] (succ 0) (nil [Nat])",
        "List [Nat]",
        "cons [Nat] 1 (nil [Nat])",
    );
    assert_evaluates("isnil [Nat] (nil [Nat])", "Bool", "true");
    assert_evaluates("isnil [Nat] (cons [Nat] 1 (nil [Nat]))", "Bool", "false");
    assert_evaluates("head [Nat] (cons [Nat] 1 (nil [Nat]))", "Nat", "1");
    assert_evaluates(
        "tail [Nat] (cons [Nat] 1 (cons [Nat] 2 (nil [Nat])))",
        "List [Nat]",
        "cons [Nat] 2 (nil [Nat])",
    );
}

#[test]
fn recursion_through_fix() {
    assert_evaluates(
        "letrec plus:Nat -> Nat -> Nat =
            lambda m:Nat. lambda n:Nat.
                if iszero m then n else succ (plus (pred m) n)
         in plus 2 3",
        "Nat",
        "5",
    );
    assert_evaluates(
        "letrec iseven:Nat -> Bool =
            lambda n:Nat.
                if iszero n then true
                else if iszero (pred n) then false
                else iseven (pred (pred n))
         in iseven 7",
        "Bool",
        "false",
    );
}

#[test]
fn typing_failures() {
    assert_eq!(
        type_check_failure("(lambda x:Bool. x) 5").to_string(),
        "parameter type mismatch (expected Bool, found Nat)"
    );
    assert_eq!(
        type_check_failure("x").to_string(),
        "no binding type for variable x"
    );
    assert_eq!(
        type_check_failure("if 0 then 1 else 2").to_string(),
        "guard of conditional not a boolean (found Nat)"
    );
    assert_eq!(
        type_check_failure("if true then 1 else false").to_string(),
        "arms of conditional have different types (Nat and Bool)"
    );
    assert_eq!(
        type_check_failure("succ true").to_string(),
        "argument of succ is not a number (found Bool)"
    );
    assert_eq!(
        type_check_failure("true false").to_string(),
        "arrow type expected (found Bool)"
    );
    assert_eq!(
        type_check_failure(r#"concat "a" 1"#).to_string(),
        "second argument of concat is not a string (found Nat)"
    );
    assert_eq!(
        type_check_failure("{x=1}.y").to_string(),
        "label y not found in type {x:Nat}"
    );
    assert_eq!(
        type_check_failure("cons [Bool] 1 (nil [Bool])").to_string(),
        "element type of cons does not match annotation (expected Bool, found Nat)"
    );
    assert_eq!(
        type_check_failure("fix (lambda x:Nat. true)").to_string(),
        "result of body not compatible with domain (Nat vs Bool)"
    );
}

#[test]
fn stuck_terms_are_not_errors() {
    // these typecheck, reduce as far as they can, and then simply stop
    let (term, _) = type_check_success("head [Nat] (nil [Nat])");
    let ctx = stlc::context::Context::new();
    assert_eq!(stlc::evaluation::eval(&ctx, &term), term);

    let (term, _) = type_check_success("tail [Nat] (nil [Nat])");
    assert_eq!(stlc::evaluation::eval(&ctx, &term), term);
}

#[test]
fn evaluation_preserves_types() {
    assert_preserves_type("(lambda x:Nat. succ x) (pred 3)");
    assert_preserves_type("if iszero (pred 1) then {1, true} else {2, false}");
    assert_preserves_type("let f = lambda b:Bool. if b then 0 else 1 in f false");
    assert_preserves_type(
        "letrec len:List [Nat] -> Nat =
            lambda xs:List [Nat].
                if isnil [Nat] xs then 0 else succ (len (tail [Nat] xs))
         in len (cons [Nat] 4 (cons [Nat] 5 (nil [Nat])))",
    );
}

#[test]
fn capture_avoiding_substitution() {
    // the inner binder must be renamed, not capture the free `y`
    assert_evaluates(
        "(lambda y:Nat.
            ((lambda f:Nat -> Nat. lambda y:Nat. f y) (lambda z:Nat. y)) 7) 5",
        "Nat",
        "5",
    );
}
