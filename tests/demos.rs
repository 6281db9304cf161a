use include_dir::{include_dir, Dir, File};

use stlc::{error::ReplError, parsing::Parser, repl::Session};

const DEMOS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/demos");

fn file_path<'a>(file: &'_ File<'a>) -> &'a str {
    file.path()
        .to_str()
        .expect("`File.path` is a &str internally")
}

/// Runs every bundled demo program end to end: each file must parse, and
/// every command in it must typecheck and evaluate.
#[test]
fn demo_programs_run_without_errors() {
    let parser = Parser::default();

    for file in DEMOS_DIR.files() {
        let path = file_path(file);
        let source = file
            .contents_utf8()
            .unwrap_or_else(|| panic!("{path} is not valid utf-8"));

        let commands = parser.parse_toplevel(source).unwrap_or_else(|e| {
            panic!(
                "{path} failed to parse:\n{}",
                ReplError::from(e).render_styled(source, path)
            )
        });
        assert!(!commands.is_empty(), "{path} contains no commands");

        let mut session = Session::default();
        for command in commands {
            let echoed = command.clone();
            if let Err(e) = session.run_command(command) {
                panic!("{path} failed on `{echoed:#?}`:\n{e}");
            }
        }
    }
}
