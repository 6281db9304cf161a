use std::{io::Read, process::ExitCode};

use clap::Parser as _;
use clio::Input;
use rustyline::{error::ReadlineError, DefaultEditor};

use stlc::{
    context::Binding,
    error::ReplError,
    parsing,
    repl::Session,
};

#[derive(clap::Parser)]
#[command(
    version,
    about, long_about = None,
    disable_help_subcommand = true
)]
struct Cli {
    /// Source file to run. Omit it to start an interactive session.
    source_file: Option<Input>,

    /// Print every evaluation step.
    #[arg(long)]
    trace: bool,
}

fn run_file(mut input: Input, trace: bool) -> Result<(), String> {
    let mut source = String::new();
    input
        .read_to_string(&mut source)
        .map_err(|e| format!("failed to read input:\n{e}"))?;

    let origin = input.to_string();

    let parser = parsing::Parser::default();
    let commands = parser
        .parse_toplevel(&source)
        .map_err(|e| ReplError::from(e).render_styled(&source, &origin))?;

    // A command that fails to typecheck is reported and skipped; later
    // commands still run against the unchanged context.
    let mut session = Session::new(trace);
    for command in commands {
        match session.run_command(command) {
            Ok(out) => println!("{out}"),
            Err(err) => println!("{}", ReplError::from(err).render_styled(&source, &origin)),
        }
    }

    Ok(())
}

fn run_repl(trace: bool) -> Result<(), String> {
    println!("A simply typed lambda calculus evaluator.");
    println!("Terminate commands with ';;'. Type :help for the meta commands.");
    println!();

    let mut rl = DefaultEditor::new().map_err(|e| format!("failed to initialize input:\n{e}"))?;
    let mut session = Session::new(trace);
    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() { ">> " } else { " > " };
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(format!("failed to read input:\n{e}")),
        };

        if buffer.is_empty() {
            match line.trim() {
                "" => continue,
                ":help" => {
                    print_help();
                    continue;
                }
                ":context" => {
                    print_context(&session);
                    continue;
                }
                ":trace" => {
                    session.set_trace(!session.trace());
                    println!(
                        "trace {}",
                        if session.trace() { "on" } else { "off" }
                    );
                    continue;
                }
                ":quit" | ":exit" => return Ok(()),
                meta if meta.starts_with(':') => {
                    println!("unknown meta command `{meta}`, type :help");
                    continue;
                }
                _ => {}
            }
        }

        buffer.push_str(&line);
        buffer.push('\n');

        // Commands may span lines; run every complete ';;'-terminated
        // chunk and keep the rest buffered.
        while let Some(pos) = buffer.find(";;") {
            let chunk: String = buffer.drain(..pos + 2).collect();
            let src = chunk.trim_end_matches(";;").trim();
            if src.is_empty() {
                continue;
            }
            let _ = rl.add_history_entry(format!("{src};;"));
            match session.run_src(src, "<repl>") {
                Ok(out) => println!("{out}"),
                Err(err) => println!("{err}"),
            }
        }
    }
}

fn print_help() {
    println!("Commands are terminated by ';;' and may span several lines:");
    println!("  <term>;;            typecheck and evaluate a term");
    println!("  <Type>;;            resolve and print a type");
    println!("  x = <term>;;        evaluate a term and bind the result");
    println!("  X = <Type>;;        bind a type abbreviation");
    println!();
    println!("Meta commands (on an empty line):");
    println!("  :context            list the current bindings");
    println!("  :trace              toggle printing of evaluation steps");
    println!("  :help               show this help");
    println!("  :quit               leave the session");
}

fn print_context(session: &Session) {
    let mut bindings = session.context().iter().peekable();
    if bindings.peek().is_none() {
        println!("(empty context)");
        return;
    }
    for (name, binding) in bindings {
        match binding {
            Binding::Var(ty) => println!("{name} : {ty}"),
            Binding::TermAbb(value, ty) => println!("val {name} : {ty} = {value}"),
            Binding::TyAbb(ty) => println!("type {name} = {ty}"),
        }
    }
}

fn program() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.source_file {
        Some(input) => run_file(input, cli.trace),
        None => run_repl(cli.trace),
    }
}

fn main() -> ExitCode {
    match program() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
