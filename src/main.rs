use log::info;
use minrkt::{run_line, Config, Environment, Value};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use std::process::ExitCode;

// Deep recursion in user procedures recurses in the evaluator, so the session
// runs on a thread with a stack large enough for MAX_EVAL_DEPTH nested
// evaluations in an unoptimized build.
const STACK_SIZE: usize = 256 * 1024 * 1024;
const MAX_CALL_DEPTH: usize = 10_000;
const MAX_EVAL_DEPTH: usize = 30_000;

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    let session = std::thread::Builder::new()
        .name("session".to_string())
        .stack_size(STACK_SIZE)
        .spawn(move || {
            let config = Config::default()
                .max_call_depth(MAX_CALL_DEPTH)
                .max_eval_depth(MAX_EVAL_DEPTH);
            let mut env = Environment::with_config(config);
            if args.len() < 2 {
                run_repl(&mut env)
            } else {
                run_script(&args[1], &mut env)
            }
        });
    let outcome = match session {
        Ok(handle) => handle
            .join()
            .unwrap_or_else(|_| Err("session thread panicked".to_string())),
        Err(err) => Err(format!("could not start session: {err}")),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

/// Evaluate one line and print its result. Only fatal errors are returned;
/// every other error is printed and the session goes on.
fn run_and_print(line: &str, env: &mut Environment) -> Result<(), String> {
    if line.trim().is_empty() {
        return Ok(());
    }
    match run_line(line, env) {
        Ok(Value::Define) => println!("define: {}", env.describe_globals()),
        Ok(value @ Value::Notification(_)) => println!("{value}"),
        Ok(value) => println!("Result is: {value}"),
        Err(err) if err.is_fatal() => return Err(err.to_string()),
        Err(err) => println!("{err}"),
    }
    Ok(())
}

fn run_script(filename: &str, env: &mut Environment) -> Result<(), String> {
    let lines = read_lines(filename).map_err(|err| format!("{filename}: {err}"))?;
    info!("running {filename}");
    for line in lines {
        let line = line.map_err(|err| format!("{filename}: {err}"))?;
        println!("> {line}");
        run_and_print(&line, env)?;
    }
    Ok(())
}

fn run_repl(env: &mut Environment) -> Result<(), String> {
    let mut rl = DefaultEditor::new().map_err(|err| err.to_string())?;
    #[cfg(feature = "with-file-history")]
    if rl.load_history("history.txt").is_err() {
        println!("No previous history.");
    }
    println!("Welcome to minimalistic racket!");
    info!("session started");
    let result = loop {
        match rl.readline("> ") {
            Ok(line) => {
                if let Err(err) = rl.add_history_entry(line.as_str()) {
                    break Err(err.to_string());
                }
                if let Err(msg) = run_and_print(&line, env) {
                    break Err(msg);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break Ok(());
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break Ok(());
            }
            Err(err) => break Err(format!("Error: {:?}", err)),
        }
    };
    #[cfg(feature = "with-file-history")]
    if let Err(err) = rl.save_history("history.txt") {
        println!("Could not save history: {err}");
    }
    info!("session ended");
    result
}

fn read_lines<P>(filename: P) -> io::Result<io::Lines<io::BufReader<File>>>
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}
