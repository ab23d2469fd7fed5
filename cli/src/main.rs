use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use stacklet::{
    Dictionary, EvaluatorOptions, Interpreter, Program, Stack, Value,
    program::{add, mul, pop, push},
    sequence, stack, words,
};
use thiserror::Error;
use tracing::debug;

/// Stacklet - run programs built from a tiny stack instruction set
#[derive(Parser, Debug)]
#[command(name = "stacklet")]
#[command(about = "Evaluate stacklet sample programs", long_about = None)]
struct Args {
    /// Maximum number of operations a single evaluation may execute
    #[arg(long, global = true)]
    max_steps: Option<usize>,

    /// Log every executed operation to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the sample programs and the stacks they produce
    Demo,

    /// List the words of the standard dictionary
    Words,

    /// Evaluate a dictionary word
    Run {
        /// Name of the word to evaluate
        word: String,

        /// Initial stack, top first (integers, floats, true/false, or text)
        values: Vec<String>,
    },

    /// Evaluate factorial(n) on an empty stack
    Factorial { n: i64 },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("unknown word `{name}` (known words: {known})")]
    UnknownWord { name: String, known: String },
}

/// Interprets one command-line argument as a stack value.
fn parse_value(text: &str) -> Value {
    if let Ok(value) = text.parse::<i64>() {
        return Value::Int(value);
    }
    if let Ok(value) = text.parse::<f64>() {
        if value.is_finite() {
            return Value::Float(value);
        }
    }
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::from(text),
    }
}

fn demo_programs() -> Vec<(&'static str, Stack, Program<Stack>)> {
    vec![
        (
            "push 2, push 3, add, push 4, mul",
            stack![],
            sequence![push(2), push(3), add(), push(4), mul()],
        ),
        ("squared", stack![5], words::squared()),
        (
            "push 5, squared, push 3, push 2, sum3",
            stack![],
            sequence![push(5), words::squared(), push(3), push(2), words::sum3()],
        ),
        ("factorial 5", stack![], words::factorial(5)),
        ("pop", stack![], pop()),
    ]
}

fn run_demo(options: &EvaluatorOptions) {
    for (label, initial, program) in demo_programs() {
        let interpreter = Interpreter::with_options(initial.clone(), options.clone());
        match interpreter.eval(program) {
            Ok(result) => println!("{:<40} {} => {}", label, initial, result),
            Err(err) => println!("{:<40} {} => error: {}", label, initial, err),
        }
    }
}

/// Log filter used when `RUST_LOG` is not set: WARN, or TRACE with `--verbose`.
fn default_log_level(verbose: bool) -> &'static str {
    if verbose { "trace" } else { "warn" }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(args.verbose)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let options = EvaluatorOptions {
        max_steps: args.max_steps,
    };
    debug!(?options, command = ?args.command, "Starting");

    match args.command {
        Command::Demo => run_demo(&options),
        Command::Words => {
            for name in Dictionary::standard().names() {
                println!("{}", name);
            }
        }
        Command::Run { word, values } => {
            let dictionary = Dictionary::standard();
            let program = dictionary
                .get(&word)
                .ok_or_else(|| CliError::UnknownWord {
                    known: dictionary.names().join(", "),
                    name: word.clone(),
                })
                .into_diagnostic()?;
            let initial: Stack = values.iter().map(|text| parse_value(text)).collect();
            let result = Interpreter::with_options(initial, options)
                .eval(program)
                .into_diagnostic()?;
            println!("{}", result);
        }
        Command::Factorial { n } => {
            let result = Interpreter::with_options(Stack::new(), options)
                .eval(words::factorial(n))
                .into_diagnostic()?;
            println!("{}", result);
        }
    }

    Ok(())
}
