//! `jflat` CLI — transform JSON (from a file, URL, or stdin) into discrete
//! assignment statements to make it greppable, and turn statements back into
//! JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Flatten a file
//! jflat /tmp/apiresponse.json
//!
//! # Flatten straight from a URL
//! jflat https://jsonplaceholder.typicode.com/users/1
//!
//! # Grep a subset of the statements and reassemble it
//! jflat data.json | grep company | jflat -u
//!
//! # One JSON document per input line
//! tail -f events.ndjson | jflat --stream
//! ```

mod color;

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use jflat_core::{
    collapse_root, lex, lex_json, merge, parse, walk, walk_with_prefix, Statement, Statements,
    Token, ROOT,
};

/// Process exit codes, one per failure stage.
mod exit {
    pub const OPEN_FILE: u8 = 1;
    pub const READ_INPUT: u8 = 2;
    pub const FORM_STATEMENTS: u8 = 3;
    pub const FETCH_URL: u8 = 4;
    pub const PARSE_STATEMENTS: u8 = 5;
    pub const JSON_ENCODE: u8 = 6;
}

const AFTER_HELP: &str = "\
Exit codes:
  0  OK
  1  Failed to open file
  2  Failed to read input
  3  Failed to form statements
  4  Failed to fetch URL
  5  Failed to parse statements
  6  Failed to encode JSON

Examples:
  jflat /tmp/apiresponse.json
  jflat http://jsonplaceholder.typicode.com/users/1
  curl -s http://jsonplaceholder.typicode.com/users/1 | jflat
  jflat http://jsonplaceholder.typicode.com/users/1 | grep company | jflat --unflatten";

#[derive(Parser)]
#[command(
    name = "jflat",
    version,
    about = "Transform JSON (from a file, URL, or stdin) into discrete assignments to make it greppable",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Reverse the operation (turn assignments back into JSON)
    #[arg(short, long)]
    unflatten: bool,

    /// Treat each line of input as a separate JSON document
    #[arg(short, long)]
    stream: bool,

    /// Represent each statement as a JSON array of tagged tokens
    #[arg(short, long)]
    json: bool,

    /// Don't sort output (faster)
    #[arg(long)]
    no_sort: bool,

    /// Colorize output (default on a tty)
    #[arg(short, long)]
    colorize: bool,

    /// Monochrome (don't colorize output)
    #[arg(short, long)]
    monochrome: bool,

    /// Input file or URL (stdin if omitted or "-")
    #[arg(value_name = "FILE|URL|-")]
    input: Option<String>,
}

/// A failed run: the process exit code plus the error to report.
struct Failure {
    code: u8,
    error: anyhow::Error,
}

/// Attach an exit code and a context message to an error on its way out.
trait OrExit<T> {
    fn or_exit<C>(self, code: u8, context: C) -> Result<T, Failure>
    where
        C: Display + Send + Sync + 'static;
}

impl<T, E> OrExit<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn or_exit<C>(self, code: u8, context: C) -> Result<T, Failure>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Failure {
            code,
            error: anyhow::Error::new(e).context(context),
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            eprintln!("{:#}", failure.error);
            ExitCode::from(failure.code)
        }
    }
}

fn run(cli: &Cli) -> Result<(), Failure> {
    let source = open_input(cli.input.as_deref())?;

    // Colorize wins over monochrome; piped output defaults to monochrome.
    let use_color = if cli.colorize {
        true
    } else if cli.monochrome {
        false
    } else {
        atty::is(atty::Stream::Stdout)
    };

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    if cli.unflatten {
        unflatten_action(&read_all(source)?, cli.json, use_color, &mut out)?;
    } else if cli.stream {
        stream_action(source, cli, use_color, &mut out)?;
    } else {
        flatten_action(&read_all(source)?, cli, use_color, &mut out)?;
    }
    out.flush().or_exit(exit::JSON_ENCODE, "failed to write output")
}

/// The default action: one JSON document in, sorted statements out.
fn flatten_action(
    input: &str,
    cli: &Cli,
    use_color: bool,
    out: &mut impl Write,
) -> Result<(), Failure> {
    let value: serde_json::Value =
        serde_json::from_str(input).or_exit(exit::FORM_STATEMENTS, "failed to form statements")?;
    let mut ss = walk(ROOT, &value);
    if !cli.no_sort {
        ss.sort();
    }
    write_statements(&ss, cli.json, use_color, out)
}

/// Like the flatten action, but the input is one JSON document per line and
/// each document becomes an element of a top-level array. Lines are read and
/// emitted one at a time, so a pipe that never closes (`tail -f`) still
/// produces output as documents arrive.
fn stream_action(
    source: impl BufRead,
    cli: &Cli,
    use_color: bool,
    out: &mut impl Write,
) -> Result<(), Failure> {
    // The first statement establishes that the top level is an array.
    let mut top = Statements::new();
    top.add(Statement::root(ROOT).with_value(Token::empty_array()));
    write_statements(&top, cli.json, use_color, out)?;
    out.flush().or_exit(exit::JSON_ENCODE, "failed to write output")?;

    for (index, line) in source.lines().enumerate() {
        let line = line.or_exit(exit::READ_INPUT, "failed to read input")?;
        let value: serde_json::Value = serde_json::from_str(&line).or_exit(
            exit::FORM_STATEMENTS,
            format!("failed to form statements from line {}", index + 1),
        )?;
        let prefix = Statement::root(ROOT).with_index(index);
        let mut ss = walk_with_prefix(&prefix, &value);
        if !cli.no_sort {
            ss.sort();
        }
        write_statements(&ss, cli.json, use_color, out)?;
        out.flush().or_exit(exit::JSON_ENCODE, "failed to write output")?;
    }
    Ok(())
}

/// The reverse action: statements in, merged pretty-printed JSON out.
fn unflatten_action(
    input: &str,
    json_form: bool,
    use_color: bool,
    out: &mut impl Write,
) -> Result<(), Failure> {
    let mut ss = Statements::new();
    for (index, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let context = || format!("failed to parse statement on line {}: {line}", index + 1);
        let tokens = if json_form { lex_json(line) } else { lex(line) }
            .or_exit(exit::PARSE_STATEMENTS, context())?;
        ss.add(parse(tokens).or_exit(exit::PARSE_STATEMENTS, context())?);
    }

    let merged = merge(&ss).or_exit(exit::PARSE_STATEMENTS, "failed to merge statements")?;
    let value = collapse_root(merged, ROOT);
    writeln!(out, "{}", color::colorize_json(&value, use_color))
        .or_exit(exit::JSON_ENCODE, "failed to encode json")
}

fn write_statements(
    ss: &Statements,
    json_form: bool,
    use_color: bool,
    out: &mut impl Write,
) -> Result<(), Failure> {
    for statement in ss {
        if json_form {
            let line = statement
                .to_json_form()
                .or_exit(exit::FORM_STATEMENTS, "failed to form statements")?;
            writeln!(out, "{line}")
        } else {
            writeln!(out, "{}", color::colorize_statement(statement, use_color))
        }
        .or_exit(exit::JSON_ENCODE, "failed to write output")?;
    }
    Ok(())
}

/// Open the input as a buffered reader: a file, an HTTP(S) URL, or stdin.
fn open_input(source: Option<&str>) -> Result<Box<dyn BufRead>, Failure> {
    match source {
        None | Some("-") => Ok(Box::new(io::stdin().lock())),
        Some(url) if is_url(url) => {
            let response = ureq::get(url)
                .set("Accept", "application/json")
                .set("User-Agent", concat!("jflat/", env!("CARGO_PKG_VERSION")))
                .call()
                .or_exit(exit::FETCH_URL, format!("failed to fetch {url}"))?;
            Ok(Box::new(BufReader::new(response.into_reader())))
        }
        Some(path) => {
            let file =
                File::open(path).or_exit(exit::OPEN_FILE, format!("failed to open {path}"))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Drain a reader for the whole-input actions (flatten, unflatten).
fn read_all(mut source: impl BufRead) -> Result<String, Failure> {
    let mut buf = String::new();
    source
        .read_to_string(&mut buf)
        .or_exit(exit::READ_INPUT, "failed to read input")?;
    Ok(buf)
}

fn is_url(candidate: &str) -> bool {
    candidate.starts_with("http://") || candidate.starts_with("https://")
}
