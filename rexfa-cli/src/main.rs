use clap::Parser;
use rexfa::pattern::IGNORE_CASE;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Search files for lines matching a pattern, printing the ones that match.
#[derive(Debug, Parser)]
#[command(name = "rexfa")]
struct Args {
    /// Pattern to search for
    pattern: String,

    /// Files to search
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Don't print matching lines, only report via the exit code
    #[arg(short, long)]
    quiet: bool,

    /// Match the whole line instead of searching for a substring match
    #[arg(short = 'f', long = "fullmatch", short_alias = 'x')]
    fullmatch: bool,

    /// Match letters case-insensitively
    #[arg(short, long)]
    ignore_case: bool,

    /// Print the compiled automaton's transition table before searching
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum Error {
    #[error("error reading {0}: {1}")]
    File(PathBuf, std::io::Error),
    #[error("error compiling pattern: {0}")]
    Pattern(#[from] rexfa::PatternError),
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(found) => {
            if found {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("rexfa: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<bool, Error> {
    let pattern = wrap_for_substring_search(&args.pattern, args.fullmatch);
    let flags = if args.ignore_case { IGNORE_CASE } else { 0 };
    let automaton = rexfa::compile(&pattern, flags)?;

    if args.verbose {
        println!("{}", automaton.to_table());
        println!();
    }

    let mut found = false;
    for path in &args.files {
        let contents = fs::read_to_string(path).map_err(|e| Error::File(path.clone(), e))?;
        for line in contents.lines() {
            if automaton.matches(line) {
                found = true;
                if !args.quiet {
                    println!("{line}");
                }
            }
        }
    }
    Ok(found)
}

/// Unless `fullmatch` is set, a line only has to *contain* a match; we achieve that by wrapping
/// the pattern with `Σ*` on both sides (unless it's already so wrapped), rather than giving the
/// automaton a separate substring-search mode.
fn wrap_for_substring_search(pattern: &str, fullmatch: bool) -> String {
    if fullmatch {
        return pattern.to_string();
    }
    let mut wrapped = pattern.to_string();
    if !wrapped.starts_with("Σ*") {
        wrapped = format!("Σ*{wrapped}");
    }
    if !wrapped.ends_with("Σ*") {
        wrapped = format!("{wrapped}Σ*");
    }
    wrapped
}
