use std::fs;

use clap::Parser;
use polyma::run_script;

/// polyma is an expression-oriented language whose every call resolves
/// through multiple dispatch.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells polyma to look at a file instead of an inline script.
    #[arg(short, long)]
    file: bool,

    /// Pipe mode automatically prints the last value of the script.
    #[arg(short, long)]
    pipe_mode: bool,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    run_script(&script, args.pipe_mode);
}
