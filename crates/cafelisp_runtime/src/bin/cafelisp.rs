//! cafelisp CLI entry point.

use std::env;
use std::io;
use std::process::ExitCode;

use cafelisp_runtime::{CliConfig, Outcome, init_logging, render_cli, run};

fn main() -> ExitCode {
    let config = match CliConfig::parse(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", render_cli(&e));
            eprintln!("Try 'cafelisp --help' for more information.");
            return ExitCode::FAILURE;
        }
    };

    if config.show_help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if config.show_version {
        println!("cafelisp {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    init_logging(config.verbose);

    match run(&config, io::stdin().lock(), &mut io::stdout().lock()) {
        Ok(Outcome::Written(path)) => {
            if config.verbose {
                eprintln!("wrote {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Ok(Outcome::Dumped) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_cli(&e));
            ExitCode::FAILURE
        }
    }
}

fn print_help() {
    println!(
        "\x1b[1mcafelisp\x1b[0m - Compile a tiny Lisp to a JVM class file

\x1b[1mUSAGE:\x1b[0m
    cafelisp [OPTIONS] [FILE]

\x1b[1mARGUMENTS:\x1b[0m
    [FILE]    Source file; omit or use - to read standard input

\x1b[1mOPTIONS:\x1b[0m
    -o, --output-dir DIR   Directory for the class file (default: current)
    --class-name NAME      Name of the generated class (default: MyClass)
    --dump                 Print the constant pool and code instead of writing
    -v, --verbose          Log compilation details (RUST_LOG overrides)
    -h, --help             Print help information
    -V, --version          Print version information

\x1b[1mLANGUAGE:\x1b[0m
    (print arg...)         Print each argument, then a newline
    (+ arg...)             Sum of 64-bit integers; (+) is 0
    \"text\"                 String literal (escapes: \\n \\t \\r \\\\ \\\")
    ; comment              Ignored to end of line

\x1b[1mEXAMPLES:\x1b[0m
    cafelisp hello.lisp                Write MyClass.class
    echo '(print (+ 1 2))' | cafelisp  Compile from standard input
    cafelisp --dump hello.lisp         Show what would be written

For more information, visit https://github.com/ndouglas/cafelisp"
    );
}
