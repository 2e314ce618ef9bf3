//! Reads a source, compiles it, and writes the class file.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use cafelisp_language::compile_chars;
use log::{debug, info};

use crate::config::CliConfig;
use crate::error::{CliError, Result};

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The class file was written to this path.
    Written(PathBuf),
    /// A listing was printed; nothing was written.
    Dumped,
}

/// Compiles the configured input.
///
/// Source comes from the input file, or from `stdin` when none is given.
/// With `--dump` the listing goes to `out` and no file is written.
/// Nothing is written unless compilation succeeds.
///
/// # Errors
/// Returns the first read, compile, or write failure.
pub fn run<R: Read, W: Write>(config: &CliConfig, stdin: R, out: &mut W) -> Result<Outcome> {
    let source = read_source(config.input.as_deref(), stdin)?;
    let module = config.module();

    let program = compile_chars(source.chars())?;
    let bytes = program.assemble(&module)?;

    if config.dump {
        write!(out, "{program}").map_err(|source| CliError::Write {
            path: PathBuf::from("<stdout>"),
            source,
        })?;
        return Ok(Outcome::Dumped);
    }

    let path = config.output_path();
    if let Some(dir) = config.output_dir.as_deref() {
        fs::create_dir_all(dir).map_err(|source| CliError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, &bytes).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })?;
    info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(Outcome::Written(path))
}

fn read_source<R: Read>(input: Option<&Path>, mut stdin: R) -> Result<String> {
    match input {
        Some(path) => {
            debug!("reading {}", path.display());
            fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
        None => {
            debug!("reading standard input");
            let mut source = String::new();
            stdin
                .read_to_string(&mut source)
                .map_err(|source| CliError::Read {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(source)
        }
    }
}
