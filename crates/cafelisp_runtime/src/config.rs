//! Command-line configuration.

use std::path::PathBuf;

use cafelisp_language::ModuleConfig;

use crate::error::{CliError, Result};

/// Options parsed from the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Source file; `None` reads standard input.
    pub input: Option<PathBuf>,
    /// Directory the class file is written into.
    pub output_dir: Option<PathBuf>,
    /// Overrides the generated class name.
    pub class_name: Option<String>,
    /// Print the constant pool and instruction listing.
    pub dump: bool,
    /// Raise the default log level to `debug`.
    pub verbose: bool,
    /// Print usage and exit.
    pub show_help: bool,
    /// Print the version and exit.
    pub show_version: bool,
}

impl CliConfig {
    /// Parses arguments, excluding the program name.
    ///
    /// # Errors
    /// Returns a usage error for unknown options, options missing their
    /// value, or more than one input.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => config.show_help = true,
                "-V" | "--version" => config.show_version = true,
                "-v" | "--verbose" => config.verbose = true,
                "--dump" => config.dump = true,
                "-o" | "--output-dir" => {
                    let dir = args
                        .next()
                        .ok_or_else(|| CliError::usage(format!("{arg} requires a directory")))?;
                    config.output_dir = Some(PathBuf::from(dir));
                }
                "--class-name" => {
                    let name = args
                        .next()
                        .ok_or_else(|| CliError::usage("--class-name requires a name"))?;
                    config.class_name = Some(name);
                }
                "-" => config.set_input(None)?,
                option if option.starts_with('-') => {
                    return Err(CliError::usage(format!("unknown option: {option}")));
                }
                path => config.set_input(Some(PathBuf::from(path)))?,
            }
        }

        Ok(config)
    }

    fn set_input(&mut self, input: Option<PathBuf>) -> Result<()> {
        if self.input.is_some() {
            return Err(CliError::usage("only one input file may be given"));
        }
        self.input = input;
        Ok(())
    }

    /// Settings for the generated class.
    #[must_use]
    pub fn module(&self) -> ModuleConfig {
        match &self.class_name {
            Some(name) => ModuleConfig::new().with_class_name(name.clone()),
            None => ModuleConfig::default(),
        }
    }

    /// Where the class file goes.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        let file_name = self.module().file_name();
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}
