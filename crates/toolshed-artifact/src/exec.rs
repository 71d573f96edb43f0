use crate::error::ExecError;
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Longest `#!` line we look at
const MAX_SHEBANG_LEN: u64 = 256;

/// Interpreter used when a script has no `#!` line
const DEFAULT_INTERPRETER: &str = "sh";

/// Interpreter invocation for a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Runs a resolved tool with inherited stdio
///
/// The tool is spawned directly first. If the OS refuses because the file is
/// not executable (its mode could not be set after fetch, or it is a developer
/// override without the bit), it is run through its `#!` interpreter instead.
pub fn run_tool(path: &Path, args: &[String]) -> Result<ExitStatus, ExecError> {
    debug!("exec {} {:?}", path.display(), args);

    match Command::new(path).args(args).status() {
        Ok(status) => Ok(status),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            let interpreter = interpreter_for(path)?;
            warn!(
                "{} is not executable, running through {}",
                path.display(),
                interpreter.program.display()
            );

            Command::new(&interpreter.program)
                .args(&interpreter.args)
                .arg(path)
                .args(args)
                .status()
                .map_err(|source| ExecError::Spawn {
                    program: interpreter.program.clone(),
                    source,
                })
        }
        Err(source) => Err(ExecError::Spawn {
            program: path.to_path_buf(),
            source,
        }),
    }
}

/// Reads the interpreter from the script's `#!` line, defaulting to `sh`
pub fn interpreter_for(path: &Path) -> Result<Interpreter, ExecError> {
    let file = File::open(path).map_err(|source| ExecError::Interpreter {
        path: path.to_path_buf(),
        source,
    })?;

    let mut first_line = String::new();
    let read = BufReader::new(file.take(MAX_SHEBANG_LEN)).read_line(&mut first_line);
    if let Err(e) = read {
        // Binary content is not valid UTF-8; it simply has no shebang
        if e.kind() != ErrorKind::InvalidData {
            return Err(ExecError::Interpreter {
                path: path.to_path_buf(),
                source: e,
            });
        }
        first_line.clear();
    }

    Ok(parse_shebang(&first_line).unwrap_or_else(|| Interpreter {
        program: PathBuf::from(DEFAULT_INTERPRETER),
        args: Vec::new(),
    }))
}

/// Parses `#!/usr/bin/env perl -w` into program and arguments
fn parse_shebang(line: &str) -> Option<Interpreter> {
    let rest = line.strip_prefix("#!")?;
    let mut parts = rest.split_whitespace();
    let program = PathBuf::from(parts.next()?);
    let args = parts.map(str::to_string).collect();
    Some(Interpreter { program, args })
}
