//! Run command - resolve a tool and execute it

use crate::context::Context;
use anyhow::Result;
use log::debug;
use std::process::ExitStatus;
use toolshed_artifact::{ArtifactKind, run_tool};

/// Resolve `tool` and run it with `args`
///
/// Returns the exit code to forward. A tool killed by a signal maps to
/// `128 + signal`, as a shell would report it.
pub fn run(ctx: &Context, tool: &str, args: &[String]) -> Result<i32> {
    let resolver = ctx.resolver()?;
    let location = resolver.resolve_artifact(tool, ArtifactKind::Tool)?;
    debug!("running {} ({})", location.path.display(), location.origin);

    let status = run_tool(&location.path, args)?;
    Ok(exit_code(status))
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn test_exit_code_from_signal() {
        use std::os::unix::process::ExitStatusExt;

        // SIGKILL in the low bits of a wait status
        assert_eq!(exit_code(ExitStatus::from_raw(9)), 137);
    }

    #[test]
    #[cfg(unix)]
    fn test_exit_code_from_normal_exit() {
        use std::os::unix::process::ExitStatusExt;

        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
    }
}
