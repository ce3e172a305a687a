//! Blocking child-process execution
//!
//! Both the git binary and subhook scripts are driven through
//! [`Invocation`], which wraps duct with the pieces this tool needs:
//! stdin data, extra environment variables, a working directory, a set of
//! accepted exit codes and optional output capture. When output is not
//! captured the child inherits the caller's stdio, so hook output streams
//! to the pushing client in real time.

use shipit_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Exit codes an [`Invocation`] treats as success
#[derive(Debug, Clone)]
enum Accepted {
    /// Only these codes succeed (default: `[0]`)
    Codes(Vec<i32>),
    /// Every exit code succeeds; the caller inspects the code itself
    Any,
}

/// A single blocking child-process invocation
///
/// Built with chained setters, executed with [`Invocation::run`].
///
/// ```no_run
/// use shipit_engine::Invocation;
///
/// let out = Invocation::new("git")
///     .args(["init", "--bare"])
///     .dir("/srv/repos/demo.git")
///     .run()?;
/// assert_eq!(out.code, 0);
/// # Ok::<(), shipit_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    data: Option<Vec<u8>>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
    accepted: Accepted,
    capture: bool,
    sudo: bool,
}

/// The outcome of a completed [`Invocation`]
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The command line that ran, for diagnostics
    pub command: String,
    /// The child's exit code (`-1` when killed by a signal)
    pub code: i32,
    /// Captured standard output, empty unless capture was requested
    pub stdout: String,
    /// Captured standard error, empty unless capture was requested
    pub stderr: String,
}

impl Invocation {
    /// Start building an invocation of `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            data: None,
            env: Vec::new(),
            cwd: None,
            accepted: Accepted::Codes(vec![0]),
            capture: false,
            sudo: false,
        }
    }

    /// Build an invocation from a single shell-style command string
    ///
    /// The string is tokenized with shell quoting rules; no shell is
    /// involved at execution time.
    pub fn shell(line: &str) -> Result<Self> {
        let mut words = shell_words::split(line)
            .map_err(|e| Error::Message(format!("Failed to parse command '{line}': {e}")))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| Error::Message("Empty command".to_string()))?;
        Ok(Self::new(program).args(words))
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Write `data` to the child's standard input
    #[must_use]
    pub fn stdin(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set one extra environment variable (the full parent environment is
    /// always inherited)
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set several extra environment variables
    #[must_use]
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Run the child in `dir` instead of the caller's working directory
    #[must_use]
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Replace the accepted exit codes (default: only zero)
    #[must_use]
    pub fn accept(mut self, codes: &[i32]) -> Self {
        self.accepted = Accepted::Codes(codes.to_vec());
        self
    }

    /// Accept every exit code; the caller reads [`RunOutput::code`]
    #[must_use]
    pub fn accept_any(mut self) -> Self {
        self.accepted = Accepted::Any;
        self
    }

    /// Capture stdout/stderr instead of inheriting the caller's streams
    #[must_use]
    pub fn capture(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Prefix the command with `sudo`
    #[must_use]
    pub fn sudo(mut self) -> Self {
        self.sudo = true;
        self
    }

    /// The command line this invocation will run, for logging and errors
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        if self.sudo {
            parts.push("sudo".to_string());
        }
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        shell_words::join(&parts)
    }

    /// Execute the child and block until it exits
    ///
    /// # Errors
    ///
    /// [`Error::Spawn`] when the process could not be started at all
    /// (program missing, permission denied), [`Error::CommandFailed`]
    /// when it ran but exited with a code outside the accepted set.
    pub fn run(&self) -> Result<RunOutput> {
        let command = self.command_line();
        let (program, args) = if self.sudo {
            let mut args = Vec::with_capacity(self.args.len() + 1);
            args.push(self.program.clone());
            args.extend(self.args.iter().cloned());
            ("sudo".to_string(), args)
        } else {
            (self.program.clone(), self.args.clone())
        };

        let cwd_display = self
            .cwd
            .as_deref()
            .unwrap_or(Path::new("."))
            .display()
            .to_string();
        tracing::debug!("{cwd_display}$ {command}");

        let mut expr = duct::cmd(program, args).unchecked();
        if let Some(data) = &self.data {
            expr = expr.stdin_bytes(data.clone());
        }
        for (key, value) in &self.env {
            expr = expr.env(key, value);
        }
        if let Some(cwd) = &self.cwd {
            expr = expr.dir(cwd.clone());
        }
        if self.capture {
            expr = expr.stdout_capture().stderr_capture();
        }

        let output = expr.run().map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;

        let code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout)
            .trim_end_matches('\n')
            .to_string();
        let stderr = String::from_utf8_lossy(&output.stderr)
            .trim_end_matches('\n')
            .to_string();

        let accepted = match &self.accepted {
            Accepted::Codes(codes) => codes.contains(&code),
            Accepted::Any => true,
        };
        if !accepted {
            return Err(Error::CommandFailed {
                command,
                code,
                stdout,
                stderr,
            });
        }

        Ok(RunOutput {
            command,
            code,
            stdout,
            stderr,
        })
    }
}
