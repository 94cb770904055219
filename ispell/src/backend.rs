//! Child-process plumbing around the `-a` protocol.
//!
//! Opening a tag spawns one speller process and validates its
//! greeting; a spawn or greeting failure means the language (or the
//! program) is not usable and is reported as an open error. Once the
//! child is up, any pipe trouble is transient and surfaces as a
//! per-call error instead.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use chatspell_core::{Backend, BackendError, Dictionary};

use crate::config::{Dialect, IspellConfig};
use crate::protocol::{self, Response};

/// Factory spawning one speller process per language tag.
#[derive(Debug, Clone)]
pub struct IspellBackend {
    program: String,
    dialect: Dialect,
    extra_args: Vec<String>,
}

impl IspellBackend {
    pub fn new(program: &str, dialect: Dialect) -> Self {
        Self {
            program: program.to_string(),
            dialect,
            extra_args: Vec::new(),
        }
    }

    pub fn from_config(config: &IspellConfig) -> Self {
        Self {
            program: config.program.clone(),
            dialect: config.dialect,
            extra_args: config.extra_args.clone(),
        }
    }

    /// Arguments selecting pipe mode and the language, per dialect.
    fn args(&self, tag: &str) -> Vec<String> {
        let mut args = match self.dialect {
            Dialect::Aspell => vec!["-a".to_string(), format!("--lang={tag}")],
            Dialect::Hunspell => vec!["-a".to_string(), "-d".to_string(), tag.to_string()],
        };
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

impl Backend for IspellBackend {
    type Dict = IspellDict;

    fn open(&self, tag: &str) -> Result<IspellDict, BackendError> {
        let args = self.args(tag);
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BackendError::Protocol("child stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BackendError::Protocol("child stdout not captured".to_string()))?;
        let mut dict = IspellDict {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            last: None,
        };

        let mut greeting = String::new();
        let n = dict.stdout.read_line(&mut greeting)?;
        if n == 0 {
            // the child bailed out before saying hello, typically an
            // unknown language
            return Err(BackendError::Protocol(format!(
                "`{}` exited without a greeting",
                self.program
            )));
        }
        let greeting = greeting.trim_end();
        if !protocol::is_greeting(greeting) {
            return Err(BackendError::Protocol(format!(
                "unexpected greeting from `{}`: {greeting:?}",
                self.program
            )));
        }
        tracing::debug!("spawned `{} {}`: {greeting}", self.program, args.join(" "));
        Ok(dict)
    }
}

/// One live speller process for one language tag.
pub struct IspellDict {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    /// Last query and its response. check-then-suggest on the same
    /// word is the common calling pattern and should cost one round
    /// trip, not two.
    last: Option<(String, Response)>,
}

impl IspellDict {
    fn query(&mut self, word: &str) -> Result<Response, BackendError> {
        if let Some((w, r)) = &self.last {
            if w == word {
                return Ok(r.clone());
            }
        }
        // '^' makes the child take the line as literal text even if
        // the word starts with a protocol command char
        writeln!(self.stdin, "^{word}")?;
        self.stdin.flush()?;

        let mut response = None;
        loop {
            let mut line = String::new();
            let n = self.stdout.read_line(&mut line)?;
            if n == 0 {
                return Err(BackendError::Protocol(
                    "speller process closed its pipe".to_string(),
                ));
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if response.is_none() {
                response = Some(protocol::parse_response(line)?);
            }
        }
        let response = response
            .ok_or_else(|| BackendError::Protocol("empty response group".to_string()))?;
        self.last = Some((word.to_string(), response.clone()));
        Ok(response)
    }
}

impl Dictionary for IspellDict {
    fn check(&mut self, word: &str) -> Result<bool, BackendError> {
        Ok(matches!(self.query(word)?, Response::Correct))
    }

    fn suggest(&mut self, word: &str, limit: usize) -> Result<Vec<String>, BackendError> {
        match self.query(word)? {
            Response::Correct => Ok(Vec::new()),
            Response::Misspelled(mut suggestions) => {
                suggestions.truncate(limit);
                Ok(suggestions)
            }
        }
    }

    fn add_word(&mut self, word: &str) -> Result<(), BackendError> {
        if matches!(self.query(word)?, Response::Correct) {
            return Ok(());
        }
        // '*' stages the word for the personal dictionary, '#' saves
        writeln!(self.stdin, "*{word}")?;
        writeln!(self.stdin, "#")?;
        self.stdin.flush()?;
        self.last = None;
        Ok(())
    }
}

impl Drop for IspellDict {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspell_args() {
        let backend = IspellBackend::new("aspell", Dialect::Aspell);
        assert_eq!(backend.args("en_US"), vec!["-a", "--lang=en_US"]);
    }

    #[test]
    fn test_hunspell_args() {
        let backend = IspellBackend::new("hunspell", Dialect::Hunspell);
        assert_eq!(backend.args("de_DE"), vec!["-a", "-d", "de_DE"]);
    }

    #[test]
    fn test_extra_args_appended() {
        let mut backend = IspellBackend::new("aspell", Dialect::Aspell);
        backend.extra_args = vec!["--encoding=utf-8".to_string()];
        assert_eq!(
            backend.args("en_US"),
            vec!["-a", "--lang=en_US", "--encoding=utf-8"]
        );
    }
}
