//! Selftest run driver
//!
//! Writes a suite to a request file, runs the external engine on it, and
//! reads back the result file the engine produced.

mod artifacts;
mod options;
mod report;

pub use options::{DEFAULT_CACHE_DIR, EngineCommand, RunOptions};
pub use report::{CaseResult, CaseStatus, ReportMeta, RunReport, Summary};

use artifacts::Artifacts;
use selftest_case::Suite;
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("engine {} exited with {}", program.to_string_lossy(), describe_code(*code))]
    Process {
        program: OsString,
        /// `None` when the engine was terminated by a signal
        code: Option<i32>,
    },

    #[error("cannot start engine {}: {source}", program.to_string_lossy())]
    Spawn {
        program: OsString,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid result file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize test cases: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl RunError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    code.map_or_else(|| "no exit code".to_string(), |c| format!("status {c}"))
}

/// Runs suites through the engine with fixed options
#[derive(Debug, Clone, Default)]
pub struct Runner {
    options: RunOptions,
}

impl Runner {
    #[must_use]
    pub const fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Run every case in `suite` and return the engine's result verbatim.
    ///
    /// Blocks until the engine exits. The request and result files are
    /// removed afterwards, on failure too, unless `keep_artifacts` is set.
    ///
    /// # Errors
    ///
    /// Returns `RunError` if the cache directory or request file cannot be
    /// written, the engine cannot be started or exits non-zero, or the result
    /// file is missing or not valid JSON
    #[tracing::instrument(skip_all, fields(cases = suite.len(), dev = self.options.dev))]
    pub fn run(&self, suite: &Suite) -> Result<Value, RunError> {
        let cache_dir = &self.options.cache_dir;
        fs::create_dir_all(cache_dir).map_err(|e| RunError::io(cache_dir, e))?;

        let artifacts = Artifacts::allocate(cache_dir, self.options.keep_artifacts);

        let request = suite.to_json_pretty().map_err(RunError::Serialize)?;
        fs::write(artifacts.request(), request).map_err(|e| RunError::io(artifacts.request(), e))?;
        debug!(request = %artifacts.request().display(), "wrote request file");

        self.invoke_engine(&artifacts)?;

        let content = fs::read_to_string(artifacts.result())
            .map_err(|e| RunError::io(artifacts.result(), e))?;
        let result = serde_json::from_str(&content).map_err(|source| RunError::Parse {
            path: artifacts.result().to_path_buf(),
            source,
        })?;

        info!(result = %artifacts.result().display(), "engine run complete");
        Ok(result)
    }

    fn invoke_engine(&self, artifacts: &Artifacts) -> Result<(), RunError> {
        let engine = &self.options.engine;
        let args = engine.invocation_args(artifacts.request(), artifacts.result(), self.options.dev);
        debug!(program = ?engine.program, ?args, "starting engine");

        let status = Command::new(&engine.program)
            .args(&args)
            .status()
            .map_err(|source| RunError::Spawn {
                program: engine.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RunError::Process {
                program: engine.program.clone(),
                code: status.code(),
            })
        }
    }
}

/// Run `suite` once with `options`. See [`Runner::run`].
///
/// # Errors
///
/// Returns `RunError` on the first failing step of the run
pub fn run(suite: &Suite, options: &RunOptions) -> Result<Value, RunError> {
    Runner::new(options.clone()).run(suite)
}
