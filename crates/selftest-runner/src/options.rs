//! Run configuration

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default cache directory, relative to the working directory
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Program and leading arguments used to start the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl EngineCommand {
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Full argument list for one run:
    /// `[engine args...] <request> [--dev] --json <result>`
    #[must_use]
    pub fn invocation_args(&self, request: &Path, result: &Path, dev: bool) -> Vec<OsString> {
        let mut args = self.args.clone();
        args.push(request.into());
        if dev {
            args.push("--dev".into());
        }
        args.push("--json".into());
        args.push(result.into());
        args
    }
}

impl Default for EngineCommand {
    /// `node core.cjs`
    fn default() -> Self {
        Self::new("node").arg("core.cjs")
    }
}

/// Options for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Pass `--dev` to the engine
    pub dev: bool,
    /// Leave the request and result files on disk after the run
    pub keep_artifacts: bool,
    pub cache_dir: PathBuf,
    pub engine: EngineCommand,
}

impl RunOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    #[must_use]
    pub fn keep_artifacts(mut self, keep: bool) -> Self {
        self.keep_artifacts = keep;
        self
    }

    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    #[must_use]
    pub fn engine(mut self, engine: EngineCommand) -> Self {
        self.engine = engine;
        self
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dev: true,
            keep_artifacts: false,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            engine: EngineCommand::default(),
        }
    }
}
