//! Selftest: register script test cases and run them through an external engine.
//!
//! ```no_run
//! use selftest::{RunOptions, Suite};
//!
//! let mut suite = Suite::new();
//! suite
//!     .register("math add", "expect(1 + 2).toBe(3);")
//!     .register("truthy test", "expect(true).toBeTruthy();");
//!
//! let result = selftest::run(&suite, &RunOptions::default().keep_artifacts(true))?;
//! println!("{}", result["summary"]);
//! # Ok::<(), selftest::RunError>(())
//! ```

pub use selftest_case::{Suite, SuiteError, TestCase};
pub use selftest_discovery::{Declaration, DeclarationKind, DiscoveryError, discover, scan_source};
pub use selftest_runner::{
    CaseResult, CaseStatus, DEFAULT_CACHE_DIR, EngineCommand, ReportMeta, RunError,
    RunOptions, RunReport, Runner, Summary, run,
};
