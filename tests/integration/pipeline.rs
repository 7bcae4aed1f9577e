//! Integration tests for the run pipeline against stand-in engines

use selftest::{EngineCommand, RunError, RunOptions, RunReport, Suite, TestCase};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes the report a cooperating engine produces for the two-case scenario.
const REPORTING_ENGINE: &str = r#"
while [ "$1" != "--json" ]; do shift; done
cat > "$2" <<'JSON'
{
  "meta": { "framework": "selftest-core", "version": "0.1.0", "timestamp": "2026-10-19T00:00:00.000Z" },
  "summary": { "total": 2, "passed": 2, "failed": 0, "duration_ms": 0 },
  "tests": [
    { "name": "math add", "status": "passed", "error": null, "duration_ms": 0 },
    { "name": "truthy test", "status": "passed", "error": null, "duration_ms": 0 }
  ]
}
JSON
"#;

const ECHO_ENGINE: &str = r#"
request="$1"
while [ "$1" != "--json" ]; do shift; done
cp "$request" "$2"
"#;

fn options(dir: &Path, script: &str) -> RunOptions {
    let engine = dir.join("engine.sh");
    fs::write(&engine, script).unwrap();
    RunOptions::default()
        .cache_dir(dir.join(".cache"))
        .engine(EngineCommand::new("sh").arg(engine))
}

fn artifact(dir: &Path, prefix: &str) -> Option<PathBuf> {
    fs::read_dir(dir.join(".cache"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(prefix))
        })
}

fn two_case_suite() -> Suite {
    let mut suite = Suite::new();
    suite
        .register("math add", "expect(1+2).toBe(3)")
        .register("truthy test", "expect(true).toBeTruthy()");
    suite
}

#[test]
fn test_two_case_scenario_keeps_artifacts() {
    let dir = TempDir::new().unwrap();
    let options = options(dir.path(), REPORTING_ENGINE).keep_artifacts(true);

    let result = selftest::run(&two_case_suite(), &options).unwrap();

    let request_path = artifact(dir.path(), "tests-").expect("request file kept");
    let request: Vec<TestCase> =
        serde_json::from_str(&fs::read_to_string(request_path).unwrap()).unwrap();
    assert_eq!(request, two_case_suite().cases());

    let result_path = artifact(dir.path(), "result-").expect("result file kept");
    let on_disk: Value = serde_json::from_str(&fs::read_to_string(result_path).unwrap()).unwrap();
    assert_eq!(result, on_disk);

    let report = RunReport::from_value(result).unwrap();
    assert_eq!(report.summary.passed, 2);
    assert!(report.all_passed());
}

#[test]
fn test_successful_run_leaves_nothing_behind() {
    let dir = TempDir::new().unwrap();
    selftest::run(&two_case_suite(), &options(dir.path(), REPORTING_ENGINE)).unwrap();

    assert!(artifact(dir.path(), "tests-").is_none());
    assert!(artifact(dir.path(), "result-").is_none());
}

#[test]
fn test_empty_suite_writes_empty_array() {
    let dir = TempDir::new().unwrap();
    let options = options(dir.path(), ECHO_ENGINE).keep_artifacts(true);

    let result = selftest::run(&Suite::new(), &options).unwrap();

    assert_eq!(result, json!([]));
    let request_path = artifact(dir.path(), "tests-").unwrap();
    assert_eq!(fs::read_to_string(request_path).unwrap(), "[]");
}

#[test]
fn test_non_zero_exit_produces_no_result() {
    let dir = TempDir::new().unwrap();
    let result = selftest::run(&two_case_suite(), &options(dir.path(), "exit 1"));

    assert!(matches!(result, Err(RunError::Process { code: Some(1), .. })));
    assert!(artifact(dir.path(), "tests-").is_none());
}

#[test]
fn test_independent_suites_share_cache_dir() {
    let dir = TempDir::new().unwrap();
    let options = options(dir.path(), ECHO_ENGINE);

    let mut first = Suite::new();
    first.register("first", "1");
    let mut second = Suite::new();
    second.register("second", "2");

    let runner = selftest::Runner::new(options);
    let handles: Vec<_> = [first, second]
        .into_iter()
        .map(|suite| {
            let runner = runner.clone();
            std::thread::spawn(move || (runner.run(&suite).unwrap(), suite))
        })
        .collect();

    for handle in handles {
        let (result, suite) = handle.join().unwrap();
        assert_eq!(result, serde_json::to_value(&suite).unwrap());
    }
}

#[test]
fn test_discovered_cases_reach_the_engine() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("math.js");
    fs::write(&script, "function add(a, b) { return a + b; }\n").unwrap();

    let mut suite = two_case_suite();
    suite.extend(selftest::discover(&script).unwrap());

    let result = selftest::run(&suite, &options(dir.path(), ECHO_ENGINE)).unwrap();
    assert_eq!(result.as_array().unwrap().len(), 3);
    assert_eq!(result[2]["name"], "Auto: add() should not throw");
}
