//! Property tests for request file contents

use proptest::prelude::*;
use selftest::{EngineCommand, RunOptions, Suite, TestCase};
use std::fs;
use tempfile::TempDir;

fn cases() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((any::<String>(), any::<String>()), 0..8)
}

fn suite_from(cases: &[(String, String)]) -> Suite {
    let mut suite = Suite::new();
    for (name, code) in cases {
        suite.register(name.as_str(), code.as_str());
    }
    suite
}

proptest! {
    #[test]
    fn request_format_preserves_order_and_text(cases in cases()) {
        let suite = suite_from(&cases);
        let parsed: Vec<TestCase> = serde_json::from_str(&suite.to_json_pretty().unwrap()).unwrap();

        prop_assert_eq!(parsed.len(), cases.len());
        for (case, (name, code)) in parsed.iter().zip(&cases) {
            prop_assert_eq!(&case.name, name);
            prop_assert_eq!(&case.code, code);
        }
        prop_assert_eq!(Suite::from_json(&suite.to_json_pretty().unwrap()).unwrap(), suite);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn written_request_file_round_trips(cases in cases()) {
        let dir = TempDir::new().unwrap();
        let engine = dir.path().join("engine.sh");
        fs::write(&engine, "while [ \"$1\" != \"--json\" ]; do shift; done; echo '{}' > \"$2\"").unwrap();
        let options = RunOptions::new()
            .dev(false)
            .keep_artifacts(true)
            .cache_dir(dir.path().join(".cache"))
            .engine(EngineCommand::new("sh").arg(engine));

        let suite = suite_from(&cases);
        selftest::run(&suite, &options).unwrap();

        let request = fs::read_dir(dir.path().join(".cache"))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .find(|path| path.file_name().is_some_and(|name| name.to_string_lossy().starts_with("tests-")))
            .unwrap();
        let written = Suite::from_json(&fs::read_to_string(request).unwrap()).unwrap();
        prop_assert_eq!(written, suite);
    }
}
