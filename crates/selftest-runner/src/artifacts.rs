//! Request/result file pair for a single run

use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// The two files exchanged with the engine during one run.
///
/// Both files are removed when the value is dropped unless it was created
/// with `keep` set, so every exit path of a run cleans up.
#[derive(Debug)]
pub(crate) struct Artifacts {
    request: PathBuf,
    result: PathBuf,
    keep: bool,
}

impl Artifacts {
    /// Reserve a fresh pair of paths in `cache_dir`. No files are created.
    #[must_use]
    pub(crate) fn allocate(cache_dir: &Path, keep: bool) -> Self {
        let id = unique_id();
        Self {
            request: cache_dir.join(format!("tests-{id}.json")),
            result: cache_dir.join(format!("result-{id}.json")),
            keep,
        }
    }

    #[must_use]
    pub(crate) fn request(&self) -> &Path {
        &self.request
    }

    #[must_use]
    pub(crate) fn result(&self) -> &Path {
        &self.result
    }
}

impl Drop for Artifacts {
    fn drop(&mut self) {
        if self.keep {
            debug!(request = %self.request.display(), result = %self.result.display(), "keeping artifacts");
            return;
        }
        remove_if_present(&self.request);
        remove_if_present(&self.result);
    }
}

/// `<epoch-ms>-<pid>-<seq>`: unique across threads and across processes sharing a cache dir
fn unique_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{millis}-{}-{seq}", process::id())
}

fn remove_if_present(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove artifact"),
    }
}
