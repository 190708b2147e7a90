//! Output tree snapshots and event helpers

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sitepipe::{EventSink, PipelineEvent};

/// Every file under `root`, keyed by `/`-separated relative path
pub fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    collect(root, root, &mut files);
    files
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            files.insert(relative, std::fs::read(&path).unwrap());
        }
    }
}

/// Relative paths of every file under `root`
pub fn listing(root: &Path) -> Vec<String> {
    snapshot(root).into_keys().collect()
}

pub type Recorded = Arc<Mutex<Vec<PipelineEvent>>>;

/// Sink that keeps every event
pub fn recorder() -> (EventSink, Recorded) {
    let events: Recorded = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&events);
    let sink: EventSink = Arc::new(move |event| captured.lock().unwrap().push(event));
    (sink, events)
}

pub fn count(events: &Recorded, predicate: impl Fn(&PipelineEvent) -> bool) -> usize {
    events.lock().unwrap().iter().filter(|e| predicate(e)).count()
}

/// Poll until `predicate` holds or `timeout` passes
pub async fn eventually(timeout: Duration, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if predicate() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
