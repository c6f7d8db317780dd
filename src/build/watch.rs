//! Polling source watcher with debounced rebuilds.

use crate::analyze::{RescanScheduler, DEFAULT_DEBOUNCE};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

/// Default interval between file system scans.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Watches source files and directories by modification time.
///
/// Every detected change replaces the pending rebuild, so a burst of
/// edits produces a single rebuild once the sources are quiet.
#[derive(Debug)]
pub struct SourceWatcher {
    roots: Vec<PathBuf>,
    seen: HashMap<PathBuf, SystemTime>,
    scheduler: RescanScheduler,
    debounce: Duration,
}

impl SourceWatcher {
    /// Watch the given files and directories. Missing paths are ignored.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        let mut watcher = Self {
            roots,
            seen: HashMap::new(),
            scheduler: RescanScheduler::new(),
            debounce: DEFAULT_DEBOUNCE,
        };
        watcher.seen = watcher.scan();
        watcher
    }

    /// Set the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Number of files being tracked.
    pub fn tracked_files(&self) -> usize {
        self.seen.len()
    }

    /// Rescan the sources and return changed, added or removed files.
    ///
    /// Any change schedules a rebuild `debounce` after `now`.
    pub fn poll_changes(&mut self, now: Instant) -> Vec<PathBuf> {
        let current = self.scan();

        let mut changed: Vec<PathBuf> = current
            .iter()
            .filter(|(path, modified)| self.seen.get(*path) != Some(*modified))
            .map(|(path, _)| path.clone())
            .collect();
        changed.extend(
            self.seen
                .keys()
                .filter(|path| !current.contains_key(*path))
                .cloned(),
        );
        changed.sort();

        if !changed.is_empty() {
            for path in &changed {
                log::info!("File changed: {}", path.display());
            }
            self.scheduler.schedule_at(now, self.debounce);
        }

        self.seen = current;
        changed
    }

    /// Check if the debounced rebuild is due. Returns `true` once per burst.
    pub fn rebuild_due(&mut self, now: Instant) -> bool {
        self.scheduler.poll(now)
    }

    /// Drop a pending rebuild.
    pub fn cancel_pending(&mut self) {
        self.scheduler.cancel_pending();
    }

    /// Poll forever, calling `rebuild` after each burst of changes.
    pub fn run<F: FnMut()>(&mut self, poll_interval: Duration, mut rebuild: F) -> ! {
        log::info!("Watching {} files for changes", self.tracked_files());
        loop {
            thread::sleep(poll_interval);
            let now = Instant::now();
            self.poll_changes(now);
            if self.rebuild_due(now) && self.scheduler.begin_pass() {
                rebuild();
                self.scheduler.finish_pass(Instant::now());
            }
        }
    }

    fn scan(&self) -> HashMap<PathBuf, SystemTime> {
        let mut files = HashMap::new();
        for root in &self.roots {
            if root.is_file() {
                if let Ok(modified) = fs::metadata(root).and_then(|m| m.modified()) {
                    files.insert(root.clone(), modified);
                }
            } else {
                collect_files(root, &mut files);
            }
        }
        files
    }
}

fn collect_files(dir: &Path, files: &mut HashMap<PathBuf, SystemTime>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden {
            continue;
        }
        if path.is_dir() {
            collect_files(&path, files);
        } else if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            files.insert(path, modified);
        }
    }
}
