//! Progress-callback trait for per-file publish events.
//!
//! Inject an [`Arc<dyn PublishProgressCallback>`] via
//! [`crate::config::PublishConfigBuilder::progress_callback`] to receive
//! events as the pipeline copies images and rewrites pages.
//!
//! # Example
//!
//! ```rust
//! use wiki_publish::{PublishConfig, PublishProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     links: AtomicUsize,
//! }
//!
//! impl PublishProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, path: &Path, links_rewritten: usize) {
//!         self.links.fetch_add(links_rewritten, Ordering::SeqCst);
//!         eprintln!("published {}", path.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { links: AtomicUsize::new(0) });
//!
//! let config = PublishConfig::builder()
//!     .clone_wiki(false)
//!     .commit(false)
//!     .push(false)
//!     .progress_callback(counter as Arc<dyn PublishProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the publish pipeline as it processes each file.
///
/// Files are processed concurrently, so `on_file_start`,
/// `on_file_complete` and `on_file_error` may be called from different
/// tasks at the same time. All methods have default no-op implementations.
pub trait PublishProgressCallback: Send + Sync {
    /// Called once after discovery, before any file is copied.
    fn on_publish_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before a file is copied or rewritten.
    fn on_file_start(&self, path: &Path) {
        let _ = path;
    }

    /// Called when a file landed in the wiki checkout.
    ///
    /// `links_rewritten` is always 0 for images.
    fn on_file_complete(&self, path: &Path, links_rewritten: usize) {
        let _ = (path, links_rewritten);
    }

    /// Called when a file could not be published.
    fn on_file_error(&self, path: &Path, error: &str) {
        let _ = (path, error);
    }

    /// Called once after every file has been attempted, before git runs.
    fn on_publish_complete(&self, total_files: usize, success_count: usize) {
        let _ = (total_files, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PublishProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PublishConfig`].
pub type ProgressCallback = Arc<dyn PublishProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        starts: AtomicUsize,
        completes: AtomicUsize,
        links: AtomicUsize,
        errors: AtomicUsize,
        completed_total: AtomicUsize,
    }

    impl PublishProgressCallback for TrackingCallback {
        fn on_publish_start(&self, total_files: usize) {
            self.started_total.store(total_files, Ordering::SeqCst);
        }

        fn on_file_start(&self, _path: &Path) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_complete(&self, _path: &Path, links_rewritten: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
            self.links.fetch_add(links_rewritten, Ordering::SeqCst);
        }

        fn on_file_error(&self, _path: &Path, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_publish_complete(&self, _total_files: usize, success_count: usize) {
            self.completed_total.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_publish_start(2);
        cb.on_file_start(Path::new("docs/a.md"));
        cb.on_file_complete(Path::new("docs/a.md"), 3);
        cb.on_file_error(Path::new("docs/b.png"), "copy failed");
        cb.on_publish_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_publish_start(3);
        tracker.on_file_start(Path::new("a.md"));
        tracker.on_file_complete(Path::new("a.md"), 2);
        tracker.on_file_start(Path::new("b.png"));
        tracker.on_file_complete(Path::new("b.png"), 0);
        tracker.on_file_start(Path::new("c.md"));
        tracker.on_file_error(Path::new("c.md"), "read failed");
        tracker.on_publish_complete(3, 2);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.links.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completed_total.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_publish_start(1);
        cb.on_file_complete(Path::new("x.md"), 0);
    }
}
