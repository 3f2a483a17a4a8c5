//! Background OBJ loading.
//!
//! Each requested identifier gets its own loader thread. Threads report
//! through one channel in whatever order they finish; [`PendingLoads`]
//! drains the channel into a [`LoadBarrier`] and hands back the finished
//! [`GeometryPool`] once, after every request has reported.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::JoinHandle;

use super::barrier::LoadBarrier;
use super::obj::load_obj_file;
use super::{GeometryAsset, GeometryPool};
use crate::error::RingfieldError;

/// What one loader thread reports back.
struct LoadReport {
    /// Position in the request list.
    order: usize,
    name: String,
    result: Result<Vec<GeometryAsset>, RingfieldError>,
}

/// Loads `<dir>/<name>.obj` for a list of identifiers.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    dir: PathBuf,
    names: Vec<String>,
}

impl AssetLoader {
    /// Loader for `names` resolved against `dir`.
    pub fn new(dir: impl Into<PathBuf>, names: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            names,
        }
    }

    /// Path an identifier resolves to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.obj"))
    }

    /// Identifiers in request order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Start one loader thread per identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RingfieldError::ThreadSpawn`] if a thread cannot be
    /// created. Threads spawned before the failure finish on their own.
    pub fn spawn(&self) -> Result<PendingLoads, RingfieldError> {
        let (tx, rx) = mpsc::channel::<LoadReport>();
        let mut threads = Vec::with_capacity(self.names.len());

        for (order, name) in self.names.iter().enumerate() {
            let tx = tx.clone();
            let name = name.clone();
            let path = self.path_for(&name);
            let handle = std::thread::Builder::new()
                .name(format!("asset-loader-{name}"))
                .spawn(move || {
                    let result = load_obj_file(&name, &path);
                    let _ = tx.send(LoadReport {
                        order,
                        name,
                        result,
                    });
                })
                .map_err(RingfieldError::ThreadSpawn)?;
            threads.push(handle);
        }

        log::info!(
            "loading {} assets from {}",
            self.names.len(),
            self.dir.display()
        );

        Ok(PendingLoads {
            rx,
            barrier: LoadBarrier::new(self.names.len()),
            threads,
        })
    }

    /// Load everything on the calling thread's behalf and block until done.
    ///
    /// # Errors
    ///
    /// Same as [`AssetLoader::spawn`].
    pub fn load_blocking(&self) -> Result<GeometryPool, RingfieldError> {
        Ok(self.spawn()?.wait())
    }
}

/// In-flight loads started by [`AssetLoader::spawn`].
pub struct PendingLoads {
    rx: mpsc::Receiver<LoadReport>,
    barrier: LoadBarrier<(usize, Vec<GeometryAsset>)>,
    threads: Vec<JoinHandle<()>>,
}

impl PendingLoads {
    /// Loads that have not reported yet.
    pub fn pending(&self) -> usize {
        self.barrier.pending()
    }

    /// `true` once the pool has been handed out.
    pub fn is_finished(&self) -> bool {
        self.barrier.is_released()
    }

    /// Drain finished loads without blocking.
    ///
    /// Returns the pool exactly once: on the call that observes the last
    /// report (or immediately, when nothing was requested).
    pub fn poll(&mut self) -> Option<GeometryPool> {
        if let Some(done) = self.barrier.take_ready() {
            return Some(self.finish(done));
        }
        loop {
            match self.rx.try_recv() {
                Ok(report) => {
                    if let Some(done) = self.record(report) {
                        return Some(self.finish(done));
                    }
                }
                Err(mpsc::TryRecvError::Empty) => return None,
                Err(mpsc::TryRecvError::Disconnected) => {
                    return self.abandon();
                }
            }
        }
    }

    /// Block until every load has reported and return the pool.
    ///
    /// If the pool was already handed out by [`PendingLoads::poll`], returns
    /// an empty pool.
    pub fn wait(mut self) -> GeometryPool {
        if let Some(done) = self.barrier.take_ready() {
            return self.finish(done);
        }
        while !self.barrier.is_released() {
            match self.rx.recv() {
                Ok(report) => {
                    if let Some(done) = self.record(report) {
                        return self.finish(done);
                    }
                }
                Err(mpsc::RecvError) => {
                    return self.abandon().unwrap_or_default();
                }
            }
        }
        GeometryPool::default()
    }

    fn record(
        &mut self,
        report: LoadReport,
    ) -> Option<Vec<(usize, Vec<GeometryAsset>)>> {
        match report.result {
            Ok(assets) => {
                log::debug!(
                    "loaded '{}' ({} sub-parts)",
                    report.name,
                    assets.len()
                );
                self.barrier.arrive(Some((report.order, assets)))
            }
            Err(e) => {
                log::warn!("skipping asset: {e}");
                self.barrier.arrive(None)
            }
        }
    }

    fn abandon(&mut self) -> Option<GeometryPool> {
        if self.barrier.is_released() {
            return None;
        }
        log::warn!(
            "{} asset loader(s) exited without reporting",
            self.barrier.pending()
        );
        let done = self.barrier.abandon()?;
        Some(self.finish(done))
    }

    /// Order results by request position so indexed selection does not
    /// depend on which thread finished first.
    fn finish(
        &mut self,
        mut done: Vec<(usize, Vec<GeometryAsset>)>,
    ) -> GeometryPool {
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
        done.sort_by_key(|(order, _)| *order);
        let pool = GeometryPool::new(
            done.into_iter().flat_map(|(_, assets)| assets).collect(),
        );
        log::info!(
            "asset loading complete: {} geometries, {} failed",
            pool.len(),
            self.barrier.failed()
        );
        pool
    }
}

/// `true` if `dir` exists and holds at least one `.obj` file.
pub fn has_obj_files(dir: &Path) -> bool {
    std::fs::read_dir(dir).is_ok_and(|entries| {
        entries
            .flatten()
            .any(|e| e.path().extension().is_some_and(|ext| ext == "obj"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn write_obj(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(format!("{name}.obj")), body).unwrap();
    }

    #[test]
    fn pool_follows_request_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c", "a", "b"] {
            write_obj(dir.path(), name, TRIANGLE);
        }
        let loader = AssetLoader::new(
            dir.path(),
            vec!["c".into(), "a".into(), "b".into()],
        );
        let pool = loader.load_blocking().unwrap();
        assert_eq!(pool.names(), vec!["c", "a", "b"]);
    }

    #[test]
    fn failed_assets_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_obj(dir.path(), "good", TRIANGLE);
        write_obj(dir.path(), "broken", "v 0 0 0\n");
        let loader = AssetLoader::new(
            dir.path(),
            vec!["missing".into(), "good".into(), "broken".into()],
        );
        let pool = loader.load_blocking().unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.names(), vec!["good"]);
    }

    #[test]
    fn no_requests_completes_immediately() {
        let loader = AssetLoader::new("unused", Vec::new());
        let mut pending = loader.spawn().unwrap();
        let pool = pending.poll().unwrap();
        assert!(pool.is_empty());
        assert!(pending.is_finished());
        assert!(pending.poll().is_none());
    }

    #[test]
    fn poll_hands_out_pool_once() {
        let dir = tempfile::tempdir().unwrap();
        write_obj(dir.path(), "one", TRIANGLE);
        write_obj(dir.path(), "two", TRIANGLE);
        let loader =
            AssetLoader::new(dir.path(), vec!["one".into(), "two".into()]);
        let mut pending = loader.spawn().unwrap();

        let mut pool = None;
        for _ in 0..10_000 {
            if let Some(p) = pending.poll() {
                pool = Some(p);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert_eq!(pool.unwrap().len(), 2);
        assert_eq!(pending.pending(), 0);
        assert!(pending.poll().is_none());
    }

    #[test]
    fn detects_obj_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_obj_files(dir.path()));
        write_obj(dir.path(), "x", TRIANGLE);
        assert!(has_obj_files(dir.path()));
        assert!(!has_obj_files(Path::new("/nonexistent/dir")));
    }
}
