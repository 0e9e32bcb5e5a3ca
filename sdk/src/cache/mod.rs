//! Project list cache.
//!
//! Holds the project registry once it has been fetched. Concurrent callers
//! that arrive while a fetch is running await the same future instead of
//! starting their own. A failed fetch leaves the cache empty so the next call
//! tries again.

use futures::future::{BoxFuture, FutureExt, Shared};
use once_cell::sync::Lazy;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::ProjectsResult;
use crate::models::ProjectRecord;

/// Cache shared by every client pointed at the default registry URL.
pub static DEFAULT_PROJECT_CACHE: Lazy<Arc<ProjectCache>> = Lazy::new(|| Arc::new(ProjectCache::new()));

pub type ProjectList = Arc<Vec<ProjectRecord>>;

type SharedFetch = Shared<BoxFuture<'static, ProjectsResult<ProjectList>>>;

enum CacheState {
    Empty,
    Pending(SharedFetch),
    Ready(ProjectList),
}

/// Memoized project list with in-flight coalescing.
pub struct ProjectCache {
    state: Mutex<CacheState>,
}

impl ProjectCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CacheState::Empty),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached list, if a fetch has completed.
    pub fn get(&self) -> Option<ProjectList> {
        match &*self.lock() {
            CacheState::Ready(projects) => Some(projects.clone()),
            _ => None,
        }
    }

    /// Store a list directly. A running fetch is detached and its result
    /// discarded.
    pub fn set(&self, projects: Vec<ProjectRecord>) {
        *self.lock() = CacheState::Ready(Arc::new(projects));
    }

    pub fn reset(&self) {
        *self.lock() = CacheState::Empty;
    }

    pub fn is_pending(&self) -> bool {
        matches!(&*self.lock(), CacheState::Pending(_))
    }

    /// Return the cached list, or run `fetch` once and share its outcome with
    /// every caller waiting on it.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> ProjectsResult<ProjectList>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProjectsResult<Vec<ProjectRecord>>> + Send + 'static,
    {
        let shared = {
            let mut state = self.lock();
            let in_flight = match &*state {
                CacheState::Ready(projects) => return Ok(projects.clone()),
                CacheState::Pending(running) => Some(running.clone()),
                CacheState::Empty => None,
            };
            match in_flight {
                Some(running) => running,
                None => {
                    let running = fetch().map(|r| r.map(Arc::new)).boxed().shared();
                    *state = CacheState::Pending(running.clone());
                    running
                }
            }
        };

        let result = shared.clone().await;

        let mut state = self.lock();
        let still_current = matches!(&*state, CacheState::Pending(running) if running.ptr_eq(&shared));
        if still_current {
            *state = match &result {
                Ok(projects) => CacheState::Ready(projects.clone()),
                Err(_) => CacheState::Empty,
            };
        }
        result
    }
}

impl Default for ProjectCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProjectCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.lock() {
            CacheState::Empty => "empty".to_string(),
            CacheState::Pending(_) => "pending".to_string(),
            CacheState::Ready(projects) => format!("{} projects", projects.len()),
        };
        f.debug_struct("ProjectCache").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectsError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn projects() -> Vec<ProjectRecord> {
        vec![ProjectRecord::new("growthepie"), ProjectRecord::new("uniswap")]
    }

    #[tokio::test]
    async fn test_fetch_once_then_cached() {
        let cache = ProjectCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            let list = cache
                .get_or_fetch(move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(projects())
                })
                .await
                .unwrap();
            assert_eq!(list.len(), 2);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.get().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let cache = Arc::new(ProjectCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_fetch(move || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            Ok(projects())
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().len(), 2);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = ProjectCache::new();

        let failed = cache
            .get_or_fetch(|| async { Err(ProjectsError::Status(503)) })
            .await;
        assert!(matches!(failed, Err(ProjectsError::Status(503))));
        assert!(cache.get().is_none());
        assert!(!cache.is_pending());

        let ok = cache.get_or_fetch(|| async { Ok(projects()) }).await.unwrap();
        assert_eq!(ok.len(), 2);
    }

    #[tokio::test]
    async fn test_set_and_reset() {
        let cache = ProjectCache::new();
        cache.set(projects());
        assert_eq!(cache.get().unwrap().len(), 2);

        // cached value wins over a new fetch
        let list = cache.get_or_fetch(|| async { Ok(Vec::new()) }).await.unwrap();
        assert_eq!(list.len(), 2);

        cache.reset();
        assert!(cache.get().is_none());
        assert!(format!("{:?}", cache).contains("empty"));
    }
}
