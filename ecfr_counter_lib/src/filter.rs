//! Change detection: decides whether a reference needs a fresh count.

use crate::cache::AmendmentCache;

/// Returns `true` when `latest_amended_on` is non-empty and differs from the
/// date cached under `key` (or nothing is cached yet).
///
/// Never mutates the cache. The cache entry is only advanced after a
/// successful count, so a failed fetch is retried on the next run.
pub fn should_recount(cache: &AmendmentCache, key: &str, latest_amended_on: &str) -> bool {
    if latest_amended_on.is_empty() {
        return false;
    }
    cache.get(key).as_deref() != Some(latest_amended_on)
}
