// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured log events for cache operations.
//!
//! Every event is a `tracing` event named `cache.event` carrying the cache name, the
//! operation, the activity that was observed and the number of keys involved. Swallowed
//! failures are reported separately as `cache.error_swallowed` at warn level.

use freshet_tier::Error;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheOperation {
    Get,
    GetMany,
    Set,
    SetMany,
    Has,
    Delete,
    DeleteMany,
    Clear,
    Revalidate,
    RevalidateBatch,
}

impl CacheOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "cache.get",
            Self::GetMany => "cache.get_many",
            Self::Set => "cache.set",
            Self::SetMany => "cache.set_many",
            Self::Has => "cache.has",
            Self::Delete => "cache.delete",
            Self::DeleteMany => "cache.delete_many",
            Self::Clear => "cache.clear",
            Self::Revalidate => "cache.revalidate",
            Self::RevalidateBatch => "cache.revalidate_batch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheActivity {
    Hit,
    Miss,
    Stale,
    Revalidated,
    NotRevalidated,
    Written,
}

impl CacheActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "cache.hit",
            Self::Miss => "cache.miss",
            Self::Stale => "cache.stale",
            Self::Revalidated => "cache.revalidated",
            Self::NotRevalidated => "cache.not_revalidated",
            Self::Written => "cache.written",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Hit | Self::Miss | Self::Written => Severity::Debug,
            Self::Stale | Self::Revalidated | Self::NotRevalidated => Severity::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Debug,
    Info,
}

/// Emits one `cache.event` for an operation on a named cache.
pub(crate) fn emit(cache_name: &'static str, operation: CacheOperation, activity: CacheActivity, key_count: usize) {
    let op = operation.as_str();
    let act = activity.as_str();

    // Tracing levels must be constant, so the macro is expanded once per level.
    macro_rules! emit_event {
        ($level:ident) => {
            tracing::$level!(
                cache.name = cache_name,
                cache.operation = op,
                cache.activity = act,
                cache.key_count = key_count,
                "cache.event"
            )
        };
    }

    match activity.severity() {
        Severity::Info => emit_event!(info),
        Severity::Debug => emit_event!(debug),
    }
}

/// Reports a failure that a fault-tolerant wrapper converted into a neutral result.
pub(crate) fn emit_swallowed(operation: CacheOperation, error: &Error) {
    tracing::warn!(
        cache.operation = operation.as_str(),
        cache.error_kind = error.kind().as_str(),
        error = %error,
        "cache.error_swallowed"
    );
}

#[cfg(test)]
mod tests {
    use freshet_tier::ErrorKind;

    use super::testing::LogCapture;
    use super::*;

    // Field names as they appear in formatted output.
    const CACHE_NAME: &str = "cache.name";
    const CACHE_OPERATION_NAME: &str = "cache.operation";
    const CACHE_ACTIVITY_NAME: &str = "cache.activity";
    const CACHE_KEY_COUNT_NAME: &str = "cache.key_count";
    const CACHE_EVENT_NAME: &str = "cache.event";
    const CACHE_ERROR_SWALLOWED_NAME: &str = "cache.error_swallowed";

    #[test]
    fn activity_severity() {
        assert_eq!(CacheActivity::Hit.severity(), Severity::Debug);
        assert_eq!(CacheActivity::Miss.severity(), Severity::Debug);
        assert_eq!(CacheActivity::Written.severity(), Severity::Debug);
        assert_eq!(CacheActivity::Stale.severity(), Severity::Info);
        assert_eq!(CacheActivity::Revalidated.severity(), Severity::Info);
        assert_eq!(CacheActivity::NotRevalidated.severity(), Severity::Info);
    }

    #[test]
    fn operation_names_are_namespaced() {
        assert_eq!(CacheOperation::GetMany.as_str(), "cache.get_many");
        assert_eq!(CacheOperation::RevalidateBatch.as_str(), "cache.revalidate_batch");
    }

    #[test]
    fn emit_contains_all_fields_and_values() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        emit("users", CacheOperation::GetMany, CacheActivity::Revalidated, 3);

        capture.assert_contains(CACHE_NAME);
        capture.assert_contains(CACHE_OPERATION_NAME);
        capture.assert_contains(CACHE_ACTIVITY_NAME);
        capture.assert_contains(CACHE_KEY_COUNT_NAME);
        capture.assert_contains(CACHE_EVENT_NAME);
        capture.assert_contains("users");
        capture.assert_contains("cache.get_many");
        capture.assert_contains("cache.revalidated");
        capture.assert_contains("INFO");
    }

    #[test]
    fn debug_events_are_filtered_by_level() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber_at(tracing::Level::INFO));

        emit("users", CacheOperation::Get, CacheActivity::Hit, 1);
        emit("users", CacheOperation::Get, CacheActivity::Stale, 1);

        capture.assert_not_contains("cache.hit");
        capture.assert_contains("cache.stale");
    }

    #[test]
    fn swallowed_errors_are_warnings() {
        let capture = LogCapture::new();
        let _guard = tracing::subscriber::set_default(capture.subscriber());

        emit_swallowed(CacheOperation::Delete, &Error::store("backend down"));

        capture.assert_contains("WARN");
        capture.assert_contains(CACHE_ERROR_SWALLOWED_NAME);
        capture.assert_contains("cache.delete");
        capture.assert_contains(ErrorKind::Store.as_str());
        capture.assert_contains("backend down");
    }
}
