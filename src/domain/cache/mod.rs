//! Cache domain - keys, expiration policies, backends and lookup events

mod distributed;
mod events;
mod key;
mod options;

pub use distributed::{DistributedCache, DistributedCacheExt};
pub use events::{CacheEvent, CacheEventSink, CacheOutcome, RecordingEventSink};
pub use key::{CacheKeyBuilder, CacheNamespace, ProductQuery, QueryShape};
pub use options::{CacheEntryOptions, CachePolicies, CachePriority};

#[cfg(test)]
pub use distributed::mock::MockDistributedCache;
