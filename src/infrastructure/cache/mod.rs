//! Cache infrastructure - Local and distributed cache implementations

mod factory;
mod in_memory;
mod memory;
mod redis;

pub use factory::{DistributedCacheConfig, DistributedCacheFactory, DistributedCacheType};
pub use in_memory::InMemoryDistributedCache;
pub use memory::{MemoryCache, MemoryCacheConfig};
pub use self::redis::{RedisCacheConfig, RedisDistributedCache};
