//! Redis key-value store.
//!
//! Stores each key as a JSON string under `{prefix}{key}` with plain
//! `GET`/`SET`.

#[cfg(feature = "redis")]
mod implementation {
    use crate::Result;
    use crate::storage::store::{KvStore, unavailable};
    use redis::{Client, Commands, Connection};
    use serde_json::Value;

    /// Redis-backed key-value store.
    pub struct RedisKvStore {
        /// Redis client.
        client: Client,
        /// Prefix prepended to every key.
        prefix: String,
    }

    impl RedisKvStore {
        /// Creates a new Redis store.
        ///
        /// # Errors
        ///
        /// Returns an error if the URL is invalid.
        pub fn new(connection_url: &str, prefix: impl Into<String>) -> Result<Self> {
            let client = Client::open(connection_url).map_err(|e| unavailable("redis_connect", e))?;

            Ok(Self {
                client,
                prefix: prefix.into(),
            })
        }

        fn get_connection(&self) -> Result<Connection> {
            self.client
                .get_connection()
                .map_err(|e| unavailable("redis_get_connection", e))
        }

        fn full_key(&self, key: &str) -> String {
            format!("{}{key}", self.prefix)
        }
    }

    impl KvStore for RedisKvStore {
        fn get(&self, key: &str) -> Result<Option<Value>> {
            let mut conn = self.get_connection()?;
            let raw: Option<String> = conn
                .get(self.full_key(key))
                .map_err(|e| unavailable("redis_get", e))?;

            raw.map(|text| serde_json::from_str(&text).map_err(|e| unavailable("redis_parse", e)))
                .transpose()
        }

        fn set(&self, key: &str, value: &Value) -> Result<()> {
            let mut conn = self.get_connection()?;
            let text = value.to_string();
            conn.set::<_, _, ()>(self.full_key(key), text)
                .map_err(|e| unavailable("redis_set", e))
        }

        fn backend_name(&self) -> &'static str {
            "redis"
        }
    }
}

#[cfg(feature = "redis")]
pub use implementation::RedisKvStore;

#[cfg(not(feature = "redis"))]
mod stub {
    use crate::storage::store::KvStore;
    use crate::{Error, Result};
    use serde_json::Value;

    /// Stub Redis store when the feature is not enabled.
    pub struct RedisKvStore;

    impl RedisKvStore {
        /// Creates a new Redis store (stub).
        ///
        /// # Errors
        ///
        /// Always returns an error because the feature is not enabled.
        pub fn new(_connection_url: &str, _prefix: impl Into<String>) -> Result<Self> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }
    }

    impl KvStore for RedisKvStore {
        fn get(&self, _key: &str) -> Result<Option<Value>> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn set(&self, _key: &str, _value: &Value) -> Result<()> {
            Err(Error::FeatureNotEnabled("redis".to_string()))
        }

        fn backend_name(&self) -> &'static str {
            "redis"
        }
    }
}

#[cfg(not(feature = "redis"))]
pub use stub::RedisKvStore;
