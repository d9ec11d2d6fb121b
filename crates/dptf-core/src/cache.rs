//! Explicitly invalidated caches over expensive hardware reads.
//!
//! A [`CachedProperty`] never refetches on its own: the first `get` fetches,
//! later calls return the stored value until `invalidate` or `refresh`.
//! Access goes through `&mut self`, so at most one fetch is ever in flight
//! for a given property.

use dptf_common::Result;

#[derive(Debug, Clone)]
pub struct CachedProperty<T> {
    value: Option<T>,
    valid: bool,
    fetch_count: u64,
}

impl<T> Default for CachedProperty<T> {
    fn default() -> Self {
        Self {
            value: None,
            valid: false,
            fetch_count: 0,
        }
    }
}

impl<T> CachedProperty<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value, fetching first if the cache is empty or invalidated.
    pub fn get<F>(&mut self, fetch: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        let value = match self.value.take() {
            Some(value) if self.valid => value,
            stale => match fetch() {
                Ok(value) => {
                    self.valid = true;
                    self.fetch_count += 1;
                    value
                }
                Err(err) => {
                    self.value = stale;
                    return Err(err);
                }
            },
        };
        Ok(self.value.insert(value))
    }

    /// Mark the value stale. Storage is retained until the next fetch
    /// succeeds.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Fetch unconditionally and store the result.
    ///
    /// On failure the property is left invalid so the next `get` retries.
    pub fn refresh<F>(&mut self, fetch: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        self.valid = false;
        self.get(fetch)
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of successful fetches so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count
    }
}
