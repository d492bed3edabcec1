use {
    serde::{Deserialize, Serialize},
    std::sync::Arc,
};

/// Owner-mutable configuration. Readers take an immutable snapshot and keep
/// it for the duration of one operation; writers replace the whole value and
/// bump the version.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    version: u64,
    value: Arc<T>,
}

impl<T> Versioned<T> {
    pub fn new(value: T) -> Self {
        Self {
            version: 0,
            value: Arc::new(value),
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn snapshot(&self) -> Arc<T> {
        self.value.clone()
    }
}

impl<T> Versioned<T>
where
    T: Clone,
{
    pub fn update<F>(&mut self, action: F) -> &T
    where
        F: FnOnce(&mut T),
    {
        let mut value = T::clone(&self.value);
        action(&mut value);

        self.value = Arc::new(value);
        self.version += 1;

        &self.value
    }
}

/// Serialized as `{ "version": .., "value": .. }` for query responses.
impl<T> Serialize for Versioned<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        struct Repr<'a, T> {
            version: u64,
            value: &'a T,
        }

        Repr {
            version: self.version,
            value: self.value.as_ref(),
        }
        .serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Versioned<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr<T> {
            version: u64,
            value: T,
        }

        let repr = Repr::<T>::deserialize(deserializer)?;

        Ok(Self {
            version: repr.version,
            value: Arc::new(repr.value),
        })
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_survives_update() {
        let mut config = Versioned::new(vec![1, 2]);
        let snapshot = config.snapshot();

        config.update(|v| v.push(3));

        assert_eq!(*snapshot, vec![1, 2]);
        assert_eq!(config.get(), &vec![1, 2, 3]);
        assert_eq!(config.version(), 1);
    }
}
