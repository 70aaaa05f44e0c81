//! Values tracked by a backing store.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::store::backed_model::BackedModel;

/// Shared handle to a collection-shaped value.
///
/// Collections are held behind a shared lock so user code can grow them
/// in place while the store still observes the live element count.
pub type CollectionHandle = Arc<RwLock<Vec<StoredValue>>>;

/// A value tracked by a backing store.
///
/// Cloning is O(1): collection and model variants clone an `Arc`.
#[derive(Clone)]
pub enum StoredValue {
    /// Explicitly cleared to absent. Distinct from "never set", which
    /// reads back from the store as `None`.
    Null,
    /// Scalar payload value. Never holds `serde_json::Value::Null`;
    /// the `From` conversions normalize that to [`StoredValue::Null`].
    Scalar(serde_json::Value),
    /// Collection of values, shared with the owning model.
    Collection(CollectionHandle),
    /// Nested backed model.
    Model(Arc<dyn BackedModel>),
}

impl StoredValue {
    /// Build a collection value from plain elements.
    pub fn collection(values: Vec<StoredValue>) -> Self {
        Self::Collection(Arc::new(RwLock::new(values)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => value.as_str(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(value) => value.as_bool(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(value) => value.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(value) => value.as_f64(),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionHandle> {
        match self {
            Self::Collection(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Arc<dyn BackedModel>> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Live element count for collection values, `None` otherwise.
    pub fn collection_len(&self) -> Option<usize> {
        match self {
            Self::Collection(handle) => Some(
                handle
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .len(),
            ),
            _ => None,
        }
    }
}

impl fmt::Debug for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Self::Collection(handle) => {
                let len = handle
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .len();
                f.debug_struct("Collection").field("len", &len).finish()
            }
            Self::Model(_) => f.write_str("Model(..)"),
        }
    }
}

impl From<serde_json::Value> for StoredValue {
    fn from(value: serde_json::Value) -> Self {
        if value.is_null() {
            Self::Null
        } else {
            Self::Scalar(value)
        }
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        Self::Scalar(serde_json::Value::from(value))
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        Self::Scalar(serde_json::Value::from(value))
    }
}

impl From<bool> for StoredValue {
    fn from(value: bool) -> Self {
        Self::Scalar(serde_json::Value::from(value))
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        Self::Scalar(serde_json::Value::from(value))
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        // Non-finite floats have no JSON representation and land on the
        // null marker.
        Self::from(serde_json::Value::from(value))
    }
}
