//! Typed registration tokens

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased shared service instance as stored by the registry
pub type ServiceRef = Arc<dyn Any + Send + Sync>;

/// Token returned by every registration, carrying the service's type
///
/// Resolving through a handle cannot hit a type mismatch unless the name was
/// later re-registered with a different type, in which case the lookup
/// reports [`Error::TypeMismatch`](volt_domain::Error::TypeMismatch).
pub struct ServiceHandle<T> {
    name: Arc<str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ServiceHandle<T> {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            _marker: PhantomData,
        }
    }

    /// Name the service was registered under
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for ServiceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ServiceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> PartialEq for ServiceHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for ServiceHandle<T> {}
