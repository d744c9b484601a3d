//! The process-wide default container.
//!
//! Nothing is installed until [`install`] is called, and [`reset`] tears the
//! handle down again. Code that can take a `&Container` should prefer that.

use crate::container::Container;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

static DEFAULT_CONTAINER: Lazy<RwLock<Option<Arc<Container>>>> = Lazy::new(|| RwLock::new(None));

/// Installs `container` as the default. Returns the previous one, if any.
///
/// # Examples
///
/// ```
/// use fibre_container::{global, Container};
/// use std::sync::Arc;
///
/// let container = Arc::new(Container::new());
/// container.set_value("greeting", String::from("Hello from the default container!")).unwrap();
/// global::install(container);
///
/// let greeting = global::current().unwrap().get_as::<String>("greeting").unwrap();
/// assert_eq!(*greeting, "Hello from the default container!");
/// ```
pub fn install(container: Arc<Container>) -> Option<Arc<Container>> {
  tracing::debug!("installing default container");
  DEFAULT_CONTAINER.write().replace(container)
}

/// The installed default container, if any.
pub fn current() -> Option<Arc<Container>> {
  DEFAULT_CONTAINER.read().clone()
}

/// Returns the default container, installing an empty one first if needed.
pub fn get_or_install() -> Arc<Container> {
  if let Some(container) = current() {
    return container;
  }
  let mut slot = DEFAULT_CONTAINER.write();
  slot.get_or_insert_with(|| Arc::new(Container::new())).clone()
}

/// Removes the default container and returns it.
pub fn reset() -> Option<Arc<Container>> {
  tracing::debug!("resetting default container");
  DEFAULT_CONTAINER.write().take()
}
