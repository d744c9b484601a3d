//! The main `Container` struct and its associated methods.

use crate::config::ServicesConfig;
use crate::core::{next_container_id, BuildClaim, BuildSlot, Instance, ResolutionGuard, Target, TypeKey};
use crate::error::{ContainerError, Result};
use crate::injectable::Injectable;
use crate::params::Overrides;
use crate::resolver::Resolver;
use crate::service::{RawService, Service, ServiceLogic};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

// A registered descriptor plus its shared-instance cache. The sharing flag
// and the provided type are read once at registration.
struct Entry {
  service: Box<dyn Service>,
  shared: bool,
  provides: TypeKey,
  cache: OnceCell<Instance>,
}

/// A snapshot of one registration, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
  pub name: String,
  pub shared: bool,
  pub type_name: &'static str,
  pub parameters: Vec<String>,
  pub cached: bool,
}

/// The dependency injection container.
///
/// Maps service names to descriptors. It is thread-safe: services can be
/// registered and resolved from any thread, and a shared service is built
/// at most once even when several threads ask for it at the same time.
pub struct Container {
  id: u64,
  services: DashMap<String, Arc<Entry>>,
}

impl Default for Container {
  fn default() -> Self {
    Self {
      id: next_container_id(),
      services: DashMap::new(),
    }
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("id", &self.id)
      .field("services", &self.service_names())
      .finish()
  }
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- Registration ---

  /// Registers a service under its own name. A previous registration with
  /// the same name, and any instance it cached, is replaced.
  pub fn add(&self, service: impl Service) -> Result<()> {
    self.add_boxed(Box::new(service))
  }

  pub fn add_boxed(&self, service: Box<dyn Service>) -> Result<()> {
    let name = service.name().to_owned();
    if name.is_empty() {
      return Err(ContainerError::EmptyServiceName);
    }
    let entry = Entry {
      shared: service.is_shared(),
      provides: service.provides(),
      service,
      cache: OnceCell::new(),
    };
    tracing::debug!(
      service = %name,
      shared = entry.shared,
      provides = entry.provides.name(),
      "registering service"
    );
    if self.services.insert(name.clone(), Arc::new(entry)).is_some() {
      tracing::debug!(service = %name, "replaced an existing registration");
    }
    Ok(())
  }

  /// Registers ad-hoc resolution logic under `name`.
  pub fn set(&self, name: impl Into<String>, logic: ServiceLogic, shared: bool) -> Result<()> {
    self.add(RawService::new(name, shared, logic))
  }

  /// Registers a ready value as a shared service.
  pub fn set_value<T: Any + Send + Sync + Clone>(&self, name: impl Into<String>, value: T) -> Result<()> {
    self.set(name, ServiceLogic::literal(value), true)
  }

  pub fn set_factory<T, F>(&self, name: impl Into<String>, shared: bool, factory: F) -> Result<()>
  where
    T: Any + Send + Sync,
    F: Fn() -> T + Send + Sync + 'static,
  {
    self.set(name, ServiceLogic::factory(factory), shared)
  }

  pub fn set_container_factory<T, F>(
    &self,
    name: impl Into<String>,
    shared: bool,
    factory: F,
  ) -> Result<()>
  where
    T: Any + Send + Sync,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
  {
    self.set(name, ServiceLogic::container_factory(factory), shared)
  }

  pub fn set_class<T: Injectable>(&self, name: impl Into<String>, shared: bool) -> Result<()> {
    self.set(name, ServiceLogic::class::<T>(), shared)
  }

  /// Registers every service of a YAML document. Returns how many were
  /// registered.
  pub fn load_yaml(&self, yaml: &str) -> Result<usize> {
    ServicesConfig::from_yaml_str(yaml)?.apply(self)
  }

  pub fn load_yaml_file(&self, path: impl AsRef<Path>) -> Result<usize> {
    ServicesConfig::from_yaml_file(path)?.apply(self)
  }

  /// Removes a registration. Returns `false` if nothing was registered.
  pub fn remove(&self, name: &str) -> bool {
    let removed = self.services.remove(name).is_some();
    if removed {
      tracing::debug!(service = %name, "removed service");
    }
    removed
  }

  // --- Inspection ---

  pub fn has(&self, name: &str) -> bool {
    self.services.contains_key(name)
  }

  /// Names of all registered services, sorted.
  pub fn service_names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.services.iter().map(|e| e.key().clone()).collect();
    names.sort();
    names
  }

  pub fn describe(&self, name: &str) -> Option<ServiceInfo> {
    let entry = self.entry(name).ok()?;
    Some(ServiceInfo {
      name: name.to_owned(),
      shared: entry.shared,
      type_name: entry.provides.name(),
      parameters: entry
        .service
        .parameters()
        .iter()
        .map(|p| p.name().to_owned())
        .collect(),
      cached: entry.cache.get().is_some(),
    })
  }

  /// Returns a resolver bound to this container.
  pub fn resolver(&self) -> Resolver<'_> {
    Resolver::new(self)
  }

  // --- Resolution ---

  /// Resolves a service by name.
  ///
  /// A shared service is built on first use and the same instance is
  /// returned afterwards. A non-shared service is built on every call.
  pub fn get(&self, name: &str) -> Result<Instance> {
    self.resolve_named(name, None)
  }

  /// Resolves a service by name and downcasts it to `T`.
  pub fn get_as<T: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    self
      .get(name)?
      .downcast_or_err::<T>(&format!("service '{}'", name))
  }

  pub(crate) fn id(&self) -> u64 {
    self.id
  }

  pub(crate) fn provided_type(&self, name: &str) -> Option<TypeKey> {
    self.services.get(name).map(|e| e.provides)
  }

  /// Names of the services declaring `key`, minus those being resolved
  /// further up this thread's stack. Sorted.
  pub(crate) fn candidates_for(&self, key: TypeKey) -> Vec<String> {
    let mut names: Vec<String> = self
      .services
      .iter()
      .filter(|e| e.provides == key)
      .map(|e| e.key().clone())
      .filter(|name| !ResolutionGuard::is_resolving(self.id, name))
      .collect();
    names.sort();
    names
  }

  pub(crate) fn resolve_named(&self, name: &str, overrides: Option<&Overrides>) -> Result<Instance> {
    let entry = self.entry(name)?;
    let bypass_cache = overrides.is_some_and(|o| !o.is_empty());

    if entry.shared && !bypass_cache {
      if let Some(instance) = entry.cache.get() {
        tracing::trace!(service = %name, "cache hit");
        return Ok(instance.clone());
      }
      // Same-thread re-entry must fail here, before the build is claimed.
      let _guard = ResolutionGuard::enter(self.id, Target::Service(name.to_owned()))?;
      return self.build_shared(name, &entry);
    }

    let _guard = ResolutionGuard::enter(self.id, Target::Service(name.to_owned()))?;
    self.build(name, &entry, overrides)
  }

  // --- PRIVATE HELPERS ---

  // Clones the entry out so no map guard is held while factories run.
  fn entry(&self, name: &str) -> Result<Arc<Entry>> {
    self
      .services
      .get(name)
      .map(|e| Arc::clone(e.value()))
      .ok_or_else(|| ContainerError::ServiceNotFound {
        name: name.to_owned(),
      })
  }

  // Builds a shared service at most once. Concurrent callers wait for the
  // owning thread; a failed build is not cached, so a waiter retries it.
  fn build_shared(&self, name: &str, entry: &Entry) -> Result<Instance> {
    loop {
      if let Some(instance) = entry.cache.get() {
        return Ok(instance.clone());
      }
      match BuildSlot::claim(self.id, name)? {
        BuildClaim::Owner(_slot) => {
          if let Some(instance) = entry.cache.get() {
            return Ok(instance.clone());
          }
          let instance = self.build(name, entry, None)?;
          return Ok(entry.cache.get_or_init(|| instance).clone());
        }
        BuildClaim::Released => {}
      }
    }
  }

  fn build(&self, name: &str, entry: &Entry, overrides: Option<&Overrides>) -> Result<Instance> {
    tracing::trace!(service = %name, "building service");
    let parameters = entry.service.parameters();
    let empty = Overrides::new();
    let args = self
      .resolver()
      .resolve_arguments(name, &parameters, overrides.unwrap_or(&empty))?;
    let instance = entry.service.resolve(self, &args)?;
    if instance.type_key() != entry.provides {
      return Err(ContainerError::TypeMismatch {
        what: format!("service '{}'", name),
        expected: entry.provides.name(),
        found: instance.type_name(),
      });
    }
    Ok(instance)
  }
}
