//! Service descriptors: the units registered into a [`Container`].

use crate::container::Container;
use crate::core::{Instance, TypeKey};
use crate::error::Result;
use crate::injectable::Injectable;
use crate::params::{Arguments, Parameter};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A named unit of construction logic.
///
/// `resolve` must return an instance whose type is `provides()`; the
/// container rejects anything else with a `TypeMismatch`. When `parameters`
/// is not empty the container resolves them before calling `resolve`.
pub trait Service: Send + Sync + 'static {
  fn name(&self) -> &str;

  fn is_shared(&self) -> bool;

  /// The type of the resolved value, used for type-hint matching.
  fn provides(&self) -> TypeKey;

  fn parameters(&self) -> Vec<Parameter> {
    Vec::new()
  }

  fn resolve(&self, container: &Container, args: &Arguments) -> Result<Instance>;
}

type FactoryFn = dyn Fn(&Container, &Arguments) -> Result<Instance> + Send + Sync;
type CloneFn = dyn Fn(&Instance) -> Option<Instance> + Send + Sync;

/// The resolution logic of an ad-hoc service.
#[derive(Clone)]
pub enum ServiceLogic {
  /// A closure, optionally declaring parameters of its own.
  Factory {
    provides: TypeKey,
    parameters: Vec<Parameter>,
    factory: Arc<FactoryFn>,
  },
  /// A type built by the resolver from its constructor manifest.
  Class {
    provides: TypeKey,
    parameters: fn() -> Vec<Parameter>,
    construct: fn(&Arguments) -> Result<Instance>,
  },
  /// A ready value. Non-shared literals hand out fresh clones.
  Literal {
    value: Instance,
    duplicate: Arc<CloneFn>,
  },
}

impl ServiceLogic {
  /// A zero-argument factory.
  pub fn factory<T, F>(factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn() -> T + Send + Sync + 'static,
  {
    Self::Factory {
      provides: TypeKey::of::<T>(),
      parameters: Vec::new(),
      factory: Arc::new(move |_: &Container, _: &Arguments| Ok(Instance::new(factory()))),
    }
  }

  /// A factory receiving the owning container.
  pub fn container_factory<T, F>(factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
  {
    Self::Factory {
      provides: TypeKey::of::<T>(),
      parameters: Vec::new(),
      factory: Arc::new(move |container: &Container, _: &Arguments| {
        factory(container).map(Instance::new)
      }),
    }
  }

  /// A factory producing a trait object, registered under `I` itself.
  pub fn trait_factory<I, F>(factory: F) -> Self
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Container) -> Result<Arc<I>> + Send + Sync + 'static,
  {
    Self::Factory {
      provides: TypeKey::of::<I>(),
      parameters: Vec::new(),
      factory: Arc::new(move |container: &Container, _: &Arguments| {
        factory(container).map(Instance::from_arc)
      }),
    }
  }

  /// A factory declaring its own parameters, resolved like constructor
  /// arguments before each call.
  pub fn with_parameters<T, F>(parameters: Vec<Parameter>, factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Container, &Arguments) -> Result<T> + Send + Sync + 'static,
  {
    Self::Factory {
      provides: TypeKey::of::<T>(),
      parameters,
      factory: Arc::new(move |container: &Container, args: &Arguments| {
        factory(container, args).map(Instance::new)
      }),
    }
  }

  pub fn class<T: Injectable>() -> Self {
    Self::Class {
      provides: TypeKey::of::<T>(),
      parameters: T::parameters,
      construct: construct_class::<T>,
    }
  }

  pub fn literal<T: Any + Send + Sync + Clone>(value: T) -> Self {
    Self::Literal {
      value: Instance::new(value),
      duplicate: Arc::new(|instance: &Instance| {
        instance.downcast::<T>().map(|v| Instance::new((*v).clone()))
      }),
    }
  }

  pub fn provides(&self) -> TypeKey {
    match self {
      ServiceLogic::Factory { provides, .. } | ServiceLogic::Class { provides, .. } => *provides,
      ServiceLogic::Literal { value, .. } => value.type_key(),
    }
  }

  pub fn parameters(&self) -> Vec<Parameter> {
    match self {
      ServiceLogic::Factory { parameters, .. } => parameters.clone(),
      ServiceLogic::Class { parameters, .. } => parameters(),
      ServiceLogic::Literal { .. } => Vec::new(),
    }
  }

  fn invoke(&self, container: &Container, args: &Arguments, shared: bool) -> Result<Instance> {
    match self {
      ServiceLogic::Factory { factory, .. } => factory(container, args),
      ServiceLogic::Class { construct, .. } => construct(args),
      ServiceLogic::Literal { value, .. } if shared => Ok(value.clone()),
      ServiceLogic::Literal { value, duplicate } => {
        Ok(duplicate(value).unwrap_or_else(|| value.clone()))
      }
    }
  }
}

fn construct_class<T: Injectable>(args: &Arguments) -> Result<Instance> {
  T::construct(args).map(Instance::new)
}

impl fmt::Debug for ServiceLogic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ServiceLogic::Factory { provides, .. } => write!(f, "Factory({})", provides.name()),
      ServiceLogic::Class { provides, .. } => write!(f, "Class({})", provides.name()),
      ServiceLogic::Literal { value, .. } => write!(f, "Literal({})", value.type_name()),
    }
  }
}

/// A service assembled from a name, a sharing flag and a [`ServiceLogic`].
///
/// This is what [`Container::set`] registers. It also covers the common
/// "closure taking the container" case:
///
/// ```
/// use fibre_container::{Container, RawService};
///
/// let container = Container::new();
/// container
///   .add(RawService::from_container_fn("example", true, |_| Ok(String::from("hello"))))
///   .unwrap();
///
/// assert!(container.has("example"));
/// assert_eq!(*container.get_as::<String>("example").unwrap(), "hello");
/// ```
#[derive(Debug, Clone)]
pub struct RawService {
  name: String,
  shared: bool,
  logic: ServiceLogic,
}

impl RawService {
  pub fn new(name: impl Into<String>, shared: bool, logic: ServiceLogic) -> Self {
    Self {
      name: name.into(),
      shared,
      logic,
    }
  }

  pub fn from_container_fn<T, F>(name: impl Into<String>, shared: bool, factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
  {
    Self::new(name, shared, ServiceLogic::container_factory(factory))
  }

  pub fn logic(&self) -> &ServiceLogic {
    &self.logic
  }
}

impl Service for RawService {
  fn name(&self) -> &str {
    &self.name
  }

  fn is_shared(&self) -> bool {
    self.shared
  }

  fn provides(&self) -> TypeKey {
    self.logic.provides()
  }

  fn parameters(&self) -> Vec<Parameter> {
    self.logic.parameters()
  }

  fn resolve(&self, container: &Container, args: &Arguments) -> Result<Instance> {
    self.logic.invoke(container, args, self.shared)
  }
}
