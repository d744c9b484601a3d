//! Parameter manifests, caller overrides and resolved argument lists.
//!
//! Rust has no runtime reflection, so anything the resolver builds or invokes
//! declares its formal parameters up front as a list of [`Parameter`]s.

use crate::core::{Instance, TypeKey};
use crate::error::{ContainerError, Result};
use crate::injectable::Injectable;
use crate::resolver::Resolver;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub(crate) type AutowireFn = for<'a, 'c> fn(&'a Resolver<'c>) -> Result<Instance>;

/// One formal parameter of a constructor, method or service factory.
#[derive(Clone)]
pub struct Parameter {
  name: String,
  type_key: Option<TypeKey>,
  default: Option<Instance>,
  autowire: Option<AutowireFn>,
}

impl Parameter {
  /// A parameter declaring the type `T`. It takes part in type-hint matching.
  pub fn of<T: ?Sized + Any>(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      type_key: Some(TypeKey::of::<T>()),
      default: None,
      autowire: None,
    }
  }

  /// A parameter without a declared type. It can only be matched by name,
  /// an override or its default.
  pub fn untyped(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      type_key: None,
      default: None,
      autowire: None,
    }
  }

  /// A parameter of type `T` that, when no registered service matches, is
  /// built on the spot through [`Resolver::typehint_class`].
  pub fn autowire<T: Injectable>(name: impl Into<String>) -> Self {
    Self {
      autowire: Some(autowire_class::<T>),
      ..Self::of::<T>(name)
    }
  }

  pub fn with_default<T: Any + Send + Sync>(self, value: T) -> Self {
    self.with_default_instance(Instance::new(value))
  }

  pub fn with_default_instance(mut self, value: Instance) -> Self {
    self.default = Some(value);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn type_key(&self) -> Option<TypeKey> {
    self.type_key
  }

  pub fn default_value(&self) -> Option<&Instance> {
    self.default.as_ref()
  }

  pub(crate) fn autowire_fn(&self) -> Option<AutowireFn> {
    self.autowire
  }

  /// True if a value of `key` may be passed for this parameter.
  pub(crate) fn accepts(&self, key: TypeKey) -> bool {
    self.type_key.map_or(true, |declared| declared == key)
  }
}

impl fmt::Debug for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Parameter")
      .field("name", &self.name)
      .field("type", &self.type_key.map(|k| k.name()))
      .field("has_default", &self.default.is_some())
      .field("autowire", &self.autowire.is_some())
      .finish()
  }
}

fn autowire_class<T: Injectable>(resolver: &Resolver<'_>) -> Result<Instance> {
  resolver.typehint_class::<T>().map(Instance::new)
}

/// Explicit arguments supplied by the caller, by position or by name.
///
/// A positional override wins over a named one for the same parameter.
#[derive(Clone, Default)]
pub struct Overrides {
  positional: HashMap<usize, Instance>,
  named: HashMap<String, Instance>,
}

impl Overrides {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn at<T: Any + Send + Sync>(self, position: usize, value: T) -> Self {
    self.at_instance(position, Instance::new(value))
  }

  pub fn at_instance(mut self, position: usize, value: Instance) -> Self {
    self.positional.insert(position, value);
    self
  }

  pub fn named<T: Any + Send + Sync>(self, name: impl Into<String>, value: T) -> Self {
    self.named_instance(name, Instance::new(value))
  }

  pub fn named_instance(mut self, name: impl Into<String>, value: Instance) -> Self {
    self.named.insert(name.into(), value);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.positional.is_empty() && self.named.is_empty()
  }

  pub(crate) fn lookup(&self, position: usize, name: &str) -> Option<&Instance> {
    self
      .positional
      .get(&position)
      .or_else(|| self.named.get(name))
  }
}

/// The resolved arguments handed to a constructor, method or factory, in
/// declared order.
#[derive(Clone, Debug)]
pub struct Arguments {
  target: String,
  values: Vec<(String, Instance)>,
}

impl Arguments {
  pub(crate) fn new(target: impl Into<String>, values: Vec<(String, Instance)>) -> Self {
    Self {
      target: target.into(),
      values,
    }
  }

  /// An empty argument list, for invoking logic that declares no parameters.
  pub fn empty(target: impl Into<String>) -> Self {
    Self::new(target, Vec::new())
  }

  pub fn target(&self) -> &str {
    &self.target
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
    self.values.iter().map(|(name, value)| (name.as_str(), value))
  }

  /// The argument supplied for `name`, without a type check.
  pub fn instance(&self, name: &str) -> Result<Instance> {
    self
      .values
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, value)| value.clone())
      .ok_or_else(|| self.missing(name, self.values.len()))
  }

  /// The argument supplied for `name`, downcast to `T`.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    self
      .instance(name)?
      .downcast_or_err::<T>(&format!("parameter '{}' of '{}'", name, self.target))
  }

  /// The argument at `position`, downcast to `T`.
  pub fn at<T: ?Sized + Any + Send + Sync>(&self, position: usize) -> Result<Arc<T>> {
    let (name, value) = self
      .values
      .get(position)
      .ok_or_else(|| self.missing("<positional>", position))?;
    value.downcast_or_err::<T>(&format!("parameter '{}' of '{}'", name, self.target))
  }

  fn missing(&self, name: &str, position: usize) -> ContainerError {
    ContainerError::UnresolvableParameter {
      target: self.target.clone(),
      parameter: name.to_owned(),
      position,
    }
  }
}
