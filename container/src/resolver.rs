//! Parameter-by-parameter argument resolution.

use crate::container::Container;
use crate::core::{Instance, ResolutionGuard, Target};
use crate::error::{ContainerError, Result};
use crate::injectable::{Injectable, Method};
use crate::params::{Arguments, Overrides, Parameter};
use std::any::type_name;

/// Builds types, invokes methods and resolves parameterised services on
/// behalf of a [`Container`].
///
/// Each declared parameter is filled, in order, from:
///
/// 1. an override given by position or name;
/// 2. the single registered service declaring the parameter's type (when
///    several do, the one named like the parameter wins, otherwise the call
///    fails with `AmbiguousService`);
/// 3. the service registered under the parameter's name, if its type fits;
/// 4. a fresh autowired instance, for parameters declared with
///    [`Parameter::autowire`];
/// 5. the parameter's default value.
///
/// Anything else is an `UnresolvableParameter` error.
#[derive(Clone, Copy)]
pub struct Resolver<'c> {
  container: &'c Container,
}

impl<'c> Resolver<'c> {
  pub fn new(container: &'c Container) -> Self {
    Self { container }
  }

  pub fn container(&self) -> &'c Container {
    self.container
  }

  /// Constructs `T` from its constructor manifest.
  pub fn typehint_class<T: Injectable>(&self) -> Result<T> {
    self.typehint_class_with::<T>(&Overrides::new())
  }

  pub fn typehint_class_with<T: Injectable>(&self, overrides: &Overrides) -> Result<T> {
    let target = type_name::<T>();
    let _guard = ResolutionGuard::enter(self.container.id(), Target::Class(target))?;
    let args = self.resolve_arguments(target, &T::parameters(), overrides)?;
    T::construct(&args)
  }

  /// Invokes `method` on `target` with resolved arguments.
  pub fn typehint_method<T: ?Sized, R>(&self, target: &T, method: &Method<T, R>) -> Result<R> {
    self.typehint_method_with(target, method, &Overrides::new())
  }

  pub fn typehint_method_with<T: ?Sized, R>(
    &self,
    target: &T,
    method: &Method<T, R>,
    overrides: &Overrides,
  ) -> Result<R> {
    let label = format!("{}::{}", type_name::<T>(), method.name());
    let args = self.resolve_arguments(&label, method.parameters(), overrides)?;
    method.invoke(target, &args)
  }

  /// Resolves a registered service, filling the parameters its own logic
  /// declares.
  pub fn typehint_service(&self, name: &str) -> Result<Instance> {
    self.container.get(name)
  }

  /// Like [`Resolver::typehint_service`], with explicit arguments for the
  /// service's logic. Since the result then depends on the arguments, the
  /// shared cache is neither read nor filled.
  pub fn typehint_service_with(&self, name: &str, overrides: &Overrides) -> Result<Instance> {
    self.container.resolve_named(name, Some(overrides))
  }

  pub(crate) fn resolve_arguments(
    &self,
    target: &str,
    parameters: &[Parameter],
    overrides: &Overrides,
  ) -> Result<Arguments> {
    let mut values = Vec::with_capacity(parameters.len());
    for (position, parameter) in parameters.iter().enumerate() {
      let value = self.resolve_parameter(target, position, parameter, overrides)?;
      values.push((parameter.name().to_owned(), value));
    }
    Ok(Arguments::new(target, values))
  }

  fn resolve_parameter(
    &self,
    target: &str,
    position: usize,
    parameter: &Parameter,
    overrides: &Overrides,
  ) -> Result<Instance> {
    let name = parameter.name();

    if let Some(value) = overrides.lookup(position, name) {
      tracing::trace!(%target, parameter = name, "using override");
      return Ok(value.clone());
    }

    if let Some(key) = parameter.type_key() {
      let candidates = self.container.candidates_for(key);
      match candidates.len() {
        0 => {}
        1 => {
          let only = &candidates[0];
          tracing::trace!(%target, parameter = name, service = %only, "matched by type");
          return self.container.get(only);
        }
        _ if candidates.iter().any(|c| c == name) => {
          tracing::trace!(%target, parameter = name, "type match narrowed by name");
          return self.container.get(name);
        }
        _ => {
          tracing::warn!(%target, parameter = name, ?candidates, "ambiguous type match");
          return Err(ContainerError::AmbiguousService {
            target: target.to_owned(),
            parameter: name.to_owned(),
            candidates,
          });
        }
      }
    }

    if let Some(provided) = self.container.provided_type(name) {
      if parameter.accepts(provided) {
        tracing::trace!(%target, parameter = name, "matched by name");
        return self.container.get(name);
      }
    }

    if let Some(autowire) = parameter.autowire_fn() {
      tracing::trace!(%target, parameter = name, "autowiring");
      return autowire(self);
    }

    if let Some(default) = parameter.default_value() {
      tracing::trace!(%target, parameter = name, "using default");
      return Ok(default.clone());
    }

    Err(ContainerError::UnresolvableParameter {
      target: target.to_owned(),
      parameter: name.to_owned(),
      position,
    })
  }
}
