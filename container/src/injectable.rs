//! Types the resolver can construct or invoke.

use crate::error::Result;
use crate::params::{Arguments, Parameter};

/// A type whose constructor the [`Resolver`](crate::Resolver) can call.
///
/// `parameters` is the constructor's manifest; `construct` receives one
/// resolved argument per declared parameter. The [`injectable!`](crate::injectable)
/// macro implements this for plain structs of `Arc` fields.
pub trait Injectable: Sized + Send + Sync + 'static {
  fn parameters() -> Vec<Parameter>;

  fn construct(args: &Arguments) -> Result<Self>;
}

/// A method of `T` described for the resolver: a name, a parameter manifest
/// and the body to call with the resolved arguments.
pub struct Method<T: ?Sized, R> {
  name: String,
  parameters: Vec<Parameter>,
  body: Box<dyn Fn(&T, &Arguments) -> Result<R> + Send + Sync>,
}

impl<T: ?Sized, R> Method<T, R> {
  pub fn new(
    name: impl Into<String>,
    parameters: Vec<Parameter>,
    body: impl Fn(&T, &Arguments) -> Result<R> + Send + Sync + 'static,
  ) -> Self {
    Self {
      name: name.into(),
      parameters,
      body: Box::new(body),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub(crate) fn invoke(&self, target: &T, args: &Arguments) -> Result<R> {
    (self.body)(target, args)
  }
}
