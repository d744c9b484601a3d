#![allow(dead_code)]

//! Service fixtures shared by the integration tests.

use fibre_container::{
  injectable, Arguments, Container, Instance, Parameter, Result, Service, TypeKey,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Values ---

#[derive(Debug, Default)]
pub struct Incrementer {
  i: AtomicUsize,
}

impl Incrementer {
  pub fn increment(&self) {
    self.i.fetch_add(1, Ordering::SeqCst);
  }

  pub fn get_i(&self) -> usize {
    self.i.load(Ordering::SeqCst)
  }
}

pub struct ResolvableClass {
  pub hello: Arc<String>,
  pub incrementer: Arc<Incrementer>,
  pub parameter: Arc<String>,
}

injectable!(ResolvableClass {
  hello: String,
  incrementer: Incrementer,
  parameter: String,
});

// --- Services ---

pub struct HelloService;

impl Service for HelloService {
  fn name(&self) -> &str {
    "hello"
  }

  fn is_shared(&self) -> bool {
    true
  }

  fn provides(&self) -> TypeKey {
    TypeKey::of::<String>()
  }

  fn resolve(&self, _: &Container, _: &Arguments) -> Result<Instance> {
    Ok(Instance::new(String::from("hello")))
  }
}

/// Forwards whatever the `hello` service resolves to.
pub struct InheritsHelloService;

impl Service for InheritsHelloService {
  fn name(&self) -> &str {
    "inheritsHello"
  }

  fn is_shared(&self) -> bool {
    true
  }

  fn provides(&self) -> TypeKey {
    TypeKey::of::<String>()
  }

  fn parameters(&self) -> Vec<Parameter> {
    vec![Parameter::untyped("hello")]
  }

  fn resolve(&self, _: &Container, args: &Arguments) -> Result<Instance> {
    args.instance("hello")
  }
}

pub struct ParameterService {
  name: String,
}

impl ParameterService {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_owned(),
    }
  }
}

impl Service for ParameterService {
  fn name(&self) -> &str {
    "parameter"
  }

  fn is_shared(&self) -> bool {
    true
  }

  fn provides(&self) -> TypeKey {
    TypeKey::of::<String>()
  }

  fn resolve(&self, _: &Container, _: &Arguments) -> Result<Instance> {
    Ok(Instance::new(format!("Hello {}", self.name)))
  }
}

pub struct IncrementerService {
  shared: bool,
}

impl IncrementerService {
  pub fn new(shared: bool) -> Self {
    Self { shared }
  }
}

impl Service for IncrementerService {
  fn name(&self) -> &str {
    "incrementer"
  }

  fn is_shared(&self) -> bool {
    self.shared
  }

  fn provides(&self) -> TypeKey {
    TypeKey::of::<Incrementer>()
  }

  fn resolve(&self, _: &Container, _: &Arguments) -> Result<Instance> {
    Ok(Instance::new(Incrementer::default()))
  }
}

pub struct TypeHintedResolverService;

impl Service for TypeHintedResolverService {
  fn name(&self) -> &str {
    "typeHintedResolver"
  }

  fn is_shared(&self) -> bool {
    true
  }

  fn provides(&self) -> TypeKey {
    TypeKey::of::<String>()
  }

  fn parameters(&self) -> Vec<Parameter> {
    vec![Parameter::of::<String>("parameter")]
  }

  fn resolve(&self, _: &Container, args: &Arguments) -> Result<Instance> {
    let parameter = args.get::<String>("parameter")?;
    Ok(Instance::new(format!(
      "The 'parameter' service says: {}",
      parameter
    )))
  }
}
