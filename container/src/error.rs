use thiserror::Error;

/// Errors produced while registering or resolving services.
#[derive(Debug, Error)]
pub enum ContainerError {
  #[error("Service not found: '{name}'")]
  ServiceNotFound { name: String },

  #[error("Cannot resolve parameter '{parameter}' (position {position}) of '{target}'")]
  UnresolvableParameter {
    target: String,
    parameter: String,
    position: usize,
  },

  #[error(
    "Parameter '{parameter}' of '{target}' matches several services: {}",
    .candidates.join(", ")
  )]
  AmbiguousService {
    target: String,
    parameter: String,
    candidates: Vec<String>,
  },

  #[error("Circular dependency detected: {}", .chain.join(" -> "))]
  CircularDependency { chain: Vec<String> },

  #[error("Type mismatch for {what}: expected {expected}, found {found}")]
  TypeMismatch {
    what: String,
    expected: &'static str,
    found: &'static str,
  },

  #[error("Service names cannot be empty")]
  EmptyServiceName,

  #[error("Failed to parse service configuration: {0}")]
  Config(#[from] serde_yaml::Error),

  #[error("Failed to read service configuration: {0}")]
  Io(#[from] std::io::Error),
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;
