//! Service definitions loaded from YAML.
//!
//! ```yaml
//! services:
//!   greeting:
//!     value: hello
//!   retries:
//!     value: 3
//!     shared: false
//! ```
//!
//! Strings become `String`, integers `i64` (or `u64` past `i64::MAX`),
//! floats `f64` and booleans `bool`. Anything else is registered as a
//! `serde_yaml::Value`. Entries are shared unless they say otherwise.

use crate::container::Container;
use crate::error::Result;
use crate::service::ServiceLogic;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServicesConfig {
  #[serde(default)]
  pub services: BTreeMap<String, ServiceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceEntry {
  pub value: Value,
  #[serde(default = "default_shared")]
  pub shared: bool,
}

fn default_shared() -> bool {
  true
}

impl ServicesConfig {
  pub fn from_yaml_str(yaml: &str) -> Result<Self> {
    Ok(serde_yaml::from_str(yaml)?)
  }

  pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading service configuration");
    let contents = fs::read_to_string(path)?;
    Self::from_yaml_str(&contents)
  }

  /// Registers every entry in `container`, in name order.
  pub fn apply(&self, container: &Container) -> Result<usize> {
    for (name, entry) in &self.services {
      container.set(name.as_str(), literal_logic(&entry.value), entry.shared)?;
    }
    tracing::debug!(count = self.services.len(), "registered configured services");
    Ok(self.services.len())
  }
}

fn literal_logic(value: &Value) -> ServiceLogic {
  match value {
    Value::String(s) => ServiceLogic::literal(s.clone()),
    Value::Bool(b) => ServiceLogic::literal(*b),
    Value::Number(n) => {
      if let Some(i) = n.as_i64() {
        ServiceLogic::literal(i)
      } else if let Some(u) = n.as_u64() {
        ServiceLogic::literal(u)
      } else {
        ServiceLogic::literal(n.as_f64().unwrap_or_default())
      }
    }
    Value::Tagged(tagged) => literal_logic(&tagged.value),
    other => ServiceLogic::literal(other.clone()),
  }
}
