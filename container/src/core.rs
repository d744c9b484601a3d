//! Core data structures shared by the container and the resolver.

use crate::error::{ContainerError, Result};
use once_cell::sync::Lazy;
use parking_lot::{Condvar, Mutex};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

// --- TYPE IDENTITY ---

/// The identity of a Rust type, as used for type-hint matching.
///
/// Equality and hashing only look at the `TypeId`; the name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
}

impl TypeKey {
  /// Returns the key of `T`. Works for unsized types such as `dyn Trait`.
  pub fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: std::any::type_name::<T>(),
    }
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.name)
  }
}

// --- INSTANCES ---

/// A resolved, type-erased service value.
///
/// The value lives behind an `Arc<T>`, so cloning an `Instance` hands out
/// another handle to the same object. `T` may be unsized, which is how
/// trait objects (`Arc<dyn Trait>`) are stored.
#[derive(Clone)]
pub struct Instance {
  inner: Arc<dyn Any + Send + Sync>,
  type_key: TypeKey,
  // Address of the wrapped value, so two wrappers of one `Arc<T>` compare
  // equal in `ptr_eq`.
  addr: usize,
}

impl Instance {
  /// Wraps an owned value.
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self::from_arc(Arc::new(value))
  }

  /// Wraps an existing `Arc`, keeping its identity: instances made from
  /// clones of the same `Arc` are [`ptr_eq`](Instance::ptr_eq).
  pub fn from_arc<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Self {
    let addr = Arc::as_ptr(&value) as *const () as usize;
    Self {
      inner: Arc::new(value),
      type_key: TypeKey::of::<T>(),
      addr,
    }
  }

  pub fn type_key(&self) -> TypeKey {
    self.type_key
  }

  pub fn type_name(&self) -> &'static str {
    self.type_key.name()
  }

  pub fn is<T: ?Sized + Any>(&self) -> bool {
    self.type_key == TypeKey::of::<T>()
  }

  /// Returns the value as `Arc<T>`, or `None` if it holds another type.
  pub fn downcast<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.inner.downcast_ref::<Arc<T>>().cloned()
  }

  /// Like [`Instance::downcast`] but reports a `TypeMismatch` for `what`.
  pub fn downcast_or_err<T: ?Sized + Any + Send + Sync>(&self, what: &str) -> Result<Arc<T>> {
    self.downcast::<T>().ok_or_else(|| ContainerError::TypeMismatch {
      what: what.to_owned(),
      expected: std::any::type_name::<T>(),
      found: self.type_name(),
    })
  }

  /// True if both instances point at the same underlying value.
  pub fn ptr_eq(&self, other: &Instance) -> bool {
    self.addr == other.addr && self.type_key == other.type_key
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({})", self.type_key.name())
  }
}

// --- CYCLE DETECTION ---

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_container_id() -> u64 {
  NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed)
}

/// Something the resolver can be in the middle of building.
#[derive(Clone, PartialEq, Eq)]
pub(crate) enum Target {
  Service(String),
  Class(&'static str),
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Target::Service(name) => write!(f, "{}", name),
      Target::Class(name) => write!(f, "class {}", name),
    }
  }
}

thread_local! {
  // Targets currently being resolved on this thread, outermost first.
  static RESOLVING_STACK: RefCell<Vec<(u64, Target)>> = const { RefCell::new(Vec::new()) };
}

/// An RAII guard marking a target as "being resolved" on the current thread.
///
/// Entering a target that is already on the stack of the same container is a
/// circular dependency. Dropping the guard pops the target again.
pub(crate) struct ResolutionGuard {
  container_id: u64,
}

impl ResolutionGuard {
  pub(crate) fn enter(container_id: u64, target: Target) -> Result<Self> {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(start) = stack
        .iter()
        .position(|(id, t)| *id == container_id && *t == target)
      {
        let mut chain: Vec<String> = stack[start..]
          .iter()
          .filter(|(id, _)| *id == container_id)
          .map(|(_, t)| t.to_string())
          .collect();
        chain.push(target.to_string());
        tracing::warn!(chain = %chain.join(" -> "), "circular dependency detected");
        return Err(ContainerError::CircularDependency { chain });
      }
      stack.push((container_id, target));
      Ok(Self { container_id })
    })
  }

  /// True if the named service of the given container is being resolved
  /// further up this thread's stack.
  pub(crate) fn is_resolving(container_id: u64, name: &str) -> bool {
    RESOLVING_STACK.with(|stack| {
      stack
        .borrow()
        .iter()
        .any(|(id, t)| *id == container_id && matches!(t, Target::Service(n) if n == name))
    })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      let mut stack = stack.borrow_mut();
      if let Some(pos) = stack.iter().rposition(|(id, _)| *id == self.container_id) {
        stack.remove(pos);
      }
    });
  }
}

// --- SHARED BUILDS ACROSS THREADS ---

type BuildKey = (u64, String);

#[derive(Default)]
struct BuildGraph {
  // The thread running each in-progress shared build.
  owners: HashMap<BuildKey, ThreadId>,
  // The build each blocked thread is waiting for.
  waiting: HashMap<ThreadId, BuildKey>,
}

impl BuildGraph {
  // Walks build -> owner -> awaited build -> owner ... from `key`. Returns
  // the service names along the walk if it leads back to `me`.
  fn wait_cycle(&self, key: &BuildKey, me: ThreadId) -> Option<Vec<String>> {
    let mut names = vec![key.1.clone()];
    let mut current = key;
    for _ in 0..=self.waiting.len() {
      let owner = *self.owners.get(current)?;
      if owner == me {
        let mut chain = vec![current.1.clone()];
        chain.extend(names);
        return Some(chain);
      }
      current = self.waiting.get(&owner)?;
      names.push(current.1.clone());
    }
    None
  }
}

static BUILDS: Lazy<Mutex<BuildGraph>> = Lazy::new(|| Mutex::new(BuildGraph::default()));
static BUILD_RELEASED: Condvar = Condvar::new();

pub(crate) enum BuildClaim {
  /// The calling thread owns the build until the slot is dropped.
  Owner(BuildSlot),
  /// Another thread owned the build and has released it, successfully or not.
  Released,
}

/// Ownership of one shared service's construction.
///
/// At most one thread owns a (container, name) build at a time. Other
/// threads block in [`BuildSlot::claim`] until it is released; the wait-for
/// graph is checked first so a cycle split across threads fails with
/// `CircularDependency` instead of blocking forever.
pub(crate) struct BuildSlot {
  key: BuildKey,
}

impl BuildSlot {
  pub(crate) fn claim(container_id: u64, name: &str) -> Result<BuildClaim> {
    let me = thread::current().id();
    let key = (container_id, name.to_owned());
    let mut graph = BUILDS.lock();

    let existing = graph.owners.get(&key).copied();
    let owner = match existing {
      Some(owner) => owner,
      None => {
        graph.owners.insert(key.clone(), me);
        return Ok(BuildClaim::Owner(BuildSlot { key }));
      }
    };

    if let Some(chain) = graph.wait_cycle(&key, me) {
      tracing::warn!(chain = %chain.join(" -> "), "circular dependency detected across threads");
      return Err(ContainerError::CircularDependency { chain });
    }

    tracing::trace!(service = %name, "waiting for another thread's build");
    graph.waiting.insert(me, key.clone());
    while graph.owners.get(&key) == Some(&owner) {
      BUILD_RELEASED.wait(&mut graph);
    }
    graph.waiting.remove(&me);
    Ok(BuildClaim::Released)
  }
}

impl Drop for BuildSlot {
  fn drop(&mut self) {
    BUILDS.lock().owners.remove(&self.key);
    BUILD_RELEASED.notify_all();
  }
}
