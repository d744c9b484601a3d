use fibre_container::{resolve_from, Container, ContainerError};
use std::panic;

fn main() {
  let container = Container::new();

  // --- Using the fallible `get()` method ---
  match container.get("unregistered") {
    Err(ContainerError::ServiceNotFound { name }) => {
      println!("Correctly received ServiceNotFound for '{}'.", name)
    }
    other => panic!("Should not have found the service: {:?}", other),
  }

  // --- Using the panicking `resolve_from!` macro ---
  let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
    let _service = resolve_from!(container, String, "unregistered");
  }));
  assert!(result.is_err(), "resolve_from! should have panicked.");
  println!("Successfully caught the expected panic from resolve_from!.");
}
