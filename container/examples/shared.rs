use fibre_container::{Container, ServiceLogic};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Incrementer(AtomicUsize);

fn main() -> fibre_container::Result<()> {
  let container = Container::new();
  container.set("shared", ServiceLogic::factory(Incrementer::default), true)?;
  container.set("fresh", ServiceLogic::factory(Incrementer::default), false)?;

  for name in ["shared", "fresh"] {
    container.get_as::<Incrementer>(name)?.0.fetch_add(1, Ordering::SeqCst);
    let value = container.get_as::<Incrementer>(name)?.0.load(Ordering::SeqCst);
    println!("{name}: {value}");
  }

  // shared: 1
  // fresh: 0
  Ok(())
}
