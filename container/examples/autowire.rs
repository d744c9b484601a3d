use fibre_container::{injectable, Container, ServiceLogic};
use std::sync::Arc;

struct Database {
  url: String,
}

struct Mailer {
  sender: Arc<String>,
}

struct SignupHandler {
  database: Arc<Database>,
  mailer: Arc<Mailer>,
}

injectable!(Mailer { sender: String });
injectable!(SignupHandler {
  database: Database,
  mailer: Mailer,
});

fn main() -> fibre_container::Result<()> {
  let container = Container::new();

  container.set_value("sender", String::from("noreply@example.com"))?;
  container.set(
    "database",
    ServiceLogic::factory(|| Database {
      url: String::from("postgres://localhost/app"),
    }),
    true,
  )?;
  container.set_class::<Mailer>("mailer", true)?;

  // The handler is never registered; the resolver builds it from its manifest.
  let handler = container.resolver().typehint_class::<SignupHandler>()?;

  println!("database: {}", handler.database.url);
  println!("mail from: {}", handler.mailer.sender);
  Ok(())
}
