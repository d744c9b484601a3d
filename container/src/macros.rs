//! Public macros for manifests and ergonomic resolution.

/// Implements [`Injectable`](crate::Injectable) for a struct whose fields are
/// all `Arc`s.
///
/// Each field becomes a typed parameter named after the field, so it is
/// matched by type first and by name second.
///
/// # Examples
///
/// ```
/// use fibre_container::{injectable, Container};
/// use std::sync::Arc;
///
/// struct Greeting {
///   hello: Arc<String>,
///   times: Arc<u32>,
/// }
///
/// injectable!(Greeting { hello: String, times: u32 });
///
/// let container = Container::new();
/// container.set_value("hello", String::from("hi")).unwrap();
/// container.set_value("times", 3_u32).unwrap();
///
/// let greeting = container.resolver().typehint_class::<Greeting>().unwrap();
/// assert_eq!(*greeting.hello, "hi");
/// assert_eq!(*greeting.times, 3);
/// ```
#[macro_export]
macro_rules! injectable {
  ($target:ident { $($field:ident : $field_ty:ty),* $(,)? }) => {
    impl $crate::Injectable for $target {
      fn parameters() -> ::std::vec::Vec<$crate::Parameter> {
        ::std::vec![$($crate::Parameter::of::<$field_ty>(::std::stringify!($field))),*]
      }

      #[allow(unused_variables)]
      fn construct(args: &$crate::Arguments) -> $crate::Result<Self> {
        ::std::result::Result::Ok(Self {
          $($field: args.get::<$field_ty>(::std::stringify!($field))?),*
        })
      }
    }
  };
}

/// Resolves a typed service from the given container.
///
/// # Panics
///
/// Panics if the service is missing, has another type or fails to build.
/// For a non-panicking version, use `Container::get_as` directly.
#[macro_export]
macro_rules! resolve_from {
  ($container:expr, $type:ty, $name:expr) => {
    $container
      .get_as::<$type>($name)
      .unwrap_or_else(|err| {
        ::std::panic!(
          "Failed to resolve required service '{}' as {}: {}",
          $name,
          ::std::any::type_name::<$type>(),
          err
        )
      })
  };
}

/// Resolves a typed service from the default container.
///
/// # Panics
///
/// Panics if no default container is installed, or for the same reasons as
/// [`resolve_from!`](crate::resolve_from).
///
/// # Examples
///
/// ```
/// use fibre_container::{global, resolve};
///
/// global::get_or_install().set_value("port", 8080_u16).unwrap();
///
/// let port = resolve!(u16, "port");
/// assert_eq!(*port, 8080);
/// ```
#[macro_export]
macro_rules! resolve {
  ($type:ty, $name:expr) => {
    $crate::resolve_from!(
      $crate::global::current()
        .unwrap_or_else(|| ::std::panic!("Failed to resolve required service: no default container installed")),
      $type,
      $name
    )
  };
}
