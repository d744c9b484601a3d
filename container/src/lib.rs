//! # Fibre Container
//!
//! A thread-safe dependency injection container with an autowiring resolver.
//!
//! Services are registered under unique names and resolved on demand.
//! Shared services are built once and cached; non-shared services are built
//! on every lookup. Because Rust has no runtime reflection, everything the
//! resolver constructs declares a parameter manifest, and the resolver fills
//! each parameter from explicit overrides, matching services (by type, then
//! by name), autowiring or defaults.
//!
//! ## Core Concepts
//!
//! - **Container**: maps service names to descriptors; see [`Container`].
//! - **Service**: a named, optionally shared unit of construction logic,
//!   either a user type implementing [`Service`] or a [`RawService`].
//! - **Resolver**: builds [`Injectable`] types, invokes [`Method`]s and
//!   resolves parameterised services; see [`Resolver`].
//! - **Default container**: an explicitly installed process-wide handle,
//!   see [`global`], read by the [`resolve!`] macro.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_container::{injectable, Container, ServiceLogic};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Counter(AtomicUsize);
//!
//! struct Report {
//!   title: Arc<String>,
//!   counter: Arc<Counter>,
//! }
//!
//! injectable!(Report { title: String, counter: Counter });
//!
//! let container = Container::new();
//! container.set_value("title", String::from("Weekly")).unwrap();
//! container.set("counter", ServiceLogic::factory(Counter::default), true).unwrap();
//!
//! let report = container.resolver().typehint_class::<Report>().unwrap();
//! report.counter.0.fetch_add(1, Ordering::SeqCst);
//!
//! assert_eq!(*report.title, "Weekly");
//! let counter = container.get_as::<Counter>("counter").unwrap();
//! assert_eq!(counter.0.load(Ordering::SeqCst), 1);
//! ```

mod config;
mod container;
mod core;
mod error;
pub mod global;
mod injectable;
mod macros;
mod params;
mod resolver;
mod service;

pub use crate::core::{Instance, TypeKey};
pub use config::{ServiceEntry, ServicesConfig};
pub use container::{Container, ServiceInfo};
pub use error::{ContainerError, Result};
pub use injectable::{Injectable, Method};
pub use params::{Arguments, Overrides, Parameter};
pub use resolver::Resolver;
pub use service::{RawService, Service, ServiceLogic};
