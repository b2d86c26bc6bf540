//! Test utilities for the Ember engine.
//!
//! Loader tests need the engine caches the tasks load into. This crate
//! provides in-memory stand-ins that record every call:
//!
//! - [`FakeServices`] - implements every service trait from
//!   `ember_resources::services` over an in-memory file table
//! - [`RecordingListener`] - a cloneable `LoaderListener` capturing callbacks
//!
//! # Example
//!
//! ```rust
//! use ember_resources::{LoadContext, ResourceLoader};
//! use ember_test_utils::{FakeServices, ServiceCall};
//! use std::time::Duration;
//!
//! let services = FakeServices::new().with_file("hero.png", b"IMGhero".to_vec());
//! let ctx = LoadContext::from_services(&services);
//!
//! let mut loader = ResourceLoader::new();
//! loader.add_image_task("hero.png", None);
//! let mut handle = loader.run();
//! handle.tick(Duration::ZERO, &ctx);
//!
//! assert_eq!(services.calls(), vec![ServiceCall::AddImage("hero.png".into())]);
//! ```
//!
//! # Design
//!
//! Service traits take `&self`, so the fakes keep their state behind a
//! `Mutex` and one value can back every field of a `LoadContext`.

pub mod fake_services;
pub mod listener;

pub use fake_services::*;
pub use listener::*;
