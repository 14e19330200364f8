//! Shared test infrastructure.
//!
//! Container-backed helpers for integration tests. Requires a Docker
//! daemon; tests using these helpers are `#[ignore]`d by default.

mod rabbitmq;

pub use rabbitmq::TestRabbitMq;
