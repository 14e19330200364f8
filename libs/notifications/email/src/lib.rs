//! Transactional email delivery.
//!
//! ## Components
//!
//! - **Email model**: [`Email`] with builder-style construction
//! - **Providers**: [`SendGridProvider`] (HTTP API) and [`MockProvider`]
//!   (test capture and failure injection) behind the [`EmailProvider`]
//!   trait
//! - **Templates**: Handlebars-based [`TemplateEngine`] rendering subject,
//!   plain-text, and HTML bodies from one data set
//!
//! Providers report failures as errors; deciding whether a failed send is
//! fatal belongs to the caller.

pub mod models;
pub mod provider;
pub mod templates;

pub use models::Email;
pub use provider::{EmailProvider, MockProvider, SendGridProvider, SendResult};
pub use templates::{EmailTemplate, RenderedTemplate, TemplateEngine, ORDER_CONFIRMATION};
