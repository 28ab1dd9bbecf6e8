//! Email delivery module
//!
//! Implementations of the `EmailServiceTrait` notifier interface: an HTTP
//! provider client for production and a console-logging mock for
//! development and tests.

pub mod http_email;
pub mod mock_email;
pub mod template;

pub use http_email::HttpEmailService;
pub use mock_email::MockEmailService;
