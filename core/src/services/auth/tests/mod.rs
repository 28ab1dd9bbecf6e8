//! Unit tests for the auth orchestration service

pub(crate) mod mocks;
mod service_tests;
