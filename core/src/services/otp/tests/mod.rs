//! Unit tests for the OTP lifecycle service
