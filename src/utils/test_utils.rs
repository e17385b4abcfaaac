//! Shared fixtures for machine tests.
