//! Unit tests for the planning context.
