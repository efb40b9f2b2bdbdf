//! Integration test support for the presence core.
//!
//! The tests drive the real service/sweeper/notifier stack over the
//! in-memory presence store and in-process fakes for the external
//! collaborators - no Redis or PostgreSQL required.

pub mod fixtures;
