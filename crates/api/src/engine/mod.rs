//! Template instantiation.
//!
//! The [`EventGroupDispatcher`](dispatcher::EventGroupDispatcher) turns a
//! stored template and an anchor into created calendar items and the event
//! group that records them.

pub mod dispatcher;
