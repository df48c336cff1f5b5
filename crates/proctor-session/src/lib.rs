//! proctor-session — The attempt state machine and its timing plumbing.
//!
//! [`session::Session`] is the synchronous state machine over a fixed
//! question sequence; [`ticker`] drives its clock from a cancellable tokio
//! task; [`sink`] is the fire-and-forget handoff to the results
//! collaborator.

pub mod session;
pub mod sink;
pub mod ticker;
