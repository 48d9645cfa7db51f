//! `ar-domain`: types shared by every assist-relay crate.
//!
//! Holds the configuration tree, the single error type, the chat message
//! model and the structured trace events. Nothing here performs I/O apart
//! from reading environment variables in [`config::Credentials::from_env`].

pub mod config;
pub mod error;
pub mod message;
pub mod trace;
