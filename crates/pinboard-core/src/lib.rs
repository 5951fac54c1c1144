//! pinboard-core - Core library for Pinboard
//!
//! This crate contains the shared models, the thin clients for the managed
//! backend (notes API, object storage, hosted auth), and the screen
//! workflows driven by the Pinboard interfaces.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod screens;
pub mod storage;
pub mod util;

pub use error::{Error, Result};
pub use models::{Note, NoteId};
