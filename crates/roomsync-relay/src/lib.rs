//! roomsync relay library entry.
//!
//! This crate wires the transport, room registries, presence coordinator,
//! dispatcher, and built-in room services into a cohesive relay process.
//! It is intended to be consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod obs;
pub mod ops;
pub mod rooms;
pub mod router;
pub mod services;
pub mod transport;
