//! Adapter implementations for port traits.

pub mod live;
