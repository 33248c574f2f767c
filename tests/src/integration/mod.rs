//! # Integration Flows
//!
//! End-to-end scenarios driven through the async service and its ports.

pub mod governance;
pub mod lifecycle;
