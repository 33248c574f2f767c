//! # Exploit Simulations
//!
//! Attacks a hostile caller would try against the engine. Every test asserts
//! that the attack is rejected and that the state is unchanged.

pub mod escrow;
pub mod replay;
