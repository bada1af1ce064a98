//! Motor controller implementations
//!
//! This crate provides concrete implementations of the capability traits
//! defined in rocketscript-core:
//!
//! - Motion profile controller with a two-level trajectory buffer
//! - Smart motion position controller for the elevator
//!
//! Both are behavioural models advanced by a periodic `update()` call, and
//! both synchronise internally so one handle can be shared between the
//! control loop, the buffer refill driver and the plant update.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod controller;
