//! compass_level_core - Pure no_std orientation logic for compass_level
//!
//! This crate turns accelerometer and magnetometer readings into a compass
//! heading and roll/pitch tilt angles. It has no I/O and can be tested on
//! host without any feature flags.
//!
//! # Modules
//!
//! - [`sensor`]: Pushed sensor event types
//! - [`orientation`]: Rotation matrix, tilt, heading filter and the estimator
//! - [`calibration`]: Accelerometer and magnetometer calibration
//! - [`display`]: Readout values and label formatting
//! - [`parameters`]: Parameter store and typed parameter blocks

#![no_std]

pub mod calibration;
pub mod display;
pub mod orientation;
pub mod parameters;
pub mod sensor;
