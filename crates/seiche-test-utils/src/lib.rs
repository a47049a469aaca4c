//! Test utilities and fixtures for seiche development.
//!
//! Body builders for the scenarios the kernel and engine tests keep
//! reaching for, plus a recording kernel for sequencing assertions.

#![forbid(unsafe_code)]

mod fixtures;

pub use fixtures::{fluid_block, shear_pair, solid_block, sparse_chain, RecordingDynamics};
