//! JSON configuration for the demo binary.

pub mod demo;
