//! Random workload generation for benchmarks and manual runs.

pub mod generator;
