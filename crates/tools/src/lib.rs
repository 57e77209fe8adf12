//! Small dependency-free helpers shared across the workspace.

pub mod utf8;
