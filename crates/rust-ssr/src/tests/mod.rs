//! Crate-level tests for the public `rust_ssr` surface.


mod behaviour;
