//! Control protocol primitives for the low-memory-killer daemon (lmkd).
//!
//! # Crate Structure
//!
//! - [`packet`] — Fixed-capacity control packet codec, typed messages and packet I/O
//!
//! The `lmkdctl` binary (behind the `cli` feature) encodes and decodes
//! packets from the command line.

/// Re-export packet types.
pub mod packet {
    pub use lmkdprims_packet::*;
}
