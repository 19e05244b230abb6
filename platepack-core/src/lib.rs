#![forbid(unsafe_code)]

pub mod error;

pub mod manifest {
    pub mod normalize;
    pub mod partition;
    pub mod row;
}

pub mod container;

pub mod locate;

pub mod pack {
    pub mod plan;
    pub mod writer;
}

pub mod batch;
pub mod report;

// Re-exports: stable API surface
pub use batch::{BatchOptions, run_batch};
pub use locate::locate_payloads;
pub use manifest::normalize::normalize;
