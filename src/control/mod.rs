//! Pure control computations (no hardware side effects).

pub mod mixer;
