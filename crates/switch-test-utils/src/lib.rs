//! Shared test utilities for the switchws workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: git repository fixtures for the git depot
//! - [`vcs`]: in-memory [`FakeVersionControl`](vcs::FakeVersionControl)
//! - [`build`]: in-memory build server and drop-folder builders
//! - [`mirror`]: mirror launchers that copy in-process

pub mod build;
pub mod git;
pub mod mirror;
pub mod vcs;
