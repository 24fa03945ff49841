#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard state and request lifecycle for RiskLens.
//!
//! The [`controller::LifecycleController`] decides which remote results are
//! still wanted; [`dashboard::Dashboard`] drives it from user events and
//! runs the remote calls concurrently. The remaining modules hold state that
//! needs no remote calls: alerts, search history, the active view, and the
//! device location seam.

pub mod alerts;
pub mod controller;
pub mod dashboard;
pub mod history;
pub mod location;
pub mod view;

pub use controller::LifecycleController;
pub use dashboard::{Dashboard, DashboardEvent, DashboardUpdate};
