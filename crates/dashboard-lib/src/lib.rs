//! Dashboard library for the manager's client screens
//!
//! This crate provides the page-side functionality for:
//! - Statistics data preparation (timestamp parsing, axis bounds, core alignment)
//! - Chart configuration for the stats cards
//! - Client naming actions (connect-check, delete, rename)
//! - Navigation and the countdown redirect
//! - Page-session context and structured logging

pub mod actions;
pub mod charts;
pub mod countdown;
pub mod error;
pub mod models;
pub mod navigation;
pub mod observability;
pub mod session;
pub mod stats;

pub use actions::{ConnectOutcome, DeleteOutcome, ManagerApi, RenameOutcome};
pub use charts::{Card, ChartConfig, ChartSettings, TimeSeriesStyle};
pub use countdown::{Countdown, CountdownOutcome};
pub use error::{ActionError, ApiError, ValidationError};
pub use models::*;
pub use navigation::Navigation;
pub use observability::StructuredLogger;
pub use session::{LoadSummary, PageSession};
