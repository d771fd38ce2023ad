//! Timeline layout for per-employee working periods.
//!
//! Raw task records go in; ticks, header labels, row bands and bar
//! rectangles come out. Drawing is left to the host.

pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod model;

pub use config::GanttOptions;
pub use engine::{compute_layout, GanttEngine, GanttEvent, Layout};
pub use error::{GanttError, Result};
pub use model::{RawTask, TaskSheet, ViewMode};
