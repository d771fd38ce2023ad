pub mod row;
pub mod sheet;
pub mod task;
pub mod timeline;

pub use row::{EmployeeRow, Grouping};
pub use sheet::TaskSheet;
pub use task::{Dependencies, NormalizedTask, RawTask};
pub use timeline::{DateRange, ModeDescriptor, ScaleParams, Tick, ViewMode};
