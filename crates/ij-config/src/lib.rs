pub mod logging;
pub mod planner;
pub mod query;
pub mod types;

pub use logging::{LogFormat, LoggingConfig};
pub use planner::{PlannerConfig, PlannerOptions};
pub use query::{FieldDef, JoinDef, QueryFile, TableDef};
pub use types::HumanDuration;
