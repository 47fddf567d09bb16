pub mod day_summary;
pub mod location;
pub mod operation;
pub mod punch;
pub mod special;

pub use day_summary::WorkdaySummary;
pub use location::Location;
pub use operation::Operation;
pub use punch::{PunchType, RawPunchRecord};
pub use special::{SpecialEvent, SpecialEventKind};
