pub mod filter;
pub mod health;
pub mod phase;
pub mod project;
pub mod sample;
pub mod stats;
pub mod store;
pub mod timeline;
pub mod validate;

pub use filter::{AssigneeFilter, ProjectFilter, StatusFilter};
pub use health::calculate_health;
pub use phase::Phase;
pub use project::{ChildTask, Project, ProjectDraft, ProjectId};
pub use stats::{Stats, Workload};
pub use store::{Committed, ImportTicket, ProjectStore, StoreError};
pub use timeline::{TimelineScale, TimelineViewport};
