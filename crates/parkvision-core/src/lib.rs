// parkvision-core: domain model, occupancy aggregation and the dashboard
// facade between parkvision-api and its consumers (CLI).

pub mod command;
pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod model;
pub mod occupancy;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{ServerConfig, TlsVerification};
pub use dashboard::{Dashboard, DashboardSnapshot, LotFetchFailure, SpotReading};
pub use error::CoreError;
pub use filter::{StatusFilter, filter_spots};
pub use occupancy::{
    DEFAULT_TOP_N, DashboardAggregate, LotOccupancySummary, RankedLot, aggregate_dashboard,
    aggregate_lot, aggregate_lot_from_summary, top_lots,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{Lot, LotId, Spot, SpotBounds, SpotId, SpotStatus, User, UserId, resolve_spot_status};
