// ── Domain model ──
//
// Canonical representations of backend entities. Wire quirks (alternate
// field names, naive timestamps, nullable statuses) are resolved in
// `convert` so nothing here has to care about them.

pub mod ids;
pub mod lot;
pub mod status;
pub mod user;

pub use ids::{LotId, SpotId, UserId};
pub use lot::{Lot, Spot, SpotBounds};
pub use status::{SpotStatus, resolve_spot_status};
pub use user::User;
