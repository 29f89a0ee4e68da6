mod monitor;
mod notifier;
mod region;
mod registry;

pub use monitor::{LocationMonitor, MonitorHandle};
pub use notifier::ReminderNotifier;
pub use region::{WatchedRegion, haversine_distance_m};
pub use registry::{GeofenceError, GeofenceRegistry};
