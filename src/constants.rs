/// Sliding-window cap on the stored view history (oldest evicted first)
pub const MAX_VIEW_HISTORY: usize = 10_000;

/// Cap on the in-app notification feed (newest-first, oldest discarded)
pub const MAX_NOTIFICATIONS: usize = 100;

/// Maximum view entries returned by a view-stats query
pub const VIEW_STATS_LIMIT: usize = 50;

/// Maximum estimates returned by the estimate listing
pub const ESTIMATE_LIST_LIMIT: usize = 100;

/// Hex characters kept from the salted IP digest
pub const IP_HASH_LEN: usize = 16;
