use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::session::RemoteSession;

use super::{WalkError, list_subdirectories, total_size};

const BYTES_PER_MB: f64 = 1_048_576.0;
const MB_PER_GB: f64 = 1024.0;

/// Immutable result of one refresh cycle.
#[derive(Debug, Clone, Default)]
pub struct UsageSnapshot {
    /// Tenant name to size of its mail subtree in megabytes.
    pub sizes_mb: BTreeMap<String, f64>,
    pub total_size_gb: f64,
    /// Share of the configured capacity in percent; may exceed 100.
    pub usage_percentage: f64,
    /// Missing until the first cycle succeeds.
    pub last_updated: Option<DateTime<Utc>>,
}

impl UsageSnapshot {
    /// Timestamp formatted for the dashboard and the JSON API.
    pub fn last_updated_label(&self) -> String {
        match self.last_updated {
            Some(stamp) => stamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "Not updated yet".to_string(),
        }
    }

    /// Tenants ordered by size, largest first.
    pub fn sorted_by_size(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<_> = self
            .sizes_mb
            .iter()
            .map(|(name, size)| (name.as_str(), *size))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }
}

/// One full refresh cycle against an open session: discover the tenant
/// directories under `root`, walk each tenant's `mail` subtree and
/// aggregate against the capacity budget.
pub fn build_snapshot<S: RemoteSession>(
    session: &mut S,
    root: &str,
    capacity_gb: f64,
) -> Result<UsageSnapshot, WalkError> {
    let tenants = list_subdirectories(session, root)?;

    let mut sizes_mb = BTreeMap::new();
    let mut total_bytes: u64 = 0;
    for tenant in tenants {
        let bytes = total_size(session, &format!("{root}/{tenant}/mail"))?;
        sizes_mb.insert(tenant, bytes as f64 / BYTES_PER_MB);
        total_bytes += bytes;
    }

    let total_size_gb = total_bytes as f64 / BYTES_PER_MB / MB_PER_GB;
    Ok(UsageSnapshot {
        sizes_mb,
        total_size_gb,
        usage_percentage: total_size_gb / capacity_gb * 100.0,
        last_updated: Some(Utc::now()),
    })
}

/// Cloneable handle to the currently published snapshot.
///
/// Publishing swaps the inner `Arc` wholesale, so readers hold
/// whichever snapshot was current when they asked and never observe a
/// half-built one.
#[derive(Clone)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<UsageSnapshot>>>,
}

impl SnapshotStore {
    /// Starts out with the empty snapshot ("Not updated yet").
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(UsageSnapshot::default()))),
        }
    }

    pub fn current(&self) -> Arc<UsageSnapshot> {
        // The lock only ever guards a fully-built Arc, so a poisoned
        // lock still holds a valid snapshot.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn publish(&self, snapshot: UsageSnapshot) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::testing::FakeSession;

    fn file(size: &str, name: &str) -> String {
        format!("-rw-r--r-- 1 vmail vmail {size} Jan 10 12:00 {name}")
    }

    fn two_tenant_session() -> FakeSession {
        FakeSession::new()
            .names("/srv/vmail", &["alice", "bob", "quota.conf"])
            .dir("/srv/vmail/alice", &[])
            .dir("/srv/vmail/bob", &[])
            .dir(
                "/srv/vmail/alice/mail",
                &[&file("1048576", "a.eml"), &file("2097152", "b.eml")],
            )
            .dir("/srv/vmail/bob/mail", &[])
    }

    #[test]
    fn aggregates_tenant_sizes() {
        let mut session = two_tenant_session();
        let snapshot = build_snapshot(&mut session, "/srv/vmail", 40.0).unwrap();

        assert_eq!(snapshot.sizes_mb["alice"], 3.0);
        assert_eq!(snapshot.sizes_mb["bob"], 0.0);
        assert_eq!(snapshot.sizes_mb.len(), 2);
        assert!((snapshot.total_size_gb - 0.0029296875).abs() < 1e-9);
        assert!((snapshot.usage_percentage - 0.00732421875).abs() < 1e-9);
        assert!(snapshot.last_updated.is_some());
    }

    #[test]
    fn total_matches_per_tenant_sum() {
        let mut session = two_tenant_session();
        let snapshot = build_snapshot(&mut session, "/srv/vmail", 40.0).unwrap();

        let sum_mb: f64 = snapshot.sizes_mb.values().sum();
        assert!((snapshot.total_size_gb - sum_mb / 1024.0).abs() < 1e-9);
    }

    #[test]
    fn tenant_walk_failure_fails_the_cycle() {
        let mut session = two_tenant_session().broken("/srv/vmail/bob/mail");
        assert!(build_snapshot(&mut session, "/srv/vmail", 40.0).is_err());
    }

    #[test]
    fn failed_cycle_leaves_published_snapshot_in_place() {
        let store = SnapshotStore::new();

        let mut session = two_tenant_session();
        let snapshot = build_snapshot(&mut session, "/srv/vmail", 40.0).unwrap();
        store.publish(snapshot);

        let mut session = two_tenant_session().broken("/srv/vmail/alice/mail");
        assert!(build_snapshot(&mut session, "/srv/vmail", 40.0).is_err());

        let current = store.current();
        assert_eq!(current.sizes_mb["alice"], 3.0);
        assert!(current.last_updated.is_some());
    }

    #[test]
    fn store_starts_empty_and_swaps_wholesale() {
        let store = SnapshotStore::new();
        let before = store.current();
        assert_eq!(before.last_updated_label(), "Not updated yet");
        assert!(before.sizes_mb.is_empty());

        let mut session = two_tenant_session();
        store.publish(build_snapshot(&mut session, "/srv/vmail", 40.0).unwrap());

        // Readers holding the old snapshot keep it unchanged.
        assert!(before.sizes_mb.is_empty());
        assert_eq!(store.current().sizes_mb.len(), 2);
    }

    #[test]
    fn sorted_by_size_is_descending() {
        let mut sizes_mb = BTreeMap::new();
        sizes_mb.insert("alice".to_string(), 3.0);
        sizes_mb.insert("bob".to_string(), 12.5);
        sizes_mb.insert("carol".to_string(), 0.0);
        let snapshot = UsageSnapshot {
            sizes_mb,
            ..Default::default()
        };

        let sorted = snapshot.sorted_by_size();
        assert_eq!(sorted[0].0, "bob");
        assert_eq!(sorted[1].0, "alice");
        assert_eq!(sorted[2].0, "carol");
    }
}
