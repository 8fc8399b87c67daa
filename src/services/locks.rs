use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::TournamentId;

/// One mutex per tournament so a tournament has a single recompute in flight
#[derive(Debug, Default)]
pub struct TournamentLocks {
    inner: Mutex<HashMap<TournamentId, Arc<Mutex<()>>>>,
}

impl TournamentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for `tournament_id`; the same handle is returned on every call
    pub fn handle(&self, tournament_id: TournamentId) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(tournament_id).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_same_tournament_shares_handle() {
        let locks = TournamentLocks::new();
        assert!(Arc::ptr_eq(&locks.handle(1), &locks.handle(1)));
        assert!(!Arc::ptr_eq(&locks.handle(1), &locks.handle(2)));
    }

    #[test]
    fn test_writers_are_serialized() {
        let locks = Arc::new(TournamentLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let (locks, inside, peak) = (locks.clone(), inside.clone(), peak.clone());
                thread::spawn(move || {
                    let handle = locks.handle(7);
                    let _guard = handle.lock().unwrap();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(std::time::Duration::from_millis(2));
                    inside.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }
}
