//! Deferred actions measured in ticks
//!
//! Replaces wall-clock timeouts. Actions tied to a level carry the epoch they
//! were scheduled in; if the level has been (re)loaded since, they are dropped
//! when they come due instead of touching the reset entities.

use serde::{Deserialize, Serialize};

/// Work to perform once a delay elapses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Mark the enemy at this index of the active level dead
    FinishEnemyDeath { enemy: usize },
    /// Remove the projectile with this identity
    ExpireProjectile { identity: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    due_tick: u64,
    /// `None` for actions that survive level loads
    epoch: Option<u64>,
    action: Deferred,
}

/// Queue of deferred actions, fired in scheduling order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pending: Vec<Pending>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` `delay_ticks` after `now`
    pub fn after(&mut self, now: u64, delay_ticks: u32, epoch: Option<u64>, action: Deferred) {
        self.pending.push(Pending {
            due_tick: now + u64::from(delay_ticks),
            epoch,
            action,
        });
    }

    /// Remove and return every action due at `now` that is still valid for `epoch`
    pub fn take_due(&mut self, now: u64, epoch: u64) -> Vec<Deferred> {
        let mut due = Vec::new();
        self.pending.retain(|p| {
            if p.due_tick > now {
                return true;
            }
            match p.epoch {
                Some(e) if e != epoch => {
                    log::debug!("Dropping stale {:?} (epoch {} != {})", p.action, e, epoch);
                }
                _ => due.push(p.action.clone()),
            }
            false
        });
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expire(name: &str) -> Deferred {
        Deferred::ExpireProjectile {
            identity: name.to_string(),
        }
    }

    #[test]
    fn test_fires_only_when_due() {
        let mut s = Schedule::new();
        s.after(10, 5, None, expire("bullet1"));
        assert!(s.take_due(14, 0).is_empty());
        assert_eq!(s.take_due(15, 0), vec![expire("bullet1")]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_stale_epoch_is_dropped() {
        let mut s = Schedule::new();
        s.after(0, 3, Some(1), Deferred::FinishEnemyDeath { enemy: 0 });
        s.after(0, 3, None, expire("bullet2"));
        let due = s.take_due(3, 2);
        assert_eq!(due, vec![expire("bullet2")]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_preserves_scheduling_order() {
        let mut s = Schedule::new();
        s.after(0, 2, Some(1), Deferred::FinishEnemyDeath { enemy: 3 });
        s.after(0, 1, Some(1), Deferred::FinishEnemyDeath { enemy: 1 });
        assert_eq!(s.len(), 2);
        let due = s.take_due(5, 1);
        assert_eq!(
            due,
            vec![
                Deferred::FinishEnemyDeath { enemy: 3 },
                Deferred::FinishEnemyDeath { enemy: 1 },
            ]
        );
    }
}
