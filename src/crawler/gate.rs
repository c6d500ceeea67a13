//! Shared request pacing gate
//!
//! All fetch workers funnel through one [`RequestGate`] so the aggregate
//! request rate against the origin stays bounded regardless of the
//! concurrency level. The gate hands out departure slots spaced at least
//! the configured interval apart; a worker blocks until its slot arrives.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Token-paced departure gate shared across all workers
///
/// Internally holds the next free departure time. Acquiring reserves the
/// next slot and sleeps outside the lock, so waiting workers never block
/// each other's bookkeeping.
#[derive(Debug)]
pub struct RequestGate {
    spacing: Duration,
    next_free: Mutex<Option<Instant>>,
}

impl RequestGate {
    /// Creates a gate with the given minimum spacing between departures
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            next_free: Mutex::new(None),
        }
    }

    /// The configured minimum spacing
    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Blocks until this caller's departure slot arrives
    ///
    /// Slots are assigned in acquisition order; two departures are never
    /// closer than `spacing`, aggregated across every concurrent caller.
    pub async fn acquire(&self) {
        let wait = {
            let mut next_free = self.next_free.lock().await;
            let now = Instant::now();
            let depart = match *next_free {
                Some(slot) if slot > now => slot,
                _ => now,
            };
            *next_free = Some(depart + self.spacing);
            depart.saturating_duration_since(now)
        };

        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_acquire_is_immediate() {
        let gate = RequestGate::new(Duration::from_millis(200));
        let start = Instant::now();
        gate.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_sequential_acquires_are_spaced() {
        let gate = RequestGate::new(Duration::from_millis(100));
        let start = Instant::now();
        gate.acquire().await;
        gate.acquire().await;
        assert!(
            start.elapsed() >= Duration::from_millis(100),
            "second departure left early: {:?}",
            start.elapsed()
        );
    }

    #[tokio::test]
    async fn test_concurrent_departures_respect_spacing() {
        let gate = Arc::new(RequestGate::new(Duration::from_millis(50)));
        let mut handles = Vec::new();

        for _ in 0..4 {
            let gate = Arc::clone(&gate);
            handles.push(tokio::spawn(async move {
                gate.acquire().await;
                Instant::now()
            }));
        }

        let mut departures = Vec::new();
        for handle in handles {
            departures.push(handle.await.unwrap());
        }
        departures.sort();

        for pair in departures.windows(2) {
            let gap = pair[1].duration_since(pair[0]);
            // Allow a small scheduling tolerance below the nominal spacing.
            assert!(
                gap >= Duration::from_millis(45),
                "departures too close: {:?}",
                gap
            );
        }
    }

    #[tokio::test]
    async fn test_idle_gate_does_not_accumulate_debt() {
        let gate = RequestGate::new(Duration::from_millis(20));
        gate.acquire().await;
        tokio::time::sleep(Duration::from_millis(60)).await;

        // After an idle period longer than the spacing, the next slot is now.
        let start = Instant::now();
        gate.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(10));
    }
}
