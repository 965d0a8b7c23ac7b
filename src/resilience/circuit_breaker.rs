use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::{Error, Result};

/// Observable circuit phases. Transitions inside [`CircuitBreaker`] are the
/// only mutation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation; calls pass through.
    Closed,
    /// Threshold reached; calls are rejected without touching the network.
    Open,
    /// Break elapsed; exactly one probe call is admitted.
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerSnapshot {
    pub state: CircuitState,
    pub consecutive_failures: u32,
    /// Remaining open time, if currently open.
    pub open_remaining: Option<Duration>,
}

#[derive(Debug)]
struct State {
    consecutive_failures: u32,
    open_until: Option<Instant>,
    probe_in_flight: bool,
}

/// Counts consecutive transient failures and opens for a cooldown once the
/// threshold is hit. After the cooldown a single probe is admitted; a counted
/// outcome decides between closing and re-opening the circuit, while an
/// uncounted one releases the slot so the next caller probes instead.
pub struct CircuitBreaker {
    threshold: u32,
    break_duration: Duration,
    state: Mutex<State>,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, break_duration: Duration) -> Self {
        Self {
            threshold,
            break_duration,
            state: Mutex::new(State {
                consecutive_failures: 0,
                open_until: None,
                probe_in_flight: false,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Gate a call attempt. Fails with [`Error::CircuitOpen`] while open, or
    /// while another probe is already out; admits the single probe once the
    /// break has elapsed.
    pub fn allow(&self) -> Result<()> {
        let mut st = self.lock();
        let now = Instant::now();
        if let Some(until) = st.open_until {
            if now < until {
                return Err(Error::CircuitOpen { retry_after: until - now });
            }
            if st.probe_in_flight {
                return Err(Error::CircuitOpen { retry_after: Duration::ZERO });
            }
            st.probe_in_flight = true;
        }
        Ok(())
    }

    /// Record a successful call: closes the circuit and resets the counter.
    pub fn on_success(&self) {
        let mut st = self.lock();
        st.consecutive_failures = 0;
        st.open_until = None;
        st.probe_in_flight = false;
    }

    /// Record a transient failure. A failed probe re-opens the circuit and
    /// restarts the break timer.
    pub fn on_failure(&self) {
        let mut st = self.lock();
        if st.probe_in_flight {
            st.probe_in_flight = false;
            st.open_until = Some(Instant::now() + self.break_duration);
            return;
        }
        st.consecutive_failures = st.consecutive_failures.saturating_add(1);
        if st.consecutive_failures >= self.threshold {
            st.open_until = Some(Instant::now() + self.break_duration);
        }
    }

    /// Release the half-open probe slot without deciding the circuit.
    ///
    /// Used when the probe ends in an outcome the breaker does not count,
    /// such as a permanent provider error or caller cancellation. The next
    /// admitted call becomes a new probe. No-op outside a probe.
    pub fn release_probe(&self) {
        let mut st = self.lock();
        st.probe_in_flight = false;
    }

    pub fn state(&self) -> CircuitState {
        let st = self.lock();
        match st.open_until {
            None => CircuitState::Closed,
            Some(until) if Instant::now() < until => CircuitState::Open,
            Some(_) => CircuitState::HalfOpen,
        }
    }

    pub fn snapshot(&self) -> CircuitBreakerSnapshot {
        let st = self.lock();
        let now = Instant::now();
        let (state, open_remaining) = match st.open_until {
            None => (CircuitState::Closed, None),
            Some(until) if now < until => (CircuitState::Open, Some(until - now)),
            Some(_) => (CircuitState::HalfOpen, None),
        };
        CircuitBreakerSnapshot {
            state,
            consecutive_failures: st.consecutive_failures,
            open_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn initial_state_is_closed() {
        let cb = CircuitBreaker::new(5, Duration::from_secs(30));
        assert!(cb.allow().is_ok());
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.snapshot().consecutive_failures, 0);
    }

    #[test]
    fn success_resets_failure_count() {
        let cb = CircuitBreaker::new(5, Duration::from_secs(30));
        cb.on_failure();
        cb.on_failure();
        assert_eq!(cb.snapshot().consecutive_failures, 2);

        cb.on_success();
        assert_eq!(cb.snapshot().consecutive_failures, 0);
    }

    #[test]
    fn opens_at_threshold_and_reports_remaining_break() {
        let cb = CircuitBreaker::new(3, Duration::from_secs(30));
        cb.on_failure();
        cb.on_failure();
        assert!(cb.allow().is_ok());

        cb.on_failure();
        match cb.allow() {
            Err(Error::CircuitOpen { retry_after }) => {
                assert!(retry_after <= Duration::from_secs(30));
                assert!(retry_after > Duration::from_secs(29));
            }
            other => panic!("expected CircuitOpen, got {other:?}"),
        }
        assert_eq!(cb.state(), CircuitState::Open);
    }

    #[test]
    fn admits_exactly_one_probe_after_break() {
        let cb = CircuitBreaker::new(2, Duration::from_millis(40));
        cb.on_failure();
        cb.on_failure();
        assert!(cb.allow().is_err());

        thread::sleep(Duration::from_millis(50));
        assert_eq!(cb.state(), CircuitState::HalfOpen);

        // First caller gets the probe, the second is rejected until it resolves.
        assert!(cb.allow().is_ok());
        assert!(matches!(cb.allow(), Err(Error::CircuitOpen { .. })));
    }

    #[test]
    fn successful_probe_closes_the_circuit() {
        let cb = CircuitBreaker::new(2, Duration::from_millis(40));
        cb.on_failure();
        cb.on_failure();
        thread::sleep(Duration::from_millis(50));

        assert!(cb.allow().is_ok());
        cb.on_success();
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.snapshot().consecutive_failures, 0);
        assert!(cb.allow().is_ok());
    }

    #[test]
    fn released_probe_slot_admits_a_new_probe() {
        let cb = CircuitBreaker::new(2, Duration::from_millis(40));
        cb.on_failure();
        cb.on_failure();
        thread::sleep(Duration::from_millis(50));

        assert!(cb.allow().is_ok());
        assert!(cb.allow().is_err());

        // The probe resolved without a countable outcome; the next caller
        // takes over as the probe.
        cb.release_probe();
        assert!(cb.allow().is_ok());
        cb.on_success();
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[test]
    fn failed_probe_reopens_and_restarts_the_timer() {
        let cb = CircuitBreaker::new(2, Duration::from_millis(40));
        cb.on_failure();
        cb.on_failure();
        thread::sleep(Duration::from_millis(50));

        assert!(cb.allow().is_ok());
        cb.on_failure();
        assert_eq!(cb.state(), CircuitState::Open);
        assert!(matches!(cb.allow(), Err(Error::CircuitOpen { .. })));
    }

    #[test]
    fn shared_across_threads() {
        let cb = Arc::new(CircuitBreaker::new(100, Duration::from_secs(30)));
        let mut handles = vec![];
        for _ in 0..10 {
            let cb = Arc::clone(&cb);
            handles.push(thread::spawn(move || {
                for _ in 0..5 {
                    cb.on_failure();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cb.snapshot().consecutive_failures, 50);
    }
}
