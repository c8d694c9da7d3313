//! Frame-driven timers
//!
//! Replaces wall-clock scheduling: timers only advance when the main loop
//! calls [`TimerManager::update`], so they pause and resume with the game.
//! A timer's "callback" is a typed event handed back to the caller when it
//! fires.

use super::pool::{Pool, PoolHandle, Poolable};

/// Default number of pre-warmed timers
const TIMER_POOL_INITIAL: usize = 20;
/// Hard ceiling on concurrently scheduled timers
const TIMER_POOL_MAX: usize = 50;

/// A single scheduled timer record
#[derive(Debug, Clone)]
pub struct Timer<E> {
    elapsed: f32,
    duration: f32,
    event: Option<E>,
    looping: bool,
    active: bool,
}

impl<E> Default for Timer<E> {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            duration: 0.0,
            event: None,
            looping: false,
            active: false,
        }
    }
}

impl<E: Copy> Timer<E> {
    /// Advance the timer, pushing its event into `fired` when it elapses.
    /// Returns `true` once a one-shot timer is done.
    fn tick(&mut self, dt: f32, fired: &mut Vec<E>) -> bool {
        if !self.active {
            return true;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            if let Some(event) = self.event {
                fired.push(event);
            }
            if self.looping && self.duration > 0.0 {
                self.elapsed -= self.duration;
            } else {
                self.active = false;
                return true;
            }
        }
        false
    }
}

impl<E: Copy> Poolable for Timer<E> {
    type Args = (f32, E, bool);

    fn reset(&mut self, (duration, event, looping): Self::Args) {
        self.elapsed = 0.0;
        self.duration = duration;
        self.event = Some(event);
        self.looping = looping;
        self.active = true;
    }

    /// Ticking without an event sink only advances time
    fn update(&mut self, dt: f32) -> bool {
        let mut sink = Vec::new();
        self.tick(dt, &mut sink)
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.event = None;
    }
}

/// Pool-backed scheduler of typed timer events
pub struct TimerManager<E: Copy + 'static> {
    pool: Pool<Timer<E>>,
}

impl<E: Copy + 'static> Default for TimerManager<E> {
    fn default() -> Self {
        Self::new(TIMER_POOL_INITIAL)
    }
}

impl<E: Copy + 'static> TimerManager<E> {
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool: Pool::new(Timer::default, pool_size, TIMER_POOL_MAX.max(pool_size)),
        }
    }

    /// Fire `event` once after `duration`. `None` if the timer pool is exhausted.
    pub fn schedule(&mut self, duration: f32, event: E) -> Option<PoolHandle> {
        self.pool.acquire((duration, event, false))
    }

    /// Fire `event` every `duration` until cancelled
    pub fn schedule_repeating(&mut self, duration: f32, event: E) -> Option<PoolHandle> {
        self.pool.acquire((duration, event, true))
    }

    /// Deactivate and release a timer; stale handles are ignored
    pub fn cancel(&mut self, handle: PoolHandle) {
        if let Some(timer) = self.pool.get_mut(handle) {
            timer.active = false;
        }
        self.pool.release(handle);
    }

    /// Advance every timer by `dt`, appending fired events to `fired`
    pub fn update(&mut self, dt: f32, fired: &mut Vec<E>) {
        self.pool.update_with(|timer| timer.tick(dt, fired));
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.pool.clear();
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Ev {
        Ping,
        Tick,
    }

    #[test]
    fn test_one_shot_fires_once_and_releases() {
        let mut timers = TimerManager::new(2);
        timers.schedule(100.0, Ev::Ping).unwrap();
        let mut fired = Vec::new();

        timers.update(60.0, &mut fired);
        assert!(fired.is_empty());
        timers.update(60.0, &mut fired);
        assert_eq!(fired, vec![Ev::Ping]);
        assert_eq!(timers.active_count(), 0);

        timers.update(500.0, &mut fired);
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn test_repeating_wraps_elapsed() {
        let mut timers = TimerManager::new(2);
        timers.schedule_repeating(50.0, Ev::Tick).unwrap();
        let mut fired = Vec::new();
        for _ in 0..10 {
            timers.update(20.0, &mut fired);
        }
        // 200ms of 50ms periods
        assert_eq!(fired.len(), 4);
        assert_eq!(timers.active_count(), 1);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut timers = TimerManager::new(2);
        let handle = timers.schedule(10.0, Ev::Ping).unwrap();
        timers.cancel(handle);
        let mut fired = Vec::new();
        timers.update(100.0, &mut fired);
        assert!(fired.is_empty());
        assert_eq!(timers.active_count(), 0);

        // Cancelling a stale handle does not touch the recycled timer
        let other = timers.schedule(10.0, Ev::Tick).unwrap();
        timers.cancel(handle);
        timers.update(20.0, &mut fired);
        assert_eq!(fired, vec![Ev::Tick]);
        assert!(timers.pool.get(other).is_none());
    }

    #[test]
    fn test_timers_do_not_advance_without_update() {
        let mut timers = TimerManager::new(1);
        timers.schedule(1.0, Ev::Ping);
        let mut fired = Vec::new();
        timers.update(0.0, &mut fired);
        assert!(fired.is_empty());
        assert_eq!(timers.active_count(), 1);
    }
}
