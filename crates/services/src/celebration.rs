//! Decorative confetti effect shown after a perfect score.
//!
//! The effect runs as a bounded tokio task. It stops on its own once its
//! duration has elapsed, and the returned handle aborts it when stopped or
//! dropped, so no scheduled work outlives the screen that started it.

use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub const CONFETTI_COLORS: [&str; 9] = [
    "#f00", "#0f0", "#00f", "#ff0", "#0ff", "#f0f", "#FFD700", "#ADFF2F", "#8A2BE2",
];

/// Particles emitted per tick.
pub const PARTICLES_PER_BURST: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CelebrationSettings {
    pub duration: Duration,
    pub interval: Duration,
}

impl Default for CelebrationSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(10),
            interval: Duration::from_millis(100),
        }
    }
}

/// A single falling piece of confetti.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub color: &'static str,
    pub size_px: u32,
    /// Horizontal start position, 0..100 (percent of viewport width).
    pub left_pct: f32,
    pub rotation_deg: u32,
    pub round: bool,
    pub fall: Duration,
}

/// A batch of particles generated for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiBurst {
    pub particles: Vec<Particle>,
}

impl ConfettiBurst {
    pub fn generate<R>(rng: &mut R, count: usize) -> Self
    where
        R: Rng + ?Sized,
    {
        let particles = (0..count)
            .map(|_| Particle {
                color: CONFETTI_COLORS.choose(rng).copied().unwrap_or("#fff"),
                size_px: rng.random_range(5..13),
                left_pct: rng.random_range(0.0..100.0),
                rotation_deg: rng.random_range(0..360),
                round: rng.random_bool(0.5),
                fall: Duration::from_millis(rng.random_range(3_000..5_000)),
            })
            .collect();
        Self { particles }
    }
}

/// Starts celebration effects.
pub struct Celebration;

impl Celebration {
    /// Run `on_tick` every `settings.interval` until `settings.duration` has elapsed.
    ///
    /// Returns `None` when called outside a tokio runtime.
    pub fn start<F>(settings: CelebrationSettings, mut on_tick: F) -> Option<CelebrationHandle>
    where
        F: FnMut(u32) + Send + 'static,
    {
        let handle = Handle::try_current().ok()?;
        let period = settings.interval.max(Duration::from_millis(1));
        let duration = settings.duration;

        let task = handle.spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick resolves immediately
            ticker.tick().await;

            let mut elapsed = Duration::ZERO;
            let mut tick = 0_u32;
            while elapsed < duration {
                ticker.tick().await;
                on_tick(tick);
                tick = tick.saturating_add(1);
                elapsed += period;
            }
        });

        Some(CelebrationHandle { task: Some(task) })
    }
}

/// Owner of a running effect; aborts it on `stop` or drop.
#[derive(Debug)]
pub struct CelebrationHandle {
    task: Option<JoinHandle<()>>,
}

impl CelebrationHandle {
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the effect to run to completion.
    pub async fn wait(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for CelebrationHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counter() -> (Arc<AtomicU32>, impl FnMut(u32) + Send + 'static) {
        let count = Arc::new(AtomicU32::new(0));
        let inner = Arc::clone(&count);
        (count, move |_| {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn runs_for_duration_then_stops() {
        let (count, on_tick) = counter();
        let settings = CelebrationSettings {
            duration: Duration::from_secs(1),
            interval: Duration::from_millis(100),
        };
        let handle = Celebration::start(settings, on_tick).unwrap();
        handle.wait().await;
        assert_eq!(count.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_ticks() {
        let (count, on_tick) = counter();
        let mut handle = Celebration::start(CelebrationSettings::default(), on_tick).unwrap();
        time::sleep(Duration::from_millis(350)).await;
        handle.stop();
        let at_stop = count.load(Ordering::SeqCst);
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_stop);
        assert!(at_stop < 100);
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_effect() {
        let (count, on_tick) = counter();
        let handle = Celebration::start(CelebrationSettings::default(), on_tick).unwrap();
        time::sleep(Duration::from_millis(250)).await;
        drop(handle);
        let at_drop = count.load(Ordering::SeqCst);
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_drop);
    }

    #[test]
    fn start_outside_runtime_is_none() {
        let (_count, on_tick) = counter();
        assert!(Celebration::start(CelebrationSettings::default(), on_tick).is_none());
    }

    #[test]
    fn burst_particles_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(4);
        let burst = ConfettiBurst::generate(&mut rng, PARTICLES_PER_BURST);
        assert_eq!(burst.particles.len(), PARTICLES_PER_BURST);
        for p in &burst.particles {
            assert!(CONFETTI_COLORS.contains(&p.color));
            assert!((5..13).contains(&p.size_px));
            assert!((0.0..100.0).contains(&p.left_pct));
            assert!(p.fall >= Duration::from_secs(3) && p.fall < Duration::from_secs(5));
        }
    }
}
