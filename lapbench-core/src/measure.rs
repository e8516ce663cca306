//! High-Precision Timing
//!
//! Samples the wall clock and the per-thread CPU clock around each probe.
//! On Unix the CPU clock is `CLOCK_THREAD_CPUTIME_ID` (the timed loop runs on
//! the calling thread, so the thread clock is the right scope); elsewhere the
//! wall clock stands in for both readings.

use std::time::Instant;

/// Whether this platform provides a real per-thread CPU clock.
/// When `false`, CPU-time readings fall back to the wall clock.
pub const HAS_CPU_CLOCK: bool = cfg!(unix);

/// Read the calling thread's consumed CPU time in nanoseconds.
#[cfg(unix)]
#[inline]
fn thread_cpu_ns() -> u64 {
    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: clock_gettime with CLOCK_THREAD_CPUTIME_ID writes the given
    // timespec and is available on all supported Unix targets.
    let rc = unsafe { libc::clock_gettime(libc::CLOCK_THREAD_CPUTIME_ID, &mut ts) };
    if rc != 0 {
        return 0;
    }
    (ts.tv_sec as u64).saturating_mul(1_000_000_000) + ts.tv_nsec as u64
}

// ─── Timer ───────────────────────────────────────────────────────────────────

/// Elapsed readings from one probe window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    /// Wall-clock nanoseconds.
    pub wall_ns: u64,
    /// CPU nanoseconds consumed by the calling thread. Equals `wall_ns` on
    /// platforms without a CPU clock.
    pub cpu_ns: u64,
}

/// Timer spanning the measured window of a single probe.
///
/// Both clocks are read at start and stop; nothing else happens inside the
/// window, so the readings carry only the benchmarked work plus fixed
/// clock-read overhead.
pub struct Timer {
    wall: Instant,
    #[cfg(unix)]
    cpu: u64,
}

impl Timer {
    /// Start a new timer.
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            wall: Instant::now(),
            #[cfg(unix)]
            cpu: thread_cpu_ns(),
        }
    }

    /// Stop the timer and return both elapsed readings.
    #[inline(always)]
    pub fn stop(&self) -> Elapsed {
        let wall_ns = self.wall.elapsed().as_nanos() as u64;

        #[cfg(unix)]
        let cpu_ns = thread_cpu_ns().saturating_sub(self.cpu);
        #[cfg(not(unix))]
        let cpu_ns = wall_ns;

        Elapsed { wall_ns, cpu_ns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_wall_elapsed() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.stop();

        // Should be at least 5ms, under 100ms (accounting for scheduling)
        assert!(elapsed.wall_ns >= 5_000_000);
        assert!(elapsed.wall_ns < 100_000_000);
    }

    #[test]
    fn test_cpu_advances_under_load() {
        let timer = Timer::start();
        let mut acc = 0u64;
        for i in 0..2_000_000u64 {
            acc = acc.wrapping_add(i);
        }
        std::hint::black_box(acc);
        let elapsed = timer.stop();

        assert!(elapsed.cpu_ns > 0, "busy loop must consume CPU time");
    }

    #[cfg(unix)]
    #[test]
    fn test_cpu_idle_while_sleeping() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(20));
        let elapsed = timer.stop();

        // A sleeping thread accrues far less CPU time than wall time.
        assert!(elapsed.cpu_ns < elapsed.wall_ns);
    }

    #[cfg(unix)]
    #[test]
    fn test_cpu_clock_monotonic() {
        let a = thread_cpu_ns();
        let b = thread_cpu_ns();
        assert!(b >= a, "thread CPU clock should be monotonic");
    }
}
