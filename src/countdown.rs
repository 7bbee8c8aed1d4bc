use std::io::{Stdout, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{interval, sleep};

use crate::duration;

/// Number of progress updates drawn over a countdown.
pub const TICKS: u32 = 100;

/// Snapshot of a running countdown at one tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub percent: u32,
    pub elapsed: Duration,
    pub remaining: Duration,
    pub total: Duration,
}

/// Receives progress updates from the ticker task and the final expiry.
pub trait ProgressSink: Send + Sync {
    fn update(&self, progress: &Progress);

    fn expired(&self, total: Duration);
}

const BLANK: &str =
    "                                                                                 ";

fn progress_line(progress: &Progress) -> String {
    format!(
        "⏲  {:>3}% [passed: {}, remaining: {}, total: {}]",
        progress.percent,
        duration::format(progress.elapsed),
        duration::format(progress.remaining),
        duration::format(progress.total),
    )
}

/// Redraws a single progress line, on stdout by default.
///
/// Write failures (closed pipe, full disk) are dropped; the countdown
/// itself still runs to completion.
pub struct TerminalProgress<W = Stdout> {
    out: Mutex<W>,
}

impl TerminalProgress<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn draw(&self, text: &str, trailer: Option<&str>) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(e) = Self::draw_to(&mut *out, text, trailer) {
            tracing::debug!("progress output dropped: {}", e);
        }
    }

    fn draw_to(out: &mut W, text: &str, trailer: Option<&str>) -> std::io::Result<()> {
        write!(out, "\r{}\r{}", BLANK, text)?;
        if let Some(line) = trailer {
            writeln!(out, "\n{}", line)?;
        }
        out.flush()
    }
}

impl<W: Write + Send> ProgressSink for TerminalProgress<W> {
    fn update(&self, progress: &Progress) {
        self.draw(&progress_line(progress), None);
    }

    fn expired(&self, total: Duration) {
        let line = progress_line(&Progress {
            percent: TICKS,
            elapsed: total,
            remaining: Duration::ZERO,
            total,
        });
        self.draw(&line, Some("⏰  Timer expired!"));
    }
}

/// A fixed-length wait split into [`TICKS`] display steps.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    total: Duration,
    unit: Duration,
}

impl Countdown {
    pub fn new(total: Duration) -> Self {
        let unit = (total / TICKS).max(Duration::from_nanos(1));
        Self { total, unit }
    }

    pub fn progress_at(&self, tick: u32) -> Progress {
        let elapsed = self.unit.saturating_mul(tick).min(self.total);
        Progress {
            percent: tick.min(TICKS),
            elapsed,
            remaining: self.total - elapsed,
            total: self.total,
        }
    }

    /// Block for the full duration while a background task draws progress.
    ///
    /// The ticker has stopped and been joined before `expired` is called, so
    /// no update can land after the expiry.
    pub async fn run(self, sink: Arc<dyn ProgressSink>) {
        tracing::debug!(
            "countdown of {} started, tick every {:?}",
            duration::format(self.total),
            self.unit
        );

        let (stop_tx, stop_rx) = oneshot::channel();
        let ticker = tokio::spawn(self.tick(sink.clone(), stop_rx));

        sleep(self.total).await;

        // The ticker may already have drawn its last update and exited.
        let _ = stop_tx.send(());
        if let Err(e) = ticker.await {
            tracing::warn!("progress ticker ended abnormally: {}", e);
        }

        sink.expired(self.total);
    }

    async fn tick(self, sink: Arc<dyn ProgressSink>, mut stop: oneshot::Receiver<()>) {
        let mut clock = interval(self.unit);

        for tick in 0..TICKS {
            tokio::select! {
                biased;
                _ = &mut stop => {
                    tracing::debug!("ticker stopped after {} updates", tick);
                    return;
                }
                _ = clock.tick() => sink.update(&self.progress_at(tick)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, PartialEq)]
    enum Event {
        Update(Progress),
        Expired(Duration),
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<Event>>,
    }

    impl ProgressSink for Recorder {
        fn update(&self, progress: &Progress) {
            self.events.lock().unwrap().push(Event::Update(*progress));
        }

        fn expired(&self, total: Duration) {
            self.events.lock().unwrap().push(Event::Expired(total));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hundred_updates_before_expiry() {
        let total = Duration::from_secs(100);
        let recorder = Arc::new(Recorder::default());

        Countdown::new(total).run(recorder.clone()).await;

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 101);
        assert_eq!(events.last(), Some(&Event::Expired(total)));

        let updates: Vec<&Progress> = events
            .iter()
            .filter_map(|e| match e {
                Event::Update(p) => Some(p),
                Event::Expired(_) => None,
            })
            .collect();
        assert_eq!(updates.len(), TICKS as usize);

        let mut last_elapsed = Duration::ZERO;
        for (i, p) in updates.iter().enumerate() {
            assert_eq!(p.percent, i as u32);
            assert!(p.elapsed >= last_elapsed);
            assert!(p.elapsed <= total);
            assert_eq!(p.elapsed + p.remaining, total);
            last_elapsed = p.elapsed;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocks_for_full_duration() {
        let start = tokio::time::Instant::now();
        Countdown::new(Duration::from_secs(90))
            .run(Arc::new(Recorder::default()))
            .await;
        assert!(start.elapsed() >= Duration::from_secs(90));
    }

    #[tokio::test]
    async fn test_no_update_after_expiry_in_real_time() {
        let recorder = Arc::new(Recorder::default());
        Countdown::new(Duration::from_millis(200))
            .run(recorder.clone())
            .await;

        let events = recorder.events.lock().unwrap();
        assert!(matches!(events.last(), Some(Event::Expired(_))));
        let expiries = events
            .iter()
            .filter(|e| matches!(e, Event::Expired(_)))
            .count();
        assert_eq!(expiries, 1);
        assert!(events.len() <= TICKS as usize + 1);
    }

    #[test]
    fn test_progress_is_clamped() {
        let countdown = Countdown::new(Duration::from_secs(1));
        let p = countdown.progress_at(TICKS + 5);
        assert_eq!(p.percent, TICKS);
        assert_eq!(p.elapsed, Duration::from_secs(1));
        assert_eq!(p.remaining, Duration::ZERO);

        let p = countdown.progress_at(25);
        assert_eq!(p.elapsed, Duration::from_millis(250));
        assert_eq!(p.remaining, Duration::from_millis(750));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tiny_duration_does_not_hang() {
        let recorder = Arc::new(Recorder::default());
        Countdown::new(Duration::from_nanos(50))
            .run(recorder.clone())
            .await;
        let events = recorder.events.lock().unwrap();
        assert!(matches!(events.last(), Some(Event::Expired(_))));
    }

    #[test]
    fn test_terminal_line() {
        let line = progress_line(&Countdown::new(Duration::from_secs(200)).progress_at(50));
        assert_eq!(line, "⏲   50% [passed: 1m40s, remaining: 1m40s, total: 3m20s]");
    }

    #[test]
    fn test_terminal_expiry_ends_with_message() {
        let sink = TerminalProgress::new(Vec::new());
        sink.update(&Countdown::new(Duration::from_secs(1)).progress_at(99));
        sink.expired(Duration::from_secs(1));

        let text = String::from_utf8(sink.out.into_inner().unwrap()).unwrap();
        assert!(text.contains(" 99% [passed: 990ms"));
        assert!(text.contains("100% [passed: 1s, remaining: 0s, total: 1s]"));
        assert!(text.ends_with("\n⏰  Timer expired!\n"));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_output_does_not_abort_countdown() {
        let sink = Arc::new(TerminalProgress::new(ClosedPipe));
        let start = tokio::time::Instant::now();

        Countdown::new(Duration::from_secs(3)).run(sink.clone()).await;
        sink.expired(Duration::from_secs(3));

        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
