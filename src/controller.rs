//! Timer lifecycle: start, stop, rename and list running timers

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::{
    error::{Result, TimerError},
    state::{PresetKey, RunningTimer, TimerId},
    store::{PresetStore, TimerStore},
    tasks::{LaunchRequest, Launcher},
    utils::{format_duration, Clock, SystemClock},
};

/// Name given to timers started without one
pub const DEFAULT_TIMER_NAME: &str = "Untitled";

/// Acknowledgement returned by a start request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedTimer {
    pub identity: TimerId,
    pub name: String,
    pub duration_seconds: u64,
}

impl fmt::Display for StartedTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timer \"{}\" started for {}!",
            self.name,
            format_duration(self.duration_seconds)
        )
    }
}

/// Composes the timer store with a launcher. Holds no state of its own
/// between calls; everything lives in the store.
#[derive(Debug, Clone)]
pub struct TimerController<L, C = SystemClock> {
    store: TimerStore,
    launcher: L,
    clock: C,
}

impl<L: Launcher> TimerController<L> {
    pub fn new(store: TimerStore, launcher: L) -> Self {
        Self::with_clock(store, launcher, SystemClock)
    }
}

impl<L: Launcher, C: Clock> TimerController<L, C> {
    pub fn with_clock(store: TimerStore, launcher: L, clock: C) -> Self {
        Self {
            store,
            launcher,
            clock,
        }
    }

    pub fn store(&self) -> &TimerStore {
        &self.store
    }

    /// Write the record and hand it to the launcher; returns as soon as the
    /// countdown process has been spawned
    pub async fn start(&self, duration_seconds: u64, name: Option<&str>) -> Result<StartedTimer> {
        // blank names fall back to the default; anything else is kept verbatim
        let name = match name {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_TIMER_NAME,
        };

        let identity = self
            .store
            .create_at(name, duration_seconds, self.clock.now())
            .await?;

        let request = LaunchRequest {
            identity: identity.clone(),
            duration_seconds,
        };
        if let Err(e) = self.launcher.launch(&request).await {
            error!("Failed to launch countdown for {}: {}", identity, e);
            // a record with nothing counting it down would list forever
            if let Err(cleanup) = self.store.delete(&identity).await {
                warn!("Failed to remove orphaned record {}: {}", identity, cleanup);
            }
            return Err(e);
        }

        info!(
            "Started timer {:?} for {} ({})",
            name,
            format_duration(duration_seconds),
            identity
        );
        Ok(StartedTimer {
            identity,
            name: name.to_string(),
            duration_seconds,
        })
    }

    /// Start a timer from a saved preset
    pub async fn start_preset(
        &self,
        presets: &PresetStore,
        key: &PresetKey,
    ) -> Result<StartedTimer> {
        let preset = presets.get(key).await?;
        debug!("Starting preset {} ({:?})", key, preset.name);
        self.start(preset.time_in_seconds, Some(preset.name.as_str())).await
    }

    /// Cancel a timer. Stopping one that already fired is not an error.
    pub async fn stop(&self, identity: &TimerId) -> Result<()> {
        self.store.delete(identity).await?;
        info!("Stopped timer {}", identity);
        Ok(())
    }

    pub async fn rename(&self, identity: &TimerId, new_name: &str) -> Result<()> {
        self.store.rename(identity, new_name).await?;
        info!("Renamed timer {} to {:?}", identity, new_name);
        Ok(())
    }

    /// Running timers, soonest to fire first
    pub async fn list(&self) -> Result<Vec<RunningTimer>> {
        let identities = self.store.list().await?;
        self.running_timers(identities).await
    }

    /// Read and order the given records. A record can fire or be stopped
    /// after it was enumerated; such records are left out.
    async fn running_timers(&self, identities: Vec<TimerId>) -> Result<Vec<RunningTimer>> {
        let now = self.clock.now();
        let mut timers = Vec::new();

        for identity in identities {
            match self.store.read(&identity).await {
                Ok(record) => timers.push(RunningTimer::from_record(identity, record, now)),
                Err(e @ TimerError::CorruptRecord { .. }) => {
                    warn!("Skipping {}", e);
                }
                Err(e) if e.is_not_found() => {
                    debug!("Timer {} finished while listing", identity);
                }
                Err(e) => return Err(e),
            }
        }

        timers.sort_by_key(|timer| timer.time_left);
        Ok(timers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CustomTimer;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::{
        future::Future,
        sync::{Arc, Mutex},
    };
    use tempfile::TempDir;

    #[derive(Default, Clone)]
    struct RecordingLauncher {
        launched: Arc<Mutex<Vec<LaunchRequest>>>,
    }

    impl Launcher for RecordingLauncher {
        fn launch(&self, request: &LaunchRequest) -> impl Future<Output = Result<()>> + Send {
            self.launched.lock().unwrap().push(request.clone());
            async { Ok(()) }
        }
    }

    struct FailingLauncher;

    impl Launcher for FailingLauncher {
        fn launch(&self, _request: &LaunchRequest) -> impl Future<Output = Result<()>> + Send {
            async { Err(TimerError::Launch("no fork for you".into())) }
        }
    }

    /// Clock that can be moved forward by tests
    #[derive(Clone)]
    struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

    impl ManualClock {
        fn at(time: DateTime<Utc>) -> Self {
            Self(Arc::new(Mutex::new(time)))
        }

        fn advance(&self, by: Duration) {
            *self.0.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn test_controller() -> (
        TimerController<RecordingLauncher, ManualClock>,
        RecordingLauncher,
        ManualClock,
        TempDir,
    ) {
        let temp_dir = TempDir::new().unwrap();
        let launcher = RecordingLauncher::default();
        let clock = ManualClock::at(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap());
        let controller = TimerController::with_clock(
            TimerStore::new(temp_dir.path()),
            launcher.clone(),
            clock.clone(),
        );
        (controller, launcher, clock, temp_dir)
    }

    #[tokio::test]
    async fn start_then_list_shows_one_timer() {
        let (controller, launcher, _clock, _dir) = test_controller();

        let started = controller.start(300, Some("Eggs")).await.unwrap();

        let timers = controller.list().await.unwrap();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].identity, started.identity);
        assert_eq!(timers[0].name, "Eggs");
        assert_eq!(timers[0].time_left, 300);

        let launched = launcher.launched.lock().unwrap();
        assert_eq!(
            *launched,
            vec![LaunchRequest {
                identity: started.identity.clone(),
                duration_seconds: 300,
            }]
        );
    }

    #[tokio::test]
    async fn start_defaults_the_name() {
        let (controller, _launcher, _clock, _dir) = test_controller();

        let unnamed = controller.start(10, None).await.unwrap();
        let blank = controller.start(20, Some("   ")).await.unwrap();

        assert_eq!(unnamed.name, DEFAULT_TIMER_NAME);
        assert_eq!(blank.name, DEFAULT_TIMER_NAME);
        assert_eq!(unnamed.to_string(), "Timer \"Untitled\" started for 0:00:10!");
    }

    #[tokio::test]
    async fn start_keeps_the_name_verbatim() {
        let (controller, _launcher, _clock, _dir) = test_controller();

        let started = controller.start(60, Some("  Eggs ")).await.unwrap();

        assert_eq!(started.name, "  Eggs ");
        let timers = controller.list().await.unwrap();
        assert_eq!(timers[0].name, "  Eggs ");
    }

    #[tokio::test]
    async fn timers_gone_between_enumerate_and_read_are_left_out() {
        let (controller, _launcher, _clock, _dir) = test_controller();
        let fired = controller.start(5, Some("fired")).await.unwrap();
        controller.start(50, Some("still running")).await.unwrap();

        let identities = controller.store().list().await.unwrap();
        // the countdown process removes its record right after the enumeration
        controller.store().delete(&fired.identity).await.unwrap();

        let timers = controller.running_timers(identities).await.unwrap();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].name, "still running");
    }

    #[tokio::test]
    async fn zero_second_timer_lists_with_nothing_left() {
        let (controller, _launcher, _clock, _dir) = test_controller();
        controller.start(0, Some("now")).await.unwrap();

        let timers = controller.list().await.unwrap();
        assert_eq!(timers[0].time_left, 0);
    }

    #[tokio::test]
    async fn list_is_sorted_by_time_left() {
        let (controller, _launcher, clock, _dir) = test_controller();
        controller.start(500, Some("slow")).await.unwrap();
        controller.start(5, Some("fast")).await.unwrap();
        controller.start(50, Some("medium")).await.unwrap();
        clock.advance(Duration::seconds(2));

        let timers = controller.list().await.unwrap();
        let names: Vec<&str> = timers.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["fast", "medium", "slow"]);
        let left: Vec<u64> = timers.iter().map(|t| t.time_left).collect();
        assert_eq!(left, vec![3, 48, 498]);
    }

    #[tokio::test]
    async fn stop_removes_and_is_idempotent() {
        let (controller, _launcher, _clock, _dir) = test_controller();
        let keep = controller.start(60, Some("keep")).await.unwrap();
        let gone = controller.start(90, Some("gone")).await.unwrap();

        controller.stop(&gone.identity).await.unwrap();
        controller.stop(&gone.identity).await.unwrap();

        let timers = controller.list().await.unwrap();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].identity, keep.identity);
    }

    #[tokio::test]
    async fn rename_keeps_identity_and_schedule() {
        let (controller, launcher, _clock, _dir) = test_controller();
        let started = controller.start(120, Some("Untitled")).await.unwrap();

        controller.rename(&started.identity, "X").await.unwrap();

        let timers = controller.list().await.unwrap();
        assert_eq!(timers[0].name, "X");
        assert_eq!(timers[0].identity, started.identity);
        assert_eq!(launcher.launched.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rename_after_stop_is_not_found() {
        let (controller, _launcher, _clock, _dir) = test_controller();
        let started = controller.start(120, None).await.unwrap();
        controller.stop(&started.identity).await.unwrap();

        let err = controller.rename(&started.identity, "late").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_skips_corrupt_records() {
        let (controller, _launcher, _clock, dir) = test_controller();
        controller.start(30, Some("fine")).await.unwrap();
        std::fs::write(dir.path().join("broken---soon.timer"), "bad").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let timers = controller.list().await.unwrap();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].name, "fine");
    }

    #[tokio::test]
    async fn failed_launch_leaves_no_record() {
        let temp_dir = TempDir::new().unwrap();
        let controller = TimerController::new(TimerStore::new(temp_dir.path()), FailingLauncher);

        let err = controller.start(60, Some("doomed")).await.unwrap_err();

        assert!(matches!(err, TimerError::Launch(_)));
        assert!(controller.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn start_preset_uses_name_and_duration() {
        let (controller, launcher, _clock, dir) = test_controller();
        let presets = PresetStore::in_dir(dir.path());
        let key = presets.create(CustomTimer::new("Pomodoro", 1500)).await.unwrap();

        let started = controller.start_preset(&presets, &key).await.unwrap();

        assert_eq!(started.name, "Pomodoro");
        assert_eq!(started.duration_seconds, 1500);
        assert_eq!(launcher.launched.lock().unwrap()[0].duration_seconds, 1500);

        let missing: PresetKey = "nope".parse().unwrap();
        assert!(controller
            .start_preset(&presets, &missing)
            .await
            .unwrap_err()
            .is_not_found());
    }
}
