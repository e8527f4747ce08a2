//! End-to-end timer lifecycle against a temporary storage root, with the
//! detached process replaced by running its countdown in-process

use std::{
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

use ding::{
    services::CompletionAction,
    tasks::{run_countdown, CountdownOutcome, LaunchRequest, Launcher},
    utils::Sleeper,
    CustomTimer, PresetStore, Result, Settings, TimerController,
};
use tempfile::TempDir;

#[derive(Default, Clone)]
struct QueueLauncher {
    queued: Arc<Mutex<Vec<LaunchRequest>>>,
}

impl QueueLauncher {
    fn take(&self) -> Vec<LaunchRequest> {
        std::mem::take(&mut *self.queued.lock().unwrap())
    }
}

impl Launcher for QueueLauncher {
    fn launch(&self, request: &LaunchRequest) -> impl Future<Output = Result<()>> + Send {
        self.queued.lock().unwrap().push(request.clone());
        async { Ok(()) }
    }
}

struct InstantSleeper;

impl Sleeper for InstantSleeper {
    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
        async {}
    }
}

#[derive(Default, Clone)]
struct Notifier {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl CompletionAction for Notifier {
    fn complete(&self, timer_name: &str) -> impl Future<Output = Result<()>> + Send {
        self.spoken.lock().unwrap().push(timer_name.to_string());
        async { Ok(()) }
    }
}

fn setup() -> (TimerController<QueueLauncher>, QueueLauncher, Settings, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::new(temp_dir.path());
    let launcher = QueueLauncher::default();
    let controller = TimerController::new(settings.timer_store(), launcher.clone());
    (controller, launcher, settings, temp_dir)
}

#[tokio::test]
async fn started_timers_fire_once_and_disappear() {
    let (controller, launcher, settings, _dir) = setup();
    let store = settings.timer_store();
    let notifier = Notifier::default();

    controller.start(5, Some("short")).await.unwrap();
    controller.start(50, Some("long")).await.unwrap();
    assert_eq!(controller.list().await.unwrap().len(), 2);

    for request in launcher.take() {
        let outcome = run_countdown(
            &store,
            &request.identity,
            Duration::from_secs(request.duration_seconds),
            &InstantSleeper,
            &notifier,
        )
        .await;
        assert_eq!(outcome, CountdownOutcome::Fired);
    }

    let mut spoken = notifier.spoken.lock().unwrap().clone();
    spoken.sort();
    assert_eq!(spoken, vec!["long", "short"]);
    assert!(controller.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn stopped_timer_is_skipped_when_its_process_wakes() {
    let (controller, launcher, settings, _dir) = setup();
    let notifier = Notifier::default();

    let started = controller.start(30, Some("cancel me")).await.unwrap();
    controller.stop(&started.identity).await.unwrap();
    // the user may stop it again; still fine
    controller.stop(&started.identity).await.unwrap();

    let request = launcher.take().pop().unwrap();
    let outcome = run_countdown(
        &settings.timer_store(),
        &request.identity,
        Duration::from_secs(30),
        &InstantSleeper,
        &notifier,
    )
    .await;

    assert_eq!(outcome, CountdownOutcome::Cancelled);
    assert!(notifier.spoken.lock().unwrap().is_empty());
}

#[tokio::test]
async fn renamed_timer_fires_under_its_new_name() {
    let (controller, launcher, settings, _dir) = setup();
    let notifier = Notifier::default();

    let started = controller.start(60, None).await.unwrap();
    controller.rename(&started.identity, "Laundry").await.unwrap();

    let request = launcher.take().pop().unwrap();
    assert_eq!(request.identity, started.identity);

    run_countdown(
        &settings.timer_store(),
        &request.identity,
        Duration::from_secs(60),
        &InstantSleeper,
        &notifier,
    )
    .await;

    assert_eq!(*notifier.spoken.lock().unwrap(), vec!["Laundry".to_string()]);
}

#[tokio::test]
async fn presets_share_the_storage_root_without_showing_up_as_timers() {
    let (controller, launcher, settings, _dir) = setup();
    let presets: PresetStore = settings.preset_store();

    let key = presets.create(CustomTimer::new("Pomodoro", 1500)).await.unwrap();
    controller.start_preset(&presets, &key).await.unwrap();

    let timers = controller.list().await.unwrap();
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].name, "Pomodoro");
    assert!(timers[0].time_left >= 1499);
    assert_eq!(launcher.take()[0].duration_seconds, 1500);

    presets.delete(&key).await.unwrap();
    presets.delete(&key).await.unwrap();
    assert!(presets.read_all().await.unwrap().is_empty());
}
