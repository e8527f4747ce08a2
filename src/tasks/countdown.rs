//! Body of the detached countdown process

use std::time::Duration;

use tracing::{error, info};

use crate::{
    services::CompletionAction,
    state::TimerId,
    store::TimerStore,
    utils::{format_duration, Sleeper},
};

/// How a countdown ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// Completion action ran and the record was removed
    Fired,
    /// The record was gone when the wait ended
    Cancelled,
    /// The completion action or a storage call failed; the record is kept
    Failed,
}

/// Wait out `duration`, then fire the completion action if the timer's record
/// still exists.
///
/// The record is looked up only after the wait, so stopping a timer at any
/// point before it wakes suppresses the action. Nothing is returned to the
/// process that started the timer; every failure is logged here.
pub async fn run_countdown<S, A>(
    store: &TimerStore,
    identity: &TimerId,
    duration: Duration,
    sleeper: &S,
    action: &A,
) -> CountdownOutcome
where
    S: Sleeper,
    A: CompletionAction,
{
    info!(
        "Countdown for {} started ({})",
        identity,
        format_duration(duration.as_secs())
    );

    sleeper.sleep(duration).await;

    let name = match store.read_name(identity).await {
        Ok(name) => name,
        Err(e) if e.is_not_found() => {
            info!("Timer {} was deleted, not firing", identity);
            return CountdownOutcome::Cancelled;
        }
        Err(e) => {
            error!("Failed to read timer {} at fire time: {}", identity, e);
            return CountdownOutcome::Failed;
        }
    };

    if let Err(e) = action.complete(&name).await {
        error!("Timer {:?} ({}) could not complete: {}", name, identity, e);
        return CountdownOutcome::Failed;
    }

    if let Err(e) = store.delete(identity).await {
        error!("Timer {:?} fired but its record could not be removed: {}", name, e);
        return CountdownOutcome::Failed;
    }

    info!("Timer {:?} fired", name);
    CountdownOutcome::Fired
}
