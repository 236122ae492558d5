//! BDD step definitions for the poll loop

use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use homework_bot::engine::{Engine, PollCursor, PollOutcome};
use homework_bot::BotError;

use crate::world::{EngineHandle, HomeworkBotWorld, QueuedSource, RecordingNotifier};

#[given(expr = "a poller starting at timestamp {int}")]
fn poller_at(world: &mut HomeworkBotWorld, timestamp: i64) {
    let source = Arc::new(QueuedSource::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = Engine::new(
        source.clone(),
        notifier.clone(),
        PollCursor::new(timestamp),
        Duration::from_millis(1),
        CancellationToken::new(),
    );
    world.source = Some(source);
    world.notifier = Some(notifier);
    world.engine = Some(EngineHandle(engine));
}

#[given(expr = "the review API will return {string}")]
fn queue_response(world: &mut HomeworkBotWorld, body: String) {
    let source = world.source.as_ref().expect("poller not set");
    let value = serde_json::from_str(&body).expect("invalid JSON in scenario");
    source.responses.lock().unwrap().push_back(Ok(value));
}

#[given("the review API will be unavailable")]
fn queue_unavailable(world: &mut HomeworkBotWorld) {
    let source = world.source.as_ref().expect("poller not set");
    source
        .responses
        .lock()
        .unwrap()
        .push_back(Err(BotError::UpstreamUnavailable));
}

#[given("the review API will be unreachable")]
fn queue_unreachable(world: &mut HomeworkBotWorld) {
    let source = world.source.as_ref().expect("poller not set");
    source
        .responses
        .lock()
        .unwrap()
        .push_back(Err(BotError::Http("connection refused".to_string())));
}

#[when(expr = "the poller runs {int} iteration(s)")]
async fn run_iterations(world: &mut HomeworkBotWorld, count: usize) {
    let engine = &mut world.engine.as_mut().expect("poller not set").0;
    for _ in 0..count {
        let outcome = engine.poll_once().await;
        world.outcomes.push(outcome);
    }
}

#[then(expr = "exactly {int} message(s) should be sent")]
fn message_count(world: &mut HomeworkBotWorld, count: usize) {
    let notifier = world.notifier.as_ref().expect("poller not set");
    assert_eq!(notifier.sent.lock().unwrap().len(), count);
}

#[then(expr = "the last message should be {string}")]
fn last_message_is(world: &mut HomeworkBotWorld, expected: String) {
    let notifier = world.notifier.as_ref().expect("poller not set");
    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.last().expect("no message sent"), &expected);
}

#[then(expr = "the last message should start with {string} and mention {string}")]
fn last_message_mentions(world: &mut HomeworkBotWorld, prefix: String, fragment: String) {
    let notifier = world.notifier.as_ref().expect("poller not set");
    let sent = notifier.sent.lock().unwrap();
    let last = sent.last().expect("no message sent");
    assert!(last.starts_with(&prefix), "{last}");
    assert!(last.contains(&fragment), "{last}");
}

#[then(expr = "the cursor should be {int}")]
fn cursor_is(world: &mut HomeworkBotWorld, expected: i64) {
    let engine = &world.engine.as_ref().expect("poller not set").0;
    assert_eq!(engine.cursor(), PollCursor::new(expected));
}

#[then(expr = "the review API should have been queried from {int}")]
fn queried_from(world: &mut HomeworkBotWorld, expected: i64) {
    let source = world.source.as_ref().expect("poller not set");
    let requested = source.requested.lock().unwrap();
    assert_eq!(requested.last(), Some(&expected));
}

#[then("the last iteration should report no updates")]
fn last_no_updates(world: &mut HomeworkBotWorld) {
    let last = world.outcomes.last().expect("no iteration ran");
    assert_eq!(last.as_ref().expect("iteration failed"), &PollOutcome::NoUpdates);
}

#[then("the last iteration should stop the poller")]
fn last_fatal(world: &mut HomeworkBotWorld) {
    let last = world.outcomes.last().expect("no iteration ran");
    let err = last.as_ref().expect_err("iteration unexpectedly succeeded");
    assert!(err.is_fatal(), "{err:?}");
}
