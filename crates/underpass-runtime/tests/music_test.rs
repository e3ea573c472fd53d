//! Integration tests for loop music and one-shot sounds driven through the
//! boundary.

mod common;

use chrono::TimeDelta;
use underpass_audio::domain::one_shot::OneShotState;
use underpass_core::message::Inbound;
use underpass_test_support::{AudioCall, test_epoch};

#[test]
fn test_queue_loop_while_idle_starts_immediately() {
    // Arrange
    let mut harness = common::start(common::MANIFEST);

    // Act
    harness
        .runtime
        .dispatch(Inbound::QueueLoopReq("platform".into()));

    // Assert
    let state = harness.runtime.loop_state();
    assert_eq!(state.current(), Some("platform"));
    assert_eq!(state.started_at(), Some(test_epoch()));
    assert_eq!(
        harness.audio.calls(),
        vec![
            AudioCall::Play("song".into(), 1.0, false),
            AudioCall::Play("piano2".into(), 0.0, false),
        ]
    );
}

#[test]
fn test_queued_loop_takes_over_at_boundary() {
    // Arrange
    let mut harness = common::start(common::MANIFEST);
    harness.complete("song_long", Some(TimeDelta::seconds(6)));
    harness
        .runtime
        .dispatch(Inbound::QueueLoopReq("platform".into()));
    harness.frame(1000);

    // Act
    harness.runtime.dispatch(Inbound::QueueLoopReq("tunnel".into()));
    harness.run_for(2000, 500);
    let before_boundary = harness.runtime.loop_state().current().map(str::to_owned);
    harness.run_for(1000, 500);

    // Assert
    assert_eq!(before_boundary.as_deref(), Some("platform"));
    let state = harness.runtime.loop_state();
    assert_eq!(state.current(), Some("tunnel"));
    assert_eq!(state.started_at(), Some(test_epoch() + TimeDelta::seconds(4)));
    assert_eq!(
        harness.audio.calls().last(),
        Some(&AudioCall::Play("song_long".into(), 1.0, false))
    );
}

#[test]
fn test_loop_without_known_length_is_dropped() {
    // Arrange
    let mut harness = common::start(common::MANIFEST);

    // Act
    harness.runtime.dispatch(Inbound::QueueLoopReq("tunnel".into()));
    harness.frame(16);

    // Assert
    assert_eq!(harness.runtime.loop_state().current(), None);
    assert!(harness.audio.calls().is_empty());
    assert_eq!(harness.runtime.pending_timers(), 0);
}

#[test]
fn test_drama_fades_in_over_configured_time() {
    // Arrange
    let mut harness = common::start(common::MANIFEST);
    harness
        .runtime
        .dispatch(Inbound::QueueLoopReq("platform".into()));
    harness.audio.take();

    // Act
    harness.runtime.dispatch(Inbound::AddDramaReq);

    // Assert
    assert_eq!(
        harness.audio.calls(),
        vec![AudioCall::Fade(
            "piano2".into(),
            0.0,
            1.0,
            TimeDelta::seconds(1)
        )]
    );
}

#[test]
fn test_stop_music_silences_both_layers() {
    // Arrange
    let mut harness = common::start(common::MANIFEST);
    harness
        .runtime
        .dispatch(Inbound::QueueLoopReq("platform".into()));
    harness.audio.take();

    // Act
    harness.runtime.dispatch(Inbound::StopMusic);
    harness.run_for(8000, 1000);

    // Assert
    assert_eq!(
        harness.audio.calls(),
        vec![
            AudioCall::Stop("song".into()),
            AudioCall::Stop("piano2".into()),
        ]
    );
    assert_eq!(harness.runtime.loop_state().current(), None);
    assert_eq!(harness.runtime.pending_timers(), 0);
}

#[test]
fn test_stop_sound_fades_out_then_halts() {
    // Arrange
    let mut harness = common::start(common::MANIFEST);
    harness
        .runtime
        .dispatch(Inbound::PlaySound("subway_ambient_loop".into()));

    // Act
    harness
        .runtime
        .dispatch(Inbound::StopSound("subway_ambient_loop".into()));
    let fading = harness.runtime.one_shot_state("subway_ambient_loop");
    harness.frame(1000);

    // Assert
    assert!(matches!(fading, OneShotState::Fading { .. }));
    assert_eq!(
        harness.runtime.one_shot_state("subway_ambient_loop"),
        OneShotState::Stopped
    );
    assert_eq!(
        harness.audio.calls(),
        vec![
            AudioCall::Play("subway_ambient_loop".into(), 0.6, true),
            AudioCall::Fade(
                "subway_ambient_loop".into(),
                0.6,
                0.0,
                TimeDelta::seconds(1)
            ),
            AudioCall::Stop("subway_ambient_loop".into()),
            AudioCall::SetVolume("subway_ambient_loop".into(), 0.6),
        ]
    );
}

#[test]
fn test_unknown_and_failed_sounds_never_reach_audio() {
    // Arrange
    let mut harness = common::start(common::MANIFEST);
    harness.fail("subway_whistle");

    // Act
    harness.runtime.dispatch(Inbound::PlaySound("subway_horn".into()));
    harness
        .runtime
        .dispatch(Inbound::PlaySound("subway_whistle".into()));
    harness.runtime.dispatch(Inbound::QueueLoopReq("nope".into()));

    // Assert
    assert!(harness.audio.calls().is_empty());
    assert!(harness.sink.sent().is_empty());
    assert_eq!(harness.runtime.loop_state().current(), None);
}

#[test]
fn test_play_sound_repeats_only_declared_loops() {
    // Arrange
    let mut harness = common::start(common::MANIFEST);

    // Act
    harness
        .runtime
        .dispatch(Inbound::PlaySound("subway_ambient_loop".into()));
    harness
        .runtime
        .dispatch(Inbound::PlaySound("subway_whistle".into()));

    // Assert
    assert_eq!(
        harness.audio.calls(),
        vec![
            AudioCall::Play("subway_ambient_loop".into(), 0.6, true),
            AudioCall::Play("subway_whistle".into(), 1.0, false),
        ]
    );
}

#[test]
fn test_stop_sound_fades_a_playing_loop_layer() {
    // Arrange
    let mut harness = common::start(common::MANIFEST);
    harness
        .runtime
        .dispatch(Inbound::QueueLoopReq("platform".into()));
    harness.audio.take();

    // Act
    harness.runtime.dispatch(Inbound::StopSound("song".into()));
    harness.frame(1000);

    // Assert
    assert_eq!(
        harness.audio.calls()[..2],
        [
            AudioCall::Fade("song".into(), 1.0, 0.0, TimeDelta::seconds(1)),
            AudioCall::Stop("song".into()),
        ]
    );
}
