// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::collections::BTreeSet;
use std::path::PathBuf;

use proptest::prelude::*;

use super::*;
use crate::{
    display::{DisplayState, PlayIcon},
    logging::init_test_logging,
    player::fake::{Call, FakeBackend},
};

const TRACK_MS: u64 = 120_000;

fn session(names: &[&str]) -> PlaybackSession<FakeBackend> {
    init_test_logging();

    let mut session = PlaybackSession::new(
        FakeBackend::with_duration(TRACK_MS),
        Volume::default(),
        DEFAULT_SKIP_STEP_MS,
    );
    session.open_files(names.iter().map(PathBuf::from));
    session.backend_mut().calls.clear();
    session
}

fn set(indices: &[usize]) -> BTreeSet<usize> {
    indices.iter().copied().collect()
}

fn last_loaded(session: &PlaybackSession<FakeBackend>) -> Option<PathBuf> {
    session.backend().loaded_paths().last().cloned()
}

#[test]
fn new_session_applies_default_volume() {
    let session = PlaybackSession::new(FakeBackend::new(), Volume::default(), DEFAULT_SKIP_STEP_MS);
    assert_eq!(session.backend().volume, Some(50));
    assert_eq!(session.state(), PlaybackState::Stopped);
}

#[test]
fn open_files_appends_without_playing() {
    let mut session = session(&["A.mp3"]);
    session.dispatch(Intent::OpenFiles(vec!["B.mp3".into(), "A.mp3".into()]));

    assert_eq!(session.playlist().len(), 3);
    assert_eq!(session.playlist().current(), None);
    assert_eq!(session.state(), PlaybackState::Stopped);
    assert!(session.backend().calls.is_empty());
}

#[test]
fn double_click_loads_and_plays_row() {
    let mut session = session(&["A.mp3", "B.mp3"]);
    session.dispatch(Intent::DoubleClickRow(1));

    assert_eq!(session.playlist().current(), Some(1));
    assert_eq!(session.loaded_index(), Some(1));
    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(
        session.backend().calls,
        [Call::Load("B.mp3".into()), Call::SetVolume(50), Call::Play]
    );

    let display = session.display_state();
    assert_eq!(display.now_playing_text, "B.mp3");
    assert_eq!(display.duration_text, "02:00");
    assert_eq!(display.play_icon, PlayIcon::Pause);
}

#[test]
fn double_click_out_of_range_is_a_no_op() {
    let mut session = session(&["A.mp3"]);
    session.dispatch(Intent::DoubleClickRow(4));

    assert_eq!(session.playlist().current(), None);
    assert_eq!(session.state(), PlaybackState::Stopped);
    assert!(session.backend().calls.is_empty());
}

#[test]
fn toggle_on_empty_playlist_is_a_no_op() {
    let mut session = session(&[]);
    assert_eq!(session.toggle_play_pause(), Err(PlaybackError::EmptyPlaylist));

    session.dispatch(Intent::TogglePlayPause);
    assert!(session.backend().calls.is_empty());
    assert_eq!(session.state(), PlaybackState::Stopped);
}

#[test]
fn toggle_without_highlighted_row_is_a_no_op() {
    let mut session = session(&["A.mp3"]);
    assert_eq!(session.toggle_play_pause(), Err(PlaybackError::NothingSelected));
    assert!(session.backend().calls.is_empty());
}

#[test]
fn toggle_starts_highlighted_row_then_pauses_and_resumes() {
    let mut session = session(&["A.mp3", "B.mp3"]);
    session.dispatch(Intent::Highlight(1));
    assert!(session.backend().calls.is_empty());

    session.dispatch(Intent::TogglePlayPause);
    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(last_loaded(&session), Some("B.mp3".into()));

    session.dispatch(Intent::TogglePlayPause);
    assert_eq!(session.state(), PlaybackState::Paused);
    assert_eq!(session.display_state().play_icon, PlayIcon::Play);
    assert_eq!(session.loaded_index(), Some(1));

    session.dispatch(Intent::TogglePlayPause);
    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(session.backend().loaded_paths().len(), 1);
}

#[test]
fn stop_unloads_but_keeps_current_index() {
    let mut session = session(&["A.mp3", "B.mp3", "C.mp3"]);
    session.dispatch(Intent::DoubleClickRow(2));
    session.backend_mut().set_position(30_000);

    session.dispatch(Intent::Stop);
    assert_eq!(session.state(), PlaybackState::Stopped);
    assert_eq!(session.loaded_index(), None);
    assert_eq!(session.playlist().current(), Some(2));
    assert_eq!(session.display_state(), DisplayState::idle());

    session.dispatch(Intent::TogglePlayPause);
    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(last_loaded(&session), Some("C.mp3".into()));
}

#[test]
fn next_and_previous_wrap_around() {
    let mut session = session(&["A.mp3", "B.mp3", "C.mp3"]);
    session.dispatch(Intent::DoubleClickRow(2));

    session.dispatch(Intent::Next);
    assert_eq!(session.playlist().current(), Some(0));
    assert_eq!(last_loaded(&session), Some("A.mp3".into()));
    assert_eq!(session.state(), PlaybackState::Playing);

    session.dispatch(Intent::Previous);
    assert_eq!(session.playlist().current(), Some(2));
    assert_eq!(last_loaded(&session), Some("C.mp3".into()));
    assert_eq!(session.state(), PlaybackState::Playing);
}

#[test]
fn navigation_without_current_index_starts_at_the_ends() {
    let mut session = session(&["A.mp3", "B.mp3", "C.mp3"]);
    session.dispatch(Intent::Next);
    assert_eq!(session.playlist().current(), Some(0));

    let mut session = self::session(&["A.mp3", "B.mp3", "C.mp3"]);
    session.dispatch(Intent::Previous);
    assert_eq!(session.playlist().current(), Some(2));
}

#[test]
fn navigation_on_empty_playlist_is_a_no_op() {
    let mut session = session(&[]);
    assert_eq!(session.next(), Err(PlaybackError::EmptyPlaylist));
    assert_eq!(session.previous(), Err(PlaybackError::EmptyPlaylist));

    session.dispatch(Intent::Next);
    session.dispatch(Intent::Previous);
    assert_eq!(session.state(), PlaybackState::Stopped);
    assert!(session.backend().calls.is_empty());
}

#[test]
fn navigation_on_empty_playlist_leaves_stopped_backend_alone() {
    let mut session = session(&["A.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));
    session.dispatch(Intent::RemoveAll);
    let calls = session.backend().calls.len();

    session.dispatch(Intent::Next);
    assert_eq!(session.state(), PlaybackState::Stopped);
    assert_eq!(session.backend().calls.len(), calls);
}

#[test]
fn skip_forward_past_the_end_stops() {
    let mut session = session(&["A.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));
    session.backend_mut().set_position(115_000);

    session.dispatch(Intent::SkipForward);

    assert_eq!(session.state(), PlaybackState::Stopped);
    assert_eq!(session.backend().calls.last(), Some(&Call::Stop));
    assert!(!session.backend().calls.iter().any(|c| matches!(c, Call::Seek(_))));
    assert_eq!(session.display_state(), DisplayState::idle());
    assert_eq!(session.playlist().current(), Some(0));
}

#[test]
fn skip_forward_within_the_track_seeks() {
    let mut session = session(&["A.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));
    session.backend_mut().set_position(100_000);

    session.dispatch(Intent::SkipForward);
    assert_eq!(session.backend().calls.last(), Some(&Call::Seek(110_000)));
    assert_eq!(session.state(), PlaybackState::Playing);

    // Landing exactly on the end is still a seek
    session.dispatch(Intent::SkipForward);
    assert_eq!(session.backend().calls.last(), Some(&Call::Seek(120_000)));
}

#[test]
fn skip_back_clamps_at_zero() {
    let mut session = session(&["A.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));
    session.backend_mut().set_position(5_000);

    session.dispatch(Intent::SkipBack);
    assert_eq!(session.backend().calls.last(), Some(&Call::Seek(0)));
    assert_eq!(session.state(), PlaybackState::Playing);
}

#[test]
fn seeking_without_media_is_a_no_op() {
    let mut session = session(&["A.mp3"]);
    assert_eq!(session.skip_forward(), Err(PlaybackError::NoMediaLoaded));
    assert_eq!(session.skip_back(), Err(PlaybackError::NoMediaLoaded));
    assert_eq!(session.slider_seek(1_000), Err(PlaybackError::NoMediaLoaded));
    assert!(session.backend().calls.is_empty());
}

#[test]
fn slider_seek_is_clamped_to_duration() {
    let mut session = session(&["A.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));

    session.dispatch(Intent::SliderSeek(60_000));
    assert_eq!(session.backend().calls.last(), Some(&Call::Seek(60_000)));

    session.dispatch(Intent::SliderSeek(500_000));
    assert_eq!(session.backend().calls.last(), Some(&Call::Seek(TRACK_MS)));
}

#[test]
fn volume_survives_track_changes_and_stop() {
    let mut session = session(&["A.mp3", "B.mp3"]);
    session.dispatch(Intent::SetVolume(30));
    assert_eq!(session.backend().volume, Some(30));

    session.dispatch(Intent::DoubleClickRow(0));
    session.dispatch(Intent::Next);
    assert_eq!(session.backend().volume, Some(30));

    session.dispatch(Intent::Stop);
    session.dispatch(Intent::TogglePlayPause);
    assert_eq!(session.backend().volume, Some(30));
    assert_eq!(session.volume().level(), 30);
}

#[test]
fn volume_is_clamped_and_adjustable() {
    let mut session = session(&[]);
    session.dispatch(Intent::SetVolume(140));
    assert_eq!(session.volume().level(), 100);

    session.dispatch(Intent::AdjustVolume(-25));
    assert_eq!(session.volume().level(), 75);
    assert_eq!(session.backend().volume, Some(75));
}

#[test]
fn removing_the_loaded_entry_stops_first() {
    let mut session = session(&["A.mp3", "B.mp3", "C.mp3"]);
    session.dispatch(Intent::DoubleClickRow(1));
    session.backend_mut().calls.clear();

    session.dispatch(Intent::RemoveSelected(set(&[1, 2])));

    assert_eq!(session.backend().calls, [Call::Stop]);
    assert_eq!(session.state(), PlaybackState::Stopped);
    assert_eq!(session.loaded_index(), None);
    assert_eq!(session.playlist().current(), None);
    assert_eq!(session.playlist().len(), 1);
    assert_eq!(session.display_state(), DisplayState::idle());
}

#[test]
fn removing_other_entries_keeps_playing_and_follows_the_loaded_entry() {
    let mut session = session(&["A.mp3", "B.mp3", "C.mp3", "D.mp3"]);
    session.dispatch(Intent::DoubleClickRow(2));
    session.backend_mut().calls.clear();

    session.dispatch(Intent::RemoveSelected(set(&[0, 3])));

    assert!(session.backend().calls.is_empty());
    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(session.loaded_index(), Some(1));
    assert_eq!(session.playlist().current(), Some(1));
    assert_eq!(
        session.playlist().get(1).map(PlaylistEntry::display_name),
        Ok("C.mp3".to_string())
    );

    session.dispatch(Intent::Next);
    assert_eq!(last_loaded(&session), Some("B.mp3".into()));
}

#[test]
fn removing_a_duplicate_of_the_loaded_file_keeps_playing() {
    let mut session = session(&["A.mp3", "A.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));

    session.dispatch(Intent::RemoveSelected(set(&[1])));
    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(session.loaded_index(), Some(0));
}

#[test]
fn remove_with_out_of_range_index_changes_nothing() {
    let mut session = session(&["A.mp3", "B.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));
    session.backend_mut().calls.clear();

    assert_eq!(
        session.remove_selected(&set(&[0, 9])),
        Err(PlaybackError::OutOfRange { index: 9, len: 2 })
    );
    assert!(session.backend().calls.is_empty());
    assert_eq!(session.playlist().len(), 2);
    assert_eq!(session.state(), PlaybackState::Playing);
}

#[test]
fn remove_all_stops_and_clears() {
    let mut session = session(&["A.mp3", "B.mp3"]);
    session.dispatch(Intent::DoubleClickRow(1));

    session.dispatch(Intent::RemoveAll);
    assert!(session.playlist().is_empty());
    assert_eq!(session.playlist().current(), None);
    assert_eq!(session.state(), PlaybackState::Stopped);
    assert_eq!(session.loaded_index(), None);
}

#[test]
fn events_from_a_superseded_load_are_ignored() {
    let mut session = session(&["A.mp3", "B.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));
    let stale = session
        .backend()
        .event(BackendEventKind::StateChanged(PlaybackState::Stopped));

    session.dispatch(Intent::DoubleClickRow(1));
    assert!(!session.handle_backend_event(&stale));
    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(session.loaded_index(), Some(1));
}

#[test]
fn events_after_stop_are_ignored() {
    let mut session = session(&["A.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));
    let late = session.backend().event(BackendEventKind::PositionChanged(42_000));

    session.dispatch(Intent::Stop);
    assert!(!session.handle_backend_event(&late));
    assert_eq!(session.display_state(), DisplayState::idle());
}

#[test]
fn position_events_update_display() {
    let mut session = session(&["A.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));

    let event = session.backend().event(BackendEventKind::PositionChanged(65_000));
    assert!(session.handle_backend_event(&event));
    assert_eq!(session.display_state().position_text, "01:05");
}

#[test]
fn end_of_track_unloads_the_entry() {
    let mut session = session(&["A.mp3", "B.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));

    let ended = session
        .backend()
        .event(BackendEventKind::StateChanged(PlaybackState::Stopped));
    assert!(session.handle_backend_event(&ended));
    assert_eq!(session.loaded_index(), None);
    assert_eq!(session.playlist().current(), Some(0));
    assert_eq!(session.display_state(), DisplayState::idle());
}

#[test]
fn backend_failure_event_is_absorbed() {
    let mut session = session(&["A.mp3"]);
    session.dispatch(Intent::DoubleClickRow(0));

    let failure = session
        .backend()
        .event(BackendEventKind::Failure("decoder exploded".into()));
    assert!(session.handle_backend_event(&failure));
    assert_eq!(session.state(), PlaybackState::Playing);
    assert_eq!(session.loaded_index(), Some(0));
}

#[test]
fn failing_backend_never_leaves_session_inconsistent() {
    let mut session = session(&["A.mp3", "B.mp3"]);
    session.backend_mut().broken = true;

    session.dispatch(Intent::DoubleClickRow(0));
    session.dispatch(Intent::TogglePlayPause);
    session.dispatch(Intent::Next);
    session.dispatch(Intent::SetVolume(20));

    assert_eq!(session.state(), PlaybackState::Stopped);
    assert_eq!(session.loaded_index(), None);
    assert_eq!(session.display_state(), DisplayState::idle());
    assert!(session.backend().calls.is_empty());
    // The intent itself still took effect on the session side
    assert_eq!(session.volume().level(), 20);
}

#[test]
fn losing_the_backend_mid_track_returns_to_idle() {
    let mut session = session(&["A.mp3", "B.mp3"]);
    session.dispatch(Intent::DoubleClickRow(1));
    session.backend_mut().set_position(30_000);
    assert_eq!(session.state(), PlaybackState::Playing);

    session.backend_lost();

    assert_eq!(session.state(), PlaybackState::Stopped);
    assert_eq!(session.loaded_index(), None);
    assert_eq!(session.display_state(), DisplayState::idle());
    assert_eq!(session.playlist().current(), Some(1));

    // Later commands fail quietly without reviving the old load
    session.dispatch(Intent::TogglePlayPause);
    assert_eq!(session.loaded_index(), None);
}

proptest! {
    #[test]
    fn next_wraps_back_to_start(len in 1usize..40, start in 0usize..40) {
        let start = start % len;
        let mut current = start;
        for _ in 0..len {
            current = next_index(Some(current), len).unwrap();
            prop_assert!(current < len);
        }
        prop_assert_eq!(current, start);
    }

    #[test]
    fn previous_wraps_back_to_start(len in 1usize..40, start in 0usize..40) {
        let start = start % len;
        let mut current = start;
        for _ in 0..len {
            current = previous_index(Some(current), len).unwrap();
            prop_assert!(current < len);
        }
        prop_assert_eq!(current, start);
    }

    #[test]
    fn session_next_cycles_through_playlist(len in 1usize..12, start in 0usize..12) {
        let start = start % len;
        let names: Vec<String> = (0..len).map(|i| format!("{i}.mp3")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut session = session(&refs);
        session.dispatch(Intent::DoubleClickRow(start));

        for _ in 0..len {
            session.dispatch(Intent::Next);
        }
        prop_assert_eq!(session.playlist().current(), Some(start));
        prop_assert_eq!(session.state(), PlaybackState::Playing);
    }

    #[test]
    fn skip_forward_never_seeks_out_of_range(
        duration in 0u64..600_000,
        position in 0u64..600_000,
        step in 1u64..60_000,
    ) {
        let position = position.min(duration);
        match skip_forward_target(position, duration, step) {
            Some(target) => prop_assert!(target <= duration && position + step <= duration),
            None => prop_assert!(position + step > duration),
        }
    }

    #[test]
    fn skip_back_never_goes_negative(position in 0u64..600_000, step in 1u64..60_000) {
        let target = skip_back_target(position, step);
        if position < step {
            prop_assert_eq!(target, 0);
        } else {
            prop_assert_eq!(target, position - step);
        }
    }
}
