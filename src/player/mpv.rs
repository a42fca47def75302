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

//! MPV-backed media backend.
//!
//! [`MpvBackend`] is a command proxy: it owns no `libmpv` state itself but
//! forwards commands to a background worker thread and answers queries from a
//! local [`BackendSnapshot`].
//!
//! # Architecture
//!
//! The worker operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`MpvCommand`]s from the session to control
//!    playback (load, play, pause, seek, etc.).
//! 2. **Event Channel**: Broadcasts [`AppEvent::Backend`] notifications tagged
//!    with the [`LoadToken`] of the file that produced them, so the session
//!    can discard events from superseded loads.

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
};
use tracing::{debug, error, warn};

use crate::{
    actions::events::AppEvent,
    error::{PlaybackError, Result as PlaybackResult},
    model::{PlaybackState, PlaylistEntry, Volume},
    player::{BackendEvent, BackendEventKind, BackendSnapshot, LoadToken, MediaBackend},
};

/// How long the worker blocks waiting for an MPV event before it drains the
/// command channel again, in seconds.
const EVENT_WAIT_SECS: f64 = 0.05;

#[derive(Debug)]
enum MpvCommand {
    Load(String, LoadToken),
    Play,
    Pause,
    Stop,
    Seek(u64),
    SetVolume(u8),
}

/// A handle to the MPV playback worker.
pub(crate) struct MpvBackend {
    command_tx: Sender<MpvCommand>,
    snapshot: BackendSnapshot,
    last_token: LoadToken,
}

impl MpvBackend {
    /// Spawns the MPV worker thread and returns a new backend handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - The channel used to report backend events to the main
    ///   event loop.
    pub(crate) fn new(event_tx: Sender<AppEvent>) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<MpvCommand>();

        spawn_player_worker(command_rx, event_tx);

        Self {
            command_tx,
            snapshot: BackendSnapshot::default(),
            last_token: LoadToken::default(),
        }
    }

    fn send(&mut self, command: MpvCommand) -> PlaybackResult<()> {
        self.command_tx.send(command).map_err(|e| {
            // The worker is gone, nothing is playing any more
            self.snapshot.unloaded();
            PlaybackError::BackendFailure(format!("MPV worker unavailable: {}", e))
        })
    }
}

impl MediaBackend for MpvBackend {
    fn load(&mut self, entry: &PlaylistEntry) -> PlaybackResult<LoadToken> {
        let token = self.last_token.next();
        self.last_token = token;

        let filename = entry.path().to_string_lossy().into_owned();
        self.send(MpvCommand::Load(filename, token))?;
        self.snapshot.loaded(token);

        Ok(token)
    }

    fn play(&mut self) -> PlaybackResult<()> {
        self.send(MpvCommand::Play)?;
        if self.snapshot.token.is_some() {
            self.snapshot.state = PlaybackState::Playing;
        }
        Ok(())
    }

    fn pause(&mut self) -> PlaybackResult<()> {
        self.send(MpvCommand::Pause)?;
        if self.snapshot.token.is_some() {
            self.snapshot.state = PlaybackState::Paused;
        }
        Ok(())
    }

    fn stop(&mut self) -> PlaybackResult<()> {
        self.snapshot.unloaded();
        self.send(MpvCommand::Stop)
    }

    fn seek(&mut self, position_ms: u64) -> PlaybackResult<()> {
        self.send(MpvCommand::Seek(position_ms))?;
        self.snapshot.position_ms = position_ms;
        Ok(())
    }

    fn set_volume(&mut self, volume: Volume) -> PlaybackResult<()> {
        self.send(MpvCommand::SetVolume(volume.level()))
    }

    fn state(&self) -> PlaybackState {
        self.snapshot.state
    }

    fn position_ms(&self) -> u64 {
        self.snapshot.position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.snapshot.duration_ms
    }

    fn loaded_token(&self) -> Option<LoadToken> {
        self.snapshot.token
    }

    fn apply_event(&mut self, event: &BackendEvent) -> bool {
        self.snapshot.apply(event)
    }

    fn lost(&mut self) {
        self.snapshot.unloaded();
    }
}

/// Maps MPV's pause and idle flags to a [`PlaybackState`].
fn player_state(is_paused: bool, is_idle: bool) -> PlaybackState {
    if is_idle {
        PlaybackState::Stopped
    } else if is_paused {
        PlaybackState::Paused
    } else {
        PlaybackState::Playing
    }
}

fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds * 1000.0).floor() as u64
}

/// Spawns the worker thread that owns the MPV context.
///
/// If the worker fails irrecoverably the failure is broadcast as a fatal
/// application event; later commands then fail to send and the backend reports
/// itself as unloaded.
fn spawn_player_worker(command_rx: Receiver<MpvCommand>, event_tx: Sender<AppEvent>) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = audio_player_worker(command_rx, event_tx) {
            error!("MPV worker failure: {:#}", e);
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:#}", e)));
        }
    });
}

/// An input to the worker's view of MPV, from either a command or an MPV
/// event.
#[derive(Clone, Copy, Debug, PartialEq)]
enum WorkerInput {
    LoadRequested(LoadToken),
    LoadRejected,
    StopRequested,
    FileStarted,
    Paused(bool),
    Idle(bool),
    Duration(u64),
    Position(u64),
}

/// Worker-side view of MPV, used to derive state transitions and to tag them
/// with the load that produced them.
///
/// A requested file stays pending until MPV reports that it has started.
/// Until then, anything MPV reports still belongs to the previous file and is
/// dropped.
#[derive(Debug)]
struct WorkerState {
    token: Option<LoadToken>,
    pending: Option<LoadToken>,
    is_paused: bool,
    is_idle: bool,
    player_state: PlaybackState,
}

impl Default for WorkerState {
    fn default() -> Self {
        Self {
            token: None,
            pending: None,
            is_paused: false,
            is_idle: true,
            player_state: PlaybackState::Stopped,
        }
    }
}

impl WorkerState {
    /// The load a rejected command should be reported against.
    fn failure_token(&self) -> Option<LoadToken> {
        self.pending.or(self.token)
    }

    /// Folds one input into the state, returning the events to report.
    fn observe(&mut self, input: WorkerInput) -> Vec<BackendEvent> {
        let mut kind = None;

        match input {
            WorkerInput::LoadRequested(token) => {
                self.token = None;
                self.pending = Some(token);
            }
            WorkerInput::LoadRejected => self.pending = None,
            WorkerInput::StopRequested => {
                self.token = None;
                self.pending = None;
            }
            WorkerInput::FileStarted => {
                // Only the latest request is ever adopted; earlier ones were replaced
                if let Some(token) = self.pending.take() {
                    self.token = Some(token);
                    self.is_idle = false;
                    self.player_state = PlaybackState::Stopped;
                }
            }
            WorkerInput::Paused(is_paused) => self.is_paused = is_paused,
            WorkerInput::Idle(is_idle) => self.is_idle = is_idle,
            WorkerInput::Duration(duration_ms) => {
                kind = Some(BackendEventKind::DurationChanged(duration_ms))
            }
            WorkerInput::Position(position_ms) => {
                kind = Some(BackendEventKind::PositionChanged(position_ms))
            }
        }

        let new_player_state = player_state(self.is_paused, self.is_idle);
        let state_changed = new_player_state != self.player_state;
        self.player_state = new_player_state;

        let Some(token) = self.token else {
            return Vec::new();
        };

        let mut events = Vec::new();
        if state_changed {
            events.push(BackendEvent {
                token,
                kind: BackendEventKind::StateChanged(new_player_state),
            });
        }
        if let Some(kind) = kind {
            events.push(BackendEvent { token, kind });
        }
        events
    }
}

/// The primary execution loop for the MPV backend.
///
/// Initializes a local `libmpv` context with video output disabled, then
/// alternates between draining pending commands and waiting briefly for MPV
/// events until the command channel closes.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the event
/// channel to the application is closed.
fn audio_player_worker(command_rx: Receiver<MpvCommand>, event_tx: Sender<AppEvent>) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<bool>("idle-active", 0)
        .context("Failed to observe idle-active")?;

    let mut state = WorkerState::default();

    loop {
        if !process_commands(&mut handler, &command_rx, &mut state, &event_tx)? {
            debug!("MPV command channel closed, worker exiting");
            return Ok(());
        }
        process_mpv_events(&mut handler, &mut state, &event_tx)?;
    }
}

/// Drains and executes all pending commands.
///
/// A command that MPV rejects is reported as a [`BackendEventKind::Failure`]
/// for the most recent load rather than ending the worker. Returns `false`
/// once the session has dropped its handle.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<MpvCommand>,
    state: &mut WorkerState,
    event_tx: &Sender<AppEvent>,
) -> Result<bool> {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(mpsc::TryRecvError::Empty) => return Ok(true),
            Err(mpsc::TryRecvError::Disconnected) => return Ok(false),
        };

        debug!(?command, "MPV command");

        if let MpvCommand::Load(_, token) = &command {
            state.observe(WorkerInput::LoadRequested(*token));
        }

        let result = match &command {
            MpvCommand::Load(filename, _) => handler
                .command(&["loadfile", filename.as_str(), "replace"])
                .with_context(|| format!("Failed to load file: {}", filename)),
            MpvCommand::Play => handler
                .set_property("pause", false)
                .context("Failed to resume"),
            MpvCommand::Pause => handler
                .set_property("pause", true)
                .context("Failed to pause"),
            MpvCommand::Stop => handler.command(&["stop"]).context("Failed to stop"),
            MpvCommand::Seek(position_ms) => {
                let seconds = format!("{:.3}", *position_ms as f64 / 1000.0);
                handler
                    .command(&["seek", seconds.as_str(), "absolute"])
                    .context("Failed to seek")
            }
            MpvCommand::SetVolume(level) => {
                let level = level.to_string();
                handler
                    .command(&["set", "volume", level.as_str()])
                    .context("Failed to set volume")
            }
        };

        if let Err(e) = result {
            warn!("MPV rejected {:?}: {:#}", command, e);
            if let Some(token) = state.failure_token() {
                send_event(event_tx, token, BackendEventKind::Failure(format!("{:#}", e)))?;
            }
            if let MpvCommand::Load(..) = command {
                state.observe(WorkerInput::LoadRejected);
            }
        }

        if let MpvCommand::Stop = command {
            state.observe(WorkerInput::StopRequested);
        }
    }
}

/// Maps an MPV event to a worker input, if it is one the worker tracks.
fn worker_input(event: mpv::Event<'_>) -> Option<WorkerInput> {
    match event {
        mpv::Event::StartFile => Some(WorkerInput::FileStarted),
        mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
            ("duration", Format::Double(seconds)) if seconds >= 0.0 => {
                Some(WorkerInput::Duration(seconds_to_ms(seconds)))
            }
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                Some(WorkerInput::Position(seconds_to_ms(seconds)))
            }
            ("pause", Format::Flag(is_paused)) => Some(WorkerInput::Paused(is_paused)),
            ("idle-active", Format::Flag(is_idle)) => Some(WorkerInput::Idle(is_idle)),
            _ => None,
        },
        _ => None,
    }
}

/// Polls for MPV events and forwards the resulting backend events.
///
/// Waits for up to [`EVENT_WAIT_SECS`] for an event.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    state: &mut WorkerState,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    let Some(input) = handler.wait_event(EVENT_WAIT_SECS).and_then(worker_input) else {
        return Ok(());
    };

    for event in state.observe(input) {
        event_tx
            .send(AppEvent::Backend(event))
            .context("Failed to send backend event")?;
    }

    Ok(())
}

fn send_event(event_tx: &Sender<AppEvent>, token: LoadToken, kind: BackendEventKind) -> Result<()> {
    event_tx
        .send(AppEvent::Backend(BackendEvent { token, kind }))
        .context("Failed to send backend event")
}
