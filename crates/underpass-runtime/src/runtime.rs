//! The runtime: every component behind one dispatcher.
//!
//! Single-threaded and event driven. Nothing here blocks; the host feeds in
//! boundary messages, load outcomes and frame ticks as they happen.

use std::sync::Arc;

use tracing::{debug, error, info_span};
use underpass_assets::application::preload::{begin_load_all, handle_load_outcome};
use underpass_assets::domain::barrier::PreloadBarrier;
use underpass_assets::domain::catalog::AssetCatalog;
use underpass_audio::application::mixer::Mixer;
use underpass_audio::application::one_shot_player::OneShotPlayer;
use underpass_audio::application::sequencer::LoopSequencer;
use underpass_audio::domain::loop_state::LoopState;
use underpass_audio::domain::one_shot::OneShotState;
use underpass_core::audio::AudioBackend;
use underpass_core::clock::Clock;
use underpass_core::config::Timings;
use underpass_core::error::RuntimeError;
use underpass_core::loader::{AssetLoader, LoadOutcome};
use underpass_core::message::{Inbound, MessageSink, Outbound};
use underpass_core::scheduler::{Scheduler, TimerId, TimerQueue, TimerTask};
use underpass_core::store::KeyValueStore;
use underpass_persist::application::save_store::SaveStore;
use uuid::Uuid;

/// The ports a runtime is wired to.
pub struct RuntimePorts {
    /// Time source for loop boundaries, fades and save timestamps.
    pub clock: Arc<dyn Clock>,
    /// Starts asset loads; outcomes come back through
    /// [`Runtime::on_asset_loaded`].
    pub loader: Box<dyn AssetLoader>,
    /// Platform audio output.
    pub audio: Box<dyn AudioBackend>,
    /// Backing store for save slots.
    pub store: Box<dyn KeyValueStore>,
    /// Outbound half of the boundary.
    pub sink: Box<dyn MessageSink>,
}

/// Owns the catalog, barrier, audio components and save store.
pub struct Runtime {
    clock: Arc<dyn Clock>,
    timers: TimerQueue,
    timings: Timings,
    catalog: AssetCatalog,
    barrier: PreloadBarrier,
    mixer: Mixer,
    sequencer: LoopSequencer,
    one_shots: OneShotPlayer,
    saves: SaveStore,
    loader: Box<dyn AssetLoader>,
    sink: Box<dyn MessageSink>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("timers", &self.timers)
            .field("timings", &self.timings)
            .field("barrier", &self.barrier)
            .field("sequencer", &self.sequencer)
            .field("one_shots", &self.one_shots)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// Wires a runtime for `catalog`. Nothing is loaded until
    /// [`Runtime::start`].
    #[must_use]
    pub fn new(catalog: AssetCatalog, timings: Timings, ports: RuntimePorts) -> Self {
        let RuntimePorts {
            clock,
            loader,
            audio,
            store,
            sink,
        } = ports;

        Self {
            timers: TimerQueue::new(Arc::clone(&clock)),
            clock,
            sequencer: LoopSequencer::new(catalog.loops(), timings.drama_fade()),
            one_shots: OneShotPlayer::new(timings.stop_fade()),
            timings,
            catalog,
            barrier: PreloadBarrier::new(),
            mixer: Mixer::new(audio),
            saves: SaveStore::new(store),
            loader,
            sink,
        }
    }

    /// Registers every catalog asset and issues its load.
    pub fn start(&mut self) {
        begin_load_all(
            &self.catalog,
            &mut self.barrier,
            self.mixer.bank_mut(),
            self.loader.as_mut(),
            self.sink.as_mut(),
        );
    }

    /// Applies a load outcome reported by the asset loader.
    pub fn on_asset_loaded(&mut self, outcome: &LoadOutcome) {
        handle_load_outcome(
            outcome,
            &mut self.barrier,
            self.mixer.bank_mut(),
            self.sink.as_mut(),
        );
    }

    /// Handles one inbound boundary message. Failures are logged and the
    /// request is dropped; nothing is reported back to the boundary.
    pub fn dispatch(&mut self, message: Inbound) {
        let correlation_id = Uuid::new_v4();
        let span = info_span!("dispatch", port = message.port_name(), %correlation_id);
        let _entered = span.enter();

        if let Err(e) = self.route(message) {
            error!(error = %e, "request dropped");
        }
    }

    fn route(&mut self, message: Inbound) -> Result<(), RuntimeError> {
        match message {
            Inbound::PlaySound(key) => {
                self.one_shots
                    .play_one_shot(&key, &mut self.mixer, &mut self.timers)
            }
            Inbound::StopSound(key) => {
                self.one_shots
                    .stop_one_shot(&key, &mut self.mixer, &mut self.timers)
            }
            Inbound::QueueLoopReq(key) => self.sequencer.queue_loop(
                &key,
                &mut self.mixer,
                self.clock.as_ref(),
                &mut self.timers,
            ),
            Inbound::StopMusic => {
                self.sequencer.stop_music(&mut self.mixer, &mut self.timers);
                Ok(())
            }
            Inbound::AddDramaReq => self
                .sequencer
                .add_drama(&mut self.mixer, self.clock.as_ref()),
            Inbound::RemoveDramaReq => self
                .sequencer
                .remove_drama(&mut self.mixer, self.clock.as_ref()),
            Inbound::PersistListReq => {
                let listing = self.saves.list(self.clock.now());
                self.sink
                    .send(Outbound::PersistListRes(listing.requested_at, listing.slots));
                Ok(())
            }
            Inbound::PersistLoadReq(slot) => {
                let history = self.saves.load(&slot);
                debug!(slot = %slot, entries = history.len(), "save load scheduled");
                self.timers.after(
                    self.timings.load_delay(),
                    TimerTask::Deliver(Outbound::PersistLoadRes(history)),
                );
                Ok(())
            }
            Inbound::PersistSaveReq(slot, history) => {
                self.saves.save(&slot, history, self.clock.now())?;
                self.sink.send(Outbound::PersistListChanged);
                Ok(())
            }
            Inbound::PersistDeleteReq(slot) => {
                self.saves.delete(&slot)?;
                self.sink.send(Outbound::PersistListChanged);
                Ok(())
            }
        }
    }

    /// Runs one display frame: every task that is due, in order.
    pub fn tick(&mut self) {
        self.timers.begin_frame();
        while let Some((id, task)) = self.timers.pop_ready() {
            self.run_task(id, task);
        }
    }

    fn run_task(&mut self, id: TimerId, task: TimerTask) {
        match task {
            TimerTask::LoopFrame => self.sequencer.on_frame(
                id,
                &mut self.mixer,
                self.clock.as_ref(),
                &mut self.timers,
            ),
            TimerTask::FadeComplete(key) => {
                if let Err(e) = self.one_shots.on_fade_complete(&key, id, &mut self.mixer) {
                    error!(key = %key, error = %e, "fade completion failed");
                }
            }
            TimerTask::Deliver(message) => self.sink.send(message),
        }
    }

    /// Whether every blocking asset has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.barrier.is_ready()
    }

    /// The loop sequencer's state.
    #[must_use]
    pub fn loop_state(&self) -> &LoopState {
        self.sequencer.state()
    }

    /// The fade state of a one-shot sound.
    #[must_use]
    pub fn one_shot_state(&self, key: &str) -> OneShotState {
        self.one_shots.state(key)
    }

    /// Timers still waiting to run.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    /// Interval between display frames.
    #[must_use]
    pub fn frame_interval(&self) -> chrono::TimeDelta {
        self.timings.frame()
    }
}
