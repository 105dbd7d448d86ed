use crate::{
    audio::toggle::MusicToggle,
    config::model::SequenceConfig,
    device::profile::DeviceProfile,
    foundation::{
        core::{HapticPattern, Millis, TextSink},
        error::{SerenadeResult, best_effort},
        rng::Rng64,
    },
    input::event::{HitTarget, InputEvent, InputOutcome, KeyCode},
    present::{
        decor::{ParticleField, plan_sparkles},
        port::PresentationPort,
    },
    schedule::clock::{Scheduler, Wake},
    timeline::{
        latch::AdvanceLatch,
        state::{TimelineEvent, TimelineState, transition},
    },
    typewriter::job::{TypeStep, TypeTiming, Typewriter},
};

/// Drives the presentation timeline.
///
/// The sequencer owns all mutable presentation state and is the only thing that mutates it.
/// It never waits: every delay is a [`Wake`] handed to the injected [`Scheduler`], and the host
/// feeds wakes back through [`Sequencer::on_wake`]. Inputs arrive through
/// [`Sequencer::handle_input`] at arbitrary points and are checked against the current state.
pub struct Sequencer<P, S> {
    config: SequenceConfig,
    port: P,
    scheduler: S,
    rng: Rng64,
    state: TimelineState,
    started: bool,
    latch: AdvanceLatch,
    typewriter: Typewriter<TimelineEvent>,
    music: MusicToggle,
    particles: ParticleField,
    resize_generation: u64,
    next_sparkle_batch: u64,
}

impl<P, S> Sequencer<P, S>
where
    P: PresentationPort,
    S: Scheduler,
{
    pub fn new(config: SequenceConfig, port: P, scheduler: S, seed: u64) -> SerenadeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            port,
            scheduler,
            rng: Rng64::new(seed),
            state: TimelineState::Intro,
            started: false,
            latch: AdvanceLatch::default(),
            typewriter: Typewriter::default(),
            music: MusicToggle::default(),
            particles: ParticleField::default(),
            resize_generation: 0,
            next_sparkle_batch: 0,
        })
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Intended music state (see [`MusicToggle`]).
    pub fn music_playing(&self) -> bool {
        self.music.is_playing()
    }

    pub fn is_advance_armed(&self) -> bool {
        self.latch.is_armed()
    }

    pub fn particles_spawned(&self) -> usize {
        self.particles.spawned()
    }

    /// Preset for the viewport as it is right now.
    pub fn resolve_profile(&self) -> DeviceProfile {
        self.config.profile_for(self.port.viewport_width())
    }

    /// Page load: ambient particles, audio volume, and the intro timer. Idempotent.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        let profile = self.resolve_profile();
        self.particles
            .sync(profile.particle_count, &mut self.rng, &mut self.port);
        self.port.set_audio_volume(self.config.music_volume);
        self.scheduler
            .schedule_after(profile.intro_ms, Wake::IntroElapsed);
        tracing::info!(
            width = self.port.viewport_width().0,
            intro_ms = profile.intro_ms.0,
            "sequence started"
        );
    }

    /// Continue past the gate. Only the first call while the gate is armed does anything.
    pub fn request_advance(&mut self) -> bool {
        if self.state != TimelineState::AwaitingAdvance || !self.latch.fire() {
            tracing::trace!(state = %self.state, "advance ignored");
            return false;
        }
        self.apply(TimelineEvent::AdvanceRequested)
    }

    /// Flip the music intent; returns the new intent.
    pub fn toggle_music(&mut self) -> bool {
        self.music.toggle(&mut self.port)
    }

    /// Route one host event. Only an event that actually passes the gate reports
    /// [`InputOutcome::Handled`]; music, resize and visibility events never claim the default.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn handle_input(&mut self, input: InputEvent) -> InputOutcome {
        match input {
            InputEvent::Click {
                target: HitTarget::ContinueButton | HitTarget::IntroRegion,
            } => InputOutcome::from_handled(self.request_advance()),
            InputEvent::Click {
                target: HitTarget::MusicToggle,
            } => {
                self.toggle_music();
                InputOutcome::Ignored
            }
            InputEvent::Click {
                target: HitTarget::Elsewhere,
            } => InputOutcome::Ignored,
            InputEvent::Key {
                code: KeyCode::Space | KeyCode::Enter,
            } => InputOutcome::from_handled(self.request_advance()),
            InputEvent::Key { code: KeyCode::KeyM } => {
                self.toggle_music();
                InputOutcome::Ignored
            }
            InputEvent::Key {
                code: KeyCode::Other,
            } => InputOutcome::Ignored,
            InputEvent::Resize => {
                self.resize_generation = self.resize_generation.wrapping_add(1);
                self.scheduler.schedule_after(
                    self.config.timings.resize_debounce_ms,
                    Wake::ResizeSettled {
                        generation: self.resize_generation,
                    },
                );
                InputOutcome::Ignored
            }
            InputEvent::VisibilityChanged { hidden } => {
                self.music.on_visibility_change(hidden, &mut self.port);
                InputOutcome::Ignored
            }
        }
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub fn on_wake(&mut self, wake: Wake) {
        let timings = self.config.timings;
        match wake {
            Wake::IntroElapsed => {
                self.apply(TimelineEvent::IntroElapsed);
            }
            Wake::TypeTick { sink, epoch } => {
                match self
                    .typewriter
                    .tick(&mut self.port, sink, epoch, &mut self.rng)
                {
                    TypeStep::Stale => tracing::trace!(?sink, epoch, "stale typewriter tick"),
                    TypeStep::Revealed { next_delay, .. } => self
                        .scheduler
                        .schedule_after(next_delay, Wake::TypeTick { sink, epoch }),
                    TypeStep::Finished { on_complete } => {
                        self.apply(on_complete);
                    }
                }
            }
            Wake::RevealContinue => {
                if self.state != TimelineState::AwaitingAdvance {
                    return;
                }
                self.port.reveal_continue_affordance();
                if self.resolve_profile().tap_hint {
                    self.scheduler
                        .schedule_after(timings.hint_reveal_ms, Wake::RevealHint);
                }
            }
            Wake::RevealHint => {
                if self.state == TimelineState::AwaitingAdvance {
                    self.port.set_hint_visible(true);
                }
            }
            Wake::SwapRegion => {
                if self.state != TimelineState::Transitioning {
                    return;
                }
                self.port.swap_region();
                self.scheduler
                    .schedule_after(timings.paragraph_start_ms, Wake::StartParagraph);
            }
            Wake::StartParagraph => {
                self.apply(TimelineEvent::ParagraphStarted);
            }
            Wake::SpawnSparkles => {
                if self.state == TimelineState::Complete {
                    self.spawn_sparkles();
                }
            }
            Wake::RemoveSparkles { batch } => self.port.remove_sparkles(batch),
            Wake::RevealFooter => {
                if self.state == TimelineState::Complete {
                    self.port.reveal_footer();
                }
            }
            Wake::ResizeSettled { generation } => {
                if generation != self.resize_generation {
                    return;
                }
                let desired = self.resolve_profile().particle_count;
                self.particles.sync(desired, &mut self.rng, &mut self.port);
            }
        }
    }

    fn apply(&mut self, event: TimelineEvent) -> bool {
        let next = transition(self.state, event);
        if next == self.state {
            tracing::trace!(state = %self.state, ?event, "event does not apply");
            return false;
        }
        tracing::debug!(
            from = %self.state,
            to = %next,
            ?event,
            at = self.scheduler.now().0,
            "timeline transition"
        );
        self.state = next;
        self.enter(next);
        true
    }

    fn enter(&mut self, state: TimelineState) {
        let timings = self.config.timings;
        match state {
            TimelineState::Intro => {}
            TimelineState::TitleTyping => {
                let profile = self.resolve_profile();
                self.start_typing(
                    TextSink::Title,
                    profile.typing_speed_ms,
                    TimelineEvent::TitleTyped,
                );
            }
            TimelineState::AwaitingAdvance => {
                self.latch.arm();
                self.port.mark_typing_done(TextSink::Title);
                self.scheduler
                    .schedule_after(timings.continue_reveal_ms, Wake::RevealContinue);
            }
            TimelineState::Transitioning => {
                best_effort(self.port.vibrate(HapticPattern::Medium), "haptic");
                self.port.set_hint_visible(false);
                self.port.fade_out_intro();
                self.scheduler
                    .schedule_after(timings.fade_out_ms, Wake::SwapRegion);
            }
            TimelineState::ParagraphTyping => {
                let profile = self.resolve_profile();
                self.start_typing(
                    TextSink::Paragraph,
                    profile.paragraph_typing_speed_ms,
                    TimelineEvent::ParagraphTyped,
                );
            }
            TimelineState::Complete => {
                self.port.mark_typing_done(TextSink::Paragraph);
                self.port.mark_glow_complete();
                self.scheduler.schedule_frame(Wake::SpawnSparkles);
                best_effort(self.port.vibrate(HapticPattern::Light), "haptic");
                self.scheduler
                    .schedule_after(timings.footer_reveal_ms, Wake::RevealFooter);
                tracing::info!(at = self.scheduler.now().0, "sequence complete");
            }
        }
    }

    fn start_typing(
        &mut self,
        sink: TextSink,
        base_delay: Millis,
        on_complete: TimelineEvent,
    ) {
        let profile = self.resolve_profile();
        let timing = TypeTiming {
            base_delay,
            punctuation_pause: profile.punctuation_pause_ms,
            jitter_ms: self.config.timings.jitter_ms,
        };
        let text = match sink {
            TextSink::Title => self.config.title.as_str(),
            TextSink::Paragraph => self.config.paragraph.as_str(),
        };
        let epoch = self
            .typewriter
            .start(&mut self.port, sink, text, timing, on_complete);
        self.scheduler
            .schedule_frame(Wake::TypeTick { sink, epoch });
    }

    fn spawn_sparkles(&mut self) {
        let bounds = match self.port.paragraph_bounds() {
            Ok(b) if b.is_usable() => b,
            Ok(b) => {
                tracing::debug!(?b, "sparkle burst skipped: unusable bounds");
                return;
            }
            Err(err) => {
                tracing::debug!(%err, "sparkle burst skipped");
                return;
            }
        };
        let count = self.resolve_profile().sparkle_count;
        let specs = plan_sparkles(
            count,
            bounds,
            self.config.timings.sparkle_stagger_ms,
            &mut self.rng,
        );
        let batch = self.next_sparkle_batch;
        self.next_sparkle_batch = self.next_sparkle_batch.wrapping_add(1);
        self.port.spawn_sparkles(batch, &specs);
        self.scheduler.schedule_after(
            self.config.timings.sparkle_lifetime_ms,
            Wake::RemoveSparkles { batch },
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/sequencer.rs"]
mod tests;
