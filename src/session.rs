use crate::state::{sanitize_seconds, IDLE};
use crate::{
    resolve, Capability, Error, InstanceId, PlaybackState, PlayerEvent, PlayerInstance,
    PlayerState, SessionConfig, VideoId,
};
use log::{debug, trace, warn};
use std::time::Instant;

/// Coarse lifecycle of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// No external player exists.
    Uninitialized,
    /// A player was requested (or is waiting on the widget library) but is not ready yet.
    Initializing,
    /// The player reported readiness; intents are forwarded.
    Ready,
}

enum Phase<I> {
    /// The widget library is not loaded yet; creation is re-attempted at `retry_at`.
    Bootstrapping { attempts: u32, retry_at: Instant },
    Initializing { instance: I, id: InstanceId },
    Ready {
        instance: I,
        id: InstanceId,
        refresh_at: Instant,
    },
    Closed,
}

/// One video bound to (at most) one external player instance, plus its mirrored state.
///
/// Dropping a session tears it down.
pub struct Session<I: PlayerInstance> {
    video: VideoId,
    phase: Phase<I>,
    state: PlayerState,
    playback: Option<PlaybackState>,
}

impl<I: PlayerInstance> Session<I> {
    /// Starts a session for `video`, creating the external player right away if the
    /// widget library is loaded, or scheduling a re-attempt otherwise.
    pub fn create<C>(
        capability: &mut C,
        container: &C::Container,
        video: VideoId,
        config: &SessionConfig,
        now: Instant,
    ) -> Self
    where
        C: Capability<Instance = I>,
    {
        debug!("starting session for {video}");
        let mut session = Session {
            video,
            phase: Phase::Bootstrapping {
                attempts: 0,
                retry_at: now,
            },
            state: IDLE,
            playback: None,
        };
        session.attempt(capability, container, config, now);
        session
    }

    fn attempt<C>(
        &mut self,
        capability: &mut C,
        container: &C::Container,
        config: &SessionConfig,
        now: Instant,
    ) where
        C: Capability<Instance = I>,
    {
        let attempts = match self.phase {
            Phase::Bootstrapping { attempts, .. } => attempts + 1,
            _ => return,
        };

        if capability.is_bootstrapped() {
            let id = InstanceId::next();
            let instance = capability.create_player(container, &self.video, &config.options, id);
            debug!("requested player {id:?} for {}", self.video);
            self.phase = Phase::Initializing { instance, id };
        } else if config
            .max_bootstrap_attempts
            .is_some_and(|max| attempts >= max)
        {
            warn!(
                "player library still unavailable after {attempts} attempts, giving up on {}",
                self.video
            );
            self.phase = Phase::Closed;
        } else {
            trace!("player library not loaded yet (attempt {attempts})");
            self.phase = Phase::Bootstrapping {
                attempts,
                retry_at: now + config.bootstrap_retry_delay,
            };
        }
    }

    /// Releases the external player and cancels any pending retry or refresh.
    /// Calling it again does nothing.
    pub fn destroy(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Closed) {
            Phase::Initializing { mut instance, id } | Phase::Ready { mut instance, id, .. } => {
                instance.destroy();
                debug!("destroyed player {id:?} for {}", self.video);
            }
            Phase::Bootstrapping { .. } => {
                debug!("cancelled pending player for {}", self.video);
            }
            Phase::Closed => {}
        }
        self.state.ready = false;
    }

    /// Get the video this session is bound to.
    pub fn video(&self) -> &VideoId {
        &self.video
    }

    /// Get the mirrored player state.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Last playback state reported by the player, if any.
    pub fn playback(&self) -> Option<PlaybackState> {
        self.playback
    }

    /// Get the lifecycle stage of this session.
    pub fn lifecycle(&self) -> Lifecycle {
        match self.phase {
            Phase::Bootstrapping { .. } | Phase::Initializing { .. } => Lifecycle::Initializing,
            Phase::Ready { .. } => Lifecycle::Ready,
            Phase::Closed => Lifecycle::Uninitialized,
        }
    }

    /// Whether the session was torn down or gave up waiting for the widget library.
    pub fn is_closed(&self) -> bool {
        matches!(self.phase, Phase::Closed)
    }

    /// Tag of the live external instance.
    pub fn instance_id(&self) -> Option<InstanceId> {
        match self.phase {
            Phase::Initializing { id, .. } | Phase::Ready { id, .. } => Some(id),
            _ => None,
        }
    }

    /// When [`poll`](Session::poll) next has work to do.
    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Bootstrapping { retry_at, .. } => Some(retry_at),
            Phase::Ready { refresh_at, .. } => Some(refresh_at),
            _ => None,
        }
    }

    /// Runs whatever is due at `now`: a creation re-attempt or a periodic refresh.
    pub fn poll<C>(
        &mut self,
        capability: &mut C,
        container: &C::Container,
        config: &SessionConfig,
        now: Instant,
    ) where
        C: Capability<Instance = I>,
    {
        if !self.deadline().is_some_and(|deadline| now >= deadline) {
            return;
        }

        match self.phase {
            Phase::Bootstrapping { .. } => self.attempt(capability, container, config, now),
            Phase::Ready {
                ref mut refresh_at, ..
            } => {
                *refresh_at = now + config.refresh_interval;
                self.refresh();
            }
            _ => {}
        }
    }

    /// Applies a callback from the external player.
    ///
    /// Returns `false` if the event came from an instance other than the live one.
    pub fn handle(
        &mut self,
        instance: InstanceId,
        event: PlayerEvent,
        config: &SessionConfig,
        now: Instant,
    ) -> bool {
        if self.instance_id() != Some(instance) {
            debug!("ignoring {event:?} from stale player {instance:?}");
            return false;
        }

        match event {
            PlayerEvent::Ready => {
                self.phase = match std::mem::replace(&mut self.phase, Phase::Closed) {
                    Phase::Initializing { instance, id } => {
                        self.state = PlayerState {
                            ready: true,
                            muted: instance.is_muted(),
                            volume: instance.volume().min(100),
                            playback_rate: instance.playback_rate(),
                            duration: sanitize_seconds(instance.duration()),
                            ..self.state
                        };
                        debug!("player {id:?} ready for {}", self.video);
                        Phase::Ready {
                            instance,
                            id,
                            refresh_at: now + config.refresh_interval,
                        }
                    }
                    phase => phase,
                };
            }
            PlayerEvent::StateChange(playback) => {
                self.playback = Some(playback);
                self.refresh();
            }
        }
        true
    }

    fn refresh(&mut self) {
        if let Phase::Ready { instance, .. } = &self.phase {
            self.state.current_time = sanitize_seconds(instance.current_time());
            self.state.duration = sanitize_seconds(instance.duration());
        }
    }

    fn ready_instance(&mut self) -> Option<&mut I> {
        match &mut self.phase {
            Phase::Ready { instance, .. } => Some(instance),
            _ => None,
        }
    }

    /// Starts playback once ready.
    pub fn play(&mut self) {
        if let Some(instance) = self.ready_instance() {
            instance.play();
        }
    }

    /// Pauses playback once ready.
    pub fn pause(&mut self) {
        if let Some(instance) = self.ready_instance() {
            instance.pause();
        }
    }

    /// Seeks to `seconds`, clamped into `[0, duration]`.
    pub fn seek_to(&mut self, seconds: f64) {
        if seconds.is_nan() {
            return;
        }
        let target = seconds.clamp(0.0, self.state.duration);
        if let Some(instance) = self.ready_instance() {
            instance.seek_to(target, true);
        }
    }

    /// Seeks relative to the mirrored current time.
    pub fn seek_by(&mut self, delta: f64) {
        self.seek_to(self.state.current_time + delta);
    }

    // The mirrored values below are set optimistically and never re-read from the
    // player, so they drift if the player silently ignores the request.

    /// Mutes the player and marks the mirrored state muted.
    pub fn mute(&mut self) {
        if let Some(instance) = self.ready_instance() {
            instance.mute();
            self.state.muted = true;
        }
    }

    /// Unmutes the player and marks the mirrored state unmuted.
    pub fn unmute(&mut self) {
        if let Some(instance) = self.ready_instance() {
            instance.unmute();
            self.state.muted = false;
        }
    }

    /// Mutes or unmutes, whichever the mirrored state is not.
    pub fn toggle_mute(&mut self) {
        if self.state.muted {
            self.unmute();
        } else {
            self.mute();
        }
    }

    /// Sets the volume, clamped into `[0, 100]`.
    pub fn set_volume(&mut self, volume: i32) {
        let volume = volume.clamp(0, 100) as u8;
        if let Some(instance) = self.ready_instance() {
            instance.set_volume(volume);
            self.state.volume = volume;
        }
    }

    /// Sets the playback rate as given; the player decides what it supports.
    pub fn set_playback_rate(&mut self, rate: f64) {
        if let Some(instance) = self.ready_instance() {
            instance.set_playback_rate(rate);
            self.state.playback_rate = rate;
        }
    }
}

impl<I: PlayerInstance> Drop for Session<I> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Drives the host's video widget for whichever video is currently loaded.
///
/// The player owns no timers. After [`load`](Player::load), [`handle`](Player::handle)
/// and [`poll`](Player::poll) the host should call `poll` again at
/// [`deadline`](Player::deadline), if there is one.
pub struct Player<C: Capability> {
    capability: C,
    container: C::Container,
    config: SessionConfig,
    session: Option<Session<C::Instance>>,
}

impl<C: Capability> Player<C> {
    /// Creates a player mounting into `container` with the default [`SessionConfig`].
    pub fn new(capability: C, container: C::Container) -> Self {
        Self::with_config(capability, container, SessionConfig::default())
    }

    /// Creates a player mounting into `container` with `config`.
    pub fn with_config(capability: C, container: C::Container, config: SessionConfig) -> Self {
        Player {
            capability,
            container,
            config,
            session: None,
        }
    }

    /// Binds the player to `video`.
    ///
    /// A different video tears the current session down before the new player is
    /// requested. The video that is already loaded is left alone.
    pub fn load(&mut self, video: VideoId, now: Instant) {
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.video() == &video && !session.is_closed())
        {
            return;
        }

        self.unload();
        self.session = Some(Session::create(
            &mut self.capability,
            &self.container,
            video,
            &self.config,
            now,
        ));
    }

    /// Resolves raw user input and loads the result.
    ///
    /// On rejection the current session is torn down and the reason returned.
    pub fn submit(&mut self, raw: &str, now: Instant) -> Result<(), Error> {
        match resolve(raw.trim()) {
            Ok(video) => {
                self.load(video, now);
                Ok(())
            }
            Err(err) => {
                debug!("rejected input {raw:?}: {err}");
                self.unload();
                Err(err)
            }
        }
    }

    /// Tears down the current session, if any.
    pub fn unload(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.destroy();
        }
    }

    /// Forwards a callback from the external player tagged `instance`.
    ///
    /// Returns `false` if the event was dropped because `instance` is not the live player.
    pub fn handle(&mut self, instance: InstanceId, event: PlayerEvent, now: Instant) -> bool {
        match self.session.as_mut() {
            Some(session) => session.handle(instance, event, &self.config, now),
            None => {
                debug!("ignoring {event:?} from {instance:?}, nothing loaded");
                false
            }
        }
    }

    /// Runs due retries and refreshes; returns the next deadline.
    pub fn poll(&mut self, now: Instant) -> Option<Instant> {
        if let Some(session) = self.session.as_mut() {
            session.poll(&mut self.capability, &self.container, &self.config, now);
        }
        self.deadline()
    }

    /// Get when [`poll`](Player::poll) next has work to do.
    pub fn deadline(&self) -> Option<Instant> {
        self.session.as_ref().and_then(Session::deadline)
    }

    /// Mirrored state of the current player, or the idle defaults.
    pub fn state(&self) -> &PlayerState {
        self.session.as_ref().map_or(&IDLE, Session::state)
    }

    /// Get the lifecycle stage of the current session.
    pub fn lifecycle(&self) -> Lifecycle {
        self.session
            .as_ref()
            .map_or(Lifecycle::Uninitialized, Session::lifecycle)
    }

    /// Get if the current player reported readiness.
    pub fn is_ready(&self) -> bool {
        self.lifecycle() == Lifecycle::Ready
    }

    /// The loaded video, unless its session was abandoned.
    pub fn video(&self) -> Option<&VideoId> {
        self.session
            .as_ref()
            .filter(|session| !session.is_closed())
            .map(Session::video)
    }

    /// Get the current session.
    pub fn session(&self) -> Option<&Session<C::Instance>> {
        self.session.as_ref()
    }

    /// Get the configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the injected widget library.
    pub fn capability(&self) -> &C {
        &self.capability
    }

    /// Get the injected widget library mutably.
    pub fn capability_mut(&mut self) -> &mut C {
        &mut self.capability
    }

    fn with_session(&mut self, f: impl FnOnce(&mut Session<C::Instance>)) {
        if let Some(session) = self.session.as_mut() {
            f(session);
        }
    }

    /// Starts playback, if ready.
    pub fn play(&mut self) {
        self.with_session(Session::play);
    }

    /// Pauses playback, if ready.
    pub fn pause(&mut self) {
        self.with_session(Session::pause);
    }

    /// Seeks to `seconds`, clamped into `[0, duration]`.
    pub fn seek_to(&mut self, seconds: f64) {
        self.with_session(|session| session.seek_to(seconds));
    }

    /// Seeks relative to the mirrored current time.
    pub fn seek_by(&mut self, delta: f64) {
        self.with_session(|session| session.seek_by(delta));
    }

    /// Mutes the player, if ready.
    pub fn mute(&mut self) {
        self.with_session(Session::mute);
    }

    /// Unmutes the player, if ready.
    pub fn unmute(&mut self) {
        self.with_session(Session::unmute);
    }

    /// Flips the muted state, if ready.
    pub fn toggle_mute(&mut self) {
        self.with_session(Session::toggle_mute);
    }

    /// Sets the volume, clamped into `[0, 100]`.
    pub fn set_volume(&mut self, volume: i32) {
        self.with_session(|session| session.set_volume(volume));
    }

    /// Sets the playback rate as given.
    pub fn set_playback_rate(&mut self, rate: f64) {
        self.with_session(|session| session.set_playback_rate(rate));
    }
}
