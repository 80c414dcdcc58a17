use iced::widget::{Button, Column, Container, Row, Text, TextInput};
use iced::{Element, Subscription};
use iced_youtube_player::{
    Capability, InstanceId, Lifecycle, PlaybackControls, PlaybackState, Player, PlayerEvent,
    PlayerInstance, PlayerOptions, VideoId,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn main() -> iced::Result {
    iced::application("YouTube Player", App::update, App::view)
        .subscription(App::subscription)
        .run()
}

type Events = Arc<Mutex<Vec<(InstanceId, PlayerEvent)>>>;

/// Stands in for the embed library: "loads" after a short delay and plays an
/// imaginary video by advancing a clock.
struct Simulated {
    loaded_at: Instant,
    events: Events,
}

impl Simulated {
    fn drain(&mut self) -> Vec<(InstanceId, PlayerEvent)> {
        std::mem::take(&mut *self.events.lock().expect("event queue poisoned"))
    }
}

impl Capability for Simulated {
    type Container = ();
    type Instance = SimulatedVideo;

    fn is_bootstrapped(&self) -> bool {
        Instant::now() >= self.loaded_at
    }

    fn create_player(
        &mut self,
        _container: &(),
        video: &VideoId,
        options: &PlayerOptions,
        instance: InstanceId,
    ) -> SimulatedVideo {
        println!("embedding {video} with {:?}", options.player_vars());
        self.events
            .lock()
            .expect("event queue poisoned")
            .push((instance, PlayerEvent::Ready));
        SimulatedVideo {
            instance,
            events: Arc::clone(&self.events),
            offset: 0.0,
            playing_since: None,
            rate: 1.0,
            volume: 100,
            muted: false,
        }
    }
}

struct SimulatedVideo {
    instance: InstanceId,
    events: Events,
    offset: f64,
    playing_since: Option<Instant>,
    rate: f64,
    volume: u8,
    muted: bool,
}

impl SimulatedVideo {
    const DURATION: f64 = 212.0;

    fn notify(&self, state: PlaybackState) {
        self.events
            .lock()
            .expect("event queue poisoned")
            .push((self.instance, PlayerEvent::StateChange(state)));
    }

    fn settle(&mut self) {
        self.offset = self.current_time();
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
    }
}

impl PlayerInstance for SimulatedVideo {
    fn play(&mut self) {
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
            self.notify(PlaybackState::Playing);
        }
    }

    fn pause(&mut self) {
        self.settle();
        self.playing_since = None;
        self.notify(PlaybackState::Paused);
    }

    fn seek_to(&mut self, seconds: f64, _allow_seek_ahead: bool) {
        self.settle();
        self.offset = seconds;
    }

    fn mute(&mut self) {
        self.muted = true;
    }

    fn unmute(&mut self) {
        self.muted = false;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn volume(&self) -> u8 {
        self.volume
    }

    fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.settle();
        self.rate = rate;
    }

    fn current_time(&self) -> f64 {
        let elapsed = self
            .playing_since
            .map_or(0.0, |since| since.elapsed().as_secs_f64() * self.rate);
        (self.offset + elapsed).min(Self::DURATION)
    }

    fn duration(&self) -> f64 {
        Self::DURATION
    }

    fn destroy(&mut self) {
        println!("destroyed {:?}", self.instance);
    }
}

#[derive(Clone, Debug)]
enum Message {
    InputChanged(String),
    Load,
    Tick(Instant),
    Play,
    Pause,
    Seek(f64),
    SeekRelease,
    Skip(f64),
    Mute(bool),
    Volume(u8),
    Speed(f64),
}

struct App {
    player: Player<Simulated>,
    input: String,
    error: Option<String>,
    position: f64,
    dragging: bool,
}

impl Default for App {
    fn default() -> Self {
        let simulated = Simulated {
            loaded_at: Instant::now() + Duration::from_millis(750),
            events: Events::default(),
        };
        App {
            player: Player::new(simulated, ()),
            input: String::new(),
            error: None,
            position: 0.0,
            dragging: false,
        }
    }
}

impl App {
    fn update(&mut self, message: Message) {
        match message {
            Message::InputChanged(input) => {
                self.input = input;
            }
            Message::Load => {
                self.error = self
                    .player
                    .submit(&self.input, Instant::now())
                    .err()
                    .map(|err| err.to_string());
            }
            Message::Tick(now) => {
                for (instance, event) in self.player.capability_mut().drain() {
                    self.player.handle(instance, event, now);
                }
                self.player.poll(now);
                if !self.dragging {
                    self.position = self.player.state().current_time;
                }
            }
            Message::Play => self.player.play(),
            Message::Pause => self.player.pause(),
            Message::Seek(secs) => {
                self.dragging = true;
                self.position = secs;
            }
            Message::SeekRelease => {
                self.dragging = false;
                self.player.seek_to(self.position);
            }
            Message::Skip(delta) => self.player.seek_by(delta),
            Message::Mute(true) => self.player.mute(),
            Message::Mute(false) => self.player.unmute(),
            Message::Volume(volume) => self.player.set_volume(i32::from(volume)),
            Message::Speed(rate) => self.player.set_playback_rate(rate),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(Duration::from_millis(100)).map(Message::Tick)
    }

    fn view(&self) -> Element<Message> {
        let mut content = Column::new()
            .spacing(20)
            .padding(20)
            .push(Text::new("YouTube Player").size(32))
            .push(
                Row::new()
                    .spacing(10)
                    .push(
                        TextInput::new("https://youtube.com/watch?v=... or video ID", &self.input)
                            .on_input(Message::InputChanged)
                            .on_submit(Message::Load)
                            .padding(10),
                    )
                    .push(Button::new(Text::new("Load Video")).on_press(Message::Load)),
            );

        if let Some(error) = &self.error {
            content = content.push(Text::new(error.as_str()).color(iced::Color::from_rgb(0.9, 0.3, 0.3)));
        }

        if let Some(video) = self.player.video() {
            let status = match self.player.lifecycle() {
                Lifecycle::Uninitialized => "not loaded",
                Lifecycle::Initializing => "loading...",
                Lifecycle::Ready => "ready",
            };
            let mut controls = PlaybackControls::new(self.player.state())
                .on_play(Message::Play)
                .on_pause(Message::Pause)
                .on_seek(Message::Seek)
                .on_seek_release(Message::SeekRelease)
                .on_skip(Message::Skip)
                .on_mute(Message::Mute)
                .on_volume(Message::Volume)
                .on_speed(Message::Speed);
            if self.dragging {
                controls = controls.position(self.position);
            }
            content = content
                .push(Text::new(format!("{video}: {status}")))
                .push(controls);
        }

        Container::new(content).into()
    }
}
