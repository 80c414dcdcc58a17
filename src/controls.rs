use crate::{format_time, PlayerState, PLAYBACK_RATES};
use iced::widget::{pick_list, progress_bar, Button, Column, Row, Slider, Space, Text};
use iced::{Element, Length};
use std::fmt;

/// A playback rate as offered by the speed selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed(pub f64);

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1.0 {
            f.write_str("1x (Normal)")
        } else {
            write!(f, "{}x", self.0)
        }
    }
}

/// Control panel for a [`Player`](crate::Player): progress, transport, volume and speed.
///
/// Every control is disabled until the mirrored state reports readiness.
pub struct PlaybackControls<'a, Message> {
    state: &'a PlayerState,
    position: Option<f64>,
    skip: f64,
    on_play: Option<Message>,
    on_pause: Option<Message>,
    on_seek: Option<Box<dyn Fn(f64) -> Message + 'a>>,
    on_seek_release: Option<Message>,
    on_skip: Option<Box<dyn Fn(f64) -> Message + 'a>>,
    on_mute: Option<Box<dyn Fn(bool) -> Message + 'a>>,
    on_volume: Option<Box<dyn Fn(u8) -> Message + 'a>>,
    on_speed: Option<Box<dyn Fn(f64) -> Message + 'a>>,
}

impl<'a, Message> PlaybackControls<'a, Message> {
    /// Creates a control panel reflecting `state`.
    pub fn new(state: &'a PlayerState) -> Self {
        PlaybackControls {
            state,
            position: None,
            skip: 10.0,
            on_play: None,
            on_pause: None,
            on_seek: None,
            on_seek_release: None,
            on_skip: None,
            on_mute: None,
            on_volume: None,
            on_speed: None,
        }
    }

    /// Shows `seconds` on the progress slider instead of the mirrored current time,
    /// e.g. while the user is dragging it.
    pub fn position(self, seconds: f64) -> Self {
        PlaybackControls {
            position: Some(seconds),
            ..self
        }
    }

    /// Sets how far the skip buttons jump, in seconds. Defaults to 10.
    pub fn skip(self, seconds: f64) -> Self {
        PlaybackControls {
            skip: seconds,
            ..self
        }
    }

    /// Message to send when the play button is pressed.
    pub fn on_play(self, on_play: Message) -> Self {
        PlaybackControls {
            on_play: Some(on_play),
            ..self
        }
    }

    /// Message to send when the pause button is pressed.
    pub fn on_pause(self, on_pause: Message) -> Self {
        PlaybackControls {
            on_pause: Some(on_pause),
            ..self
        }
    }

    /// Message to send while the progress slider is dragged.
    /// Without it the progress is display-only.
    pub fn on_seek<F>(self, on_seek: F) -> Self
    where
        F: 'a + Fn(f64) -> Message,
    {
        PlaybackControls {
            on_seek: Some(Box::new(on_seek)),
            ..self
        }
    }

    /// Message to send when the progress slider is released.
    pub fn on_seek_release(self, on_seek_release: Message) -> Self {
        PlaybackControls {
            on_seek_release: Some(on_seek_release),
            ..self
        }
    }

    /// Message to send for the skip buttons, given the signed offset in seconds.
    pub fn on_skip<F>(self, on_skip: F) -> Self
    where
        F: 'a + Fn(f64) -> Message,
    {
        PlaybackControls {
            on_skip: Some(Box::new(on_skip)),
            ..self
        }
    }

    /// Message to send for the mute button, given the requested muted state.
    pub fn on_mute<F>(self, on_mute: F) -> Self
    where
        F: 'a + Fn(bool) -> Message,
    {
        PlaybackControls {
            on_mute: Some(Box::new(on_mute)),
            ..self
        }
    }

    /// Message to send when the volume slider moves, given the new volume.
    pub fn on_volume<F>(self, on_volume: F) -> Self
    where
        F: 'a + Fn(u8) -> Message,
    {
        PlaybackControls {
            on_volume: Some(Box::new(on_volume)),
            ..self
        }
    }

    /// Message to send when a speed is picked, given the playback rate.
    pub fn on_speed<F>(self, on_speed: F) -> Self
    where
        F: 'a + Fn(f64) -> Message,
    {
        PlaybackControls {
            on_speed: Some(Box::new(on_speed)),
            ..self
        }
    }
}

/// Button messages after gating on readiness; `None` renders the button disabled.
#[derive(Debug, Clone, PartialEq)]
struct Presses<Message> {
    back: Option<Message>,
    play: Option<Message>,
    pause: Option<Message>,
    forward: Option<Message>,
    mute: Option<Message>,
}

impl<'a, Message: Clone> PlaybackControls<'a, Message> {
    fn presses(&self) -> Presses<Message> {
        if !self.state.ready {
            return Presses {
                back: None,
                play: None,
                pause: None,
                forward: None,
                mute: None,
            };
        }

        Presses {
            back: self.on_skip.as_ref().map(|on_skip| on_skip(-self.skip)),
            play: self.on_play.clone(),
            pause: self.on_pause.clone(),
            forward: self.on_skip.as_ref().map(|on_skip| on_skip(self.skip)),
            mute: self
                .on_mute
                .as_ref()
                .map(|on_mute| on_mute(!self.state.muted)),
        }
    }
}

impl<'a, Message> From<PlaybackControls<'a, Message>> for Element<'a, Message>
where
    Message: 'a + Clone,
{
    fn from(controls: PlaybackControls<'a, Message>) -> Self {
        let presses = controls.presses();
        let state = controls.state;
        let ready = state.ready;
        let position = controls.position.unwrap_or(state.current_time);
        // an empty range would make the slider divide by zero
        let end = if state.duration > 0.0 {
            state.duration
        } else {
            100.0
        };

        let progress: Element<'a, Message> = match controls.on_seek.filter(|_| ready) {
            Some(on_seek) => {
                let slider = Slider::new(0.0..=end, position.min(end), on_seek).step(1.0);
                match controls.on_seek_release {
                    Some(on_release) => slider.on_release(on_release).into(),
                    None => slider.into(),
                }
            }
            None => progress_bar(0.0..=end as f32, position.min(end) as f32)
                .height(Length::Fixed(8.0))
                .into(),
        };

        let times = Row::new()
            .push(Text::new(format_time(position)).size(12))
            .push(Space::with_width(Length::Fill))
            .push(Text::new(format_time(state.duration)).size(12));

        let skip = controls.skip;
        let transport = Row::new()
            .spacing(10)
            .align_y(iced::alignment::Vertical::Center)
            .push(control(format!("-{skip}s"), presses.back))
            .push(control("Play".to_owned(), presses.play))
            .push(control("Pause".to_owned(), presses.pause))
            .push(control(format!("+{skip}s"), presses.forward));

        let volume: Element<'a, Message> = match controls.on_volume.filter(|_| ready) {
            Some(on_volume) => Slider::new(0..=100u8, state.displayed_volume(), on_volume).into(),
            None => progress_bar(0.0..=100.0, f32::from(state.displayed_volume()))
                .height(Length::Fixed(8.0))
                .into(),
        };
        let speed: Element<'a, Message> = match controls.on_speed.filter(|_| ready) {
            Some(on_speed) => pick_list(
                PLAYBACK_RATES.map(Speed).to_vec(),
                Some(Speed(state.playback_rate)),
                move |speed: Speed| on_speed(speed.0),
            )
            .into(),
            None => Text::new(Speed(state.playback_rate).to_string()).into(),
        };

        let mixer = Row::new()
            .spacing(10)
            .align_y(iced::alignment::Vertical::Center)
            .push(control(
                (if state.muted { "Unmute" } else { "Mute" }).to_owned(),
                presses.mute,
            ))
            .push(volume)
            .push(Text::new(format!("{}%", state.displayed_volume())).width(Length::Fixed(48.0)))
            .push(Text::new("Speed:"))
            .push(speed);

        Column::new()
            .spacing(10)
            .padding(10)
            .push(progress)
            .push(times)
            .push(transport)
            .push(mixer)
            .into()
    }
}

fn control<'a, Message: Clone + 'a>(
    label: String,
    on_press: Option<Message>,
) -> Button<'a, Message> {
    Button::new(Text::new(label)).on_press_maybe(on_press)
}
