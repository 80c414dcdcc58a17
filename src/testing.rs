//! Recording stand-in for the host's video widget library.

use crate::{Capability, InstanceId, PlayerInstance, PlayerOptions, VideoId};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Create(String, InstanceId, PlayerOptions),
    Play(InstanceId),
    Pause(InstanceId),
    Seek(InstanceId, f64),
    Mute(InstanceId),
    Unmute(InstanceId),
    SetVolume(InstanceId, u8),
    SetRate(InstanceId, f64),
    Destroy(InstanceId),
}

/// What every fake instance reports through its getters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Reported {
    pub muted: bool,
    pub volume: u8,
    pub rate: f64,
    pub current_time: f64,
    pub duration: f64,
}

struct Shared {
    bootstrapped: bool,
    calls: Vec<Call>,
    live: BTreeSet<InstanceId>,
    peak_live: usize,
    reported: Reported,
}

/// Test-side handle onto the fake's recordings.
#[derive(Clone)]
pub(crate) struct Recorder(Rc<RefCell<Shared>>);

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().calls.clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().calls.clear();
    }

    pub fn created(&self) -> Vec<InstanceId> {
        self.0
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Create(_, id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn destroyed(&self) -> Vec<InstanceId> {
        self.0
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Destroy(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn live(&self) -> usize {
        self.0.borrow().live.len()
    }

    pub fn peak_live(&self) -> usize {
        self.0.borrow().peak_live
    }

    pub fn set_bootstrapped(&self, bootstrapped: bool) {
        self.0.borrow_mut().bootstrapped = bootstrapped;
    }

    pub fn report(&self, update: impl FnOnce(&mut Reported)) {
        update(&mut self.0.borrow_mut().reported);
    }
}

pub(crate) struct FakeCapability(Rc<RefCell<Shared>>);

impl FakeCapability {
    pub fn new() -> (Self, Recorder) {
        let shared = Rc::new(RefCell::new(Shared {
            bootstrapped: true,
            calls: Vec::new(),
            live: BTreeSet::new(),
            peak_live: 0,
            reported: Reported {
                muted: false,
                volume: 80,
                rate: 1.0,
                current_time: 0.0,
                duration: 120.0,
            },
        }));
        (FakeCapability(Rc::clone(&shared)), Recorder(shared))
    }
}

impl Capability for FakeCapability {
    type Container = ();
    type Instance = FakeInstance;

    fn is_bootstrapped(&self) -> bool {
        self.0.borrow().bootstrapped
    }

    fn create_player(
        &mut self,
        _container: &(),
        video: &VideoId,
        options: &PlayerOptions,
        instance: InstanceId,
    ) -> FakeInstance {
        let mut shared = self.0.borrow_mut();
        shared
            .calls
            .push(Call::Create(video.to_string(), instance, *options));
        shared.live.insert(instance);
        shared.peak_live = shared.peak_live.max(shared.live.len());
        FakeInstance {
            id: instance,
            shared: Rc::clone(&self.0),
        }
    }
}

pub(crate) struct FakeInstance {
    id: InstanceId,
    shared: Rc<RefCell<Shared>>,
}

impl FakeInstance {
    fn record(&self, call: Call) {
        self.shared.borrow_mut().calls.push(call);
    }

    fn reported(&self) -> Reported {
        self.shared.borrow().reported
    }
}

impl PlayerInstance for FakeInstance {
    fn play(&mut self) {
        self.record(Call::Play(self.id));
    }

    fn pause(&mut self) {
        self.record(Call::Pause(self.id));
    }

    fn seek_to(&mut self, seconds: f64, allow_seek_ahead: bool) {
        assert!(allow_seek_ahead);
        self.record(Call::Seek(self.id, seconds));
    }

    fn mute(&mut self) {
        self.record(Call::Mute(self.id));
    }

    fn unmute(&mut self) {
        self.record(Call::Unmute(self.id));
    }

    fn is_muted(&self) -> bool {
        self.reported().muted
    }

    fn volume(&self) -> u8 {
        self.reported().volume
    }

    fn set_volume(&mut self, volume: u8) {
        self.record(Call::SetVolume(self.id, volume));
    }

    fn playback_rate(&self) -> f64 {
        self.reported().rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.record(Call::SetRate(self.id, rate));
    }

    fn current_time(&self) -> f64 {
        self.reported().current_time
    }

    fn duration(&self) -> f64 {
        self.reported().duration
    }

    fn destroy(&mut self) {
        let mut shared = self.shared.borrow_mut();
        assert!(shared.live.remove(&self.id), "instance destroyed twice");
        shared.calls.push(Call::Destroy(self.id));
    }
}
