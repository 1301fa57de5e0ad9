//! Mock `<audio>` element.
//!
//! Playback outcome is scripted with [`PlaybackBehavior`]. `Hold` keeps the
//! play request pending so a test can decide when (and how) it settles, the
//! way a real `play()` promise settles some time after the call.

use crate::dom::{AudioElement, PlaybackCallback};
use crate::result::PlaybackError;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// How the mock answers `play()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackBehavior {
    /// Playback starts at once
    Start,
    /// Playback is refused at once
    Reject(PlaybackError),
    /// The request stays pending until [`MockAudio::settle_next`]
    Hold,
}

struct AudioState {
    behavior: PlaybackBehavior,
    current_time: f64,
    paused: bool,
    pause_count: usize,
    play_count: usize,
    pending: VecDeque<PlaybackCallback>,
}

/// Scriptable audio element
#[derive(Clone)]
pub struct MockAudio {
    state: Rc<RefCell<AudioState>>,
}

impl std::fmt::Debug for MockAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MockAudio")
            .field("behavior", &state.behavior)
            .field("current_time", &state.current_time)
            .field("paused", &state.paused)
            .field("play_count", &state.play_count)
            .field("pending", &state.pending.len())
            .finish()
    }
}

impl MockAudio {
    /// Create an audio element, paused at zero
    #[must_use]
    pub fn new(behavior: PlaybackBehavior) -> Self {
        Self {
            state: Rc::new(RefCell::new(AudioState {
                behavior,
                current_time: 0.0,
                paused: true,
                pause_count: 0,
                play_count: 0,
                pending: VecDeque::new(),
            })),
        }
    }

    /// Change how later `play()` calls are answered
    pub fn set_behavior(&self, behavior: PlaybackBehavior) {
        self.state.borrow_mut().behavior = behavior;
    }

    /// Simulate a partially played clip
    pub fn set_current_time(&self, seconds: f64) {
        self.state.borrow_mut().current_time = seconds;
    }

    /// Playback position in seconds
    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    /// Whether the element is paused
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    /// Calls to `pause()`
    #[must_use]
    pub fn pause_count(&self) -> usize {
        self.state.borrow().pause_count
    }

    /// Calls to `play()`
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.state.borrow().play_count
    }

    /// Play requests held by [`PlaybackBehavior::Hold`]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Settle the oldest held play request. Returns `false` if none was held.
    pub fn settle_next(&self, outcome: Result<(), PlaybackError>) -> bool {
        let done = {
            let mut state = self.state.borrow_mut();
            let done = state.pending.pop_front();
            if done.is_some() && outcome.is_ok() {
                state.paused = false;
            }
            done
        };
        match done {
            Some(done) => {
                done(outcome);
                true
            }
            None => false,
        }
    }
}

impl AudioElement for MockAudio {
    fn pause(&self) {
        let mut state = self.state.borrow_mut();
        state.paused = true;
        state.pause_count += 1;
    }

    fn rewind(&self) {
        self.state.borrow_mut().current_time = 0.0;
    }

    fn play(&self, done: PlaybackCallback) {
        let behavior = {
            let mut state = self.state.borrow_mut();
            state.play_count += 1;
            if state.behavior == PlaybackBehavior::Start {
                state.paused = false;
            }
            state.behavior.clone()
        };
        match behavior {
            PlaybackBehavior::Start => done(Ok(())),
            PlaybackBehavior::Reject(err) => done(Err(err)),
            PlaybackBehavior::Hold => self.state.borrow_mut().pending.push_back(done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<Result<(), PlaybackError>>>>, PlaybackCallback) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, Box::new(move |outcome| sink.borrow_mut().push(outcome)))
    }

    #[test]
    fn test_start_settles_immediately() {
        let audio = MockAudio::new(PlaybackBehavior::Start);
        let (seen, done) = recorder();
        audio.play(done);
        assert_eq!(*seen.borrow(), vec![Ok(())]);
        assert!(!audio.is_paused());
    }

    #[test]
    fn test_reject_settles_with_error() {
        let audio = MockAudio::new(PlaybackBehavior::Reject(PlaybackError::NotSupported));
        let (seen, done) = recorder();
        audio.play(done);
        assert_eq!(*seen.borrow(), vec![Err(PlaybackError::NotSupported)]);
        assert!(audio.is_paused());
    }

    #[test]
    fn test_hold_waits_for_settle() {
        let audio = MockAudio::new(PlaybackBehavior::Hold);
        let called = Rc::new(Cell::new(false));
        let flag = Rc::clone(&called);
        audio.play(Box::new(move |_| flag.set(true)));

        assert!(!called.get());
        assert_eq!(audio.pending_count(), 1);
        assert!(audio.settle_next(Ok(())));
        assert!(called.get());
        assert!(!audio.settle_next(Ok(())));
    }

    #[test]
    fn test_pause_and_rewind() {
        let audio = MockAudio::new(PlaybackBehavior::Start);
        audio.set_current_time(0.8);
        audio.pause();
        audio.rewind();
        assert_eq!(audio.pause_count(), 1);
        assert!(audio.current_time().abs() < f64::EPSILON);
    }
}
