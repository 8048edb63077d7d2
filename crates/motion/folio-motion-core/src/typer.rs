//! Typewriter: types a phrase one character at a time, holds it, deletes it
//! at double speed, then moves on to the next phrase, forever.
//!
//! The cycle is split into a pure transition function on [`TyperState`] and a
//! [`Typer`] driver that owns the countdown between ticks. Each tick is
//! scheduled only after the previous one has been applied, so typing and
//! deleting never interleave.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ids::ElementId;
use crate::outputs::{AnimationKind, Change, CoreEvent, Outputs};
use crate::timer::Timeout;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TyperMode {
    Typing,
    Deleting,
}

/// What the driver should wait for before the next tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wait {
    /// Between typed characters (base delay plus jitter).
    Keystroke,
    /// Phrase fully typed.
    Hold,
    /// Between deleted characters.
    Backspace,
    /// Phrase cleared; next phrase selected.
    NextPhrase,
}

/// Position of the typewriter within the phrase cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TyperState {
    pub phrase: usize,
    pub chars: usize,
    pub mode: TyperMode,
}

impl Default for TyperState {
    fn default() -> Self {
        Self {
            phrase: 0,
            chars: 0,
            mode: TyperMode::Typing,
        }
    }
}

impl TyperState {
    /// Apply one tick given the current phrase's length (in characters) and
    /// the number of phrases. Returns the next state and the wait that follows it.
    ///
    /// Typing flips to deleting only at full length; deleting flips back to
    /// typing, advancing the phrase index, only at zero.
    pub fn step(self, phrase_len: usize, phrase_count: usize) -> (TyperState, Wait) {
        match self.mode {
            TyperMode::Typing => {
                let chars = (self.chars + 1).min(phrase_len);
                if chars >= phrase_len {
                    (
                        TyperState {
                            chars,
                            mode: TyperMode::Deleting,
                            ..self
                        },
                        Wait::Hold,
                    )
                } else {
                    (TyperState { chars, ..self }, Wait::Keystroke)
                }
            }
            TyperMode::Deleting => {
                let chars = self.chars.saturating_sub(1);
                if chars == 0 {
                    (
                        TyperState {
                            phrase: (self.phrase + 1) % phrase_count.max(1),
                            chars: 0,
                            mode: TyperMode::Typing,
                        },
                        Wait::NextPhrase,
                    )
                } else {
                    (TyperState { chars, ..self }, Wait::Backspace)
                }
            }
        }
    }
}

/// Delays used by the driver.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TyperTiming {
    pub type_delay_ms: f64,
    pub pause_ms: f64,
    pub jitter_ms: f64,
    pub next_phrase_ms: f64,
}

impl TyperTiming {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            type_delay_ms: cfg.type_delay_ms,
            pause_ms: cfg.type_pause_ms,
            jitter_ms: cfg.type_jitter_ms,
            next_phrase_ms: cfg.next_phrase_ms,
        }
    }
}

/// A phrase with precomputed character boundaries so prefixes are O(1) slices.
#[derive(Clone, Debug)]
struct Phrase {
    text: String,
    /// Byte offset of the end of each prefix: `ends[n]` is the end of the first n chars.
    ends: Vec<usize>,
}

impl Phrase {
    fn new(text: String) -> Self {
        let mut ends = Vec::with_capacity(text.len() + 1);
        ends.push(0);
        ends.extend(text.char_indices().map(|(i, c)| i + c.len_utf8()));
        Self { text, ends }
    }

    fn len(&self) -> usize {
        self.ends.len() - 1
    }

    fn prefix(&self, chars: usize) -> &str {
        &self.text[..self.ends[chars.min(self.len())]]
    }
}

/// Driver for one typewriter element.
#[derive(Debug)]
pub struct Typer {
    element: ElementId,
    phrases: Vec<Phrase>,
    state: TyperState,
    timing: TyperTiming,
    countdown: Timeout,
    jitter: SmallRng,
}

impl Typer {
    /// Start typing into `element`. Returns None for an empty phrase list.
    /// The first character is typed on the first advance.
    pub fn start(
        element: ElementId,
        phrases: Vec<String>,
        timing: TyperTiming,
        seed: u64,
    ) -> Option<Self> {
        if phrases.is_empty() {
            return None;
        }
        Some(Self {
            element,
            phrases: phrases.into_iter().map(Phrase::new).collect(),
            state: TyperState::default(),
            timing,
            countdown: Timeout::immediate(),
            jitter: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn state(&self) -> TyperState {
        self.state
    }

    /// Currently displayed text.
    pub fn text(&self) -> &str {
        self.phrases[self.state.phrase].prefix(self.state.chars)
    }

    /// Time until the next tick.
    pub fn next_tick_in_ms(&self) -> f64 {
        self.countdown.remaining_ms()
    }

    /// Run every tick that falls within `dt_ms`, writing each displayed text.
    pub fn advance(&mut self, dt_ms: f64, out: &mut Outputs) {
        let mut budget = dt_ms;
        while let Some(overshoot) = self.countdown.advance(budget) {
            budget = 0.0;
            let wait = self.tick(out);
            let delay = self.wait_ms(wait);
            self.countdown.rearm(delay, overshoot);
        }
    }

    fn tick(&mut self, out: &mut Outputs) -> Wait {
        let phrase_len = self.phrases[self.state.phrase].len();
        let (next, wait) = self.state.step(phrase_len, self.phrases.len());
        let typed_phrase = self.state.phrase;
        self.state = next;
        out.push_change(Change::text(self.element, self.text()));
        match wait {
            Wait::Hold => {
                out.push_event(CoreEvent::PhraseTyped {
                    element: self.element,
                    phrase: typed_phrase,
                });
            }
            Wait::NextPhrase if self.state.phrase == 0 && self.phrases.len() > 1 => {
                log::trace!("typer {:?} wrapped to first phrase", self.element);
            }
            _ => {}
        }
        wait
    }

    fn wait_ms(&mut self, wait: Wait) -> f64 {
        match wait {
            Wait::Keystroke => {
                let jitter = if self.timing.jitter_ms > 0.0 {
                    self.jitter.gen_range(0.0..self.timing.jitter_ms)
                } else {
                    0.0
                };
                self.timing.type_delay_ms + jitter
            }
            Wait::Hold => self.timing.pause_ms,
            Wait::Backspace => self.timing.type_delay_ms / 2.0,
            Wait::NextPhrase => self.timing.next_phrase_ms,
        }
    }
}

/// Started-event helper so the stage reports typers like other animators.
pub(crate) fn started_event(typer: &Typer) -> CoreEvent {
    CoreEvent::AnimationStarted {
        element: typer.element,
        kind: AnimationKind::Typer,
    }
}
