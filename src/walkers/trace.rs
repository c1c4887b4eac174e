use std::fmt;

use crate::tree::{Key, Phase, ViewWalker, Walker};

/// One callback received during a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Segment boundary
    Phase(Phase),
    /// Down-pass visit (key, canonical)
    Down(Key, bool),
    /// Up-pass visit (key, canonical)
    Up(Key, bool),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Phase(phase) => write!(f, "{phase:?}"),
            Event::Down(key, canonical) => {
                write!(f, "  down {key}{}", if *canonical { " *" } else { "" })
            }
            Event::Up(key, canonical) => {
                write!(f, "  up   {key}{}", if *canonical { " *" } else { "" })
            }
        }
    }
}

/// Walker that records every callback in order.
#[derive(Debug, Clone, Default)]
pub struct TraceWalker {
    events: Vec<Event>,
}

impl TraceWalker {
    /// Recorded events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Down-pass visits in order
    pub fn downs(&self) -> Vec<(Key, bool)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Down(key, canonical) => Some((*key, *canonical)),
                _ => None,
            })
            .collect()
    }

    /// Up-pass visits in order
    pub fn ups(&self) -> Vec<(Key, bool)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Up(key, canonical) => Some((*key, *canonical)),
                _ => None,
            })
            .collect()
    }

    /// Phases in order
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Phase(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// Visits recorded between the marker for `phase` and the next marker
    pub fn segment(&self, phase: Phase) -> Vec<(Key, bool)> {
        self.events
            .iter()
            .skip_while(|event| **event != Event::Phase(phase))
            .skip(1)
            .map_while(|event| match event {
                Event::Down(key, canonical) | Event::Up(key, canonical) => {
                    Some((*key, *canonical))
                }
                Event::Phase(_) => None,
            })
            .collect()
    }

    /// Canonical nodes, in down-pass order
    pub fn canonical(&self) -> Vec<Key> {
        self.downs()
            .into_iter()
            .filter(|(_, canonical)| *canonical)
            .map(|(key, _)| key)
            .collect()
    }

    /// One event per line
    pub fn render(&self) -> String {
        self.events
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Walker for TraceWalker {
    fn down(&mut self, key: Key, canonical: bool) {
        self.events.push(Event::Down(key, canonical));
    }

    fn up(&mut self, key: Key, canonical: bool) {
        self.events.push(Event::Up(key, canonical));
    }

    fn phase(&mut self, phase: Phase) {
        self.events.push(Event::Phase(phase));
    }
}

impl ViewWalker for TraceWalker {
    type State = ();

    fn down(&mut self, _state: &(), key: Key, canonical: bool) {
        self.events.push(Event::Down(key, canonical));
    }

    fn up(&mut self, _state: &(), key: Key, canonical: bool) {
        self.events.push(Event::Up(key, canonical));
    }

    fn phase(&mut self, _state: &(), phase: Phase) {
        self.events.push(Event::Phase(phase));
    }
}
