//! Headless model of the duck picker screen.
//!
//! The screen is a three-section list: ducks, behavior categories, and a
//! single rocket trigger row. Picking a duck selects it, picking a category
//! performs it on the selected duck and yields a short-lived `Notice`, and the
//! trigger upgrades the selected duck's flight to `rocket_powered`. Taps that
//! arrive before a duck is selected, or that name rows which do not exist, are
//! ignored. Rendering and timers stay with the caller.

use crate::behavior::BuiltinBehavior;
use crate::catalog::{BehaviorCategory, Duck};
use crate::error::SimResult;
use crate::simulator::Simulator;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a behavior notice stays on screen.
pub const NOTICE_DISMISS_DELAY: Duration = Duration::from_millis(100);

/// Text of the single row in the Simulate section.
pub const TRIGGER_ROW_TEXT: &str = "🚀";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TableSection {
    Duck,
    Behavior,
    Simulate,
}

impl TableSection {
    pub const ALL: [TableSection; 3] = [
        TableSection::Duck,
        TableSection::Behavior,
        TableSection::Simulate,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Accepts a section position or its title, case-insensitively.
    pub fn resolve(token: &str) -> Option<Self> {
        let token = token.trim();
        match token.parse::<usize>() {
            Ok(index) => Self::from_index(index),
            Err(_) => Self::ALL
                .iter()
                .copied()
                .find(|section| section.title().eq_ignore_ascii_case(token)),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            TableSection::Duck => "Duck",
            TableSection::Behavior => "Behavior",
            TableSection::Simulate => "Simulate",
        }
    }
}

/// Message shown after a behavior tap until `dismiss_at`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notice {
    pub message: String,
    pub shown_at: Instant,
    pub dismiss_after: Duration,
}

impl Notice {
    pub fn dismiss_at(&self) -> Instant {
        self.shown_at + self.dismiss_after
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.dismiss_at()
    }
}

/// What a tap did.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Tap {
    DuckSelected(usize),
    Performed(Notice),
    RocketFitted(usize),
    Ignored,
}

impl Tap {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Tap::Performed(notice) => Some(notice),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    simulator: Simulator,
    selected: Option<usize>,
}

impl Session {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            simulator,
            selected: None,
        }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn selected_duck(&self) -> Option<&Duck> {
        self.selected
            .and_then(|index| self.simulator.list_entities().get(index))
    }

    pub fn section_count(&self) -> usize {
        TableSection::ALL.len()
    }

    pub fn row_count(&self, section: TableSection) -> usize {
        match section {
            TableSection::Duck => self.simulator.list_entities().len(),
            TableSection::Behavior => self.simulator.list_categories().len(),
            TableSection::Simulate => 1,
        }
    }

    pub fn row_text(&self, section: TableSection, row: usize) -> Option<&str> {
        match section {
            TableSection::Duck => self.simulator.list_entities().get(row).map(Duck::label),
            TableSection::Behavior => self
                .simulator
                .list_categories()
                .get(row)
                .map(|category| category.title()),
            TableSection::Simulate => (row == 0).then_some(TRIGGER_ROW_TEXT),
        }
    }

    pub fn select(&mut self, section: TableSection, row: usize) -> SimResult<Tap> {
        self.select_at(section, row, Instant::now())
    }

    /// `select` with an explicit clock reading for the notice timestamp.
    pub fn select_at(&mut self, section: TableSection, row: usize, now: Instant) -> SimResult<Tap> {
        if row >= self.row_count(section) {
            debug!(section = section.title(), row, "tap on missing row ignored");
            return Ok(Tap::Ignored);
        }

        match section {
            TableSection::Duck => {
                self.selected = Some(row);
                Ok(Tap::DuckSelected(row))
            }
            TableSection::Behavior => {
                let Some(duck) = self.selected else {
                    return Ok(Tap::Ignored);
                };
                let message = self.simulator.execute(duck, BehaviorCategory::at(row)?)?;
                Ok(Tap::Performed(Notice {
                    message,
                    shown_at: now,
                    dismiss_after: NOTICE_DISMISS_DELAY,
                }))
            }
            TableSection::Simulate => {
                let Some(duck) = self.selected else {
                    return Ok(Tap::Ignored);
                };
                self.simulator.override_behavior(
                    duck,
                    BehaviorCategory::Fly,
                    BuiltinBehavior::RocketPowered.as_str(),
                )?;
                Ok(Tap::RocketFitted(duck))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Simulator::standard())
    }

    #[test]
    fn table_layout_matches_catalog() {
        let session = session();
        assert_eq!(session.section_count(), 3);
        assert_eq!(session.row_count(TableSection::Duck), 3);
        assert_eq!(session.row_count(TableSection::Behavior), 3);
        assert_eq!(session.row_count(TableSection::Simulate), 1);
        assert_eq!(session.row_text(TableSection::Duck, 2), Some("RubberDuck"));
        assert_eq!(session.row_text(TableSection::Behavior, 1), Some("Swim"));
        assert_eq!(session.row_text(TableSection::Simulate, 0), Some("🚀"));
        assert_eq!(session.row_text(TableSection::Simulate, 1), None);
    }

    #[test]
    fn behavior_tap_without_duck_is_ignored() {
        let mut session = session();
        assert_eq!(session.select(TableSection::Behavior, 2).unwrap(), Tap::Ignored);
        assert_eq!(session.select(TableSection::Simulate, 0).unwrap(), Tap::Ignored);
        assert!(!session.simulator().is_overridden(0, BehaviorCategory::Fly).unwrap());
    }

    #[test]
    fn behavior_tap_produces_expiring_notice() {
        let mut session = session();
        let now = Instant::now();
        session.select(TableSection::Duck, 0).unwrap();
        let tap = session.select_at(TableSection::Behavior, 2, now).unwrap();
        let notice = tap.notice().expect("fly tap yields a notice");
        assert_eq!(notice.message, "I'm flying!!");
        assert!(!notice.is_expired(now));
        assert!(notice.is_expired(now + NOTICE_DISMISS_DELAY));
    }

    #[test]
    fn trigger_upgrades_only_selected_duck() {
        let mut session = session();
        session.select(TableSection::Duck, 1).unwrap();
        assert_eq!(
            session.select(TableSection::Simulate, 0).unwrap(),
            Tap::RocketFitted(1)
        );
        let tap = session.select(TableSection::Behavior, 2).unwrap();
        assert_eq!(tap.notice().unwrap().message, "I'm flying with a rocket!");

        session.select(TableSection::Duck, 0).unwrap();
        let tap = session.select(TableSection::Behavior, 2).unwrap();
        assert_eq!(tap.notice().unwrap().message, "I'm flying!!");
        assert_eq!(session.selected_duck().map(Duck::label), Some("MallardDuck"));
    }

    #[test]
    fn missing_rows_and_sections_are_ignored() {
        let mut session = session();
        assert_eq!(session.select(TableSection::Duck, 5).unwrap(), Tap::Ignored);
        assert!(session.selected_duck().is_none());
        assert_eq!(TableSection::from_index(3), None);
        assert_eq!(TableSection::resolve("simulate"), Some(TableSection::Simulate));
        assert_eq!(TableSection::resolve("1"), Some(TableSection::Behavior));
    }
}
