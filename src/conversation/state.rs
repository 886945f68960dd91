//! Report conversation state — which question the user is answering.

use crate::report::{Report, Section};

/// The steps of the report conversation.
///
/// Progresses linearly: Idle → AwaitingDate → AwaitingVitrina →
/// AwaitingEducation → AwaitingTasks → AwaitingCoaching →
/// AwaitingComplaints → AwaitingExtra → Idle (after dispatch).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Step {
    #[default]
    Idle,
    AwaitingDate,
    AwaitingVitrina,
    AwaitingEducation,
    AwaitingTasks,
    AwaitingCoaching,
    AwaitingComplaints,
    AwaitingExtra,
}

impl Step {
    /// Check if moving from `self` to `target` by answering a question is valid.
    ///
    /// Starting or restarting a report (any step → AwaitingDate) is a reset,
    /// not an answer, and is not covered here.
    pub fn can_transition_to(&self, target: Step) -> bool {
        use Step::*;
        matches!(
            (self, target),
            (Idle, AwaitingDate)
                | (AwaitingDate, AwaitingVitrina)
                | (AwaitingVitrina, AwaitingEducation)
                | (AwaitingEducation, AwaitingTasks)
                | (AwaitingTasks, AwaitingCoaching)
                | (AwaitingCoaching, AwaitingComplaints)
                | (AwaitingComplaints, AwaitingExtra)
                | (AwaitingExtra, Idle)
        )
    }

    /// Get the next step in the linear progression.
    pub fn next(&self) -> Step {
        use Step::*;
        match self {
            Idle => AwaitingDate,
            AwaitingDate => AwaitingVitrina,
            AwaitingVitrina => AwaitingEducation,
            AwaitingEducation => AwaitingTasks,
            AwaitingTasks => AwaitingCoaching,
            AwaitingCoaching => AwaitingComplaints,
            AwaitingComplaints => AwaitingExtra,
            AwaitingExtra => Idle,
        }
    }

    /// The free-text section this step collects, if any.
    pub fn section(&self) -> Option<Section> {
        match self {
            Self::AwaitingVitrina => Some(Section::Vitrina),
            Self::AwaitingEducation => Some(Section::Education),
            Self::AwaitingTasks => Some(Section::Tasks),
            Self::AwaitingCoaching => Some(Section::Coaching),
            Self::AwaitingComplaints => Some(Section::Complaints),
            Self::AwaitingExtra => Some(Section::Extra),
            Self::Idle | Self::AwaitingDate => None,
        }
    }

    /// The step that asks for `section`.
    pub fn for_section(section: Section) -> Step {
        match section {
            Section::Vitrina => Self::AwaitingVitrina,
            Section::Education => Self::AwaitingEducation,
            Section::Tasks => Self::AwaitingTasks,
            Section::Coaching => Self::AwaitingCoaching,
            Section::Complaints => Self::AwaitingComplaints,
            Section::Extra => Self::AwaitingExtra,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::AwaitingDate => "awaiting_date",
            Self::AwaitingVitrina => "awaiting_vitrina",
            Self::AwaitingEducation => "awaiting_education",
            Self::AwaitingTasks => "awaiting_tasks",
            Self::AwaitingCoaching => "awaiting_coaching",
            Self::AwaitingComplaints => "awaiting_complaints",
            Self::AwaitingExtra => "awaiting_extra",
        };
        write!(f, "{s}")
    }
}

/// An in-progress report for one user.
///
/// Only exists while a report is being filled in, so `step` is never `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub step: Step,
    pub report: Report,
}

impl Session {
    /// A fresh session waiting for the report date.
    pub fn new() -> Self {
        Self {
            step: Step::AwaitingDate,
            report: Report::new(),
        }
    }

    /// Move to the next step. Returns the step moved to.
    pub fn advance(&mut self) -> Step {
        let next = self.step.next();
        debug_assert!(self.step.can_transition_to(next));
        self.step = next;
        next
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
