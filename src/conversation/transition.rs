//! Pure state transition function for the report conversation.
//!
//! Given the user's current session (if any), the classified input and
//! today's date, produce the new session and the effects to perform. No I/O
//! happens here; the controller applies the result.

use chrono::NaiveDate;

use super::prompts::{
    self, ASK_DATE, ASK_MANUAL_DATE, BAD_DATE, EMPTY_ANSWER, ENTER_DATE_PREFIX, GREETING,
    RESTARTING, date_keyboard, main_keyboard, section_question,
};
use super::state::{Session, Step};
use crate::channels::{EventKind, InboundEvent, Keyboard};
use crate::report::{Report, Section, format_report_date, parse_report_date};

/// What an inbound text means to the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger<'a> {
    /// `/start` — show the greeting.
    Start,
    /// Begin a new report from scratch.
    SendReport,
    /// Drop the current report and begin again.
    Restart,
    /// An answer to the current question, already trimmed.
    Text(&'a str),
}

impl<'a> Trigger<'a> {
    /// Classify an inbound event by its kind and text.
    pub fn from_event(event: &'a InboundEvent) -> Self {
        Self::classify(event.kind, &event.text)
    }

    /// Classify raw message text. Commands and buttons win over answers.
    ///
    /// Only `EventKind::Command` texts are parsed as slash commands.
    pub fn classify(kind: EventKind, raw: &'a str) -> Self {
        let text = raw.trim();

        if let (EventKind::Command, Some(command)) = (kind, text.strip_prefix('/')) {
            // Group chats address commands as `/cmd@bot_name`.
            let name = command
                .split(|c: char| c == '@' || c.is_whitespace())
                .next()
                .unwrap_or_default();
            match name.to_lowercase().as_str() {
                "start" => return Self::Start,
                "report" => return Self::SendReport,
                "restart" => return Self::Restart,
                _ => {}
            }
        }

        let lower = text.to_lowercase();
        if lower == prompts::SEND_REPORT_BUTTON.to_lowercase() {
            Self::SendReport
        } else if lower == prompts::RESTART_BUTTON.to_lowercase() {
            Self::Restart
        } else {
            Self::Text(text)
        }
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a message back to the chat the input came from.
    Reply { text: String, keyboard: Keyboard },
    /// The report is finished; deliver it.
    Dispatch { report: Report },
}

impl Effect {
    pub fn reply(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self::Reply {
            text: text.into(),
            keyboard,
        }
    }
}

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// Session to store; `None` means the user is idle.
    pub session: Option<Session>,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Step the user is at after this transition.
    pub fn step(&self) -> Step {
        self.session.as_ref().map(|s| s.step).unwrap_or(Step::Idle)
    }
}

/// Pure transition function.
pub fn transition(
    session: Option<Session>,
    trigger: Trigger<'_>,
    today: NaiveDate,
) -> TransitionResult {
    match (session, trigger) {
        (session, Trigger::Start) => {
            TransitionResult::new(session).with_effect(Effect::reply(GREETING, main_keyboard()))
        }

        (_, Trigger::SendReport) => begin_report(TransitionResult::new(None)),

        (_, Trigger::Restart) => begin_report(
            TransitionResult::new(None).with_effect(Effect::reply(RESTARTING, main_keyboard())),
        ),

        // No report in progress: free text is ignored.
        (None, Trigger::Text(_)) => TransitionResult::new(None),

        (Some(session), Trigger::Text(text)) => match session.step {
            Step::AwaitingDate => answer_date(session, text, today),
            step => match step.section() {
                Some(section) => answer_section(session, section, text),
                // A stored session is never idle; drop it if it somehow is.
                None => TransitionResult::new(None),
            },
        },
    }
}

fn begin_report(result: TransitionResult) -> TransitionResult {
    TransitionResult {
        session: Some(Session::new()),
        ..result
    }
    .with_effect(Effect::reply(ASK_DATE, date_keyboard()))
}

fn answer_date(mut session: Session, text: &str, today: NaiveDate) -> TransitionResult {
    let lower = text.to_lowercase();

    let date = if lower == prompts::TODAY_BUTTON.to_lowercase() {
        format_report_date(today)
    } else if lower.starts_with(ENTER_DATE_PREFIX) {
        return TransitionResult::new(Some(session))
            .with_effect(Effect::reply(ASK_MANUAL_DATE, Keyboard::Remove));
    } else {
        match parse_report_date(text) {
            Ok(_) => text.to_string(),
            Err(e) => {
                tracing::debug!("Rejected report date: {e}");
                return TransitionResult::new(Some(session))
                    .with_effect(Effect::reply(BAD_DATE, Keyboard::None));
            }
        }
    };

    session.report.date = date;
    session.advance();

    TransitionResult::new(Some(session)).with_effect(Effect::reply(
        section_question(Section::Vitrina),
        Keyboard::Remove,
    ))
}

fn answer_section(mut session: Session, section: Section, text: &str) -> TransitionResult {
    if text.is_empty() {
        return TransitionResult::new(Some(session)).with_effect(Effect::reply(
            format!("{EMPTY_ANSWER}\n\n{}", section_question(section)),
            Keyboard::None,
        ));
    }

    session.report.set_section(section, text);

    match session.advance().section() {
        Some(next) => TransitionResult::new(Some(session))
            .with_effect(Effect::reply(section_question(next), Keyboard::None)),
        None => TransitionResult::new(None).with_effect(Effect::Dispatch {
            report: session.report,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 8).unwrap()
    }

    fn at(step: Step) -> Option<Session> {
        let mut session = Session::new();
        while session.step != step {
            match session.step.section() {
                Some(section) => session.report.set_section(section, "filled"),
                None => session.report.date = "01.01.2025".into(),
            }
            session.advance();
        }
        Some(session)
    }

    fn replies(result: &TransitionResult) -> Vec<&str> {
        result
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::Reply { text, .. } => Some(text.as_str()),
                Effect::Dispatch { .. } => None,
            })
            .collect()
    }

    fn classify(raw: &str) -> Trigger<'_> {
        Trigger::classify(EventKind::of(raw), raw)
    }

    // ── Classification ──────────────────────────────────────────────

    #[test]
    fn classify_commands_and_buttons() {
        assert_eq!(classify("/start"), Trigger::Start);
        assert_eq!(classify("/start@report_bot"), Trigger::Start);
        assert_eq!(classify("/report"), Trigger::SendReport);
        assert_eq!(classify("/restart"), Trigger::Restart);
        assert_eq!(classify("Send report"), Trigger::SendReport);
        assert_eq!(classify("  send REPORT "), Trigger::SendReport);
        assert_eq!(classify("Restart"), Trigger::Restart);
    }

    #[test]
    fn classify_answers_are_trimmed() {
        assert_eq!(classify("  vitrina notes \n"), Trigger::Text("vitrina notes"));
        assert_eq!(classify("/unknown"), Trigger::Text("/unknown"));
        assert_eq!(classify("send report please"), Trigger::Text("send report please"));
    }

    #[test]
    fn classify_follows_event_kind() {
        let command = InboundEvent::new(1, "/restart");
        assert_eq!(command.kind, EventKind::Command);
        assert_eq!(Trigger::from_event(&command), Trigger::Restart);

        assert_eq!(Trigger::classify(EventKind::Text, "/restart"), Trigger::Text("/restart"));
        assert_eq!(Trigger::classify(EventKind::Text, "Restart"), Trigger::Restart);
    }

    // ── Starting and restarting ─────────────────────────────────────

    #[test]
    fn send_report_from_idle_asks_for_date() {
        let result = transition(None, Trigger::SendReport, today());
        assert_eq!(result.step(), Step::AwaitingDate);
        assert!(result.session.as_ref().unwrap().report.is_empty());
        assert_eq!(result.effects, vec![Effect::reply(ASK_DATE, date_keyboard())]);
    }

    #[test]
    fn send_report_mid_way_resets() {
        let result = transition(at(Step::AwaitingCoaching), Trigger::SendReport, today());
        assert_eq!(result.step(), Step::AwaitingDate);
        assert!(result.session.unwrap().report.is_empty());
    }

    #[test]
    fn restart_from_every_step_yields_empty_date_step() {
        let steps = [
            Step::Idle,
            Step::AwaitingDate,
            Step::AwaitingVitrina,
            Step::AwaitingEducation,
            Step::AwaitingTasks,
            Step::AwaitingCoaching,
            Step::AwaitingComplaints,
            Step::AwaitingExtra,
        ];
        for step in steps {
            let session = if step == Step::Idle { None } else { at(step) };
            let result = transition(session, Trigger::Restart, today());
            assert_eq!(result.step(), Step::AwaitingDate, "restart from {step}");
            assert_eq!(result.session.as_ref().unwrap().report, Report::new());
            assert_eq!(replies(&result), vec![RESTARTING, ASK_DATE]);
        }
    }

    #[test]
    fn start_greets_without_touching_session() {
        let before = at(Step::AwaitingTasks);
        let result = transition(before.clone(), Trigger::Start, today());
        assert_eq!(result.session, before);
        assert_eq!(result.effects, vec![Effect::reply(GREETING, main_keyboard())]);

        let result = transition(None, Trigger::Start, today());
        assert!(result.session.is_none());
    }

    #[test]
    fn idle_text_is_ignored() {
        let result = transition(None, Trigger::Text("hello"), today());
        assert_eq!(result, TransitionResult::new(None));
    }

    // ── Date step ───────────────────────────────────────────────────

    #[test]
    fn today_in_any_case_uses_current_date() {
        for input in ["today", "Today", "TODAY"] {
            let result = transition(at(Step::AwaitingDate), Trigger::Text(input), today());
            assert_eq!(result.step(), Step::AwaitingVitrina);
            assert_eq!(result.session.unwrap().report.date, "08.12.2025");
        }
    }

    #[test]
    fn typed_date_is_stored_verbatim() {
        let result = transition(at(Step::AwaitingDate), Trigger::Text("01.02.2024"), today());
        assert_eq!(result.step(), Step::AwaitingVitrina);
        assert_eq!(result.session.as_ref().unwrap().report.date, "01.02.2024");
        assert_eq!(
            result.effects,
            vec![Effect::reply(section_question(Section::Vitrina), Keyboard::Remove)]
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        let before = at(Step::AwaitingDate);
        let result = transition(before.clone(), Trigger::Text("8/12/2025"), today());
        assert_eq!(result.session, before);
        assert_eq!(result.effects, vec![Effect::reply(BAD_DATE, Keyboard::None)]);
    }

    #[test]
    fn impossible_date_is_rejected() {
        let result = transition(at(Step::AwaitingDate), Trigger::Text("31.02.2025"), today());
        assert_eq!(result.step(), Step::AwaitingDate);
        assert!(result.session.unwrap().report.date.is_empty());
    }

    #[test]
    fn enter_date_prefix_reprompts_without_mutation() {
        for input in ["Enter date manually", "enter date", "ENTER DATE please"] {
            let before = at(Step::AwaitingDate);
            let result = transition(before.clone(), Trigger::Text(input), today());
            assert_eq!(result.session, before);
            assert_eq!(result.effects, vec![Effect::reply(ASK_MANUAL_DATE, Keyboard::Remove)]);
        }
    }

    #[test]
    fn date_retries_are_unlimited() {
        let mut session = at(Step::AwaitingDate);
        for _ in 0..50 {
            session = transition(session, Trigger::Text("tomorrow"), today()).session;
        }
        let result = transition(session, Trigger::Text("today"), today());
        assert_eq!(result.step(), Step::AwaitingVitrina);
    }

    // ── Free-text steps ─────────────────────────────────────────────

    #[test]
    fn each_section_step_stores_and_asks_next() {
        for (i, section) in Section::ALL[..5].iter().enumerate() {
            let step = Step::for_section(*section);
            let result = transition(at(step), Trigger::Text("answer"), today());
            let next = Section::ALL[i + 1];
            assert_eq!(result.step(), Step::for_section(next));
            assert_eq!(result.session.as_ref().unwrap().report.section(*section), "answer");
            assert_eq!(replies(&result), vec![section_question(next).as_str()]);
        }
    }

    #[test]
    fn empty_answer_keeps_step() {
        let before = at(Step::AwaitingTasks);
        let result = transition(before.clone(), Trigger::Text(""), today());
        assert_eq!(result.session, before);
        assert!(replies(&result)[0].starts_with(EMPTY_ANSWER));
    }

    #[test]
    fn dates_are_plain_text_after_date_step() {
        let result = transition(at(Step::AwaitingVitrina), Trigger::Text("today"), today());
        assert_eq!(result.step(), Step::AwaitingEducation);
        assert_eq!(result.session.unwrap().report.vitrina, "today");
    }

    #[test]
    fn extra_completes_and_dispatches() {
        let result = transition(at(Step::AwaitingExtra), Trigger::Text("nothing else"), today());
        assert!(result.session.is_none());
        assert_eq!(result.step(), Step::Idle);
        match result.effects.as_slice() {
            [Effect::Dispatch { report }] => {
                assert!(report.is_complete());
                assert_eq!(report.extra, "nothing else");
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }
}
