//! Fixed bot texts and keyboards.

use crate::channels::Keyboard;
use crate::report::Section;
use crate::report::render::section_heading;

/// Main keyboard button that starts a new report.
pub const SEND_REPORT_BUTTON: &str = "Send report";
/// Main keyboard button that discards the current report and starts over.
pub const RESTART_BUTTON: &str = "Restart";
/// Date keyboard button that picks today's date.
pub const TODAY_BUTTON: &str = "Today";
/// Date keyboard button that asks for a typed date.
pub const ENTER_DATE_BUTTON: &str = "Enter date manually";

/// Prefix that selects manual date entry, matched case-insensitively.
pub const ENTER_DATE_PREFIX: &str = "enter date";

pub const GREETING: &str = "Hi! I'm the daily report bot for studio managers.\n\n\
     Use the buttons below:\n\
     • «Send report» — fill in the report for your shift\n\
     • «Restart» — start filling it in again";

pub const ASK_DATE: &str = "🗓 Which date is this report for?\n\n\
     Tap «Today» or enter the date manually.";

pub const ASK_MANUAL_DATE: &str = "Type the date as DD.MM.YYYY (for example, 08.12.2025).";

pub const BAD_DATE: &str =
    "Could not understand the date 🙈 Type it as DD.MM.YYYY (for example, 08.12.2025).";

pub const RESTARTING: &str = "Starting the report over 🌀";

pub const EMPTY_ANSWER: &str = "The answer is empty, please write something.";

pub const REPORT_READY: &str = "✅ Report assembled, here it is:";

/// Keyboard with the two report actions.
pub fn main_keyboard() -> Keyboard {
    Keyboard::reply([SEND_REPORT_BUTTON, RESTART_BUTTON])
}

/// One-shot keyboard offered at the date step.
pub fn date_keyboard() -> Keyboard {
    Keyboard::one_time([TODAY_BUTTON, ENTER_DATE_BUTTON])
}

/// Question text for a section: heading plus what to write.
pub fn section_question(section: Section) -> String {
    format!("{}\n{}", section_heading(section), section.hint())
}
