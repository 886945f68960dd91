//! Report assembly — turns a finished report into the text sent to chats.
//!
//! Output uses Telegram's HTML parse mode: headings are wrapped in `<b>`
//! and every user-supplied value is escaped.

use super::model::{Report, Section};

/// Title line of every report.
pub const REPORT_TITLE: &str = "📅 <b>Daily manager report</b>";

/// Heading line for a section, e.g. `1️⃣ <b>Vitrina</b>`.
pub fn section_heading(section: Section) -> String {
    format!("{} <b>{}</b>", section.number(), section.heading())
}

/// Render the full report document.
pub fn render_report(report: &Report) -> String {
    let mut parts = Vec::with_capacity(Section::ALL.len() + 1);
    parts.push(format!(
        "{REPORT_TITLE}\nDate: <b>{}</b>",
        escape_html(&report.date)
    ));

    for section in Section::ALL {
        parts.push(format!(
            "{}\n{}",
            section_heading(section),
            escape_html(report.section(section))
        ));
    }

    parts.join("\n\n")
}

/// Escape the characters Telegram's HTML parser treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_report() -> Report {
        Report {
            date: "08.12.2025".into(),
            vitrina: "vitrina notes".into(),
            education: "2 calls done".into(),
            tasks: "all tasks done".into(),
            coaching: "updated 3 profiles".into(),
            complaints: "no complaints".into(),
            extra: "nothing else".into(),
        }
    }

    #[test]
    fn renders_exact_layout() {
        let text = render_report(&filled_report());
        let expected = "📅 <b>Daily manager report</b>\n\
                        Date: <b>08.12.2025</b>\n\n\
                        1️⃣ <b>Vitrina</b>\nvitrina notes\n\n\
                        2️⃣ <b>Education</b>\n2 calls done\n\n\
                        3️⃣ <b>Task tracker</b>\nall tasks done\n\n\
                        4️⃣ <b>Coaching table</b>\nupdated 3 profiles\n\n\
                        5️⃣ <b>Model complaints</b>\nno complaints\n\n\
                        6️⃣ <b>Extra</b>\nnothing else";
        assert_eq!(text, expected);
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let text = render_report(&filled_report());
        let positions: Vec<usize> = Section::ALL
            .iter()
            .map(|s| text.find(&section_heading(*s)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut report = filled_report();
        report.extra = "<b>ID 5</b> & co".into();
        let text = render_report(&report);
        assert!(text.ends_with("&lt;b&gt;ID 5&lt;/b&gt; &amp; co"));
    }

    #[test]
    fn multiline_answers_are_kept() {
        let mut report = filled_report();
        report.tasks = "first\nsecond".into();
        assert!(render_report(&report).contains("3️⃣ <b>Task tracker</b>\nfirst\nsecond\n\n"));
    }
}
