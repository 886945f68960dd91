//! Report data model.

/// One of the six free-text blocks of a daily report, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Vitrina,
    Education,
    Tasks,
    Coaching,
    Complaints,
    Extra,
}

impl Section {
    /// All sections in the order they are asked and rendered.
    pub const ALL: [Section; 6] = [
        Section::Vitrina,
        Section::Education,
        Section::Tasks,
        Section::Coaching,
        Section::Complaints,
        Section::Extra,
    ];

    /// Keycap emoji shown before the heading.
    pub fn number(&self) -> &'static str {
        match self {
            Self::Vitrina => "1️⃣",
            Self::Education => "2️⃣",
            Self::Tasks => "3️⃣",
            Self::Coaching => "4️⃣",
            Self::Complaints => "5️⃣",
            Self::Extra => "6️⃣",
        }
    }

    /// Human-readable heading.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Vitrina => "Vitrina",
            Self::Education => "Education",
            Self::Tasks => "Task tracker",
            Self::Coaching => "Coaching table",
            Self::Complaints => "Model complaints",
            Self::Extra => "Extra",
        }
    }

    /// What the manager is expected to write in this section.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Vitrina => {
                "Who you worked with on the vitrina: ID, what you wrote, praise, recommendations."
            }
            Self::Education => {
                "How many trainings, format (call/video), ID and outcome \
                 (promising / average / low motivation)."
            }
            Self::Tasks => "Task status (processed / partially / not done) and important notes.",
            Self::Coaching => {
                "Who had updates: ID, goal (lesson, homework, push, call, schedule) and outcome."
            }
            Self::Complaints => {
                "If there were any: ID, what the complaint was about, what was done."
            }
            Self::Extra => {
                "Anything important from the day: problems, suggestions, models to keep an eye on."
            }
        }
    }
}

/// A manager's daily report. Fields stay empty until their step is answered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Report date as `DD.MM.YYYY`.
    pub date: String,
    pub vitrina: String,
    pub education: String,
    pub tasks: String,
    pub coaching: String,
    pub complaints: String,
    pub extra: String,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text stored for a section.
    pub fn section(&self, section: Section) -> &str {
        match section {
            Section::Vitrina => &self.vitrina,
            Section::Education => &self.education,
            Section::Tasks => &self.tasks,
            Section::Coaching => &self.coaching,
            Section::Complaints => &self.complaints,
            Section::Extra => &self.extra,
        }
    }

    /// Store the answer for a section.
    pub fn set_section(&mut self, section: Section, value: impl Into<String>) {
        let slot = match section {
            Section::Vitrina => &mut self.vitrina,
            Section::Education => &mut self.education,
            Section::Tasks => &mut self.tasks,
            Section::Coaching => &mut self.coaching,
            Section::Complaints => &mut self.complaints,
            Section::Extra => &mut self.extra,
        };
        *slot = value.into();
    }

    /// Whether nothing has been answered yet.
    pub fn is_empty(&self) -> bool {
        self.date.is_empty() && Section::ALL.iter().all(|s| self.section(*s).is_empty())
    }

    /// Whether all seven fields are filled in.
    pub fn is_complete(&self) -> bool {
        !self.date.is_empty() && Section::ALL.iter().all(|s| !self.section(*s).is_empty())
    }
}
