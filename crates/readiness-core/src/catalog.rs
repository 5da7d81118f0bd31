//! Fixed question catalog
//!
//! One [`QuestionSet`] per stage variant. The sets are compiled in; nothing
//! here is configurable at runtime. Every choice question carries an explicit
//! sentinel placeholder that is never an accepted answer.

use crate::stage::Stage;
use serde::Serialize;

/// Catalog version stamped into persisted rows
pub const CATALOG_VERSION: &str = "2025.1";

/// Answer value that routes stage 1 to the future-entrepreneur branch
pub const BELOW_18: &str = "Below 18";

/// Stage 1 key holding the age group
pub const AGE_GROUP_KEY: &str = "Age Group";

/// Stage 1.5 key holding the ownership answer
pub const OWNERSHIP_KEY: &str = "Running Business";

/// Affirmative ownership answer
pub const YES: &str = "Yes";

/// Negative ownership answer
pub const NO: &str = "No";

const SELECT_OPTION: &str = "Select an option";

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Input {
    /// Single choice from a fixed list
    Choice {
        /// Placeholder shown before a choice is made
        sentinel: &'static str,
        /// Accepted answers, in display order
        options: &'static [&'static str],
    },
    /// Free text; blank counts as unanswered
    Text,
}

/// A single question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Record key, unique across the catalog
    pub key: &'static str,
    /// Prompt shown to the respondent
    pub prompt: &'static str,
    /// Short label used in the report
    pub label: &'static str,
    /// Answer kind
    pub input: Input,
}

impl Question {
    const fn choice(
        key: &'static str,
        prompt: &'static str,
        label: &'static str,
        sentinel: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            prompt,
            label,
            input: Input::Choice { sentinel, options },
        }
    }

    /// The placeholder value meaning "not yet answered"
    #[inline]
    #[must_use]
    pub fn sentinel(&self) -> &'static str {
        match self.input {
            Input::Choice { sentinel, .. } => sentinel,
            Input::Text => "",
        }
    }

    /// Whether `value` is the unanswered placeholder
    #[must_use]
    pub fn is_sentinel(&self, value: &str) -> bool {
        match self.input {
            Input::Choice { sentinel, .. } => value == sentinel,
            Input::Text => value.trim().is_empty(),
        }
    }

    /// Whether `value` is an acceptable final answer
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self.input {
            Input::Choice { options, .. } => options.contains(&value),
            Input::Text => !value.trim().is_empty(),
        }
    }

    /// Accepted options, empty for free text
    #[inline]
    #[must_use]
    pub fn options(&self) -> &'static [&'static str] {
        match self.input {
            Input::Choice { options, .. } => options,
            Input::Text => &[],
        }
    }
}

/// The questions shown on one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionSet {
    /// Stage this set belongs to
    pub stage: Stage,
    /// Screen heading
    pub title: &'static str,
    /// Introductory line, may be empty
    pub intro: &'static str,
    /// Questions in display order
    pub questions: &'static [Question],
    /// Whether answers are merged into the record (the ownership gate only routes)
    pub records_answers: bool,
}

impl QuestionSet {
    /// Look up a question by key
    #[must_use]
    pub fn question(&self, key: &str) -> Option<&'static Question> {
        self.questions.iter().find(|q| q.key == key)
    }

    /// Keys in display order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.questions.iter().map(|q| q.key)
    }

    /// Number of questions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the set has no questions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Question set for `stage`, `None` for the terminal stage
#[must_use]
pub fn question_set(stage: Stage) -> Option<&'static QuestionSet> {
    match stage {
        Stage::Basics => Some(&BASICS),
        Stage::OwnershipGate => Some(&OWNERSHIP_GATE),
        Stage::FutureAssessment => Some(&FUTURE),
        Stage::StarterAssessment => Some(&STARTER),
        Stage::OwnerProfile => Some(&OWNER_PROFILE),
        Stage::OwnerCompliance => Some(&OWNER_COMPLIANCE),
        Stage::Complete => None,
    }
}

/// All question sets in stage order
#[must_use]
pub fn all_sets() -> [&'static QuestionSet; 6] {
    [
        &BASICS,
        &OWNERSHIP_GATE,
        &FUTURE,
        &STARTER,
        &OWNER_PROFILE,
        &OWNER_COMPLIANCE,
    ]
}

/// Stage that owns `key`
#[must_use]
pub fn stage_of(key: &str) -> Option<Stage> {
    all_sets()
        .into_iter()
        .find(|set| set.question(key).is_some())
        .map(|set| set.stage)
}

const YES_NO: &[&str] = &[YES, NO];

static BASICS: QuestionSet = QuestionSet {
    stage: Stage::Basics,
    title: "Stage 1 — Basic Details",
    intro: "",
    records_answers: true,
    questions: &[
        Question {
            key: "Registration Code",
            prompt: "Registration Code",
            label: "Registration Code",
            input: Input::Text,
        },
        Question::choice(
            AGE_GROUP_KEY,
            "Age group",
            "Age Group",
            "Select age group",
            &[BELOW_18, "20–30", "31–40", "41–50", "51–60", "Above 60"],
        ),
        Question::choice(
            "Gender",
            "Gender",
            "Gender",
            "Select gender",
            &["Male", "Female", "Other"],
        ),
        Question::choice(
            "KK Number",
            "KK Number",
            "KK Number",
            "Select KK number",
            &["1", "2", "3", "4", "5", "6"],
        ),
    ],
};

static OWNERSHIP_GATE: QuestionSet = QuestionSet {
    stage: Stage::OwnershipGate,
    title: "Quick question — Business ownership",
    intro: "",
    records_answers: false,
    questions: &[Question::choice(
        OWNERSHIP_KEY,
        "Are you currently running a business?",
        "Running a business",
        "Select",
        YES_NO,
    )],
};

static FUTURE: QuestionSet = QuestionSet {
    stage: Stage::FutureAssessment,
    title: "Future Entrepreneur — Assessment",
    intro: "This short form is for young future entrepreneurs (below 18).",
    records_answers: true,
    questions: &[
        Question::choice(
            "fe1",
            "1. Which subjects do you enjoy the most?",
            "Q1",
            SELECT_OPTION,
            &["Math/Science", "Commerce/Economics", "Arts/Humanities", "Computer/Technology", "Other"],
        ),
        Question::choice(
            "fe2",
            "2. What activities make you feel confident?",
            "Q2",
            SELECT_OPTION,
            &["Public speaking", "Coding/Building things", "Arts & Crafts", "Sports", "Other"],
        ),
        Question::choice(
            "fe3",
            "3. Do you enjoy solving problems or creating new ideas?",
            "Q3",
            SELECT_OPTION,
            &["Yes, very much", "Sometimes", "Not really"],
        ),
        Question::choice(
            "fe4",
            "4. Do you take initiative in school or at home?",
            "Q4",
            SELECT_OPTION,
            &["Often", "Sometimes", "Rarely"],
        ),
        Question::choice(
            "fe5",
            "5. Does your family support your interest in business?",
            "Q5",
            SELECT_OPTION,
            &["Strongly support", "Somewhat support", "Not supportive"],
        ),
        Question::choice(
            "fe6",
            "6. Do you have role models or entrepreneurs you look up to?",
            "Q6",
            SELECT_OPTION,
            YES_NO,
        ),
        Question::choice(
            "fe7",
            "7. Would you like to become an entrepreneur someday?",
            "Q7",
            SELECT_OPTION,
            &[YES, "Maybe", NO],
        ),
        Question::choice(
            "fe8",
            "8. How comfortable are you making decisions?",
            "Q8",
            SELECT_OPTION,
            &["Very comfortable", "Somewhat comfortable", "Not comfortable"],
        ),
        Question::choice(
            "fe9",
            "9. What type of business attracts you?",
            "Q9",
            SELECT_OPTION,
            &["Technology", "Shop/Store", "Online services", "Food", "Other"],
        ),
        Question::choice(
            "fe10",
            "10. Do you want to study further before starting a business?",
            "Q10",
            SELECT_OPTION,
            &[YES, NO, "Maybe"],
        ),
    ],
};

static STARTER: QuestionSet = QuestionSet {
    stage: Stage::StarterAssessment,
    title: "New Business Starter — Readiness",
    intro: "This short form helps you evaluate readiness to start a business.",
    records_answers: true,
    questions: &[
        Question::choice(
            "s1",
            "1. Do you have a business idea?",
            "Q1",
            SELECT_OPTION,
            &["Yes, clear idea", "Have a few ideas", "No idea yet"],
        ),
        Question::choice(
            "s2",
            "2. What problem will your business solve?",
            "Q2",
            SELECT_OPTION,
            &["Local customer need", "Online convenience", "Skill/service gap", "Other"],
        ),
        Question::choice(
            "s3",
            "3. Do you have savings to invest?",
            "Q3",
            SELECT_OPTION,
            &["Enough savings", "Small savings", "No savings"],
        ),
        Question::choice(
            "s4",
            "4. Will family support financially?",
            "Q4",
            SELECT_OPTION,
            &[YES, "Maybe", NO],
        ),
        Question::choice(
            "s5",
            "5. Do you have skills related to idea?",
            "Q5",
            SELECT_OPTION,
            &[YES, "Somewhat", NO],
        ),
        Question::choice(
            "s6",
            "6. Are you willing to take training?",
            "Q6",
            SELECT_OPTION,
            &[YES, "Maybe", NO],
        ),
        Question::choice(
            "s7",
            "7. Have you researched competitors?",
            "Q7",
            SELECT_OPTION,
            &[YES, "Partially", "Not yet"],
        ),
        Question::choice(
            "s8",
            "8. Do you know your target customer?",
            "Q8",
            SELECT_OPTION,
            &[YES, "Somewhat", NO],
        ),
        Question::choice(
            "s9",
            "9. Are you comfortable taking risks?",
            "Q9",
            SELECT_OPTION,
            &["Very", "Somewhat", "Not really"],
        ),
        Question::choice(
            "s10",
            "10. How disciplined are you?",
            "Q10",
            SELECT_OPTION,
            &["Very disciplined", "Moderately", "Not disciplined"],
        ),
    ],
};

static OWNER_PROFILE: QuestionSet = QuestionSet {
    stage: Stage::OwnerProfile,
    title: "Stage 2 — Personality & Lifestyle",
    intro: "Please answer honestly. Use the dropdowns to select the best option.",
    records_answers: true,
    questions: &[
        // Family
        Question::choice(
            "family1",
            "1. How would you describe your relationship with your family members?",
            "Relationship with family",
            SELECT_OPTION,
            &[
                "Very close and understanding",
                "Supportive but sometimes distant",
                "Occasionally conflicting",
                "Difficult or strained",
            ],
        ),
        Question::choice(
            "family2",
            "2. How much support do you receive from your family in your personal growth?",
            "Family support",
            SELECT_OPTION,
            &[
                "Always supportive",
                "Supportive when needed",
                "Neutral or limited support",
                "Rarely supportive",
            ],
        ),
        Question::choice(
            "family3",
            "3. How often do you spend quality time with your family?",
            "Quality time",
            SELECT_OPTION,
            &["Every day", "Few times a week", "Occasionally", "Rarely"],
        ),
        // Physical
        Question::choice(
            "physical1",
            "1. How active are you physically in your daily routine?",
            "Physical activity",
            SELECT_OPTION,
            &[
                "Very active (daily exercise)",
                "Moderately active",
                "Occasionally active",
                "Mostly inactive",
            ],
        ),
        Question::choice(
            "physical2",
            "2. Do you maintain a healthy diet and sleeping pattern?",
            "Diet & sleep",
            SELECT_OPTION,
            &["Always maintain", "Most of the time", "Sometimes", "Rarely"],
        ),
        Question::choice(
            "physical3",
            "3. Do you feel your physical health affects your confidence and overall personality?",
            "Health effect on confidence",
            SELECT_OPTION,
            &["Yes, strongly", "Somewhat", "Not much", "No impact"],
        ),
        // Mental
        Question::choice(
            "mental1",
            "1. How well do you handle stress or unexpected challenges?",
            "Stress handling",
            SELECT_OPTION,
            &["Very well", "Manageable", "Sometimes struggle", "Find it difficult"],
        ),
        Question::choice(
            "mental2",
            "2. Do you often feel positive and confident about your goals?",
            "Goal confidence",
            SELECT_OPTION,
            &[
                "Always confident and focused",
                "Usually positive with minor doubts",
                "Sometimes uncertain",
                "Often lack clarity or motivation",
            ],
        ),
        Question::choice(
            "mental3",
            "3. How frequently do you take time to relax or clear your mind?",
            "Relaxation frequency",
            SELECT_OPTION,
            &["Daily", "Few times a week", "Occasionally", "Rarely"],
        ),
        // Social
        Question::choice(
            "social1",
            "1. How frequently do you meet or interact with friends or social groups?",
            "Social interaction",
            SELECT_OPTION,
            &["Very frequently", "Occasionally", "Rarely", "Almost never"],
        ),
        Question::choice(
            "social2",
            "2. Are you comfortable expressing your thoughts in social situations?",
            "Comfort expressing thoughts",
            SELECT_OPTION,
            &[
                "Very comfortable",
                "Somewhat comfortable",
                "Uncomfortable",
                "Avoid social interaction",
            ],
        ),
        Question::choice(
            "social3",
            "3. How do you usually contribute to your community or social circles?",
            "Community contribution",
            SELECT_OPTION,
            &[
                "Actively volunteer or participate",
                "Support occasionally",
                "Prefer to stay uninvolved",
            ],
        ),
        // Financial
        Question::choice(
            "financial1",
            "1. Current Status of Income",
            "Income status",
            SELECT_OPTION,
            &[
                "I have a regular and stable source of income",
                "I am self-employed or doing freelance work",
                "I am currently unemployed but actively seeking opportunities",
                "I am a student or dependent on family",
                "Retired or not seeking employment",
            ],
        ),
        Question::choice(
            "financial2",
            "2. Primary Source of Income",
            "Financial support",
            SELECT_OPTION,
            &[
                "Salary or professional income",
                "Business or self-employment",
                "Parental/family support",
                "Savings or pension",
                "No fixed source of income",
            ],
        ),
        Question::choice(
            "financial3",
            "3. Financial Goal",
            "Financial goal",
            SELECT_OPTION,
            &[
                "To find a stable source of income",
                "To grow my business or income level",
                "To save and invest wisely",
                "To clear debts or improve stability",
                "I am financially comfortable",
            ],
        ),
        // Spiritual
        Question::choice(
            "spiritual1",
            "1. How connected do you feel with your inner self or spiritual side?",
            "Spiritual connection",
            SELECT_OPTION,
            &["Strongly connected", "Moderately connected", "Slightly connected", "Not connected"],
        ),
        Question::choice(
            "spiritual2",
            "2. Do you engage in activities like meditation, prayer, or self-reflection?",
            "Meditation/reflection",
            SELECT_OPTION,
            &["Daily", "Few times a week", "Occasionally", "Rarely or never"],
        ),
        Question::choice(
            "spiritual3",
            "3. How important is spiritual growth in your life?",
            "Spiritual importance",
            SELECT_OPTION,
            &["Very important", "Somewhat important", "Not very important", "Not important at all"],
        ),
    ],
};

static OWNER_COMPLIANCE: QuestionSet = QuestionSet {
    stage: Stage::OwnerCompliance,
    title: "Stage 3 — Mandatory Requirements",
    intro: "",
    records_answers: true,
    questions: &[
        Question::choice(
            "Daily Account Review",
            "1. Do you review business accounts daily (zero-zero balance)?",
            "Daily Account Review",
            "Select",
            YES_NO,
        ),
        Question::choice(
            "Minimize Financial Burden",
            "2. Do you maintain minimum loans and debts?",
            "Minimize Financial Burden",
            "Select",
            YES_NO,
        ),
        Question::choice(
            "Complete Technical Knowledge",
            "3. Do you have complete technical knowledge of your business?",
            "Complete Technical Knowledge",
            "Select",
            YES_NO,
        ),
        Question::choice(
            "Complete Equipment Knowledge",
            "4. Do you have complete knowledge of your equipment (if any)?",
            "Complete Equipment Knowledge",
            "Select",
            YES_NO,
        ),
        Question::choice(
            "Fixed Duty Hours",
            "5. Do you follow fixed duty hours?",
            "Fixed Duty Hours",
            "Select",
            YES_NO,
        ),
        Question::choice(
            "Accounting Course",
            "6. Have you completed a share/purchase or accounting course?",
            "Accounting Course",
            "Select",
            YES_NO,
        ),
        Question::choice(
            "Tax & Compliance",
            "7. Do you understand GST, tax, banking, and other government compliance?",
            "Tax & Compliance",
            "Select",
            YES_NO,
        ),
        Question::choice(
            "Worker Insurance",
            "8. Have you insured your workers?",
            "Worker Insurance",
            "Select",
            YES_NO,
        ),
        Question::choice(
            "Firm Insurance",
            "9. Is your firm insured?",
            "Firm Insurance",
            "Select",
            YES_NO,
        ),
        Question::choice(
            "Fire Safety",
            "10. Do you have fire safety arrangements at the firm?",
            "Fire Safety",
            "Select",
            YES_NO,
        ),
        Question::choice(
            "Labour Rules",
            "11. Do you understand basic labour rules?",
            "Labour Rules",
            "Select",
            YES_NO,
        ),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_are_unique_across_catalog() {
        let mut seen = HashSet::new();
        for set in all_sets() {
            for key in set.keys() {
                assert!(seen.insert(key), "duplicate key {key}");
            }
        }
    }

    #[test]
    fn branch_sizes_match_questionnaire() {
        assert_eq!(BASICS.len(), 4);
        assert_eq!(FUTURE.len(), 10);
        assert_eq!(STARTER.len(), 10);
        assert_eq!(OWNER_PROFILE.len(), 18);
        assert_eq!(OWNER_COMPLIANCE.len(), 11);
    }

    #[test]
    fn sentinel_is_never_an_option() {
        for set in all_sets() {
            for q in set.questions {
                assert!(!q.accepts(q.sentinel()), "{} accepts its sentinel", q.key);
            }
        }
    }

    #[test]
    fn text_question_treats_blank_as_sentinel() {
        let reg = BASICS.question("Registration Code").unwrap();
        assert!(reg.is_sentinel("   "));
        assert!(reg.accepts("REG-001"));
        assert!(reg.options().is_empty());
    }

    #[test]
    fn stage_of_finds_owning_stage() {
        assert_eq!(stage_of("fe3"), Some(Stage::FutureAssessment));
        assert_eq!(stage_of("Labour Rules"), Some(Stage::OwnerCompliance));
        assert_eq!(stage_of(OWNERSHIP_KEY), Some(Stage::OwnershipGate));
        assert_eq!(stage_of("nope"), None);
        assert!(question_set(Stage::Complete).is_none());
    }

    #[test]
    fn catalog_serializes_for_export() {
        let json = serde_json::to_value(question_set(Stage::OwnershipGate).unwrap()).unwrap();
        assert_eq!(json["stage"], "1.5");
        assert_eq!(json["questions"][0]["input"]["kind"], "choice");
        assert_eq!(json["questions"][0]["input"]["sentinel"], "Select");
    }
}
