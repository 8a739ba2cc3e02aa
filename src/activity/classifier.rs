//! Maps a free-text model answer onto an [`ActivityCategory`].
//!
//! Well-behaved answers lead with the category number the prompt asks for and are decided
//! from that alone. Everything else goes through an ordered keyword rule list where the
//! first matching rule wins.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ActivityCategory, Classification, OtherDetail};

// ASCII digits only; other scripts' numerals go through the keyword rules.
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]+)").expect("leading number pattern is valid"));

const DESCRIPTION_EXCERPT_CHARS: usize = 50;
const UNMATCHED_EXCERPT_CHARS: usize = 100;

const PHONE_NOUNS: &[&str] = &["phone", "mobile", "smartphone"];
const PHONE_HANDLING: &[&str] = &["holding", "hand", "using", "looking at"];
const PHONE_PHRASES: &[&str] = &["texting", "calling", "phone in hand", "holding phone"];
const PHONE_AT_REST: &[&str] = &[
    "phone on",
    "phone is on",
    "phone sits",
    "phone lying",
    "phone placed",
];
const PHONE_SURFACES: &[&str] = &["desk", "table"];

const WORK: &[&str] = &[
    "work", "computer", "laptop", "typing", "desk", "keyboard", "monitor", "office", "working",
    "pc", "macbook",
];
const SLEEP: &[&str] = &["sleep", "resting", "lying", "bed", "nap", "eyes closed"];
const EAT: &[&str] = &["eat", "food", "meal", "bite", "chew", "fork", "spoon"];
const DRINK: &[&str] = &[
    "drink", "beverage", "cup", "water", "coffee", "tea", "bottle", "glass", "sip",
];
const PERSON_DESCRIPTION: &[&str] = &[
    "sitt", "stand", "look", "face", "facing", "person", "watch",
];

/// Lower-cased view of an answer plus the phone/work signals every rule consults.
struct Answer<'a> {
    text: &'a str,
    lower: String,
    has_phone: bool,
    has_work: bool,
}

impl<'a> Answer<'a> {
    fn new(text: &'a str) -> Self {
        let mut answer = Self {
            text,
            lower: text.to_lowercase(),
            has_phone: false,
            has_work: false,
        };
        answer.has_phone = answer.phone_in_use() && !answer.phone_at_rest();
        answer.has_work =
            answer.any(WORK) || (answer.has("screen") && answer.has("computer"));
        answer
    }

    fn has(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    fn any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.has(n))
    }

    fn phone_in_use(&self) -> bool {
        (self.any(PHONE_HANDLING) && self.any(PHONE_NOUNS)) || self.any(PHONE_PHRASES)
    }

    /// A phone lying on a surface overrides any handling signal.
    fn phone_at_rest(&self) -> bool {
        self.any(PHONE_AT_REST)
            || (self.has("phone") && self.has("not") && self.any(PHONE_SURFACES))
    }

    fn excerpt(&self, chars: usize) -> String {
        self.text.chars().take(chars).collect()
    }
}

enum Outcome {
    Category(ActivityCategory),
    Description,
    Unmatched,
}

struct Rule {
    matches: fn(&Answer) -> bool,
    outcome: Outcome,
}

// Order is load-bearing: the combined phone+work rule must precede the single-signal rules,
// and specific activities must precede the generic person description.
const RULES: &[Rule] = &[
    Rule {
        matches: phone_and_work,
        outcome: Outcome::Category(ActivityCategory::PhoneWhileWorking),
    },
    Rule {
        matches: phone_only,
        outcome: Outcome::Category(ActivityCategory::UsingPhone),
    },
    Rule {
        matches: work_only,
        outcome: Outcome::Category(ActivityCategory::Working),
    },
    Rule {
        matches: sleeping,
        outcome: Outcome::Category(ActivityCategory::Sleeping),
    },
    Rule {
        matches: eating,
        outcome: Outcome::Category(ActivityCategory::Eating),
    },
    Rule {
        matches: drinking,
        outcome: Outcome::Category(ActivityCategory::Drinking),
    },
    Rule {
        matches: handheld_screen,
        outcome: Outcome::Category(ActivityCategory::UsingPhone),
    },
    Rule {
        matches: person_described,
        outcome: Outcome::Description,
    },
    Rule {
        matches: always,
        outcome: Outcome::Unmatched,
    },
];

fn phone_and_work(a: &Answer) -> bool {
    a.has_phone && a.has_work
}

fn phone_only(a: &Answer) -> bool {
    a.has_phone
}

fn work_only(a: &Answer) -> bool {
    a.has_work
}

fn sleeping(a: &Answer) -> bool {
    a.any(SLEEP)
}

fn eating(a: &Answer) -> bool {
    a.any(EAT)
}

fn drinking(a: &Answer) -> bool {
    a.any(DRINK)
}

fn handheld_screen(a: &Answer) -> bool {
    (a.has("hand") && a.has("screen")) || (a.has("looking down") && a.has("hand"))
}

fn person_described(a: &Answer) -> bool {
    a.any(PERSON_DESCRIPTION)
}

fn always(_: &Answer) -> bool {
    true
}

/// Classify a collected model answer. `None` or blank text means the model said nothing.
pub fn classify(text: Option<&str>) -> Classification {
    let text = match text.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return Classification::other(OtherDetail::NoResponse),
    };

    if let Some(category) = leading_category(text) {
        return Classification::of(category);
    }

    let answer = Answer::new(text);
    let rule = RULES
        .iter()
        .find(|rule| (rule.matches)(&answer))
        .unwrap_or(&RULES[RULES.len() - 1]);

    match rule.outcome {
        Outcome::Category(category) => Classification::of(category),
        Outcome::Description => Classification::other(OtherDetail::Description(
            answer.excerpt(DESCRIPTION_EXCERPT_CHARS),
        )),
        Outcome::Unmatched => Classification::other(OtherDetail::Unmatched(
            answer.excerpt(UNMATCHED_EXCERPT_CHARS),
        )),
    }
}

fn leading_category(text: &str) -> Option<ActivityCategory> {
    let digits = LEADING_NUMBER.captures(text)?.get(1)?.as_str();
    digits.parse().ok().and_then(ActivityCategory::from_code)
}
