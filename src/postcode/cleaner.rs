use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// How a substitution finds the text it replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Exact, case-sensitive substring
    Literal(&'static str),
    /// Regular expression
    Pattern(&'static str),
}

/// One correction for a common misread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    pub matcher: Matcher,
    pub replacement: &'static str,
}

/// Corrections applied in order, each one to the output of the previous.
/// Every non-overlapping occurrence is replaced, scanning left to right.
pub static SUBSTITUTIONS: &[Substitution] = &[
    // "Name" read with the capital dropped and m as n
    Substitution {
        matcher: Matcher::Literal("ane"),
        replacement: "Name",
    },
    // "Postcode" with the c read as e
    Substitution {
        matcher: Matcher::Pattern("[Pp]osteode"),
        replacement: "Postcode",
    },
];

struct CompiledSubstitution {
    rule: &'static Substitution,
    regex: Option<Regex>,
}

static COMPILED: LazyLock<Vec<CompiledSubstitution>> = LazyLock::new(|| {
    SUBSTITUTIONS
        .iter()
        .map(|rule| CompiledSubstitution {
            rule,
            regex: match rule.matcher {
                Matcher::Literal(_) => None,
                Matcher::Pattern(p) => {
                    Some(Regex::new(p).expect("substitution patterns are valid"))
                }
            },
        })
        .collect()
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

impl CompiledSubstitution {
    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match (&self.regex, self.rule.matcher) {
            (Some(regex), _) => regex.replace_all(text, regex::NoExpand(self.rule.replacement)),
            (None, Matcher::Literal(needle)) if text.contains(needle) => {
                Cow::Owned(text.replace(needle, self.rule.replacement))
            }
            _ => Cow::Borrowed(text),
        }
    }
}

/// Normalize raw recognizer output: substitutions, then whitespace runs
/// collapsed to a single space, then trimmed.
pub fn clean(raw: &str) -> String {
    let mut text = raw.to_owned();
    for substitution in COMPILED.iter() {
        text = substitution.apply(&text).into_owned();
    }

    WHITESPACE.replace_all(&text, " ").trim().to_string()
}
