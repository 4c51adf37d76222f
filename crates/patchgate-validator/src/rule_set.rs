//! Compiled rule tables and the generic scanning loop.

use regex::Regex;

use crate::error::RuleError;
use crate::issue::Issue;
use crate::rules::SafetyRule;

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: SafetyRule,
    regex: Regex,
}

/// An ordered table of rules with their patterns compiled.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compiles every rule in `rules`, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] for the first rule whose
    /// pattern is not a valid regular expression.
    pub fn compile(rules: &[SafetyRule]) -> Result<Self, RuleError> {
        let compiled = rules
            .iter()
            .map(|rule| {
                Regex::new(rule.pattern())
                    .map(|regex| CompiledRule {
                        rule: rule.clone(),
                        regex,
                    })
                    .map_err(|source| RuleError::invalid_pattern(rule.name(), source))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules: compiled })
    }

    /// Returns the number of rules.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when the table holds no rules.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over the source rules in table order.
    #[must_use]
    pub fn rules(&self) -> impl Iterator<Item = &SafetyRule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    /// Reports one finding per rule that matches `text`.
    ///
    /// Each finding carries the rule's severity and category, the line of the
    /// first match, and the matched text.
    #[must_use]
    pub fn scan(&self, text: &str) -> Vec<Issue> {
        self.rules
            .iter()
            .filter_map(|compiled| {
                compiled.regex.find(text).map(|found| {
                    let rule = &compiled.rule;
                    Issue::new(rule.severity(), rule.category(), rule.description())
                        .with_pattern(rule.pattern())
                        .with_line(line_of(text, found.start()))
                        .with_matched(found.as_str().trim_end())
                })
            })
            .collect()
    }

    /// Splits the rules into those matching `text` and those that do not.
    #[must_use]
    pub fn partition<'a>(&'a self, text: &str) -> (Vec<&'a SafetyRule>, Vec<&'a SafetyRule>) {
        let (present, missing): (Vec<_>, Vec<_>) = self
            .rules
            .iter()
            .partition(|compiled| compiled.regex.is_match(text));
        (
            present.into_iter().map(|compiled| &compiled.rule).collect(),
            missing.into_iter().map(|compiled| &compiled.rule).collect(),
        )
    }
}

/// Returns the 1-based line containing byte `offset`.
pub(crate) fn line_of(text: &str, offset: usize) -> usize {
    text.bytes()
        .take(offset)
        .filter(|byte| *byte == b'\n')
        .count()
        + 1
}
