//! Rule engine
//!
//! Applies a priority-sorted rule table to a string, one rule at a time.
//! Later rules see the output of earlier ones.

use crate::profile::Profile;
use crate::rule::{Rule, RuleLoadError};
use crate::rules;
use log::trace;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-rule timing statistics
#[derive(Debug, Clone, Default)]
pub struct RuleTiming {
    /// Rule name
    pub rule_name: String,
    /// Total time spent on this rule
    pub total_time: Duration,
    /// Number of times the rule was applied
    pub evaluation_count: usize,
    /// Number of replacements made
    pub match_count: usize,
}

impl RuleTiming {
    pub fn new(rule_name: &str) -> Self {
        Self {
            rule_name: rule_name.to_string(),
            ..Default::default()
        }
    }

    /// Average time per evaluation
    pub fn avg_time(&self) -> Duration {
        if self.evaluation_count > 0 {
            self.total_time / self.evaluation_count as u32
        } else {
            Duration::ZERO
        }
    }
}

/// Timing statistics for a rule table
#[derive(Debug, Clone, Default)]
pub struct RuleStats {
    pub timings: HashMap<String, RuleTiming>,
}

impl RuleStats {
    pub fn record(&mut self, rule_name: &str, elapsed: Duration, matches: usize) {
        let entry = self
            .timings
            .entry(rule_name.to_string())
            .or_insert_with(|| RuleTiming::new(rule_name));
        entry.total_time += elapsed;
        entry.evaluation_count += 1;
        entry.match_count += matches;
    }

    /// Merge another set of statistics into this one
    pub fn merge(&mut self, other: &RuleStats) {
        for timing in other.timings.values() {
            let entry = self
                .timings
                .entry(timing.rule_name.clone())
                .or_insert_with(|| RuleTiming::new(&timing.rule_name));
            entry.total_time += timing.total_time;
            entry.evaluation_count += timing.evaluation_count;
            entry.match_count += timing.match_count;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }

    /// Timings, slowest first
    pub fn sorted_timings(&self) -> Vec<&RuleTiming> {
        let mut timings: Vec<_> = self.timings.values().collect();
        timings.sort_by(|a, b| {
            b.total_time
                .cmp(&a.total_time)
                .then_with(|| a.rule_name.cmp(&b.rule_name))
        });
        timings
    }

    pub fn format_timings(&self) -> String {
        let timings = self.sorted_timings();
        if timings.is_empty() {
            return "No timing data available".to_string();
        }

        let mut output = String::new();
        output.push_str("Rule Timing Statistics:\n");
        output.push_str(&format!(
            "{:<40} {:>12} {:>12} {:>10} {:>12}\n",
            "Rule", "Total", "Avg", "Evals", "Matches"
        ));
        output.push_str(&"-".repeat(90));
        output.push('\n');

        for timing in timings {
            let total_ms = timing.total_time.as_secs_f64() * 1000.0;
            let avg_us = timing.avg_time().as_secs_f64() * 1_000_000.0;
            output.push_str(&format!(
                "{:<40} {:>10.2}ms {:>10.2}µs {:>10} {:>12}\n",
                timing.rule_name, total_ms, avg_us, timing.evaluation_count, timing.match_count
            ));
        }

        output
    }
}

/// Executes one rule table
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Create an engine, ordering rules by ascending priority.
    ///
    /// The sort is stable, so rules with equal priority keep their
    /// declaration order.
    pub fn new(mut rules: Vec<Rule>) -> Self {
        rules.sort_by(|a, b| a.priority.total_cmp(&b.priority));
        Self { rules }
    }

    /// Engine over the built-in table for a profile
    pub fn for_profile(profile: Profile) -> Result<Self, RuleLoadError> {
        Ok(Self::new(rules::table_for(profile)?))
    }

    /// Rules in application order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn find(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Add rules, keeping the table sorted
    pub fn with_rules(mut self, extra: Vec<Rule>) -> Self {
        self.rules.extend(extra);
        Self::new(self.rules)
    }

    /// Drop rules by name
    pub fn without(mut self, names: &[String]) -> Self {
        self.rules.retain(|r| !names.iter().any(|n| n == &r.name));
        self
    }

    /// Rewrite `text` with every rule in order
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            let (out, count) = rule.apply(&current);
            if count > 0 {
                trace!("rule {} made {} replacement(s)", rule.name, count);
                current = out.into_owned();
            }
        }
        current
    }

    /// Like [`apply`](Self::apply), recording per-rule timings
    pub fn apply_timed(&self, text: &str, stats: &mut RuleStats) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            let start = Instant::now();
            let (out, count) = rule.apply(&current);
            let next = (count > 0).then(|| out.into_owned());
            stats.record(&rule.name, start.elapsed(), count);
            if let Some(next) = next {
                current = next;
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, priority: f64, pattern: &str, replacement: &str) -> Rule {
        Rule::template(name, priority, pattern, replacement).unwrap()
    }

    #[test]
    fn test_priority_order() {
        let engine = RuleEngine::new(vec![
            rule("second", 2.0, "b", "c"),
            rule("first", 1.0, "a", "b"),
        ]);
        assert_eq!(engine.rules()[0].name, "first");
        // a -> b -> c
        assert_eq!(engine.apply("a"), "c");
    }

    #[test]
    fn test_stable_ties() {
        let engine = RuleEngine::new(vec![
            rule("x_to_y", 1.0, "x", "y"),
            rule("y_to_z", 1.0, "y", "z"),
        ]);
        assert_eq!(engine.apply("x"), "z");

        let engine = RuleEngine::new(vec![
            rule("y_to_z", 1.0, "y", "z"),
            rule("x_to_y", 1.0, "x", "y"),
        ]);
        assert_eq!(engine.apply("x"), "y");
    }

    #[test]
    fn test_negative_priorities_first() {
        let engine = RuleEngine::new(vec![
            rule("late", 100.0, r"\n", "¶"),
            rule("early", -2.0, r"(?m)^ +", ""),
        ]);
        assert_eq!(engine.rules()[0].name, "early");
        assert_eq!(engine.apply("  a\n  b"), "a¶b");
    }

    #[test]
    fn test_without_and_with_rules() {
        let engine = RuleEngine::for_profile(Profile::Primary)
            .unwrap()
            .without(&["ellipsis".to_string()]);
        assert!(engine.find("ellipsis").is_none());
        assert_eq!(engine.apply("Hm..."), "Hm...");

        let engine = engine.with_rules(vec![rule("arrow", 21.0, "->", "→")]);
        assert!(engine.find("arrow").is_some());
        assert_eq!(engine.rules().last().unwrap().name, "line_breaks_to_paragraph");
    }

    #[test]
    fn test_apply_timed_matches_apply() {
        let engine = RuleEngine::for_profile(Profile::Primary).unwrap();
        let mut stats = RuleStats::default();
        let text = "Он сказал: \"Привет...\"";
        assert_eq!(engine.apply_timed(text, &mut stats), engine.apply(text));
        assert_eq!(stats.timings.len(), engine.rules().len());
        assert_eq!(stats.timings["main_quotes"].match_count, 1);
        assert_eq!(stats.timings["ellipsis"].evaluation_count, 1);
    }

    #[test]
    fn test_stats_merge_and_format() {
        let mut a = RuleStats::default();
        a.record("ellipsis", Duration::from_micros(10), 1);
        let mut b = RuleStats::default();
        b.record("ellipsis", Duration::from_micros(30), 2);
        a.merge(&b);

        let timing = &a.timings["ellipsis"];
        assert_eq!(timing.evaluation_count, 2);
        assert_eq!(timing.match_count, 3);
        assert_eq!(timing.avg_time(), Duration::from_micros(20));
        assert!(a.format_timings().contains("ellipsis"));
        assert_eq!(
            RuleStats::default().format_timings(),
            "No timing data available"
        );
    }
}
