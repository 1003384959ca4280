//! Maps what a user typed ("Kansas", "american red") onto the code a
//! dropdown actually submits.

use crate::parsers::SelectOption;
use regex::Regex;

/// Returns the value of the option best matching `target`, or an empty
/// string when nothing matches.
///
/// Tiers, first hit in document order wins within each:
/// 1. label equals target ignoring case, or value equals target exactly
/// 2. target appears in the label as whole words, ignoring case
pub fn resolve_option(options: &[SelectOption], target: &str) -> String {
    let target = target.trim();
    if target.is_empty() {
        return String::new();
    }

    if let Some(option) = find_exact(options, target) {
        ::log::debug!("Exact option match for {:?}: {:?}", target, option.value);
        return option.value.clone();
    }

    if let Some(option) = find_word_match(options, target) {
        ::log::debug!("Word match for {:?}: {:?} ({:?})", target, option.text, option.value);
        return option.value.clone();
    }

    ::log::debug!("No option matches {:?}", target);
    String::new()
}

fn find_exact<'a>(options: &'a [SelectOption], target: &str) -> Option<&'a SelectOption> {
    let lowered = target.to_lowercase();
    options
        .iter()
        .find(|o| o.text.to_lowercase() == lowered || o.value == target)
}

fn find_word_match<'a>(options: &'a [SelectOption], target: &str) -> Option<&'a SelectOption> {
    let pattern = format!(r"\b{}\b", regex::escape(&target.to_lowercase()));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            ::log::warn!("Cannot build word pattern for {:?}: {}", target, e);
            return None;
        }
    };
    options.iter().find(|o| re.is_match(&o.text.to_lowercase()))
}
