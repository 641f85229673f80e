//! Rule compilation.
//!
//! A rule is literal text interspersed with placeholder tokens:
//!
//! | token                                  | captures                 |
//! |----------------------------------------|--------------------------|
//! | `<any>`, `<str>`, `<string>`, `<#>`    | one or more `[0-9A-Za-z_]` |
//! | `<int>`, `<integer>`, `<@>`            | one or more `[0-9]`      |
//!
//! Everything else, including unknown `<...>` tokens, is matched literally and
//! the whole path must match, not a prefix of it.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{RouterError, RouterResult};
use crate::handler::Params;

const WORD_CAPTURE: &str = "([0-9A-Za-z_]+)";
const DIGIT_CAPTURE: &str = "([0-9]+)";

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"<(any|str|string|#|int|integer|@)>").expect("placeholder regex");
}

#[derive(Debug, Clone)]
pub struct CompiledPattern {
    rule: String,
    regex: Option<Regex>,
    placeholders: usize,
}

impl CompiledPattern {
    pub fn compile(rule: &str) -> RouterResult<Self> {
        let (source, placeholders) = translate(rule);
        let regex = Regex::new(&source).map_err(|err| RouterError::InvalidRule {
            rule: rule.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            rule: rule.to_string(),
            regex: Some(regex),
            placeholders,
        })
    }

    /// A pattern for `rule` that matches nothing.
    pub(crate) fn never(rule: &str) -> Self {
        Self {
            rule: rule.to_string(),
            regex: None,
            placeholders: 0,
        }
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders
    }

    /// The generated regular expression, if the rule compiled.
    pub fn as_str(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(path))
    }

    pub fn captures(&self, path: &str) -> Option<Params> {
        let captures = self.regex.as_ref()?.captures(path)?;
        let values = captures
            .iter()
            .skip(1)
            .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect::<Vec<_>>();
        Some(Params::new(values))
    }
}

fn translate(rule: &str) -> (String, usize) {
    let mut source = String::with_capacity(rule.len() + 8);
    let mut placeholders = 0;
    let mut last = 0;
    source.push('^');
    for token in PLACEHOLDER.captures_iter(rule) {
        let (Some(whole), Some(kind)) = (token.get(0), token.get(1)) else {
            continue;
        };
        source.push_str(&regex::escape(&rule[last..whole.start()]));
        source.push_str(match kind.as_str() {
            "int" | "integer" | "@" => DIGIT_CAPTURE,
            _ => WORD_CAPTURE,
        });
        placeholders += 1;
        last = whole.end();
    }
    source.push_str(&regex::escape(&rule[last..]));
    source.push('$');
    (source, placeholders)
}
