use std::collections::hash_map::Entry;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use thiserror::Error;

use super::{init_parser, OptionKind};

static MATCHER: Lazy<CommandMatcher<OptionKind>> = Lazy::new(init_parser);

pub const USAGE: &str = "usage:\n    \
    wandboxit [--compiler=ID] [--std=STANDARD | --standard=STANDARD] FILE\n    \
    wandboxit --list-languages\n    \
    wandboxit --list-compilers=LANGUAGE\n    \
    wandboxit --list-standards=COMPILER";

pub struct CommandMatcher<Enum> {
    matcher: HashMap<String, Enum>,
}

impl<Enum: Clone> CommandMatcher<Enum> {
    pub fn new(labels: &[&str], enums: &[Enum]) -> Self {
        let map = labels
            .iter()
            .map(ToString::to_string)
            .zip(enums.iter().cloned())
            .collect();
        Self { matcher: map }
    }

    pub fn find(&self, text: &str) -> Option<Enum> {
        self.matcher.get(text).cloned()
    }

    /// Matches `--flag` exactly or `--name=value` by prefix, returning the value
    /// (empty for flags).
    pub fn classify<'a>(&self, arg: &'a str) -> Option<(Enum, &'a str)> {
        let rest = arg.strip_prefix("--")?;
        match rest.find('=') {
            Some(eq) => self
                .find(&rest[..=eq])
                .map(|kind| (kind, &rest[eq + 1..])),
            None => self.find(rest).map(|kind| (kind, "")),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Token<'a> {
    Option {
        kind: OptionKind,
        value: &'a str,
        raw: &'a str,
    },
    Positional(&'a str),
}

pub struct Args<'a> {
    args: std::slice::Iter<'a, String>,
}

impl<'a> Args<'a> {
    pub fn wrap(args: &'a [String]) -> Self {
        Self { args: args.iter() }
    }
}

impl<'a> Iterator for Args<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.args.next()?.as_str();
        Some(match MATCHER.classify(raw) {
            Some((kind, value)) => Token::Option { kind, value, raw },
            None => Token::Positional(raw),
        })
    }
}

#[derive(Debug, PartialEq)]
pub enum Mode {
    Compile(String),
    ListLanguages,
    ListCompilers(String),
    ListStandards(String),
}

#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub compiler: Option<String>,
    pub standard: Option<String>,
    pub mode: Mode,
}

#[derive(Debug, Error, PartialEq)]
pub enum UsageError {
    #[error("Give me the name of a file to compile!")]
    MissingFile,
    #[error("expected exactly one file to compile, got {}: {}", .0.len(), .0.join(" "))]
    TooManyArguments(Vec<String>),
}

impl Invocation {
    pub fn parse(args: &[String]) -> Result<Self, UsageError> {
        let mut found: HashMap<OptionKind, &str> = HashMap::new();
        let mut positional = Vec::new();
        for token in Args::wrap(args) {
            match token {
                Token::Option { kind, value, raw } => match found.entry(kind) {
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                    // only the first occurrence is consumed
                    Entry::Occupied(_) => positional.push(raw.to_string()),
                },
                Token::Positional(arg) => positional.push(arg.to_string()),
            }
        }

        let take = |kind: OptionKind| found.get(&kind).map(|value| value.to_string());
        let mode = if found.contains_key(&OptionKind::ListLanguages) {
            Mode::ListLanguages
        } else if let Some(language) = take(OptionKind::ListCompilers) {
            Mode::ListCompilers(language)
        } else if let Some(compiler) = take(OptionKind::ListStandards) {
            Mode::ListStandards(compiler)
        } else {
            match positional.len() {
                0 => return Err(UsageError::MissingFile),
                1 => Mode::Compile(positional.remove(0)),
                _ => return Err(UsageError::TooManyArguments(positional)),
            }
        };

        Ok(Self {
            compiler: take(OptionKind::Compiler),
            standard: take(OptionKind::Std).or_else(|| take(OptionKind::Standard)),
            mode,
        })
    }
}
