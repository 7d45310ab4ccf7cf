//! Declarative argument-vector rules.
//!
//! A mocked command is described by an ordered table of [`Rule`]s. Each rule
//! pairs a [`Pattern`] over the invocation's arguments with a [`Target`]
//! that names the fixture to replay. Tables are evaluated top to bottom and
//! the first matching rule wins, so adding a mocked invocation is a table
//! edit rather than new control flow.
//!
//! ```
//! use cmdmock::rules::{FixtureKey, Rule, RuleSet, Token};
//!
//! static RULES: &[Rule] = &[
//!     Rule::exact(&[Token::Literal("--scan")], "scan"),
//!     Rule::device(&[Token::Literal("--info")], "info"),
//! ];
//! let rules = RuleSet::new(RULES);
//!
//! let (_, key) = rules.find(&["--info", "/dev/ada0"]).unwrap();
//! assert_eq!(key, FixtureKey::command("info/ada0"));
//! assert!(rules.find(&["--info"]).is_none());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// One position in a token pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Token {
    /// Matches exactly this argument.
    Literal(&'static str),
    /// Matches any single argument.
    Any,
    /// Matches any single argument and adds it to the fixture key, ahead of
    /// the device name. Only usable in device rules.
    Key,
}

impl Token {
    fn matches(&self, arg: &str) -> bool {
        match self {
            Token::Literal(lit) => *lit == arg,
            Token::Any | Token::Key => true,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(lit) => f.write_str(lit),
            Token::Any => f.write_str("<any>"),
            Token::Key => f.write_str("<key>"),
        }
    }
}

/// Shape an argument vector has to have for a rule to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Pattern {
    /// The arguments are exactly these tokens.
    Exact(&'static [Token]),
    /// These tokens followed by exactly one device argument.
    Device(&'static [Token]),
    /// Exactly this many arguments, each usable as a single path component.
    Positional(usize),
}

/// Fixture a matching rule resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Target {
    /// `<platform>/<command>/<name>`.
    Fixed(&'static str),
    /// `<platform>/<command>/<dir>/<device basename>`.
    ByDevice(&'static str),
    /// `<root>/<arg0>/<arg1>/...`, taking the arguments verbatim.
    Direct,
}

/// Location of a fixture relative to the store root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureKey {
    /// Relative to `<root>/<platform>/<command>/`.
    Command(PathBuf),
    /// Relative to `<root>/`.
    Root(PathBuf),
}

impl FixtureKey {
    /// Shorthand for a key scoped to the mocked command's directory.
    pub fn command(path: impl Into<PathBuf>) -> Self {
        FixtureKey::Command(path.into())
    }

    /// Shorthand for a key relative to the store root.
    pub fn root(path: impl Into<PathBuf>) -> Self {
        FixtureKey::Root(path.into())
    }
}

/// A pattern paired with the fixture it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub pattern: Pattern,
    pub target: Target,
}

impl Rule {
    /// Rule matching an exact argument vector to a fixed fixture name.
    pub const fn exact(tokens: &'static [Token], name: &'static str) -> Self {
        Rule {
            pattern: Pattern::Exact(tokens),
            target: Target::Fixed(name),
        }
    }

    /// Rule matching `prefix... <device>` to `<dir>/<device basename>`.
    /// Arguments matched by `Token::Key` are inserted before the device name.
    pub const fn device(prefix: &'static [Token], dir: &'static str) -> Self {
        Rule {
            pattern: Pattern::Device(prefix),
            target: Target::ByDevice(dir),
        }
    }

    /// Rule mapping `n` positional arguments straight onto a root-relative path.
    pub const fn positional(n: usize) -> Self {
        Rule {
            pattern: Pattern::Positional(n),
            target: Target::Direct,
        }
    }

    /// Resolves `args` to a fixture key, or `None` if this rule does not apply.
    pub fn resolve<S: AsRef<str>>(&self, args: &[S]) -> Option<FixtureKey> {
        match (self.pattern, self.target) {
            (Pattern::Exact(tokens), Target::Fixed(name)) => {
                matches_tokens(tokens, args).then(|| FixtureKey::command(name))
            }
            (Pattern::Device(prefix), Target::ByDevice(dir)) => {
                let (device, head) = args.split_last()?;
                if !matches_tokens(prefix, head) {
                    return None;
                }
                let mut path = PathBuf::from(dir);
                for (token, arg) in prefix.iter().zip(head) {
                    if *token == Token::Key {
                        path.push(single_component(arg.as_ref())?);
                    }
                }
                path.push(device_basename(device.as_ref())?);
                Some(FixtureKey::command(path))
            }
            (Pattern::Positional(n), Target::Direct) => {
                if args.len() != n {
                    return None;
                }
                let mut path = PathBuf::new();
                for arg in args {
                    path.push(single_component(arg.as_ref())?);
                }
                Some(FixtureKey::root(path))
            }
            // Remaining combinations cannot be built with the constructors.
            _ => None,
        }
    }

    /// Human readable form of the pattern, e.g. `--info <device>`.
    pub fn describe(&self) -> String {
        let tokens = |tokens: &[Token]| {
            tokens
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        };
        match self.pattern {
            Pattern::Exact(t) => tokens(t),
            Pattern::Device(t) if t.is_empty() => "<device>".to_string(),
            Pattern::Device(t) => format!("{} <device>", tokens(t)),
            Pattern::Positional(n) => (0..n)
                .map(|i| format!("<arg{}>", i))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Number of `Key` tokens: directory levels between the target
    /// directory and the device file.
    pub fn key_depth(&self) -> usize {
        match self.pattern {
            Pattern::Device(prefix) => prefix.iter().filter(|t| **t == Token::Key).count(),
            _ => 0,
        }
    }

    /// Human readable form of the target, relative to the command directory.
    pub fn describe_target(&self) -> String {
        match self.target {
            Target::Fixed(name) => name.to_string(),
            Target::ByDevice(dir) => {
                let keys = "<key>/".repeat(self.key_depth());
                format!("{}/{}<device basename>", dir, keys)
            }
            Target::Direct => "<root>/<arg0>/<arg1>...".to_string(),
        }
    }
}

/// An ordered rule table with first-match-wins evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    rules: &'static [Rule],
}

impl RuleSet {
    pub const fn new(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// Returns the first rule that matches `args` and the key it resolves to.
    pub fn find<S: AsRef<str>>(&self, args: &[S]) -> Option<(&'static Rule, FixtureKey)> {
        self.rules
            .iter()
            .find_map(|rule| rule.resolve(args).map(|key| (rule, key)))
    }
}

fn matches_tokens<S: AsRef<str>>(tokens: &[Token], args: &[S]) -> bool {
    tokens.len() == args.len()
        && tokens
            .iter()
            .zip(args)
            .all(|(token, arg)| token.matches(arg.as_ref()))
}

/// Final path component of a device argument: `/dev/ada0` -> `ada0`.
fn device_basename(device: &str) -> Option<&str> {
    Path::new(device).file_name()?.to_str()
}

/// Accepts an argument only if it names exactly one normal path component.
fn single_component(arg: &str) -> Option<&str> {
    let invalid = arg.is_empty()
        || arg == "."
        || arg == ".."
        || arg.contains('/')
        || arg.contains(std::path::MAIN_SEPARATOR);
    (!invalid).then_some(arg)
}
