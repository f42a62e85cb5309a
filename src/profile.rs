//! Profile sections as declared in the AWS-style config file.

use std::collections::BTreeMap;
use std::fmt;

/// How a profile hands off authentication to another profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegationKind {
    Source,
    Include,
    Parent,
}

impl DelegationKind {
    /// Config file key for this kind of delegation.
    pub fn key(self) -> &'static str {
        match self {
            DelegationKind::Source => "source_profile",
            DelegationKind::Include => "include_profile",
            DelegationKind::Parent => "parent_profile",
        }
    }
}

impl fmt::Display for DelegationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A reference from a delegating profile to the profile it borrows from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    pub kind: DelegationKind,
    pub target: String,
}

/// A named `[profile ...]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSection {
    pub name: String,
    pub source_profile: String,
    pub include_profile: String,
    pub parent_profile: String,

    /// Every other key in the section, untouched.
    pub other: BTreeMap<String, String>,
}

impl ProfileSection {
    /// A section holding nothing but its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set a key parsed from the config file.
    pub fn set(&mut self, key: &str, value: &str) {
        let value = value.to_string();
        match key {
            "source_profile" => self.source_profile = value,
            "include_profile" => self.include_profile = value,
            "parent_profile" => self.parent_profile = value,
            _ => {
                self.other.insert(key.to_string(), value);
            }
        }
    }

    /// The profile this one delegates to, if any.
    ///
    /// Checked in order source, include, parent; the first non-empty field wins.
    pub fn delegation(&self) -> Option<Delegation> {
        [
            (DelegationKind::Source, &self.source_profile),
            (DelegationKind::Include, &self.include_profile),
            (DelegationKind::Parent, &self.parent_profile),
        ]
        .into_iter()
        .find(|(_, target)| !target.is_empty())
        .map(|(kind, target)| Delegation {
            kind,
            target: target.clone(),
        })
    }

    /// Section header as written to the config file.
    pub fn header(&self) -> String {
        if self.name == "default" {
            "[default]".to_string()
        } else {
            format!("[profile {}]", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_delegation_for_plain_profile() {
        let mut section = ProfileSection::new("work");
        section.set("region", "us-east-1");
        assert_eq!(section.delegation(), None);
        assert_eq!(section.other.get("region").map(String::as_str), Some("us-east-1"));
    }

    #[test]
    fn test_source_wins_over_include_and_parent() {
        let mut section = ProfileSection::new("x");
        section.set("parent_profile", "p");
        section.set("include_profile", "i");
        section.set("source_profile", "s");
        let delegation = section.delegation().unwrap();
        assert_eq!(delegation.kind, DelegationKind::Source);
        assert_eq!(delegation.target, "s");
    }

    #[test]
    fn test_include_wins_over_parent() {
        let mut section = ProfileSection::new("x");
        section.set("parent_profile", "p");
        section.set("include_profile", "i");
        assert_eq!(
            section.delegation(),
            Some(Delegation {
                kind: DelegationKind::Include,
                target: "i".to_string()
            })
        );
    }

    #[test]
    fn test_parent_alone() {
        let mut section = ProfileSection::new("x");
        section.set("parent_profile", "p");
        assert_eq!(section.delegation().unwrap().kind, DelegationKind::Parent);
    }

    #[test]
    fn test_header() {
        assert_eq!(ProfileSection::new("default").header(), "[default]");
        assert_eq!(ProfileSection::new("work").header(), "[profile work]");
    }
}
