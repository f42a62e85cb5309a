//! The AWS-style profile file (`~/.aws/config`).
//!
//! Only what credvault needs is understood: `[default]` and `[profile NAME]`
//! headers plus flat `key = value` pairs. Other sections (`[sso-session ...]`,
//! `[services ...]`) and indented sub-properties are skipped. New profiles are
//! appended to the end of the file so existing bytes are never rewritten.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::profile::ProfileSection;

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\s*(?:(profile|sso-session|services)\s+)?([^\]]*?)\s*\]$")
        .expect("Invalid regex pattern")
});

static KEY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^=\s][^=]*?)\s*=\s*(.*?)\s*$").expect("Invalid regex pattern"));

/// Lookup and registration of profile sections.
pub trait ProfileConfig {
    /// The section for `name`, or `None` if the profile is not declared.
    fn profile_section(&self, name: &str) -> Option<ProfileSection>;

    /// Append a new section. Fails with `AlreadyExists` if the name is taken.
    fn add(&mut self, section: ProfileSection) -> io::Result<()>;

    /// Location of the backing file, for messages.
    fn path(&self) -> &Path;
}

/// A parsed AWS config file.
#[derive(Debug, Clone)]
pub struct AwsConfigFile {
    path: PathBuf,
    sections: Vec<ProfileSection>,
}

impl AwsConfigFile {
    /// Load the file at `path`. A missing file is an empty config.
    pub fn load(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        Ok(Self::parse(path, &content))
    }

    /// Parse config text that lives (or will live) at `path`.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Self {
        let mut sections: Vec<ProfileSection> = Vec::new();
        // Index into `sections` of the profile currently being read, if any.
        let mut current: Option<usize> = None;

        for raw in content.lines() {
            let line = strip_comment(raw);
            if line.trim().is_empty() {
                continue;
            }
            // Indented lines continue a nested property (e.g. `s3 =`).
            if raw.starts_with(char::is_whitespace) {
                continue;
            }

            let line = line.trim();
            if let Some(caps) = SECTION_HEADER.captures(line) {
                let prefix = caps.get(1).map(|m| m.as_str());
                let name = caps[2].to_string();
                current = match prefix {
                    Some("profile") => Some(section_index(&mut sections, name)),
                    None if name == "default" => Some(section_index(&mut sections, name)),
                    _ => None,
                };
                continue;
            }

            if let (Some(idx), Some(caps)) = (current, KEY_VALUE.captures(line)) {
                sections[idx].set(&caps[1], &caps[2]);
            }
        }

        Self {
            path: path.into(),
            sections,
        }
    }

    /// All profile sections in file order.
    pub fn sections(&self) -> &[ProfileSection] {
        &self.sections
    }
}

impl ProfileConfig for AwsConfigFile {
    fn profile_section(&self, name: &str) -> Option<ProfileSection> {
        self.sections.iter().find(|s| s.name == name).cloned()
    }

    fn add(&mut self, section: ProfileSection) -> io::Result<()> {
        if self.sections.iter().any(|s| s.name == section.name) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("profile {} already exists in {}", section.name, self.path.display()),
            ));
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let existing = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };

        let mut text = String::new();
        if !existing.is_empty() {
            if !existing.ends_with(b"\n") {
                text.push('\n');
            }
            text.push('\n');
        }
        text.push_str(&render_section(&section));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        self.sections.push(section);
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

fn section_index(sections: &mut Vec<ProfileSection>, name: String) -> usize {
    // Repeated headers merge into the first occurrence.
    if let Some(idx) = sections.iter().position(|s| s.name == name) {
        return idx;
    }
    sections.push(ProfileSection::new(name));
    sections.len() - 1
}

fn strip_comment(line: &str) -> &str {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') || trimmed.starts_with(';') {
        ""
    } else {
        line
    }
}

fn render_section(section: &ProfileSection) -> String {
    let mut out = section.header();
    out.push('\n');

    let delegations = [
        ("source_profile", &section.source_profile),
        ("include_profile", &section.include_profile),
        ("parent_profile", &section.parent_profile),
    ];
    for (key, value) in delegations {
        if !value.is_empty() {
            out.push_str(&format!("{} = {}\n", key, value));
        }
    }
    for (key, value) in &section.other {
        out.push_str(&format!("{} = {}\n", key, value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# shared config
[default]
region = us-east-1

[profile work]
region=eu-west-1
s3 =
  max_concurrent_requests = 20

[profile delegated]
source_profile = base
role_arn = arn:aws:iam::123456789012:role/admin

[sso-session corp]
sso_region = us-east-1

[profile child]
; inherits from work
parent_profile = work
";

    #[test]
    fn test_parse_profiles_and_default() {
        let config = AwsConfigFile::parse("/tmp/config", SAMPLE);
        let names: Vec<_> = config.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["default", "work", "delegated", "child"]);
    }

    #[test]
    fn test_parse_delegation_fields() {
        let config = AwsConfigFile::parse("/tmp/config", SAMPLE);
        let delegated = config.profile_section("delegated").unwrap();
        assert_eq!(delegated.source_profile, "base");
        assert!(delegated.other.contains_key("role_arn"));

        let child = config.profile_section("child").unwrap();
        assert_eq!(child.parent_profile, "work");
    }

    #[test]
    fn test_nested_properties_are_skipped() {
        let config = AwsConfigFile::parse("/tmp/config", SAMPLE);
        let work = config.profile_section("work").unwrap();
        assert_eq!(work.other.get("region").map(String::as_str), Some("eu-west-1"));
        assert!(!work.other.contains_key("max_concurrent_requests"));
    }

    #[test]
    fn test_non_profile_sections_are_ignored() {
        let config = AwsConfigFile::parse("/tmp/config", SAMPLE);
        assert!(config.profile_section("corp").is_none());
    }

    #[test]
    fn test_missing_profile() {
        let config = AwsConfigFile::parse("/tmp/config", "");
        assert!(config.profile_section("work").is_none());
    }

    #[test]
    fn test_render_minimal_section() {
        assert_eq!(render_section(&ProfileSection::new("work")), "[profile work]\n");
    }

    #[test]
    fn test_add_rejects_existing_name() {
        let mut config = AwsConfigFile::parse("/nonexistent/dir/config", SAMPLE);
        let err = config.add(ProfileSection::new("work")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }
}
