//! Script descriptor (scriptInformation_<program>.json) for a shared script package.
//!
//! A descriptor names the command to run, the icon and tooltip shown for it, and the
//! project/type tags that place it in the index. The on-disk record is read into
//! [`RawDescriptor`] with every field optional, then resolved once into a
//! [`ScriptDescriptor`] with defined defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Program-agnostic descriptor written by authoring tools.
pub const LEGACY_DESCRIPTOR_FILE: &str = "scriptInformation.json";

const DESCRIPTOR_FILE_PREFIX: &str = "scriptInformation_";
const DESCRIPTOR_FILE_EXTENSION: &str = "json";

/// Package directories starting with this prefix are reserved and never loaded.
pub const RESERVED_PREFIX: &str = "__";

/// Placeholder values for a descriptor that parsed but lacks command, icon or tooltip.
pub const BROKEN_COMMAND: &str = "ERROR";
pub const BROKEN_TOOLTIP: &str = "ERROR";
pub const BROKEN_ICON: &str = "icon_error.jpg";

/// Identifier of the host program a descriptor variant targets (e.g. "maya").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Program(String);

impl Program {
    /// Trimmed program id. Returns None when empty.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Known non-blank id.
    pub(crate) fn from_static(id: &'static str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of this program's descriptor inside a package (e.g. `scriptInformation_maya.json`).
    pub fn descriptor_file_name(&self) -> String {
        format!(
            "{}{}.{}",
            DESCRIPTOR_FILE_PREFIX, self.0, DESCRIPTOR_FILE_EXTENSION
        )
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Program {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::new(s).ok_or_else(|| "program id must not be empty".to_string())
    }
}

/// True if the directory's base name marks it as reserved (`__templates`, `__icons`, ...).
pub fn is_reserved_package(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with(RESERVED_PREFIX))
        .unwrap_or(false)
}

/// On-disk record. Unknown keys are ignored; `null` reads as absent.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDescriptor {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub tooltip: Option<String>,
    /// Language of `command` (e.g. "python", "mel"). Informational only.
    #[serde(default)]
    pub command_type: Option<String>,
    #[serde(default)]
    pub parent_projects: Option<Vec<String>>,
    #[serde(default)]
    pub parent_types: Option<Vec<String>>,
}

/// Presentation fields that must be present for an entry to be usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorField {
    Command,
    Icon,
    Tooltip,
}

impl fmt::Display for DescriptorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DescriptorField::Command => "command",
            DescriptorField::Icon => "icon",
            DescriptorField::Tooltip => "tooltip",
        })
    }
}

/// How a descriptor came out of the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DescriptorStatus {
    /// Parsed with command, icon and tooltip present.
    Loaded,
    /// Parsed, but some presentation fields were absent and carry placeholder values.
    Broken { missing: Vec<DescriptorField> },
    /// No descriptor file for the requested program.
    Missing,
    /// The descriptor file could not be read or parsed.
    Malformed { reason: String },
}

/// One package's metadata for a given program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptDescriptor {
    /// Package directory the descriptor was loaded from.
    pub package: PathBuf,
    pub command: String,
    pub icon: String,
    pub tooltip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,
    pub parent_projects: Vec<String>,
    pub parent_types: Vec<String>,
    pub status: DescriptorStatus,
}

impl ScriptDescriptor {
    /// Descriptor with every field empty; it has no placement and is never indexed.
    pub fn empty(package: &Path, status: DescriptorStatus) -> Self {
        Self {
            package: package.to_path_buf(),
            command: String::new(),
            icon: String::new(),
            tooltip: String::new(),
            command_type: None,
            parent_projects: Vec::new(),
            parent_types: Vec::new(),
            status,
        }
    }

    /// Resolve a parsed record. Absent command/icon/tooltip get placeholder values and mark the descriptor broken.
    pub(crate) fn from_raw(package: &Path, raw: RawDescriptor) -> Self {
        let mut missing = Vec::new();
        let command = raw.command.unwrap_or_else(|| {
            missing.push(DescriptorField::Command);
            BROKEN_COMMAND.to_string()
        });
        let icon = raw.icon.unwrap_or_else(|| {
            missing.push(DescriptorField::Icon);
            BROKEN_ICON.to_string()
        });
        let tooltip = raw.tooltip.unwrap_or_else(|| {
            missing.push(DescriptorField::Tooltip);
            BROKEN_TOOLTIP.to_string()
        });
        let status = if missing.is_empty() {
            DescriptorStatus::Loaded
        } else {
            DescriptorStatus::Broken { missing }
        };
        Self {
            package: package.to_path_buf(),
            command,
            icon,
            tooltip,
            command_type: raw.command_type,
            parent_projects: raw.parent_projects.unwrap_or_default(),
            parent_types: raw.parent_types.unwrap_or_default(),
            status,
        }
    }

    /// Package directory name (lossy), for display.
    pub fn name(&self) -> String {
        self.package
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.package.display().to_string())
    }

    /// True if the descriptor is tagged with at least one project.
    pub fn is_placed(&self) -> bool {
        !self.parent_projects.is_empty()
    }

    pub fn is_broken(&self) -> bool {
        matches!(self.status, DescriptorStatus::Broken { .. })
    }

    pub fn summary(&self) -> ScriptSummary {
        ScriptSummary {
            command: self.command.clone(),
            icon: self.icon.clone(),
            tooltip: self.tooltip.clone(),
            broken: self.is_broken(),
        }
    }
}

/// Presentation payload stored in the index: one per (project, type) placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptSummary {
    pub command: String,
    pub icon: String,
    pub tooltip: String,
    /// Set when command, icon or tooltip are placeholders; render as a broken entry.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub broken: bool,
}

/// Descriptor as written by authoring tools. Fields are declared in sorted key order
/// so the serialized file is stable and diff-friendly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorRecord {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_type: Option<String>,
    pub icon: String,
    #[serde(default)]
    pub parent_projects: Vec<String>,
    #[serde(default)]
    pub parent_types: Vec<String>,
    pub tooltip: String,
}

impl DescriptorRecord {
    pub fn new(
        command: impl Into<String>,
        icon: impl Into<String>,
        tooltip: impl Into<String>,
        parent_projects: Vec<String>,
        parent_types: Vec<String>,
    ) -> Self {
        Self {
            command: command.into(),
            command_type: None,
            icon: icon.into(),
            parent_projects,
            parent_types,
            tooltip: tooltip.into(),
        }
    }

    /// Serialize with four-space indentation.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(serde::ser::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_file_name_embeds_program() {
        let program = Program::new("maya").unwrap();
        assert_eq!(program.descriptor_file_name(), "scriptInformation_maya.json");
    }

    #[test]
    fn program_rejects_blank_and_trims() {
        assert!(Program::new("   ").is_none());
        assert!("".parse::<Program>().is_err());
        assert_eq!(Program::new(" houdini ").unwrap().as_str(), "houdini");
    }

    #[test]
    fn reserved_prefix_matches_base_name_only() {
        assert!(is_reserved_package(Path::new("/scripts/__templates")));
        assert!(!is_reserved_package(Path::new("/__scripts/exporter")));
        assert!(!is_reserved_package(Path::new("/scripts/_single")));
    }

    #[test]
    fn from_raw_fills_placeholders_for_missing_presentation_fields() {
        let raw: RawDescriptor = serde_json::from_str(
            r#"{"command": "run()", "parent_projects": ["EG2"], "parent_types": ["Export"]}"#,
        )
        .unwrap();
        let d = ScriptDescriptor::from_raw(Path::new("/s/exporter"), raw);
        assert_eq!(d.command, "run()");
        assert_eq!(d.icon, BROKEN_ICON);
        assert_eq!(d.tooltip, BROKEN_TOOLTIP);
        assert_eq!(
            d.status,
            DescriptorStatus::Broken {
                missing: vec![DescriptorField::Icon, DescriptorField::Tooltip]
            }
        );
        assert!(d.summary().broken);
        assert_eq!(d.name(), "exporter");
    }

    #[test]
    fn from_raw_missing_lists_default_to_empty() {
        let raw: RawDescriptor = serde_json::from_str(
            r#"{"command": "c", "icon": "i.png", "tooltip": "t", "parent_types": null, "extra": 1}"#,
        )
        .unwrap();
        let d = ScriptDescriptor::from_raw(Path::new("pkg"), raw);
        assert_eq!(d.status, DescriptorStatus::Loaded);
        assert!(d.parent_projects.is_empty());
        assert!(d.parent_types.is_empty());
        assert!(!d.is_placed());
        assert!(!d.summary().broken);
    }

    #[test]
    fn record_serializes_sorted_with_four_space_indent() {
        let record = DescriptorRecord::new(
            "import tool; tool.show()",
            "L:/icons/tool.jpg",
            "Batch exporter",
            vec!["Misc".into(), "EG2".into()],
            vec!["Export".into()],
        );
        let json = record.to_pretty_json().unwrap();
        let expected = r#"{
    "command": "import tool; tool.show()",
    "icon": "L:/icons/tool.jpg",
    "parent_projects": [
        "Misc",
        "EG2"
    ],
    "parent_types": [
        "Export"
    ],
    "tooltip": "Batch exporter"
}"#;
        assert_eq!(json, expected);
    }
}
