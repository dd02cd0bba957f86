//! Load a script package's descriptor for one program, and write descriptors for authoring tools.
//!
//! Loading never fails: a missing file yields an empty descriptor, and an unreadable or
//! unparseable file yields an empty descriptor marked malformed (and a warning in the log).

use std::path::{Path, PathBuf};

use super::descriptor::{
    DescriptorRecord, DescriptorStatus, Program, RawDescriptor, ScriptDescriptor,
    LEGACY_DESCRIPTOR_FILE,
};
use super::error::{DescriptorError, LoadError};

/// Load `package_dir/scriptInformation_<program>.json`.
pub fn load(package_dir: &Path, program: &Program) -> ScriptDescriptor {
    if !package_dir.is_dir() {
        return ScriptDescriptor::empty(package_dir, DescriptorStatus::Missing);
    }
    let path = package_dir.join(program.descriptor_file_name());
    match read_descriptor(&path) {
        Ok(Some(raw)) => ScriptDescriptor::from_raw(package_dir, raw),
        Ok(None) => {
            log::debug!(
                "no {} descriptor in {}",
                program,
                package_dir.display()
            );
            ScriptDescriptor::empty(package_dir, DescriptorStatus::Missing)
        }
        Err(e) => {
            log::warn!("{}", e);
            ScriptDescriptor::empty(
                package_dir,
                DescriptorStatus::Malformed {
                    reason: e.to_string(),
                },
            )
        }
    }
}

/// Ok(None) when there is no descriptor file at `path`.
fn read_descriptor(path: &Path) -> Result<Option<RawDescriptor>, LoadError> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };
    // A derived struct also accepts a positional array; only a key/value object is a descriptor.
    let record = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&content)
        .map_err(parse_err)?;
    let raw = serde_json::from_value::<RawDescriptor>(serde_json::Value::Object(record))
        .map_err(parse_err)?;
    Ok(Some(raw))
}

/// Write the program-agnostic `scriptInformation.json` into `package_dir`, replacing any existing file.
pub fn generate(package_dir: &Path, record: &DescriptorRecord) -> Result<PathBuf, DescriptorError> {
    write_descriptor(&package_dir.join(LEGACY_DESCRIPTOR_FILE), record)
}

/// Write the descriptor variant `load` reads for `program`, replacing any existing file.
pub fn generate_for(
    package_dir: &Path,
    program: &Program,
    record: &DescriptorRecord,
) -> Result<PathBuf, DescriptorError> {
    write_descriptor(&package_dir.join(program.descriptor_file_name()), record)
}

fn write_descriptor(path: &Path, record: &DescriptorRecord) -> Result<PathBuf, DescriptorError> {
    let mut content = record
        .to_pretty_json()
        .map_err(|source| DescriptorError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    content.push('\n');
    std::fs::write(path, content).map_err(|source| DescriptorError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote descriptor {}", path.display());
    Ok(path.to_path_buf())
}
