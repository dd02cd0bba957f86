//! Scripts: load per-program script package descriptors and index them by project and type.
//!
//! The scripts root holds one directory per package; each package carries a
//! `scriptInformation_<program>.json` descriptor for every program it supports.
//! Directories starting with `__` are reserved (templates, shared icons) and never loaded.

mod descriptor;
mod error;
mod index;
mod loader;

pub use descriptor::{
    is_reserved_package, DescriptorField, DescriptorRecord, DescriptorStatus, Program,
    ScriptDescriptor, ScriptSummary, BROKEN_COMMAND, BROKEN_ICON, BROKEN_TOOLTIP,
    LEGACY_DESCRIPTOR_FILE, RESERVED_PREFIX,
};
pub use error::{DescriptorError, IndexError, LoadError};
pub use index::{build_index, fold_descriptors, IndexSnapshot, ScriptIndex, TypeGroups};
pub use loader::{generate, generate_for, load};
