//! Build the project → type → scripts index from a scripts root.
//!
//! Packages are visited in directory-listing order (not sorted); that order, and the
//! order of tags inside each descriptor, is the display order of tabs, groups and icons.
//! Every build starts from an empty index and returns an owned snapshot.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

use super::descriptor::{is_reserved_package, DescriptorStatus, Program, ScriptDescriptor, ScriptSummary};
use super::error::IndexError;
use super::loader;

/// Type tag -> summaries, in insertion order.
pub type TypeGroups = IndexMap<String, Vec<ScriptSummary>>;

/// Project tag -> type groups, in insertion order. Read-only once built.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ScriptIndex {
    projects: IndexMap<String, TypeGroups>,
}

impl ScriptIndex {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Number of projects.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn projects(&self) -> impl Iterator<Item = (&str, &TypeGroups)> {
        self.projects.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn project(&self, project: &str) -> Option<&TypeGroups> {
        self.projects.get(project)
    }

    /// Summaries under `project`/`type_tag`, in placement order.
    pub fn get(&self, project: &str, type_tag: &str) -> Option<&[ScriptSummary]> {
        self.projects
            .get(project)
            .and_then(|types| types.get(type_tag))
            .map(|v| v.as_slice())
    }

    /// Total placements across all projects and types.
    pub fn summary_count(&self) -> usize {
        self.projects
            .values()
            .flat_map(|types| types.values())
            .map(|v| v.len())
            .sum()
    }

    /// Append one summary per (project, type) pair. Untagged descriptors are ignored.
    fn place(&mut self, descriptor: &ScriptDescriptor) {
        if !descriptor.is_placed() {
            return;
        }
        let summary = descriptor.summary();
        for project in &descriptor.parent_projects {
            let types = self.projects.entry(project.clone()).or_default();
            for type_tag in &descriptor.parent_types {
                types
                    .entry(type_tag.clone())
                    .or_default()
                    .push(summary.clone());
            }
        }
    }
}

/// Fold descriptors, in order, into a fresh index.
pub fn fold_descriptors<'a, I>(descriptors: I) -> ScriptIndex
where
    I: IntoIterator<Item = &'a ScriptDescriptor>,
{
    let mut index = ScriptIndex::default();
    for d in descriptors {
        index.place(d);
    }
    index
}

/// Result of one build: the index, every loaded descriptor in discovery order, and build-level diagnostics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSnapshot {
    root: PathBuf,
    program: Program,
    index: ScriptIndex,
    scripts: Vec<ScriptDescriptor>,
    #[serde(serialize_with = "serialize_diagnostics")]
    diagnostics: Vec<IndexError>,
}

fn serialize_diagnostics<S: Serializer>(diagnostics: &[IndexError], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(diagnostics.iter().map(|e| e.to_string()))
}

impl IndexSnapshot {
    fn new(root: &Path, program: &Program) -> Self {
        Self {
            root: root.to_path_buf(),
            program: program.clone(),
            index: ScriptIndex::default(),
            scripts: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn index(&self) -> &ScriptIndex {
        &self.index
    }

    /// Every loaded package (including untagged, missing, and malformed ones), in discovery order.
    pub fn scripts(&self) -> &[ScriptDescriptor] {
        &self.scripts
    }

    pub fn diagnostics(&self) -> &[IndexError] {
        &self.diagnostics
    }

    /// True when there is nothing to present.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Packages tagged with a project but no type: loaded, yet in no index bucket.
    pub fn unplaced(&self) -> impl Iterator<Item = &ScriptDescriptor> {
        self.scripts
            .iter()
            .filter(|d| d.is_placed() && d.parent_types.is_empty())
    }

    /// Packages whose command, icon or tooltip are placeholders.
    pub fn broken(&self) -> impl Iterator<Item = &ScriptDescriptor> {
        self.scripts.iter().filter(|d| d.is_broken())
    }

    /// Packages whose descriptor file exists but could not be read or parsed.
    pub fn malformed(&self) -> impl Iterator<Item = &ScriptDescriptor> {
        self.scripts
            .iter()
            .filter(|d| matches!(d.status, DescriptorStatus::Malformed { .. }))
    }
}

/// Load every package under `root` for `program` and index it.
/// An invalid root yields an empty snapshot carrying the diagnostic.
pub fn build_index(root: &Path, program: &Program) -> IndexSnapshot {
    let mut snapshot = IndexSnapshot::new(root, program);
    if !root.is_dir() {
        let err = IndexError::InvalidRoot(root.to_path_buf());
        log::warn!("{}", err);
        snapshot.diagnostics.push(err);
        return snapshot;
    }
    let read_dir = match std::fs::read_dir(root) {
        Ok(d) => d,
        Err(source) => {
            let err = IndexError::ReadRoot {
                path: root.to_path_buf(),
                source,
            };
            log::warn!("{}", err);
            snapshot.diagnostics.push(err);
            return snapshot;
        }
    };
    for entry in read_dir.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if is_reserved_package(&path) {
            log::debug!("skipping reserved directory {}", path.display());
            continue;
        }
        let descriptor = loader::load(&path, program);
        if !descriptor.is_placed() {
            log::debug!("{} has no parent projects; not indexed", descriptor.name());
        } else if descriptor.parent_types.is_empty() {
            log::debug!("{} has no parent types; not indexed", descriptor.name());
        }
        snapshot.scripts.push(descriptor);
    }
    snapshot.index = fold_descriptors(&snapshot.scripts);
    log::debug!(
        "indexed {} packages into {} projects from {}",
        snapshot.scripts.len(),
        snapshot.index.len(),
        root.display()
    );
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, command: &str, projects: &[&str], types: &[&str]) -> ScriptDescriptor {
        ScriptDescriptor {
            package: PathBuf::from(name),
            command: command.to_string(),
            icon: format!("{}.png", name),
            tooltip: format!("{} tooltip", name),
            command_type: None,
            parent_projects: projects.iter().map(|s| s.to_string()).collect(),
            parent_types: types.iter().map(|s| s.to_string()).collect(),
            status: DescriptorStatus::Loaded,
        }
    }

    fn commands(summaries: Option<&[ScriptSummary]>) -> Vec<&str> {
        summaries
            .unwrap_or_default()
            .iter()
            .map(|s| s.command.as_str())
            .collect()
    }

    fn shape(index: &ScriptIndex) -> Vec<(String, Vec<(String, Vec<String>)>)> {
        index
            .projects()
            .map(|(p, types)| {
                (
                    p.to_string(),
                    types
                        .iter()
                        .map(|(t, v)| (t.clone(), v.iter().map(|s| s.command.clone()).collect()))
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn fold_appends_in_discovery_order() {
        let a = descriptor("pkgA", "run_a", &["X"], &["T1", "T2"]);
        let b = descriptor("pkgB", "run_b", &["X"], &["T1"]);
        let index = fold_descriptors([&a, &b]);
        assert_eq!(commands(index.get("X", "T1")), vec!["run_a", "run_b"]);
        assert_eq!(commands(index.get("X", "T2")), vec!["run_a"]);
        let types: Vec<&String> = index.project("X").unwrap().keys().collect();
        assert_eq!(types, vec!["T1", "T2"]);
    }

    #[test]
    fn fold_places_cross_product_once_per_pair() {
        let a = descriptor("pkgA", "run_a", &["EG2", "ZA4"], &["Export", "Rigging"]);
        let index = fold_descriptors([&a]);
        for p in ["EG2", "ZA4"] {
            for t in ["Export", "Rigging"] {
                assert_eq!(commands(index.get(p, t)), vec!["run_a"]);
            }
        }
        assert_eq!(index.summary_count(), 4);
    }

    #[test]
    fn fold_skips_untagged_descriptors() {
        let a = descriptor("pkgA", "run_a", &[], &["T1"]);
        let index = fold_descriptors([&a]);
        assert!(index.is_empty());
        assert_eq!(index.summary_count(), 0);
    }

    #[test]
    fn fold_project_without_types_has_no_bucket() {
        let a = descriptor("pkgA", "run_a", &["X"], &[]);
        let index = fold_descriptors([&a]);
        assert_eq!(index.len(), 1);
        assert!(index.project("X").unwrap().is_empty());
        assert_eq!(index.summary_count(), 0);
    }

    #[test]
    fn fold_keeps_tags_case_sensitive_and_duplicates() {
        let a = descriptor("pkgA", "same", &["Misc"], &["export"]);
        let b = descriptor("pkgB", "same", &["misc"], &["Export"]);
        let c = descriptor("pkgC", "same", &["Misc"], &["export"]);
        let index = fold_descriptors([&a, &b, &c]);
        assert_eq!(index.len(), 2);
        assert_eq!(commands(index.get("Misc", "export")), vec!["same", "same"]);
        assert_eq!(commands(index.get("misc", "Export")), vec!["same"]);
    }

    #[test]
    fn fold_is_pure_across_calls() {
        let a = descriptor("pkgA", "run_a", &["X", "Y"], &["T1"]);
        let b = descriptor("pkgB", "run_b", &["Y"], &["T2", "T1"]);
        let first = fold_descriptors([&a, &b]);
        let second = fold_descriptors([&a, &b]);
        assert_eq!(shape(&first), shape(&second));
        let projects: Vec<&str> = first.projects().map(|(p, _)| p).collect();
        assert_eq!(projects, vec!["X", "Y"]);
        assert_eq!(commands(first.get("Y", "T1")), vec!["run_a", "run_b"]);
    }

    #[test]
    fn broken_flag_carries_into_summaries() {
        let mut a = descriptor("pkgA", "ERROR", &["X"], &["T1"]);
        a.status = DescriptorStatus::Broken { missing: vec![] };
        let index = fold_descriptors([&a]);
        assert!(index.get("X", "T1").unwrap()[0].broken);
    }

    #[test]
    fn snapshot_broken_includes_packages_without_placement() {
        let mut placed = descriptor("placed", "ERROR", &["X"], &["T1"]);
        placed.status = DescriptorStatus::Broken { missing: vec![] };
        let mut untagged = descriptor("untagged", "ERROR", &[], &[]);
        untagged.status = DescriptorStatus::Broken { missing: vec![] };
        let fine = descriptor("fine", "run()", &["X"], &["T1"]);

        let mut snapshot = IndexSnapshot::new(Path::new("scripts"), &Program::new("maya").unwrap());
        snapshot.scripts = vec![placed, untagged, fine];
        snapshot.index = fold_descriptors(&snapshot.scripts);

        let broken: Vec<String> = snapshot.broken().map(|d| d.name()).collect();
        assert_eq!(broken, vec!["placed", "untagged"]);
        assert_eq!(snapshot.index().summary_count(), 2);
    }

    #[test]
    fn build_invalid_root_reports_and_returns_empty() {
        let root = std::env::temp_dir().join(format!("scriptshare-missing-{}", uuid::Uuid::new_v4()));
        let program = Program::new("maya").unwrap();
        let snapshot = build_index(&root, &program);
        assert!(snapshot.is_empty());
        assert!(snapshot.scripts().is_empty());
        assert_eq!(snapshot.diagnostics().len(), 1);
        assert!(matches!(snapshot.diagnostics()[0], IndexError::InvalidRoot(_)));
    }

    #[test]
    fn build_root_that_is_a_file_is_invalid() {
        let dir = std::env::temp_dir().join(format!("scriptshare-file-root-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("scripts.txt");
        std::fs::write(&file, "not a directory").unwrap();
        let snapshot = build_index(&file, &Program::new("maya").unwrap());
        assert!(matches!(snapshot.diagnostics()[0], IndexError::InvalidRoot(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn index_serializes_in_insertion_order() {
        let a = descriptor("pkgA", "run_a", &["Zeta"], &["B"]);
        let b = descriptor("pkgB", "run_b", &["Alpha"], &["A"]);
        let index = fold_descriptors([&a, &b]);
        let json = serde_json::to_string(&index).unwrap();
        let zeta = json.find("Zeta").unwrap();
        let alpha = json.find("Alpha").unwrap();
        assert!(zeta < alpha);
        assert!(!json.contains("broken"));
    }
}
