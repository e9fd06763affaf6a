//! Output grouping and file naming for rendered documents.
//!
//! ```text
//! <out>/
//!   extant/<Stem>.<ext>            troupe already has a published page
//!   never_performed/<Stem>.<ext>   no "yes" to performing before
//!   new/<Stem>.<ext>               everything else
//!   photos/<Stem>.<img ext>
//!   .troupes/manifest.json
//! ```

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use troupe_core::types::{TroupeKey, TroupeRecord};
use troupe_renderer::Document;

/// Subdirectory a document is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputGroup {
    Extant,
    NeverPerformed,
    New,
}

impl OutputGroup {
    pub fn all() -> &'static [OutputGroup] {
        &[OutputGroup::Extant, OutputGroup::NeverPerformed, OutputGroup::New]
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            OutputGroup::Extant => "extant",
            OutputGroup::NeverPerformed => "never_performed",
            OutputGroup::New => "new",
        }
    }
}

impl fmt::Display for OutputGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Extant membership wins over the never-performed flag.
pub fn classify(doc: &Document, extant: &BTreeSet<String>) -> OutputGroup {
    if extant.contains(&doc.key.0) {
        OutputGroup::Extant
    } else if doc.never_performed {
        OutputGroup::NeverPerformed
    } else {
        OutputGroup::New
    }
}

/// Hands out unique file stems for troupe keys.
///
/// Keys that sanitize to the same stem get `_2`, `_3`, … suffixes in the
/// order they are requested; a key with no alphanumerics becomes `troupe`.
#[derive(Debug, Default)]
pub struct StemAllocator {
    used: HashSet<String>,
}

impl StemAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, key: &TroupeKey) -> String {
        let mut base = key.file_stem();
        if base.is_empty() {
            base = "troupe".to_string();
        }
        if self.used.insert(base.clone()) {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.used.insert(candidate.clone()) {
                tracing::warn!("file name clash for {key:?}; writing as {candidate}");
                return candidate;
            }
            n += 1;
        }
    }
}

/// File stem for every troupe, allocated in key order.
///
/// Pages and photos both name their files from this map, so a troupe's
/// photo always shares its page's stem.
pub fn allocate_stems(records: &BTreeMap<TroupeKey, TroupeRecord>) -> BTreeMap<TroupeKey, String> {
    let mut stems = StemAllocator::new();
    records
        .keys()
        .map(|key| (key.clone(), stems.allocate(key)))
        .collect()
}

/// `<out>/<group>/<stem>.<extension>`
pub fn document_path(out_dir: &Path, group: OutputGroup, stem: &str, extension: &str) -> PathBuf {
    out_dir
        .join(group.dir_name())
        .join(format!("{stem}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, never_performed: bool) -> Document {
        Document {
            key: TroupeKey::from(name),
            content: String::new(),
            never_performed,
        }
    }

    #[test]
    fn extant_beats_never_performed() {
        let extant: BTreeSet<String> = ["Frogs".to_string()].into_iter().collect();
        assert_eq!(classify(&doc("Frogs", true), &extant), OutputGroup::Extant);
        assert_eq!(classify(&doc("Toads", true), &extant), OutputGroup::NeverPerformed);
        assert_eq!(classify(&doc("Newts", false), &extant), OutputGroup::New);
    }

    #[test]
    fn extant_match_is_exact() {
        let extant: BTreeSet<String> = ["Frogs".to_string()].into_iter().collect();
        assert_eq!(classify(&doc("frogs", false), &extant), OutputGroup::New);
    }

    #[test]
    fn stems_are_unique() {
        let mut stems = StemAllocator::new();
        assert_eq!(stems.allocate(&TroupeKey::from("Frogs!")), "Frogs");
        assert_eq!(stems.allocate(&TroupeKey::from("Frogs?")), "Frogs_2");
        assert_eq!(stems.allocate(&TroupeKey::from("F.r.o.g.s")), "Frogs_3");
        assert_eq!(stems.allocate(&TroupeKey::from("!!!")), "troupe");
    }

    #[test]
    fn stems_cover_every_record() {
        let records: BTreeMap<TroupeKey, TroupeRecord> = ["Frogs!", "Frogs?", "Toads"]
            .into_iter()
            .map(|name| (TroupeKey::from(name), TroupeRecord::default()))
            .collect();
        let stems = allocate_stems(&records);
        assert_eq!(stems.len(), 3);
        assert_eq!(stems[&TroupeKey::from("Frogs!")], "Frogs");
        assert_eq!(stems[&TroupeKey::from("Frogs?")], "Frogs_2");
        assert_eq!(stems[&TroupeKey::from("Toads")], "Toads");
    }

    #[test]
    fn group_serializes_as_its_dir_name() {
        for group in OutputGroup::all() {
            let json = serde_json::to_string(group).unwrap();
            assert_eq!(json, format!("\"{}\"", group.dir_name()));
        }
    }

    #[test]
    fn document_path_layout() {
        let path = document_path(Path::new("/out"), OutputGroup::NeverPerformed, "Frogs", "wiki");
        assert_eq!(path, PathBuf::from("/out/never_performed/Frogs.wiki"));
    }
}
