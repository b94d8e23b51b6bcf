use std::collections::{BTreeMap, HashSet};

use super::types::ModuleConfig;
use crate::error::SchemaError;

/// Name index over every module parsed in a run.
///
/// Built once, after the whole tree has been enumerated, so that parent
/// resolution never depends on the order files were discovered in.
#[derive(Debug, Default)]
pub struct ModuleIndex {
    by_name: BTreeMap<String, usize>,
    parents: Vec<Option<usize>>,
}

impl ModuleIndex {
    /// Index `configs` and resolve every parent reference.
    ///
    /// Returns the index together with one error per module that cannot be
    /// generated: a duplicate module name (the first declaration wins), a
    /// parent that is not in the tree, or a parent chain that loops back on
    /// itself. Error indices refer to positions in `configs`.
    pub fn build(configs: &[&ModuleConfig]) -> (ModuleIndex, Vec<(usize, SchemaError)>) {
        let mut by_name = BTreeMap::new();
        let mut errors = Vec::new();
        let mut failed = HashSet::new();

        for (idx, config) in configs.iter().enumerate() {
            if let Some(&first) = by_name.get(&config.name) {
                let other: &ModuleConfig = configs[first];
                errors.push((
                    idx,
                    SchemaError::DuplicateModule {
                        module: config.name.clone(),
                        other: other.origin.clone(),
                    },
                ));
                failed.insert(idx);
            } else {
                by_name.insert(config.name.clone(), idx);
            }
        }

        let mut parents = vec![None; configs.len()];
        for (idx, config) in configs.iter().enumerate() {
            if failed.contains(&idx) {
                continue;
            }
            let Some(parent) = config.parent.as_ref() else {
                continue;
            };
            match by_name.get(parent) {
                Some(&p) => parents[idx] = Some(p),
                None => {
                    errors.push((
                        idx,
                        SchemaError::UnresolvedParent {
                            module: config.name.clone(),
                            parent: parent.clone(),
                        },
                    ));
                    failed.insert(idx);
                }
            }
        }

        for idx in 0..configs.len() {
            if failed.contains(&idx) {
                continue;
            }
            let mut chain = vec![idx];
            let mut seen = HashSet::from([idx]);
            let mut cursor = parents[idx];
            while let Some(p) = cursor {
                chain.push(p);
                if !seen.insert(p) {
                    let names = chain
                        .iter()
                        .map(|&i| configs[i].name.as_str())
                        .collect::<Vec<_>>()
                        .join(" -> ");
                    errors.push((
                        idx,
                        SchemaError::ParentCycle {
                            module: configs[idx].name.clone(),
                            chain: names,
                        },
                    ));
                    break;
                }
                cursor = parents[p];
            }
        }

        errors.sort_by_key(|(idx, _)| *idx);
        (ModuleIndex { by_name, parents }, errors)
    }

    /// Position of the module called `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Position of the resolved parent of the module at `idx`.
    pub fn parent_of(&self, idx: usize) -> Option<usize> {
        self.parents.get(idx).copied().flatten()
    }

    /// Number of ancestors above the module at `idx`. Bounded by the index
    /// size so a cyclic chain still terminates.
    pub fn depth(&self, idx: usize) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent_of(idx);
        while let Some(p) = cursor {
            depth += 1;
            if depth >= self.parents.len() {
                break;
            }
            cursor = self.parent_of(p);
        }
        depth
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
