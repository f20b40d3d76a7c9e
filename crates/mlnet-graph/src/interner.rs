use std::collections::HashMap;

use mlnet_core::Label;

/// Dense integer ids for the labels of one aspect domain, plus the labels in
/// sorted order, kept current as labels are interned.
#[derive(Debug, Clone, Default)]
pub(crate) struct Interner {
    labels: Vec<Label>,
    index: HashMap<Label, u32>,
    sorted: Vec<Label>,
}

impl Interner {
    pub(crate) fn intern(&mut self, label: &Label) -> u32 {
        if let Some(id) = self.index.get(label) {
            return *id;
        }
        let id = self.labels.len() as u32;
        self.labels.push(label.clone());
        self.index.insert(label.clone(), id);
        if let Err(at) = self.sorted.binary_search(label) {
            self.sorted.insert(at, label.clone());
        }
        id
    }

    pub(crate) fn get(&self, label: &Label) -> Option<u32> {
        self.index.get(label).copied()
    }

    pub(crate) fn label(&self, id: u32) -> &Label {
        &self.labels[id as usize]
    }

    pub(crate) fn len(&self) -> usize {
        self.labels.len()
    }

    pub(crate) fn sorted(&self) -> &[Label] {
        &self.sorted
    }
}

/// Cartesian product of sorted aspect domains; yields `[[]]` for no aspects.
pub(crate) fn cartesian(domains: &[Vec<Label>]) -> Vec<Vec<Label>> {
    domains.iter().fold(vec![Vec::new()], |acc, domain| {
        acc.iter()
            .flat_map(|prefix| {
                domain.iter().map(move |label| {
                    let mut tuple = prefix.clone();
                    tuple.push(label.clone());
                    tuple
                })
            })
            .collect()
    })
}
