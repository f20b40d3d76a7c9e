use std::collections::BTreeSet;
use std::ops::Range;

use mlnet_core::errors::MlnError;
use mlnet_core::rng::RngHandle;
use mlnet_core::Network;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::SamplerConfig;
use crate::requirement::Bounds;
use crate::subgraph::{Subgraph, SupraIndex};

/// Receives every accepted subgraph; an error aborts the run.
pub type Sink<'s> = dyn FnMut(Subgraph) -> Result<(), MlnError> + 's;

/// Extra acceptance predicate applied after the requirement.
pub type Check<'a> = dyn Fn(&Subgraph) -> bool + 'a;

/// Counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsuStats {
    /// Seed node-layers whose subtree was explored.
    pub seeds: usize,
    /// Connected node-layer sets visited.
    pub visited: usize,
    /// Subgraphs handed to the sink.
    pub emitted: usize,
}

/// Multilayer ESU enumerator over a single-aspect network.
///
/// The search grows connected node-layer sets from each seed in supra order,
/// extending only with node-layers numbered above the seed that are not
/// already adjacent to the set. A set is reported when it contains every
/// node-layer on the product of its nodes and layers, so each induced
/// subgraph is found once, from its lowest-numbered node-layer.
///
/// Depth in the search tree counts nodes and layers: a seed node-layer sits
/// at depth 0 and every node or layer a step brings into the subgraph
/// descends one level, so a subgraph on `n` nodes and `l` layers lives at
/// depth `n + l - 2`. With sampling probabilities, entering depth `d` is kept
/// with probability `p[d]` and such a subgraph is reported with probability
/// `p[0] * ... * p[n + l - 2]`.
pub struct Esu<'a> {
    index: SupraIndex,
    config: SamplerConfig,
    bounds: Bounds,
    check: Option<Box<Check<'a>>>,
}

impl<'a> Esu<'a> {
    /// Indexes `net` and validates `config`.
    pub fn new<N: Network + ?Sized>(net: &N, config: SamplerConfig) -> Result<Self, MlnError> {
        let bounds = config.validate()?;
        let index = SupraIndex::new(net)?;
        Ok(Self {
            index,
            config,
            bounds,
            check: None,
        })
    }

    /// Adds a predicate every reported subgraph must also satisfy.
    pub fn with_check(mut self, check: impl Fn(&Subgraph) -> bool + 'a) -> Self {
        self.check = Some(Box::new(check));
        self
    }

    /// Count bounds derived from the requirement.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Runs with the configured seed.
    pub fn run(&self, sink: &mut Sink<'_>) -> Result<EsuStats, MlnError> {
        self.run_seeded(self.config.seed, sink)
    }

    /// Runs with an explicit RNG seed, leaving the configuration untouched.
    pub fn run_seeded(&self, seed: u64, sink: &mut Sink<'_>) -> Result<EsuStats, MlnError> {
        let mut search = Search {
            esu: self,
            rng: RngHandle::from_seed(seed),
            stats: EsuStats::default(),
        };
        for v in 0..self.index.len() {
            if !search.gate(0..1) {
                continue;
            }
            search.stats.seeds += 1;
            let covered: BTreeSet<usize> = std::iter::once(v)
                .chain(self.index.neighbours(v).iter().copied())
                .collect();
            let extension: BTreeSet<usize> = self
                .index
                .neighbours(v)
                .iter()
                .copied()
                .filter(|&u| u > v)
                .collect();
            let mut members = vec![v];
            if search.admissible(v, &members).is_some() {
                search.extend(v, &mut members, extension, &covered, sink)?;
            }
        }
        let stats = search.stats;
        debug!(
            node_layers = self.index.len(),
            seeds = stats.seeds,
            visited = stats.visited,
            emitted = stats.emitted,
            sampled = self.config.p.is_some(),
            "esu run finished"
        );
        Ok(stats)
    }

    /// Collects every reported subgraph in discovery order.
    pub fn collect(&self) -> Result<Vec<Subgraph>, MlnError> {
        let mut found = Vec::new();
        self.run(&mut |subgraph| {
            found.push(subgraph);
            Ok(())
        })?;
        Ok(found)
    }
}

struct Search<'e, 'a> {
    esu: &'e Esu<'a>,
    rng: RngHandle,
    stats: EsuStats,
}

impl Search<'_, '_> {
    /// Keeps the descent through `depths` with probability `p[d]` per level.
    fn gate(&mut self, depths: Range<usize>) -> bool {
        let esu = self.esu;
        let Some(p) = &esu.config.p else {
            return true;
        };
        depths.into_iter().all(|depth| match p.get(depth) {
            Some(&keep) if keep >= 1.0 => true,
            Some(&keep) => self.rng.bernoulli(keep),
            None => false,
        })
    }

    /// Node plus layer count of `members` if some superset of them can still
    /// be reported from seed `v`.
    fn admissible(&self, v: usize, members: &[usize]) -> Option<usize> {
        let (nodes, layers) = self.esu.index.project(members);
        let bounds = &self.esu.bounds;
        let fits = nodes.len() <= bounds.max_nodes
            && layers.len() <= bounds.max_layers
            && self
                .esu
                .index
                .closure(&nodes, &layers)
                .first()
                .map_or(true, |&lowest| lowest >= v);
        fits.then(|| nodes.len() + layers.len())
    }

    fn visit(&mut self, members: &[usize], sink: &mut Sink<'_>) -> Result<(), MlnError> {
        self.stats.visited += 1;
        let index = &self.esu.index;
        let (nodes, layers) = index.project(members);
        if !self.esu.bounds.admits(nodes.len(), layers.len()) {
            return Ok(());
        }
        if index.closure(&nodes, &layers).len() != members.len() {
            return Ok(());
        }
        let mut sorted = members.to_vec();
        sorted.sort_unstable();
        let profile = index.layer_profile(&sorted, &layers);
        if !self.esu.config.requirement.accepts(self.esu.config.mode, &profile) {
            return Ok(());
        }
        let subgraph = index.subgraph(&nodes, &layers);
        if let Some(check) = &self.esu.check {
            if !check(&subgraph) {
                return Ok(());
            }
        }
        trace!(nodes = ?subgraph.nodes, layers = ?subgraph.layers, "esu hit");
        self.stats.emitted += 1;
        sink(subgraph)
    }

    fn extend(
        &mut self,
        v: usize,
        members: &mut Vec<usize>,
        mut extension: BTreeSet<usize>,
        covered: &BTreeSet<usize>,
        sink: &mut Sink<'_>,
    ) -> Result<(), MlnError> {
        self.visit(members, sink)?;
        if members.len() >= self.esu.bounds.max_node_layers {
            return Ok(());
        }
        let span = self.esu.index.span(members);
        while let Some(w) = extension.pop_first() {
            members.push(w);
            let descend = match self.admissible(v, members) {
                Some(grown) => self.gate(span - 1..grown - 1),
                None => false,
            };
            if descend {
                let mut next_extension = extension.clone();
                let mut next_covered = covered.clone();
                for &u in self.esu.index.neighbours(w) {
                    if u > v && !covered.contains(&u) {
                        next_extension.insert(u);
                    }
                    next_covered.insert(u);
                }
                self.extend(v, members, next_extension, &next_covered, sink)?;
            }
            members.pop();
        }
        Ok(())
    }
}

/// Enumerates (or samples) the subgraphs of `net` accepted by `config`.
pub fn sample<N: Network + ?Sized>(
    net: &N,
    config: &SamplerConfig,
    sink: &mut Sink<'_>,
) -> Result<EsuStats, MlnError> {
    Esu::new(net, config.clone())?.run(sink)
}

/// Enumerates (or samples) the subgraphs of `net` into a vector.
pub fn sample_to_vec<N: Network + ?Sized>(
    net: &N,
    config: &SamplerConfig,
) -> Result<Vec<Subgraph>, MlnError> {
    Esu::new(net, config.clone())?.collect()
}
