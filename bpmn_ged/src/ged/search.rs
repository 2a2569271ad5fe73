use crate::ged::cost::{checked_cost, CostModelError, GEDCostModel};
use crate::model::bpmn_graph_struct::BpmnGraph;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

///
/// Error encountered during the GED search
///
#[derive(Debug, Clone)]
pub enum GEDSearchError {
    /// The time budget ran out before any complete edit path was found
    Timeout,
    /// A cost function of the supplied cost model misbehaved
    CostModel(CostModelError),
}

impl std::fmt::Display for GEDSearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GEDSearchError::Timeout => {
                write!(f, "GED search time budget exhausted without a complete edit path")
            }
            GEDSearchError::CostModel(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GEDSearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GEDSearchError::CostModel(e) => Some(e),
            GEDSearchError::Timeout => None,
        }
    }
}

impl From<CostModelError> for GEDSearchError {
    fn from(e: CostModelError) -> Self {
        Self::CostModel(e)
    }
}

///
/// Options for the GED search
///
#[derive(Debug, Clone, Copy, Default)]
pub struct GEDSearchOptions {
    /// Wall-clock budget for a single comparison; `None` searches to optimality.
    ///
    /// The budget is polled at every frontier expansion, so it is honored
    /// responsively also on large graphs, but the search never suspends:
    /// control returns to the caller only when the search returns.
    pub time_budget: Option<Duration>,
}

impl GEDSearchOptions {
    /// Options with the given wall-clock time budget
    pub fn with_time_budget(time_budget: Duration) -> Self {
        Self {
            time_budget: Some(time_budget),
        }
    }
}

///
/// Result of a GED computation
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GEDResult {
    /// Total cost of the best edit sequence found
    pub cost: f64,
    /// Whether `cost` was proven minimal. `false` means the time budget ran
    /// out first and `cost` is only an upper bound.
    pub exact: bool,
}

/// Fate of a graph-1 node on a (partial) edit path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    /// Mapped onto the graph-2 node with the given index
    Substituted(usize),
    /// Deleted from graph 1
    Deleted,
}

///
/// A partial edit path: decisions for a prefix of the fixed graph-1 node
/// order, the set of graph-2 nodes already claimed as substitution targets,
/// the real cost accumulated so far, and an admissible lower bound for the
/// undecided remainder.
///
#[derive(Debug, Clone)]
struct EditPath {
    decisions: Vec<Decision>,
    g2_used: Vec<bool>,
    cost: f64,
    bound: f64,
    seq: u64,
}

/// Frontier entry; orders the underlying max-heap so that the cheapest
/// (`cost + bound`) path is popped first, ties broken by most decisions
/// first, then by insertion sequence number for reproducible results.
#[derive(Debug)]
struct FrontierEntry(EditPath);

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        OrderedFloat(other.0.cost + other.0.bound)
            .cmp(&OrderedFloat(self.0.cost + self.0.bound))
            .then_with(|| self.0.decisions.len().cmp(&other.0.decisions.len()))
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

const NO_EDGES: &[usize] = &[];

/// Precomputed, per-comparison search state
struct SearchContext<'a, C> {
    g1: &'a BpmnGraph,
    g2: &'a BpmnGraph,
    model: &'a C,
    /// Graph-1 node indexes in decision order (decreasing degree, ties by ID)
    order: Vec<usize>,
    /// `rank[i]` = position of graph-1 node `i` in `order`
    rank: Vec<usize>,
    /// Node substitution costs, `subst[g1 node][g2 node]`
    subst: Vec<Vec<f64>>,
    delete: Vec<f64>,
    insert: Vec<f64>,
    /// Edge indexes by directed node-index pair, per graph
    pair_edges1: HashMap<(usize, usize), Vec<usize>>,
    pair_edges2: HashMap<(usize, usize), Vec<usize>>,
    /// Edge endpoints as node indexes, per graph
    ends2: Vec<(usize, usize)>,
}

impl<'a, C: GEDCostModel> SearchContext<'a, C> {
    fn new(g1: &'a BpmnGraph, g2: &'a BpmnGraph, model: &'a C) -> Result<Self, CostModelError> {
        let n1 = g1.node_count();
        let n2 = g2.node_count();

        // Deciding high-degree nodes first makes edge costs concrete early,
        // which tightens pruning.
        let order: Vec<usize> = (0..n1)
            .sorted_by_key(|&i| {
                let node = &g1.nodes()[i];
                (Reverse(g1.degree(&node.id)), node.id.clone())
            })
            .collect();
        let mut rank = vec![0usize; n1];
        for (pos, &i) in order.iter().enumerate() {
            rank[i] = pos;
        }

        // Evaluating all node-level costs up front surfaces most cost model
        // misconfigurations before any search work.
        let mut subst = vec![vec![0.0; n2]; n1];
        for (i, a) in g1.nodes().iter().enumerate() {
            for (j, b) in g2.nodes().iter().enumerate() {
                subst[i][j] =
                    checked_cost("node substitution", model.node_substitution_cost(a, b))?;
            }
        }
        let delete = g1
            .nodes()
            .iter()
            .map(|n| checked_cost("node deletion", model.node_deletion_cost(n)))
            .collect::<Result<Vec<_>, _>>()?;
        let insert = g2
            .nodes()
            .iter()
            .map(|n| checked_cost("node insertion", model.node_insertion_cost(n)))
            .collect::<Result<Vec<_>, _>>()?;

        let index_edges = |g: &BpmnGraph| {
            let mut pairs: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
            let mut ends = Vec::with_capacity(g.edge_count());
            for (e, edge) in g.edges().iter().enumerate() {
                // Endpoints exist: the graph was validated at construction
                let s = g.node_position(&edge.source).expect("validated edge source");
                let t = g.node_position(&edge.target).expect("validated edge target");
                pairs.entry((s, t)).or_default().push(e);
                ends.push((s, t));
            }
            (pairs, ends)
        };
        let (pair_edges1, _ends1) = index_edges(g1);
        let (pair_edges2, ends2) = index_edges(g2);

        Ok(Self {
            g1,
            g2,
            model,
            order,
            rank,
            subst,
            delete,
            insert,
            pair_edges1,
            pair_edges2,
            ends2,
        })
    }

    fn edges1(&self, from: usize, to: usize) -> &[usize] {
        self.pair_edges1
            .get(&(from, to))
            .map(Vec::as_slice)
            .unwrap_or(NO_EDGES)
    }

    fn edges2(&self, from: usize, to: usize) -> &[usize] {
        self.pair_edges2
            .get(&(from, to))
            .map(Vec::as_slice)
            .unwrap_or(NO_EDGES)
    }

    fn edge_deletion(&self, e: usize) -> Result<f64, CostModelError> {
        checked_cost(
            "edge deletion",
            self.model.edge_deletion_cost(&self.g1.edges()[e]),
        )
    }

    fn edge_insertion(&self, e: usize) -> Result<f64, CostModelError> {
        checked_cost(
            "edge insertion",
            self.model.edge_insertion_cost(&self.g2.edges()[e]),
        )
    }

    fn edge_substitution(&self, e1: usize, e2: usize) -> Result<f64, CostModelError> {
        checked_cost(
            "edge substitution",
            self.model
                .edge_substitution_cost(&self.g1.edges()[e1], &self.g2.edges()[e2]),
        )
    }

    /// Cheapest way to turn the parallel-edge multiset `a` (graph 1) into
    /// `b` (graph 2): each graph-1 edge is either substituted by a not yet
    /// claimed graph-2 edge or deleted, leftover graph-2 edges are inserted.
    /// The pairing is solved exhaustively, not greedily: a locally cheapest
    /// pair can force an expensive leftover pair under caller-supplied cost
    /// models. The multisets hold the parallel edges between one ordered
    /// node pair, so they are tiny.
    fn multiset_edge_cost(&self, a: &[usize], b: &[usize]) -> Result<f64, CostModelError> {
        let del = a
            .iter()
            .map(|&e| self.edge_deletion(e))
            .collect::<Result<Vec<_>, _>>()?;
        let ins = b
            .iter()
            .map(|&e| self.edge_insertion(e))
            .collect::<Result<Vec<_>, _>>()?;
        let mut pair = vec![vec![0.0; b.len()]; a.len()];
        for (i, &e1) in a.iter().enumerate() {
            for (j, &e2) in b.iter().enumerate() {
                pair[i][j] = self.edge_substitution(e1, e2)?.min(del[i] + ins[j]);
            }
        }
        let mut claimed = vec![false; b.len()];
        Ok(cheapest_pairing(&pair, &del, &ins, 0, &mut claimed))
    }

    /// Incremental edge cost of mapping graph-1 node `u` onto graph-2 node
    /// `v`. Every edge between `u`/`v` and an already-decided node on either
    /// side has both endpoint fates known now and is charged here, exactly
    /// once.
    fn mapping_edge_cost(
        &self,
        path: &EditPath,
        u: usize,
        v: usize,
    ) -> Result<f64, CostModelError> {
        let mut delta = 0.0;
        for (i, decision) in path.decisions.iter().enumerate() {
            let w = self.order[i];
            match *decision {
                Decision::Deleted => {
                    for &e in self.edges1(u, w).iter().chain(self.edges1(w, u)) {
                        delta += self.edge_deletion(e)?;
                    }
                }
                Decision::Substituted(w2) => {
                    delta += self.multiset_edge_cost(self.edges1(u, w), self.edges2(v, w2))?;
                    delta += self.multiset_edge_cost(self.edges1(w, u), self.edges2(w2, v))?;
                }
            }
        }
        // Self-loops become decidable the moment their single node does
        delta += self.multiset_edge_cost(self.edges1(u, u), self.edges2(v, v))?;
        Ok(delta)
    }

    /// Incremental edge cost of deleting graph-1 node `u`: all of its edges
    /// towards already-decided nodes (and its self-loops) are deleted.
    fn deletion_edge_cost(&self, path: &EditPath, u: usize) -> Result<f64, CostModelError> {
        let mut delta = 0.0;
        for i in 0..path.decisions.len() {
            let w = self.order[i];
            for &e in self.edges1(u, w).iter().chain(self.edges1(w, u)) {
                delta += self.edge_deletion(e)?;
            }
        }
        for &e in self.edges1(u, u) {
            delta += self.edge_deletion(e)?;
        }
        Ok(delta)
    }

    /// Final step once every graph-1 node is decided: insert every unclaimed
    /// graph-2 node, and every graph-2 edge with at least one inserted
    /// endpoint (edges between two mapped nodes were charged during mapping).
    fn completion_cost(&self, path: &EditPath) -> Result<f64, CostModelError> {
        let mut total = 0.0;
        for (v, &used) in path.g2_used.iter().enumerate() {
            if !used {
                total += self.insert[v];
            }
        }
        for (e, &(s, t)) in self.ends2.iter().enumerate() {
            if !path.g2_used[s] || !path.g2_used[t] {
                total += self.edge_insertion(e)?;
            }
        }
        Ok(total)
    }

    /// Complete a partial path without further search: delete the whole
    /// undecided graph-1 remainder, insert the whole unclaimed graph-2
    /// remainder. Used as the fallback when the time budget runs out before
    /// any complete path was found.
    fn insertion_only_completion(&self, path: &EditPath) -> Result<f64, CostModelError> {
        let depth = path.decisions.len();
        let mut total = path.cost;
        for &u in &self.order[depth..] {
            total += self.delete[u];
        }
        for (e, edge) in self.g1.edges().iter().enumerate() {
            let s = self.rank[self.g1.node_position(&edge.source).expect("validated edge source")];
            let t = self.rank[self.g1.node_position(&edge.target).expect("validated edge target")];
            // Edges between two decided nodes are already part of path.cost
            if s >= depth || t >= depth {
                total += self.edge_deletion(e)?;
            }
        }
        for (v, &used) in path.g2_used.iter().enumerate() {
            if !used {
                total += self.insert[v];
            }
        }
        for (e, &(s, t)) in self.ends2.iter().enumerate() {
            if !path.g2_used[s] || !path.g2_used[t] {
                total += self.edge_insertion(e)?;
            }
        }
        Ok(total)
    }

    /// Admissible lower bound for the undecided remainder: per undecided
    /// graph-1 node the cheapest of deletion and any remaining substitution,
    /// plus the cheapest surplus insertions when more graph-2 nodes remain
    /// unclaimed than graph-1 nodes undecided. Edge interactions are ignored
    /// (they are only ever added as nodes are decided), so the estimate never
    /// overshoots the true remaining cost.
    fn lower_bound(&self, depth: usize, g2_used: &[bool]) -> f64 {
        let unused: Vec<usize> = (0..g2_used.len()).filter(|&v| !g2_used[v]).collect();
        let undecided = &self.order[depth..];
        let mut bound = 0.0;
        for &u in undecided {
            let mut best = self.delete[u];
            for &v in &unused {
                if self.subst[u][v] < best {
                    best = self.subst[u][v];
                }
            }
            bound += best;
        }
        if unused.len() > undecided.len() {
            let surplus = unused.len() - undecided.len();
            let mut inserts: Vec<f64> = unused.iter().map(|&v| self.insert[v]).collect();
            inserts.sort_by_key(|&c| OrderedFloat(c));
            bound += inserts[..surplus].iter().sum::<f64>();
        }
        bound
    }
}

/// Minimum cost of deciding the fates of the multiset edges `i..`: each one
/// is paired with a still-unclaimed counterpart edge (cost `pair[i][j]`) or
/// deleted, and every counterpart left unclaimed at the end is inserted.
fn cheapest_pairing(
    pair: &[Vec<f64>],
    del: &[f64],
    ins: &[f64],
    i: usize,
    claimed: &mut [bool],
) -> f64 {
    if i == pair.len() {
        return claimed
            .iter()
            .zip(ins)
            .filter(|(claimed, _)| !**claimed)
            .map(|(_, c)| c)
            .sum();
    }
    let mut best = del[i] + cheapest_pairing(pair, del, ins, i + 1, claimed);
    for j in 0..claimed.len() {
        if claimed[j] {
            continue;
        }
        claimed[j] = true;
        let cost = pair[i][j] + cheapest_pairing(pair, del, ins, i + 1, claimed);
        claimed[j] = false;
        if cost < best {
            best = cost;
        }
    }
    best
}

///
/// Compute the graph edit distance between `g1` and `g2` under the given
/// cost model
///
/// Best-first branch-and-bound over partial node mappings: the frontier is a
/// priority queue of [partial edit paths](EditPath) ordered by accumulated
/// cost plus an admissible lower bound, so the first time the frontier runs
/// empty the best complete path found is provably minimal. Results are
/// deterministic for fixed inputs.
///
/// With a [time budget](GEDSearchOptions::time_budget), the search instead
/// returns the best complete path found so far as an upper bound
/// ([`GEDResult::exact`]` == false`) once the budget runs out, completing the
/// cheapest frontier path by plain deletions/insertions if necessary.
/// [`GEDSearchError::Timeout`] is only reported when not even that fallback
/// produced a usable bound.
///
pub fn compute_ged<C: GEDCostModel>(
    g1: &BpmnGraph,
    g2: &BpmnGraph,
    model: &C,
    options: &GEDSearchOptions,
) -> Result<GEDResult, GEDSearchError> {
    let ctx = SearchContext::new(g1, g2, model)?;
    let start = Instant::now();
    let mut seq: u64 = 0;

    let g2_unused = vec![false; g2.node_count()];
    let root = EditPath {
        cost: 0.0,
        bound: ctx.lower_bound(0, &g2_unused),
        decisions: Vec::new(),
        g2_used: g2_unused,
        seq,
    };
    let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
    frontier.push(FrontierEntry(root));
    let mut incumbent: Option<f64> = None;

    while let Some(FrontierEntry(path)) = frontier.pop() {
        if let Some(budget) = options.time_budget {
            if start.elapsed() >= budget {
                let cost = match incumbent {
                    Some(best) => best,
                    None => ctx.insertion_only_completion(&path)?,
                };
                return Ok(GEDResult { cost, exact: false });
            }
        }
        if incumbent.is_some_and(|best| path.cost + path.bound >= best) {
            continue;
        }
        if path.decisions.len() == ctx.order.len() {
            let total = path.cost + ctx.completion_cost(&path)?;
            if incumbent.map_or(true, |best| total < best) {
                incumbent = Some(total);
            }
            continue;
        }

        let u = ctx.order[path.decisions.len()];
        for v in 0..g2.node_count() {
            if path.g2_used[v] {
                continue;
            }
            let mut child = path.clone();
            child.decisions.push(Decision::Substituted(v));
            child.g2_used[v] = true;
            child.cost = path.cost + ctx.subst[u][v] + ctx.mapping_edge_cost(&path, u, v)?;
            child.bound = ctx.lower_bound(child.decisions.len(), &child.g2_used);
            seq += 1;
            child.seq = seq;
            if incumbent.map_or(true, |best| child.cost + child.bound < best) {
                frontier.push(FrontierEntry(child));
            }
        }
        let mut child = path.clone();
        child.decisions.push(Decision::Deleted);
        child.cost = path.cost + ctx.delete[u] + ctx.deletion_edge_cost(&path, u)?;
        child.bound = ctx.lower_bound(child.decisions.len(), &child.g2_used);
        seq += 1;
        child.seq = seq;
        if incumbent.map_or(true, |best| child.cost + child.bound < best) {
            frontier.push(FrontierEntry(child));
        }
    }

    match incumbent {
        Some(cost) => Ok(GEDResult { cost, exact: true }),
        // The root path always completes, so an empty frontier without an
        // incumbent cannot occur; kept as an error instead of a panic.
        None => Err(GEDSearchError::Timeout),
    }
}

///
/// Closed-form `ged(G, ∅)`: with no substitution targets available, the
/// distance of a graph to the empty graph is exactly the sum of the deletion
/// costs of all of its nodes and edges. No search required.
///
pub fn distance_to_empty<C: GEDCostModel>(
    g: &BpmnGraph,
    model: &C,
) -> Result<f64, CostModelError> {
    let mut total = 0.0;
    for node in g.nodes() {
        total += checked_cost("node deletion", model.node_deletion_cost(node))?;
    }
    for edge in g.edges() {
        total += checked_cost("edge deletion", model.edge_deletion_cost(edge))?;
    }
    Ok(total)
}
