// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
Population/projection system.

A `System` is the directed graph the network is derived from: one node per
modeled population plus a single input population, one edge per feedforward
projection. It must stay acyclic.
*/

use crate::types::{ArchitectureError, ArchitectureResult};
use corticonv_anatomy::AnatomicalModel;
use corticonv_config::ArchitectureConfig;
use corticonv_structures::{AreaId, ConnectionRecord, CorticalLayer, LaminarPattern, LayerPopulation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};
use tracing::{debug, info, warn};

/// Node of the system: a layer population, or the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub name: String,
    /// `None` for the input population
    pub area: Option<AreaId>,
    pub layer: Option<CorticalLayer>,
    /// Neuron count
    pub n: f64,
}

/// Edge of the system, by population index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub origin: usize,
    pub termination: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct System {
    input: Option<usize>,
    populations: Vec<Population>,
    projections: Vec<Projection>,
    index: HashMap<String, usize>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the single input population
    pub fn add_input(&mut self, name: &str, n: f64) -> ArchitectureResult<usize> {
        if let Some(existing) = self.input {
            return Err(ArchitectureError::DuplicateInput(
                self.populations[existing].name.clone(),
            ));
        }
        let index = self.push(Population {
            name: name.to_string(),
            area: None,
            layer: None,
            n,
        })?;
        self.input = Some(index);
        Ok(index)
    }

    pub fn add_population(&mut self, population: &LayerPopulation) -> ArchitectureResult<usize> {
        self.push(Population {
            name: population.name(),
            area: Some(population.area.clone()),
            layer: Some(population.layer),
            n: population.neuron_count,
        })
    }

    fn push(&mut self, population: Population) -> ArchitectureResult<usize> {
        if self.index.contains_key(&population.name) {
            return Err(ArchitectureError::DuplicatePopulation(population.name));
        }
        let index = self.populations.len();
        self.index.insert(population.name.clone(), index);
        self.populations.push(population);
        Ok(index)
    }

    /// Add a projection between two named populations
    pub fn connect(&mut self, origin: &str, termination: &str) -> ArchitectureResult<usize> {
        let o = self
            .find_population_index(origin)
            .ok_or_else(|| ArchitectureError::UnknownPopulation(origin.to_string()))?;
        let t = self
            .find_population_index(termination)
            .ok_or_else(|| ArchitectureError::UnknownPopulation(termination.to_string()))?;
        if self.projection_between(o, t).is_some() {
            return Err(ArchitectureError::DuplicateProjection {
                origin: origin.to_string(),
                termination: termination.to_string(),
            });
        }
        self.projections.push(Projection {
            origin: o,
            termination: t,
        });
        Ok(self.projections.len() - 1)
    }

    pub fn find_population_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn find_projection_index(&self, origin: &str, termination: &str) -> Option<usize> {
        let o = self.find_population_index(origin)?;
        let t = self.find_population_index(termination)?;
        self.projection_between(o, t)
    }

    pub fn projection_between(&self, origin: usize, termination: usize) -> Option<usize> {
        self.projections
            .iter()
            .position(|p| p.origin == origin && p.termination == termination)
    }

    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    pub fn population(&self, index: usize) -> Option<&Population> {
        self.populations.get(index)
    }

    pub fn input_index(&self) -> Option<usize> {
        self.input
    }

    pub fn input(&self) -> Option<&Population> {
        self.input.map(|i| &self.populations[i])
    }

    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    pub fn predecessors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.projections
            .iter()
            .filter(move |p| p.termination == index)
            .map(|p| p.origin)
    }

    pub fn successors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.projections
            .iter()
            .filter(move |p| p.origin == index)
            .map(|p| p.termination)
    }

    /// Every population with a path to `index`
    pub fn ancestors(&self, index: usize) -> BTreeSet<usize> {
        self.reach(index, |s, i| s.predecessors(i).collect())
    }

    /// Every population reachable from `index`
    pub fn descendants(&self, index: usize) -> BTreeSet<usize> {
        self.reach(index, |s, i| s.successors(i).collect())
    }

    fn reach<F>(&self, start: usize, next: F) -> BTreeSet<usize>
    where
        F: Fn(&Self, usize) -> Vec<usize>,
    {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for neighbour in next(self, current) {
                if seen.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
        seen.remove(&start);
        seen
    }

    /// Populations in dependency order (lowest index first among ready nodes)
    ///
    /// # Errors
    ///
    /// Returns `ArchitectureError::Cycle` naming a population on a cycle
    pub fn topological_order(&self) -> ArchitectureResult<Vec<usize>> {
        let mut in_degree = vec![0usize; self.populations.len()];
        for p in &self.projections {
            in_degree[p.termination] += 1;
        }
        let mut ready: BTreeSet<usize> = (0..self.populations.len())
            .filter(|i| in_degree[*i] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.populations.len());
        while let Some(current) = ready.pop_first() {
            order.push(current);
            for next in self.successors(current) {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.insert(next);
                }
            }
        }

        if order.len() < self.populations.len() {
            let stuck = (0..self.populations.len())
                .find(|i| in_degree[*i] > 0)
                .map(|i| self.populations[i].name.clone())
                .unwrap_or_default();
            return Err(ArchitectureError::Cycle(stuck));
        }
        Ok(order)
    }

    /// Longest path (in projections) using only the projections where `mask` is true
    ///
    /// Returns population indices along the path; empty when no projection is selected.
    pub fn longest_path(&self, mask: &[bool]) -> ArchitectureResult<Vec<usize>> {
        if mask.len() != self.projections.len() {
            return Err(ArchitectureError::InvalidParameters(format!(
                "projection mask has {} entries for {} projections",
                mask.len(),
                self.projections.len()
            )));
        }

        let order = self.topological_order()?;
        let mut length = vec![0usize; self.populations.len()];
        let mut previous: Vec<Option<usize>> = vec![None; self.populations.len()];

        for &node in &order {
            for (j, projection) in self.projections.iter().enumerate() {
                if !mask[j] || projection.origin != node {
                    continue;
                }
                let candidate = length[node] + 1;
                if candidate > length[projection.termination] {
                    length[projection.termination] = candidate;
                    previous[projection.termination] = Some(node);
                }
            }
        }

        let Some(end) = order
            .iter()
            .copied()
            .filter(|i| length[*i] > 0)
            .max_by(|a, b| length[*a].cmp(&length[*b]).then(b.cmp(a)))
        else {
            return Ok(Vec::new());
        };

        let mut path = vec![end];
        let mut current = end;
        while let Some(prev) = previous[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Ok(path)
    }

    /// Drop populations the input cannot reach; returns their names
    pub fn retain_reachable_from_input(&mut self) -> ArchitectureResult<Vec<String>> {
        let input = self.input.ok_or(ArchitectureError::MissingInput)?;
        let mut keep = self.descendants(input);
        keep.insert(input);
        if keep.len() == self.populations.len() {
            return Ok(Vec::new());
        }

        let mut remap = vec![None; self.populations.len()];
        let mut populations = Vec::with_capacity(keep.len());
        let mut dropped = Vec::new();
        for (old, population) in std::mem::take(&mut self.populations).into_iter().enumerate() {
            if keep.contains(&old) {
                remap[old] = Some(populations.len());
                populations.push(population);
            } else {
                dropped.push(population.name);
            }
        }

        self.projections = self
            .projections
            .iter()
            .filter_map(|p| {
                Some(Projection {
                    origin: remap[p.origin]?,
                    termination: remap[p.termination]?,
                })
            })
            .collect();
        self.index = populations
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        self.input = remap[input];
        self.populations = populations;
        Ok(dropped)
    }
}

/// Builds a [`System`] from an anatomical model
pub struct SystemBuilder;

impl SystemBuilder {
    /// One population per layer population, the input, feedforward
    /// inter-areal projections and optional intra-areal projections
    pub fn from_model(model: &AnatomicalModel, config: &ArchitectureConfig) -> ArchitectureResult<System> {
        let mut system = System::new();
        system.add_input(&config.input_name, config.input_neurons)?;
        for population in model.populations() {
            system.add_population(population)?;
        }
        if system.len() < 2 {
            return Err(ArchitectureError::EmptySystem);
        }

        for target in &config.input_targets {
            system.connect(&config.input_name, target)?;
        }

        if config.intra_areal {
            for area in model.areas() {
                connect_intra_areal(&mut system, &area.id)?;
            }
        }

        let mut kept = 0usize;
        for connection in model.connections() {
            if connection.flne.value() < config.min_flne {
                debug!(
                    "[SYSTEM] Skipping {} -> {}: FLNe {} below {}",
                    connection.source,
                    connection.target,
                    connection.flne.value(),
                    config.min_flne
                );
                continue;
            }
            if !is_feedforward(model, connection) {
                debug!(
                    "[SYSTEM] Skipping {} -> {}: not feedforward",
                    connection.source, connection.target
                );
                continue;
            }
            kept += connect_inter_areal(&mut system, connection)?;
        }

        for name in system.retain_reachable_from_input()? {
            warn!("[SYSTEM] Dropping {}: not reachable from {}", name, config.input_name);
        }
        if system.len() < 2 {
            return Err(ArchitectureError::EmptySystem);
        }
        system.topological_order()?;

        info!(
            "[SYSTEM] {} populations, {} projections ({} inter-areal)",
            system.len(),
            system.projections().len(),
            kept
        );
        Ok(system)
    }
}

/// Feedforward when the hierarchy says so; otherwise judged by laminar origin
pub fn is_feedforward(model: &AnatomicalModel, connection: &ConnectionRecord) -> bool {
    let level = |id: &AreaId| model.area(id).and_then(|a| a.hierarchy_level);
    match (level(&connection.source), level(&connection.target)) {
        (Some(source), Some(target)) => source < target,
        _ => connection
            .laminar
            .is_some_and(|pattern| pattern.is_supragranular_origin()),
    }
}

fn population_name(area: &AreaId, layer: CorticalLayer) -> String {
    format!("{}_{}", area, layer.short_label())
}

fn connect_intra_areal(system: &mut System, area: &AreaId) -> ArchitectureResult<()> {
    const CHAIN: [(CorticalLayer, CorticalLayer); 2] = [
        (CorticalLayer::L4, CorticalLayer::L2_3),
        (CorticalLayer::L2_3, CorticalLayer::L5),
    ];
    for (from, to) in CHAIN {
        let origin = population_name(area, from);
        let termination = population_name(area, to);
        if system.find_population_index(&origin).is_some()
            && system.find_population_index(&termination).is_some()
        {
            system.connect(&origin, &termination)?;
        }
    }
    Ok(())
}

/// Missing pattern or side falls back to the default `L2/3 -> L4`
fn laminar_or_default(laminar: Option<LaminarPattern>) -> LaminarPattern {
    let default = LaminarPattern::default_feedforward();
    let mut pattern = laminar.unwrap_or(default);
    if pattern.origin.is_empty() {
        pattern.origin = default.origin;
    }
    if pattern.termination.is_empty() {
        pattern.termination = default.termination;
    }
    pattern
}

fn connect_inter_areal(system: &mut System, connection: &ConnectionRecord) -> ArchitectureResult<usize> {
    let pattern = laminar_or_default(connection.laminar);
    let mut added = 0;
    for from in pattern.origin.iter() {
        let origin = population_name(&connection.source, from);
        if system.find_population_index(&origin).is_none() {
            continue;
        }
        for to in pattern.termination.iter() {
            let termination = population_name(&connection.target, to);
            if system.find_population_index(&termination).is_some() {
                system.connect(&origin, &termination)?;
                added += 1;
            }
        }
    }
    if added == 0 {
        warn!(
            "[SYSTEM] Dropping {} -> {}: no modeled populations in laminar pattern {}/{}",
            connection.source, connection.target, pattern.origin, pattern.termination
        );
    }
    Ok(added)
}
