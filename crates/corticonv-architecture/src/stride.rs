// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
Integer stride patterns.

Strides are integers with small optimal values, so they are not fitted as
floats and rounded. Instead random candidate patterns are drawn and the one
closest to the anatomical hints is kept:

1. Start with every stride unset (input cumulative stride = 1).
2. While a stride is unset: take the longest path made only of unset
   projections and draw strides along it, rejecting draws whose cumulative
   strides leave their bounds or disagree with strides already fixed.
3. Tighten the cumulative bounds of every population from its ancestors and
   descendants.

Every population must be reachable from the input.
*/

use crate::system::System;
use crate::types::{ArchitectureError, ArchitectureResult};
use corticonv_anatomy::AnatomicalModel;
use corticonv_config::ArchitectureConfig;
use corticonv_structures::AreaId;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Search parameters for [`get_stride_pattern`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrideSearch {
    /// Upper bound on any cumulative stride (keeps late feature maps above one pixel)
    pub max_cumulative_stride: u32,
    pub min_stride: u32,
    /// Number of candidates drawn
    pub best_of: usize,
    /// Draws per path before the path fails
    pub max_attempts: usize,
}

impl StrideSearch {
    pub fn from_config(config: &ArchitectureConfig) -> Self {
        Self {
            max_cumulative_stride: config.max_cumulative_stride,
            min_stride: config.min_stride,
            best_of: config.best_of,
            max_attempts: config.max_attempts,
        }
    }
}

impl Default for StrideSearch {
    fn default() -> Self {
        Self {
            max_cumulative_stride: 32,
            min_stride: 1,
            best_of: 50,
            max_attempts: 10_000,
        }
    }
}

/// Cumulative-stride hint per population, from channel estimates
///
/// A population of `n` neurons with `channels` channels has
/// `sqrt(n / channels)` pixels; its hint is the input resolution divided by
/// that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrideHints {
    /// Estimated channels, aligned with the system's populations
    pub channels: Vec<Option<f64>>,
    pub cumulative: Vec<Option<f64>>,
}

impl StrideHints {
    pub fn from_channels(
        system: &System,
        channels: Vec<Option<f64>>,
        image_channels: f64,
    ) -> ArchitectureResult<Self> {
        let input = system.input().ok_or(ArchitectureError::MissingInput)?;
        if channels.len() != system.len() {
            return Err(ArchitectureError::InvalidParameters(format!(
                "{} channel estimates for {} populations",
                channels.len(),
                system.len()
            )));
        }
        let image_pixels = (input.n / image_channels).sqrt();

        let cumulative = system
            .populations()
            .iter()
            .zip(&channels)
            .map(|(population, channels)| match channels {
                Some(c) if *c > 0.0 && population.n > 0.0 => {
                    Some(image_pixels / (population.n / c).sqrt())
                }
                _ => None,
            })
            .collect();

        Ok(Self {
            channels,
            cumulative,
        })
    }

    /// Channel estimates: the input keeps the image channels, configured
    /// overrides win, other populations scale the reference channels by the
    /// area's spine count relative to the reference area.
    pub fn from_model(
        system: &System,
        model: &AnatomicalModel,
        config: &ArchitectureConfig,
    ) -> ArchitectureResult<Self> {
        let reference_spines = AreaId::new(&config.reference_area)
            .ok()
            .and_then(|id| model.area(&id))
            .and_then(|area| area.spine_count)
            .filter(|count| *count > 0.0);
        if reference_spines.is_none() {
            warn!(
                "[STRIDE] Reference area {} has no spine count, no spine-based channel hints",
                config.reference_area
            );
        }

        let input = system.input_index();
        let channels = system
            .populations()
            .iter()
            .enumerate()
            .map(|(i, population)| {
                if let Some(c) = config.channel_overrides.get(&population.name) {
                    return Some(*c);
                }
                if Some(i) == input {
                    return Some(config.image_channels);
                }
                let spines = population
                    .area
                    .as_ref()
                    .and_then(|id| model.area(id))
                    .and_then(|area| area.spine_count)?;
                let reference = reference_spines?;
                Some((config.reference_channels * spines / reference).round().max(1.0))
            })
            .collect();

        Self::from_channels(system, channels, config.image_channels)
    }
}

/// One candidate stride pattern for a system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StridePattern {
    max_cumulative_stride: u32,
    /// Per projection
    strides: Vec<Option<u32>>,
    /// Per population
    cumulatives: Vec<Option<u32>>,
    cumulative_hints: Vec<Option<f64>>,
    min_cumulatives: Vec<u32>,
    max_cumulatives: Vec<u32>,
}

impl StridePattern {
    /// Candidate with every stride unset
    pub fn new(system: &System, max_cumulative_stride: u32) -> ArchitectureResult<Self> {
        let input = system.input_index().ok_or(ArchitectureError::MissingInput)?;
        if max_cumulative_stride == 0 {
            return Err(ArchitectureError::InvalidParameters(
                "max_cumulative_stride must be at least 1".to_string(),
            ));
        }
        let mut cumulatives = vec![None; system.len()];
        cumulatives[input] = Some(1);
        Ok(Self {
            max_cumulative_stride,
            strides: vec![None; system.projections().len()],
            cumulatives,
            cumulative_hints: vec![None; system.len()],
            min_cumulatives: vec![1; system.len()],
            max_cumulatives: vec![max_cumulative_stride; system.len()],
        })
    }

    pub fn set_hints(&mut self, hints: &StrideHints) -> ArchitectureResult<()> {
        if hints.cumulative.len() != self.cumulatives.len() {
            return Err(ArchitectureError::InvalidParameters(format!(
                "{} hints for {} populations",
                hints.cumulative.len(),
                self.cumulatives.len()
            )));
        }
        self.cumulative_hints = hints.cumulative.clone();
        Ok(())
    }

    pub fn strides(&self) -> &[Option<u32>] {
        &self.strides
    }

    pub fn cumulatives(&self) -> &[Option<u32>] {
        &self.cumulatives
    }

    pub fn cumulative_hints(&self) -> &[Option<f64>] {
        &self.cumulative_hints
    }

    pub fn max_cumulative_stride(&self) -> u32 {
        self.max_cumulative_stride
    }

    pub fn is_filled(&self) -> bool {
        self.strides.iter().all(Option::is_some)
    }

    /// Largest cumulative stride in the pattern
    pub fn max_cumulative(&self) -> Option<u32> {
        self.cumulatives.iter().flatten().copied().max()
    }

    /// RMS log-ratio of cumulative strides to hints
    ///
    /// Populations without a hint or a cumulative stride are left out; `0.0` if none remain.
    pub fn distance_from_hints(&self) -> f64 {
        let errors: Vec<f64> = self
            .cumulatives
            .iter()
            .zip(&self.cumulative_hints)
            .filter_map(|(c, h)| match (c, h) {
                (Some(c), Some(h)) if *h > 0.0 => Some((f64::from(*c) / h).ln().powi(2)),
                _ => None,
            })
            .collect();
        if errors.is_empty() {
            return 0.0;
        }
        (errors.iter().sum::<f64>() / errors.len() as f64).sqrt()
    }

    /// Fill every unset stride
    pub fn fill<R: Rng + ?Sized>(
        &mut self,
        system: &System,
        search: &StrideSearch,
        rng: &mut R,
    ) -> ArchitectureResult<()> {
        while !self.is_filled() {
            let unset: Vec<bool> = self.strides.iter().map(Option::is_none).collect();
            let path = system.longest_path(&unset)?;
            if path.len() < 2 {
                return Err(ArchitectureError::StrideInitialization {
                    path: String::new(),
                    reason: "no path through the unset projections".to_string(),
                });
            }

            let start = self.cumulatives[path[0]];
            let end = self.cumulatives[path[path.len() - 1]];
            let steps = path.len() - 1;
            let span = match (start, end) {
                (Some(s), Some(e)) => f64::from(e) / f64::from(s),
                (None, Some(e)) => f64::from(e),
                _ => f64::from(self.max_cumulative_stride),
            };
            let max_stride = max_stride_for(span, steps).max(search.min_stride);

            debug!(
                "[STRIDE] Path {} (start {:?}, end {:?}, max stride {})",
                path_names(system, &path),
                start,
                end,
                max_stride
            );
            self.init_path(
                system,
                &path,
                end,
                search.min_stride,
                max_stride,
                search.max_attempts,
                rng,
            )?;
            self.update_cumulative_bounds(system);
        }
        Ok(())
    }

    /// Draw strides along `path` (population indices) between `min_stride` and `max_stride`
    ///
    /// A projection between two populations whose cumulative strides are
    /// both known takes their ratio. A draw is rejected when a cumulative
    /// stride leaves its bounds, is not a multiple of a known predecessor's
    /// or a divisor of a known successor's, or the end does not reach
    /// `exact_cumulative`. Strides already set are never changed.
    #[allow(clippy::too_many_arguments)]
    pub fn init_path<R: Rng + ?Sized>(
        &mut self,
        system: &System,
        path: &[usize],
        exact_cumulative: Option<u32>,
        min_stride: u32,
        max_stride: u32,
        max_attempts: usize,
        rng: &mut R,
    ) -> ArchitectureResult<()> {
        let min_stride = min_stride.max(1);
        let max_stride = max_stride.max(min_stride);
        let fail = |reason: String| ArchitectureError::StrideInitialization {
            path: path_names(system, path),
            reason,
        };

        let mut edges = Vec::with_capacity(path.len().saturating_sub(1));
        for step in path.windows(2) {
            let projection = system.projection_between(step[0], step[1]).ok_or_else(|| {
                fail(format!(
                    "no projection between populations {} and {}",
                    step[0], step[1]
                ))
            })?;
            edges.push((projection, step[0], step[1]));
        }
        if path.first().and_then(|p| self.cumulatives[*p]).is_none() {
            return Err(fail("start of path has no cumulative stride".to_string()));
        }

        for _ in 0..max_attempts {
            let mut strides = self.strides.clone();
            let mut cumulatives = self.cumulatives.clone();
            let mut failed = false;

            for &(projection, pre, post) in &edges {
                let Some(pre_cumulative) = cumulatives[pre] else {
                    failed = true;
                    break;
                };
                if let Some(post_cumulative) = cumulatives[post] {
                    if post_cumulative % pre_cumulative != 0 || post_cumulative < pre_cumulative {
                        failed = true;
                        break;
                    }
                    strides[projection] = Some(post_cumulative / pre_cumulative);
                    continue;
                }

                let stride = self.sample_stride(pre, post, min_stride, max_stride, rng);
                let cumulative = pre_cumulative.saturating_mul(stride);
                if cumulative > self.max_cumulatives[post]
                    || cumulative < self.min_cumulatives[post]
                    || !divides_neighbours(system, &cumulatives, post, cumulative)
                {
                    failed = true;
                    break;
                }
                strides[projection] = Some(stride);
                cumulatives[post] = Some(cumulative);
            }

            if failed {
                continue;
            }
            let end = path.last().and_then(|p| cumulatives[*p]);
            if exact_cumulative.is_none() || exact_cumulative == end {
                self.strides = strides;
                self.cumulatives = cumulatives;
                return Ok(());
            }
        }

        Err(fail(format!(
            "{} attempts exhausted (exact cumulative {:?}, strides {}..={})",
            max_attempts, exact_cumulative, min_stride, max_stride
        )))
    }

    /// Weighted towards the stride the hints suggest, uniform without hints
    fn sample_stride<R: Rng + ?Sized>(
        &self,
        pre: usize,
        post: usize,
        min_stride: u32,
        max_stride: u32,
        rng: &mut R,
    ) -> u32 {
        let hint = match (self.cumulative_hints[pre], self.cumulative_hints[post]) {
            (Some(pre_hint), Some(post_hint)) if pre_hint > 0.0 => Some(post_hint / pre_hint),
            _ => None,
        };
        if let Some(hint) = hint {
            let weights: Vec<f64> = (min_stride..=max_stride)
                .map(|s| 1.0 / (0.1 + (f64::from(s) - hint).abs()).powi(2))
                .collect();
            if let Ok(distribution) = WeightedIndex::new(&weights) {
                return min_stride + distribution.sample(rng) as u32;
            }
        }
        rng.gen_range(min_stride..=max_stride)
    }

    /// A population's cumulative stride lies between its known ancestors' and descendants'
    fn update_cumulative_bounds(&mut self, system: &System) {
        for i in 0..system.len() {
            for ancestor in system.ancestors(i) {
                if let Some(c) = self.cumulatives[ancestor] {
                    self.min_cumulatives[i] = self.min_cumulatives[i].max(c);
                }
            }
            for descendant in system.descendants(i) {
                if let Some(c) = self.cumulatives[descendant] {
                    self.max_cumulatives[i] = self.max_cumulatives[i].min(c);
                }
            }
        }
    }
}

/// `2·floor(span^(1/steps))`, at least 1
pub fn max_stride_for(span: f64, steps: usize) -> u32 {
    if steps == 0 || !span.is_finite() || span < 1.0 {
        return 1;
    }
    // tolerance so exact powers (8^(1/3)) are not floored down
    let root = (span.powf(1.0 / steps as f64) + 1e-9).floor();
    ((2.0 * root) as u32).max(1)
}

/// Known direct neighbours stay integer multiples of each other
fn divides_neighbours(system: &System, cumulatives: &[Option<u32>], node: usize, value: u32) -> bool {
    system
        .predecessors(node)
        .filter_map(|p| cumulatives[p])
        .all(|c| value % c == 0)
        && system
            .successors(node)
            .filter_map(|s| cumulatives[s])
            .all(|c| c % value == 0)
}

fn path_names(system: &System, path: &[usize]) -> String {
    path.iter()
        .map(|i| {
            system
                .population(*i)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("#{}", i))
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Best of `search.best_of` filled candidates by distance from the hints
///
/// A candidate whose paths cannot be initialized is discarded; the search
/// fails only when every candidate does.
pub fn get_stride_pattern<R: Rng + ?Sized>(
    system: &System,
    search: &StrideSearch,
    hints: &StrideHints,
    rng: &mut R,
) -> ArchitectureResult<StridePattern> {
    if search.best_of == 0 {
        return Err(ArchitectureError::InvalidParameters(
            "best_of must be at least 1".to_string(),
        ));
    }

    let mut best: Option<(f64, StridePattern)> = None;
    let mut last_error = None;
    for i in 0..search.best_of {
        debug!("[STRIDE] Making stride pattern {} of {}", i + 1, search.best_of);
        let mut candidate = StridePattern::new(system, search.max_cumulative_stride)?;
        candidate.set_hints(hints)?;
        match candidate.fill(system, search, rng) {
            Ok(()) => {}
            Err(e @ ArchitectureError::StrideInitialization { .. }) => {
                debug!("[STRIDE] Candidate {} discarded: {}", i + 1, e);
                last_error = Some(e);
                continue;
            }
            Err(e) => return Err(e),
        }
        let distance = candidate.distance_from_hints();
        if best.as_ref().map_or(true, |(d, _)| distance < *d) {
            best = Some((distance, candidate));
        }
    }

    match best {
        Some((distance, pattern)) => {
            info!(
                "[STRIDE] Best of {} candidates: distance from hints {:.4}, max cumulative stride {:?}",
                search.best_of,
                distance,
                pattern.max_cumulative()
            );
            Ok(pattern)
        }
        None => Err(last_error.unwrap_or_else(|| ArchitectureError::StrideInitialization {
            path: String::new(),
            reason: "no candidate could be filled".to_string(),
        })),
    }
}

/// Cumulative strides keyed by population name
pub fn cumulatives_by_name(system: &System, pattern: &StridePattern) -> BTreeMap<String, Option<u32>> {
    system
        .populations()
        .iter()
        .zip(pattern.cumulatives())
        .map(|(p, c)| (p.name.clone(), *c))
        .collect()
}
