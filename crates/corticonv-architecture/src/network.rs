// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
Convolutional network description derived from a system and a stride pattern.

Each population becomes a layer (a square feature map with some number of
channels), each projection a convolution with the pattern's stride.
*/

use crate::stride::StridePattern;
use crate::system::System;
use crate::types::{ArchitectureError, ArchitectureResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::{debug, info};

/// Sparsity range of initial connections
const SPARSITY_RANGE: std::ops::Range<f64> = 0.1..0.3;
/// Kernel scale range of initial connections
const SIGMA_RANGE: std::ops::Range<f64> = 0.1..0.2;

/// Feature map of one population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub channels: f64,
    /// Width and height
    pub pixels: f64,
}

/// Convolution between two layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub pre: String,
    pub post: String,
    /// Fraction of nonzero kernel weights
    pub c: f64,
    pub stride: u32,
    /// Kernel width
    pub w: u32,
    pub sigma: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    pub connections: Vec<Connection>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, channels: f64, pixels: f64) {
        self.layers.push(Layer {
            name: name.to_string(),
            channels,
            pixels,
        });
    }

    /// Connect two existing layers
    pub fn connect(
        &mut self,
        pre: &str,
        post: &str,
        c: f64,
        stride: u32,
        w: u32,
        sigma: f64,
    ) -> ArchitectureResult<()> {
        for name in [pre, post] {
            if self.find_layer(name).is_none() {
                return Err(ArchitectureError::UnknownPopulation(name.to_string()));
            }
        }
        self.connections.push(Connection {
            pre: pre.to_string(),
            post: post.to_string(),
            c,
            stride,
            w,
            sigma,
        });
        Ok(())
    }

    pub fn find_layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// One line per layer and connection
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} layers, {} connections",
            self.layers.len(),
            self.connections.len()
        );
        for layer in &self.layers {
            let _ = writeln!(
                out,
                "  layer {:<12} channels {:>6} pixels {:>6}",
                layer.name, layer.channels, layer.pixels
            );
        }
        for connection in &self.connections {
            let _ = writeln!(
                out,
                "  {} -> {} stride {} w {} c {:.3} sigma {:.3}",
                connection.pre,
                connection.post,
                connection.stride,
                connection.w,
                connection.c,
                connection.sigma
            );
        }
        out
    }
}

/// Input resolution rounded to a multiple of the largest cumulative stride
pub fn image_resolution(input_neurons: f64, image_channels: f64, max_cumulative: u32) -> f64 {
    let max_cumulative = f64::from(max_cumulative.max(1));
    let approximate = (input_neurons / image_channels).sqrt();
    (approximate / max_cumulative).round().max(1.0) * max_cumulative
}

/// Build the network for a filled stride pattern
pub fn initialize_network<R: Rng + ?Sized>(
    system: &System,
    pattern: &StridePattern,
    image_channels: f64,
    kernel_width: u32,
    rng: &mut R,
) -> ArchitectureResult<Network> {
    let input = system.input_index().ok_or(ArchitectureError::MissingInput)?;
    if !(image_channels > 0.0) {
        return Err(ArchitectureError::InvalidParameters(format!(
            "image_channels must be positive, got {}",
            image_channels
        )));
    }
    if !pattern.is_filled() {
        return Err(ArchitectureError::InvalidParameters(
            "stride pattern has unset strides".to_string(),
        ));
    }

    let max_cumulative = pattern.max_cumulative().unwrap_or(1);
    let resolution = image_resolution(system.populations()[input].n, image_channels, max_cumulative);
    debug!(
        "[NETWORK] Image resolution {} (max cumulative stride {})",
        resolution, max_cumulative
    );

    let mut network = Network::new();
    for (i, population) in system.populations().iter().enumerate() {
        if i == input {
            network.add(&population.name, image_channels, resolution);
            continue;
        }
        let cumulative = pattern.cumulatives()[i].ok_or_else(|| {
            ArchitectureError::InvalidParameters(format!(
                "population {} has no cumulative stride",
                population.name
            ))
        })?;
        let pixels = resolution / f64::from(cumulative);
        let channels = (population.n / (pixels * pixels)).round().max(1.0);
        network.add(&population.name, channels, pixels);
    }

    for (projection, stride) in system.projections().iter().zip(pattern.strides()) {
        let stride = stride.ok_or_else(|| {
            ArchitectureError::InvalidParameters("stride pattern has unset strides".to_string())
        })?;
        let pre = &system.populations()[projection.origin].name;
        let post = &system.populations()[projection.termination].name;
        let c = rng.gen_range(SPARSITY_RANGE);
        let sigma = rng.gen_range(SIGMA_RANGE);
        network.connect(pre, post, c, stride, kernel_width, sigma)?;
    }

    info!(
        "[NETWORK] Initialized {} layers and {} connections at {} pixels",
        network.layers.len(),
        network.connections.len(),
        resolution
    );
    Ok(network)
}
