//! Per-core chart colors
//!
//! Colors are random but memoized per core for the lifetime of a page
//! session, so re-rendering a chart (for example when a card is expanded)
//! keeps every core's color.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::models::CoreId;

/// Alpha used for generated colors
const COLOR_ALPHA: f32 = 0.8;

/// An RGBA color rendered as `rgba(r, g, b, a)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Color table keyed by core, append-only
#[derive(Debug, Default)]
pub struct ColorMemo {
    colors: HashMap<CoreId, Rgba>,
    seed: Option<u64>,
    rng: Option<StdRng>,
}

impl ColorMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed seed instead of OS entropy
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Color for `core`, generated on first use and reused afterwards
    pub fn assign(&mut self, core: &CoreId) -> Rgba {
        if let Some(color) = self.colors.get(core) {
            return *color;
        }

        let color = self.random_color();
        tracing::debug!(core = %core, color = %color, "Assigned core color");
        self.colors.insert(core.clone(), color);
        color
    }

    /// Previously assigned color, if any
    pub fn get(&self, core: &CoreId) -> Option<Rgba> {
        self.colors.get(core).copied()
    }

    /// A fresh color that is not memoized
    pub fn random_color(&mut self) -> Rgba {
        let seed = self.seed;
        let rng = self.rng.get_or_insert_with(|| match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        });

        Rgba {
            r: rng.gen(),
            g: rng.gen(),
            b: rng.gen(),
            a: COLOR_ALPHA,
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
