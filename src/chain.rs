//! Filter chain for sequential filter application
//!
//! Drives one pipeline tick the way an external runner would: the source
//! frame enters as RGBA and flows through each filter in order, the output
//! of one becoming the input of the next.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::Params;
use crate::error::Result;
use crate::filters::Filter;
use crate::frame::{self, Frame, FrameContext};
use crate::registry::FilterRegistry;

/// Name and parameters of one filter in a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub name: String,
    #[serde(default)]
    pub params: Params,
}

impl FilterSpec {
    pub fn new<N: Into<String>>(name: N, params: Params) -> Self {
        FilterSpec {
            name: name.into(),
            params,
        }
    }
}

/// A chain of filters applied sequentially
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
    tick: u64,
}

impl FilterChain {
    /// Create a new empty filter chain
    pub fn new() -> Self {
        FilterChain {
            filters: Vec::new(),
            tick: 0,
        }
    }

    /// Build every filter named in `specs` from `registry`.
    ///
    /// Fails on the first unknown name or invalid parameter, before any
    /// frame is processed.
    pub fn from_specs(registry: &FilterRegistry, specs: &[FilterSpec]) -> Result<Self> {
        let mut chain = Self::new();
        for spec in specs {
            chain.push(registry.build(&spec.name, &spec.params)?);
        }
        Ok(chain)
    }

    /// Add a filter to the end of the chain
    pub fn add(mut self, filter: Box<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a filter to the end of the chain (mutable version)
    pub fn push(&mut self, filter: Box<dyn Filter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Number of frames processed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Run one tick: promote the source to RGBA, then apply every filter.
    pub fn process(&mut self, source: Frame) -> Result<Frame> {
        let ctx = FrameContext::new(self.tick);
        let mut frame = frame::promote_alpha(source);
        for filter in &mut self.filters {
            frame = filter.apply(frame, &ctx)?;
            trace!(filter = filter.name(), tick = ctx.tick, shape = ?frame.shape(), "applied filter");
        }
        self.tick += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{Flip, FlipParams};
    use ndarray::{s, Array3};

    #[test]
    fn test_empty_chain_promotes_source() {
        let mut chain = FilterChain::new();
        assert!(chain.is_empty());

        let result = chain.process(Array3::<u8>::zeros((2, 2, 3))).unwrap();

        assert_eq!(result.dim(), (2, 2, 4));
        assert_eq!(chain.tick(), 1);
    }

    #[test]
    fn test_chain_builder() {
        let chain = FilterChain::new()
            .add(Box::new(Flip::new(FlipParams::default())))
            .add(Box::new(Flip::new(FlipParams::default())));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_chain_double_flip_restores() {
        let mut img = Array3::<u8>::zeros((3, 3, 4));
        img[[0, 0, 0]] = 255;
        let mut chain = FilterChain::new()
            .add(Box::new(Flip::new(FlipParams::default())))
            .add(Box::new(Flip::new(FlipParams::default())));

        assert_eq!(chain.process(img.clone()).unwrap(), img);
    }

    #[test]
    fn test_filter_spec_from_json() {
        let specs: Vec<FilterSpec> = serde_json::from_str(
            r#"[{"name": "flip", "params": {"Vertical": true}}, {"name": "noise"}]"#,
        )
        .unwrap();

        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].params.get("vertical"), Some(&serde_json::json!(true)));
        assert_eq!(specs[1].params, Params::new());

        let chain = FilterChain::from_specs(&FilterRegistry::with_builtin(), &specs).unwrap();
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_from_specs_unknown_name() {
        let specs = vec![FilterSpec::new("sepia", Params::new())];
        assert!(FilterChain::from_specs(&FilterRegistry::with_builtin(), &specs).is_err());
    }

    #[test]
    fn test_chain_rgb_output_is_opaque() {
        let mut chain = FilterChain::new().add(Box::new(Flip::new(FlipParams::default())));
        let result = chain.process(Array3::<u8>::zeros((4, 4, 3))).unwrap();
        assert!(result.slice(s![.., .., 3]).iter().all(|&a| a == 255));
    }
}
