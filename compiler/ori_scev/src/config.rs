//! Construction budgets.
//!
//! Every budget bounds work on pathological inputs; exceeding one never
//! makes a result wrong, only less simplified.
//!
//! # Environment Overrides
//!
//! [`ScevConfig::from_env`] reads:
//! - `ORI_SCEV_MAX_ARITH_DEPTH`
//! - `ORI_SCEV_MAX_CAST_DEPTH`
//! - `ORI_SCEV_MAX_COMPARE_DEPTH`
//! - `ORI_SCEV_ADD_INLINE`
//! - `ORI_SCEV_MUL_INLINE`

use crate::error::ConfigError;

/// Budgets for the expression builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScevConfig {
    /// Recursion depth past which sums and products are interned without
    /// further simplification.
    pub max_arith_depth: u32,
    /// Recursion depth past which casts are interned without folding.
    pub max_cast_depth: u32,
    /// Structural depth of the canonical order comparison.
    pub max_compare_depth: u32,
    /// Largest operand count a sum may reach by flattening nested sums.
    pub add_ops_inline_threshold: usize,
    /// Largest operand count a product may reach by flattening nested
    /// products.
    pub mul_ops_inline_threshold: usize,
}

impl ScevConfig {
    /// Read overrides from the environment on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Apply overrides from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(v) = read(&lookup, "ORI_SCEV_MAX_ARITH_DEPTH")? {
            config.max_arith_depth = v;
        }
        if let Some(v) = read(&lookup, "ORI_SCEV_MAX_CAST_DEPTH")? {
            config.max_cast_depth = v;
        }
        if let Some(v) = read(&lookup, "ORI_SCEV_MAX_COMPARE_DEPTH")? {
            config.max_compare_depth = v;
        }
        if let Some(v) = read(&lookup, "ORI_SCEV_ADD_INLINE")? {
            config.add_ops_inline_threshold = v;
        }
        if let Some(v) = read(&lookup, "ORI_SCEV_MUL_INLINE")? {
            config.mul_ops_inline_threshold = v;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_max_arith_depth(mut self, depth: u32) -> Self {
        self.max_arith_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_cast_depth(mut self, depth: u32) -> Self {
        self.max_cast_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_compare_depth(mut self, depth: u32) -> Self {
        self.max_compare_depth = depth;
        self
    }

    #[must_use]
    pub fn with_add_ops_inline_threshold(mut self, threshold: usize) -> Self {
        self.add_ops_inline_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_mul_ops_inline_threshold(mut self, threshold: usize) -> Self {
        self.mul_ops_inline_threshold = threshold;
        self
    }
}

fn read<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::InvalidValue { var, value }),
        },
    }
}

impl Default for ScevConfig {
    fn default() -> Self {
        Self {
            max_arith_depth: 32,
            max_cast_depth: 8,
            max_compare_depth: 32,
            add_ops_inline_threshold: 500,
            mul_ops_inline_threshold: 32,
        }
    }
}
