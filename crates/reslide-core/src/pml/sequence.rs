use crate::error::{ReslideError, Result};
use std::fmt;
use std::str::FromStr;

/// The caller's requested slide order: indices into the original deck,
/// possibly repeated, possibly omitting some.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlideSequence {
    indices: Vec<i64>,
}

impl SlideSequence {
    pub fn new(indices: Vec<i64>) -> Self {
        Self { indices }
    }

    /// Parse a comma-separated list such as `0,34,34,50,52`.
    ///
    /// Tokens are trimmed; an empty or non-integer token is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let indices = text
            .split(',')
            .map(str::trim)
            .map(|token| {
                token.parse::<i64>().map_err(|_| ReslideError::InvalidSequence {
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { indices })
    }

    /// Check every index against the original slide count before anything
    /// is mutated, returning the indices as positions.
    pub fn validate(&self, slide_count: usize) -> Result<Vec<usize>> {
        self.indices
            .iter()
            .map(|&index| match usize::try_from(index) {
                Ok(position) if position < slide_count => Ok(position),
                _ => Err(ReslideError::IndexOutOfRange { index, slide_count }),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.indices
    }
}

impl FromStr for SlideSequence {
    type Err = ReslideError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Vec<i64>> for SlideSequence {
    fn from(indices: Vec<i64>) -> Self {
        Self::new(indices)
    }
}

impl fmt::Display for SlideSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.indices.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}
