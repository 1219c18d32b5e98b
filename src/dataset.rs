//! Input sequences for sort runs: random generation, explicit lists and resizing.

use crate::error::{ConfigError, Result};
use crate::model::Value;
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const MIN_SIZE: usize = 1;
pub const MAX_SIZE: usize = 512;

/// Check a requested array size against the supported range.
pub fn validate_size(size: usize) -> Result<usize> {
    if (MIN_SIZE..=MAX_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(ConfigError::SizeOutOfRange {
            size,
            min: MIN_SIZE,
            max: MAX_SIZE,
        })
    }
}

/// Parse a comma or whitespace separated list such as `5,1,4 2`.
pub fn parse_values(raw: &str) -> Result<Vec<Value>> {
    let values = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(position, token)| {
            token.parse::<Value>().map_err(|_| ConfigError::InvalidValue {
                token: token.to_string(),
                position,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if values.is_empty() {
        return Err(ConfigError::EmptyValues);
    }
    Ok(values)
}

/// Source of random sequences. Seeded generators reproduce the same sequences.
pub struct Generator {
    rng: StdRng,
    max_value: Value,
}

impl Generator {
    pub fn new(max_value: Value, seed: Option<u64>) -> Result<Self> {
        if max_value == 0 {
            return Err(ConfigError::ZeroMaxValue);
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { rng, max_value })
    }

    /// `size` values drawn uniformly from `1..=max_value`.
    pub fn generate(&mut self, size: usize) -> Result<Vec<Value>> {
        let size = validate_size(size)?;
        Ok((0..size)
            .map(|_| self.rng.gen_range(1..=self.max_value))
            .collect())
    }

    pub fn max_value(&self) -> Value {
        self.max_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_separators() {
        assert_eq!(parse_values("5,1, 4 2\t8").unwrap(), vec![5, 1, 4, 2, 8]);
    }

    #[test]
    fn rejects_bad_tokens_with_position() {
        let err = parse_values("1,two,3").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                token: "two".into(),
                position: 1
            }
        );
        assert_eq!(parse_values(" , ").unwrap_err(), ConfigError::EmptyValues);
        assert!(parse_values("-1").is_err());
    }

    #[test]
    fn seeded_generation_is_reproducible_and_bounded() {
        let a = Generator::new(100, Some(7)).unwrap().generate(50).unwrap();
        let b = Generator::new(100, Some(7)).unwrap().generate(50).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (1..=100).contains(v)));
    }

    #[test]
    fn size_bounds_are_enforced() {
        let mut generator = Generator::new(10, Some(1)).unwrap();
        assert!(generator.generate(0).is_err());
        assert!(generator.generate(MAX_SIZE + 1).is_err());
        assert_eq!(generator.generate(MAX_SIZE).unwrap().len(), MAX_SIZE);
        assert!(Generator::new(0, None).is_err());
    }
}
