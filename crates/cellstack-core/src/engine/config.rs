use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Parameter '{0}' must be a positive integer")]
    NonPositive(&'static str),
}

/// Inclusive thickness window a cell must fall into to be considered.
///
/// `from <= to` is not enforced; an inverted window simply admits no cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThicknessRange {
    pub from: u32,
    pub to: u32,
}

impl ThicknessRange {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn contains(&self, thickness: f64) -> bool {
        f64::from(self.from) <= thickness && thickness <= f64::from(self.to)
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.from > self.to
    }
}

/// Immutable parameters of a single generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub max_width: u32,
    pub max_length: u32,
    pub thickness_range: ThicknessRange,
    pub top_k: usize,
}

impl Constraints {
    pub fn builder() -> ConstraintsBuilder {
        ConstraintsBuilder::new()
    }
}

#[derive(Default)]
pub struct ConstraintsBuilder {
    max_width: Option<u32>,
    max_length: Option<u32>,
    from_thickness: Option<u32>,
    to_thickness: Option<u32>,
    top_k: Option<usize>,
}

impl ConstraintsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }
    pub fn max_length(mut self, length: u32) -> Self {
        self.max_length = Some(length);
        self
    }
    pub fn from_thickness(mut self, thickness: u32) -> Self {
        self.from_thickness = Some(thickness);
        self
    }
    pub fn to_thickness(mut self, thickness: u32) -> Self {
        self.to_thickness = Some(thickness);
        self
    }
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    pub fn build(self) -> Result<Constraints, ConfigError> {
        let positive = |value: Option<u32>, name: &'static str| -> Result<u32, ConfigError> {
            match value {
                None => Err(ConfigError::MissingParameter(name)),
                Some(0) => Err(ConfigError::NonPositive(name)),
                Some(v) => Ok(v),
            }
        };

        Ok(Constraints {
            max_width: positive(self.max_width, "max_width")?,
            max_length: positive(self.max_length, "max_length")?,
            thickness_range: ThicknessRange {
                from: positive(self.from_thickness, "from_thickness")?,
                to: positive(self.to_thickness, "to_thickness")?,
            },
            top_k: self.top_k.ok_or(ConfigError::MissingParameter("top_k"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_builder() -> ConstraintsBuilder {
        ConstraintsBuilder::new()
            .max_width(100)
            .max_length(120)
            .from_thickness(1)
            .to_thickness(4)
            .top_k(3)
    }

    #[test]
    fn build_succeeds_with_all_parameters() {
        let constraints = full_builder().build().unwrap();
        assert_eq!(constraints.max_width, 100);
        assert_eq!(constraints.max_length, 120);
        assert_eq!(constraints.thickness_range, ThicknessRange::new(1, 4));
        assert_eq!(constraints.top_k, 3);
    }

    #[test]
    fn build_reports_first_missing_parameter() {
        let result = ConstraintsBuilder::new().max_width(10).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("max_length")));

        let result = ConstraintsBuilder::new()
            .max_width(10)
            .max_length(10)
            .from_thickness(1)
            .to_thickness(2)
            .build();
        assert_eq!(result, Err(ConfigError::MissingParameter("top_k")));
    }

    #[test]
    fn build_rejects_zero_dimensions() {
        let result = full_builder().max_width(0).build();
        assert_eq!(result, Err(ConfigError::NonPositive("max_width")));

        let result = full_builder().to_thickness(0).build();
        assert_eq!(result, Err(ConfigError::NonPositive("to_thickness")));
    }

    #[test]
    fn build_accepts_zero_top_k_and_inverted_range() {
        let constraints = full_builder()
            .top_k(0)
            .from_thickness(5)
            .to_thickness(3)
            .build()
            .unwrap();
        assert_eq!(constraints.top_k, 0);
        assert!(constraints.thickness_range.is_inverted());
    }

    #[test]
    fn thickness_range_is_inclusive_at_both_ends() {
        let range = ThicknessRange::new(2, 4);
        assert!(range.contains(2.0));
        assert!(range.contains(3.3));
        assert!(range.contains(4.0));
        assert!(!range.contains(1.99));
        assert!(!range.contains(4.01));
    }

    #[test]
    fn inverted_range_contains_nothing() {
        let range = ThicknessRange::new(5, 3);
        for t in [2.0, 3.0, 4.0, 5.0, 6.0] {
            assert!(!range.contains(t));
        }
    }
}
