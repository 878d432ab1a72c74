/// A single battery cell as listed in a catalog source.
///
/// Dimensions and capacity are kept exactly as parsed; truncation only happens when a
/// [`StackConfiguration`](super::configuration::StackConfiguration) is derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord {
    pub product: String,
    pub thickness: f64,
    pub width: f64,
    pub length: f64,
    pub capacity: f64,
    /// 1-based line in the source file, header included.
    pub line: u64,
}

impl CellRecord {
    pub fn new(
        product: impl Into<String>,
        thickness: f64,
        width: f64,
        length: f64,
        capacity: f64,
    ) -> Self {
        Self {
            product: product.into(),
            thickness,
            width,
            length,
            capacity,
            line: 0,
        }
    }

    pub fn with_line(mut self, line: u64) -> Self {
        self.line = line;
        self
    }

    /// Volume of one cell, using the untruncated dimensions.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.width * self.length * self.thickness
    }
}
