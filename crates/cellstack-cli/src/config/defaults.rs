pub struct DefaultsConfig {
    pub top_k: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { top_k: 10 }
    }
}
