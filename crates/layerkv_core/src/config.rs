//! Store configuration.

/// Configuration for creating a [`crate::Store`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of keys the base map pre-allocates room for.
    pub initial_capacity: usize,

    /// Whether to emit a trace event for every read, write and delete.
    pub trace_operations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            trace_operations: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base map's initial capacity.
    #[must_use]
    pub const fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets whether data operations are traced.
    #[must_use]
    pub const fn trace_operations(mut self, value: bool) -> Self {
        self.trace_operations = value;
        self
    }
}
