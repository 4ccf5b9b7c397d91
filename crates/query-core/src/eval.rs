use crate::types::Datum;

/// Values the evaluator has resolved for the current statement.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    placeholders: Vec<Option<Datum>>,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `$1..$n` to the given values.
    pub fn with_placeholders(mut self, values: Vec<Datum>) -> Self {
        self.placeholders = values.into_iter().map(Some).collect();
        self
    }

    /// Binds a single placeholder (0-based), growing the table as needed.
    pub fn set_placeholder(&mut self, idx: usize, value: Datum) {
        if self.placeholders.len() <= idx {
            self.placeholders.resize(idx + 1, None);
        }
        self.placeholders[idx] = Some(value);
    }

    pub fn placeholder(&self, idx: usize) -> Option<&Datum> {
        self.placeholders.get(idx).and_then(|v| v.as_ref())
    }
}
