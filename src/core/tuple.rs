use std::fmt::Display;

use super::Datum;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tuple {
    pub values: Vec<Datum>,
}

impl Tuple {
    pub fn new(values: Vec<Datum>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&Datum> {
        self.values.get(index)
    }

    pub fn map_values(self, f: impl FnMut(Datum) -> Datum) -> Tuple {
        Tuple::new(self.values.into_iter().map(f).collect())
    }
}

impl Display for Tuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = self
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "{}", result)
    }
}
