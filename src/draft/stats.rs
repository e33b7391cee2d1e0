use crate::cards::{Colour, Colours};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Population standard deviation.
pub fn stdev(values: &[f64]) -> Option<f64> {
    let avg = mean(values)?;
    let sum: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    Some((sum / values.len() as f64).sqrt())
}

/// Occurrences of each colour symbol over a set of cards.
#[derive(Clone, Copy, Debug, Default)]
pub struct ColourTally([u32; 5]);

impl ColourTally {
    pub fn add(&mut self, colours: &Colours) {
        for colour in colours.iter() {
            self.0[colour.index()] += 1;
        }
    }

    pub fn count(&self, colour: Colour) -> u32 {
        self.0[colour.index()]
    }

    pub fn all_present(&self) -> bool {
        self.0.iter().all(|&n| n > 0)
    }

    /// Counts of the colours that appeared at least once. With `pad_missing`
    /// the list is filled out with zeros for absent colours.
    pub fn values(&self, pad_missing: bool) -> Vec<f64> {
        let mut values: Vec<f64> = self
            .0
            .iter()
            .filter(|&&n| n > 0)
            .map(|&n| f64::from(n))
            .collect();
        if pad_missing {
            values.resize(Colour::ALL.len(), 0.0);
        }
        values
    }

    pub fn stdev(&self, pad_missing: bool) -> Option<f64> {
        stdev(&self.values(pad_missing))
    }
}

impl std::fmt::Display for ColourTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = Colour::ALL
            .iter()
            .map(|&c| format!("{c:?}:{}", self.count(c)))
            .collect();
        write!(f, "{{{}}}", parts.join(" "))
    }
}
