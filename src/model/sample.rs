use std::cmp::Ordering;

/// One observation of the two collective variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePair {
    pub x: f64,
    pub y: f64,
}

impl SamplePair {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl From<(f64, f64)> for SamplePair {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box of a sample cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Ordered collection of sample pairs, read once and never mutated by the
/// pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    pub samples: Vec<SamplePair>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SamplePair> {
        self.samples.iter()
    }

    /// Returns the bounding box, or `None` for an empty set.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.samples.first()?;
        let init = Bounds {
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };
        Some(self.samples.iter().skip(1).fold(init, |b, s| Bounds {
            x_min: b.x_min.min(s.x),
            x_max: b.x_max.max(s.x),
            y_min: b.y_min.min(s.y),
            y_max: b.y_max.max(s.y),
        }))
    }

    /// Copy of the samples sorted by the total order on `(x, y)`.
    ///
    /// Floating-point reductions over the canonical order give the same bits
    /// regardless of how the input file was ordered.
    pub fn canonical(&self) -> Vec<SamplePair> {
        let mut sorted = self.samples.clone();
        sorted.sort_by(SamplePair::total_cmp);
        sorted
    }
}

impl FromIterator<SamplePair> for SampleSet {
    fn from_iter<I: IntoIterator<Item = SamplePair>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<(f64, f64)>> for SampleSet {
    fn from(pairs: Vec<(f64, f64)>) -> Self {
        pairs.into_iter().map(SamplePair::from).collect()
    }
}
