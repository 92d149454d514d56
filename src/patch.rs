/// One ~1 ha cereal stand. `density` is the kernel yield harvestable this year;
/// `wild_proportion` is the wild-type fraction (domestic fraction is its
/// complement). Patch count is fixed for a run; patches are only ever mutated
/// by the yearly coevolution step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    pub density: f64,
    pub wild_proportion: f64,
    pub exploited: bool,
}

/// The run's cereal patches plus the current year's harvest order. Aggregates
/// are taken over the patches not yet exploited this year, which is what the
/// band actually has left to choose from.
#[derive(Debug, Clone)]
pub struct PatchCollection {
    patches: Vec<Patch>,
    order: Vec<usize>,
    cursor: usize,
}

impl PatchCollection {
    pub fn new(count: usize, density: f64, wild_proportion: f64) -> Self {
        Self {
            patches: vec![
                Patch {
                    density,
                    wild_proportion,
                    exploited: false,
                };
                count
            ],
            order: (0..count).collect(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Resets exploitation state and installs the harvest order for a new
    /// year. `order` must be a permutation of `0..len`.
    pub fn begin_year(&mut self, order: Vec<usize>) {
        debug_assert_eq!(order.len(), self.patches.len());
        for patch in &mut self.patches {
            patch.exploited = false;
        }
        self.order = order;
        self.cursor = 0;
    }

    pub fn unexploited_remaining(&self) -> usize {
        self.patches.len() - self.cursor
    }

    /// Marks the next patch in this year's order as exploited and returns its
    /// index, or `None` once every patch has been used.
    pub fn exploit_next(&mut self) -> Option<usize> {
        let index = *self.order.get(self.cursor)?;
        self.patches[index].exploited = true;
        self.cursor += 1;
        Some(index)
    }

    /// Mean (wild_proportion, density) over the patches still unexploited this
    /// year, or `None` if all have been used.
    pub fn mean_unexploited(&self) -> Option<(f64, f64)> {
        let remaining = &self.order[self.cursor..];
        if remaining.is_empty() {
            return None;
        }
        let mut wild = 0.0;
        let mut density = 0.0;
        for &index in remaining {
            wild += self.patches[index].wild_proportion;
            density += self.patches[index].density;
        }
        let n = remaining.len() as f64;
        Some((wild / n, density / n))
    }

    pub fn mean_wild_proportion(&self) -> f64 {
        if self.patches.is_empty() {
            return 0.0;
        }
        self.patches.iter().map(|p| p.wild_proportion).sum::<f64>() / self.patches.len() as f64
    }

    pub fn mean_density(&self) -> f64 {
        if self.patches.is_empty() {
            return 0.0;
        }
        self.total_density() / self.patches.len() as f64
    }

    pub fn total_density(&self) -> f64 {
        self.patches.iter().map(|p| p.density).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Patch> {
        self.patches.iter_mut()
    }
}
