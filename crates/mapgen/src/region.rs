use rand::Rng;

/// One node of the recursive factor kernel used to build `prod`/`strength`
/// terrain. Each node draws a single scalar `factor`; a leaf's contribution
/// to the final grid is the product of every factor from the root down to
/// that leaf.
pub(crate) struct Region {
    factor: f64,
    children: Vec<Vec<Region>>,
}

impl Region {
    const CHUNK_SIZE: usize = 4;
    const OWN_WEIGHT: f64 = 0.75;

    pub(crate) fn new(w: usize, h: usize, rng: &mut impl Rng) -> Self {
        let factor = rng.random::<f64>().powf(1.5);

        if w == 1 && h == 1 {
            return Region {
                factor,
                children: Vec::new(),
            };
        }

        let cw = w / Self::CHUNK_SIZE;
        let ch = h / Self::CHUNK_SIZE;
        let dif_w = w - Self::CHUNK_SIZE * cw;
        let dif_h = h - Self::CHUNK_SIZE * ch;

        let mut children: Vec<Vec<Region>> = Vec::new();
        for a in 0..Self::CHUNK_SIZE {
            let tch = if a < dif_h { ch + 1 } else { ch };
            if tch == 0 {
                continue;
            }
            let mut row = Vec::new();
            for b in 0..Self::CHUNK_SIZE {
                let tcw = if b < dif_w { cw + 1 } else { cw };
                if tcw > 0 {
                    row.push(Region::new(tcw, tch, rng));
                }
            }
            if !row.is_empty() {
                children.push(row);
            }
        }

        let mut region = Region { factor, children };
        region.blur_children();
        region
    }

    /// One pass of toroidal 4-neighbour blur over the direct children's factors.
    fn blur_children(&mut self) {
        let rows = self.children.len();
        if rows == 0 {
            return;
        }
        let cols = self.children[0].len();
        let mut blurred = vec![vec![0.0_f64; cols]; rows];
        for a in 0..rows {
            let mh = (a + rows - 1) % rows;
            let ph = (a + 1) % rows;
            for b in 0..cols {
                let mw = (b + cols - 1) % cols;
                let pw = (b + 1) % cols;
                blurred[a][b] = self.children[a][b].factor * Self::OWN_WEIGHT
                    + (1.0 - Self::OWN_WEIGHT) / 4.0
                        * (self.children[mh][b].factor
                            + self.children[ph][b].factor
                            + self.children[a][mw].factor
                            + self.children[a][pw].factor);
            }
        }
        for a in 0..rows {
            for b in 0..cols {
                self.children[a][b].factor = blurred[a][b];
            }
        }
    }

    /// Expands the kernel into a dense `(h, w)` grid of factors.
    pub(crate) fn get_factors(&self) -> Vec<Vec<f64>> {
        if self.children.is_empty() {
            return vec![vec![self.factor]];
        }

        let children_factors: Vec<Vec<Vec<Vec<f64>>>> = self
            .children
            .iter()
            .map(|row| row.iter().map(|child| child.get_factors()).collect())
            .collect();

        let total_h: usize = children_factors.iter().map(|row| row[0].len()).sum();
        let total_w: usize = children_factors[0].iter().map(|block| block[0].len()).sum();

        let mut factors = vec![vec![0.0_f64; total_w]; total_h];
        let mut y = 0;
        for row in &children_factors {
            let block_rows = row[0].len();
            for iy in 0..block_rows {
                let mut x = 0;
                for block in row {
                    for ix in 0..block[iy].len() {
                        factors[y][x] = block[iy][ix] * self.factor;
                        x += 1;
                    }
                }
                y += 1;
            }
        }

        factors
    }
}
