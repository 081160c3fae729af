//! Dense discrete factors over network node indices.
//!
//! Values are laid out row-major with the last variable varying fastest,
//! which is the same layout a cpd uses once its own variable is appended
//! after its evidence list.

use crate::model::Cpd;

#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    vars: Vec<usize>,
    cards: Vec<usize>,
    values: Vec<f64>,
}

impl Factor {
    /// The multiplicative identity: no variables, one value.
    pub fn unit() -> Self {
        Self {
            vars: Vec::new(),
            cards: Vec::new(),
            values: vec![1.0],
        }
    }

    pub fn new(vars: Vec<usize>, cards: Vec<usize>, values: Vec<f64>) -> Self {
        debug_assert_eq!(vars.len(), cards.len());
        debug_assert_eq!(cards.iter().product::<usize>(), values.len());
        Self { vars, cards, values }
    }

    /// A single-variable factor, e.g. a prior or a likelihood.
    pub fn over(var: usize, values: Vec<f64>) -> Self {
        let card = values.len();
        Self::new(vec![var], vec![card], values)
    }

    /// `P(variable | evidence)` with scope `evidence ++ [variable]`.
    pub fn from_cpd(cpd: &Cpd, card_of: impl Fn(usize) -> usize) -> Self {
        let own = cpd.values.len();
        let columns = cpd.values.first().map_or(0, Vec::len);
        let mut values = Vec::with_capacity(own * columns);
        for col in 0..columns {
            for row in &cpd.values {
                values.push(row[col]);
            }
        }
        let mut vars = cpd.evidence.clone();
        vars.push(cpd.variable);
        let cards = vars
            .iter()
            .map(|&v| if v == cpd.variable { own } else { card_of(v) })
            .collect();
        Self::new(vars, cards, values)
    }

    pub fn vars(&self) -> &[usize] {
        &self.vars
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn contains(&self, var: usize) -> bool {
        self.vars.contains(&var)
    }

    fn position(&self, var: usize) -> Option<usize> {
        self.vars.iter().position(|&v| v == var)
    }

    fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.vars.len()];
        for d in (0..self.vars.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * self.cards[d + 1];
        }
        strides
    }

    /// Stride of each of `scope` in this factor; zero for variables it lacks.
    fn strides_in(&self, scope: &[usize]) -> Vec<usize> {
        let own = self.strides();
        scope
            .iter()
            .map(|&v| self.position(v).map_or(0, |p| own[p]))
            .collect()
    }

    fn decode(&self, mut flat: usize, out: &mut [usize]) {
        for d in (0..self.vars.len()).rev() {
            out[d] = flat % self.cards[d];
            flat /= self.cards[d];
        }
    }

    pub fn product(&self, other: &Factor) -> Factor {
        let mut vars = self.vars.clone();
        let mut cards = self.cards.clone();
        for (&v, &c) in other.vars.iter().zip(&other.cards) {
            if !vars.contains(&v) {
                vars.push(v);
                cards.push(c);
            }
        }
        let sa = self.strides_in(&vars);
        let sb = other.strides_in(&vars);
        let size: usize = cards.iter().product();

        let mut values = Vec::with_capacity(size);
        let mut odometer = vec![0usize; vars.len()];
        let (mut ia, mut ib) = (0usize, 0usize);
        for _ in 0..size {
            values.push(self.values[ia] * other.values[ib]);
            for d in (0..vars.len()).rev() {
                odometer[d] += 1;
                ia += sa[d];
                ib += sb[d];
                if odometer[d] < cards[d] {
                    break;
                }
                ia -= sa[d] * cards[d];
                ib -= sb[d] * cards[d];
                odometer[d] = 0;
            }
        }
        Factor { vars, cards, values }
    }

    /// Marginalise `var` away. No-op when the factor does not mention it.
    pub fn sum_out(&self, var: usize) -> Factor {
        let Some(p) = self.position(var) else {
            return self.clone();
        };
        self.project(p, |_, _| true)
    }

    /// Condition on `var = state` and drop `var` from the scope.
    pub fn reduce(&self, var: usize, state: usize) -> Factor {
        let Some(p) = self.position(var) else {
            return self.clone();
        };
        self.project(p, |assign, d| assign[d] == state)
    }

    /// Drop dimension `drop`, accumulating the entries that pass `keep`.
    fn project(&self, drop: usize, keep: impl Fn(&[usize], usize) -> bool) -> Factor {
        let mut vars = self.vars.clone();
        let mut cards = self.cards.clone();
        vars.remove(drop);
        cards.remove(drop);
        let out = Factor {
            values: vec![0.0; cards.iter().product()],
            vars,
            cards,
        };
        let out_strides = out.strides_in(&self.vars);
        let mut values = out.values;
        let mut assign = vec![0usize; self.vars.len()];
        for (flat, v) in self.values.iter().enumerate() {
            self.decode(flat, &mut assign);
            if !keep(&assign, drop) {
                continue;
            }
            let idx: usize = assign.iter().zip(&out_strides).map(|(a, s)| a * s).sum();
            values[idx] += v;
        }
        Factor {
            vars: out.vars,
            cards: out.cards,
            values,
        }
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Scale to sum 1, returning the normaliser. Values are left untouched
    /// when the normaliser is zero or not finite.
    pub fn normalize(&mut self) -> f64 {
        let z = self.total();
        if z.is_finite() && z > 0.0 {
            for v in &mut self.values {
                *v /= z;
            }
        }
        z
    }
}
