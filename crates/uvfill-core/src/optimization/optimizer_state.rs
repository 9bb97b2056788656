//! State threaded through a factorization run.
//!
//! The state owns the current iterate and a checkpoint of the best iterate
//! seen so far. Optimizers mutate `current` each iteration and call
//! [`OptimizationState::update_best`] after evaluating the loss; the
//! checkpoint is only replaced on strict improvement, so its loss never
//! regresses.

use crate::{factors::FactorPair, types::Scalar};

/// Current iterate plus the best checkpoint of a factorization run.
#[derive(Debug, Clone)]
pub struct OptimizationState<T: Scalar> {
    /// The iterate being refined
    pub current: FactorPair<T>,
    /// Snapshot of the iterate with the lowest loss so far
    pub best: FactorPair<T>,
    /// Loss of `best`
    pub best_loss: T,
    /// Number of completed iterations
    pub iteration: usize,
}

impl<T: Scalar> OptimizationState<T> {
    /// Starts a run from `initial`, whose loss is `initial_loss`.
    pub fn new(initial: FactorPair<T>, initial_loss: T) -> Self {
        Self {
            best: initial.clone(),
            current: initial,
            best_loss: initial_loss,
            iteration: 0,
        }
    }

    /// Checkpoints `current` if `loss` strictly improves on the best loss.
    ///
    /// Returns `true` when the checkpoint was replaced.
    pub fn update_best(&mut self, loss: T) -> bool {
        if loss < self.best_loss {
            self.best_loss = loss;
            self.best.clone_from(&self.current);
            true
        } else {
            false
        }
    }

    /// Advances the iteration counter.
    pub fn next_iteration(&mut self) {
        self.iteration += 1;
    }

    /// Consumes the state, returning the checkpoint and its loss.
    pub fn into_best(self) -> (FactorPair<T>, T) {
        (self.best, self.best_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DMatrix;

    fn pair(value: f64) -> FactorPair<f64> {
        FactorPair {
            u: DMatrix::from_element(2, 1, value),
            v: DMatrix::from_element(1, 2, value),
        }
    }

    #[test]
    fn test_checkpoint_only_on_strict_improvement() {
        let mut state = OptimizationState::new(pair(1.0), 0.5);

        state.current = pair(2.0);
        assert!(!state.update_best(0.5));
        assert_eq!(state.best, pair(1.0));

        state.current = pair(3.0);
        assert!(state.update_best(0.25));
        assert_eq!(state.best, pair(3.0));

        state.current = pair(4.0);
        assert!(!state.update_best(0.9));
        let (best, loss) = state.into_best();
        assert_eq!(best, pair(3.0));
        assert_eq!(loss, 0.25);
    }
}
