//! Backward, bounded, multi-phase scan for multi-instruction idioms.

type StateFn<S> = Box<dyn Fn() -> S + Send + Sync>;
type TransformFn<I, S, R> = Box<dyn for<'a> Fn(Vec<&'a I>, S) -> R + Send + Sync>;
type PhaseFn<I, S> = Box<dyn Fn(&I, &mut S) -> bool + Send + Sync>;

/// Recognizes a fixed chain of instructions ending at a scan position.
///
/// Phases are given nearest first: phase 0 is tried against the instruction
/// at the start index and must match the idiom's last instruction, the final
/// phase matches its first. Instructions failing the current phase are
/// skipped. The whole chain must be found within `max_window` positions.
///
/// Every call to [`matches`](Self::matches) builds a fresh state.
pub struct IdiomMatcher<I, S, R> {
    max_window: usize,
    state: StateFn<S>,
    transform: TransformFn<I, S, R>,
    phases: Vec<PhaseFn<I, S>>,
}

impl<I, S, R> IdiomMatcher<I, S, R> {
    pub fn new(
        max_window: usize,
        state: impl Fn() -> S + Send + Sync + 'static,
        transform: impl for<'a> Fn(Vec<&'a I>, S) -> R + Send + Sync + 'static,
    ) -> Self {
        Self {
            max_window,
            state: Box::new(state),
            transform: Box::new(transform),
            phases: Vec::new(),
        }
    }

    /// Appends the next phase, one step further back in the idiom.
    pub fn phase(mut self, phase: impl Fn(&I, &mut S) -> bool + Send + Sync + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    pub fn max_window(&self) -> usize {
        self.max_window
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Scans backward from `start_idx`. Returns `None` when the chain isn't
    /// found; nothing from a partial match is exposed.
    pub fn matches(&self, instrs: &[I], start_idx: usize) -> Option<R> {
        let mut state = (self.state)();
        let matched = self.scan(instrs, start_idx, &mut state)?;
        Some((self.transform)(matched, state))
    }

    fn scan<'a>(&self, instrs: &'a [I], start_idx: usize, state: &mut S) -> Option<Vec<&'a I>> {
        let mut matched = Vec::with_capacity(self.phases.len());
        if self.phases.is_empty() {
            return Some(matched);
        }
        let mut phase_idx = 0;
        for offset in 0..self.max_window {
            let idx = start_idx.checked_sub(offset)?;
            let Some(instr) = instrs.get(idx) else { continue };
            if (self.phases[phase_idx])(instr, state) {
                matched.push(instr);
                phase_idx += 1;
                if phase_idx == self.phases.len() {
                    return Some(matched);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_builder_counts() {
        let m: IdiomMatcher<u8, (), ()> = IdiomMatcher::new(4, || (), |_, _| ())
            .phase(|_, _| true)
            .phase(|_, _| true);
        assert_eq!(m.phase_count(), 2);
        assert_eq!(m.max_window(), 4);
    }

    #[test]
    fn zero_window_never_matches_phases() {
        let m: IdiomMatcher<u8, (), ()> = IdiomMatcher::new(0, || (), |_, _| ()).phase(|_, _| true);
        assert!(m.matches(&[1, 2, 3], 2).is_none());
    }

    #[test]
    fn state_threads_through_phases() {
        // find "x, x+1" ending at start
        let m = IdiomMatcher::new(3, || 0u8, |found: Vec<&u8>, last| (found.len(), last))
            .phase(|v: &u8, last: &mut u8| {
                *last = *v;
                true
            })
            .phase(|v, last| *v + 1 == *last);
        assert_eq!(m.matches(&[4, 9, 5], 2), Some((2, 5)));
        assert_eq!(m.matches(&[7, 9, 5], 2), None);
    }

    #[test]
    fn start_past_end_skips_missing_positions() {
        let m = IdiomMatcher::new(3, || (), |found: Vec<&u8>, _| *found[0]).phase(|v: &u8, _| *v == 2);
        assert_eq!(m.matches(&[1, 2], 3), Some(2));
        assert_eq!(m.matches(&[1, 2], 4), None);
    }
}
