/// A single-slot cached computation keyed by an explicit equality check over its inputs.
///
/// The output is recomputed only when `same(previous_inputs, inputs)` is false or after
/// [`Memo::invalidate`].
#[derive(Clone, Debug)]
pub(crate) struct Memo<I, O> {
    slot: Option<(I, O)>,
    computed: u64,
}

impl<I, O> Memo<I, O> {
    pub(crate) fn new() -> Self {
        Self {
            slot: None,
            computed: 0,
        }
    }

    pub(crate) fn get_or_try_compute<E>(
        &mut self,
        inputs: I,
        same: impl FnOnce(&I, &I) -> bool,
        compute: impl FnOnce(&I) -> Result<O, E>,
    ) -> Result<&O, E> {
        let hit = match &self.slot {
            Some((prev, _)) => same(prev, &inputs),
            None => false,
        };
        let entry = match self.slot.take() {
            Some(entry) if hit => entry,
            _ => {
                let out = compute(&inputs)?;
                self.computed = self.computed.saturating_add(1);
                (inputs, out)
            }
        };
        let entry = self.slot.insert(entry);
        Ok(&entry.1)
    }

    pub(crate) fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Number of times the output was (re)computed.
    pub(crate) fn computed(&self) -> u64 {
        self.computed
    }
}
