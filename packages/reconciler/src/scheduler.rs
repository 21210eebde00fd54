use crate::commit::{commit_root, CommitSummary};
use crate::config::ReconcilerConfig;
use crate::deadline::{Deadline, Unbounded};
use crate::error::ReconcileResult;
use crate::fiber::{Fiber, FiberId, FiberTree};
use crate::host::HostBinding;
use crate::work::perform_unit_of_work;
use arbor_vdom::VNode;
use tracing::{debug, instrument, trace};

/// Outcome of one [`Scheduler::drive_work_loop`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    /// Nothing was pending
    Idle,
    /// The deadline ran out with units of work left
    Yielded { performed: usize },
    /// The traversal finished and was committed in this call
    Committed(CommitSummary),
}

impl WorkStatus {
    /// Whether the scheduling source should invoke the loop again
    pub fn needs_reschedule(&self) -> bool {
        matches!(self, WorkStatus::Yielded { .. })
    }
}

/// Owner of all reconciliation state for one root.
///
/// `render` seeds a traversal; an external scheduling source then calls
/// `drive_work_loop` with a fresh deadline per quantum until it reports
/// `Committed`. Work is only ever suspended between two units, and the next
/// unit is kept here, so resuming needs no re-derivation.
pub struct Scheduler<H: HostBinding> {
    host: H,
    config: ReconcilerConfig,
    next_unit: Option<FiberId>,
    work_in_progress: Option<FiberTree<H::Handle>>,
    current: Option<FiberTree<H::Handle>>,
    previous: Option<FiberTree<H::Handle>>,
    deletions: Vec<FiberId>,
    next_generation: u64,
}

impl<H: HostBinding> Scheduler<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, ReconcilerConfig::default())
    }

    pub fn with_config(host: H, config: ReconcilerConfig) -> Self {
        Self {
            host,
            config,
            next_unit: None,
            work_in_progress: None,
            current: None,
            previous: None,
            deletions: Vec::new(),
            next_generation: 1,
        }
    }

    /// Schedule a traversal rendering `element` into `container`.
    ///
    /// Supersedes any traversal still in flight; the committed tree stays as
    /// it is until the new traversal commits. Effects on `current_root` and
    /// `previous_root` only describe the traversal that set them: a discarded
    /// traversal can leave `Deletion` on live fibers, and no commit reads it.
    #[instrument(skip_all, fields(generation = self.next_generation))]
    pub fn render(&mut self, element: VNode, container: H::Handle) {
        if self.next_unit.is_some() {
            debug!("Discarding in-flight traversal");
        }
        self.deletions.clear();

        let base = self.current.as_ref().map(FiberTree::generation);
        let alternate = base.map(|_| FiberId::ROOT);
        let root = Fiber::root(element, container, alternate);

        self.work_in_progress = Some(FiberTree::new(self.next_generation, base, root));
        self.next_unit = Some(FiberId::ROOT);
        self.next_generation += 1;
    }

    /// Perform units of work until the deadline runs low or the traversal
    /// ends; a finished traversal is committed before returning.
    ///
    /// A component failure aborts the quantum and leaves the failing fiber as
    /// the next unit.
    #[instrument(skip_all)]
    pub fn drive_work_loop<D: Deadline + ?Sized>(
        &mut self,
        deadline: &D,
    ) -> ReconcileResult<WorkStatus> {
        let mut performed = 0;

        while let Some(unit) = self.next_unit {
            if deadline.time_remaining() < self.config.yield_threshold {
                break;
            }
            let Some(wip) = self.work_in_progress.as_mut() else {
                self.next_unit = None;
                break;
            };
            debug_assert_eq!(wip.base(), self.current.as_ref().map(FiberTree::generation));
            self.next_unit = perform_unit_of_work(
                &mut self.host,
                wip,
                self.current.as_mut(),
                &mut self.deletions,
                unit,
            )?;
            performed += 1;
        }

        if self.next_unit.is_some() {
            debug!(performed, "Yielding with work left");
            return Ok(WorkStatus::Yielded { performed });
        }

        match self.work_in_progress.take() {
            Some(wip) => {
                trace!(performed, "Traversal complete");
                Ok(WorkStatus::Committed(self.commit(wip)))
            }
            None => Ok(WorkStatus::Idle),
        }
    }

    /// Run the pending traversal to completion in one quantum
    pub fn flush(&mut self) -> ReconcileResult<WorkStatus> {
        self.drive_work_loop(&Unbounded)
    }

    fn commit(&mut self, wip: FiberTree<H::Handle>) -> CommitSummary {
        let summary = commit_root(
            &mut self.host,
            &wip,
            self.current.as_ref(),
            &self.deletions,
            self.config.stale_attributes,
        );
        self.previous = self.current.replace(wip);
        summary
    }

    pub fn has_pending_work(&self) -> bool {
        self.next_unit.is_some() || self.work_in_progress.is_some()
    }

    pub fn next_unit(&self) -> Option<FiberId> {
        self.next_unit
    }

    /// Last committed tree
    pub fn current_root(&self) -> Option<&FiberTree<H::Handle>> {
        self.current.as_ref()
    }

    /// The committed tree before `current_root`; committed deletions and the
    /// current tree's alternates resolve against it
    pub fn previous_root(&self) -> Option<&FiberTree<H::Handle>> {
        self.previous.as_ref()
    }

    pub fn work_in_progress(&self) -> Option<&FiberTree<H::Handle>> {
        self.work_in_progress.as_ref()
    }

    /// Old fibers removed by the latest traversal, in collection order
    pub fn deletions(&self) -> &[FiberId] {
        &self.deletions
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }
}
