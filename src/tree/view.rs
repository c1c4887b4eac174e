use super::{Key, Phase, Route, Walker};
use crate::Result;

/// Read-only counterpart of [`Walker`] for query paths.
///
/// Shared state arrives as `&Self::State` and cannot be mutated; results are
/// accumulated into the walker itself, which is caller-local scratch.
pub trait ViewWalker {
    /// Collaborator-owned state being queried.
    type State: ?Sized;

    /// Node visited on the way down.
    fn down(&mut self, state: &Self::State, key: Key, canonical: bool);

    /// Node revisited on the way up.
    fn up(&mut self, _state: &Self::State, _key: Key, _canonical: bool) {}

    /// Segment boundary.
    fn phase(&mut self, _state: &Self::State, _phase: Phase) {}
}

/// Route whose walks only read collaborator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRoute {
    route: Route,
}

impl ViewRoute {
    /// Wrap an existing route.
    pub fn new(route: Route) -> Self {
        Self { route }
    }

    /// Decompose `[left, right]`; same validation as [`Route::make`].
    pub fn make(root_width: u32, left: u32, right: u32) -> Result<Self> {
        Route::make(root_width, left, right).map(Self::new)
    }

    /// Underlying decomposition
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Run the two-phase traversal against read-only `state`.
    ///
    /// Visit and phase order are identical to [`Route::walk`].
    pub fn walk<W: ViewWalker + ?Sized>(&self, state: &W::State, walker: &mut W) {
        let mut adapter = ViewAdapter { state, walker };
        self.route.walk(&mut adapter);
    }
}

impl From<Route> for ViewRoute {
    fn from(route: Route) -> Self {
        Self::new(route)
    }
}

struct ViewAdapter<'a, W: ViewWalker + ?Sized> {
    state: &'a W::State,
    walker: &'a mut W,
}

impl<W: ViewWalker + ?Sized> Walker for ViewAdapter<'_, W> {
    fn down(&mut self, key: Key, canonical: bool) {
        self.walker.down(self.state, key, canonical);
    }

    fn up(&mut self, key: Key, canonical: bool) {
        self.walker.up(self.state, key, canonical);
    }

    fn phase(&mut self, phase: Phase) {
        self.walker.phase(self.state, phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Sums per-node weights of canonical nodes.
    struct CanonicalSum {
        total: u64,
        phases: usize,
    }

    impl ViewWalker for CanonicalSum {
        type State = HashMap<u64, u64>;

        fn down(&mut self, state: &Self::State, key: Key, canonical: bool) {
            if canonical {
                self.total += state.get(&key.packed()).copied().unwrap_or(0);
            }
        }

        fn phase(&mut self, _state: &Self::State, _phase: Phase) {
            self.phases += 1;
        }
    }

    #[test]
    fn test_view_reads_shared_state() {
        let view = ViewRoute::make(16, 4, 11).expect("valid range");
        let state: HashMap<u64, u64> = view
            .route()
            .canonical()
            .into_iter()
            .map(|key| (key.packed(), u64::from(key.span())))
            .collect();

        let mut sum = CanonicalSum { total: 0, phases: 0 };
        view.walk(&state, &mut sum);

        assert_eq!(sum.total, 8);
        assert_eq!(sum.phases, Phase::ORDER.len());
    }

    #[test]
    fn test_view_from_route() {
        let route = Route::make(32, 3, 9).expect("valid range");
        assert_eq!(ViewRoute::from(route), route.view());
        assert_eq!(route.view().route(), &route);
    }
}
