//! State machine trait for effect-returning workflows.

/// Outcome of one transition: the next state and the effects to perform.
///
/// Effects are plain data. Whoever drives the machine decides how (and whether) to
/// execute them; the machine itself performs no IO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S, F> {
    pub next: S,
    pub effects: Vec<F>,
}

impl<S, F> Transition<S, F> {
    pub fn to(next: S) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }

    pub fn with(next: S, effects: Vec<F>) -> Self {
        Self { next, effects }
    }

    pub fn effect(mut self, effect: F) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Workflow execution semantics (pure, deterministic).
///
/// - **Decision logic**: `transition(&state, &context, event)` returns the next state
///   plus effects. `&self` carries fixed configuration only, never mutable state.
/// - **State mutation**: only the driver replaces the state, via [`step`].
///
/// `Context` is read-only data the decision depends on but that the machine does not own
/// (e.g. the inventory snapshot).
pub trait StateMachine {
    type State: Clone + core::fmt::Debug;
    type Context;
    type Event: core::fmt::Debug;
    type Effect: Clone + core::fmt::Debug;

    /// Decide the next state. Must not perform IO.
    fn transition(
        &self,
        state: &Self::State,
        context: &Self::Context,
        event: Self::Event,
    ) -> Transition<Self::State, Self::Effect>;
}

/// Run one transition and store the resulting state in place.
///
/// Returns the effects for the caller to execute.
pub fn step<M>(
    machine: &M,
    state: &mut M::State,
    context: &M::Context,
    event: M::Event,
) -> Vec<M::Effect>
where
    M: StateMachine,
{
    let Transition { next, effects } = machine.transition(state, context, event);
    *state = next;
    effects
}
