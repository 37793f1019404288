use thiserror::Error;

/// Phases a quiz session moves through.
///
/// The session is single-threaded cooperative, so transitions are applied
/// directly; [`Finished`](SessionPhase::Finished) is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// The quiz is being fetched; nothing can be answered yet.
    Loading,
    /// The player may pick (and re-pick) one option for the current question.
    Answering,
    /// The selection is frozen and the reveal has been scheduled.
    Submitted,
    /// Correctness has been scored; waiting for the player to move on.
    Revealed,
    /// The round is over; no further mutation occurs.
    Finished,
}

/// Events that drive a session between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The quiz arrived and the first question is up.
    QuizLoaded,
    /// The player locked in their selection.
    Submit,
    /// The scheduled reveal delay ran out.
    RevealElapsed,
    /// Move on to the next question.
    NextQuestion,
    /// The last question was revealed; end the round.
    Finish,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the machine was in when the invalid event was received.
    pub from: SessionPhase,
    /// The event that cannot be applied from this phase.
    pub event: SessionEvent,
}

/// Quiz session lifecycle state machine.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    phase: SessionPhase,
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Loading,
        }
    }
}

impl SessionMachine {
    /// Create a new machine in the loading phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Apply an event, moving to the next phase when the transition is valid.
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        self.phase = self.compute_transition(event)?;
        Ok(self.phase)
    }

    fn compute_transition(&self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (SessionPhase::Loading, SessionEvent::QuizLoaded) => SessionPhase::Answering,
            (SessionPhase::Answering, SessionEvent::Submit) => SessionPhase::Submitted,
            (SessionPhase::Submitted, SessionEvent::RevealElapsed) => SessionPhase::Revealed,
            (SessionPhase::Revealed, SessionEvent::NextQuestion) => SessionPhase::Answering,
            (SessionPhase::Revealed, SessionEvent::Finish) => SessionPhase::Finished,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(machine: &mut SessionMachine, event: SessionEvent) -> SessionPhase {
        machine.apply(event).unwrap()
    }

    #[test]
    fn initial_phase_is_loading() {
        assert_eq!(SessionMachine::new().phase(), SessionPhase::Loading);
    }

    #[test]
    fn full_happy_path_through_two_questions() {
        let mut machine = SessionMachine::new();

        assert_eq!(
            apply(&mut machine, SessionEvent::QuizLoaded),
            SessionPhase::Answering
        );
        assert_eq!(
            apply(&mut machine, SessionEvent::Submit),
            SessionPhase::Submitted
        );
        assert_eq!(
            apply(&mut machine, SessionEvent::RevealElapsed),
            SessionPhase::Revealed
        );
        assert_eq!(
            apply(&mut machine, SessionEvent::NextQuestion),
            SessionPhase::Answering
        );
        assert_eq!(
            apply(&mut machine, SessionEvent::Submit),
            SessionPhase::Submitted
        );
        assert_eq!(
            apply(&mut machine, SessionEvent::RevealElapsed),
            SessionPhase::Revealed
        );
        assert_eq!(
            apply(&mut machine, SessionEvent::Finish),
            SessionPhase::Finished
        );
    }

    #[test]
    fn submit_before_load_is_rejected() {
        let mut machine = SessionMachine::new();
        let err = machine.apply(SessionEvent::Submit).unwrap_err();
        assert_eq!(err.from, SessionPhase::Loading);
        assert_eq!(err.event, SessionEvent::Submit);
    }

    #[test]
    fn reveal_cannot_be_skipped() {
        let mut machine = SessionMachine::new();
        apply(&mut machine, SessionEvent::QuizLoaded);
        apply(&mut machine, SessionEvent::Submit);

        // Advancing mid-reveal is invalid; the delay is not cancellable.
        assert!(machine.apply(SessionEvent::NextQuestion).is_err());
        assert!(machine.apply(SessionEvent::Finish).is_err());
    }

    #[test]
    fn finished_is_terminal() {
        let mut machine = SessionMachine::new();
        apply(&mut machine, SessionEvent::QuizLoaded);
        apply(&mut machine, SessionEvent::Submit);
        apply(&mut machine, SessionEvent::RevealElapsed);
        apply(&mut machine, SessionEvent::Finish);

        for event in [
            SessionEvent::QuizLoaded,
            SessionEvent::Submit,
            SessionEvent::RevealElapsed,
            SessionEvent::NextQuestion,
            SessionEvent::Finish,
        ] {
            assert!(machine.apply(event).is_err());
        }
    }
}
