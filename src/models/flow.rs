use serde::{Deserialize, Serialize};

/// Which activity a participant is configuring. Surf is mandatory and always
/// comes first; the rest can be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Surf,
    Yoga,
    IceBath,
    Complete,
}

impl FlowState {
    pub fn next(self) -> Option<FlowState> {
        match self {
            FlowState::Surf => Some(FlowState::Yoga),
            FlowState::Yoga => Some(FlowState::IceBath),
            FlowState::IceBath => Some(FlowState::Complete),
            FlowState::Complete => None,
        }
    }

    pub fn previous(self) -> Option<FlowState> {
        match self {
            FlowState::Surf => None,
            FlowState::Yoga => Some(FlowState::Surf),
            FlowState::IceBath => Some(FlowState::Yoga),
            FlowState::Complete => Some(FlowState::IceBath),
        }
    }

    pub fn is_mandatory(self) -> bool {
        matches!(self, FlowState::Surf)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDirection {
    Forward,
    Backward,
}

/// One recorded step. Direction carries no pricing semantics; the log exists
/// so transitions are deterministic and testable.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlowTransition {
    pub from: FlowState,
    pub to: FlowState,
    pub direction: FlowDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowError {
    MandatoryStep,
    AtStart,
    AlreadyComplete,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActivityFlow {
    pub state: FlowState,
    pub log: Vec<FlowTransition>,
}

impl Default for ActivityFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Surf,
            log: Vec::new(),
        }
    }

    fn record(&mut self, to: FlowState, direction: FlowDirection) {
        self.log.push(FlowTransition {
            from: self.state,
            to,
            direction,
        });
        self.state = to;
    }

    /// Move to the following step, whether or not the current activity was
    /// actually configured.
    pub fn advance(&mut self) -> Result<FlowState, FlowError> {
        match self.state.next() {
            Some(next) => {
                self.record(next, FlowDirection::Forward);
                Ok(self.state)
            }
            None => Err(FlowError::AlreadyComplete),
        }
    }

    /// Skip the current step. Refused for the mandatory surf step.
    pub fn skip(&mut self) -> Result<FlowState, FlowError> {
        if self.state.is_mandatory() {
            return Err(FlowError::MandatoryStep);
        }
        match self.state.next() {
            Some(next) => {
                self.record(next, FlowDirection::Forward);
                Ok(self.state)
            }
            None => Err(FlowError::AlreadyComplete),
        }
    }

    pub fn back(&mut self) -> Result<FlowState, FlowError> {
        match self.state.previous() {
            Some(prev) => {
                self.record(prev, FlowDirection::Backward);
                Ok(self.state)
            }
            None => Err(FlowError::AtStart),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == FlowState::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_through_every_step() {
        let mut flow = ActivityFlow::new();
        assert_eq!(flow.state, FlowState::Surf);
        assert_eq!(flow.advance(), Ok(FlowState::Yoga));
        assert_eq!(flow.advance(), Ok(FlowState::IceBath));
        assert_eq!(flow.advance(), Ok(FlowState::Complete));
        assert!(flow.is_complete());
        assert_eq!(flow.advance(), Err(FlowError::AlreadyComplete));
    }

    #[test]
    fn surf_cannot_be_skipped() {
        let mut flow = ActivityFlow::new();
        assert_eq!(flow.skip(), Err(FlowError::MandatoryStep));
        flow.advance().unwrap();
        assert_eq!(flow.skip(), Ok(FlowState::IceBath));
    }

    #[test]
    fn back_is_refused_at_the_start() {
        let mut flow = ActivityFlow::new();
        assert_eq!(flow.back(), Err(FlowError::AtStart));
        flow.advance().unwrap();
        assert_eq!(flow.back(), Ok(FlowState::Surf));
    }

    #[test]
    fn log_records_direction_per_transition() {
        let mut flow = ActivityFlow::new();
        flow.advance().unwrap();
        flow.advance().unwrap();
        flow.back().unwrap();

        let directions: Vec<FlowDirection> =
            flow.log.iter().map(|t| t.direction).collect();
        assert_eq!(
            directions,
            vec![
                FlowDirection::Forward,
                FlowDirection::Forward,
                FlowDirection::Backward
            ]
        );
        assert_eq!(flow.log.last().unwrap().from, FlowState::IceBath);
        assert_eq!(flow.log.last().unwrap().to, FlowState::Yoga);
    }
}
