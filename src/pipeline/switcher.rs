use tokio_util::sync::CancellationToken;

/// Switch-to-latest flight tracker for one request stream.
///
/// Each [`begin`](Self::begin) hands out a ticket carrying a monotonically
/// increasing generation and cancels the previous ticket's token. A result is
/// applied only if its generation still matches
/// [`is_current`](Self::is_current). Logical cancellation is unconditional;
/// the token merely lets the transport abort wasted work.
#[derive(Debug, Default)]
pub struct FlightSwitch {
    generation: u64,
    abort: Option<CancellationToken>,
}

/// Token handed to one spawned call.
#[derive(Debug, Clone)]
pub struct FlightTicket {
    pub generation: u64,
    pub abort: CancellationToken,
}

impl FlightSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new flight, superseding any in-flight predecessor.
    pub fn begin(&mut self) -> FlightTicket {
        if let Some(prior) = self.abort.take() {
            prior.cancel();
        }
        self.generation += 1;
        let abort = CancellationToken::new();
        self.abort = Some(abort.clone());
        FlightTicket {
            generation: self.generation,
            abort,
        }
    }

    /// Supersede any in-flight call without starting a new one (used by the
    /// short-circuit paths that clear state directly).
    pub fn invalidate(&mut self) {
        if let Some(prior) = self.abort.take() {
            prior.cancel();
        }
        self.generation += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}
