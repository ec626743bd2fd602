//! Issues conversion requests as the form changes and keeps stale responses out of the state.
//!
//! Every change to the parameters advances a generation counter. Requests run as
//! abortable Tokio tasks and report back over a channel tagged with the generation
//! they were issued for; only a completion for the current generation may touch
//! the state. All mutation happens on whichever task owns the [`Converter`].

use crate::core::currency::{Conversion, ConversionProvider, Currency};
use crate::core::error::ConversionError;
use crate::core::state::{InputState, OutputView};
use futures::future::{AbortHandle, Abortable};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// The resolution of one request, tagged with the generation it was issued for.
#[derive(Debug)]
pub struct Completion {
    generation: u64,
    outcome: Result<Conversion, ConversionError>,
}

pub struct Converter {
    provider: Arc<dyn ConversionProvider>,
    state: InputState,
    generation: u64,
    in_flight: Option<AbortHandle>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl Converter {
    pub fn new(provider: Arc<dyn ConversionProvider>, from: Currency, to: Currency) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Converter {
            provider,
            state: InputState::new(from, to),
            generation: 0,
            in_flight: None,
            completions_tx,
            completions_rx,
        }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn view(&self) -> OutputView {
        self.state.view()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Must be called from within a Tokio runtime, as are the other setters.
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        if self.state.set_amount(amount) {
            self.on_params_changed();
        }
    }

    pub fn set_from(&mut self, from: Currency) {
        if self.state.set_from(from) {
            self.on_params_changed();
        }
    }

    pub fn set_to(&mut self, to: Currency) {
        if self.state.set_to(to) {
            self.on_params_changed();
        }
    }

    fn on_params_changed(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.in_flight.take() {
            debug!(
                generation = self.generation - 1,
                "Aborting request superseded by newer input"
            );
            handle.abort();
        }

        self.state.clear_result();
        let params = self.state.params().clone();
        if !params.is_valid() {
            debug!(?params, "Empty amount or same currency, skipping request");
            self.state.set_loading(false);
            return;
        }

        self.state.set_loading(true);
        let generation = self.generation;
        debug!(generation, ?params, "Issuing conversion request");

        let (handle, registration) = AbortHandle::new_pair();
        let provider = Arc::clone(&self.provider);
        let completions_tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let request = Abortable::new(provider.convert(&params), registration);
            if let Ok(outcome) = request.await {
                // The receiver only goes away with the converter itself.
                let _ = completions_tx.send(Completion {
                    generation,
                    outcome,
                });
            }
        });
        self.in_flight = Some(handle);
    }

    /// Waits for the next request to resolve. Cancel safe.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    /// Applies a completion to the state.
    ///
    /// Returns `Superseded` without touching anything when the completion belongs to an
    /// older generation. A failed current request clears the result and is returned so the
    /// caller can log it.
    pub fn reconcile(&mut self, completion: Completion) -> Result<(), ConversionError> {
        if completion.generation != self.generation {
            return Err(ConversionError::Superseded {
                generation: completion.generation,
            });
        }

        self.in_flight = None;
        self.state.set_loading(false);
        match completion.outcome {
            Ok(conversion) => {
                debug!(
                    generation = completion.generation,
                    value = conversion.value,
                    "Conversion applied"
                );
                self.state.set_result(conversion);
                Ok(())
            }
            Err(e) => {
                warn!(generation = completion.generation, error = %e, "Conversion failed");
                self.state.clear_result();
                Err(e)
            }
        }
    }

    /// Waits until no request for the current parameters is outstanding.
    pub async fn settle(&mut self) -> Result<(), ConversionError> {
        while self.state.is_loading() {
            let Some(completion) = self.completions_rx.recv().await else {
                break;
            };
            match self.reconcile(completion) {
                Err(e) if e.is_superseded() => debug!(error = %e, "Ignoring stale completion"),
                other => return other,
            }
        }
        Ok(())
    }
}
