//! Simulated image generation.
//!
//! There is no model behind this: after a fixed delay the input sketch is
//! either echoed back or run through the style's built-in filter. The delay
//! is a deadline checked by [`GenerationPreview::poll`] on the UI thread, so
//! results are always delivered on the thread that asked for them.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::bitmap::BitmapRef;
use crate::filter::FilterRegistry;
use crate::style::AiStyle;

pub const DEFAULT_GENERATION_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Return the input unchanged
    Echo,
    /// Apply the style's built-in filter
    #[default]
    Filter,
}

/// Turns a sketch into the "generated" picture
#[derive(Debug, Clone)]
pub struct Generator {
    mode: GenerationMode,
    delay: Duration,
    filters: FilterRegistry,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GenerationMode::default(), DEFAULT_GENERATION_DELAY)
    }
}

impl Generator {
    pub fn new(mode: GenerationMode, delay: Duration) -> Self {
        Self {
            mode,
            delay,
            filters: FilterRegistry::builtin(),
        }
    }

    pub fn with_filters(mut self, filters: FilterRegistry) -> Self {
        self.filters = filters;
        self
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Produce the output right away.
    ///
    /// `prompt` is accepted but does not influence the result. Filter
    /// failures are absorbed: the input itself is returned.
    pub fn render(&self, input: &BitmapRef, style: AiStyle, _prompt: &str) -> BitmapRef {
        match self.mode {
            GenerationMode::Echo => input.clone(),
            GenerationMode::Filter => {
                let result = self
                    .filters
                    .build(style.filter_name())
                    .and_then(|filter| filter.apply(input));
                match result {
                    Ok(output) => Arc::new(output),
                    Err(err) => {
                        log::debug!("Style {} fell back to the input image: {}", style, err);
                        input.clone()
                    }
                }
            }
        }
    }
}

#[derive(Debug)]
struct PendingGeneration {
    input: BitmapRef,
    style: AiStyle,
    prompt: String,
    ready_at: Instant,
}

/// One preview pane's generation state: at most one generation in flight,
/// plus the trigger bookkeeping that decides when to start one.
#[derive(Debug, Default)]
pub struct GenerationPreview {
    generator: Generator,
    pending: Option<PendingGeneration>,
    output: Option<BitmapRef>,
    seen_input: Option<BitmapRef>,
    seen_style: Option<AiStyle>,
    seen_prompt: Option<String>,
    completed: u64,
}

impl GenerationPreview {
    pub fn new(generator: Generator) -> Self {
        Self {
            generator,
            ..Default::default()
        }
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    /// Latest delivered result
    pub fn output(&self) -> Option<&BitmapRef> {
        self.output.as_ref()
    }

    /// Seed the pane with a previously generated picture
    pub fn set_output(&mut self, output: Option<BitmapRef>) {
        self.output = output;
    }

    /// Number of results delivered so far
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Time left before the in-flight generation completes
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|pending| pending.ready_at.saturating_duration_since(now))
    }

    /// Start a generation. Returns false, dropping the request, when one is
    /// already in flight.
    pub fn request(&mut self, input: BitmapRef, style: AiStyle, prompt: &str, now: Instant) -> bool {
        if self.pending.is_some() {
            log::debug!("Generation already in flight, dropping trigger");
            return false;
        }
        log::debug!("Generation started ({}, {}x{})", style, input.width(), input.height());
        self.pending = Some(PendingGeneration {
            input,
            style,
            prompt: prompt.to_owned(),
            ready_at: now + self.generator.delay(),
        });
        true
    }

    /// Apply the trigger policy: start a generation when the input bitmap
    /// (by identity), the style or the prompt differs from what was last
    /// observed and there is an input to work from.
    ///
    /// Returns true when a generation was started.
    pub fn observe(&mut self, input: Option<&BitmapRef>, style: AiStyle, prompt: &str, now: Instant) -> bool {
        let input_changed = match (&self.seen_input, input) {
            (Some(seen), Some(current)) => !Arc::ptr_eq(seen, current),
            (None, None) => false,
            _ => true,
        };
        let style_changed = self.seen_style != Some(style);
        let prompt_changed = self.seen_prompt.as_deref() != Some(prompt);

        if !(input_changed || style_changed || prompt_changed) {
            return false;
        }
        self.seen_input = input.cloned();
        self.seen_style = Some(style);
        self.seen_prompt = Some(prompt.to_owned());

        match input {
            Some(input) => self.request(input.clone(), style, prompt, now),
            None => false,
        }
    }

    /// Deliver the in-flight result once its delay has passed
    pub fn poll(&mut self, now: Instant) -> Option<BitmapRef> {
        if self.pending.as_ref()?.ready_at > now {
            return None;
        }
        let pending = self.pending.take()?;
        let output = self.generator.render(&pending.input, pending.style, &pending.prompt);
        self.output = Some(output.clone());
        self.completed += 1;
        log::info!("Generation finished ({})", pending.style);
        Some(output)
    }
}
