//! Render controller
//!
//! Owns "what is currently displayed". Every (formula, style) change starts
//! a render cycle tagged with a monotonically increasing sequence number;
//! the cycle suspends once, on the engine call, and on completion publishes
//! its result only if no newer cycle has been issued since. Superseded
//! cycles are discarded silently: in-flight engine work runs to completion
//! and is simply ignored. The controller is long-lived; a failed cycle
//! leaves it fully usable for the next input change.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::artifact::{bake, serialize, BakedArtifact, ExportConfig, RawArtifact};
use crate::engine::TypesetEngine;
use crate::style::{FontVariant, StyleConfig};
use crate::typeset::typeset;

/// What the controller currently displays
///
/// Exactly one state is live at any time. `Ready` and `Failed` together
/// form the render result of the most recently requested cycle; `Failed`
/// carries no artifact, so export consumers treat it as "nothing to
/// export" rather than retaining a stale artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    /// No input has been submitted yet
    Idle,
    /// A cycle is in flight
    Rendering { seq: u64 },
    /// The latest cycle succeeded
    Ready(RenderOutput),
    /// The latest cycle failed; the diagnostic is user-facing
    Failed { seq: u64, diagnostic: String },
}

/// A published successful render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub seq: u64,
    /// Serialized standalone SVG, the export contract
    pub svg: String,
    /// The baked tree the serialization was produced from
    pub artifact: BakedArtifact,
}

/// How a completed cycle ended
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum CycleOutcome {
    /// The cycle was still the latest and its state was published
    Published(RenderState),
    /// A newer cycle was issued while this one was in flight; its result
    /// was dropped without being published
    Superseded { seq: u64 },
}

struct Shared {
    latest_seq: u64,
    /// Last raw engine output, kept so a style-only change can re-bake
    /// without re-typesetting
    memo: Option<RawMemo>,
}

struct RawMemo {
    source: String,
    variant: FontVariant,
    display_mode: bool,
    raw: RawArtifact,
}

/// The render pipeline state machine
pub struct RenderController<E: ?Sized> {
    engine: Arc<E>,
    export: ExportConfig,
    display_mode: bool,
    shared: Mutex<Shared>,
    publisher: watch::Sender<RenderState>,
}

impl<E: TypesetEngine + ?Sized> RenderController<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            export: ExportConfig::default(),
            display_mode: true,
            shared: Mutex::new(Shared {
                latest_seq: 0,
                memo: None,
            }),
            publisher: watch::Sender::new(RenderState::Idle),
        }
    }

    /// Set the export configuration used for serialization
    pub fn with_export_config(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    /// Set whether formulas are typeset in display (block) mode
    pub fn with_display_mode(mut self, display_mode: bool) -> Self {
        self.display_mode = display_mode;
        self
    }

    /// Watch the published state as it changes
    pub fn subscribe(&self) -> watch::Receiver<RenderState> {
        self.publisher.subscribe()
    }

    /// Snapshot of the currently published state
    pub fn current(&self) -> RenderState {
        self.publisher.borrow().clone()
    }

    /// Serialized artifact for export consumers, if a valid one is current
    ///
    /// `None` whenever the latest cycle failed or nothing has rendered yet;
    /// download and clipboard actions no-op in that case.
    pub fn current_svg(&self) -> Option<String> {
        match &*self.publisher.borrow() {
            RenderState::Ready(output) => Some(output.svg.clone()),
            _ => None,
        }
    }

    /// Run one render cycle for a (formula, style) pair
    ///
    /// This is the single entry point for every formula source provider:
    /// typed edits, symbol insertion, presets, and generated formulas all
    /// land here. The future resolves when the cycle completes, whether or
    /// not its result was published.
    pub async fn submit(&self, source: &str, style: &StyleConfig) -> CycleOutcome {
        let (seq, memo_hit) = {
            let mut shared = self.shared.lock().expect("controller state poisoned");
            shared.latest_seq += 1;
            let seq = shared.latest_seq;
            let memo_hit = shared.memo.as_ref().and_then(|memo| {
                (memo.source == source
                    && memo.variant == style.variant
                    && memo.display_mode == self.display_mode)
                    .then(|| memo.raw.clone())
            });
            // publish inside the lock so Rendering states appear in issue order
            self.publisher.send_replace(RenderState::Rendering { seq });
            (seq, memo_hit)
        };

        let typeset_result = match memo_hit {
            // style-only change: re-bake the memoized raw artifact, no
            // engine call and no suspension
            Some(raw) => Ok(raw),
            None => {
                typeset(self.engine.as_ref(), source, style.variant, self.display_mode).await
            }
        };

        let mut shared = self.shared.lock().expect("controller state poisoned");
        if shared.latest_seq != seq {
            debug!(
                target: "mathsmith::controller",
                op = "submit",
                seq,
                latest_seq = shared.latest_seq,
                result = "superseded",
                "Discarding stale render result"
            );
            return CycleOutcome::Superseded { seq };
        }

        let state = match typeset_result {
            Ok(raw) => {
                shared.memo = Some(RawMemo {
                    source: source.to_string(),
                    variant: style.variant,
                    display_mode: self.display_mode,
                    raw: raw.clone(),
                });
                let artifact = bake(&raw, style);
                match serialize(&artifact, &self.export) {
                    Ok(svg) => {
                        info!(
                            target: "mathsmith::controller",
                            op = "submit",
                            seq,
                            result = "ready",
                            svg_bytes = svg.len(),
                            "Published render result"
                        );
                        RenderState::Ready(RenderOutput { seq, svg, artifact })
                    }
                    Err(err) => RenderState::Failed {
                        seq,
                        diagnostic: err.to_string(),
                    },
                }
            }
            Err(err) => {
                info!(
                    target: "mathsmith::controller",
                    op = "submit",
                    seq,
                    result = "failed",
                    diagnostic = %err,
                    "Render cycle failed"
                );
                RenderState::Failed {
                    seq,
                    diagnostic: err.to_string(),
                }
            }
        };

        self.publisher.send_replace(state.clone());
        CycleOutcome::Published(state)
    }
}

impl<E: TypesetEngine + ?Sized + 'static> RenderController<E> {
    /// Fire-and-forget submission for event-loop callers
    ///
    /// Spawns the cycle onto the runtime; superseded outcomes are dropped
    /// here, which is exactly their contract.
    pub fn spawn_submit(self: &Arc<Self>, source: String, style: StyleConfig) {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let _ = controller.submit(&source, &style).await;
        });
    }
}
