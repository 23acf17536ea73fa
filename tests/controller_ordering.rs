//! Render controller ordering and staleness tests
//!
//! Covers the critical invariant: results apply in request order, not
//! completion order. The engine double lets each cycle's completion be
//! released by hand so races are deterministic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use mathsmith::{
    CycleOutcome, EngineError, RenderController, RenderState, StyleConfig, TypesetEngine,
};

/// Engine whose responses wait behind per-source gates
#[derive(Default)]
struct GatedEngine {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<String, EngineError>>>>,
}

impl GatedEngine {
    fn gate(&self, source: &str) -> oneshot::Sender<Result<String, EngineError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(source.to_string(), rx);
        tx
    }

    fn svg_for(source: &str) -> String {
        format!(r#"<svg width="2ex" height="1ex"><text>{source}</text></svg>"#)
    }
}

#[async_trait]
impl TypesetEngine for GatedEngine {
    async fn typeset(&self, source: &str, _display_mode: bool) -> Result<String, EngineError> {
        let gate = self.gates.lock().unwrap().remove(source);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(EngineError::Failed("gate dropped".to_string()))),
            None => Ok(Self::svg_for(source)),
        }
    }
}

fn setup() -> (Arc<GatedEngine>, Arc<RenderController<GatedEngine>>) {
    let engine = Arc::new(GatedEngine::default());
    let controller = Arc::new(RenderController::new(Arc::clone(&engine)));
    (engine, controller)
}

#[tokio::test]
async fn later_request_wins_even_when_it_completes_first() {
    let (engine, controller) = setup();
    let style = StyleConfig::default();

    // cycle A starts first and stalls inside the engine
    let gate_a = engine.gate("A");
    let task_a = tokio::spawn({
        let controller = Arc::clone(&controller);
        let style = style.clone();
        async move { controller.submit("A", &style).await }
    });
    tokio::task::yield_now().await;

    // cycle B arrives strictly after A
    let gate_b = engine.gate("B");
    let task_b = tokio::spawn({
        let controller = Arc::clone(&controller);
        let style = style.clone();
        async move { controller.submit("B", &style).await }
    });
    tokio::task::yield_now().await;

    // B resolves before A
    gate_b.send(Ok(GatedEngine::svg_for("B"))).ok();
    let outcome_b = task_b.await.expect("join");
    assert!(matches!(
        outcome_b,
        CycleOutcome::Published(RenderState::Ready(_))
    ));

    // A resolves afterwards and must be dropped
    gate_a.send(Ok(GatedEngine::svg_for("A"))).ok();
    let outcome_a = task_a.await.expect("join");
    assert!(matches!(outcome_a, CycleOutcome::Superseded { seq: 1 }));

    let current = controller.current_svg().expect("B is current");
    assert!(current.contains(">B<"), "expected B, got: {current}");
}

#[tokio::test]
async fn stale_failure_does_not_clobber_newer_success() {
    let (engine, controller) = setup();
    let style = StyleConfig::default();

    let gate_bad = engine.gate("bad");
    let task_bad = tokio::spawn({
        let controller = Arc::clone(&controller);
        let style = style.clone();
        async move { controller.submit("bad", &style).await }
    });
    tokio::task::yield_now().await;

    // newer cycle succeeds immediately
    let outcome = controller.submit("good", &style).await;
    assert!(matches!(
        outcome,
        CycleOutcome::Published(RenderState::Ready(_))
    ));

    // the old cycle then fails; the failure must be suppressed
    gate_bad
        .send(Err(EngineError::Syntax("boom".to_string())))
        .ok();
    let outcome_bad = task_bad.await.expect("join");
    assert!(matches!(outcome_bad, CycleOutcome::Superseded { .. }));
    assert!(controller.current_svg().is_some());
}

#[tokio::test]
async fn failure_invalidates_prior_artifact_until_next_success() {
    let (_, controller) = setup();
    let style = StyleConfig::default();

    let _ = controller.submit("fine", &style).await;
    assert!(controller.current_svg().is_some());

    struct AlwaysBroken;
    #[async_trait]
    impl TypesetEngine for AlwaysBroken {
        async fn typeset(&self, _: &str, _: bool) -> Result<String, EngineError> {
            Err(EngineError::Syntax("Missing open brace".to_string()))
        }
    }
    let broken = Arc::new(RenderController::new(Arc::new(AlwaysBroken)));
    let _ = broken.submit("fine", &style).await;
    match broken.current() {
        RenderState::Failed { diagnostic, .. } => {
            assert_eq!(diagnostic, "Missing open brace")
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(broken.current_svg(), None);
}

#[tokio::test]
async fn republishing_same_pair_yields_identical_serialization() {
    let (_, controller) = setup();
    let style = StyleConfig::default();

    let first = match controller.submit("x^2", &style).await {
        CycleOutcome::Published(RenderState::Ready(output)) => output.svg,
        other => panic!("unexpected outcome: {other:?}"),
    };
    let second = match controller.submit("x^2", &style).await {
        CycleOutcome::Published(RenderState::Ready(output)) => output.svg,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(first, second);
}

#[tokio::test]
async fn rapid_edits_end_on_last_requested_formula() {
    let (engine, controller) = setup();
    let style = StyleConfig::default();

    // hold every cycle open, release them out of order
    let gates: Vec<_> = ["e1", "e2", "e3"]
        .iter()
        .map(|s| engine.gate(s))
        .collect();
    let mut tasks = Vec::new();
    for source in ["e1", "e2", "e3"] {
        let controller = Arc::clone(&controller);
        let style = style.clone();
        tasks.push(tokio::spawn(async move {
            controller.submit(source, &style).await
        }));
        tokio::task::yield_now().await;
    }

    for (gate, source) in gates.into_iter().zip(["e1", "e2", "e3"]) {
        gate.send(Ok(GatedEngine::svg_for(source))).ok();
    }
    let mut published = 0;
    for task in tasks {
        if matches!(task.await.expect("join"), CycleOutcome::Published(_)) {
            published += 1;
        }
    }

    assert_eq!(published, 1, "only the last requested cycle publishes");
    let current = controller.current_svg().expect("artifact current");
    assert!(current.contains(">e3<"), "expected e3, got: {current}");
}
