// Copyright 2026 HIL Test Platform Team

//! The test executor: a phase-sequenced state machine that drives one run
//! through a sequence of phases, arbitrating between the state bus, the
//! logger sink, and the monitors watching incoming telemetry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hiltest_core::{ChannelId, EnvironmentalState, Timestamp};
use hiltest_monitor::Monitor;
use hiltest_state::StatePublisher;
use hiltest_streaming::StreamSubscriber;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::context::TestContext;
use crate::error::{Error, Result};
use crate::ledger::{RunLedger, RunResult, RunStatus};
use crate::logger::{LogTags, LoggerSink};
use crate::phase::{PhaseResult, PhaseStatus, TestPhase};

/// How repeatedly the executor drives its phase list in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// A single pass through all phases.
    Functional,
    /// Repeated passes until a phase fails or abort is requested.
    Hass,
    /// Repeated passes with progressive stress; identical control flow to
    /// `Hass` — the phase definitions themselves carry the escalation.
    Halt,
}

/// The outcome of one pass through the phase list.
enum PassOutcome {
    Completed,
    Failed,
    Aborted,
    StoppedEarly,
}

/// Drives one station through a sequence of [`TestPhase`]s, publishing
/// state transitions, routing telemetry to monitors, and supervising a
/// logger sink across the run.
///
/// Exactly one run may be in progress at a time; a concurrent `run` call
/// fails with [`Error::Busy`].
pub struct Executor {
    phases: Vec<TestPhase>,
    mode: ExecutionMode,
    state_publisher: Option<Arc<StatePublisher>>,
    telemetry: Option<Arc<StreamSubscriber>>,
    monitors: Vec<Arc<Monitor>>,
    logger: Option<Arc<dyn LoggerSink>>,
    busy: AtomicBool,
    abort_requested: AtomicBool,
    stop_requested: AtomicBool,
    last_stable_state: Arc<Mutex<Option<EnvironmentalState>>>,
    ledger: Arc<Mutex<RunLedger>>,
}

impl Executor {
    /// Build an executor for `phases` run in `mode`, with no state
    /// publisher, telemetry, monitors, or logger attached.
    pub fn new(phases: Vec<TestPhase>, mode: ExecutionMode) -> Self {
        Self {
            phases,
            mode,
            state_publisher: None,
            telemetry: None,
            monitors: Vec::new(),
            logger: None,
            busy: AtomicBool::new(false),
            abort_requested: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            last_stable_state: Arc::new(Mutex::new(None)),
            ledger: Arc::new(Mutex::new(RunLedger::default())),
        }
    }

    /// Attach a state publisher; phase transitions are broadcast through it.
    pub fn with_state_publisher(mut self, publisher: Arc<StatePublisher>) -> Self {
        self.state_publisher = Some(publisher);
        self
    }

    /// Attach a telemetry subscriber and the monitors that evaluate its frames.
    pub fn with_monitoring(mut self, telemetry: Arc<StreamSubscriber>, monitors: Vec<Arc<Monitor>>) -> Self {
        self.telemetry = Some(telemetry);
        self.monitors = monitors;
        self
    }

    /// Attach a logger sink; `start`/`stop` are called once per run.
    pub fn with_logger(mut self, logger: Arc<dyn LoggerSink>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Request cooperative abort. Checked at the next phase boundary; the
    /// current phase's actions are never interrupted mid-flight.
    pub fn abort(&self) {
        self.abort_requested.store(true, Ordering::SeqCst);
        warn!("abort requested");
    }

    /// Request a graceful stop after the current cycle (`hass`/`halt`
    /// modes only; a no-op mid-cycle boundary check for `functional`).
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    /// True while a run is in progress.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// A snapshot of the run ledger, observable whether or not a run is
    /// currently in progress.
    pub async fn status(&self) -> RunLedger {
        self.ledger.lock().await.clone()
    }

    /// Run a complete test: setup the logger, drive phases per `mode`,
    /// and guarantee teardown (logger `stop`) on every exit path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] if another run is already in progress.
    pub async fn run(&self, test_id: impl Into<String>, tags: LogTags) -> Result<RunResult> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(Error::Busy);
        }

        *self.ledger.lock().await = RunLedger { status: Some(RunStatus::Running), ..RunLedger::default() };
        *self.last_stable_state.lock().await = None;

        let test_id = test_id.into();
        let mut context = TestContext::new(test_id.clone(), String::new());
        context.start();

        info!(test_id = %test_id, "run started");

        if let Some(logger) = &self.logger {
            if let Err(e) = logger.start(tags).await {
                self.busy.store(false, Ordering::SeqCst);
                return Err(Error::Logger(e.to_string()));
            }
        }

        let monitor_task = self.spawn_monitor_supervision();

        let (status, message, errors) = self.run_mode(&mut context).await;

        if let Some(handle) = monitor_task {
            handle.abort();
            let _ = handle.await;
        }

        if let Some(logger) = &self.logger {
            if let Err(e) = logger.stop().await {
                warn!(error = %e, "logger stop failed");
            }
        }

        context.stop();
        self.ledger.lock().await.status = Some(status);
        self.abort_requested.store(false, Ordering::SeqCst);
        self.stop_requested.store(false, Ordering::SeqCst);
        self.busy.store(false, Ordering::SeqCst);

        info!(test_id = %test_id, status = ?status, "run finished");

        let ledger = self.ledger.lock().await;
        Ok(RunResult {
            test_id,
            status,
            start_time: context.start_time.expect("context.start() sets start_time"),
            end_time: context.end_time.expect("context.stop() sets end_time"),
            phase_results: ledger.phase_results.clone(),
            monitor_results: ledger.monitor_results.clone(),
            cycle_count: ledger.cycle_count,
            message,
            errors,
        })
    }

    fn spawn_monitor_supervision(&self) -> Option<JoinHandle<()>> {
        let telemetry = self.telemetry.clone()?;
        if self.monitors.is_empty() && self.logger.is_none() {
            return None;
        }
        let monitors = self.monitors.clone();
        let last_stable_state = self.last_stable_state.clone();
        let ledger = self.ledger.clone();
        let logger = self.logger.clone();
        Some(tokio::spawn(async move {
            supervise_monitors(telemetry, monitors, last_stable_state, ledger, logger).await;
        }))
    }

    async fn run_mode(&self, context: &mut TestContext) -> (RunStatus, String, Vec<String>) {
        match self.mode {
            ExecutionMode::Functional => match self.run_pass(context).await {
                PassOutcome::Completed => (RunStatus::Passed, "run completed successfully".to_string(), vec![]),
                PassOutcome::Failed => (RunStatus::Failed, "one or more phases failed".to_string(), vec![]),
                PassOutcome::Aborted => (RunStatus::Aborted, "run aborted".to_string(), vec![]),
                PassOutcome::StoppedEarly => (RunStatus::Aborted, "run stopped before completion".to_string(), vec![]),
            },
            ExecutionMode::Hass | ExecutionMode::Halt => loop {
                let outcome = self.run_pass(context).await;
                self.ledger.lock().await.cycle_count += 1;
                match outcome {
                    PassOutcome::Completed => {
                        if self.stop_requested.load(Ordering::SeqCst) {
                            break (RunStatus::Passed, "run stopped after completing a cycle".to_string(), vec![]);
                        }
                    }
                    PassOutcome::Failed => {
                        break (RunStatus::Failed, "one or more phases failed".to_string(), vec![]);
                    }
                    PassOutcome::Aborted => {
                        break (RunStatus::Aborted, "run aborted".to_string(), vec![]);
                    }
                    PassOutcome::StoppedEarly => {
                        break (RunStatus::Aborted, "run stopped mid-cycle".to_string(), vec![]);
                    }
                }
            },
        }
    }

    async fn run_pass(&self, context: &mut TestContext) -> PassOutcome {
        for phase in &self.phases {
            if self.abort_requested.load(Ordering::SeqCst) {
                return PassOutcome::Aborted;
            }
            if self.stop_requested.load(Ordering::SeqCst) {
                return PassOutcome::StoppedEarly;
            }

            if phase.should_skip(context) {
                self.ledger.lock().await.push_phase_result(phase.skipped_result());
                continue;
            }

            if !phase.state.is_transition {
                *self.last_stable_state.lock().await = Some(phase.state.clone());
            }

            if let Some(publisher) = &self.state_publisher {
                if let Err(e) = publisher.set_state(phase.state.clone(), &phase.name).await {
                    let err = Error::TransportUnavailable(e.to_string());
                    error!(phase = %phase.name, error = %err, "state publish failed, failing phase");
                    let now = Timestamp::now("executor");
                    self.ledger.lock().await.push_phase_result(PhaseResult {
                        phase_name: phase.name.clone(),
                        status: PhaseStatus::Failed,
                        start_time: now.clone(),
                        end_time: now,
                        state_id: phase.state_id().clone(),
                        message: err.to_string(),
                        errors: vec![err.to_string()],
                    });
                    return PassOutcome::Failed;
                }
            }

            let result = phase.run_actions(context).await;
            let failed = result.status == PhaseStatus::Failed;
            if failed {
                let err = Error::PhaseFailed { phase: phase.name.clone(), message: result.message.clone() };
                error!(phase = %phase.name, error = %err, "phase failed");
            }
            self.ledger.lock().await.push_phase_result(result);

            if failed {
                return PassOutcome::Failed;
            }
        }
        PassOutcome::Completed
    }
}

async fn supervise_monitors(
    telemetry: Arc<StreamSubscriber>,
    monitors: Vec<Arc<Monitor>>,
    last_stable_state: Arc<Mutex<Option<EnvironmentalState>>>,
    ledger: Arc<Mutex<RunLedger>>,
    logger: Option<Arc<dyn LoggerSink>>,
) {
    loop {
        let Some(data) = telemetry.recv().await else { break };
        let Some(schema) = telemetry.schema().await else { continue };
        process_telemetry_batch(&data, &schema, &monitors, &last_stable_state, &ledger, logger.as_ref()).await;
    }
}

/// Route one decoded telemetry batch to the logger sink (verbatim, once
/// per batch) and to every running monitor (once per sample, in arrival
/// order, so no mid-batch violation is skipped).
async fn process_telemetry_batch(
    data: &hiltest_core::StreamData,
    schema: &hiltest_core::StreamSchema,
    monitors: &[Arc<Monitor>],
    last_stable_state: &Mutex<Option<EnvironmentalState>>,
    ledger: &Mutex<RunLedger>,
    logger: Option<&Arc<dyn LoggerSink>>,
) {
    if let Some(logger) = logger {
        let topic = schema.source_id().as_str();
        if let Err(e) = logger.register_schema(topic, schema.clone()).await {
            warn!(topic, error = %e, "failed to register logger schema");
        }
        if let Err(e) = logger.log(topic, data.clone()).await {
            warn!(topic, error = %e, "failed to log telemetry batch");
        }
    }

    let Some(state) = last_stable_state.lock().await.clone() else { return };

    for sample in &data.samples {
        let mut values = std::collections::HashMap::new();
        for (field, value) in schema.fields().iter().zip(sample.iter()) {
            values.insert(ChannelId::from(field.name.clone()), value.as_f64());
        }

        for monitor in monitors {
            if !monitor.is_running() {
                continue;
            }
            let result = monitor.evaluate(&values, &state);
            ledger.lock().await.push_monitor_result(result);
        }
    }
}
