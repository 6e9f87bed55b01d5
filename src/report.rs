//! Salida de consola del binario.
//!
//! Las líneas se derivan de los eventos del driver: `ConsoleEventLog` guarda
//! cada evento en memoria y escribe su línea (si tiene) en el writer.

use log::{debug, warn};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use uuid::Uuid;

use smoke_core::{DiagnosticOutcome, EventLog, HarnessEvent, HarnessEventKind, InMemoryEventLog, ProbePhase, Status};

use crate::errors::BootstrapError;

/// Línea de consola de un evento, o `None` si el evento no se muestra.
pub fn render_event(kind: &HarnessEventKind) -> Option<String> {
    let line = match kind {
        HarnessEventKind::RunStarted { .. } => "--- Starting YOLOv3 Smoke Test ---".to_string(),
        HarnessEventKind::StateEntered { .. } => return None,
        HarnessEventKind::AttemptFailed { kind, strategy, error } => format!("[locate] {kind}: {strategy} missed: {error}"),
        HarnessEventKind::ArtifactResolved { kind, strategy, detail } => {
            if strategy == detail {
                format!("[locate] {kind}: resolved via {strategy}")
            } else {
                format!("[locate] {kind}: resolved via {strategy} ({detail})")
            }
        }
        HarnessEventKind::ResolutionFailed { kind, attempts } => {
            format!("[locate] {kind}: no strategy succeeded ({attempts} tried)")
        }
        HarnessEventKind::Provisioned { path, fetched: true, bytes } => {
            format!("[provision] downloaded {bytes} bytes to {}", path.display())
        }
        HarnessEventKind::Provisioned { path, .. } => format!("[provision] {} already present", path.display()),
        HarnessEventKind::ProvisioningFailed { error } => format!("[provision] failed: {error}; probing anyway"),
        HarnessEventKind::ProbePhase { phase } => match phase {
            ProbePhase::Constructing => "--> Loading Darknet model...".to_string(),
            ProbePhase::MovingToCpu => return None,
            ProbePhase::Inferring => "--> Running Inference...".to_string(),
        },
        HarnessEventKind::ProbeSucceeded { output } => format!("--> Inference Successful. Output type: {output}"),
        HarnessEventKind::ProbeFailed { fault } => {
            format!("[probe] {} failed: {}: {}", fault.origin, fault.class, fault.message)
        }
        HarnessEventKind::Diagnosed { line, .. } => line.clone(),
        HarnessEventKind::RunFinished { status: Status::Pass, .. } => "--- SMOKE TEST PASSED ---".to_string(),
        HarnessEventKind::RunFinished { category, .. } => format!("--- SMOKE TEST FAILED ({category}) ---"),
    };
    Some(line)
}

/// `EventLog` que además imprime cada evento al registrarlo.
pub struct ConsoleEventLog<W: Write> {
    inner: InMemoryEventLog,
    out: W,
}

impl<W: Write> ConsoleEventLog<W> {
    pub fn new(out: W) -> Self {
        Self { inner: InMemoryEventLog::default(),
               out }
    }

    pub fn into_parts(self) -> (InMemoryEventLog, W) { (self.inner, self.out) }
}

impl ConsoleEventLog<io::Stdout> {
    pub fn stdout() -> Self { Self::new(io::stdout()) }
}

impl<W: Write> EventLog for ConsoleEventLog<W> {
    fn append_kind(&mut self, run_id: Uuid, kind: HarnessEventKind) -> HarnessEvent {
        let ev = self.inner.append_kind(run_id, kind);
        debug!("event #{} {:?}", ev.seq, ev.kind);
        if let Some(line) = render_event(&ev.kind) {
            if let Err(e) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
                warn!("console write failed: {e}");
            }
        }
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<HarnessEvent> { self.inner.list(run_id) }
}

/// Publica el registro JSON (stdout con `--json`, fichero con
/// `--result-file`) y devuelve el código de salida del resultado.
///
/// Un fallo al publicar se informa por stderr; el código sigue siendo el del
/// diagnóstico.
pub fn publish_outcome(outcome: &DiagnosticOutcome, json: bool, result_file: Option<&Path>) -> u8 {
    if json || result_file.is_some() {
        if let Err(e) = write_record(outcome, json, result_file) {
            eprintln!("[darknet-smoke] {e}");
        }
    }
    outcome.exit_code() as u8
}

fn write_record(outcome: &DiagnosticOutcome, json: bool, result_file: Option<&Path>) -> Result<(), BootstrapError> {
    let record = outcome.to_json()?;
    if json {
        println!("{record}");
    }
    if let Some(path) = result_file {
        fs::write(path, &record).map_err(|source| BootstrapError::ResultFile { path: path.to_path_buf(),
                                                                               source })?;
    }
    Ok(())
}
