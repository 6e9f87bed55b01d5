//! Intérprete Python por subproceso (backend por defecto).

use log::{debug, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::protocol::{parse_reply, reply_line, BridgeError, BridgeReply, BridgeRequest};

/// Código fuente del wrapper; se pasa con `-c` o se carga como módulo.
pub const PROBE_SCRIPT: &str = include_str!("../python/darknet_probe.py");

/// Ejecuta una petición del puente en un intérprete Python.
pub trait Interpreter {
    fn call(&self, request: &BridgeRequest) -> Result<BridgeReply, BridgeError>;
}

/// Lanza `program -c PROBE_SCRIPT` por cada petición, con la petición en
/// stdin y `workdir` como directorio actual.
#[derive(Debug, Clone)]
pub struct SubprocessInterpreter {
    program: String,
    workdir: PathBuf,
}

impl SubprocessInterpreter {
    pub fn new(program: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self { program: program.into(),
               workdir: workdir.into() }
    }

    pub fn program(&self) -> &str { &self.program }

    pub fn workdir(&self) -> &Path { &self.workdir }
}

impl Interpreter for SubprocessInterpreter {
    fn call(&self, request: &BridgeRequest) -> Result<BridgeReply, BridgeError> {
        let payload = request.payload(&self.workdir)?;
        debug!("bridge: {} <- {}", self.program, payload);
        let spawn_err = |source| BridgeError::Spawn { program: self.program.clone(),
                                                      source };
        let mut child = Command::new(&self.program).arg("-c")
                                                   .arg(PROBE_SCRIPT)
                                                   .current_dir(&self.workdir)
                                                   .stdin(Stdio::piped())
                                                   .stdout(Stdio::piped())
                                                   .stderr(Stdio::piped())
                                                   .spawn()
                                                   .map_err(spawn_err)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(payload.as_bytes()).map_err(spawn_err)?;
        }
        let output = child.wait_with_output().map_err(spawn_err)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        match reply_line(&stdout) {
            Some(line) => {
                debug!("bridge: {} -> {}", self.program, line);
                parse_reply(line)
            }
            None => {
                warn!("bridge: no reply from {} ({})", self.program, output.status);
                Err(BridgeError::NoReply { status: output.status.to_string(),
                                           stderr: stderr.trim().to_string() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_exposes_dispatch_entry_point() {
        assert!(PROBE_SCRIPT.contains("def dispatch(payload_json)"));
        assert!(PROBE_SCRIPT.contains("torch.no_grad()"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let interp = SubprocessInterpreter::new("definitely-not-a-python-binary", ".");
        let req = BridgeRequest::Resolve { module: "models".into(),
                                           symbol: "Darknet".into() };
        assert!(matches!(interp.call(&req), Err(BridgeError::Spawn { .. })));
    }
}
