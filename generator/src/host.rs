use std::path::PathBuf;
use std::process::{Command, Stdio};

use nvim_api::ApiInfo;

use crate::error::{FetchError, GenerateError};

/// Where the API info comes from
pub trait SchemaSource {
    fn fetch(&self) -> Result<ApiInfo, GenerateError>;
}

/// Asks an nvim binary for its API info. Blocks until the process exits.
pub struct HostProcess {
    program: PathBuf,
}

impl HostProcess {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn api_info_bytes(&self) -> Result<Vec<u8>, FetchError> {
        let program = self.program.display().to_string();
        let output = Command::new(&self.program)
            .arg("--api-info")
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| FetchError::Spawn {
                program: program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(FetchError::HostFailed {
                program,
                status: output.status,
            });
        }
        Ok(output.stdout)
    }
}

impl SchemaSource for HostProcess {
    fn fetch(&self) -> Result<ApiInfo, GenerateError> {
        let bytes = self.api_info_bytes()?;
        log::debug!("read {} bytes of API info", bytes.len());
        Ok(ApiInfo::from_msgpack(&bytes)?)
    }
}
