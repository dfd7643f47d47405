use std::fmt;

use crate::error::{Error, Result};

/// Return code of a native SDK call. Zero is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReasonCode(pub i32);

impl ReasonCode {
    pub const SUCCESS: ReasonCode = ReasonCode(0);

    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Turn a raw return code from `call` into a `Result`.
    pub fn check(call: &'static str, rc: i32) -> Result<()> {
        if rc == 0 {
            Ok(())
        } else {
            tracing::debug!(target: "sdk", "{} failed with reason code {}", call, rc);
            Err(Error::Sdk {
                call,
                code: ReasonCode(rc),
            })
        }
    }

    pub fn description(self) -> Option<&'static str> {
        let text = match self.0 {
            0 => "success",
            1 => "citizenship expired",
            2 => "land limit exceeded",
            3 => "no such citizen",
            4 => "message length bad",
            5 => "license password contains space",
            6 => "license password too long",
            7 => "license password too short",
            8 => "license range too large",
            9 => "license range too small",
            10 => "license users too large",
            11 => "license users too small",
            12 => "license contains invalid character",
            13 => "invalid password",
            14 => "unable to mail back number",
            15 => "license world too short",
            16 => "license world too long",
            17 => "server out of memory",
            20 => "invalid world",
            21 => "server outdated",
            22 => "world already started",
            27 => "no such world",
            32 => "unauthorized",
            33 => "world already exists",
            34 => "no such license",
            57 => "too many worlds",
            58 => "must upgrade",
            59 => "bot limit exceeded",
            61 => "world expired",
            62 => "citizen does not expire",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(text) => write!(f, "{} ({})", text, self.0),
            None => write!(f, "unknown reason code {}", self.0),
        }
    }
}
