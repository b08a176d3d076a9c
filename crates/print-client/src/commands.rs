//! Operator command catalogue and canned labels.

use serde::{Deserialize, Serialize};

/// Host identification query.
pub const HOST_IDENTIFICATION: &str = "~HI";
/// Host status query.
pub const HOST_STATUS: &str = "~HS";
/// Liveness ping understood by the fleet's printers.
pub const PING: &str = "PING";
/// Configuration dump.
pub const CONFIG_DUMP: &str = "^WD";

/// Label sent by a test print.
pub const TEST_LABEL: &str = "^XA^FO50,50^ADN,36,20^FDTest Label^FS^XZ";

/// The commands an operator can pick from, keyed by purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandCatalogue {
    /// `~HI`
    pub host_identification: &'static str,
    /// `~HS`
    pub host_status: &'static str,
    /// `PING`
    pub ping: &'static str,
    /// `^WD`
    pub config_dump: &'static str,
}

/// The built-in catalogue.
pub const CATALOGUE: CommandCatalogue = CommandCatalogue {
    host_identification: HOST_IDENTIFICATION,
    host_status: HOST_STATUS,
    ping: PING,
    config_dump: CONFIG_DUMP,
};

/// Outcome of [`send_command`](crate::send_command).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReply {
    /// First reply line without its terminator, if the printer answered
    /// before the reply window closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_serializes_by_purpose() {
        let v = serde_json::to_value(CATALOGUE).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "host_identification": "~HI",
                "host_status": "~HS",
                "ping": "PING",
                "config_dump": "^WD",
            })
        );
    }

    #[test]
    fn empty_reply_omits_response() {
        let v = serde_json::to_value(CommandReply::default()).unwrap();
        assert_eq!(v, serde_json::json!({}));
    }
}
