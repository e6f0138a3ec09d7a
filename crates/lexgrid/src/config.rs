//! Client configuration.

use lexgrid_protocol::FramingMode;

/// The default game server port.
pub const DEFAULT_PORT: u16 = 5555;

/// Configuration for a [`GameClient`](crate::GameClient).
///
/// The framing mode is a fixed property of the server deployment, not
/// something negotiated on the wire. Pointing a length-prefixed client
/// at a raw-framing server (or vice versa) produces malformed frames
/// immediately — configure it to match the server, never guess.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP.
    pub host: String,

    /// Server TCP port.
    pub port: u16,

    /// Which framing convention the server speaks.
    pub framing: FramingMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            framing: FramingMode::default(),
        }
    }
}

impl ClientConfig {
    /// Creates a config for the given host and port with the default
    /// (length-prefixed) framing.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Overrides the framing mode.
    pub fn framing(mut self, framing: FramingMode) -> Self {
        self.framing = framing;
        self
    }

    /// The `host:port` dial string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
