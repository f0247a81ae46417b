//! Local/remote session detection.
//!
//! When running over SSH, media is played on the client machine rather than
//! on the server the browser runs on. The header banner shows which case
//! applies and whether a terminal multiplexer is in use.

use std::env;

/// Addresses taken from `SSH_CONNECTION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    /// Address of the machine the user connected from
    pub client_ip: String,
    /// Address of this machine as seen by the client
    pub server_ip: String,
}

/// How the user is attached to this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Set when running inside an SSH session
    pub remote: Option<RemoteEndpoint>,
    /// Running under screen or tmux
    pub multiplexed: bool,
    /// Login name
    pub user: String,
    /// Host name of this machine
    pub hostname: String,
}

impl ConnectionInfo {
    /// Detect the connection from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        let hostname = sysinfo::System::host_name().unwrap_or_else(|| "localhost".to_string());
        Self::from_vars(|key| env::var(key).ok(), hostname)
    }

    /// Build from an arbitrary variable lookup.
    #[must_use]
    pub fn from_vars<F>(var: F, hostname: String) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let remote = var("SSH_CONNECTION").and_then(|s| parse_ssh_connection(&s));
        let multiplexed = var("STY").is_some() || var("TMUX").is_some();
        let user = var("USER").unwrap_or_else(|| "user".to_string());
        Self {
            remote,
            multiplexed,
            user,
            hostname,
        }
    }

    /// A plain local session.
    #[must_use]
    pub fn local() -> Self {
        Self {
            remote: None,
            multiplexed: false,
            user: "user".to_string(),
            hostname: "localhost".to_string(),
        }
    }

    /// Header banner, e.g. `[ REMOTE (SCREEN/TMUX): ann@box ]`.
    #[must_use]
    pub fn banner(&self) -> String {
        let session = if self.multiplexed { " (SCREEN/TMUX)" } else { "" };
        match self.remote {
            Some(_) => format!("[ REMOTE{session}: {}@{} ]", self.user, self.hostname),
            None => format!("[ LOCAL{session} ]"),
        }
    }
}

/// Parse `"<client_ip> <client_port> <server_ip> <server_port>"`.
#[must_use]
pub fn parse_ssh_connection(value: &str) -> Option<RemoteEndpoint> {
    let mut parts = value.split_whitespace();
    let client_ip = parts.next()?.to_string();
    let _client_port = parts.next()?;
    let server_ip = parts.next()?.to_string();
    Some(RemoteEndpoint {
        client_ip,
        server_ip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn info(vars: &[(&str, &str)]) -> ConnectionInfo {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConnectionInfo::from_vars(|k| map.get(k).cloned(), "box".to_string())
    }

    #[test]
    fn test_local_banner() {
        assert_eq!(info(&[]).banner(), "[ LOCAL ]");
        assert_eq!(info(&[("TMUX", "/tmp/x")]).banner(), "[ LOCAL (SCREEN/TMUX) ]");
    }

    #[test]
    fn test_remote_banner() {
        let conn = info(&[
            ("SSH_CONNECTION", "10.0.0.5 51234 10.0.0.9 22"),
            ("USER", "ann"),
        ]);
        assert_eq!(conn.banner(), "[ REMOTE: ann@box ]");
        let remote = conn.remote.unwrap();
        assert_eq!(remote.client_ip, "10.0.0.5");
        assert_eq!(remote.server_ip, "10.0.0.9");
    }

    #[test]
    fn test_remote_multiplexed_banner() {
        let conn = info(&[("SSH_CONNECTION", "1.2.3.4 1 5.6.7.8 22"), ("STY", "123.pts")]);
        assert_eq!(conn.banner(), "[ REMOTE (SCREEN/TMUX): user@box ]");
    }

    #[test]
    fn test_malformed_ssh_connection_is_local() {
        assert!(parse_ssh_connection("10.0.0.5").is_none());
        assert!(info(&[("SSH_CONNECTION", "")]).remote.is_none());
    }
}
