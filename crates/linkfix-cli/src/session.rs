//! Connecting to the instance, with one chance to fix the login.

use crate::config::{ConfigFile, RunConfig};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::prompt::{reenter_credentials, Prompter};
use linkfix_sdk::{RestClient, SdkError};
use tracing::{error, info};

/// Validate the configuration and connect.
///
/// When the instance rejects the login or cannot be reached, the user may
/// enter new credentials once. A second failure aborts the run.
pub fn connect<P: Prompter>(
    file: &mut ConfigFile,
    prompter: &mut P,
    formatter: &Formatter,
) -> Result<(RunConfig, RestClient)> {
    let config = RunConfig::from_file(file)?;

    let first_error = match try_connect(&config) {
        Ok(client) => return Ok((config, client)),
        Err(e @ (SdkError::AuthError(_) | SdkError::ConnectionError(_))) => e,
        Err(e) => return Err(e.into()),
    };

    error!(
        "Failed to authenticate to <{}>: {}",
        config.instance_url, first_error
    );
    eprintln!(
        "{}",
        formatter.error(&format!(
            "Failed to authenticate to <{}>",
            config.instance_url
        ))
    );

    let Some(entered) = reenter_credentials(prompter, formatter)? else {
        return Err(CliError::Auth(first_error.to_string()));
    };
    file.set_credentials(entered);

    let config = RunConfig::from_file(file)?;
    let client = try_connect(&config).map_err(|e| CliError::Auth(e.to_string()))?;
    Ok((config, client))
}

fn try_connect(config: &RunConfig) -> std::result::Result<RestClient, SdkError> {
    let client = RestClient::new(
        &config.instance_url,
        config.credentials.clone(),
        config.client_options(),
    )?;
    client.connect()?;
    info!("Successfully connected to instance: <{}>", config.instance_url);
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Stub answering `401` until the Authorization header carries `accepted`
    fn start_stub(accepted: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut buffer = [0u8; 4096];
                let n = stream.read(&mut buffer).unwrap_or(0);
                let head = String::from_utf8_lossy(&buffer[..n]).to_string();

                let (status, body) = if head.contains(accepted) {
                    (200, r#"{"meta":{"status":"OK"},"data":{}}"#)
                } else {
                    (401, r#"{"meta":{"status":"Unauthorized","message":"Bad credentials"}}"#)
                };
                let reply = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(reply.as_bytes());
            }
        });

        format!("http://{}", addr)
    }

    struct Scripted(VecDeque<String>);

    impl Prompter for Scripted {
        fn ask(&mut self, _question: &str) -> Result<Option<String>> {
            Ok(self.0.pop_front())
        }
    }

    fn config_file(url: &str, password: &str) -> ConfigFile {
        toml::from_str(&format!(
            r#"
            [credentials]
            instance_url = "{url}"
            username = "bob"
            password = "{password}"
            using_oauth = false

            [parameters]
            project_id = 7
            "#
        ))
        .unwrap()
    }

    // base64("bob:right")
    const GOOD_LOGIN: &str = "Basic Ym9iOnJpZ2h0";

    #[test]
    fn test_valid_login_connects_without_prompt() {
        let url = start_stub(GOOD_LOGIN);
        let mut file = config_file(&url, "right");
        let mut prompter = Scripted(VecDeque::new());

        let (config, client) = connect(&mut file, &mut prompter, &Formatter::new(false)).unwrap();
        assert_eq!(config.instance_url, url);
        assert_eq!(client.instance_url(), url);
    }

    #[test]
    fn test_reentered_login_is_used() {
        let url = start_stub(GOOD_LOGIN);
        let mut file = config_file(&url, "wrong");
        let mut prompter = Scripted(
            ["y", url.as_str(), "bob", "right", "n"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );

        let (config, _client) =
            connect(&mut file, &mut prompter, &Formatter::new(false)).unwrap();
        assert_eq!(config.instance_url, url);
        assert_eq!(file.credentials.password.as_deref(), Some("right"));
    }

    #[test]
    fn test_declined_reentry_aborts() {
        let url = start_stub(GOOD_LOGIN);
        let mut file = config_file(&url, "wrong");
        let mut prompter = Scripted(VecDeque::from(["n".to_string()]));

        let Err(err) = connect(&mut file, &mut prompter, &Formatter::new(false)) else {
            panic!("expected the login to be rejected");
        };
        assert!(matches!(err, CliError::Auth(_)));
    }

    #[test]
    fn test_second_failure_aborts() {
        let url = start_stub(GOOD_LOGIN);
        let mut file = config_file(&url, "wrong");
        let mut prompter = Scripted(
            ["y", url.as_str(), "bob", "still-wrong", "n"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );

        let Err(err) = connect(&mut file, &mut prompter, &Formatter::new(false)) else {
            panic!("expected the login to be rejected");
        };
        assert!(matches!(err, CliError::Auth(_)));
    }
}
