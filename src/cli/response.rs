use std::path::{Path, PathBuf};

use clap::Parser;
use savings_config::wire;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Interpret the persistence service's reply to an exported save payload")]
pub struct Response {
    /// File holding the response body
    body: PathBuf,

    /// HTTP status code of the response
    #[arg(long, default_value_t = 200)]
    status: u16,
}

impl Response {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let path = if self.body.is_absolute() {
            self.body
        } else {
            root.join(self.body)
        };
        let body = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;

        let success = (200..300).contains(&self.status);
        if let Err(failure) = wire::interpret_save_response(success, &body) {
            println!("{} {failure}", "Save rejected:".error());
            return Err(failure.into());
        }

        println!("{}", "Save accepted".success());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use savings_config::wire::ValidationFailure;
    use tempfile::tempdir;
    use test_case::test_case;

    use super::*;

    fn run(body: &str, status: u16) -> anyhow::Result<()> {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join("reply.json"), body).unwrap();
        Response {
            body: PathBuf::from("reply.json"),
            status,
        }
        .run(tmp.path())
    }

    #[test]
    fn success_status_is_accepted() {
        assert!(run("{}", 200).is_ok());
        assert!(run("", 204).is_ok());
    }

    #[test_case(r#"{"message": "Rate must not exceed 20%"}"#, "Rate must not exceed 20%"; "json message")]
    #[test_case("  Tier overlap detected\n", "Tier overlap detected"; "plain text")]
    fn failure_surfaces_service_message(body: &str, expected: &str) {
        let error = run(body, 422).unwrap_err();
        assert_eq!(
            error.downcast_ref::<ValidationFailure>().map(|f| f.message.as_str()),
            Some(expected)
        );
    }

    #[test]
    fn missing_body_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let result = Response {
            body: PathBuf::from("absent.json"),
            status: 200,
        }
        .run(tmp.path());
        assert!(result.is_err());
    }
}
