use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use registration_schema::{
    form::{COLLEGE_OPTIONS, FormState, INVITE_BASE_URL, INVITE_TEXT, SUBMITTED_KEY, ShareOutcome},
    payloads::{ErrorResponse, RegisterResponse, StatsResponse, StatusResponse},
};
use reqwest::{Client, StatusCode, Url};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(about = "Walks through the Tech For Girls registration form against a running server")]
struct Cli {
    #[arg(long, default_value = "http://localhost:1111")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill in the form, share, and submit
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = COLLEGE_OPTIONS[0])]
        college: String,

        /// Only the file name is sent
        #[arg(long)]
        screenshot: Option<PathBuf>,

        #[arg(long, default_value_t = 5)]
        shares: u32,

        /// Where the submitted flag is kept between runs
        #[arg(long, default_value = SUBMITTED_KEY)]
        marker: PathBuf,
    },

    /// Check whether an email is registered
    Status { email: String },

    /// Show registration totals
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let client = Client::new();
    let server = Url::parse(&cli.server).context("Invalid --server url")?;

    match cli.command {
        Command::Register {
            name,
            phone,
            email,
            college,
            screenshot,
            shares,
            marker,
        } => {
            if !COLLEGE_OPTIONS.contains(&college.as_str()) {
                bail!("Unknown college/department {college:?}, pick one of {COLLEGE_OPTIONS:?}");
            }

            let mut form = FormState {
                name,
                phone,
                email,
                college,
                screenshot: screenshot
                    .as_deref()
                    .and_then(Path::file_name)
                    .map(|file| file.to_string_lossy().into_owned()),
                share_count: 0,
                submitted: marker.exists(),
            };

            register(&client, &server, &mut form, shares, &marker).await
        }
        Command::Status { email } => {
            let status: StatusResponse = client
                .get(status_url(&server, &email)?)
                .send()
                .await?
                .json()
                .await?;

            println!("{}", serde_json::to_string_pretty(&status)?);
            Ok(())
        }
        Command::Stats => {
            let stats: StatsResponse = client
                .get(server.join("api/stats")?)
                .send()
                .await?
                .json()
                .await?;

            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}

/// The email becomes a single escaped path segment, `?`, `#` and `/` included.
fn status_url(server: &Url, email: &str) -> anyhow::Result<Url> {
    let mut url = server.join("api/registration-status/")?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("{server} cannot be a base url"))?
        .pop_if_empty()
        .push(email);

    Ok(url)
}

async fn register(
    client: &Client,
    server: &Url,
    form: &mut FormState,
    shares: u32,
    marker: &Path,
) -> anyhow::Result<()> {
    if form.submitted {
        warn!("Already submitted, remove {} to submit again", marker.display());
        return Ok(());
    }

    info!("{} ({}%)", form.progress_text(), form.progress());

    let invite = Url::parse_with_params(INVITE_BASE_URL, [("text", INVITE_TEXT)])?;
    for _ in 0..shares {
        match form.share() {
            ShareOutcome::AlreadyComplete => {
                info!("You have already completed sharing!");
                break;
            }
            ShareOutcome::Shared { count } => {
                info!("Shared {invite}, {count}/5 shares completed. Keep sharing!")
            }
            ShareOutcome::Completed => {
                info!("Shared {invite}, sharing complete! You can now submit your registration.")
            }
        }
    }

    info!("{} ({}%)", form.progress_text(), form.progress());

    let request = form.submission()?;
    if let Err(errors) = request.clone().validate() {
        for error in errors {
            warn!("{}: {}", error.field, error.message);
        }
        bail!("Form has invalid fields");
    }

    let response = client
        .post(server.join("api/register")?)
        .json(&request)
        .send()
        .await?;

    match response.status() {
        StatusCode::CREATED => {
            let created: RegisterResponse = response.json().await?;

            form.mark_submitted();
            fs::write(marker, "true")
                .with_context(|| format!("Failed to write {}", marker.display()))?;

            info!(
                "{} Registration #{} recorded at {}",
                created.message, created.registration.id, created.registration.submitted_at
            );
            Ok(())
        }
        status => {
            let error: ErrorResponse = response.json().await?;

            for field in error.errors.iter().flatten() {
                warn!("{}: {}", field.field, field.message);
            }
            bail!("Registration failed ({status}): {}", error.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_url_escapes_email() {
        let server = Url::parse("http://localhost:1111").unwrap();

        let url = status_url(&server, "ada@example.com").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1111/api/registration-status/ada@example.com");

        let url = status_url(&server, "a?b#c/d@example.com").unwrap();
        assert_eq!(url.path(), "/api/registration-status/a%3Fb%23c%2Fd@example.com");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn status_url_keeps_scheme_like_email_in_path() {
        let server = Url::parse("http://localhost:1111/").unwrap();

        let url = status_url(&server, "mailto:ada@example.com").unwrap();

        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.path(), "/api/registration-status/mailto:ada@example.com");
    }
}
