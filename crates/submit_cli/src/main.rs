use std::process::ExitCode;

use clap::Parser;
use registration::{
    Action, Coordinator, FirmField, Form, ImageError, ImageFile, NotificationLevel,
    RegistrationClient,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "idcard_submit")]
#[command(about = "Submit a participant ID card registration without the interactive form")]
struct Cli {
    /// Prefix of the registration endpoint (also read from `IDCARD_BASE_URL`).
    #[arg(long, env = "IDCARD_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,
    #[arg(long, default_value = "")]
    firm_name: String,
    #[arg(long, default_value = "")]
    brand_name: String,
    #[arg(long, default_value = "")]
    email: String,
    /// Representative as `NAME|MOBILE|PHOTO_PATH`; mobile may be empty.
    /// Repeat for every representative, in order.
    #[arg(long = "rep", value_parser = parse_rep)]
    reps: Vec<RepArg>,
    /// Log level for stderr output.
    #[arg(long, default_value = "warn")]
    level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RepArg {
    name: String,
    mobile: Option<String>,
    photo: Option<String>,
}

fn parse_rep(raw: &str) -> Result<RepArg, String> {
    let mut parts = raw.splitn(3, '|');
    let name = parts.next().unwrap_or("").trim().to_string();
    let mobile = parts.next().map(str::trim).filter(|m| !m.is_empty());
    let photo = parts.next().map(str::trim).filter(|p| !p.is_empty());

    if name.is_empty() && mobile.is_none() && photo.is_none() {
        return Err("expected NAME|MOBILE|PHOTO_PATH".to_string());
    }

    Ok(RepArg {
        name,
        mobile: mobile.map(str::to_string),
        photo: photo.map(str::to_string),
    })
}

#[derive(Debug, Error)]
enum CliError {
    #[error("representative {index}: {source}")]
    Image {
        index: usize,
        #[source]
        source: ImageError,
    },
    #[error(transparent)]
    Client(#[from] registration::ClientError),
    #[error("logging error: {0}")]
    Logging(String),
}

fn init_logging(level: &str) -> Result<(), CliError> {
    let filter = EnvFilter::try_new(format!(
        "idcard_submit={level},registration={level}"
    ))
    .map_err(|err| CliError::Logging(err.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}

/// Feeds the arguments through the same reducer the interactive form uses.
fn build_form(cli: &Cli) -> Result<Form, CliError> {
    let mut form = Form::new();
    form.dispatch(Action::SetFirmField(FirmField::Name, cli.firm_name.clone()));
    form.dispatch(Action::SetFirmField(
        FirmField::BrandName,
        cli.brand_name.clone(),
    ));
    form.dispatch(Action::SetFirmField(FirmField::Email, cli.email.clone()));

    for (index, rep) in cli.reps.iter().enumerate() {
        if index > 0 {
            form.dispatch(Action::AddRepresentative);
        }
        form.dispatch(Action::SetRepresentativeName(index, rep.name.clone()));
        form.dispatch(Action::SetRepresentativeMobile(index, rep.mobile.clone()));
        if let Some(path) = &rep.photo {
            let image = ImageFile::load(path).map_err(|source| CliError::Image {
                index: index + 1,
                source,
            })?;
            form.dispatch(Action::SetRepresentativeImage(index, image));
        }
    }

    Ok(form)
}

async fn run(cli: Cli) -> Result<bool, CliError> {
    init_logging(&cli.level)?;
    let client = RegistrationClient::new(&cli.base_url)?;
    let mut form = build_form(&cli)?;
    let mut coordinator = Coordinator::new();

    let Some(completion) = coordinator.submit(&mut form, &client).await else {
        for (field, err) in form.errors.entries() {
            eprintln!("{field}: {err}");
        }
        return Ok(false);
    };

    let notification = completion.notification;
    match notification.level {
        NotificationLevel::Success => {
            println!("{}: {}", notification.title, notification.description);
            if let Some(route) = completion.navigate {
                tracing::debug!("next route {}", route.path());
            }
            Ok(true)
        }
        NotificationLevel::Error => {
            eprintln!("{}: {}", notification.title, notification.description);
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
