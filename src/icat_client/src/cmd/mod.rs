use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::provision::{self, Credentials};
use crate::session::IcatSession;

/// Connection and administrator-credential options shared by all
/// provisioning commands. Nothing here has a baked-in default endpoint or
/// password; everything comes from flags or `ICAT_ADMIN_*` variables.
#[derive(Debug, Serialize, Args, Clone)]
pub struct ConnectArgs {
    /// base URL of the ICAT server, e.g. https://icat.example.org
    #[arg(short = 's', long, env = "ICAT_ADMIN_URL")]
    pub url: String,

    /// authentication plugin to log in with
    #[arg(short = 'a', long, default_value = "simple", env = "ICAT_ADMIN_AUTH")]
    pub auth: String,

    /// administrator user name
    #[arg(short = 'u', long, env = "ICAT_ADMIN_USERNAME")]
    pub username: String,

    /// administrator password
    #[arg(short = 'p', long, env = "ICAT_ADMIN_PASSWORD")]
    pub password: String,

    /// accept self-signed TLS certificates (development instances)
    #[arg(long)]
    pub no_check_certificate: bool,
}

impl ConnectArgs {
    fn session(&self) -> anyhow::Result<IcatSession> {
        Ok(IcatSession::connect(&self.url, !self.no_check_certificate)?)
    }

    fn credentials(&self) -> Credentials {
        Credentials {
            mechanism: self.auth.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// Register the "User-defined" data-publication type for a facility
#[derive(Debug, Serialize, Args, Clone)]
pub struct DataPublicationTypeArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// id of the facility the publication type belongs to
    #[arg(short = 'f', long, env = "ICAT_ADMIN_FACILITY_ID")]
    pub facility_id: i64,
}

impl DataPublicationTypeArgs {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut session = self.connect.session()?;
        provision::register_data_publication_type(
            &mut session,
            &self.connect.credentials(),
            self.facility_id,
        )
        .await?;
        info!("data-publication type registered");
        Ok(())
    }
}

/// Seed public read rules and public-step declarations
#[derive(Debug, Serialize, Args, Clone)]
pub struct PublicAccessArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

impl PublicAccessArgs {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut session = self.connect.session()?;
        provision::open_public_access(&mut session, &self.connect.credentials()).await?;
        info!("public access provisioned");
        Ok(())
    }
}
