use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "tutor_booking", about = "Session booking backend for the tutoring marketplace")]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// PostgreSQL connection string. Without one the server keeps sessions
    /// in memory (impersistent).
    #[arg(long)]
    database_url: Option<String>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        let mut configuration = Self::parse();
        if configuration.database_url.is_none() {
            configuration.database_url = std::env::var("DATABASE_URL").ok();
        }
        configuration
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }
}
