use clap::Parser;
use cortexa::{db::Db, router, AppState};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// SQLite database location.
    #[arg(long, env, default_value = "sqlite://cortexa.db")]
    database_url: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Mark session cookies as `Secure` (serve behind HTTPS).
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,

    /// Grant category management rights to this existing user on startup.
    #[arg(long, env)]
    promote_admin: Option<String>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,cortexa=debug,tower_http=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(&args.database_url).await?;

    if let Some(username) = &args.promote_admin {
        if !db.promote_to_admin(username).await? {
            tracing::warn!("cannot promote {username}: no such user");
        }
    }

    let app = router(AppState::new(db, args.secure_cookies));

    let address = args.address.parse::<std::net::SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("listening on {address}");
    axum::serve(listener, app).await?;

    Ok(())
}
