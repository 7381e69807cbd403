use std::{error::Error, io, sync::Arc};

use iseries::{
    cli::CliApp,
    config::{gateway_addr, ConnectionConfig},
    server::MakeGatewayHandler,
    util::SimpleLogger,
    DryRunExecutor, IseriesConnection, Session,
};
use log::{info, LevelFilter};
use pgwire::{
    api::{
        auth::noop::NoopStartupHandler, query::PlaceholderExtendedQueryHandler, MakeHandler,
        StatelessMakeHandler,
    },
    tokio::process_socket,
};
use tokio::net::TcpListener;

static LOGGER: SimpleLogger = SimpleLogger;

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn Error>> {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(LevelFilter::Info))
        .map_err(|e| e.to_string())?;

    let config = ConnectionConfig::from_env();

    if std::env::args().skip(1).any(|arg| arg == "--cli") {
        let connection = IseriesConnection::new(DryRunExecutor::new(), config)?;
        let stdin = io::stdin();
        let mut app = CliApp::new(Session::new(connection), stdin.lock(), io::stdout());
        app.run()?;
        return Ok(());
    }

    let processor = Arc::new(MakeGatewayHandler::new(config)?);
    // We have not implemented extended query in this server, use placeholder instead
    let placeholder = Arc::new(StatelessMakeHandler::new(Arc::new(
        PlaceholderExtendedQueryHandler,
    )));
    let authenticator = Arc::new(StatelessMakeHandler::new(Arc::new(NoopStartupHandler)));

    let server_addr = gateway_addr();
    let listener = TcpListener::bind(&server_addr).await?;
    info!("Listening to {}", server_addr);
    loop {
        let incoming_socket = listener.accept().await?;
        let authenticator_ref = authenticator.make();
        let processor_ref = processor.make();
        let placeholder_ref = placeholder.make();
        tokio::spawn(process_socket(
            incoming_socket.0,
            None,
            authenticator_ref,
            processor_ref,
            placeholder_ref,
        ));
    }
}
