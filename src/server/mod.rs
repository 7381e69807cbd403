use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::{stream, StreamExt};

use pgwire::{
    api::{
        query::SimpleQueryHandler,
        results::{query_response, DataRowEncoder, FieldFormat, FieldInfo, Response, Tag},
        ClientInfo, MakeHandler, Type,
    },
    error::{PgWireError, PgWireResult},
};

use crate::{
    config::ConnectionConfig,
    connection::{executor::DryRunExecutor, IseriesConnection},
    core::{ErrorKind, SQLError},
    sql::{
        session::{QueryResult, SQLKind},
        Session,
    },
};

/// Handles the queries of one client socket.
///
/// Every socket owns its own connection, so a `SET SCHEMA` issued by one
/// client never changes the schema another client sees.
pub struct GatewayHandler {
    pub session: Mutex<Session<DryRunExecutor>>,
}

/// Creates a fresh `GatewayHandler` for each accepted socket.
pub struct MakeGatewayHandler {
    template: IseriesConnection<DryRunExecutor>,
}

impl MakeGatewayHandler {
    /// Fails with `ConfigurationError` before any socket is accepted.
    pub fn new(config: ConnectionConfig) -> Result<Self, SQLError> {
        Ok(Self {
            template: IseriesConnection::new(DryRunExecutor::new(), config)?,
        })
    }
}

impl MakeHandler for MakeGatewayHandler {
    type Handler = Arc<GatewayHandler>;

    fn make(&self) -> Self::Handler {
        // The template never runs a statement, so each copy starts at the
        // default schema.
        Arc::new(GatewayHandler {
            session: Mutex::new(Session::new(self.template.clone())),
        })
    }
}

fn api_error(e: SQLError) -> PgWireError {
    PgWireError::ApiError(Box::new(e))
}

#[async_trait]
impl SimpleQueryHandler for GatewayHandler {
    async fn do_query<'b, C>(&self, _client: &C, query: &'b str) -> PgWireResult<Vec<Response<'b>>>
    where
        C: ClientInfo + Unpin + Send + Sync,
    {
        let QueryResult {
            fields,
            data: tuples,
            kind,
        } = {
            let mut session = self.session.lock().map_err(|_| {
                api_error(SQLError::new(ErrorKind::UnknownError, "session lock poisoned"))
            })?;
            session.execute(query).map_err(api_error)?
        };

        match kind {
            SQLKind::Query => {
                let columns = fields.len();
                let fields = fields
                    .into_iter()
                    .map(|name| FieldInfo::new(name, None, None, Type::VARCHAR, FieldFormat::Text))
                    .collect::<Vec<_>>();

                let data_row_stream = stream::iter(tuples.into_iter()).map(move |tuple| {
                    let mut encoder = DataRowEncoder::new(columns);
                    for datum in tuple.values.iter() {
                        encoder.encode_text_format_field(Some(datum))?;
                    }

                    encoder.finish()
                });

                Ok(vec![Response::Query(query_response(
                    Some(fields),
                    data_row_stream,
                ))])
            }
            SQLKind::Execute => Ok(vec![Response::Execution(Tag::new_for_execution(
                "OK", None,
            ))]),
        }
    }
}
