use std::io::{BufRead, Write};

use crate::{
    connection::executor::StatementExecutor,
    core::SQLError,
    sql::{
        session::{QueryResult, SQLKind},
        Session,
    },
};

pub struct CliApp<E, I: BufRead, O: Write> {
    session: Session<E>,

    input: I,
    output: O,
}

impl<E: StatementExecutor, I: BufRead, O: Write> CliApp<E, I, O> {
    pub fn new(session: Session<E>, input: I, output: O) -> Self {
        Self {
            session,
            input,
            output,
        }
    }

    /// Read statements until end of input.
    pub fn run(&mut self) -> Result<(), SQLError> {
        self.bootstrap()?;

        let mut line_buf = String::new();
        loop {
            self.prompt()?;
            line_buf.clear();
            if self.input.read_line(&mut line_buf)? == 0 {
                return Ok(());
            }
            if line_buf.trim().is_empty() {
                continue;
            }

            let result = self.handle_line(&line_buf);
            self.print(&result)?;
            self.print("\n")?;
        }
    }

    fn bootstrap(&mut self) -> Result<(), SQLError> {
        let welcome = format!(
            "Connected to schema {}. Statements are shown, not sent.\n",
            self.session.connection().default_schema()
        );
        self.print(&welcome)
    }

    fn prompt(&mut self) -> Result<(), SQLError> {
        let prompt = format!("{}=> ", self.session.connection().current_schema());
        self.print(&prompt)
    }

    fn handle_line(&mut self, line: &str) -> String {
        match self.session.execute(line.trim()) {
            Ok(result) => format_result(&result),
            Err(e) => e.to_string(),
        }
    }

    fn print(&mut self, string: &str) -> Result<(), SQLError> {
        self.output.write_all(string.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }
}

fn format_result(result: &QueryResult) -> String {
    match result.kind {
        SQLKind::Execute => "OK".to_string(),
        SQLKind::Query => {
            let mut lines = vec![result.fields.join(", ")];
            lines.extend(result.data.iter().map(|tuple| tuple.to_string()));
            lines.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliApp;
    use crate::{
        config::ConnectionConfig, connection::executor::DryRunExecutor,
        connection::IseriesConnection, sql::Session,
    };

    #[test]
    fn test_run_until_eof() {
        let config = ConnectionConfig::new().with_schema("qgpl");
        let session = Session::new(IseriesConnection::new(DryRunExecutor::new(), config).unwrap());
        let input = "SET SCHEMA sales\nEXPLAIN SELECT * FROM t LIMIT 1\n\nSET SCHEMA\n";

        let mut output = vec![];
        let mut app = CliApp::new(session, input.as_bytes(), &mut output);
        app.run().unwrap();
        drop(app);

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Connected to schema QGPL."));
        assert!(output.contains("QGPL=> OK\n"));
        assert!(output.contains("SALES=> sql\nSELECT * FROM t FETCH FIRST 1 ROWS ONLY\n"));
        assert!(output.contains("Parse Error: malformed SET SCHEMA statement"));
    }
}
