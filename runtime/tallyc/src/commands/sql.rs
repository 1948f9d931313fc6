use std::fmt::Write as _;

use tally_sql::{Session, SqlConfig};
use tally_value::{is_null, logical, TaggedValue};

use crate::cli::SqlArgs;
use crate::{flag_names, CliError};

/// Bytes captured per fetched column.
const COLUMN_CAPACITY: u16 = 256;

/// Run every line of the script as one SQL command.
///
/// Each command prints `code flags command`, then the pending message when
/// there is one. A successful `FETCH` also prints its row, columns joined by
/// ` | ` with SQL NULL shown as `NULL`.
pub fn run_script(args: &SqlArgs) -> Result<String, CliError> {
    let script = std::fs::read_to_string(&args.script).map_err(|source| CliError::Read {
        path: args.script.display().to_string(),
        source,
    })?;
    let config = match &args.config {
        Some(path) => SqlConfig::load(path)?,
        None => SqlConfig::default(),
    };
    let mut session = Session::new();
    session.load_driver(&config);

    let mut output = String::new();
    for line in script.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        run_line(&mut session, line, args.columns, &mut output);
    }
    session.close_all();
    Ok(output)
}

fn run_line(session: &mut Session, line: &str, columns: usize, output: &mut String) {
    let command = TaggedValue::long_text_from(line.as_bytes(), 0);
    let mut row: Vec<TaggedValue> = (0..columns)
        .map(|_| TaggedValue::long_text(COLUMN_CAPACITY))
        .collect();
    let outcome = {
        let mut into: Vec<&mut [u8]> = row.iter_mut().map(TaggedValue::as_mut_bytes).collect();
        session.run(&command, &[], &mut into)
    };
    tracing::debug!(code = outcome.code, line, "ran");

    let _ = writeln!(output, "{:>4} {:<5} {line}", outcome.code, flag_names(outcome.flags));
    let message = session.message();
    if !message.is_empty() {
        let _ = writeln!(output, "     {message}");
    }

    let is_fetch = line
        .split_ascii_whitespace()
        .next()
        .is_some_and(|verb| verb.eq_ignore_ascii_case("FETCH"));
    if is_fetch && outcome.code >= 0 && outcome.code != 100 {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| {
                if is_null(cell) {
                    "NULL".to_owned()
                } else {
                    String::from_utf8_lossy(logical(cell)).into_owned()
                }
            })
            .collect();
        let used = cells.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
        let _ = writeln!(output, "     {}", cells[..used].join(" | "));
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::path::PathBuf;

    const CONFIG: &str = r#"
        [driver]
        kind = "memory"

        [[driver.tables]]
        name = "books"
        columns = [{ name = "id", type = "integer" }, { name = "title", type = "char", precision = 10 }]
        rows = [["1", "Dune"], ["2", "NULL"]]
    "#;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn script_prints_codes_messages_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(&dir, "db.toml", CONFIG);
        let script = write(
            &dir,
            "run.sql",
            "# library\nCONNECT\n\nSELECT * FROM books\nFETCH\nFETCH\nFETCH\nFETCH PRIOR\n",
        );
        let output = run_script(&SqlArgs {
            script,
            config: Some(config),
            columns: 2,
        })
        .unwrap();
        let expected = [
            "   0 EQUAL CONNECT",
            "   0 EQUAL SELECT * FROM books",
            "   0 EQUAL FETCH",
            "     1 | Dune",
            "   0 EQUAL FETCH",
            "     2 | NULL",
            " 100 OVER  FETCH",
            "  -1 LESS  FETCH PRIOR",
            "     IM001: Driver does not support SQLExtendedFetch",
        ]
        .join("\n")
            + "\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn missing_script_names_its_path() {
        let err = run_script(&SqlArgs {
            script: PathBuf::from("/nonexistent/run.sql"),
            config: None,
            columns: 1,
        })
        .unwrap_err();
        assert!(err.to_string().contains("run.sql"));
    }
}
