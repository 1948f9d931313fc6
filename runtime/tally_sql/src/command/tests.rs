use super::*;
use pretty_assertions::assert_eq;
use tally_value::{set_null, TaggedValue};

#[test]
fn verb_is_first_word_uppercased() {
    assert_eq!(verb("  select * from t").as_deref(), Some("SELECT"));
    assert_eq!(verb("\tFetch next").as_deref(), Some("FETCH"));
    assert_eq!(verb(" \t "), None);
    let far = format!("{}commit", " ".repeat(60));
    assert_eq!(verb(&far), None);
}

#[test]
fn keyword_search_skips_quotes_and_escapes() {
    assert_eq!(find_keyword("SELECT * FROM T USING c", "USING "), Some(16));
    assert_eq!(find_keyword("select * from t using c", "USING "), Some(16));
    assert_eq!(find_keyword("SELECT 'USING x' FROM T", "USING "), None);
    assert_eq!(find_keyword("SELECT \"a USING b\" FROM T", "USING "), None);
    assert_eq!(find_keyword("SELECT \\'USING x", "USING "), Some(9));
    // offset 0 is never examined
    assert_eq!(find_keyword("USING c", "USING "), None);
    assert_eq!(find_keyword("OF", "OF "), None);
}

#[test]
fn using_clause_is_removed() {
    let mut sql = String::from("SELECT * FROM T USING c1");
    assert_eq!(take_cursor_clause(&mut sql).as_deref(), Some("c1"));
    assert_eq!(sql, "SELECT * FROM T ");

    let mut sql = String::from("DELETE FROM T WHERE CURRENT OF   c2 ");
    assert_eq!(take_cursor_clause(&mut sql).as_deref(), Some("c2"));
    assert_eq!(sql, "DELETE FROM T WHERE CURRENT  ");
}

#[test]
fn cursor_keyword_needs_leading_whitespace() {
    let mut sql = String::from("SELECT * FROM T,USING c1");
    assert_eq!(take_cursor_clause(&mut sql), None);
    assert_eq!(sql, "SELECT * FROM T,USING c1");

    let mut sql = String::from("SELECT * FROM T");
    assert_eq!(take_cursor_clause(&mut sql), None);
}

#[test]
fn cursor_name_is_capped() {
    let mut sql = String::from("SELECT * FROM T USING abcdefghijklmnopqrstuvwxyz");
    assert_eq!(
        take_cursor_clause(&mut sql).as_deref(),
        Some("abcdefghijklmnopqrs")
    );
}

#[test]
fn connection_clause_forms() {
    let mut sql = String::from("COMMIT CONNECTION = conn1");
    assert_eq!(take_connection_clause(&mut sql).as_deref(), Some("conn1"));
    assert_eq!(sql, "COMMIT ");

    let mut sql = String::from("UPDATE T SET a=1 connection conn2 WHERE b=2");
    assert_eq!(take_connection_clause(&mut sql).as_deref(), Some("conn2"));
    assert_eq!(sql, "UPDATE T SET a=1  WHERE b=2");

    let mut sql = String::from("COMMIT");
    assert_eq!(take_connection_clause(&mut sql), None);
}

#[test]
fn parameters_are_substituted() {
    let name = TaggedValue::short_text_from(b"Dune", 10);
    let id = TaggedValue::int(42, 4);
    let params: [&[u8]; 2] = [name.as_bytes(), id.as_bytes()];
    assert_eq!(
        build_command("SELECT * FROM B WHERE T=':1' AND ID=:2", &params, 100).unwrap(),
        "SELECT * FROM B WHERE T='Dune' AND ID=42"
    );
}

#[test]
fn escaped_colon_and_out_of_range_placeholder() {
    let id = TaggedValue::int(7, 2);
    let params: [&[u8]; 1] = [id.as_bytes()];
    assert_eq!(
        build_command("SELECT '12\\:30', :1, :3 FROM T", &params, 100).unwrap(),
        "SELECT '12:30', 7,  FROM T"
    );
    // without parameters placeholders stay literal
    assert_eq!(build_command("SELECT :1", &[], 100).unwrap(), "SELECT :1");
}

#[test]
fn null_parameter_swallows_quotes() {
    let mut name = TaggedValue::short_text_from(b"x", 4);
    set_null(&mut name, true);
    let params: [&[u8]; 1] = [name.as_bytes()];
    assert_eq!(
        build_command("UPDATE T SET A=':1' WHERE B=:1", &params, 100).unwrap(),
        "UPDATE T SET A=NULL WHERE B=NULL"
    );
}

#[test]
fn command_limit_is_enforced() {
    let long = TaggedValue::short_text_from(b"abcdefghij", 10);
    let params: [&[u8]; 1] = [long.as_bytes()];
    assert!(build_command("SELECT :1", &params, 12).is_err());
    assert!(build_command("SELECT 1", &[], 8).is_err());
    assert_eq!(build_command("SELECT 1", &[], 9).unwrap(), "SELECT 1");
}

#[test]
fn connect_positional_parameters() {
    let server = TaggedValue::short_text_from(b"books", 10);
    let user = TaggedValue::short_text_from(b"me", 10);
    let password = TaggedValue::short_text_from(b"secret", 10);

    let all: [&[u8]; 3] = [server.as_bytes(), user.as_bytes(), password.as_bytes()];
    let command = parse_connect("CONNECT", &all).unwrap();
    assert_eq!(command.params.server, "books");
    assert_eq!(command.params.user, "me");
    assert_eq!(command.params.password, "secret");
    assert_eq!(command.name, "");

    let two: [&[u8]; 2] = [user.as_bytes(), password.as_bytes()];
    let command = parse_connect("CONNECT", &two).unwrap();
    assert_eq!(command.params.server, "");
    assert_eq!(command.params.user, "me");
    assert_eq!(command.params.password, "secret");
}

#[test]
fn connect_keywords() {
    let command = parse_connect(
        "CONNECT server=books, name=me,password=pw CONNECTION=conn1",
        &[],
    )
    .unwrap();
    assert_eq!(
        command,
        ConnectCommand {
            name: "conn1".into(),
            params: ConnectParams {
                server: "books".into(),
                user: "me".into(),
                password: "pw".into(),
                extra: String::new(),
                raw: "server=books, name=me,password=pw CONNECTION=conn1".into(),
            },
        }
    );
}

#[test]
fn connect_keywords_stop_at_unknown_key() {
    let command = parse_connect("CONNECT name=me other=x password=pw", &[]).unwrap();
    assert_eq!(command.params.user, "me");
    assert_eq!(command.params.password, "");
}

#[test]
fn connect_string_keyword_is_kept_whole() {
    let command = parse_connect("CONNECT string=DSN=books;APP=x;", &[]).unwrap();
    assert_eq!(command.params.extra, "DSN=books;APP=x;");
}

#[test]
fn duplicate_connection_keyword() {
    assert_eq!(
        parse_connect("CONNECT connection=a connection=b", &[]),
        Err(SqlError::DuplicateConnectionKeyword)
    );
}

#[test]
fn select_without_options() {
    let (sql, options) = parse_select_options("SELECT * FROM T").unwrap();
    assert_eq!(sql, "SELECT * FROM T");
    assert!(options.is_empty());
    assert_eq!(
        parse_select_options("SELECT"),
        Err(SqlError::SelectSyntax { stage: 1 })
    );
}

#[test]
fn select_options_are_parsed_and_removed() {
    let (sql, options) =
        parse_select_options("SELECT OPTIONS(LOCK=READONLY, SCROLL=keyset) * FROM T").unwrap();
    assert_eq!(sql, "SELECT  * FROM T");
    assert_eq!(options.lock, Some(Lock::ReadOnly));
    assert_eq!(options.scroll, Some(Scroll::Keyset));

    let (sql, options) = parse_select_options("SELECT options (scroll = dynamic) a FROM T").unwrap();
    assert_eq!(sql, "SELECT  a FROM T");
    assert_eq!(options.lock, None);
    assert_eq!(options.scroll, Some(Scroll::Dynamic));
}

#[test]
fn select_option_errors() {
    let cases = [
        ("SELECT OPTIONS(LOCK=READONLY * FROM T", SqlError::SelectSyntax { stage: 2 }),
        ("SELECT OPTIONS(LOCK=BOGUS) * FROM T", SqlError::IllegalLock),
        ("SELECT OPTIONS(SCROLL=SIDEWAYS) * FROM T", SqlError::IllegalScroll),
    ];
    for (sql, expected) in cases {
        assert_eq!(parse_select_options(sql), Err(expected), "{sql}");
    }
}

#[test]
fn unknown_select_option_stops_scanning() {
    let (sql, options) = parse_select_options("SELECT OPTIONS(FAST) * FROM T").unwrap();
    assert_eq!(sql, "SELECT  * FROM T");
    assert!(options.is_empty());
}

#[test]
fn fetch_positions() {
    let cases = [
        ("FETCH", FetchOrientation::Next),
        ("FETCH first", FetchOrientation::First),
        ("FETCH LAST", FetchOrientation::Last),
        ("FETCH prev", FetchOrientation::Prior),
        ("FETCH PREVIOUS", FetchOrientation::Prior),
        ("FETCH RELATIVE -3", FetchOrientation::Relative(-3)),
        ("FETCH RELATIVE 0", FetchOrientation::Relative(0)),
        ("FETCH ABSOLUTE 5", FetchOrientation::Absolute(5)),
        ("FETCH RANDOM 2", FetchOrientation::Absolute(2)),
    ];
    for (sql, expected) in cases {
        assert_eq!(parse_fetch(sql), Ok(expected), "{sql}");
    }
}

#[test]
fn fetch_errors() {
    let cases = [
        ("FETCH RELATIVE", 1),
        ("FETCH RELATIVE x", 2),
        ("FETCH ABSOLUTE", 3),
        ("FETCH ABSOLUTE -y", 4),
        ("FETCH SIDEWAYS", 5),
    ];
    for (sql, stage) in cases {
        assert_eq!(parse_fetch(sql), Err(SqlError::FetchSyntax { stage }), "{sql}");
    }
}

#[test]
fn close_names_its_cursor() {
    assert_eq!(close_target("CLOSE c1"), Some("c1"));
    assert_eq!(close_target("CLOSE"), None);
}
