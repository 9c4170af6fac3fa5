use cartdb_db::*;
use cartdb_query::{FilterSet, OrderSpec, QueryRequest};

struct Cart {
    name: &'static str,
    region: &'static str,
    mapper: &'static str,
    board: &'static str,
    wram: Option<bool>,
    chip: Option<&'static str>,
}

const CARTS: &[Cart] = &[
    Cart {
        name: "The Legend of Zelda",
        region: "USA",
        mapper: "1",
        board: "NES-SNROM",
        wram: Some(true),
        chip: Some("MMC1B2"),
    },
    Cart {
        name: "Super Mario Bros. 3",
        region: "USA",
        mapper: "4",
        board: "NES-TSROM",
        wram: Some(false),
        chip: Some("MMC3B"),
    },
    Cart {
        name: "Kirby's Adventure",
        region: "USA",
        mapper: "4",
        board: "NES-TKROM",
        wram: Some(true),
        chip: Some("MMC3C"),
    },
    Cart {
        name: "Super Mario Bros.",
        region: "Japan",
        mapper: "0",
        board: "HVC-NROM-256K-02",
        wram: None,
        chip: None,
    },
    Cart {
        name: "Mike Tyson's Punch-Out!!",
        region: "USA",
        mapper: "9",
        board: "NES-PNROM",
        wram: None,
        chip: Some("MMC2"),
    },
];

fn seeded_executor() -> SqliteExecutor {
    let conn = open_memory().unwrap();
    for cart in CARTS {
        let game_id = insert_game(
            &conn,
            &GameRecord {
                name: cart.name.to_string(),
                region: Some(cart.region.to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let cart_id = insert_cartridge(&conn, game_id, &CartridgeRecord::default()).unwrap();
        let board_id = insert_board(
            &conn,
            cart_id,
            &BoardRecord {
                board_type: Some(cart.board.to_string()),
                mapper: Some(cart.mapper.to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        insert_rom(
            &conn,
            RomKind::Prg,
            board_id,
            &RomRecord {
                size: Some("128k".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        if let Some(battery) = cart.wram {
            insert_wram(
                &conn,
                board_id,
                &RamRecord {
                    size: Some("8k".to_string()),
                    battery,
                },
            )
            .unwrap();
        }
        if let Some(chip) = cart.chip {
            insert_chip(
                &conn,
                board_id,
                &ChipRecord {
                    chip_type: Some(chip.to_string()),
                    pins: vec![],
                },
            )
            .unwrap();
        }
    }
    SqliteExecutor::new(conn)
}

fn search(request: QueryRequest) -> QueryResult {
    let query = request.assemble().unwrap();
    let result = seeded_executor().execute(&query).unwrap();
    assert_eq!(result.columns, query.column_names());
    result
}

fn names(result: &QueryResult) -> Vec<String> {
    (0..result.len())
        .map(|i| result.value(i, "game_name").unwrap().to_string())
        .collect()
}

#[test]
fn unfiltered_returns_everything_by_name() {
    let result = search(QueryRequest::default());
    assert_eq!(result.columns.len(), 11);
    assert_eq!(
        names(&result),
        vec![
            "Kirby's Adventure",
            "Mike Tyson's Punch-Out!!",
            "Super Mario Bros.",
            "Super Mario Bros. 3",
            "The Legend of Zelda",
        ]
    );
}

#[test]
fn mapper_matches_text_column() {
    let result = search(QueryRequest::new(FilterSet::new().mapper(4).region("all")));
    assert_eq!(names(&result), vec!["Kirby's Adventure", "Super Mario Bros. 3"]);
    assert_eq!(
        result.value(0, "board_type"),
        Some(&CellValue::Text("NES-TKROM".to_string()))
    );
}

#[test]
fn battery_true_requires_flag() {
    let result = search(QueryRequest::new(FilterSet::new().battery(true)));
    assert_eq!(names(&result), vec!["Kirby's Adventure", "The Legend of Zelda"]);
    assert_eq!(result.value(0, "battery"), Some(&CellValue::Integer(1)));
}

#[test]
fn battery_false_includes_boards_without_wram() {
    let result = search(QueryRequest::new(FilterSet::new().battery(false)));
    assert_eq!(
        names(&result),
        vec![
            "Mike Tyson's Punch-Out!!",
            "Super Mario Bros.",
            "Super Mario Bros. 3",
        ]
    );
    for i in 0..result.len() {
        assert_eq!(result.value(i, "battery"), Some(&CellValue::Null));
    }
}

#[test]
fn region_is_bound_after_normalization() {
    let result = search(QueryRequest::new(FilterSet::new().region("JAPAN")));
    assert_eq!(names(&result), vec!["Super Mario Bros."]);

    let result = search(QueryRequest::new(FilterSet::new().region("usa")));
    assert_eq!(result.len(), 4);

    let result = search(QueryRequest::new(FilterSet::new().region("usa' OR 'a'='a")));
    assert!(result.is_empty());
}

#[test]
fn chip_column_and_custom_order() {
    let result = search(
        QueryRequest::default()
            .show_chip(true)
            .order(OrderSpec::new().then_by("mapper").then_by("board_type")),
    );
    assert_eq!(result.columns.last().map(String::as_str), Some("chip_type"));
    assert_eq!(
        names(&result),
        vec![
            "Super Mario Bros.",
            "The Legend of Zelda",
            "Kirby's Adventure",
            "Super Mario Bros. 3",
            "Mike Tyson's Punch-Out!!",
        ]
    );
    assert_eq!(result.value(0, "chip_type"), Some(&CellValue::Null));
    assert_eq!(
        result.value(4, "chip_type"),
        Some(&CellValue::Text("MMC2".to_string()))
    );
}

#[test]
fn combined_filters() {
    let result = search(QueryRequest::new(
        FilterSet::new().mapper(4).battery(true).region("usa"),
    ));
    assert_eq!(names(&result), vec!["Kirby's Adventure"]);
}

#[test]
fn missing_database_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let err = SqliteExecutor::open(&dir.path().join("missing.db"))
        .err()
        .unwrap();
    assert!(matches!(err, ExecutionError::DataSourceUnavailable { .. }));
}

#[test]
fn database_without_schema_rejects_query() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    rusqlite::Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE unrelated (id INTEGER);")
        .unwrap();

    let executor = SqliteExecutor::open(&path).unwrap();
    let query = QueryRequest::default().assemble().unwrap();
    let err = executor.execute(&query).unwrap_err();
    match err {
        ExecutionError::Rejected { message, .. } => assert!(message.contains("no such table")),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn shell_script_binds_parameters() {
    let query = QueryRequest::new(FilterSet::new().region("côte d'ivoire"))
        .assemble()
        .unwrap();
    let script = Sqlite3ShellExecutor::script(&query);
    let lines: Vec<&str> = script.lines().collect();
    assert_eq!(lines[0], ".mode json");
    assert_eq!(lines[1], r#".parameter set ?1 "'Côte D''Ivoire'""#);
    assert!(script.ends_with("ORDER BY game.name ASC;\n"));
}

#[test]
fn shell_without_binary_reports_missing_engine() {
    let dir = tempfile::tempdir().unwrap();
    let executor = Sqlite3ShellExecutor::new(dir.path().join("nes.db"))
        .with_binary(dir.path().join("no-such-sqlite3"));
    let query = QueryRequest::default().assemble().unwrap();
    let err = executor.execute(&query).unwrap_err();
    assert!(matches!(err, ExecutionError::EngineMissing { .. }));
}

fn write_legacy_database(path: &std::path::Path) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE game (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, region TEXT);
         CREATE TABLE cartridge (id INTEGER PRIMARY KEY AUTOINCREMENT, game_id INTEGER NOT NULL);
         CREATE TABLE board (id INTEGER PRIMARY KEY AUTOINCREMENT, cartridge_id INTEGER NOT NULL,
                             type TEXT, pcb TEXT, mapper TEXT);
         CREATE TABLE prg (id INTEGER PRIMARY KEY AUTOINCREMENT, board_id INTEGER NOT NULL,
                           name TEXT, size TEXT);
         CREATE TABLE chr (id INTEGER PRIMARY KEY AUTOINCREMENT, board_id INTEGER NOT NULL,
                           name TEXT, size TEXT);
         CREATE TABLE vram (id INTEGER PRIMARY KEY AUTOINCREMENT, board_id INTEGER NOT NULL, size TEXT);
         CREATE TABLE wram (id INTEGER PRIMARY KEY AUTOINCREMENT, board_id INTEGER NOT NULL, size TEXT);
         CREATE TABLE chip (id INTEGER PRIMARY KEY AUTOINCREMENT, board_id INTEGER NOT NULL, type TEXT);
         INSERT INTO game (name, region) VALUES ('Metroid', 'USA');
         INSERT INTO cartridge (game_id) VALUES (1);
         INSERT INTO board (cartridge_id, type, mapper) VALUES (1, 'NES-SNROM', '1');
         INSERT INTO wram (board_id, size) VALUES (1, '8k');",
    )
    .unwrap();
}

#[test]
fn legacy_database_is_refused_until_upgraded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    write_legacy_database(&path);

    let err = SqliteExecutor::open(&path).err().unwrap();
    match err {
        ExecutionError::DataSourceUnavailable { reason, .. } => {
            assert!(reason.contains("searchnes upgrade"), "{reason}")
        }
        other => panic!("expected unavailable, got {other:?}"),
    }

    let shell = Sqlite3ShellExecutor::new(&path).with_binary(std::env::current_exe().unwrap());
    let query = QueryRequest::default().assemble().unwrap();
    assert!(matches!(
        shell.execute(&query).unwrap_err(),
        ExecutionError::DataSourceUnavailable { .. }
    ));

    drop(open_database(&path).unwrap());

    let result = SqliteExecutor::open(&path).unwrap().execute(&query).unwrap();
    assert_eq!(names(&result), vec!["Metroid"]);
    assert_eq!(result.value(0, "battery"), Some(&CellValue::Null));
}
